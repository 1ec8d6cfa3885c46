use crate::reports;
use clap::Args;
use pickforge::config::Config;
use pickforge::error::PfResult;
use pickforge::fitness::FitnessEvaluator;
use pickforge::grid::{GridSpec, WarehouseGrid};
use pickforge::optimizer::{Individual, LayoutOptimizer, ProgressCallback};
use pickforge::workload::Workload;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug, Clone)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub config: Config,

    /// Orders CSV, one order per row.
    #[arg(short, long, default_value = "data/orders.csv")]
    pub orders: String,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    /// Wall-clock budget for the whole search.
    #[arg(short = 'T', long)]
    pub max_seconds: Option<u64>,
}

struct ConsoleProgress;

impl ProgressCallback for ConsoleProgress {
    fn on_generation(&self, generation: usize, best: &Individual, mean_fitness: f64) -> bool {
        println!(
            "Gen {:4} | Best: {:9.1} | Mean: {:9.1}",
            generation,
            best.score(),
            mean_fitness
        );
        true
    }
}

pub fn run(args: OptimizeArgs, spec: &GridSpec) -> PfResult<()> {
    args.config.validate()?;

    println!("📦 Loading Orders: {}", args.orders);
    let workload = Arc::new(Workload::load_from_file(&args.orders)?);
    println!("   {} orders loaded", workload.len());

    let evaluator = FitnessEvaluator::new(
        spec.clone(),
        workload,
        args.config.anneal.clone(),
        args.config.search.unreachable_penalty,
        args.seed.unwrap_or(0),
    )?;

    let mut optimizer = LayoutOptimizer::new(args.config.search.clone(), evaluator, args.seed)?;
    if let Some(secs) = args.max_seconds {
        optimizer.set_max_time(Some(Duration::from_secs(secs)));
    }

    println!(
        "\n🧬 Evolving {} candidates over {} generations ({} selection)...\n",
        args.config.search.population_size,
        args.config.search.generations,
        args.config.search.selection
    );
    let outcome = optimizer.run(&ConsoleProgress);

    println!("\n=== 🏆 BEST LAYOUT ===");
    println!("Fitness: {:.1}", outcome.best.score());

    let mut grid = WarehouseGrid::from_spec(spec)?;
    grid.apply_layout(&outcome.best.genes)?;
    reports::print_floor_map(&grid);
    reports::print_assignment(&grid);
    reports::print_history(&outcome.history);

    let heat = optimizer.evaluator().visit_heatmap(&outcome.best.genes)?;
    reports::print_heatmap(&grid, &heat);

    Ok(())
}
