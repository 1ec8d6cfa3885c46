use crate::reports;
use clap::Args;
use pickforge::config::AnnealParams;
use pickforge::error::{PfResult, PickForgeError};
use pickforge::fitness::FitnessEvaluator;
use pickforge::grid::{GridSpec, ProductId};
use pickforge::workload::Workload;
use std::sync::Arc;

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub anneal: AnnealParams,

    /// Orders CSV, one order per row.
    #[arg(short, long, default_value = "data/orders.csv")]
    pub orders: String,

    /// Comma-separated product permutation; identity layout when omitted.
    #[arg(short, long)]
    pub layout: Option<String>,

    #[arg(long, default_value_t = 1000.0)]
    pub unreachable_penalty: f64,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,
}

pub fn run(args: ValidateArgs, spec: &GridSpec) -> PfResult<()> {
    args.anneal.validate()?;

    println!("📦 Loading Orders: {}", args.orders);
    let workload = Arc::new(Workload::load_from_file(&args.orders)?);
    println!("   {} orders loaded", workload.len());

    let layout: Vec<ProductId> = match &args.layout {
        Some(raw) => parse_layout(raw)?,
        None => (1..=spec.shelf_count() as ProductId).collect(),
    };

    let evaluator = FitnessEvaluator::new(
        spec.clone(),
        workload.clone(),
        args.anneal.clone(),
        args.unreachable_penalty,
        args.seed.unwrap_or(0),
    )?;

    let costs = evaluator.order_costs(&layout)?;
    reports::print_order_costs(&workload, &costs);
    println!("\nTotal workload cost: {:.1}", costs.iter().sum::<f64>());

    Ok(())
}

fn parse_layout(raw: &str) -> PfResult<Vec<ProductId>> {
    raw.split(',')
        .map(|token| {
            token.trim().parse::<ProductId>().map_err(|_| {
                PickForgeError::Validation(format!("invalid product id '{}' in layout", token))
            })
        })
        .collect()
}
