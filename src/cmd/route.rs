use crate::reports;
use clap::Args;
use pickforge::config::AnnealParams;
use pickforge::error::PfResult;
use pickforge::grid::{GridSpec, Marker, ProductId, WarehouseGrid};
use pickforge::route::{RouteSequencer, ShelfTarget};

#[derive(Args, Debug, Clone)]
pub struct RouteArgs {
    #[command(flatten)]
    pub anneal: AnnealParams,

    /// Product ids to pick in one trip.
    #[arg(required = true)]
    pub products: Vec<ProductId>,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,
}

pub fn run(args: RouteArgs, spec: &GridSpec) -> PfResult<()> {
    args.anneal.validate()?;
    let mut grid = WarehouseGrid::from_spec(spec)?;

    let mut targets = Vec::new();
    for product in &args.products {
        match grid.product_cell(*product) {
            Some(cell) => targets.push(ShelfTarget {
                product: *product,
                cell,
            }),
            None => eprintln!("⚠️  Unknown product {}, skipped.", product),
        }
    }

    let mut sequencer = match args.seed {
        Some(seed) => RouteSequencer::with_seed(args.anneal.clone(), seed),
        None => RouteSequencer::new(args.anneal.clone()),
    };

    match sequencer.sequence(&mut grid, &targets) {
        Ok(result) => {
            println!("\n=== 🛒 PICKING ROUTE ===");
            println!(
                "Visit order: {}",
                result
                    .visit_order
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(" -> ")
            );
            println!("Cost: {} moves", result.cost);

            // Re-mark only the final route so the map shows the route, not
            // the annealing debris.
            grid.clear_markers();
            for pos in result.route.positions() {
                grid.set_marker(*pos, Marker::Path);
            }
            reports::print_floor_map(&grid);
        }
        Err(e) => {
            println!("\n❌ Order cannot be completed: {}", e);
        }
    }

    Ok(())
}
