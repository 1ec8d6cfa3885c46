use crate::config::AnnealParams;
use crate::error::{PfResult, PickForgeError};
use crate::grid::{GridSpec, ProductId, WarehouseGrid};
use crate::optimizer::Individual;
use crate::route::{RouteSequencer, ShelfTarget};
use crate::workload::Workload;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::warn;

/// Scores layout candidates by replaying the whole workload. Every
/// evaluation builds its own grid from the shared spec, so candidates are
/// embarrassingly parallel: the workload and parameters are shared
/// immutably, the mutable grid and search state are owned per task.
pub struct FitnessEvaluator {
    spec: GridSpec,
    workload: Arc<Workload>,
    anneal: AnnealParams,
    unreachable_penalty: f64,
    seed: u64,
}

impl FitnessEvaluator {
    pub fn new(
        spec: GridSpec,
        workload: Arc<Workload>,
        anneal: AnnealParams,
        unreachable_penalty: f64,
        seed: u64,
    ) -> PfResult<Self> {
        spec.validate()?;
        anneal.validate()?;
        if workload.is_empty() {
            return Err(PickForgeError::Validation(
                "cannot evaluate layouts against an empty workload".into(),
            ));
        }
        if !unreachable_penalty.is_finite() || unreachable_penalty <= 0.0 {
            return Err(PickForgeError::Config(
                "unreachable_penalty must be positive and finite".into(),
            ));
        }
        Ok(Self {
            spec,
            workload,
            anneal,
            unreachable_penalty,
            seed,
        })
    }

    pub fn shelf_count(&self) -> usize {
        self.spec.shelf_count()
    }

    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    pub fn workload(&self) -> &Workload {
        &self.workload
    }

    /// Total workload cost of one candidate layout.
    pub fn evaluate(&self, layout: &[ProductId]) -> f64 {
        match self.order_costs(layout) {
            Ok(costs) => costs.iter().sum(),
            Err(_) => f64::INFINITY,
        }
    }

    /// Per-order costs for a layout: route edge count when the order can be
    /// completed, otherwise a large finite penalty proportional to the order
    /// size so the search gradient stays usable.
    pub fn order_costs(&self, layout: &[ProductId]) -> PfResult<Vec<f64>> {
        let mut grid = WarehouseGrid::from_spec(&self.spec)?;
        grid.apply_layout(layout)?;
        grid.set_depot(self.spec.depot)?;

        let mut costs = Vec::with_capacity(self.workload.len());
        for (order_idx, order) in self.workload.orders().iter().enumerate() {
            grid.clear_markers();
            let targets = self.resolve_targets(&grid, &order.products);

            // The sequencer RNG derives from (evaluator seed, order index)
            // only, so identical layouts always score identically.
            let mut sequencer =
                RouteSequencer::with_seed(self.anneal.clone(), self.order_seed(order_idx));
            let cost = match sequencer.sequence(&mut grid, &targets) {
                Ok(result) => result.cost as f64,
                Err(_) => self.unreachable_penalty * order.products.len() as f64,
            };
            costs.push(cost);
        }
        Ok(costs)
    }

    /// Fill fitness for every unscored individual in parallel. Scores come
    /// back keyed by index, so a value can never attach to the wrong
    /// candidate whatever the completion order across workers; abandoning
    /// the returned iterator mid-generation leaves every individual either
    /// fully scored or untouched.
    pub fn evaluate_population(&self, population: &mut [Individual]) {
        let scores: Vec<Option<f64>> = population
            .par_iter()
            .map(|ind| {
                if ind.fitness.is_some() {
                    None
                } else {
                    Some(self.evaluate(&ind.genes))
                }
            })
            .collect();

        for (individual, score) in population.iter_mut().zip(scores) {
            if let Some(fitness) = score {
                individual.fitness = Some(fitness);
            }
        }
    }

    /// Per-cell visit counts over the workload for one layout. Orders that
    /// cannot be completed contribute nothing.
    pub fn visit_heatmap(&self, layout: &[ProductId]) -> PfResult<Vec<u32>> {
        let mut grid = WarehouseGrid::from_spec(&self.spec)?;
        grid.apply_layout(layout)?;

        let mut counts = vec![0u32; self.spec.rows * self.spec.cols];
        for (order_idx, order) in self.workload.orders().iter().enumerate() {
            grid.clear_markers();
            let targets = self.resolve_targets(&grid, &order.products);
            let mut sequencer =
                RouteSequencer::with_seed(self.anneal.clone(), self.order_seed(order_idx));
            if let Ok(result) = sequencer.sequence(&mut grid, &targets) {
                for pos in result.route.positions() {
                    counts[grid.index(*pos)] += 1;
                }
            }
        }
        Ok(counts)
    }

    fn resolve_targets(&self, grid: &WarehouseGrid, products: &[ProductId]) -> Vec<ShelfTarget> {
        products
            .iter()
            .filter_map(|&product| match grid.product_cell(product) {
                Some(cell) => Some(ShelfTarget { product, cell }),
                None => {
                    warn!(product, "order references unknown product, skipping");
                    None
                }
            })
            .collect()
    }

    fn order_seed(&self, order_idx: usize) -> u64 {
        self.seed
            .wrapping_add((order_idx as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }
}
