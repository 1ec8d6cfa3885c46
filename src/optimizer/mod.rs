pub mod crossover;
pub mod mutation;
pub mod runner;
pub mod selection;

pub use runner::{
    GenerationStats, LayoutOptimizer, NoProgress, OptimizationOutcome, ProgressCallback,
};
pub use selection::SelectionStrategy;

use crate::grid::ProductId;

/// One layout candidate: a permutation of product ids over shelf ranks.
/// Fitness is computed lazily and cached until the genes change; elites are
/// cloned forward with their cache intact.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    pub genes: Vec<ProductId>,
    pub fitness: Option<f64>,
}

impl Individual {
    pub fn new(genes: Vec<ProductId>) -> Self {
        Self {
            genes,
            fitness: None,
        }
    }

    pub fn random(shelf_count: usize, rng: &mut fastrand::Rng) -> Self {
        let mut genes: Vec<ProductId> = (1..=shelf_count as ProductId).collect();
        rng.shuffle(&mut genes);
        Self::new(genes)
    }

    /// Cached fitness, or infinity for an unscored candidate so it always
    /// loses comparisons against scored ones.
    pub fn score(&self) -> f64 {
        self.fitness.unwrap_or(f64::INFINITY)
    }
}
