use crate::error::{PfResult, PickForgeError};
use crate::optimizer::SelectionStrategy;
use clap::Args;

#[derive(Args, Debug, Clone, Default)]
pub struct Config {
    #[command(flatten)]
    pub search: SearchParams,
    #[command(flatten)]
    pub anneal: AnnealParams,
}

impl Config {
    pub fn validate(&self) -> PfResult<()> {
        self.search.validate()?;
        self.anneal.validate()
    }
}

/// Genetic-search knobs. Defaults match the workload sizes this was tuned
/// on; the PMX cutover and the unreachable penalty are empirical and stay
/// configurable.
#[derive(Args, Debug, Clone)]
pub struct SearchParams {
    #[arg(long, default_value_t = 36)]
    pub population_size: usize,

    #[arg(long, default_value_t = 20)]
    pub generations: usize,

    #[arg(long, default_value_t = 0.5)]
    pub mutation_rate: f64,

    #[arg(long, default_value_t = 0.8)]
    pub crossover_rate: f64,

    /// Best individuals copied unchanged into the next generation.
    #[arg(long, default_value_t = 2)]
    pub elitism: usize,

    #[arg(long, default_value_t = 3)]
    pub tournament_size: usize,

    #[arg(long, default_value_t = SelectionStrategy::Tournament)]
    pub selection: SelectionStrategy,

    /// Generations bred with PMX before switching to cycle crossover.
    #[arg(long, default_value_t = 10)]
    pub pmx_limit_generation: usize,

    /// Early-stop after this many generations without improvement; 0 disables.
    #[arg(long, default_value_t = 0)]
    pub patience: usize,

    /// Cost charged per product of an order no route can complete.
    #[arg(long, default_value_t = 1000.0)]
    pub unreachable_penalty: f64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            population_size: 36,
            generations: 20,
            mutation_rate: 0.5,
            crossover_rate: 0.8,
            elitism: 2,
            tournament_size: 3,
            selection: SelectionStrategy::Tournament,
            pmx_limit_generation: 10,
            patience: 0,
            unreachable_penalty: 1000.0,
        }
    }
}

impl SearchParams {
    pub fn validate(&self) -> PfResult<()> {
        if self.population_size == 0 {
            return Err(PickForgeError::Config("population_size must be > 0".into()));
        }
        if self.generations == 0 {
            return Err(PickForgeError::Config("generations must be > 0".into()));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(PickForgeError::Config(format!(
                "mutation_rate {} outside [0, 1]",
                self.mutation_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(PickForgeError::Config(format!(
                "crossover_rate {} outside [0, 1]",
                self.crossover_rate
            )));
        }
        if self.elitism >= self.population_size {
            return Err(PickForgeError::Config(format!(
                "elitism {} must be below population_size {}",
                self.elitism, self.population_size
            )));
        }
        if self.tournament_size == 0 || self.tournament_size > self.population_size {
            return Err(PickForgeError::Config(format!(
                "tournament_size {} outside 1..={}",
                self.tournament_size, self.population_size
            )));
        }
        if !self.unreachable_penalty.is_finite() || self.unreachable_penalty <= 0.0 {
            return Err(PickForgeError::Config(
                "unreachable_penalty must be positive and finite".into(),
            ));
        }
        Ok(())
    }
}

/// Simulated-annealing knobs for order sequencing.
#[derive(Args, Debug, Clone)]
pub struct AnnealParams {
    #[arg(long, default_value_t = 1000)]
    pub max_iterations: usize,

    #[arg(long, default_value_t = 100.0)]
    pub initial_temperature: f64,

    /// Geometric decay applied each iteration.
    #[arg(long, default_value_t = 0.95)]
    pub cooling_factor: f64,

    #[arg(long, default_value_t = 0.01)]
    pub min_temperature: f64,
}

impl Default for AnnealParams {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            initial_temperature: 100.0,
            cooling_factor: 0.95,
            min_temperature: 0.01,
        }
    }
}

impl AnnealParams {
    pub fn validate(&self) -> PfResult<()> {
        if self.max_iterations == 0 {
            return Err(PickForgeError::Config("max_iterations must be > 0".into()));
        }
        if !self.initial_temperature.is_finite() || self.initial_temperature <= 0.0 {
            return Err(PickForgeError::Config(format!(
                "initial_temperature {} must be positive",
                self.initial_temperature
            )));
        }
        if !(0.0..1.0).contains(&self.cooling_factor) || self.cooling_factor == 0.0 {
            return Err(PickForgeError::Config(format!(
                "cooling_factor {} outside (0, 1)",
                self.cooling_factor
            )));
        }
        if !self.min_temperature.is_finite() || self.min_temperature <= 0.0 {
            return Err(PickForgeError::Config(format!(
                "min_temperature {} must be positive",
                self.min_temperature
            )));
        }
        Ok(())
    }
}
