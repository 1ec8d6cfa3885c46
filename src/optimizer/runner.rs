use super::{crossover, mutation, selection, Individual};
use crate::config::SearchParams;
use crate::error::PfResult;
use crate::fitness::FitnessEvaluator;
use crate::grid::ProductId;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Receives the state of the search after every generation.
/// Boolean return value indicates if the search should continue (true) or
/// abort (false).
pub trait ProgressCallback: Send + Sync {
    fn on_generation(&self, generation: usize, best: &Individual, mean_fitness: f64) -> bool;
}

pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_generation(&self, _generation: usize, _best: &Individual, _mean: f64) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GenerationStats {
    pub generation: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
}

pub struct OptimizationOutcome {
    pub best: Individual,
    pub history: Vec<GenerationStats>,
}

/// Genetic search over shelf -> product permutations. Breeding follows the
/// empirical schedule of PMX for the early generations and cycle crossover
/// afterwards; fitness values are memoized per unique permutation so a
/// genome is never re-scored across generations.
pub struct LayoutOptimizer {
    params: SearchParams,
    evaluator: FitnessEvaluator,
    rng: fastrand::Rng,
    max_time: Option<Duration>,
    cache: HashMap<Vec<ProductId>, f64>,
}

impl LayoutOptimizer {
    pub fn new(
        params: SearchParams,
        evaluator: FitnessEvaluator,
        seed: Option<u64>,
    ) -> PfResult<Self> {
        params.validate()?;
        let rng = match seed {
            Some(s) => fastrand::Rng::with_seed(s),
            None => fastrand::Rng::new(),
        };
        Ok(Self {
            params,
            evaluator,
            rng,
            max_time: None,
            cache: HashMap::new(),
        })
    }

    pub fn set_max_time(&mut self, limit: Option<Duration>) {
        self.max_time = limit;
    }

    pub fn evaluator(&self) -> &FitnessEvaluator {
        &self.evaluator
    }

    pub fn run<CB: ProgressCallback>(&mut self, callback: &CB) -> OptimizationOutcome {
        let shelf_count = self.evaluator.shelf_count();
        let start_time = Instant::now();

        let mut population: Vec<Individual> = (0..self.params.population_size)
            .map(|_| Individual::random(shelf_count, &mut self.rng))
            .collect();
        self.score_population(&mut population);

        let mut best = best_of(&population).clone();
        let mut history = vec![stats_of(0, &population)];
        let mut patience_counter = 0usize;

        for generation in 0..self.params.generations {
            if let Some(limit) = self.max_time {
                if start_time.elapsed() >= limit {
                    break;
                }
            }

            population = self.breed(&population, generation);
            self.score_population(&mut population);

            let gen_best = best_of(&population);
            let improved = gen_best.score() < best.score();
            if improved {
                best = gen_best.clone();
                patience_counter = 0;
            } else {
                patience_counter += 1;
            }

            let stats = stats_of(generation + 1, &population);
            history.push(stats);

            if !callback.on_generation(generation + 1, &best, stats.mean_fitness) {
                break;
            }
            if self.params.patience > 0 && patience_counter >= self.params.patience {
                break;
            }
        }

        OptimizationOutcome { best, history }
    }

    /// Cache-aware scoring: known genomes take their memoized fitness, the
    /// rest go to the parallel evaluator, and fresh scores feed the memo.
    fn score_population(&mut self, population: &mut [Individual]) {
        for individual in population.iter_mut() {
            if individual.fitness.is_none() {
                if let Some(&fitness) = self.cache.get(&individual.genes) {
                    individual.fitness = Some(fitness);
                }
            }
        }

        self.evaluator.evaluate_population(population);

        for individual in population.iter() {
            if let Some(fitness) = individual.fitness {
                self.cache
                    .entry(individual.genes.clone())
                    .or_insert(fitness);
            }
        }
    }

    fn breed(&mut self, population: &[Individual], generation: usize) -> Vec<Individual> {
        let size = self.params.population_size;
        let mut next = Vec::with_capacity(size);

        // Elites are cloned forward with their cached fitness, capped at a
        // quarter of the population so selection pressure survives small
        // populations.
        let elites = if self.params.elitism == 0 {
            0
        } else {
            self.params.elitism.min((size / 4).max(1))
        };
        if elites > 0 {
            let mut ranked: Vec<&Individual> = population.iter().collect();
            ranked.sort_by(|a, b| a.score().total_cmp(&b.score()));
            for elite in ranked.into_iter().take(elites) {
                next.push(elite.clone());
            }
        }

        while next.len() < size {
            let parent1 = selection::select(
                population,
                self.params.selection,
                self.params.tournament_size,
                &mut self.rng,
            );
            let parent2 = selection::select(
                population,
                self.params.selection,
                self.params.tournament_size,
                &mut self.rng,
            );

            let (child1, child2) = if self.rng.f64() < self.params.crossover_rate {
                if generation < self.params.pmx_limit_generation {
                    crossover::pmx(&parent1.genes, &parent2.genes, &mut self.rng)
                } else {
                    crossover::cycle(&parent1.genes, &parent2.genes)
                }
            } else {
                (parent1.genes.clone(), parent2.genes.clone())
            };

            for mut genes in [child1, child2] {
                if next.len() >= size {
                    break;
                }
                mutation::swap_mutation(&mut genes, self.params.mutation_rate, &mut self.rng);
                if !mutation::is_permutation(&genes) {
                    mutation::repair(&mut genes);
                }
                next.push(Individual::new(genes));
            }
        }

        next
    }
}

fn best_of(population: &[Individual]) -> &Individual {
    population
        .iter()
        .min_by(|a, b| a.score().total_cmp(&b.score()))
        .expect("non-empty population")
}

fn stats_of(generation: usize, population: &[Individual]) -> GenerationStats {
    let best_fitness = best_of(population).score();
    let mean_fitness =
        population.iter().map(Individual::score).sum::<f64>() / population.len() as f64;
    GenerationStats {
        generation,
        best_fitness,
        mean_fitness,
    }
}
