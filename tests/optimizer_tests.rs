use pickforge::config::{AnnealParams, SearchParams};
use pickforge::fitness::FitnessEvaluator;
use pickforge::grid::{GridSpec, Position, ProductId, ShelfBlock};
use pickforge::optimizer::{
    Individual, LayoutOptimizer, NoProgress, ProgressCallback, SelectionStrategy,
};
use pickforge::workload::{Order, Workload};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn small_spec() -> GridSpec {
    GridSpec {
        rows: 6,
        cols: 6,
        depot: Position::new(0, 0),
        shelf_blocks: vec![ShelfBlock { row: 1, col: 2, rows: 2, cols: 2 }],
        barriers: vec![],
    }
}

fn small_workload() -> Arc<Workload> {
    let orders = vec![
        Order { products: vec![1, 3] },
        Order { products: vec![2] },
        Order { products: vec![4, 1] },
    ];
    Arc::new(Workload::new(orders).unwrap())
}

fn make_evaluator(seed: u64) -> FitnessEvaluator {
    FitnessEvaluator::new(
        small_spec(),
        small_workload(),
        AnnealParams::default(),
        1000.0,
        seed,
    )
    .unwrap()
}

fn small_params() -> SearchParams {
    SearchParams {
        population_size: 4,
        generations: 1,
        elitism: 1,
        tournament_size: 2,
        ..Default::default()
    }
}

#[test]
fn elitism_keeps_the_best_fitness_from_slipping() {
    // Population 4, one generation, one elite: the elite is cloned forward
    // unchanged, so generation 1 can never score worse than generation 0.
    let mut optimizer =
        LayoutOptimizer::new(small_params(), make_evaluator(21), Some(21)).unwrap();
    let outcome = optimizer.run(&NoProgress);

    assert_eq!(outcome.history.len(), 2);
    assert!(outcome.history[1].best_fitness <= outcome.history[0].best_fitness);
    assert_eq!(
        outcome.best.score(),
        outcome
            .history
            .iter()
            .map(|s| s.best_fitness)
            .fold(f64::INFINITY, f64::min)
    );
}

#[test]
fn best_fitness_is_monotone_across_generations() {
    let params = SearchParams {
        population_size: 6,
        generations: 8,
        elitism: 1,
        tournament_size: 2,
        ..Default::default()
    };
    let mut optimizer = LayoutOptimizer::new(params, make_evaluator(3), Some(3)).unwrap();
    let outcome = optimizer.run(&NoProgress);

    for pair in outcome.history.windows(2) {
        assert!(
            pair[1].best_fitness <= pair[0].best_fitness,
            "elite lost ground between generations {} and {}",
            pair[0].generation,
            pair[1].generation
        );
    }
    assert!(outcome.best.score().is_finite());
}

#[test]
fn best_genes_are_a_valid_permutation() {
    let mut optimizer =
        LayoutOptimizer::new(small_params(), make_evaluator(8), Some(8)).unwrap();
    let outcome = optimizer.run(&NoProgress);

    let mut sorted = outcome.best.genes.clone();
    sorted.sort_unstable();
    let expected: Vec<ProductId> = (1..=4).collect();
    assert_eq!(sorted, expected);
}

#[test]
fn cached_fitness_matches_a_fresh_evaluation() {
    let mut optimizer =
        LayoutOptimizer::new(small_params(), make_evaluator(13), Some(13)).unwrap();
    let outcome = optimizer.run(&NoProgress);

    let fresh = optimizer.evaluator().evaluate(&outcome.best.genes);
    assert_eq!(outcome.best.fitness, Some(fresh));
}

#[test]
fn seeded_runs_are_reproducible() {
    let run = |seed| {
        let mut optimizer =
            LayoutOptimizer::new(small_params(), make_evaluator(seed), Some(seed)).unwrap();
        optimizer.run(&NoProgress)
    };

    let a = run(1717);
    let b = run(1717);
    assert_eq!(a.best.genes, b.best.genes);
    assert_eq!(a.best.fitness, b.best.fitness);
}

struct StopAfter {
    limit: usize,
    seen: AtomicUsize,
}

impl ProgressCallback for StopAfter {
    fn on_generation(&self, _generation: usize, _best: &Individual, _mean: f64) -> bool {
        self.seen.fetch_add(1, Ordering::SeqCst) + 1 < self.limit
    }
}

#[test]
fn callback_can_abort_the_search() {
    let params = SearchParams {
        population_size: 4,
        generations: 50,
        elitism: 1,
        tournament_size: 2,
        ..Default::default()
    };
    let mut optimizer = LayoutOptimizer::new(params, make_evaluator(2), Some(2)).unwrap();

    let stopper = StopAfter {
        limit: 3,
        seen: AtomicUsize::new(0),
    };
    let outcome = optimizer.run(&stopper);

    // Initial stats plus exactly three bred generations.
    assert_eq!(outcome.history.len(), 4);
}

#[test]
fn roulette_selection_runs_end_to_end() {
    let params = SearchParams {
        population_size: 6,
        generations: 3,
        elitism: 1,
        tournament_size: 2,
        selection: SelectionStrategy::Roulette,
        ..Default::default()
    };
    let mut optimizer = LayoutOptimizer::new(params, make_evaluator(5), Some(5)).unwrap();
    let outcome = optimizer.run(&NoProgress);
    assert!(outcome.best.score().is_finite());
}

#[test]
fn invalid_search_params_are_rejected_at_construction() {
    let cases = [
        SearchParams { population_size: 0, ..Default::default() },
        SearchParams { generations: 0, ..Default::default() },
        SearchParams { mutation_rate: 1.5, ..Default::default() },
        SearchParams { elitism: 36, ..Default::default() },
        SearchParams { tournament_size: 0, ..Default::default() },
    ];
    for params in cases {
        assert!(
            LayoutOptimizer::new(params.clone(), make_evaluator(0), Some(0)).is_err(),
            "accepted invalid params {:?}",
            params
        );
    }
}
