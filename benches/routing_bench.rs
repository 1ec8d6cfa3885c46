use criterion::{criterion_group, criterion_main, Criterion};
use pickforge::config::AnnealParams;
use pickforge::fitness::FitnessEvaluator;
use pickforge::grid::{GridSpec, ProductId, WarehouseGrid};
use pickforge::pathfind::PathFinder;
use pickforge::route::{RouteSequencer, ShelfTarget};
use pickforge::workload::{Order, Workload};
use std::hint::black_box;
use std::sync::Arc;

fn bench_pathfind(c: &mut Criterion) {
    let spec = GridSpec::standard();
    let mut grid = WarehouseGrid::from_spec(&spec).unwrap();
    let depot = grid.depot();
    let far_shelf = grid.product_cell(48).unwrap();
    let mut finder = PathFinder::new(&grid);

    c.bench_function("astar_depot_to_far_shelf", |b| {
        b.iter(|| {
            grid.clear_markers();
            black_box(finder.find(&mut grid, depot, far_shelf).unwrap())
        })
    });
}

fn bench_sequence_order(c: &mut Criterion) {
    let spec = GridSpec::standard();
    let mut grid = WarehouseGrid::from_spec(&spec).unwrap();
    let products: Vec<ProductId> = vec![3, 17, 25, 40, 48, 9];
    let targets: Vec<ShelfTarget> = products
        .iter()
        .map(|&product| ShelfTarget {
            product,
            cell: grid.product_cell(product).unwrap(),
        })
        .collect();

    let params = AnnealParams {
        max_iterations: 200,
        ..Default::default()
    };

    c.bench_function("sequence_six_product_order", |b| {
        b.iter(|| {
            grid.clear_markers();
            let mut sequencer = RouteSequencer::with_seed(params.clone(), 42);
            black_box(sequencer.sequence(&mut grid, &targets).unwrap())
        })
    });
}

fn bench_evaluate_candidate(c: &mut Criterion) {
    let spec = GridSpec::standard();
    let orders = vec![
        Order { products: vec![1, 12, 30] },
        Order { products: vec![7, 44] },
        Order { products: vec![21, 22, 23, 24] },
        Order { products: vec![48] },
        Order { products: vec![5, 35, 18] },
    ];
    let workload = Arc::new(Workload::new(orders).unwrap());
    let params = AnnealParams {
        max_iterations: 100,
        ..Default::default()
    };
    let evaluator = FitnessEvaluator::new(spec, workload, params, 1000.0, 7).unwrap();
    let identity: Vec<ProductId> = (1..=48).collect();

    c.bench_function("evaluate_identity_layout", |b| {
        b.iter(|| black_box(evaluator.evaluate(&identity)))
    });
}

criterion_group!(
    benches,
    bench_pathfind,
    bench_sequence_order,
    bench_evaluate_candidate
);
criterion_main!(benches);
