use crate::config::AnnealParams;
use crate::grid::{Position, ProductId, WarehouseGrid};
use crate::pathfind::{PathFinder, Route};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteError {
    #[error("no route can reach product {product} for this order")]
    UnreachableOrder { product: ProductId },
}

/// An order's product id resolved to the shelf cell currently holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShelfTarget {
    pub product: ProductId,
    pub cell: Position,
}

#[derive(Debug, Clone)]
pub struct SequencedRoute {
    /// Stitched walk depot -> pick faces -> depot.
    pub route: Route,
    /// Products in the order they are served.
    pub visit_order: Vec<ProductId>,
    /// Total moves, equal to `route.edge_count()`.
    pub cost: u32,
}

/// Observer for annealing progress; all hooks default to no-ops so the
/// sequencer works identically with nothing attached.
pub trait AnnealObserver {
    fn on_iteration(&self, _iteration: usize, _temperature: f64, _best_cost: f64) {}
}

pub struct NoopObserver;

impl AnnealObserver for NoopObserver {}

type LegCache = HashMap<(Position, Position), Option<(u32, Position)>>;

/// Orders an order's targets by simulated annealing over visit permutations
/// and stitches the winning permutation into one route. Each leg is priced
/// by A* from the previous leg's terminal cell; leg costs are memoized per
/// run since the annealing loop re-prices the same legs constantly.
pub struct RouteSequencer {
    params: AnnealParams,
    rng: fastrand::Rng,
}

impl RouteSequencer {
    pub fn new(params: AnnealParams) -> Self {
        Self {
            params,
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(params: AnnealParams, seed: u64) -> Self {
        Self {
            params,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    pub fn sequence(
        &mut self,
        grid: &mut WarehouseGrid,
        targets: &[ShelfTarget],
    ) -> Result<SequencedRoute, RouteError> {
        self.sequence_observed(grid, targets, &NoopObserver)
    }

    pub fn sequence_observed<O: AnnealObserver>(
        &mut self,
        grid: &mut WarehouseGrid,
        targets: &[ShelfTarget],
        observer: &O,
    ) -> Result<SequencedRoute, RouteError> {
        if targets.is_empty() {
            return Ok(SequencedRoute {
                route: Route::empty(),
                visit_order: Vec::new(),
                cost: 0,
            });
        }

        let depot = grid.depot();
        let mut finder = PathFinder::new(grid);
        let mut cache = LegCache::new();

        let order = if targets.len() == 1 {
            vec![0]
        } else {
            self.anneal(grid, targets, depot, &mut finder, &mut cache, observer)
        };

        self.stitch(grid, targets, depot, &order, &mut finder)
    }

    fn anneal<O: AnnealObserver>(
        &mut self,
        grid: &mut WarehouseGrid,
        targets: &[ShelfTarget],
        depot: Position,
        finder: &mut PathFinder,
        cache: &mut LegCache,
        observer: &O,
    ) -> Vec<usize> {
        let mut current: Vec<usize> = (0..targets.len()).collect();
        self.rng.shuffle(&mut current);

        let mut current_cost = permutation_cost(grid, targets, depot, &current, finder, cache);
        let mut best = current.clone();
        let mut best_cost = current_cost;

        let mut temperature = self.params.initial_temperature;
        for iteration in 0..self.params.max_iterations {
            if temperature < self.params.min_temperature {
                break;
            }

            let mut candidate = current.clone();
            let i = self.rng.usize(0..candidate.len());
            let mut j = self.rng.usize(0..candidate.len());
            while j == i {
                j = self.rng.usize(0..candidate.len());
            }
            candidate.swap(i, j);

            let candidate_cost =
                permutation_cost(grid, targets, depot, &candidate, finder, cache);

            // Metropolis criterion; infinite-cost deltas produce NaN and the
            // comparisons below correctly reject them.
            let delta = candidate_cost - current_cost;
            if delta < 0.0 || self.rng.f64() < (-delta / temperature).exp() {
                current = candidate;
                current_cost = candidate_cost;
                if current_cost < best_cost {
                    best = current.clone();
                    best_cost = current_cost;
                }
            }

            observer.on_iteration(iteration, temperature, best_cost);
            temperature *= self.params.cooling_factor;
        }

        best
    }

    fn stitch(
        &self,
        grid: &mut WarehouseGrid,
        targets: &[ShelfTarget],
        depot: Position,
        order: &[usize],
        finder: &mut PathFinder,
    ) -> Result<SequencedRoute, RouteError> {
        let mut route = Route::empty();
        let mut visit_order = Vec::with_capacity(order.len());
        let mut current = depot;

        for &idx in order {
            let target = targets[idx];
            let leg = finder
                .find(grid, current, target.cell)
                .map_err(|_| RouteError::UnreachableOrder {
                    product: target.product,
                })?;
            current = leg.terminal().unwrap_or(current);
            route.append(&leg);
            visit_order.push(target.product);
        }

        // Close the loop back to the depot; a failed return leg voids the
        // whole order rather than silently truncating it.
        let last_product = targets[*order.last().expect("non-empty order")].product;
        let leg = finder
            .find(grid, current, depot)
            .map_err(|_| RouteError::UnreachableOrder {
                product: last_product,
            })?;
        route.append(&leg);

        let cost = route.edge_count() as u32;
        Ok(SequencedRoute {
            route,
            visit_order,
            cost,
        })
    }
}

/// Cost of serving the targets in the given order and returning to the
/// depot: the sum of leg edge counts, or infinity when any leg fails.
fn permutation_cost(
    grid: &mut WarehouseGrid,
    targets: &[ShelfTarget],
    depot: Position,
    order: &[usize],
    finder: &mut PathFinder,
    cache: &mut LegCache,
) -> f64 {
    let mut total = 0u64;
    let mut current = depot;

    for &idx in order {
        match leg_cost(grid, finder, cache, current, targets[idx].cell) {
            Some((cost, end)) => {
                total += cost as u64;
                current = end;
            }
            None => return f64::INFINITY,
        }
    }
    match leg_cost(grid, finder, cache, current, depot) {
        Some((cost, _)) => total += cost as u64,
        None => return f64::INFINITY,
    }

    total as f64
}

fn leg_cost(
    grid: &mut WarehouseGrid,
    finder: &mut PathFinder,
    cache: &mut LegCache,
    from: Position,
    to: Position,
) -> Option<(u32, Position)> {
    if let Some(cached) = cache.get(&(from, to)) {
        return *cached;
    }
    let priced = finder
        .find(grid, from, to)
        .ok()
        .map(|route| (route.edge_count() as u32, route.terminal().unwrap_or(from)));
    cache.insert((from, to), priced);
    priced
}
