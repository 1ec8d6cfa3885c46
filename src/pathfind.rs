use crate::grid::{CellKind, Marker, Position, WarehouseGrid};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    #[error("open set exhausted before reaching the goal")]
    NoPath,

    #[error("shelf target has no accessible adjacent cell")]
    NoAccessibleAdjacency,
}

/// An ordered walk over the grid. Consecutive positions are 4-adjacent and
/// never cross a Barrier or a Shelf cell; a shelf target is served from an
/// adjacent pick face, so shelf positions never appear in a route.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Route {
    positions: Vec<Position>,
}

impl Route {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_positions(positions: Vec<Position>) -> Self {
        Self { positions }
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of moves, the cost unit used throughout fitness accounting.
    pub fn edge_count(&self) -> usize {
        self.positions.len().saturating_sub(1)
    }

    pub fn terminal(&self) -> Option<Position> {
        self.positions.last().copied()
    }

    /// Appends a leg whose first position duplicates this route's terminal.
    pub fn append(&mut self, leg: &Route) {
        if self.positions.is_empty() {
            self.positions.extend_from_slice(&leg.positions);
        } else {
            debug_assert_eq!(self.terminal(), leg.positions.first().copied());
            self.positions.extend_from_slice(&leg.positions[1..]);
        }
    }
}

#[derive(Debug)]
struct OpenNode {
    f: f64,
    seq: u64,
    index: usize,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.seq == other.seq
    }
}

impl Eq for OpenNode {}

impl Ord for OpenNode {
    // BinaryHeap is a max-heap: invert so the lowest f pops first, and among
    // equal f the earliest-inserted node wins (deterministic tie-break).
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* over the warehouse grid. All per-search state (g-cost, predecessor,
/// closed flags) lives in index-addressed side tables owned by this value
/// and reset on every call, so repeated and concurrent searches can never
/// contaminate each other through cell state. Grid markers are written only
/// for visualization.
pub struct PathFinder {
    g: Vec<f64>,
    parent: Vec<usize>,
    closed: Vec<bool>,
}

const NO_PARENT: usize = usize::MAX;

impl PathFinder {
    pub fn new(grid: &WarehouseGrid) -> Self {
        let cells = grid.rows() * grid.cols();
        Self {
            g: vec![f64::INFINITY; cells],
            parent: vec![NO_PARENT; cells],
            closed: vec![false; cells],
        }
    }

    /// Shortest route from `start` to `goal`. A Shelf goal is reached by
    /// standing on any of its pick faces; a goal with no pick face fails
    /// immediately with `NoAccessibleAdjacency`.
    pub fn find(
        &mut self,
        grid: &mut WarehouseGrid,
        start: Position,
        goal: Position,
    ) -> Result<Route, PathError> {
        if !grid.in_bounds(start) || !grid.in_bounds(goal) || !grid.walkable(start) {
            return Err(PathError::NoPath);
        }

        let (shelf_target, faces) = match grid.cell(goal) {
            CellKind::Shelf(_) => {
                let faces = grid.pick_faces(goal);
                if faces.is_empty() {
                    return Err(PathError::NoAccessibleAdjacency);
                }
                (Some(goal), faces)
            }
            CellKind::Barrier => return Err(PathError::NoPath),
            CellKind::Free | CellKind::Depot => (None, Vec::new()),
        };

        let is_goal = |pos: Position| -> bool {
            match shelf_target {
                Some(_) => faces.contains(&pos),
                None => pos == goal,
            }
        };
        let heuristic = |pos: Position| -> f64 {
            match shelf_target {
                Some(_) => faces
                    .iter()
                    .map(|f| pos.distance(f))
                    .fold(f64::INFINITY, f64::min),
                None => pos.distance(&goal),
            }
        };

        self.reset(grid.rows() * grid.cols());

        if is_goal(start) {
            grid.set_marker(start, Marker::Path);
            return Ok(Route::from_positions(vec![start]));
        }

        let mut open = BinaryHeap::new();
        let mut seq: u64 = 0;

        let start_idx = grid.index(start);
        self.g[start_idx] = 0.0;
        open.push(OpenNode {
            f: heuristic(start),
            seq,
            index: start_idx,
        });
        grid.set_marker(start, Marker::Open);

        while let Some(node) = open.pop() {
            let current_idx = node.index;
            if self.closed[current_idx] {
                continue;
            }
            self.closed[current_idx] = true;

            let current = grid.position(current_idx);
            grid.set_marker(current, Marker::Visited);

            if is_goal(current) {
                return Ok(self.reconstruct(grid, current_idx));
            }

            for neighbor in grid.neighbors(current, shelf_target) {
                let neighbor_idx = grid.index(neighbor);
                if self.closed[neighbor_idx] {
                    continue;
                }
                let tentative = self.g[current_idx] + current.distance(&neighbor);
                if tentative < self.g[neighbor_idx] {
                    self.parent[neighbor_idx] = current_idx;
                    self.g[neighbor_idx] = tentative;
                    seq += 1;
                    open.push(OpenNode {
                        f: tentative + heuristic(neighbor),
                        seq,
                        index: neighbor_idx,
                    });
                    grid.set_marker(neighbor, Marker::Open);
                }
            }
        }

        Err(PathError::NoPath)
    }

    fn reset(&mut self, cells: usize) {
        self.g.clear();
        self.g.resize(cells, f64::INFINITY);
        self.parent.clear();
        self.parent.resize(cells, NO_PARENT);
        self.closed.clear();
        self.closed.resize(cells, false);
    }

    fn reconstruct(&self, grid: &mut WarehouseGrid, end_idx: usize) -> Route {
        let mut positions = Vec::new();
        let mut idx = end_idx;
        loop {
            positions.push(grid.position(idx));
            if self.parent[idx] == NO_PARENT {
                break;
            }
            idx = self.parent[idx];
        }
        positions.reverse();
        for &pos in &positions {
            grid.set_marker(pos, Marker::Path);
        }
        Route::from_positions(positions)
    }
}
