use crate::error::{PfResult, PickForgeError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;

/// Product ids share the shelf-id domain: both run 1..=shelf_count.
pub type ProductId = u16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Euclidean distance between cell centers. Unit-length on orthogonal
    /// moves, but computed rather than assumed so non-grid geometries keep
    /// working.
    pub fn distance(&self, other: &Position) -> f64 {
        let dr = self.row as f64 - other.row as f64;
        let dc = self.col as f64 - other.col as f64;
        (dr * dr + dc * dc).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Free,
    Depot,
    Barrier,
    /// Stable shelf id in 1..=shelf_count, assigned in row-major scan order
    /// at construction. The id never moves; only the product label does.
    Shelf(u16),
}

/// Per-cell visualization annotation. Irrelevant to search correctness;
/// reset via [`WarehouseGrid::clear_markers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Marker {
    #[default]
    None,
    Open,
    Visited,
    Path,
}

/// Axis-aligned rectangle of shelf cells.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShelfBlock {
    pub row: usize,
    pub col: usize,
    pub rows: usize,
    pub cols: usize,
}

impl ShelfBlock {
    fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.row && row < self.row + self.rows && col >= self.col && col < self.col + self.cols
    }
}

/// Static floor geometry: read once at construction, never reshaped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSpec {
    pub rows: usize,
    pub cols: usize,
    pub depot: Position,
    pub shelf_blocks: Vec<ShelfBlock>,
    #[serde(default)]
    pub barriers: Vec<Position>,
}

impl GridSpec {
    /// The standard 11x13 floor: three double-column shelf bands split by a
    /// free middle aisle, 48 shelves, depot on the left end of the aisle.
    pub fn standard() -> Self {
        let mut shelf_blocks = Vec::new();
        for band_col in [2usize, 6, 10] {
            for band_row in [1usize, 6] {
                shelf_blocks.push(ShelfBlock {
                    row: band_row,
                    col: band_col,
                    rows: 4,
                    cols: 2,
                });
            }
        }
        Self {
            rows: 11,
            cols: 13,
            depot: Position::new(5, 0),
            shelf_blocks,
            barriers: Vec::new(),
        }
    }

    pub fn load_from_file(path: &str) -> PfResult<Self> {
        let content = fs::read_to_string(path)?;
        let spec: GridSpec = serde_json::from_str(&content)?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> PfResult<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(PickForgeError::Config(format!(
                "grid must be non-empty, got {}x{}",
                self.rows, self.cols
            )));
        }
        let mut taken = vec![false; self.rows * self.cols];
        for (i, b) in self.shelf_blocks.iter().enumerate() {
            if b.rows == 0 || b.cols == 0 || b.row + b.rows > self.rows || b.col + b.cols > self.cols {
                return Err(PickForgeError::Config(format!(
                    "shelf block #{} does not fit a {}x{} grid",
                    i, self.rows, self.cols
                )));
            }
            for r in b.row..b.row + b.rows {
                for c in b.col..b.col + b.cols {
                    let idx = r * self.cols + c;
                    if taken[idx] {
                        return Err(PickForgeError::Config(format!(
                            "shelf blocks overlap at ({}, {})",
                            r, c
                        )));
                    }
                    taken[idx] = true;
                }
            }
        }
        for p in &self.barriers {
            if p.row >= self.rows || p.col >= self.cols {
                return Err(PickForgeError::Config(format!(
                    "barrier ({}, {}) out of bounds",
                    p.row, p.col
                )));
            }
            let idx = p.row * self.cols + p.col;
            if taken[idx] {
                return Err(PickForgeError::Config(format!(
                    "barrier ({}, {}) collides with a shelf block",
                    p.row, p.col
                )));
            }
            taken[idx] = true;
        }
        if self.depot.row >= self.rows || self.depot.col >= self.cols {
            return Err(PickForgeError::Config("depot out of bounds".into()));
        }
        if taken[self.depot.row * self.cols + self.depot.col] {
            return Err(PickForgeError::Config(
                "depot collides with a shelf block or barrier".into(),
            ));
        }
        Ok(())
    }

    pub fn shelf_count(&self) -> usize {
        self.shelf_blocks.iter().map(|b| b.rows * b.cols).sum()
    }
}

/// Fixed-topology warehouse floor. After construction only the product
/// labels on shelf cells and the depot position may change.
#[derive(Debug, Clone)]
pub struct WarehouseGrid {
    rows: usize,
    cols: usize,
    cells: Vec<CellKind>,
    markers: Vec<Marker>,
    depot: Position,
    /// Cell index per shelf rank; shelf id = rank + 1.
    shelf_cells: Vec<usize>,
    /// Product label per shelf rank.
    products: Vec<ProductId>,
    /// product id -> cell index; slot 0 unused. Always a bijection over the
    /// shelf cells once a layout is applied.
    product_index: Vec<Option<usize>>,
}

impl WarehouseGrid {
    pub fn from_spec(spec: &GridSpec) -> PfResult<Self> {
        spec.validate()?;

        let mut cells = vec![CellKind::Free; spec.rows * spec.cols];
        let mut shelf_cells = Vec::new();

        // Row-major scan keeps shelf ids stable regardless of block order.
        let mut next_id: u16 = 1;
        for row in 0..spec.rows {
            for col in 0..spec.cols {
                if spec.shelf_blocks.iter().any(|b| b.contains(row, col)) {
                    let idx = row * spec.cols + col;
                    cells[idx] = CellKind::Shelf(next_id);
                    shelf_cells.push(idx);
                    next_id += 1;
                }
            }
        }
        for p in &spec.barriers {
            cells[p.row * spec.cols + p.col] = CellKind::Barrier;
        }
        cells[spec.depot.row * spec.cols + spec.depot.col] = CellKind::Depot;

        let n = shelf_cells.len();
        let mut grid = Self {
            rows: spec.rows,
            cols: spec.cols,
            markers: vec![Marker::None; cells.len()],
            cells,
            depot: spec.depot,
            shelf_cells,
            products: (1..=n as u16).collect(),
            product_index: vec![None; n + 1],
        };
        grid.rebuild_product_index();
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shelf_count(&self) -> usize {
        self.shelf_cells.len()
    }

    pub fn depot(&self) -> Position {
        self.depot
    }

    pub fn index(&self, pos: Position) -> usize {
        pos.row * self.cols + pos.col
    }

    pub fn position(&self, index: usize) -> Position {
        Position::new(index / self.cols, index % self.cols)
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    pub fn cell(&self, pos: Position) -> CellKind {
        self.cells[self.index(pos)]
    }

    pub fn walkable(&self, pos: Position) -> bool {
        matches!(self.cell(pos), CellKind::Free | CellKind::Depot)
    }

    /// Up to 4 orthogonal neighbors: in-bounds, never a Barrier, and a Shelf
    /// only when it is the current search's target (shelves carry no through
    /// traffic).
    pub fn neighbors(&self, pos: Position, shelf_target: Option<Position>) -> Vec<Position> {
        let mut out = Vec::with_capacity(4);
        let candidates = [
            (pos.row.wrapping_sub(1), pos.col),
            (pos.row + 1, pos.col),
            (pos.row, pos.col.wrapping_sub(1)),
            (pos.row, pos.col + 1),
        ];
        for (row, col) in candidates {
            let p = Position::new(row, col);
            if !self.in_bounds(p) {
                continue;
            }
            match self.cell(p) {
                CellKind::Free | CellKind::Depot => out.push(p),
                CellKind::Shelf(_) if shelf_target == Some(p) => out.push(p),
                _ => {}
            }
        }
        out
    }

    /// Walkable cells orthogonally adjacent to a shelf: the positions a
    /// picker may stand on to serve it.
    pub fn pick_faces(&self, shelf: Position) -> Vec<Position> {
        let mut out = Vec::with_capacity(4);
        let candidates = [
            (shelf.row.wrapping_sub(1), shelf.col),
            (shelf.row + 1, shelf.col),
            (shelf.row, shelf.col.wrapping_sub(1)),
            (shelf.row, shelf.col + 1),
        ];
        for (row, col) in candidates {
            let p = Position::new(row, col);
            if self.in_bounds(p) && self.walkable(p) {
                out.push(p);
            }
        }
        out
    }

    /// Shelf and Barrier cells, for external occupancy checks.
    pub fn occupied_positions(&self) -> HashSet<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, k)| matches!(k, CellKind::Shelf(_) | CellKind::Barrier))
            .map(|(i, _)| self.position(i))
            .collect()
    }

    /// Moves the depot to a Free cell. The old depot cell becomes Free.
    pub fn set_depot(&mut self, pos: Position) -> PfResult<()> {
        if !self.in_bounds(pos) {
            return Err(PickForgeError::Validation(format!(
                "depot ({}, {}) out of bounds",
                pos.row, pos.col
            )));
        }
        if pos == self.depot {
            return Ok(());
        }
        if self.cell(pos) != CellKind::Free {
            return Err(PickForgeError::Validation(format!(
                "depot target ({}, {}) is not a free cell",
                pos.row, pos.col
            )));
        }
        let old = self.index(self.depot);
        self.cells[old] = CellKind::Free;
        let new = self.index(pos);
        self.cells[new] = CellKind::Depot;
        self.depot = pos;
        Ok(())
    }

    /// Relabels a single shelf. The product index is rebuilt afterwards;
    /// bijection over all shelves is only guaranteed through
    /// [`apply_layout`](Self::apply_layout).
    pub fn assign_product(&mut self, shelf_id: u16, product: ProductId) -> PfResult<()> {
        let n = self.shelf_count() as u16;
        if shelf_id == 0 || shelf_id > n {
            return Err(PickForgeError::Validation(format!(
                "shelf id {} outside 1..={}",
                shelf_id, n
            )));
        }
        if product == 0 || product > n {
            return Err(PickForgeError::Validation(format!(
                "product id {} outside 1..={}",
                product, n
            )));
        }
        self.products[(shelf_id - 1) as usize] = product;
        self.rebuild_product_index();
        Ok(())
    }

    /// Applies a full shelf -> product permutation: `layout[rank]` is the
    /// product stored on shelf `rank + 1`. Rejects anything that is not a
    /// bijection over 1..=shelf_count, since downstream indexing assumes one.
    pub fn apply_layout(&mut self, layout: &[ProductId]) -> PfResult<()> {
        let n = self.shelf_count();
        if layout.len() != n {
            return Err(PickForgeError::Validation(format!(
                "layout has {} entries for {} shelves",
                layout.len(),
                n
            )));
        }
        let mut seen = vec![false; n + 1];
        for &p in layout {
            if p == 0 || p as usize > n || seen[p as usize] {
                return Err(PickForgeError::Validation(format!(
                    "layout is not a permutation of 1..={}: bad id {}",
                    n, p
                )));
            }
            seen[p as usize] = true;
        }
        self.products.copy_from_slice(layout);
        self.rebuild_product_index();
        Ok(())
    }

    fn rebuild_product_index(&mut self) {
        for slot in self.product_index.iter_mut() {
            *slot = None;
        }
        for (rank, &product) in self.products.iter().enumerate() {
            self.product_index[product as usize] = Some(self.shelf_cells[rank]);
        }
    }

    pub fn product_cell(&self, product: ProductId) -> Option<Position> {
        self.product_index
            .get(product as usize)
            .copied()
            .flatten()
            .map(|idx| self.position(idx))
    }

    pub fn shelf_cell(&self, shelf_id: u16) -> Option<Position> {
        if shelf_id == 0 {
            return None;
        }
        self.shelf_cells
            .get((shelf_id - 1) as usize)
            .map(|&idx| self.position(idx))
    }

    pub fn product_at(&self, shelf_id: u16) -> Option<ProductId> {
        if shelf_id == 0 {
            return None;
        }
        self.products.get((shelf_id - 1) as usize).copied()
    }

    pub fn layout(&self) -> &[ProductId] {
        &self.products
    }

    pub fn marker(&self, pos: Position) -> Marker {
        self.markers[self.index(pos)]
    }

    pub fn set_marker(&mut self, pos: Position, marker: Marker) {
        let idx = self.index(pos);
        self.markers[idx] = marker;
    }

    /// Resets per-search annotations without touching topology or labels.
    pub fn clear_markers(&mut self) {
        for m in self.markers.iter_mut() {
            *m = Marker::None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_floor_has_48_shelves_and_a_depot() {
        let grid = WarehouseGrid::from_spec(&GridSpec::standard()).unwrap();
        assert_eq!(grid.shelf_count(), 48);
        assert_eq!(grid.cell(Position::new(5, 0)), CellKind::Depot);
        assert_eq!(grid.occupied_positions().len(), 48);
    }

    #[test]
    fn shelf_ids_are_stable_and_row_major() {
        let grid = WarehouseGrid::from_spec(&GridSpec::standard()).unwrap();
        assert_eq!(grid.cell(Position::new(1, 2)), CellKind::Shelf(1));
        assert_eq!(grid.cell(Position::new(1, 3)), CellKind::Shelf(2));
        assert_eq!(grid.cell(Position::new(1, 6)), CellKind::Shelf(3));
        // Identity layout at construction.
        assert_eq!(grid.product_cell(1), Some(Position::new(1, 2)));
    }

    #[test]
    fn neighbors_exclude_shelves_unless_targeted() {
        let grid = WarehouseGrid::from_spec(&GridSpec::standard()).unwrap();
        let aisle = Position::new(1, 1);
        let shelf = Position::new(1, 2);
        assert!(!grid.neighbors(aisle, None).contains(&shelf));
        assert!(grid.neighbors(aisle, Some(shelf)).contains(&shelf));
    }

    #[test]
    fn neighbors_exclude_barriers_and_out_of_bounds() {
        let spec = GridSpec {
            rows: 3,
            cols: 3,
            depot: Position::new(0, 0),
            shelf_blocks: vec![],
            barriers: vec![Position::new(0, 1)],
        };
        let grid = WarehouseGrid::from_spec(&spec).unwrap();
        let n = grid.neighbors(Position::new(0, 0), None);
        assert_eq!(n, vec![Position::new(1, 0)]);
    }

    #[test]
    fn apply_layout_rejects_non_bijections() {
        let mut grid = WarehouseGrid::from_spec(&GridSpec::standard()).unwrap();
        let mut layout: Vec<ProductId> = (1..=48).collect();
        layout[0] = 2; // duplicate
        assert!(grid.apply_layout(&layout).is_err());
        layout[0] = 49; // out of domain
        assert!(grid.apply_layout(&layout).is_err());
        layout[0] = 1;
        assert!(grid.apply_layout(&layout).is_ok());
    }

    #[test]
    fn apply_layout_rebuilds_the_product_mapping() {
        let mut grid = WarehouseGrid::from_spec(&GridSpec::standard()).unwrap();
        let mut layout: Vec<ProductId> = (1..=48).collect();
        layout.swap(0, 47);
        grid.apply_layout(&layout).unwrap();
        assert_eq!(grid.product_cell(48), grid.shelf_cell(1));
        assert_eq!(grid.product_cell(1), grid.shelf_cell(48));
    }

    #[test]
    fn assign_product_relabels_a_single_shelf() {
        let mut grid = WarehouseGrid::from_spec(&GridSpec::standard()).unwrap();
        grid.assign_product(1, 48).unwrap();
        grid.assign_product(48, 1).unwrap();
        assert_eq!(grid.product_at(1), Some(48));
        assert_eq!(grid.product_cell(48), grid.shelf_cell(1));
        assert_eq!(grid.product_cell(1), grid.shelf_cell(48));
        assert!(grid.assign_product(0, 1).is_err());
        assert!(grid.assign_product(1, 49).is_err());
    }

    #[test]
    fn set_depot_moves_without_reshaping() {
        let mut grid = WarehouseGrid::from_spec(&GridSpec::standard()).unwrap();
        let target = Position::new(0, 0);
        grid.set_depot(target).unwrap();
        assert_eq!(grid.cell(target), CellKind::Depot);
        assert_eq!(grid.cell(Position::new(5, 0)), CellKind::Free);
        assert!(grid.set_depot(Position::new(1, 2)).is_err()); // shelf cell
    }

    #[test]
    fn spec_rejects_overlapping_blocks() {
        let spec = GridSpec {
            rows: 5,
            cols: 5,
            depot: Position::new(0, 0),
            shelf_blocks: vec![
                ShelfBlock { row: 1, col: 1, rows: 2, cols: 2 },
                ShelfBlock { row: 2, col: 2, rows: 2, cols: 2 },
            ],
            barriers: vec![],
        };
        assert!(spec.validate().is_err());
    }
}
