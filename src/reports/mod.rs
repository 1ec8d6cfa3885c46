use comfy_table::presets::ASCII_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use pickforge::grid::{CellKind, Marker, Position, WarehouseGrid};
use pickforge::optimizer::GenerationStats;
use pickforge::workload::Workload;

/// ASCII floor map: shelves show their product label, `*` marks a routed
/// cell, `#` a barrier.
pub fn print_floor_map(grid: &WarehouseGrid) {
    println!("\n--- FLOOR ---");
    for row in 0..grid.rows() {
        let mut line = String::new();
        for col in 0..grid.cols() {
            let pos = Position::new(row, col);
            let token = match grid.cell(pos) {
                CellKind::Depot => "  D".to_string(),
                CellKind::Barrier => "  #".to_string(),
                CellKind::Shelf(id) => match grid.product_at(id) {
                    Some(product) => format!("{:>3}", product),
                    None => "  ?".to_string(),
                },
                CellKind::Free => {
                    if grid.marker(pos) == Marker::Path {
                        "  *".to_string()
                    } else {
                        "  .".to_string()
                    }
                }
            };
            line.push_str(&token);
        }
        println!("{}", line);
    }
}

pub fn print_assignment(grid: &WarehouseGrid) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Shelf", "Cell", "Product"]);

    for shelf_id in 1..=grid.shelf_count() as u16 {
        let cell = grid.shelf_cell(shelf_id).expect("shelf id in range");
        let product = grid.product_at(shelf_id).expect("shelf id in range");
        table.add_row(vec![
            Cell::new(shelf_id).set_alignment(CellAlignment::Right),
            Cell::new(format!("({}, {})", cell.row, cell.col)),
            Cell::new(product).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("\n--- ASSIGNMENT ---\n{table}");
}

pub fn print_history(history: &[GenerationStats]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Gen", "Best", "Mean"]);

    for stats in history {
        table.add_row(vec![
            Cell::new(stats.generation).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}", stats.best_fitness)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}", stats.mean_fitness)).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("\n--- SEARCH HISTORY ---\n{table}");
}

pub fn print_order_costs(workload: &Workload, costs: &[f64]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Order", "Items", "Cost"]);

    for (idx, (order, cost)) in workload.orders().iter().zip(costs).enumerate() {
        table.add_row(vec![
            Cell::new(idx + 1).set_alignment(CellAlignment::Right),
            Cell::new(order.products.len()).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}", cost)).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("\n--- ORDER COSTS ---\n{table}");
}

/// Traffic intensity per cell over the whole workload, dimmest to brightest.
pub fn print_heatmap(grid: &WarehouseGrid, counts: &[u32]) {
    const SCALE: [char; 8] = [' ', '.', ':', '-', '=', '+', '#', '@'];
    let max = counts.iter().copied().max().unwrap_or(0);

    println!("\n--- TRAFFIC ---");
    for row in 0..grid.rows() {
        let mut line = String::new();
        for col in 0..grid.cols() {
            let pos = Position::new(row, col);
            let ch = match grid.cell(pos) {
                CellKind::Shelf(_) => '▢',
                CellKind::Barrier => '█',
                _ => {
                    let count = counts[grid.index(pos)];
                    if max == 0 {
                        SCALE[0]
                    } else {
                        let bucket = (count as usize * (SCALE.len() - 1)) / max as usize;
                        SCALE[bucket]
                    }
                }
            };
            line.push(ch);
            line.push(' ');
        }
        println!("{}", line);
    }
}
