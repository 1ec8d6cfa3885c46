use crate::error::{PfResult, PickForgeError};
use crate::grid::ProductId;
use std::fs::File;
use std::io;
use tracing::warn;

/// One picking trip: an unordered collection of product ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub products: Vec<ProductId>,
}

/// The historical batch of orders a layout is scored against. Read-only
/// after loading and safely shared across evaluation workers.
#[derive(Debug, Clone)]
pub struct Workload {
    orders: Vec<Order>,
}

impl Workload {
    pub fn new(orders: Vec<Order>) -> PfResult<Self> {
        if orders.is_empty() {
            return Err(PickForgeError::Validation(
                "workload contains no usable orders".into(),
            ));
        }
        Ok(Self { orders })
    }

    pub fn load_from_file(path: &str) -> PfResult<Self> {
        let file = File::open(path).map_err(|e| {
            PickForgeError::Validation(format!("could not open orders file '{}': {}", path, e))
        })?;
        Self::from_reader(file)
    }

    /// Parses one order per CSV row. Malformed tokens are skipped with a
    /// warning, never a hard failure; rows left without any valid product
    /// are dropped the same way.
    pub fn from_reader<R: io::Read>(reader: R) -> PfResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut orders = Vec::new();
        for (row_idx, result) in rdr.records().enumerate() {
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    warn!(row = row_idx + 1, error = %e, "skipping unreadable order row");
                    continue;
                }
            };

            let mut products = Vec::new();
            for field in record.iter() {
                let token = field.trim();
                if token.is_empty() {
                    continue;
                }
                match token.parse::<ProductId>() {
                    Ok(p) if p > 0 => products.push(p),
                    _ => {
                        warn!(row = row_idx + 1, token, "skipping malformed product token");
                    }
                }
            }

            if products.is_empty() {
                warn!(row = row_idx + 1, "order row has no valid products, dropped");
                continue;
            }
            orders.push(Order { products });
        }

        Self::new(orders)
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
