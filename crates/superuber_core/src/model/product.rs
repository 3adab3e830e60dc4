//! Catalog product model. Products are seeded outside this service.

use super::ValidationError;
use serde::{Deserialize, Serialize};

pub type ProductId = i64;

/// Stored product row. `price` is in minor currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub description: String,
    pub price: i64,
    pub stock: i64,
    pub available_stock: i64,
    pub id_category: i64,
}

impl Product {
    /// Checks the stock invariant `0 <= available_stock <= stock`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.available_stock < 0 {
            return Err(ValidationError::NegativeAvailableStock {
                available: self.available_stock,
            });
        }
        if self.available_stock > self.stock {
            return Err(ValidationError::AvailableStockExceedsStock {
                available: self.available_stock,
                stock: self.stock,
            });
        }
        Ok(())
    }
}
