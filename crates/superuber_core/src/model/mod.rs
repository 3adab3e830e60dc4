//! Domain records for users, products, orders and payment profiles.
//!
//! # Responsibility
//! - Define the row-shaped entities exchanged with repositories and handlers.
//! - Own the field-level validation rules applied before every write.
//!
//! # Invariants
//! - Identifiers are store-assigned `i64` row ids; `0` never names a stored row.
//! - Entities are snapshots; the store remains the only authoritative copy.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod client;
pub mod order;
pub mod product;
pub mod user;

/// Caller-supplied data failed a write precondition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty.
    EmptyField(&'static str),
    /// An order was submitted without a product reference.
    MissingProductReference,
    /// A product row reports a negative available count.
    NegativeAvailableStock { available: i64 },
    /// A product row reports more available units than it stocks.
    AvailableStockExceedsStock { available: i64, stock: i64 },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "field `{field}` must not be empty"),
            Self::MissingProductReference => write!(f, "order requires a product reference"),
            Self::NegativeAvailableStock { available } => {
                write!(f, "available stock {available} is negative")
            }
            Self::AvailableStockExceedsStock { available, stock } => write!(
                f,
                "available stock {available} exceeds stock {stock}"
            ),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}
