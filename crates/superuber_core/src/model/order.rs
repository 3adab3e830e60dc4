//! Order model and fulfillment lifecycle.
//!
//! # Invariants
//! - `id_product` is non-zero for every stored order.
//! - Orders are immutable after placement except for `fulfilled`, which only
//!   moves from `false` to `true`.

use super::product::ProductId;
use super::user::UserId;
use super::ValidationError;
use serde::{Deserialize, Serialize};

pub type OrderId = i64;

/// Stored order row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub id_user: UserId,
    pub order_number: i64,
    pub id_product: ProductId,
    pub fulfilled: bool,
}

impl Order {
    pub fn state(&self) -> OrderState {
        if self.fulfilled {
            OrderState::Verified
        } else {
            OrderState::Placed
        }
    }
}

/// Lifecycle stage derived from the fulfillment flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    Placed,
    Verified,
}

/// Placement input. Accepts both wire spellings of the reference fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewOrder {
    #[serde(alias = "idUser")]
    pub id_user: UserId,
    #[serde(alias = "idProduct")]
    pub id_product: ProductId,
    #[serde(alias = "orderNumber")]
    pub order_number: i64,
}

impl NewOrder {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id_product == 0 {
            return Err(ValidationError::MissingProductReference);
        }
        Ok(())
    }
}
