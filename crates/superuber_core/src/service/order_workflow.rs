//! Order placement and verification.
//!
//! # Responsibility
//! - Place orders linking a user, a product and an order number.
//! - Verify orders under a configurable policy.
//! - Expose the `Placed -> Verified` transition as its own operation.
//!
//! # Invariants
//! - There is no transition out of `Verified`.
//! - Under `VerificationPolicy::Literal` verification never writes.

use crate::model::order::{NewOrder, Order, OrderId};
use crate::repo::order_repo::{FulfillmentChange, OrderRepository};
use crate::repo::RepoResult;
use log::{info, warn};
use std::str::FromStr;

/// How `verify_order` treats the order lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VerificationPolicy {
    /// A failed lookup (missing row or store error) reports `Complete`; a found
    /// order reports `Pending` and is left untouched.
    #[default]
    Literal,
    /// A found order is marked fulfilled; a missing order is an error.
    MarkFulfilled,
}

impl FromStr for VerificationPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "literal" => Ok(Self::Literal),
            "mark_fulfilled" | "mark-fulfilled" => Ok(Self::MarkFulfilled),
            other => Err(format!(
                "unsupported verification policy `{other}`; expected literal|mark_fulfilled"
            )),
        }
    }
}

/// Result reported by `verify_order`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationResult {
    Complete,
    Pending,
    Fulfilled,
    AlreadyFulfilled,
}

impl VerificationResult {
    pub fn message(self) -> &'static str {
        match self {
            Self::Complete => "Verify Complete",
            Self::Pending => "Pending",
            Self::Fulfilled => "Fulfilled",
            Self::AlreadyFulfilled => "Already Fulfilled",
        }
    }
}

pub struct OrderWorkflow<R: OrderRepository> {
    repo: R,
    policy: VerificationPolicy,
}

impl<R: OrderRepository> OrderWorkflow<R> {
    pub fn new(repo: R, policy: VerificationPolicy) -> Self {
        Self { repo, policy }
    }

    /// Places an order. A zero product reference fails validation without a write.
    pub fn place_order(&self, order: &NewOrder) -> RepoResult<Order> {
        let placed = self.repo.create_order(order)?;
        info!(
            "event=order_place module=workflow status=ok order_id={} order_number={} product_id={}",
            placed.id, placed.order_number, placed.id_product
        );
        Ok(placed)
    }

    pub fn get_order(&self, id: OrderId) -> RepoResult<Order> {
        self.repo.get_order(id)
    }

    pub fn verify_order(&self, id: OrderId) -> RepoResult<VerificationResult> {
        match self.policy {
            VerificationPolicy::Literal => Ok(self.verify_literal(id)),
            VerificationPolicy::MarkFulfilled => {
                let result = match self.mark_fulfilled(id)? {
                    FulfillmentChange::Updated => VerificationResult::Fulfilled,
                    FulfillmentChange::Unchanged => VerificationResult::AlreadyFulfilled,
                };
                Ok(result)
            }
        }
    }

    /// Moves an order from `Placed` to `Verified`. Repeated calls are no-ops.
    pub fn mark_fulfilled(&self, id: OrderId) -> RepoResult<FulfillmentChange> {
        let change = self.repo.mark_fulfilled(id)?;
        info!("event=order_fulfill module=workflow status=ok order_id={id} change={change:?}");
        Ok(change)
    }

    fn verify_literal(&self, id: OrderId) -> VerificationResult {
        match self.repo.get_order(id) {
            Ok(_) => VerificationResult::Pending,
            Err(err) => {
                if !err.is_not_found() {
                    warn!("event=order_verify module=workflow status=error order_id={id} error={err}");
                }
                VerificationResult::Complete
            }
        }
    }
}
