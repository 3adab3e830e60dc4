//! Use-case services over the repositories.
//!
//! # Responsibility
//! - Orchestrate repository calls into request-level operations.
//! - Keep the HTTP layer decoupled from SQL and credential storage details.

pub mod auth_service;
pub mod order_workflow;
pub mod user_service;
