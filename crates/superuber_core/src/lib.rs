//! Core domain logic for the SuperUber storefront service.
//! Repositories, credential schemes and use-case services live here; the HTTP
//! layer only translates requests into these calls.

pub mod credentials;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use credentials::{CredentialError, PasswordScheme};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::client::{Client, ClientId};
pub use model::order::{NewOrder, Order, OrderId, OrderState};
pub use model::product::{Product, ProductId};
pub use model::user::{NewUser, StoredCredential, User, UserChanges, UserId, UserSummary};
pub use model::ValidationError;
pub use repo::client_repo::{ClientRepository, SqliteClientRepository};
pub use repo::order_repo::{FulfillmentChange, OrderRepository, SqliteOrderRepository};
pub use repo::product_repo::{ProductRepository, SqliteProductRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{EntityKind, RepoError, RepoResult};
pub use service::auth_service::{select_credential, AuthError, AuthService, Authenticated};
pub use service::order_workflow::{OrderWorkflow, VerificationPolicy, VerificationResult};
pub use service::user_service::{
    encode_new_user, encode_user_changes, UserService, UserServiceError,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
