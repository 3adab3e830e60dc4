//! Payment profile attached to a user. Read-only in this service.

use super::user::UserId;
use serde::{Deserialize, Serialize};

pub type ClientId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub id_user: UserId,
    pub due_date: i64,
    pub number_of_card: i64,
    pub address: String,
    pub type_of_card: String,
}
