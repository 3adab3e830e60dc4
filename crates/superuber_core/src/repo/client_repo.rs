//! Payment profile repository (read-only).

use super::{ensure_table, EntityKind, RepoError, RepoResult};
use crate::model::client::{Client, ClientId};
use crate::model::user::UserId;
use rusqlite::{Connection, Row};

const CLIENT_SELECT_SQL: &str = "SELECT
    id,
    id_user,
    due_date,
    number_of_card,
    address,
    type_of_card
FROM clients";

pub trait ClientRepository {
    fn list_clients(&self) -> RepoResult<Vec<Client>>;
    fn get_client(&self, id: ClientId) -> RepoResult<Client>;
    fn list_clients_for_user(&self, user_id: UserId) -> RepoResult<Vec<Client>>;
}

pub struct SqliteClientRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteClientRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table(conn, "clients")?;
        Ok(Self { conn })
    }

    fn query_clients(&self, sql: &str, params: impl rusqlite::Params) -> RepoResult<Vec<Client>> {
        let mut stmt = self.conn.prepare(sql)?;
        let clients = stmt
            .query_map(params, parse_client_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(clients)
    }
}

impl ClientRepository for SqliteClientRepository<'_> {
    fn list_clients(&self) -> RepoResult<Vec<Client>> {
        self.query_clients(&format!("{CLIENT_SELECT_SQL} ORDER BY id ASC;"), [])
    }

    fn get_client(&self, id: ClientId) -> RepoResult<Client> {
        self.query_clients(&format!("{CLIENT_SELECT_SQL} WHERE id = ?1;"), [id])?
            .into_iter()
            .next()
            .ok_or(RepoError::NotFound {
                entity: EntityKind::Client,
                id,
            })
    }

    fn list_clients_for_user(&self, user_id: UserId) -> RepoResult<Vec<Client>> {
        self.query_clients(
            &format!("{CLIENT_SELECT_SQL} WHERE id_user = ?1 ORDER BY id ASC;"),
            [user_id],
        )
    }
}

fn parse_client_row(row: &Row<'_>) -> rusqlite::Result<Client> {
    Ok(Client {
        id: row.get("id")?,
        id_user: row.get("id_user")?,
        due_date: row.get("due_date")?,
        number_of_card: row.get("number_of_card")?,
        address: row.get("address")?,
        type_of_card: row.get("type_of_card")?,
    })
}
