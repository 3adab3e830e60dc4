//! Order repository contract and SQLite implementation.
//!
//! # Invariants
//! - `create_order` rejects a zero product reference before writing.
//! - `mark_fulfilled` only moves `fulfilled` from 0 to 1 and is idempotent.

use super::{bool_to_int, ensure_table, int_to_bool, EntityKind, RepoError, RepoResult};
use crate::model::order::{NewOrder, Order, OrderId};
use rusqlite::{params, Connection, Row};

const ORDER_SELECT_SQL: &str = "SELECT
    id,
    id_user,
    order_number,
    id_product,
    fulfilled
FROM orders";

/// Outcome of a fulfillment transition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FulfillmentChange {
    /// Flag moved from unset to set by this call.
    Updated,
    /// Flag was already set; nothing was written.
    Unchanged,
}

pub trait OrderRepository {
    fn list_orders(&self) -> RepoResult<Vec<Order>>;
    fn get_order(&self, id: OrderId) -> RepoResult<Order>;
    /// Inserts a new unfulfilled order and returns it with its assigned id.
    fn create_order(&self, order: &NewOrder) -> RepoResult<Order>;
    fn mark_fulfilled(&self, id: OrderId) -> RepoResult<FulfillmentChange>;
}

impl<T: OrderRepository + ?Sized> OrderRepository for &T {
    fn list_orders(&self) -> RepoResult<Vec<Order>> {
        (**self).list_orders()
    }

    fn get_order(&self, id: OrderId) -> RepoResult<Order> {
        (**self).get_order(id)
    }

    fn create_order(&self, order: &NewOrder) -> RepoResult<Order> {
        (**self).create_order(order)
    }

    fn mark_fulfilled(&self, id: OrderId) -> RepoResult<FulfillmentChange> {
        (**self).mark_fulfilled(id)
    }
}

/// SQLite-backed order repository.
pub struct SqliteOrderRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteOrderRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table(conn, "orders")?;
        Ok(Self { conn })
    }
}

impl OrderRepository for SqliteOrderRepository<'_> {
    fn list_orders(&self) -> RepoResult<Vec<Order>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ORDER_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut orders = Vec::new();
        while let Some(row) = rows.next()? {
            orders.push(parse_order_row(row)?);
        }
        Ok(orders)
    }

    fn get_order(&self, id: OrderId) -> RepoResult<Order> {
        load_order(self.conn, id)?.ok_or(RepoError::NotFound {
            entity: EntityKind::Order,
            id,
        })
    }

    fn create_order(&self, order: &NewOrder) -> RepoResult<Order> {
        order.validate()?;

        // Stock reservation will join this transaction once products are decremented.
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO orders (id_user, order_number, id_product, fulfilled)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                order.id_user,
                order.order_number,
                order.id_product,
                bool_to_int(false),
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(Order {
            id,
            id_user: order.id_user,
            order_number: order.order_number,
            id_product: order.id_product,
            fulfilled: false,
        })
    }

    fn mark_fulfilled(&self, id: OrderId) -> RepoResult<FulfillmentChange> {
        let tx = self.conn.unchecked_transaction()?;
        let order = load_order(&tx, id)?.ok_or(RepoError::NotFound {
            entity: EntityKind::Order,
            id,
        })?;
        if order.fulfilled {
            return Ok(FulfillmentChange::Unchanged);
        }

        tx.execute(
            "UPDATE orders SET fulfilled = 1 WHERE id = ?1 AND fulfilled = 0;",
            [id],
        )?;
        tx.commit()?;
        Ok(FulfillmentChange::Updated)
    }
}

fn load_order(conn: &Connection, id: OrderId) -> RepoResult<Option<Order>> {
    let mut stmt = conn.prepare(&format!("{ORDER_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    match rows.next()? {
        Some(row) => Ok(Some(parse_order_row(row)?)),
        None => Ok(None),
    }
}

fn parse_order_row(row: &Row<'_>) -> RepoResult<Order> {
    let fulfilled = int_to_bool("orders", "fulfilled", row.get("fulfilled")?)?;
    Ok(Order {
        id: row.get("id")?,
        id_user: row.get("id_user")?,
        order_number: row.get("order_number")?,
        id_product: row.get("id_product")?,
        fulfilled,
    })
}
