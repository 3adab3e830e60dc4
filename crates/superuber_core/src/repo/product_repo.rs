//! Product repository. The catalog is read-only through this service.

use super::{ensure_table, EntityKind, RepoError, RepoResult};
use crate::model::product::{Product, ProductId};
use rusqlite::{Connection, Row};

const PRODUCT_SELECT_SQL: &str = "SELECT
    id,
    name,
    brand,
    description,
    price,
    stock,
    available_stock,
    id_category
FROM products";

pub trait ProductRepository {
    fn list_products(&self) -> RepoResult<Vec<Product>>;
    fn get_product(&self, id: ProductId) -> RepoResult<Product>;
}

/// SQLite-backed product repository.
pub struct SqliteProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table(conn, "products")?;
        Ok(Self { conn })
    }
}

impl ProductRepository for SqliteProductRepository<'_> {
    fn list_products(&self) -> RepoResult<Vec<Product>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut products = Vec::new();
        while let Some(row) = rows.next()? {
            products.push(parse_product_row(row)?);
        }
        Ok(products)
    }

    fn get_product(&self, id: ProductId) -> RepoResult<Product> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => parse_product_row(row),
            None => Err(RepoError::NotFound {
                entity: EntityKind::Product,
                id,
            }),
        }
    }
}

fn parse_product_row(row: &Row<'_>) -> RepoResult<Product> {
    let product = Product {
        id: row.get("id")?,
        name: row.get("name")?,
        brand: row.get("brand")?,
        description: row.get("description")?,
        price: row.get("price")?,
        stock: row.get("stock")?,
        available_stock: row.get("available_stock")?,
        id_category: row.get("id_category")?,
    };
    product.validate().map_err(|err| {
        RepoError::InvalidData(format!("product {}: {err}", product.id))
    })?;
    Ok(product)
}
