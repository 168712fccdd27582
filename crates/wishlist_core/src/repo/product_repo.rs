//! Product repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Listing returns every product in storage (`id`) order; no pagination.
//! - Read paths reject negative or oversized quantities instead of masking them.

use super::{RepoError, RepoResult};
use crate::model::product::{NewProduct, Product, ProductId};
use rusqlite::{params, Connection, Row};

const PRODUCT_SELECT_SQL: &str = "SELECT id, title, description, quantity FROM products";

pub trait ProductRepository {
    fn create_product(&self, product: &NewProduct) -> RepoResult<ProductId>;
    fn list_products(&self) -> RepoResult<Vec<Product>>;
    fn delete_product(&self, id: ProductId) -> RepoResult<()>;
}

pub struct SqliteProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProductRepository for SqliteProductRepository<'_> {
    fn create_product(&self, product: &NewProduct) -> RepoResult<ProductId> {
        self.conn.execute(
            "INSERT INTO products (title, description, quantity) VALUES (?1, ?2, ?3);",
            params![
                product.title.as_str(),
                product.description.as_str(),
                product.quantity
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

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

    fn delete_product(&self, id: ProductId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM products WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                table: "products",
                id,
            });
        }
        Ok(())
    }
}

fn parse_product_row(row: &Row<'_>) -> RepoResult<Product> {
    let id: ProductId = row.get("id")?;
    let raw_quantity: i64 = row.get("quantity")?;
    let quantity = u32::try_from(raw_quantity).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid quantity `{raw_quantity}` in products.quantity for id {id}"
        ))
    })?;

    Ok(Product {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        quantity,
    })
}
