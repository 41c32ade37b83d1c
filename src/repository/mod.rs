// src/repository/mod.rs
//! Storage seam for the product table.
//!
//! Handlers only see [`ProductRepository`]; the binary builds the Postgres
//! implementation once at startup and the test suite uses the in-memory one.

mod memory;
mod postgres;

pub use memory::InMemoryProductRepository;
pub use postgres::PgProductRepository;

use async_trait::async_trait;

use crate::models::product::{Product, ProductFields};

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Every row, ascending by id.
    async fn list(&self) -> Result<Vec<Product>, sqlx::Error>;

    async fn find(&self, id: i64) -> Result<Option<Product>, sqlx::Error>;

    /// Inserts a row and returns it with its store-assigned id.
    async fn insert(&self, fields: ProductFields) -> Result<Product, sqlx::Error>;

    /// Overwrites the row with `product.id`. Returns `false` when no such row exists.
    async fn update(&self, product: &Product) -> Result<bool, sqlx::Error>;

    /// Returns `false` when no such row exists.
    async fn delete(&self, id: i64) -> Result<bool, sqlx::Error>;
}
