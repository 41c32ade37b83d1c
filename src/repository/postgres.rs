// src/repository/postgres.rs
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::error;

use super::ProductRepository;
use crate::models::product::{Product, ProductFields};

#[derive(Clone)]
pub struct PgProductRepository {
    db_pool: PgPool,
}

impl PgProductRepository {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list(&self) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            "SELECT id, name, description, price FROM products ORDER BY id ASC",
        )
        .fetch_all(&self.db_pool)
        .await
        .inspect_err(|e| error!(?e, "Failed to fetch products"))
    }

    async fn find(&self, id: i64) -> Result<Option<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            "SELECT id, name, description, price FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await
    }

    async fn insert(&self, fields: ProductFields) -> Result<Product, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            "INSERT INTO products (name, description, price)
             VALUES ($1, $2, $3)
             RETURNING id, name, description, price",
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.price)
        .fetch_one(&self.db_pool)
        .await
    }

    async fn update(&self, product: &Product) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE products SET name = $1, description = $2, price = $3 WHERE id = $4",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.id)
        .execute(&self.db_pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
