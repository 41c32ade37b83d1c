// src/repository/memory.rs
use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::ProductRepository;
use crate::models::product::{Product, ProductFields};

/// Process-local product table.
///
/// Ids come from a counter that only moves forward, so a deleted id is never
/// handed out again, same as the identity column in Postgres.
#[derive(Default)]
pub struct InMemoryProductRepository {
    table: RwLock<Table>,
}

#[derive(Default)]
struct Table {
    rows: BTreeMap<i64, Product>,
    last_id: i64,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list(&self) -> Result<Vec<Product>, sqlx::Error> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn find(&self, id: i64) -> Result<Option<Product>, sqlx::Error> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn insert(&self, fields: ProductFields) -> Result<Product, sqlx::Error> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let product = Product::from_fields(table.last_id, fields);
        table.rows.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update(&self, product: &Product) -> Result<bool, sqlx::Error> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&product.id) {
            Some(row) => {
                *row = product.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}
