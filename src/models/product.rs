// src/models/product.rs
use rust_decimal::Decimal;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
}

/// The mutable columns of a product, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFields {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
}

impl Product {
    /// Overwrites every mutable column, keeping the id.
    pub fn with_fields(self, fields: ProductFields) -> Product {
        Product {
            id: self.id,
            name: fields.name,
            description: fields.description,
            price: fields.price,
        }
    }

    pub fn from_fields(id: i64, fields: ProductFields) -> Product {
        Product {
            id,
            name: fields.name,
            description: fields.description,
            price: fields.price,
        }
    }
}
