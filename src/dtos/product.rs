// src/dtos/product.rs
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::product::{Product, ProductFields};

/// Longest accepted product name, in characters.
pub const NAME_MAX_CHARS: usize = 100;

/// Fractional digits kept for prices (`NUMERIC(18,2)`).
pub const PRICE_SCALE: u32 = 2;

/// Integer digits available for prices (`NUMERIC(18,2)` leaves 16).
const PRICE_INTEGER_DIGITS: u32 = 16;

/// Body of both POST and PUT. Every field is written, there is no partial update.
#[derive(Debug, Deserialize)]
pub struct ProductPayload {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "crate::dtos::price")]
    pub price: Decimal,
}

impl ProductPayload {
    /// Checks the column constraints and normalizes the price to two decimals.
    ///
    /// Empty names and negative prices pass; only the browser form rejects them.
    pub fn validate(self) -> Result<ProductFields, AppError> {
        if self.name.chars().count() > NAME_MAX_CHARS {
            return Err(AppError::validation(format!(
                "Name must be at most {NAME_MAX_CHARS} characters"
            )));
        }

        let mut price = self
            .price
            .round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
        price.rescale(PRICE_SCALE);
        if price.abs() >= price_limit() {
            return Err(AppError::validation("Price is out of range"));
        }

        Ok(ProductFields {
            name: self.name,
            description: self.description,
            price,
        })
    }
}

fn price_limit() -> Decimal {
    Decimal::from(10_i64.pow(PRICE_INTEGER_DIGITS))
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "crate::dtos::price")]
    pub price: Decimal,
}

// Convert from Model to Response DTO
impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn payload(name: &str, price: &str) -> ProductPayload {
        ProductPayload {
            name: name.to_string(),
            description: None,
            price: Decimal::from_str(price).unwrap(),
        }
    }

    #[test]
    fn accepts_name_at_length_limit() {
        let name = "n".repeat(NAME_MAX_CHARS);
        let fields = payload(&name, "1.00").validate().unwrap();
        assert_eq!(fields.name, name);
    }

    #[test]
    fn rejects_name_over_length_limit() {
        let name = "n".repeat(NAME_MAX_CHARS + 1);
        let err = payload(&name, "1.00").validate().unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn name_limit_counts_characters_not_bytes() {
        let name = "é".repeat(NAME_MAX_CHARS);
        assert!(payload(&name, "1.00").validate().is_ok());
    }

    #[test]
    fn empty_name_and_negative_price_pass() {
        let fields = payload("", "-3.50").validate().unwrap();
        assert_eq!(fields.name, "");
        assert_eq!(fields.price, Decimal::from_str("-3.50").unwrap());
    }

    #[test]
    fn price_is_rounded_to_two_decimals() {
        let fields = payload("Widget", "9.995").validate().unwrap();
        assert_eq!(fields.price, Decimal::from_str("10.00").unwrap());

        let fields = payload("Widget", "-0.125").validate().unwrap();
        assert_eq!(fields.price, Decimal::from_str("-0.13").unwrap());
    }

    #[test]
    fn rejects_price_wider_than_column() {
        assert!(payload("Widget", "9999999999999999.99").validate().is_ok());
        let err = payload("Widget", "10000000000000000").validate().unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn deserializes_numeric_price_and_missing_description() {
        let payload: ProductPayload =
            serde_json::from_str(r#"{"name":"Widget","price":9.99}"#).unwrap();
        assert_eq!(payload.price, Decimal::from_str("9.99").unwrap());
        assert_eq!(payload.description, None);

        let payload: ProductPayload =
            serde_json::from_str(r#"{"id":7,"name":"Widget","description":null,"price":12}"#)
                .unwrap();
        assert_eq!(payload.price, Decimal::from(12));
    }

    #[test]
    fn price_is_stored_with_two_decimals() {
        let fields = payload("Widget", "12.5").validate().unwrap();
        assert_eq!(fields.price.to_string(), "12.50");
    }

    #[test]
    fn response_serializes_price_as_number() {
        let response = ProductResponse::from(Product {
            id: 1,
            name: "Widget".to_string(),
            description: None,
            price: Decimal::from_str("12.50").unwrap(),
        });
        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"id":1,"name":"Widget","description":null,"price":12.50}"#
        );
    }
}
