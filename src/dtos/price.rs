// src/dtos/price.rs
//! Prices travel as JSON numbers but never pass through `f64`: the number
//! text is read and written verbatim so every `NUMERIC(18,2)` value survives.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;

pub fn serialize<S>(price: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    RawValue::from_string(price.to_string())
        .map_err(<S::Error as ser::Error>::custom)?
        .serialize(serializer)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Box::<RawValue>::deserialize(deserializer)?;
    let text = raw.get().trim();

    if !text.starts_with(|c: char| c == '-' || c.is_ascii_digit()) {
        return Err(de::Error::custom("price must be a number"));
    }

    let parsed = if text.contains(['e', 'E']) {
        Decimal::from_scientific(text)
    } else {
        Decimal::from_str(text)
    };
    parsed.map_err(|e| de::Error::custom(format!("invalid price {text}: {e}")))
}
