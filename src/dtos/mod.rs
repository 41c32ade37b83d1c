// src/dtos/mod.rs
pub mod price;
pub mod product;
