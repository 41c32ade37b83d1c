// src/handlers/mod.rs
pub mod product;
