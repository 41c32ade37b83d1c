// src/lib.rs
pub mod config;
pub mod database;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod startup;
pub mod state;

pub use error::AppError;
pub use state::AppState;
