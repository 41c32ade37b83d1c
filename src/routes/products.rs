// src/routes/products.rs
use axum::{routing::get, Router};

use crate::handlers::product::{
    create_product, delete_product, get_product, get_products, update_product,
};
use crate::state::AppState;

/// CRUD routes, mounted under `/api` by `create_router`.
pub fn routes() -> Router<AppState> {
    let collection = get(get_products).post(create_product);
    let item = get(get_product)
        .put(update_product)
        .delete(delete_product);

    Router::new()
        .route("/products", collection)
        .route("/products/{id}", item)
}
