use crate::AppState;
use axum::routing::{get, post, Router};

pub mod add_number;
pub mod numbers;
pub mod root;
pub mod upload_excel;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root::root))
        .route("/upload-excel", post(upload_excel::upload_excel))
        .route("/add-number", post(add_number::add_number))
        .route("/numbers", get(numbers::numbers))
}
