pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::autofill::handlers;
use crate::errors::AppError;
use crate::state::AppState;

async fn not_found() -> Result<(), AppError> {
    Err(AppError::NotFound("No such route".to_string()))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/autofill/plan", post(handlers::handle_plan))
        .route("/api/v1/autofill/preview", post(handlers::handle_preview))
        .fallback(not_found)
        .with_state(state)
}
