//! Health check handler.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::api::ApiState;

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,

    /// Number of books in the library.
    pub total_books: usize,

    /// Path of the backing data file.
    pub data_file: String,
}

/// Health check endpoint.
pub async fn health(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    let library = state.library.read().await;

    Json(HealthResponse {
        status: "ok".to_string(),
        total_books: library.len(),
        data_file: library.path().display().to_string(),
    })
}
