//! HTTP front end for the library.
//!
//! Serves two surfaces over the same store:
//! - a form-based HTML UI at `/`
//! - a JSON API under `/api/v1`

pub mod handlers;
pub mod render;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::library::Library;

/// Shared state for API handlers.
pub struct ApiState {
    /// The library store. All requests in this process go through it.
    pub library: RwLock<Library>,
}

impl ApiState {
    pub fn new(library: Library) -> Self {
        Self {
            library: RwLock::new(library),
        }
    }
}

/// Build the router with all routes.
pub fn router(state: Arc<ApiState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Form UI
        .route("/", get(handlers::page::index))
        .route("/books", post(handlers::page::add_book))
        .route("/books/remove", post(handlers::page::remove_book))
        .route("/reset", post(handlers::page::reset))
        // Status/health
        .route("/api/v1/status", get(handlers::status::health))
        // Books
        .route(
            "/api/v1/books",
            get(handlers::books::list_books)
                .post(handlers::books::create_book)
                .delete(handlers::books::reset_books),
        )
        .route("/api/v1/books/search", get(handlers::books::search_books))
        .route("/api/v1/books/:title", delete(handlers::books::remove_book))
        .route("/api/v1/genres", get(handlers::books::list_genres))
        .route("/api/v1/stats", get(handlers::books::statistics))
        // Middleware
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                })
                // Only log responses that are not successful
                .on_request(())
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        let status = response.status();
                        if !status.is_success() {
                            tracing::warn!(
                                status = %status,
                                latency_ms = latency.as_millis(),
                                "request failed"
                            );
                        }
                    },
                ),
        )
        .with_state(state)
}

/// Start the HTTP server.
pub async fn serve(state: Arc<ApiState>, bind_addr: &str) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;

    tracing::info!("Bookshelf listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
