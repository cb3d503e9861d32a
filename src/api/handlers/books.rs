//! JSON book handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::ApiState;
use crate::library::{Book, LibraryError, SearchField, Statistics};

type ApiError = (StatusCode, String);

/// Map a library error to a status code and message.
fn api_error(e: LibraryError) -> ApiError {
    let status = match &e {
        LibraryError::NotFound(_) | LibraryError::NoMatches { .. } => StatusCode::NOT_FOUND,
        LibraryError::EmptyQuery | LibraryError::InvalidField(_) => StatusCode::BAD_REQUEST,
        LibraryError::Io(_) | LibraryError::Corrupt(_) | LibraryError::Persist(_) => {
            tracing::error!(error = %e, "Library operation failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, e.to_string())
}

/// List query.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Exact-match genre filter.
    pub genre: Option<String>,
}

/// GET /api/v1/books
pub async fn list_books(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Book>> {
    let library = state.library.read().await;
    let books = library
        .list(query.genre.as_deref())
        .into_iter()
        .cloned()
        .collect();

    Json(books)
}

/// POST /api/v1/books
pub async fn create_book(
    State(state): State<Arc<ApiState>>,
    Json(book): Json<Book>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let mut library = state.library.write().await;
    library.add(book.clone()).map_err(api_error)?;

    Ok((StatusCode::CREATED, Json(book)))
}

/// Remove response.
#[derive(Debug, Serialize)]
pub struct RemoveResponse {
    /// Number of books dropped (every case-insensitive title match).
    pub removed: usize,
}

/// DELETE /api/v1/books/:title
pub async fn remove_book(
    State(state): State<Arc<ApiState>>,
    Path(title): Path<String>,
) -> Result<Json<RemoveResponse>, ApiError> {
    let mut library = state.library.write().await;
    let removed = library.remove(&title).map_err(api_error)?;

    Ok(Json(RemoveResponse { removed }))
}

/// DELETE /api/v1/books
pub async fn reset_books(State(state): State<Arc<ApiState>>) -> Result<StatusCode, ApiError> {
    let mut library = state.library.write().await;
    library.reset().map_err(api_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Search query.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// "title" or "author".
    pub field: String,

    /// Case-insensitive substring.
    #[serde(default)]
    pub term: String,
}

/// GET /api/v1/books/search
pub async fn search_books(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Book>>, ApiError> {
    let field: SearchField = query.field.parse().map_err(api_error)?;

    let library = state.library.read().await;
    let results = library
        .search(field, &query.term)
        .map_err(api_error)?
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(results))
}

/// GET /api/v1/genres
pub async fn list_genres(State(state): State<Arc<ApiState>>) -> Json<Vec<String>> {
    let library = state.library.read().await;
    Json(library.genres())
}

/// GET /api/v1/stats
pub async fn statistics(State(state): State<Arc<ApiState>>) -> Json<Statistics> {
    let library = state.library.read().await;
    Json(library.statistics())
}
