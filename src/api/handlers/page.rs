//! Form-based UI handlers.
//!
//! Every handler answers with a full HTML page: the sidebar, the reset
//! control, an optional notice, and the view for the selected action.
//! Mutating forms post back and get the resulting page directly.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    Form,
};
use serde::Deserialize;
use tracing::error;

use crate::api::render::{self, escape, Action, Notice};
use crate::api::ApiState;
use crate::library::{Book, Library, LibraryError, SearchField};

type PageResponse = (StatusCode, Html<String>);

/// Query parameters of `GET /`.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Selected sidebar action.
    pub action: Option<String>,

    /// Search field: "title" or "author".
    pub field: Option<String>,

    /// Search term.
    pub q: Option<String>,

    /// Genre filter for Display All; "All" or absent means no filter.
    pub genre: Option<String>,
}

/// Render the selected view.
pub async fn index(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<PageQuery>,
) -> PageResponse {
    let library = state.library.read().await;
    let action = Action::from_slug(query.action.as_deref());

    let (notice, body) = match action {
        Action::Add => (None, add_form()),
        Action::Remove => remove_view(&library),
        Action::Search => search_view(&library, query.field.as_deref(), query.q.as_deref()),
        Action::Display => display_view(&library, query.genre.as_deref()),
        Action::Stats => (None, stats_view(&library)),
    };

    ok_page(action, notice.as_ref(), &body)
}

/// Add book form fields. Unchecked checkboxes are absent from the body.
#[derive(Debug, Deserialize)]
pub struct AddBookForm {
    pub title: String,
    pub author: String,
    pub year: String,
    pub genre: String,
    #[serde(default)]
    pub read: Option<String>,
}

impl AddBookForm {
    fn into_book(self) -> Result<Book, String> {
        let year = self
            .year
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|y| *y >= 0)
            .ok_or_else(|| "Please enter a valid year (number).".to_string())?;

        Ok(Book::new(
            self.title,
            self.author,
            year,
            self.genre,
            self.read.is_some(),
        ))
    }
}

/// POST /books
pub async fn add_book(
    State(state): State<Arc<ApiState>>,
    Form(form): Form<AddBookForm>,
) -> PageResponse {
    let book = match form.into_book() {
        Ok(book) => book,
        Err(message) => return ok_page(Action::Add, Some(&Notice::Error(message)), &add_form()),
    };

    let title = book.title.clone();
    let mut library = state.library.write().await;

    match library.add(book) {
        Ok(()) => ok_page(
            Action::Add,
            Some(&Notice::Success(format!("✅ '{title}' added to your library!"))),
            &add_form(),
        ),
        Err(e) => storage_failure(Action::Add, e, &add_form()),
    }
}

/// Remove form fields.
#[derive(Debug, Deserialize)]
pub struct RemoveBookForm {
    pub title: String,
}

/// POST /books/remove
pub async fn remove_book(
    State(state): State<Arc<ApiState>>,
    Form(form): Form<RemoveBookForm>,
) -> PageResponse {
    let mut library = state.library.write().await;

    let notice = match library.remove(&form.title) {
        Ok(_) => Notice::Success(format!("🗑️ '{}' removed!", form.title)),
        Err(e) if e.is_user_error() => Notice::Error(e.to_string()),
        Err(e) => {
            let (_, body) = remove_view(&library);
            return storage_failure(Action::Remove, e, &body);
        }
    };

    let (_, body) = remove_view(&library);
    ok_page(Action::Remove, Some(&notice), &body)
}

/// POST /reset
pub async fn reset(State(state): State<Arc<ApiState>>) -> PageResponse {
    let mut library = state.library.write().await;

    match library.reset() {
        Ok(()) => ok_page(
            Action::Add,
            Some(&Notice::Success("Library has been reset!".to_string())),
            &add_form(),
        ),
        Err(e) => storage_failure(Action::Add, e, &add_form()),
    }
}

// === Views ===

fn add_form() -> String {
    r#"<h2>➕ Add a Book</h2>
<form method="post" action="/books">
<p><label>Book Title <input name="title" required></label></p>
<p><label>Author <input name="author"></label></p>
<p><label>Publication Year <input name="year" type="number" min="0" step="1" value="0"></label></p>
<p><label>Genre <input name="genre"></label></p>
<p><label><input name="read" type="checkbox" value="yes"> Have you read this book?</label></p>
<p><button type="submit">Add Book</button></p>
</form>"#
        .to_string()
}

fn remove_view(library: &Library) -> (Option<Notice>, String) {
    let mut body = String::from("<h2>❌ Remove a Book</h2>");

    if library.is_empty() {
        return (Some(Notice::Warning("Library is empty!".to_string())), body);
    }

    body.push_str(r#"<form method="post" action="/books/remove"><p><label>Select book to remove "#);
    body.push_str(&render::select("title", library.titles(), None));
    body.push_str(r#"</label></p><p><button type="submit">Remove Book</button></p></form>"#);

    (None, body)
}

fn search_view(
    library: &Library,
    field: Option<&str>,
    term: Option<&str>,
) -> (Option<Notice>, String) {
    let field = field
        .and_then(|f| f.parse::<SearchField>().ok())
        .unwrap_or(SearchField::Title);
    let term = term.unwrap_or_default();

    let radio = |value: SearchField, label: &str| {
        let checked = if value == field { " checked" } else { "" };
        format!(
            r#"<label><input type="radio" name="field" value="{}"{checked}> {label}</label> "#,
            value.as_str()
        )
    };

    let mut body = format!(
        r#"<h2>🔍 Search Library</h2>
<form method="get" action="/">
<input type="hidden" name="action" value="search">
<p>Search by {}{}</p>
<p><label>Enter search term <input name="q" value="{}"></label> <button type="submit">Search</button></p>
</form>"#,
        radio(SearchField::Title, "Title"),
        radio(SearchField::Author, "Author"),
        escape(term)
    );

    match library.search(field, term) {
        Ok(results) => {
            body.push_str(&format!("<h3>Results ({} found):</h3>", results.len()));
            body.push_str(&render::book_list(results));
            (None, body)
        }
        // Nothing typed yet: just the form.
        Err(LibraryError::EmptyQuery) => (None, body),
        Err(_) => (
            Some(Notice::Warning("No matching books found.".to_string())),
            body,
        ),
    }
}

fn display_view(library: &Library, genre: Option<&str>) -> (Option<Notice>, String) {
    let mut body = String::from("<h2>📚 Your Library</h2>");

    if library.is_empty() {
        return (Some(Notice::Warning("Library is empty!".to_string())), body);
    }

    let filter = genre.filter(|g| *g != "All");
    let genres = library.genres();
    let options = std::iter::once("All").chain(genres.iter().map(String::as_str));

    body.push_str(
        r#"<form method="get" action="/"><input type="hidden" name="action" value="display"><p><label>Filter by genre "#,
    );
    body.push_str(&render::select("genre", options, Some(filter.unwrap_or("All"))));
    body.push_str(r#"</label> <button type="submit">Filter</button></p></form>"#);
    body.push_str(&render::book_list(library.list(filter)));

    (None, body)
}

fn stats_view(library: &Library) -> String {
    format!(
        "<h2>📊 Library Statistics</h2>{}",
        render::metrics(&library.statistics())
    )
}

fn ok_page(action: Action, notice: Option<&Notice>, body: &str) -> PageResponse {
    (StatusCode::OK, Html(render::page(action, notice, body)))
}

fn storage_failure(action: Action, e: LibraryError, body: &str) -> PageResponse {
    error!(error = %e, "Library operation failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(render::page(action, Some(&Notice::Error(e.to_string())), body)),
    )
}
