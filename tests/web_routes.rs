use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use bookshelf::{
    api::{router, ApiState},
    Book, Library,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

fn app_with(books: Vec<Book>) -> (TempDir, Router) {
    let dir = tempdir().expect("tempdir");
    let mut library = Library::open(dir.path().join("library.txt")).expect("open library");
    for book in books {
        library.add(book).expect("seed book");
    }
    (dir, router(Arc::new(ApiState::new(library))))
}

fn seed() -> Vec<Book> {
    vec![
        Book::new("Emma", "Jane Austen", 1815, "Classic", true),
        Book::new("Dune", "Frank Herbert", 1965, "Sci-Fi", false),
        Book::new("EMMA", "Parody Press", 2010, "Humor", true),
    ]
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    (status, String::from_utf8(bytes.to_vec()).expect("utf8 body"))
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request")
}

fn form(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn index_defaults_to_add_form() {
    let (_dir, app) = app_with(vec![]);
    let (status, html) = send(&app, get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Add a Book"));
    assert!(html.contains("Reset Entire Library"));
}

#[tokio::test]
async fn add_form_persists_book() {
    let (dir, app) = app_with(vec![]);
    let (status, html) = send(
        &app,
        form(
            "/books",
            "title=Neuromancer&author=William+Gibson&year=1984&genre=Cyberpunk&read=yes",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("&#39;Neuromancer&#39; added to your library!"));

    let reopened = Library::open(dir.path().join("library.txt")).expect("reopen");
    assert_eq!(
        reopened.books(),
        &[Book::new("Neuromancer", "William Gibson", 1984, "Cyberpunk", true)]
    );
}

#[tokio::test]
async fn add_form_rejects_invalid_year() {
    let (_dir, app) = app_with(vec![]);
    let (_, html) = send(
        &app,
        form("/books", "title=X&author=Y&year=soon&genre=Z"),
    )
    .await;

    assert!(html.contains("Please enter a valid year (number)."));
}

#[tokio::test]
async fn remove_form_and_display_filter() {
    let (_dir, app) = app_with(seed());

    let (_, html) = send(&app, form("/books/remove", "title=emma")).await;
    assert!(html.contains("removed!"));

    let (_, html) = send(&app, get("/?action=display")).await;
    assert!(html.contains("<strong>Dune</strong>"));
    assert!(!html.contains("<strong>Emma</strong>"));
    assert!(!html.contains("<strong>EMMA</strong>"));

    let (_, html) = send(&app, get("/?action=display&genre=Humor")).await;
    assert!(!html.contains("<strong>Dune</strong>"));
}

#[tokio::test]
async fn search_and_stats_pages() {
    let (_dir, app) = app_with(seed());

    let (_, html) = send(&app, get("/?action=search&field=author&q=herb")).await;
    assert!(html.contains("Results (1 found):"));

    let (_, html) = send(&app, get("/?action=search&field=title&q=zzz")).await;
    assert!(html.contains("No matching books found."));

    let (_, html) = send(&app, get("/?action=stats")).await;
    assert!(html.contains("66.7%"));
}

#[tokio::test]
async fn reset_empties_library() {
    let (_dir, app) = app_with(seed());

    let (_, html) = send(&app, form("/reset", "")).await;
    assert!(html.contains("Library has been reset!"));

    let (_, html) = send(&app, get("/?action=display")).await;
    assert!(html.contains("Library is empty!"));
}

#[tokio::test]
async fn json_api_status_codes() {
    let (_dir, app) = app_with(seed());

    let (status, body) = send(&app, get("/api/v1/books?genre=Classic")).await;
    assert_eq!(status, StatusCode::OK);
    let books: Vec<Book> = serde_json::from_str(&body).expect("books json");
    assert_eq!(books.len(), 1);

    let (status, _) = send(&app, get("/api/v1/books/search?field=author&term=tolkien")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, get("/api/v1/books/search?field=isbn&term=1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Request::delete("/api/v1/books/Emma")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let removed: Value = serde_json::from_str(&body).expect("json");
    assert_eq!(removed["removed"], 2);

    let (status, _) = send(
        &app,
        Request::delete("/api/v1/books/Emma")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, get("/api/v1/stats")).await;
    assert_eq!(status, StatusCode::OK);
    let stats: Value = serde_json::from_str(&body).expect("json");
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["read"], 0);
}

#[tokio::test]
async fn json_api_create_and_genres() {
    let (_dir, app) = app_with(vec![]);

    let book = Book::new("Solaris", "Stanislaw Lem", 1961, "Sci-Fi", false);
    let (status, _) = send(
        &app,
        Request::post("/api/v1/books")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&book).expect("json")))
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, get("/api/v1/genres")).await;
    let genres: Vec<String> = serde_json::from_str(&body).expect("json");
    assert_eq!(genres, vec!["Sci-Fi"]);

    let (_, body) = send(&app, get("/api/v1/status")).await;
    let status: Value = serde_json::from_str(&body).expect("json");
    assert_eq!(status["total_books"], 1);
}
