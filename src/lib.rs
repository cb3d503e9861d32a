//! Bookshelf - a personal book collection tracker.
//!
//! One store, two front ends:
//!
//! ```text
//! ┌──────────────────────┐      ┌──────────────────────────────┐
//! │  menu (line mode)    │      │  api (form UI + JSON, axum)  │
//! └──────────┬───────────┘      └──────────────┬───────────────┘
//!            │        same store operations    │
//!            └───────────────┬─────────────────┘
//!                    ┌───────┴────────┐
//!                    │    Library     │  add / remove / search /
//!                    └───────┬────────┘  list / statistics / reset
//!                            │
//!                   library.txt (JSON array)
//! ```
//!
//! The whole collection is rewritten after every mutation through a
//! temporary file and a rename.

/// Book records and the file-backed store.
pub mod library;

/// Interactive line-mode menu.
pub mod menu;

/// HTTP front end: form UI and JSON API.
pub mod api;

pub use library::{Book, Library, LibraryError, SearchField, Statistics, StoreConfig};
