//! Book records and the values derived from them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::LibraryError;

/// A single book in the collection.
///
/// The serialized field names are the on-disk format; files written by
/// earlier versions of the tracker load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub genre: String,
    pub read: bool,
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        genre: impl Into<String>,
        read: bool,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year,
            genre: genre.into(),
            read,
        }
    }

    /// "Read" or "Unread".
    pub fn status_label(&self) -> &'static str {
        if self.read {
            "Read"
        } else {
            "Unread"
        }
    }

    /// Case-insensitive title comparison used as the de-facto key.
    pub fn title_matches(&self, title: &str) -> bool {
        self.title.to_lowercase() == title.to_lowercase()
    }

    fn field(&self, field: SearchField) -> &str {
        match field {
            SearchField::Title => &self.title,
            SearchField::Author => &self.author,
        }
    }

    /// Whether `field` contains `needle`. `needle` must already be lowercase.
    pub(crate) fn field_contains(&self, field: SearchField, needle: &str) -> bool {
        self.field(field).to_lowercase().contains(needle)
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} by {} ({}) - {} - {}",
            self.title,
            self.author,
            self.year,
            self.genre,
            self.status_label()
        )
    }
}

/// Field a search runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Title,
    Author,
}

impl SearchField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::Author => "author",
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the menu selectors `1`/`2` as well as the field names.
impl FromStr for SearchField {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "title" => Ok(SearchField::Title),
            "2" | "author" => Ok(SearchField::Author),
            other => Err(LibraryError::InvalidField(other.to_string())),
        }
    }
}

/// Aggregate counts over the library.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Statistics {
    pub total: usize,
    pub read: usize,
    pub unread: usize,
    /// Percentage of books read, 0.0 for an empty library.
    pub percent_read: f64,
}

impl Statistics {
    pub fn from_books(books: &[Book]) -> Self {
        let total = books.len();
        let read = books.iter().filter(|b| b.read).count();
        let percent_read = if total == 0 {
            0.0
        } else {
            read as f64 / total as f64 * 100.0
        };

        Self {
            total,
            read,
            unread: total - read,
            percent_read,
        }
    }

    /// Percentage with one decimal, e.g. `66.7%`.
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.percent_read)
    }
}
