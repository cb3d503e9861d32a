//! The library store.
//!
//! A `Library` is an ordered list of [`Book`]s bound to one JSON file.
//! It is loaded once, mutated in memory, and written back in full after
//! every mutation. Writes go to a temporary file in the same directory
//! which is then renamed over the data file, so a crash never leaves a
//! half-written library behind.
//!
//! Titles are not unique. Removal matches titles case-insensitively and
//! drops every matching record.

pub mod book;
pub mod config;

use std::collections::BTreeSet;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

pub use book::{Book, SearchField, Statistics};
pub use config::StoreConfig;

/// Errors that can occur in library operations.
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Library file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Failed to replace library file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Book '{0}' not found!")]
    NotFound(String),

    #[error("No books found matching '{term}' in {field} field")]
    NoMatches { field: SearchField, term: String },

    #[error("Search term must not be empty")]
    EmptyQuery,

    #[error("Invalid search field: '{0}'")]
    InvalidField(String),
}

impl LibraryError {
    /// True for errors caused by user input rather than storage.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            LibraryError::NotFound(_)
                | LibraryError::NoMatches { .. }
                | LibraryError::EmptyQuery
                | LibraryError::InvalidField(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, LibraryError>;

/// Book collection persisted to a single JSON file.
#[derive(Debug)]
pub struct Library {
    path: PathBuf,
    books: Vec<Book>,
}

impl Library {
    /// Open the library at `path`. A missing file is an empty library.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let books = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => Vec::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No library file yet, starting empty");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        info!(path = %path.display(), count = books.len(), "Library loaded");

        Ok(Self { path, books })
    }

    /// Open the library described by `config`.
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        Self::open(config.data_file.clone())
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// All books in insertion order.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Write the whole library to disk.
    pub fn save(&self) -> Result<()> {
        write_books(&self.path, &self.books)
    }

    /// Append a book and persist.
    pub fn add(&mut self, book: Book) -> Result<()> {
        self.books.push(book);

        if let Err(e) = self.save() {
            self.books.pop();
            return Err(e);
        }

        if let Some(book) = self.books.last() {
            info!(title = %book.title, "Added book");
        }

        Ok(())
    }

    /// Remove every book whose title matches case-insensitively.
    ///
    /// Returns the number of books removed. Nothing is written when no
    /// title matched.
    pub fn remove(&mut self, title: &str) -> Result<usize> {
        let retained: Vec<Book> = self
            .books
            .iter()
            .filter(|b| !b.title_matches(title))
            .cloned()
            .collect();

        let removed = self.books.len() - retained.len();
        if removed == 0 {
            return Err(LibraryError::NotFound(title.to_string()));
        }

        write_books(&self.path, &retained)?;
        self.books = retained;

        info!(title = %title, removed, "Removed books");

        Ok(removed)
    }

    /// Books whose `field` contains `term`, ignoring case.
    pub fn search(&self, field: SearchField, term: &str) -> Result<Vec<&Book>> {
        if term.trim().is_empty() {
            return Err(LibraryError::EmptyQuery);
        }

        let needle = term.to_lowercase();
        let results: Vec<&Book> = self
            .books
            .iter()
            .filter(|b| b.field_contains(field, &needle))
            .collect();

        if results.is_empty() {
            return Err(LibraryError::NoMatches {
                field,
                term: term.to_string(),
            });
        }

        Ok(results)
    }

    /// All books, or only those whose genre equals `genre` exactly.
    pub fn list(&self, genre: Option<&str>) -> Vec<&Book> {
        match genre {
            Some(genre) => self.books.iter().filter(|b| b.genre == genre).collect(),
            None => self.books.iter().collect(),
        }
    }

    /// Distinct non-empty genres, sorted.
    pub fn genres(&self) -> Vec<String> {
        self.books
            .iter()
            .filter(|b| !b.genre.is_empty())
            .map(|b| b.genre.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Titles in library order, duplicates included.
    pub fn titles(&self) -> Vec<&str> {
        self.books.iter().map(|b| b.title.as_str()).collect()
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::from_books(&self.books)
    }

    /// Drop every book and persist the empty library.
    pub fn reset(&mut self) -> Result<()> {
        write_books(&self.path, &[])?;
        let cleared = self.books.len();
        self.books.clear();

        info!(cleared, "Library reset");

        Ok(())
    }
}

/// Serialize `books` next to `path` and rename the result over it.
fn write_books(path: &Path, books: &[Book]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    encode_books(BufWriter::new(tmp.as_file_mut()), books)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;

    debug!(path = %path.display(), count = books.len(), "Library saved");

    Ok(())
}

/// Write `books` as a JSON array. Encoding failures are storage failures,
/// never `Corrupt`; I/O errors keep their original kind.
fn encode_books<W: Write>(mut writer: W, books: &[Book]) -> Result<()> {
    serde_json::to_writer(&mut writer, books).map_err(|e| LibraryError::Io(e.into()))?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> Vec<Book> {
        vec![
            Book::new("Dune", "Frank Herbert", 1965, "Sci-Fi", true),
            Book::new("Emma", "Jane Austen", 1815, "Classic", false),
            Book::new("dune", "Someone Else", 2001, "Parody", true),
            Book::new("Persuasion", "Jane Austen", 1817, "Classic", true),
        ]
    }

    fn seeded(dir: &Path) -> Library {
        let mut library = Library::open(dir.join("library.txt")).unwrap();
        for book in sample() {
            library.add(book).unwrap();
        }
        library
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let library = Library::open(dir.path().join("nope.txt")).unwrap();
        assert!(library.is_empty());
        assert!(!dir.path().join("nope.txt").exists());
    }

    #[test]
    fn test_open_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("library.txt");
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(Library::open(&path), Err(LibraryError::Corrupt(_))));
    }

    #[test]
    fn test_open_blank_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("library.txt");
        fs::write(&path, "  \n").unwrap();

        assert!(Library::open(&path).unwrap().is_empty());
    }

    #[test]
    fn test_failed_save_rolls_back_memory() {
        let dir = tempdir().unwrap();
        let parent = dir.path().join("shelf");
        let mut library = Library::open(parent.join("library.txt")).unwrap();

        // A regular file where the data directory should be.
        fs::write(&parent, "").unwrap();

        let err = library
            .add(Book::new("Dune", "Frank Herbert", 1965, "Sci-Fi", true))
            .unwrap_err();
        assert!(matches!(err, LibraryError::Io(_)));
        assert_eq!(library.len(), 0);
    }

    #[test]
    fn test_failed_remove_keeps_books() {
        let dir = tempdir().unwrap();
        let parent = dir.path().join("shelf");
        let mut library = seeded(&parent);

        fs::remove_dir_all(&parent).unwrap();
        fs::write(&parent, "").unwrap();

        assert!(library.remove("Emma").is_err());
        assert_eq!(library.len(), 4);
    }

    #[test]
    fn test_encode_write_failure_is_io() {
        struct FullDisk;

        impl Write for FullDisk {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "no space left"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let books = vec![Book::new("Emma", "Jane Austen", 1815, "Classic", true)];
        let err = encode_books(FullDisk, &books).unwrap_err();
        assert!(
            matches!(err, LibraryError::Io(ref e) if e.kind() == std::io::ErrorKind::Other),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn test_add_then_reopen_preserves_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("library.txt");

        let book = Book::new("Neuromancer", "William Gibson", 1984, "Cyberpunk", false);
        let mut library = Library::open(&path).unwrap();
        library.add(book.clone()).unwrap();

        let reopened = Library::open(&path).unwrap();
        assert_eq!(reopened.books(), &[book]);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("library.txt");

        let mut library = Library::open(&path).unwrap();
        library.add(Book::new("A", "B", 1, "C", true)).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_remove_missing_leaves_store_unchanged() {
        let dir = tempdir().unwrap();
        let mut library = seeded(dir.path());
        let before = fs::read_to_string(library.path()).unwrap();

        let err = library.remove("Ulysses").unwrap_err();
        assert!(matches!(err, LibraryError::NotFound(ref t) if t == "Ulysses"));
        assert_eq!(library.len(), 4);
        assert_eq!(fs::read_to_string(library.path()).unwrap(), before);
    }

    #[test]
    fn test_remove_drops_all_case_insensitive_matches() {
        let dir = tempdir().unwrap();
        let mut library = seeded(dir.path());

        let removed = library.remove("DUNE").unwrap();
        assert_eq!(removed, 2);
        assert_eq!(library.titles(), vec!["Emma", "Persuasion"]);

        let reopened = Library::open(library.path()).unwrap();
        assert_eq!(reopened.titles(), vec!["Emma", "Persuasion"]);
    }

    #[test]
    fn test_search_author_substring() {
        let dir = tempdir().unwrap();
        let library = seeded(dir.path());

        let results = library.search(SearchField::Author, "AUSTEN").unwrap();
        let titles: Vec<&str> = results.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Emma", "Persuasion"]);
    }

    #[test]
    fn test_search_no_matches() {
        let dir = tempdir().unwrap();
        let library = seeded(dir.path());

        let err = library.search(SearchField::Author, "tolkien").unwrap_err();
        assert!(matches!(
            err,
            LibraryError::NoMatches { field: SearchField::Author, ref term } if term == "tolkien"
        ));
    }

    #[test]
    fn test_search_term_is_not_trimmed() {
        let dir = tempdir().unwrap();
        let library = seeded(dir.path());

        let results = library.search(SearchField::Author, "jane ").unwrap();
        assert_eq!(results.len(), 2);

        let err = library.search(SearchField::Author, "austen ").unwrap_err();
        assert!(matches!(err, LibraryError::NoMatches { ref term, .. } if term == "austen "));
    }

    #[test]
    fn test_search_empty_term() {
        let dir = tempdir().unwrap();
        let library = seeded(dir.path());

        assert!(matches!(
            library.search(SearchField::Title, "   "),
            Err(LibraryError::EmptyQuery)
        ));
    }

    #[test]
    fn test_list_with_genre_filter() {
        let dir = tempdir().unwrap();
        let library = seeded(dir.path());

        assert_eq!(library.list(None).len(), 4);
        assert_eq!(library.list(Some("Classic")).len(), 2);
        // Exact match only
        assert!(library.list(Some("classic")).is_empty());
    }

    #[test]
    fn test_genres_distinct_sorted() {
        let dir = tempdir().unwrap();
        let mut library = seeded(dir.path());
        library.add(Book::new("Untagged", "Anon", 2020, "", false)).unwrap();

        assert_eq!(library.genres(), vec!["Classic", "Parody", "Sci-Fi"]);
    }

    #[test]
    fn test_reset_clears_file() {
        let dir = tempdir().unwrap();
        let mut library = seeded(dir.path());

        library.reset().unwrap();
        assert!(library.is_empty());
        assert!(Library::open(library.path()).unwrap().is_empty());
    }

    #[test]
    fn test_reads_legacy_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("library.txt");
        fs::write(
            &path,
            r#"[{"title": "Emma", "author": "Jane Austen", "year": 1815, "genre": "Classic", "read": true}]"#,
        )
        .unwrap();

        let library = Library::open(&path).unwrap();
        assert_eq!(
            library.books(),
            &[Book::new("Emma", "Jane Austen", 1815, "Classic", true)]
        );
    }
}
