//! Store configuration.

use std::path::PathBuf;

/// File name used for the library, both inside the platform data
/// directory and as the working-directory fallback.
pub const DATA_FILE_NAME: &str = "library.txt";

/// Configuration for a library store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path of the JSON file holding the library.
    pub data_file: PathBuf,
}

impl StoreConfig {
    /// Create a config pointing at an explicit data file.
    pub fn new(data_file: PathBuf) -> Self {
        Self { data_file }
    }

    /// Use the given path if present, otherwise the default location.
    pub fn from_option(data_file: Option<PathBuf>) -> Self {
        data_file.map(Self::new).unwrap_or_default()
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        let data_file = directories::ProjectDirs::from("org", "bookshelf", "bookshelf")
            .map(|d| d.data_dir().join(DATA_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(DATA_FILE_NAME));

        Self::new(data_file)
    }
}
