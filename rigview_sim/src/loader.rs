//! JSON file source for configuration stores.

use rigview_env::{ConfigurationStore, EnvError, Result, StoreSource};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads a [`ConfigurationStore`] from a JSON file.
///
/// The file must hold an object of categories, each an object of entity
/// ids, each an object of field names to scalar or id-list values.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StoreSource for JsonFileSource {
    fn load(&self) -> Result<ConfigurationStore> {
        let name = self.describe();
        let file = File::open(&self.path).map_err(|e| EnvError::unavailable(&name, e))?;
        let store: ConfigurationStore = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| EnvError::unavailable(&name, e))?;

        debug!(
            "Parsed {}: {} categories, {} entities",
            name,
            store.category_count(),
            store.entity_count()
        );
        Ok(store)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
