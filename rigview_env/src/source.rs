//! Store source abstraction.

use crate::error::Result;
use crate::store::ConfigurationStore;

/// Something that can produce a [`ConfigurationStore`].
///
/// This is the seam for the external loader (literal data, file, network).
/// Implementations must report every failure as
/// [`EnvError::StoreUnavailable`](crate::EnvError::StoreUnavailable).
///
/// # Implementations
///
/// - **In-memory**: `ConfigurationStore` itself (returns a clone)
/// - **File**: `rigview_sim::JsonFileSource`
pub trait StoreSource {
    /// Produces the store, or fails as a whole.
    fn load(&self) -> Result<ConfigurationStore>;

    /// Human-readable name of the source (for logging).
    fn describe(&self) -> String;
}

impl StoreSource for ConfigurationStore {
    fn load(&self) -> Result<ConfigurationStore> {
        Ok(self.clone())
    }

    fn describe(&self) -> String {
        "in-memory store".to_string()
    }
}

impl<S: StoreSource + ?Sized> StoreSource for &S {
    fn load(&self) -> Result<ConfigurationStore> {
        (**self).load()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
