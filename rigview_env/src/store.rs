//! The configuration store and its shared handle.

use crate::error::{EnvError, Result};
use crate::types::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Field name → value for one entity.
pub type EntityFields = BTreeMap<String, FieldValue>;

/// Entity id → fields for one category.
pub type CategoryEntities = BTreeMap<String, EntityFields>;

/// Three-level mapping: category → entity id → field name → value.
///
/// Entities of the same category need not share a field set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigurationStore {
    categories: BTreeMap<String, CategoryEntities>,
}

impl ConfigurationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a store from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| EnvError::unavailable("json", e))
    }

    /// Converts an already-parsed JSON document into a store.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| EnvError::unavailable("json", e))
    }

    /// Adds an empty category if it does not exist yet.
    pub fn insert_category(&mut self, category: impl Into<String>) {
        self.categories.entry(category.into()).or_default();
    }

    /// Inserts (or replaces) an entity with the given fields.
    pub fn insert_entity<I, K, V>(&mut self, category: &str, id: &str, fields: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let fields = fields
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.categories
            .entry(category.to_string())
            .or_default()
            .insert(id.to_string(), fields);
    }

    /// Sets one field, creating the category and entity as needed.
    ///
    /// Returns the previous value.
    pub fn set_field(
        &mut self,
        category: &str,
        id: &str,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.categories
            .entry(category.to_string())
            .or_default()
            .entry(id.to_string())
            .or_default()
            .insert(field.to_string(), value.into())
    }

    /// Removes one field and returns its value.
    pub fn remove_field(&mut self, category: &str, id: &str, field: &str) -> Option<FieldValue> {
        self.categories
            .get_mut(category)?
            .get_mut(id)?
            .remove(field)
    }

    /// Looks up a single value.
    pub fn field(&self, category: &str, id: &str, field: &str) -> Option<&FieldValue> {
        self.entity_fields(category, id)?.get(field)
    }

    /// Returns all fields of one entity.
    pub fn entity_fields(&self, category: &str, id: &str) -> Option<&EntityFields> {
        self.categories.get(category)?.get(id)
    }

    /// Returns the entities of one category.
    pub fn category(&self, category: &str) -> Option<&CategoryEntities> {
        self.categories.get(category)
    }

    /// Category names in sorted order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Entity ids of one category in sorted order (empty if unknown).
    pub fn entity_ids<'a>(&'a self, category: &str) -> impl Iterator<Item = &'a str> {
        self.categories
            .get(category)
            .into_iter()
            .flat_map(|entities| entities.keys().map(String::as_str))
    }

    /// Iterates categories with their entities.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategoryEntities)> {
        self.categories.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Total number of entities across all categories.
    pub fn entity_count(&self) -> usize {
        self.categories.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Shared, live reference to a [`ConfigurationStore`].
///
/// Cloning the handle clones the reference, not the data. Proxies read
/// through it on every accessor call. The external owner writes through
/// [`StoreHandle::write`]; the environment itself only ever reads.
#[derive(Debug, Clone, Default)]
pub struct StoreHandle {
    inner: Arc<RwLock<ConfigurationStore>>,
}

impl StoreHandle {
    /// Wraps a store into a new shared handle.
    pub fn new(store: ConfigurationStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Acquires a read guard.
    pub fn read(&self) -> RwLockReadGuard<'_, ConfigurationStore> {
        // Values are plain data; a panicked writer cannot leave them torn.
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Acquires a write guard. Intended for the store's external owner.
    pub fn write(&self) -> RwLockWriteGuard<'_, ConfigurationStore> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reads one value, cloning it out of the store.
    pub fn field(&self, category: &str, id: &str, field: &str) -> Option<FieldValue> {
        self.read().field(category, id, field).cloned()
    }

    /// True if both handles point at the same store.
    pub fn same_store(&self, other: &StoreHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl From<ConfigurationStore> for StoreHandle {
    fn from(store: ConfigurationStore) -> Self {
        Self::new(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ConfigurationStore {
        let mut store = ConfigurationStore::new();
        store.insert_entity("beams", "BEAM_ID_1", [("getAngle", 50i64), ("getRate", 10)]);
        store.insert_entity(
            "antennas",
            "ANTENNA_ID_1",
            [("getBeams", FieldValue::from(vec!["BEAM_ID_1"]))],
        );
        store.insert_category("sensors");
        store
    }

    #[test]
    fn test_lookup() {
        let store = sample();
        assert_eq!(
            store.field("beams", "BEAM_ID_1", "getAngle"),
            Some(&FieldValue::Integer(50))
        );
        assert_eq!(store.field("beams", "BEAM_ID_1", "getColor"), None);
        assert_eq!(store.field("lasers", "BEAM_ID_1", "getAngle"), None);
    }

    #[test]
    fn test_counts_include_empty_category() {
        let store = sample();
        assert_eq!(store.category_count(), 3);
        assert_eq!(store.entity_count(), 2);
        assert_eq!(store.entity_ids("sensors").count(), 0);
        assert_eq!(store.entity_ids("missing").count(), 0);
    }

    #[test]
    fn test_set_and_remove_field() {
        let mut store = sample();
        let prev = store.set_field("beams", "BEAM_ID_1", "getAngle", 90i64);
        assert_eq!(prev, Some(FieldValue::Integer(50)));
        assert_eq!(
            store.remove_field("beams", "BEAM_ID_1", "getAngle"),
            Some(FieldValue::Integer(90))
        );
        assert_eq!(store.remove_field("beams", "BEAM_ID_1", "getAngle"), None);
    }

    #[test]
    fn test_json_round_trip_shape() {
        let store = ConfigurationStore::from_json_str(
            r#"{"beams": {"BEAM_ID_1": {"getAngle": 50}}, "antennas": {}}"#,
        )
        .unwrap();
        assert_eq!(store.category_count(), 2);
        assert!(store.category("antennas").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_json_is_unavailable() {
        let err = ConfigurationStore::from_json_str("{\"beams\": 5}").unwrap_err();
        assert!(matches!(err, EnvError::StoreUnavailable { .. }));
    }

    #[test]
    fn test_handle_shares_data() {
        let handle = StoreHandle::new(sample());
        let other = handle.clone();
        other.write().set_field("beams", "BEAM_ID_1", "getAngle", 1i64);
        assert_eq!(
            handle.field("beams", "BEAM_ID_1", "getAngle"),
            Some(FieldValue::Integer(1))
        );
        assert!(handle.same_store(&other));
        assert!(!handle.same_store(&StoreHandle::new(sample())));
    }
}
