//! Proxy entities and their late-bound field accessors.

use crate::error::{EnvError, Result};
use crate::store::StoreHandle;
use crate::types::{EntityKey, FieldValue};
use std::collections::BTreeMap;

/// Zero-argument accessor bound to one (category, id, field) triple.
///
/// Holds the store handle, never the value: every [`call`](Self::call)
/// goes back to the store.
#[derive(Debug, Clone)]
pub struct FieldAccessor {
    store: StoreHandle,
    key: EntityKey,
    field: String,
}

impl FieldAccessor {
    fn new(store: StoreHandle, key: EntityKey, field: String) -> Self {
        Self { store, key, field }
    }

    /// Name of the field this accessor reads.
    pub fn name(&self) -> &str {
        &self.field
    }

    /// Reads the current value from the store.
    pub fn call(&self) -> Result<FieldValue> {
        self.store
            .field(&self.key.category, &self.key.id, &self.field)
            .ok_or_else(|| EnvError::FieldVanished {
                category: self.key.category.clone(),
                id: self.key.id.clone(),
                field: self.field.clone(),
            })
    }
}

/// Read-only view over one entity of the configuration store.
///
/// The accessor set is fixed when the proxy is created: fields added to
/// the store later do not show up here, but values of the recorded fields
/// are always read at call time.
#[derive(Debug)]
pub struct ProxyEntity {
    key: EntityKey,
    accessors: BTreeMap<String, FieldAccessor>,
}

impl ProxyEntity {
    /// Binds a proxy to `(category, id)`, recording the given field names.
    pub(crate) fn bind<I>(store: &StoreHandle, key: EntityKey, fields: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let accessors = fields
            .into_iter()
            .map(|field| {
                let accessor = FieldAccessor::new(store.clone(), key.clone(), field.clone());
                (field, accessor)
            })
            .collect();

        Self { key, accessors }
    }

    pub fn key(&self) -> &EntityKey {
        &self.key
    }

    pub fn category(&self) -> &str {
        &self.key.category
    }

    pub fn id(&self) -> &str {
        &self.key.id
    }

    /// Names of the recorded fields, sorted.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.accessors.keys().map(String::as_str)
    }

    pub fn field_count(&self) -> usize {
        self.accessors.len()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.accessors.contains_key(field)
    }

    /// Returns the accessor for `field`, if it was recorded.
    pub fn accessor(&self, field: &str) -> Option<&FieldAccessor> {
        self.accessors.get(field)
    }

    /// Invokes the accessor named `field`.
    ///
    /// # Errors
    ///
    /// - [`EnvError::UnknownField`] if no such accessor was recorded
    /// - [`EnvError::FieldVanished`] if the store entry has since been removed
    pub fn get(&self, field: &str) -> Result<FieldValue> {
        self.accessors
            .get(field)
            .ok_or_else(|| EnvError::UnknownField {
                entity: self.key.to_string(),
                field: field.to_string(),
            })?
            .call()
    }

    /// Reads every recorded field right now.
    ///
    /// Fields whose store entry has disappeared are skipped.
    pub fn snapshot(&self) -> BTreeMap<String, FieldValue> {
        self.accessors
            .iter()
            .filter_map(|(name, accessor)| accessor.call().ok().map(|v| (name.clone(), v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ConfigurationStore;

    fn beam_store() -> StoreHandle {
        let mut store = ConfigurationStore::new();
        store.insert_entity("beams", "BEAM_ID_1", [("getAngle", 50i64), ("getRate", 10)]);
        StoreHandle::new(store)
    }

    fn beam_proxy(store: &StoreHandle) -> ProxyEntity {
        let fields: Vec<String> = store
            .read()
            .entity_fields("beams", "BEAM_ID_1")
            .map(|f| f.keys().cloned().collect())
            .unwrap_or_default();
        ProxyEntity::bind(store, EntityKey::new("beams", "BEAM_ID_1"), fields)
    }

    #[test]
    fn test_accessor_reads_store() {
        let store = beam_store();
        let proxy = beam_proxy(&store);

        assert_eq!(proxy.get("getAngle").unwrap(), FieldValue::Integer(50));
        assert_eq!(proxy.fields().collect::<Vec<_>>(), vec!["getAngle", "getRate"]);
        assert_eq!(proxy.accessor("getRate").map(FieldAccessor::name), Some("getRate"));
    }

    #[test]
    fn test_accessor_is_late_bound() {
        let store = beam_store();
        let proxy = beam_proxy(&store);
        let accessor = proxy.accessor("getAngle").unwrap().clone();

        store.write().set_field("beams", "BEAM_ID_1", "getAngle", 75i64);

        assert_eq!(accessor.call().unwrap(), FieldValue::Integer(75));
        assert_eq!(proxy.get("getAngle").unwrap(), FieldValue::Integer(75));
    }

    #[test]
    fn test_unknown_field() {
        let store = beam_store();
        let proxy = beam_proxy(&store);

        let err = proxy.get("getColor").unwrap_err();
        assert!(matches!(err, EnvError::UnknownField { .. }));
    }

    #[test]
    fn test_vanished_field() {
        let store = beam_store();
        let proxy = beam_proxy(&store);

        store.write().remove_field("beams", "BEAM_ID_1", "getRate");

        assert!(proxy.has_field("getRate"));
        assert!(matches!(
            proxy.get("getRate").unwrap_err(),
            EnvError::FieldVanished { .. }
        ));
        let snapshot = proxy.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.contains_key("getAngle"));
    }
}
