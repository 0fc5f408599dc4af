//! Environment - the registry of proxy entities built from a store.

use crate::error::{EnvError, Result};
use crate::proxy::ProxyEntity;
use crate::source::StoreSource;
use crate::store::{ConfigurationStore, StoreHandle};
use crate::types::{EntityKey, FieldValue};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// How the flat id index treats an id declared in more than one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Fail construction with [`EnvError::DuplicateEntityId`]
    #[default]
    Reject,

    /// Keep the entity from the first category (sorted order)
    FirstWins,

    /// Keep the entity from the last category (sorted order)
    LastWins,
}

impl DuplicatePolicy {
    pub fn name(&self) -> &'static str {
        match self {
            DuplicatePolicy::Reject => "reject",
            DuplicatePolicy::FirstWins => "first-wins",
            DuplicatePolicy::LastWins => "last-wins",
        }
    }
}

impl std::fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reject" => Ok(DuplicatePolicy::Reject),
            "first-wins" | "first_wins" | "first" => Ok(DuplicatePolicy::FirstWins),
            "last-wins" | "last_wins" | "last" => Ok(DuplicatePolicy::LastWins),
            _ => Err(format!("Unknown duplicate policy: {}", s)),
        }
    }
}

/// Construction options for an [`Environment`].
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    /// Handling of ids shared between categories
    pub duplicate_ids: DuplicatePolicy,
}

/// Entity id → proxy for one category.
#[derive(Debug, Default)]
pub struct CategoryBucket {
    name: String,
    entities: BTreeMap<String, Arc<ProxyEntity>>,
}

impl CategoryBucket {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entities: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up an entity of this category.
    pub fn get(&self, id: &str) -> Result<&Arc<ProxyEntity>> {
        self.entities
            .get(id)
            .ok_or_else(|| EnvError::unknown_entity(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<ProxyEntity>)> {
        self.entities.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl std::ops::Index<&str> for CategoryBucket {
    type Output = ProxyEntity;

    /// Map-style access. Panics if `id` is not in this category; use
    /// [`CategoryBucket::get`] for a fallible lookup.
    fn index(&self, id: &str) -> &ProxyEntity {
        match self.entities.get(id) {
            Some(proxy) => proxy.as_ref(),
            None => panic!("no entity {} in category {}", id, self.name),
        }
    }
}

/// The materialized environment.
///
/// Built once from a store; afterwards only queried. Every entity has
/// exactly one [`ProxyEntity`], shared between its category bucket and
/// the flat id index.
#[derive(Debug)]
pub struct Environment {
    store: StoreHandle,
    registry: BTreeMap<String, CategoryBucket>,
    by_id: BTreeMap<String, Arc<ProxyEntity>>,
    config: EnvConfig,
}

impl Environment {
    /// Builds an environment that owns `store`.
    pub fn new(store: ConfigurationStore) -> Result<Self> {
        Self::construct(StoreHandle::new(store), EnvConfig::default())
    }

    /// Loads a store from `source` and builds an environment over it.
    pub fn load<S: StoreSource + ?Sized>(source: &S, config: EnvConfig) -> Result<Self> {
        let store = source.load()?;
        debug!("Loaded store from {}", source.describe());
        Self::construct(StoreHandle::new(store), config)
    }

    /// Builds the registry over a shared store.
    ///
    /// The store must not be written while construction runs.
    pub fn construct(store: StoreHandle, config: EnvConfig) -> Result<Self> {
        let mut registry = BTreeMap::new();
        let mut by_id: BTreeMap<String, Arc<ProxyEntity>> = BTreeMap::new();

        {
            let data = store.read();

            for (category, entities) in data.iter() {
                let mut bucket = CategoryBucket::new(category);

                for (id, fields) in entities {
                    let key = EntityKey::new(category, id.as_str());
                    let proxy = Arc::new(ProxyEntity::bind(&store, key, fields.keys().cloned()));
                    debug!("Bound {} ({} fields)", proxy.key(), proxy.field_count());

                    Self::register(&mut by_id, id, &proxy, config.duplicate_ids)?;
                    bucket.entities.insert(id.clone(), proxy);
                }

                debug!("Category {}: {} entities", category, bucket.len());
                registry.insert(category.to_string(), bucket);
            }
        }

        Ok(Self {
            store,
            registry,
            by_id,
            config,
        })
    }

    fn register(
        by_id: &mut BTreeMap<String, Arc<ProxyEntity>>,
        id: &str,
        proxy: &Arc<ProxyEntity>,
        policy: DuplicatePolicy,
    ) -> Result<()> {
        match by_id.entry(id.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(Arc::clone(proxy));
            }
            Entry::Occupied(mut slot) => {
                let first = slot.get().category().to_string();
                let second = proxy.category().to_string();
                match policy {
                    DuplicatePolicy::Reject => {
                        return Err(EnvError::DuplicateEntityId {
                            id: id.to_string(),
                            first,
                            second,
                        });
                    }
                    DuplicatePolicy::FirstWins => {
                        warn!("Id {} in {} shadowed by earlier {}", id, second, first);
                    }
                    DuplicatePolicy::LastWins => {
                        warn!("Id {} in {} replaced by {}", id, first, second);
                        slot.insert(Arc::clone(proxy));
                    }
                }
            }
        }
        Ok(())
    }

    /// Returns the bucket for `name`.
    pub fn category(&self, name: &str) -> Result<&CategoryBucket> {
        self.registry
            .get(name)
            .ok_or_else(|| EnvError::UnknownCategory(name.to_string()))
    }

    /// Returns the proxy for `id`, regardless of its category.
    pub fn entity(&self, id: &str) -> Result<&Arc<ProxyEntity>> {
        self.by_id.get(id).ok_or_else(|| EnvError::unknown_entity(id))
    }

    /// Resolves an id found inside a field value.
    ///
    /// Same lookup as [`entity`](Self::entity), but a miss is reported as
    /// [`EnvError::DanglingReference`].
    pub fn resolve(&self, id: &str) -> Result<&Arc<ProxyEntity>> {
        self.by_id.get(id).ok_or_else(|| EnvError::dangling(id))
    }

    /// Resolves every id of a reference list, preserving order.
    pub fn resolve_all<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<Arc<ProxyEntity>>> {
        ids.iter()
            .map(|id| self.resolve(id.as_ref()).map(Arc::clone))
            .collect()
    }

    /// Reads `field` of `proxy` and resolves it as a reference list.
    pub fn resolve_field(&self, proxy: &ProxyEntity, field: &str) -> Result<Vec<Arc<ProxyEntity>>> {
        match proxy.get(field)? {
            FieldValue::References(ids) => self.resolve_all(&ids),
            other => Err(EnvError::NotAReferenceList {
                entity: proxy.key().to_string(),
                field: field.to_string(),
                found: other.kind(),
            }),
        }
    }

    /// Category names, sorted.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.registry.keys().map(String::as_str)
    }

    /// All buckets, sorted by name.
    pub fn buckets(&self) -> impl Iterator<Item = &CategoryBucket> {
        self.registry.values()
    }

    /// Entities of the flat index, sorted by id.
    pub fn entities(&self) -> impl Iterator<Item = &Arc<ProxyEntity>> {
        self.by_id.values()
    }

    pub fn category_count(&self) -> usize {
        self.registry.len()
    }

    /// Number of proxies created (every category, shadowed ids included).
    pub fn entity_count(&self) -> usize {
        self.registry.values().map(CategoryBucket::len).sum()
    }

    /// The shared store the proxies read from.
    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }
}
