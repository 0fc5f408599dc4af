//! RigView Environment Materialization Layer
//!
//! This crate turns a nested, schema-less configuration blob describing
//! simulated hardware (beams, antennas, ...) into a registry of
//! **proxy entities** that can be addressed by id and read field by field.
//!
//! # Core Concept: Late Binding
//!
//! A [`ProxyEntity`] never copies its field values. Each accessor captures
//! the shared [`StoreHandle`] plus its `(category, id, field)` triple and
//! re-reads the store on every call:
//! - Field **values** follow the store after construction
//! - The field **set** is fixed when the proxy is created
//! - Proxy **identity** is stable: one `Arc<ProxyEntity>` per entity
//!
//! # Example
//!
//! ```
//! use rigview_env::{ConfigurationStore, Environment, FieldValue};
//!
//! let mut store = ConfigurationStore::new();
//! store.insert_entity("beams", "BEAM_ID_1", [("getAngle", 50i64)]);
//! store.insert_entity(
//!     "antennas",
//!     "ANTENNA_ID_1",
//!     [("getBeams", FieldValue::from(vec!["BEAM_ID_1"]))],
//! );
//!
//! let env = Environment::new(store).unwrap();
//! let beam = env.category("beams").unwrap().get("BEAM_ID_1").unwrap();
//! assert_eq!(beam.get("getAngle").unwrap(), FieldValue::Integer(50));
//!
//! for beam in env.resolve_field(env.entity("ANTENNA_ID_1").unwrap(), "getBeams").unwrap() {
//!     assert_eq!(beam.get("getAngle").unwrap().as_i64(), Some(50));
//! }
//! ```

mod environment;
mod error;
mod proxy;
mod source;
mod store;
mod types;

pub use environment::{CategoryBucket, DuplicatePolicy, EnvConfig, Environment};
pub use error::{EnvError, Result};
pub use proxy::{FieldAccessor, ProxyEntity};
pub use source::StoreSource;
pub use store::{CategoryEntities, ConfigurationStore, EntityFields, StoreHandle};
pub use types::{EntityKey, FieldValue};
