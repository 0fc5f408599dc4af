//! RigView Harness
//!
//! External collaborators for the `rigview_env` core:
//! - **Reference data**: the built-in beams/antennas data set
//! - **Loader**: [`JsonFileSource`], a JSON file implementing `StoreSource`
//! - **Queries**: walkthrough and lookup queries with printable output
//!
//! # Usage
//!
//! ```ignore
//! use rigview_sim::{queries, reference_store, Query};
//! use rigview_env::Environment;
//!
//! let env = Environment::new(reference_store()?)?;
//! for line in queries::run(&env, &Query::Walkthrough)?.lines() {
//!     println!("{}", line);
//! }
//! ```

mod error;
mod loader;
mod reference;
pub mod queries;

pub use error::SimError;
pub use loader::JsonFileSource;
pub use queries::{EntityReport, Query, QueryOutput, Walkthrough};
pub use reference::{reference_json, reference_store};
