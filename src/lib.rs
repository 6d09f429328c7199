//! Storage agnostic interface to hierarchical document stores.
//!
//! Collections hold documents, identified by ID, and documents hold sub-collections.
//! Documents are read and written as `serde` models, individually or in batches,
//! and existing documents can be patched one field at a time with dot separated field paths.
//!
//! With the `with_test_support` feature an in-memory `mock::Mock` store is available
//! to test code using the `Store` interface, including injecting faults.
mod backend;
mod config;
mod error;

pub mod field_path;
#[cfg(any(test, feature = "with_test_support"))]
pub mod mock;
pub mod path;
pub mod store;

pub use self::backend::register_metrics;
pub use self::config::Config;
pub use self::config::MongoDBConfig;
pub use self::error::Error;
pub use self::error::ErrorKind;
pub use self::error::Result;
pub use self::field_path::FieldPath;
pub use self::field_path::Patch;
pub use self::field_path::PatchValue;
pub use self::path::Path;
pub use self::store::batch::Batch;
pub use self::store::batch::Write;
pub use self::store::collection::Collection;
pub use self::store::document::Document;
pub use self::store::Store;
