use std::sync::Arc;

use opentracingrust::Tracer;
use slog::Logger;

use crate::backend::backend_factory;
use crate::backend::StoreImpl;
use crate::path::Path;
use crate::Config;
use crate::Result;

pub mod batch;
pub mod collection;
pub mod document;

use self::batch::Batch;
use self::collection::Collection;

/// Interface to a hierarchical document store.
///
/// Collections hold documents and documents can hold sub-collections.
/// This interface abstracts every interaction with the persistence layer and
/// hides implementation details about storage software and data encoding.
///
/// # Document existence
/// A document exists only while it holds data.
/// Sub-collections are independent of their parent document: deleting a document
/// does not affect its sub-collections, and sub-collections can be populated under
/// documents that were never written.
///
/// # Concurrency and transactions
/// Single document operations are applied individually.
/// Use a `Batch` to apply writes to multiple documents as one unit.
#[derive(Clone)]
pub struct Store {
    store: StoreImpl,
}

impl Store {
    /// Instantiate a new storage interface.
    pub fn make<T>(config: Config, logger: Logger, tracer: T) -> Result<Store>
    where
        T: Into<Option<Arc<Tracer>>>,
    {
        let store = backend_factory(config, logger, tracer)?;
        Ok(Store { store })
    }

    /// Instantiate a store with the given implementation.
    #[cfg(any(test, feature = "with_test_support"))]
    pub(crate) fn with_impl(store: StoreImpl) -> Store {
        Store { store }
    }

    /// Start a new, empty, batch of writes.
    pub fn batch(&self) -> Batch {
        let batch = self.store.batch();
        Batch::new(batch)
    }

    /// Operate on the top level collection with the given name.
    ///
    /// # Panics
    /// If `name` contains `/`, the path separator.
    pub fn collection<S>(&self, name: S) -> Collection
    where
        S: Into<String>,
    {
        let path = Path::collection(name);
        Collection::open(self.store.clone(), path)
    }
}
