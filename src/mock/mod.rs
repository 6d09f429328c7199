use std::sync::Arc;
use std::sync::Mutex;

use slog::o;
use slog::Discard;
use slog::Logger;

use crate::path::Path;
use crate::store::Store;

mod faults;
mod store;
mod tree;

#[cfg(test)]
mod tests;

pub use self::faults::Faults;
pub use self::faults::Operation;
pub use self::tree::CollectionNode;
pub use self::tree::DocumentNode;
pub use self::tree::Tree;

/// Manage an in-memory document store for tests.
///
/// Stores returned by `Mock::store` share the same state, and so do clones of the mock.
/// Faults can be injected for individual operations on individual documents.
#[derive(Clone)]
pub struct Mock {
    pub state: Arc<Mutex<MockState>>,
    logger: Logger,
}

impl Default for Mock {
    fn default() -> Mock {
        Mock::with_logger(Logger::root(Discard, o!()))
    }
}

impl Mock {
    /// Create an empty mock that logs injected faults and commits to `logger`.
    pub fn with_logger(logger: Logger) -> Mock {
        Mock {
            state: Arc::new(Mutex::new(MockState::default())),
            logger,
        }
    }

    /// Sorted names of the sub-collections of the document at `path`.
    ///
    /// Collections appear once addressed, even if they hold no documents.
    pub fn collections(&self, path: &Path) -> Vec<String> {
        let state = self.state.lock().expect("MockStore state lock poisoned");
        let mut names: Vec<String> = state
            .tree
            .find_document(path)
            .map(|document| document.collections.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// True if the document at `path` currently holds data.
    pub fn exists(&self, path: &Path) -> bool {
        let state = self.state.lock().expect("MockStore state lock poisoned");
        state
            .tree
            .find_document(path)
            .map(|document| document.data.is_some())
            .unwrap_or(false)
    }

    /// Configure a fault for `op` on the document at `path`.
    ///
    /// Passing `true` arms the fault while `false` clears it.
    pub fn fails_on<S>(&self, op: Operation, path: S, fails: bool)
    where
        S: Into<String>,
    {
        let mut state = self.state.lock().expect("MockStore state lock poisoned");
        state.faults.configure(op, path.into(), fails);
    }

    pub fn fails_on_delete<S: Into<String>>(&self, path: S, fails: bool) {
        self.fails_on(Operation::Delete, path, fails);
    }

    pub fn fails_on_get<S: Into<String>>(&self, path: S, fails: bool) {
        self.fails_on(Operation::Get, path, fails);
    }

    /// Configure a fault for full replace and merge writes to the document at `path`.
    pub fn fails_on_set<S: Into<String>>(&self, path: S, fails: bool) {
        self.fails_on(Operation::Set, path, fails);
    }

    pub fn fails_on_update<S: Into<String>>(&self, path: S, fails: bool) {
        self.fails_on(Operation::Update, path, fails);
    }

    /// Return a `Store` "view" into the mock.
    pub fn store(&self) -> Store {
        let store = self::store::StoreMock {
            logger: self.logger.clone(),
            state: Arc::clone(&self.state),
        };
        store.into()
    }
}

/// Internal mock state.
#[derive(Default)]
pub struct MockState {
    pub faults: Faults,
    pub tree: Tree,
}
