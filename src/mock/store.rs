use std::sync::Arc;
use std::sync::Mutex;

use opentracingrust::SpanContext;
use serde_json::Value;
use slog::debug;
use slog::Logger;

use super::faults::Faults;
use super::faults::Operation;
use super::tree::merge;
use super::tree::Tree;
use super::MockState;
use crate::backend::BatchImpl;
use crate::backend::BatchInterface;
use crate::backend::CollectionImpl;
use crate::backend::CollectionInterface;
use crate::backend::DocumentImpl;
use crate::backend::DocumentInterface;
use crate::backend::StoreImpl;
use crate::backend::StoreInterface;
use crate::field_path;
use crate::field_path::Patch;
use crate::path::Path;
use crate::store::batch::Write;
use crate::store::collection::CollectionAttributes;
use crate::store::document::DocumentAttributes;
use crate::store::Store;
use crate::ErrorKind;
use crate::Result;

/// Mock implementation of the `StoreInterface`.
pub struct StoreMock {
    pub logger: Logger,
    pub state: Arc<Mutex<MockState>>,
}

impl StoreInterface for StoreMock {
    fn batch(&self) -> BatchImpl {
        let batch = BatchMock {
            logger: self.logger.clone(),
            state: Arc::clone(&self.state),
        };
        BatchImpl::new(batch)
    }

    fn collection(&self) -> CollectionImpl {
        let collection = CollectionMock {
            state: Arc::clone(&self.state),
        };
        CollectionImpl::new(collection)
    }

    fn document(&self) -> DocumentImpl {
        let document = DocumentMock {
            logger: self.logger.clone(),
            state: Arc::clone(&self.state),
        };
        DocumentImpl::new(document)
    }
}

impl From<StoreMock> for Store {
    fn from(store: StoreMock) -> Store {
        let store = StoreImpl::new(store);
        Store::with_impl(store)
    }
}

/// Mock implementation of the `BatchInterface`.
struct BatchMock {
    logger: Logger,
    state: Arc<Mutex<MockState>>,
}

impl BatchInterface for BatchMock {
    fn commit(&mut self, writes: Vec<Write>, _: Option<SpanContext>) -> Result<()> {
        let mut state = self.state.lock().expect("MockStore state lock poisoned");
        let mut staged = state.tree.clone();
        let count = writes.len();
        for write in writes {
            apply(&self.logger, &state.faults, &mut staged, write)?;
        }
        state.tree = staged;
        debug!(self.logger, "Mock batch committed"; "writes" => count);
        Ok(())
    }
}

/// Mock implementation of the `CollectionInterface`.
struct CollectionMock {
    state: Arc<Mutex<MockState>>,
}

impl CollectionInterface for CollectionMock {
    fn open(&self, attrs: &CollectionAttributes) {
        let mut state = self.state.lock().expect("MockStore state lock poisoned");
        state.tree.collection(&attrs.path);
    }
}

/// Mock implementation of the `DocumentInterface`.
struct DocumentMock {
    logger: Logger,
    state: Arc<Mutex<MockState>>,
}

impl DocumentInterface for DocumentMock {
    fn delete(&self, attrs: &DocumentAttributes, _: Option<SpanContext>) -> Result<()> {
        let mut state = self.state.lock().expect("MockStore state lock poisoned");
        check(&self.logger, &state.faults, Operation::Delete, &attrs.path)?;
        state.tree.document(&attrs.path).data = None;
        Ok(())
    }

    fn get(&self, attrs: &DocumentAttributes, _: Option<SpanContext>) -> Result<Option<Value>> {
        let state = self.state.lock().expect("MockStore state lock poisoned");
        check(&self.logger, &state.faults, Operation::Get, &attrs.path)?;
        let data = state
            .tree
            .find_document(&attrs.path)
            .and_then(|document| document.data.clone());
        Ok(data)
    }

    fn merge(&self, attrs: &DocumentAttributes, value: Value, _: Option<SpanContext>) -> Result<()> {
        let path = attrs.path.clone();
        self.write(Write::Merge { path, value })
    }

    fn open(&self, attrs: &DocumentAttributes) {
        let mut state = self.state.lock().expect("MockStore state lock poisoned");
        state.tree.document(&attrs.path);
    }

    fn set(&self, attrs: &DocumentAttributes, value: Value, _: Option<SpanContext>) -> Result<()> {
        let path = attrs.path.clone();
        self.write(Write::Set { path, value })
    }

    fn update(
        &self,
        attrs: &DocumentAttributes,
        patches: Vec<Patch>,
        _: Option<SpanContext>,
    ) -> Result<()> {
        let path = attrs.path.clone();
        self.write(Write::Update { path, patches })
    }
}

impl DocumentMock {
    fn write(&self, write: Write) -> Result<()> {
        let mut state = self.state.lock().expect("MockStore state lock poisoned");
        let MockState { faults, tree } = &mut *state;
        apply(&self.logger, faults, tree, write)
    }
}

/// Apply a single write to the tree, subject to configured faults.
fn apply(logger: &Logger, faults: &Faults, tree: &mut Tree, write: Write) -> Result<()> {
    match write {
        Write::Merge { path, value } => {
            check(logger, faults, Operation::Set, &path)?;
            let document = tree.document(&path);
            match document.data.as_mut() {
                None => document.data = Some(value),
                Some(data) => merge(&path, data, value)?,
            }
        }
        Write::Set { path, value } => {
            check(logger, faults, Operation::Set, &path)?;
            tree.document(&path).data = Some(value);
        }
        Write::Update { path, patches } => {
            let data = match tree.document(&path).data.as_mut() {
                None => return Err(ErrorKind::DocumentNotFound(path.to_string()).into()),
                Some(data) => data,
            };
            check(logger, faults, Operation::Update, &path)?;
            field_path::apply(data, patches);
        }
    }
    Ok(())
}

fn check(logger: &Logger, faults: &Faults, op: Operation, path: &Path) -> Result<()> {
    let result = faults.check(op, path);
    if result.is_err() {
        debug!(
            logger, "Injecting mock store fault";
            "operation" => op.name(), "document" => %path
        );
    }
    result
}
