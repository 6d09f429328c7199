use opentracingrust::SpanContext;
use serde::Serialize;
use serde_json::Value;

use super::document::encode;
use super::document::Document;
use crate::backend::BatchImpl;
use crate::field_path::Patch;
use crate::path::Path;
use crate::Result;

/// Ordered list of writes to apply to the store as one unit.
///
/// Writes are only queued when added to the batch.
/// On commit they are applied in the order they were added, either all of them or none.
pub struct Batch {
    batch: BatchImpl,
    writes: Vec<Write>,
}

impl Batch {
    pub(crate) fn new(batch: BatchImpl) -> Batch {
        Batch {
            batch,
            writes: Vec::new(),
        }
    }

    /// Apply all queued writes.
    ///
    /// If any write fails the error is returned and none of the writes are applied.
    pub fn commit<S>(self, span: S) -> Result<()>
    where
        S: Into<Option<SpanContext>>,
    {
        let Batch { mut batch, writes } = self;
        batch.commit(writes, span.into())
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Queue a merge of `value` into the given document.
    pub fn merge<T>(&mut self, document: &Document, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        let path = document.path().clone();
        let value = encode(&path, value)?;
        self.writes.push(Write::Merge { path, value });
        Ok(())
    }

    /// Queue a full replace of the given document.
    pub fn set<T>(&mut self, document: &Document, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        let path = document.path().clone();
        let value = encode(&path, value)?;
        self.writes.push(Write::Set { path, value });
        Ok(())
    }

    /// Queue patches to an existing document.
    pub fn update(&mut self, document: &Document, patches: Vec<Patch>) {
        let path = document.path().clone();
        self.writes.push(Write::Update { path, patches });
    }

    /// Writes queued so far, in commit order.
    pub fn writes(&self) -> &[Write] {
        &self.writes
    }
}

/// A write queued in a `Batch`.
#[derive(Clone, Debug, PartialEq)]
pub enum Write {
    Merge { path: Path, value: Value },
    Set { path: Path, value: Value },
    Update { path: Path, patches: Vec<Patch> },
}

impl Write {
    /// Path of the document targeted by the write.
    pub fn path(&self) -> &Path {
        match self {
            Write::Merge { path, .. } => path,
            Write::Set { path, .. } => path,
            Write::Update { path, .. } => path,
        }
    }
}
