use failure::ResultExt;
use opentracingrust::SpanContext;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::collection::Collection;
use crate::backend::DocumentImpl;
use crate::backend::StoreImpl;
use crate::field_path::Patch;
use crate::path::Path;
use crate::ErrorKind;
use crate::Result;

/// Operate on the document identified by a path.
#[derive(Clone)]
pub struct Document {
    attrs: DocumentAttributes,
    document: DocumentImpl,
    store: StoreImpl,
}

impl Document {
    pub(crate) fn open(store: StoreImpl, path: Path) -> Document {
        let attrs = DocumentAttributes { path };
        let document = store.document();
        document.open(&attrs);
        Document {
            attrs,
            document,
            store,
        }
    }

    /// Operate on the sub-collection with the given name.
    ///
    /// # Panics
    /// If `name` contains `/`, the path separator.
    pub fn collection<S>(&self, name: S) -> Collection
    where
        S: Into<String>,
    {
        let path = self.attrs.path.child(name);
        Collection::open(self.store.clone(), path)
    }

    /// Remove the document data, if any.
    ///
    /// Sub-collections of the document are not affected.
    pub fn delete<S>(&self, span: S) -> Result<()>
    where
        S: Into<Option<SpanContext>>,
    {
        self.document.delete(&self.attrs, span.into())
    }

    /// Read the document data, if the document exists.
    pub fn get<T, S>(&self, span: S) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        S: Into<Option<SpanContext>>,
    {
        let value = match self.document.get(&self.attrs, span.into())? {
            None => return Ok(None),
            Some(value) => value,
        };
        let value = serde_json::from_value(value)
            .with_context(|_| ErrorKind::DecodeDocument(self.attrs.path.to_string()))?;
        Ok(Some(value))
    }

    /// Merge `value` into the document data, creating the document if needed.
    ///
    /// Field maps are merged recursively, any other value replaces the stored one.
    /// An empty field map leaves existing data untouched.
    /// Merging fields into stored data (or a nested field) that is not a field map fails:
    /// the mock returns `ErrorKind::MergeIntoNonMap` and MongoDB rejects the update.
    pub fn merge<T, S>(&self, value: &T, span: S) -> Result<()>
    where
        T: Serialize,
        S: Into<Option<SpanContext>>,
    {
        let value = encode(&self.attrs.path, value)?;
        self.document.merge(&self.attrs, value, span.into())
    }

    /// Full path to this document.
    pub fn path(&self) -> &Path {
        &self.attrs.path
    }

    /// Replace the document data with `value`, creating the document if needed.
    pub fn set<T, S>(&self, value: &T, span: S) -> Result<()>
    where
        T: Serialize,
        S: Into<Option<SpanContext>>,
    {
        let value = encode(&self.attrs.path, value)?;
        self.document.set(&self.attrs, value, span.into())
    }

    /// Apply the patches, in order, to the data of an existing document.
    ///
    /// Fails with `ErrorKind::DocumentNotFound` if the document does not exist.
    pub fn update<S>(&self, patches: Vec<Patch>, span: S) -> Result<()>
    where
        S: Into<Option<SpanContext>>,
    {
        self.document.update(&self.attrs, patches, span.into())
    }
}

/// Attributes attached to all `Document` operations.
#[derive(Clone, Debug)]
pub struct DocumentAttributes {
    pub path: Path,
}

/// Encode a model into the value stored for the document at `path`.
pub(crate) fn encode<T>(path: &Path, value: &T) -> Result<Value>
where
    T: Serialize,
{
    let value =
        serde_json::to_value(value).with_context(|_| ErrorKind::EncodeDocument(path.to_string()))?;
    Ok(value)
}
