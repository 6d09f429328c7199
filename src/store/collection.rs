use uuid::Uuid;

use super::document::Document;
use crate::backend::StoreImpl;
use crate::path::Path;

/// Operate on the collection identified by a path.
#[derive(Clone)]
pub struct Collection {
    attrs: CollectionAttributes,
    store: StoreImpl,
}

impl Collection {
    pub(crate) fn open(store: StoreImpl, path: Path) -> Collection {
        let attrs = CollectionAttributes { path };
        store.collection().open(&attrs);
        Collection { attrs, store }
    }

    /// Operate on the document with the given ID in this collection.
    ///
    /// Addressing a document does not create it: it only exists once written.
    ///
    /// # Panics
    /// If `id` contains `/`, the path separator.
    pub fn doc<S>(&self, id: S) -> Document
    where
        S: Into<String>,
    {
        let path = self.attrs.path.child(id);
        Document::open(self.store.clone(), path)
    }

    /// Operate on a document in this collection with a new, random, ID.
    pub fn new_doc(&self) -> Document {
        let id = Uuid::new_v4().to_string();
        self.doc(id)
    }

    /// Full path to this collection.
    pub fn path(&self) -> &Path {
        &self.attrs.path
    }
}

/// Attributes attached to all `Collection` operations.
#[derive(Clone, Debug)]
pub struct CollectionAttributes {
    pub path: Path,
}
