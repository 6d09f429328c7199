use std::collections::HashMap;

use serde_json::Map;
use serde_json::Value;

use crate::path::Path;
use crate::ErrorKind;
use crate::Result;

/// Root of the in-memory document hierarchy: top level collections by name.
#[derive(Clone, Debug, Default)]
pub struct Tree {
    pub collections: HashMap<String, CollectionNode>,
}

/// Documents in a collection, by ID.
#[derive(Clone, Debug, Default)]
pub struct CollectionNode {
    pub documents: HashMap<String, DocumentNode>,
}

/// Document data (if the document exists) and sub-collections by name.
///
/// A node can be present in the tree, and have sub-collections,
/// while the document itself does not exist (`data` is `None`).
#[derive(Clone, Debug, Default)]
pub struct DocumentNode {
    pub collections: HashMap<String, CollectionNode>,
    pub data: Option<Value>,
}

impl Tree {
    /// Return the collection node at `path`, creating it and its ancestors if needed.
    pub fn collection(&mut self, path: &Path) -> &mut CollectionNode {
        debug_assert!(path.is_collection(), "path '{}' is not a collection", path);
        let (name, parents) = match path.segments().split_last() {
            Some(split) => split,
            None => unreachable!("paths always have at least one segment"),
        };
        let mut collections = &mut self.collections;
        for pair in parents.chunks_exact(2) {
            let collection = collections.entry(pair[0].clone()).or_default();
            let document = collection.documents.entry(pair[1].clone()).or_default();
            collections = &mut document.collections;
        }
        collections.entry(name.clone()).or_default()
    }

    /// Return the document node at `path`, creating it and its ancestors if needed.
    pub fn document(&mut self, path: &Path) -> &mut DocumentNode {
        debug_assert!(path.is_document(), "path '{}' is not a document", path);
        let parent = match path.parent() {
            Some(parent) => parent,
            None => unreachable!("document paths always have a parent collection"),
        };
        self.collection(&parent)
            .documents
            .entry(path.id().to_string())
            .or_default()
    }

    /// Look up the document node at `path` without creating anything.
    pub fn find_document(&self, path: &Path) -> Option<&DocumentNode> {
        let segments = path.segments();
        let (first, rest) = segments.split_first()?;
        let mut collection = self.collections.get(first)?;
        let mut document = None;
        for (index, segment) in rest.iter().enumerate() {
            if index % 2 == 0 {
                let node = collection.documents.get(segment)?;
                document = Some(node);
            } else {
                collection = document?.collections.get(segment)?;
                document = None;
            }
        }
        document
    }
}

/// Merge `value` into the data of the document at `path`.
///
/// An empty field map leaves the data unchanged and any value other than a
/// field map replaces it. Non-empty field maps are merged recursively: nested
/// non-empty maps are merged into existing fields, anything else is assigned.
/// Merging fields into a value that is not a map fails, leaving the data unchanged.
pub fn merge(path: &Path, target: &mut Value, value: Value) -> Result<()> {
    let fields = match value {
        Value::Object(fields) if fields.is_empty() => return Ok(()),
        Value::Object(fields) => fields,
        value => {
            *target = value;
            return Ok(());
        }
    };
    let mut merged = target.clone();
    if !merge_fields(&mut merged, fields) {
        return Err(ErrorKind::MergeIntoNonMap(path.to_string()).into());
    }
    *target = merged;
    Ok(())
}

fn merge_fields(target: &mut Value, fields: Map<String, Value>) -> bool {
    let target = match target.as_object_mut() {
        Some(target) => target,
        None => return false,
    };
    for (key, value) in fields {
        let nested = match value {
            Value::Object(nested) if !nested.is_empty() => nested,
            value => {
                target.insert(key, value);
                continue;
            }
        };
        match target.get_mut(&key) {
            Some(existing) => {
                if !merge_fields(existing, nested) {
                    return false;
                }
            }
            None => {
                target.insert(key, Value::Object(nested));
            }
        }
    }
    true
}
