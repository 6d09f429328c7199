use bson::doc;
use bson::Bson;
use bson::Document as BsonDocument;
use failure::ResultExt;
use serde_json::Value;

use super::constants::FIELD_DATA;
use super::constants::FIELD_ID;
use crate::field_path::FieldPath;
use crate::field_path::Patch;
use crate::field_path::PatchValue;
use crate::path::Path;
use crate::ErrorKind;
use crate::Result;

/// Name of the MongoDB collection holding the document at `path`.
pub fn collection_name(path: &Path) -> String {
    path.parent()
        .map(|parent| parent.to_string())
        .unwrap_or_else(|| path.to_string())
}

/// Extract the store value from a MongoDB document.
pub fn decode_document(path: &Path, mut document: BsonDocument) -> Result<Option<Value>> {
    let data = match document.remove(FIELD_DATA) {
        None => return Ok(None),
        Some(data) => data,
    };
    let value = bson::from_bson(data)
        .with_context(|_| ErrorKind::MongoDBBsonDecode(path.to_string()))?;
    Ok(Some(value))
}

/// Filter matching the MongoDB document for the store document at `path`.
pub fn id_filter(path: &Path) -> BsonDocument {
    let mut filter = BsonDocument::new();
    filter.insert(FIELD_ID, path.id());
    filter
}

/// Update merging `value` into the stored value.
///
/// Field maps are flattened into dotted `$set` keys so that stored fields
/// not mentioned in `value` are preserved.
pub fn merge_update(path: &Path, value: &Value) -> Result<BsonDocument> {
    let fields = match value {
        Value::Object(map) if map.is_empty() => {
            let mut fields = BsonDocument::new();
            fields.insert(FIELD_DATA, BsonDocument::new());
            return Ok(doc! {"$setOnInsert": fields});
        }
        Value::Object(map) => {
            let mut fields = BsonDocument::new();
            for (key, value) in map {
                flatten(path, format!("{}.{}", FIELD_DATA, key), value, &mut fields)?;
            }
            fields
        }
        value => {
            let mut fields = BsonDocument::new();
            fields.insert(FIELD_DATA, to_bson(path, value)?);
            fields
        }
    };
    Ok(doc! {"$set": fields})
}

/// Update applying `patches`, `None` if there is nothing to change.
pub fn patches_update(path: &Path, patches: Vec<Patch>) -> Result<Option<BsonDocument>> {
    let mut set = BsonDocument::new();
    let mut unset = BsonDocument::new();
    for patch in patches {
        let field = data_field(&patch.path);
        match patch.value {
            PatchValue::Delete => {
                set.remove(&field);
                unset.insert(field, "");
            }
            PatchValue::Set(value) => {
                unset.remove(&field);
                set.insert(field, to_bson(path, &value)?);
            }
        }
    }
    let mut update = BsonDocument::new();
    if !set.is_empty() {
        update.insert("$set", set);
    }
    if !unset.is_empty() {
        update.insert("$unset", unset);
    }
    if update.is_empty() {
        return Ok(None);
    }
    Ok(Some(update))
}

/// MongoDB document storing `value` for the store document at `path`.
pub fn replacement(path: &Path, value: &Value) -> Result<BsonDocument> {
    let mut document = BsonDocument::new();
    document.insert(FIELD_ID, path.id());
    document.insert(FIELD_DATA, to_bson(path, value)?);
    Ok(document)
}

fn data_field(path: &FieldPath) -> String {
    if path.is_empty() {
        return FIELD_DATA.to_string();
    }
    format!("{}.{}", FIELD_DATA, path)
}

fn flatten(path: &Path, prefix: String, value: &Value, fields: &mut BsonDocument) -> Result<()> {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, value) in map {
                flatten(path, format!("{}.{}", prefix, key), value, fields)?;
            }
        }
        value => {
            fields.insert(prefix, to_bson(path, value)?);
        }
    }
    Ok(())
}

fn to_bson(path: &Path, value: &Value) -> Result<Bson> {
    let value =
        bson::to_bson(value).with_context(|_| ErrorKind::MongoDBBsonEncode(path.to_string()))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use bson::doc;
    use serde_json::json;

    use crate::field_path::Patch;
    use crate::path::Path;

    fn alice() -> Path {
        Path::collection("users").child("alice")
    }

    #[test]
    fn collection_name_from_parent_path() {
        let post = alice().child("posts").child("p1");
        assert_eq!(super::collection_name(&alice()), "users");
        assert_eq!(super::collection_name(&post), "users/alice/posts");
    }

    #[test]
    fn decode_document_data() {
        let document = doc! {"_id": "alice", "data": {"name": "Alice"}};
        let value = super::decode_document(&alice(), document).unwrap();
        assert_eq!(value, Some(json!({"name": "Alice"})));
    }

    #[test]
    fn decode_document_without_data() {
        let document = doc! {"_id": "alice"};
        let value = super::decode_document(&alice(), document).unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn merge_update_flattens_maps() {
        let value = json!({"name": "Alice", "addr": {"city": "Cork"}});
        let update = super::merge_update(&alice(), &value).unwrap();
        let fields = update.get_document("$set").unwrap();
        assert_eq!(fields.get_str("data.name").unwrap(), "Alice");
        assert_eq!(fields.get_str("data.addr.city").unwrap(), "Cork");
        assert!(!fields.contains_key("data.addr"));
    }

    #[test]
    fn merge_update_empty_map() {
        let update = super::merge_update(&alice(), &json!({})).unwrap();
        assert_eq!(update, doc! {"$setOnInsert": {"data": {}}});
    }

    #[test]
    fn merge_update_scalar_replaces_data() {
        let update = super::merge_update(&alice(), &json!("text")).unwrap();
        assert_eq!(update, doc! {"$set": {"data": "text"}});
    }

    #[test]
    fn patches_update_sets_and_unsets() {
        let patches = vec![Patch::set("a.b", "x"), Patch::delete("c")];
        let update = super::patches_update(&alice(), patches).unwrap().unwrap();
        let set = update.get_document("$set").unwrap();
        let unset = update.get_document("$unset").unwrap();
        assert_eq!(set.get_str("data.a.b").unwrap(), "x");
        assert!(unset.contains_key("data.c"));
    }

    #[test]
    fn patches_update_last_patch_wins() {
        let patches = vec![Patch::set("a", "x"), Patch::delete("a")];
        let update = super::patches_update(&alice(), patches).unwrap().unwrap();
        assert!(!update.contains_key("$set"));
        assert!(update.get_document("$unset").unwrap().contains_key("data.a"));
    }

    #[test]
    fn patches_update_nothing_to_do() {
        let update = super::patches_update(&alice(), Vec::new()).unwrap();
        assert!(update.is_none());
    }

    #[test]
    fn replacement_wraps_data() {
        let document = super::replacement(&alice(), &json!({"a": 1})).unwrap();
        assert_eq!(document.get_str("_id").unwrap(), "alice");
        let data = document.get_document("data").unwrap();
        assert!(data.contains_key("a"));
    }
}
