//! Access values nested inside documents by dot-separated field paths.
//!
//! Field paths address values by their external (serialised) names.
//! Documents are stored as `serde_json::Value`s so records are resolved through
//! their serde representation: `#[serde(rename = "...")]` attributes, not Rust
//! identifiers, define the names a path must use.
use std::fmt;

use failure::ResultExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::ErrorKind;
use crate::Result;

/// Separator between segments of a field path.
pub const FIELD_PATH_SEPARATOR: char = '.';

/// Sequence of field names leading to a value nested in a document.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Build a path from explicit segments, useful for field names containing dots.
    pub fn from_segments<I, S>(segments: I) -> FieldPath
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments = segments.into_iter().map(Into::into).collect();
        FieldPath { segments }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let separator = FIELD_PATH_SEPARATOR.to_string();
        write!(f, "{}", self.segments.join(&separator))
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> FieldPath {
        if path.is_empty() {
            return FieldPath::default();
        }
        FieldPath::from_segments(path.split(FIELD_PATH_SEPARATOR))
    }
}

impl From<String> for FieldPath {
    fn from(path: String) -> FieldPath {
        FieldPath::from(path.as_str())
    }
}

/// Value to apply to the field addressed by a `Patch`.
#[derive(Clone, PartialEq, Debug)]
pub enum PatchValue {
    /// Remove the field from its containing map.
    Delete,

    /// Insert or overwrite the field.
    Set(Value),
}

/// Change to a single field of an existing document.
#[derive(Clone, PartialEq, Debug)]
pub struct Patch {
    pub path: FieldPath,
    pub value: PatchValue,
}

impl Patch {
    /// Remove the field at `path`.
    pub fn delete<P>(path: P) -> Patch
    where
        P: Into<FieldPath>,
    {
        Patch {
            path: path.into(),
            value: PatchValue::Delete,
        }
    }

    /// Set the field at `path` to `value`.
    pub fn set<P, V>(path: P, value: V) -> Patch
    where
        P: Into<FieldPath>,
        V: Into<Value>,
    {
        Patch {
            path: path.into(),
            value: PatchValue::Set(value.into()),
        }
    }
}

/// Look up the value at `path` inside `object`.
///
/// An empty path returns `object` itself.
/// Returns `None` if any segment does not match a key of a field map.
pub fn get<'a>(object: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    let mut current = object;
    for segment in path.segments() {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Assign (or remove, for `PatchValue::Delete`) the value at `path` inside `object`.
///
/// # Panics
/// A path that does not match the shape of `object` is a usage error:
/// this function panics if the path is empty, if an intermediate segment is missing,
/// or if a segment addresses something other than a field map.
pub fn set(object: &mut Value, path: &FieldPath, value: PatchValue) {
    let (last, parents) = match path.segments().split_last() {
        Some(split) => split,
        None => panic!("invalid field path: path is empty"),
    };
    let mut current = object;
    for segment in parents {
        current = match current.as_object_mut().and_then(|map| map.get_mut(segment)) {
            Some(next) => next,
            None => panic!("invalid field path '{}': no field '{}'", path, segment),
        };
    }
    let fields = match current.as_object_mut() {
        Some(fields) => fields,
        None => panic!("invalid field path '{}': parent of '{}' is not a map", path, last),
    };
    match value {
        PatchValue::Delete => {
            fields.remove(last);
        }
        PatchValue::Set(value) => {
            fields.insert(last.clone(), value);
        }
    }
}

/// Apply a sequence of patches to `object`, in order.
///
/// # Panics
/// See `set` for the conditions causing a panic.
pub fn apply(object: &mut Value, patches: Vec<Patch>) {
    for patch in patches {
        set(object, &patch.path, patch.value);
    }
}

/// Look up the value at `path` inside the serialised form of `record`.
pub fn get_field<T>(record: &T, path: &FieldPath) -> Result<Option<Value>>
where
    T: Serialize,
{
    let object = serde_json::to_value(record).with_context(|_| ErrorKind::FieldMapEncode)?;
    Ok(get(&object, path).cloned())
}

/// Assign the value at `path` inside `record`, leaving every other field untouched.
///
/// # Panics
/// Records have a fixed set of fields so, in addition to the conditions listed
/// for `set`, this function panics if the last segment does not name an existing field.
pub fn set_field<T>(record: &mut T, path: &FieldPath, value: PatchValue) -> Result<()>
where
    T: Serialize + DeserializeOwned,
{
    let mut object = serde_json::to_value(&*record).with_context(|_| ErrorKind::FieldMapEncode)?;
    if get(&object, path).is_none() {
        panic!("invalid field path '{}': no such field in record", path);
    }
    set(&mut object, path, value);
    *record = serde_json::from_value(object).with_context(|_| ErrorKind::FieldMapDecode)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde::Serialize;
    use serde_json::json;

    use super::FieldPath;
    use super::Patch;
    use super::PatchValue;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Address {
        #[serde(rename = "city")]
        city_name: String,
        zip: String,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Person {
        #[serde(rename = "addr")]
        address: Address,
        name: String,
    }

    fn person() -> Person {
        Person {
            address: Address {
                city_name: "Dublin".into(),
                zip: "D01".into(),
            },
            name: "Alice".into(),
        }
    }

    #[test]
    fn parse_dotted_paths() {
        let path = FieldPath::from("addr.city");
        assert_eq!(path.segments(), &["addr", "city"]);
        assert_eq!(path.to_string(), "addr.city");
        assert!(FieldPath::from("").is_empty());
    }

    #[test]
    fn get_empty_path_returns_object() {
        let object = json!({"a": 1});
        let value = super::get(&object, &FieldPath::default());
        assert_eq!(value, Some(&object));
    }

    #[test]
    fn get_nested_value() {
        let object = json!({"a": {"b": {"c": 42}}});
        let value = super::get(&object, &"a.b.c".into());
        assert_eq!(value, Some(&json!(42)));
    }

    #[test]
    fn get_missing_value() {
        let object = json!({"a": {"b": 1}});
        assert_eq!(super::get(&object, &"a.x".into()), None);
        assert_eq!(super::get(&object, &"a.b.c".into()), None);
    }

    #[test]
    fn get_key_with_dots() {
        let object = json!({"a.b": 1});
        let path = FieldPath::from_segments(vec!["a.b"]);
        assert_eq!(super::get(&object, &path), Some(&json!(1)));
    }

    #[test]
    fn set_overwrites_only_addressed_field() {
        let mut object = json!({"a": 1, "b": 2});
        super::set(&mut object, &"a".into(), PatchValue::Set(json!(9)));
        assert_eq!(object, json!({"a": 9, "b": 2}));
    }

    #[test]
    fn set_inserts_new_leaf() {
        let mut object = json!({"a": {"b": 1}});
        super::set(&mut object, &"a.c".into(), PatchValue::Set(json!("new")));
        assert_eq!(object, json!({"a": {"b": 1, "c": "new"}}));
    }

    #[test]
    fn set_delete_removes_key() {
        let mut object = json!({"a": {"b": 1, "c": 2}});
        super::set(&mut object, &"a.b".into(), PatchValue::Delete);
        assert_eq!(object, json!({"a": {"c": 2}}));
    }

    #[test]
    #[should_panic(expected = "invalid field path")]
    fn set_missing_intermediate_panics() {
        let mut object = json!({"a": 1});
        super::set(&mut object, &"x.y".into(), PatchValue::Set(json!(1)));
    }

    #[test]
    #[should_panic(expected = "invalid field path")]
    fn set_through_scalar_panics() {
        let mut object = json!({"a": 1});
        super::set(&mut object, &"a.b".into(), PatchValue::Set(json!(1)));
    }

    #[test]
    #[should_panic(expected = "invalid field path")]
    fn set_empty_path_panics() {
        let mut object = json!({"a": 1});
        super::set(&mut object, &FieldPath::default(), PatchValue::Set(json!(1)));
    }

    #[test]
    fn apply_patches_in_order() {
        let mut object = json!({"a": 1, "b": {"c": 2}});
        let patches = vec![
            Patch::set("a", 2),
            Patch::set("a", 3),
            Patch::delete("b.c"),
            Patch::set("b.d", true),
        ];
        super::apply(&mut object, patches);
        assert_eq!(object, json!({"a": 3, "b": {"d": true}}));
    }

    #[test]
    fn record_get_uses_external_names() {
        let record = person();
        let city = super::get_field(&record, &"addr.city".into()).unwrap();
        assert_eq!(city, Some(json!("Dublin")));
        let missing = super::get_field(&record, &"address.city_name".into()).unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn record_set_nested_field() {
        let mut record = person();
        let value = PatchValue::Set(json!("Cork"));
        super::set_field(&mut record, &"addr.city".into(), value).unwrap();
        assert_eq!(record.address.city_name, "Cork");
        assert_eq!(record.address.zip, "D01");
        assert_eq!(record.name, "Alice");
    }

    #[test]
    #[should_panic(expected = "invalid field path")]
    fn record_set_internal_name_panics() {
        let mut record = person();
        let value = PatchValue::Set(json!("Cork"));
        let _ = super::set_field(&mut record, &"address.city_name".into(), value);
    }

    #[test]
    #[should_panic(expected = "invalid field path")]
    fn record_set_internal_top_level_name_panics() {
        let mut record = person();
        let value = PatchValue::Set(json!({"city": "Cork", "zip": "T12"}));
        let _ = super::set_field(&mut record, &"address".into(), value);
    }

    #[test]
    #[should_panic(expected = "invalid field path")]
    fn record_set_unknown_field_panics() {
        let mut record = person();
        let value = PatchValue::Set(json!("Ally"));
        let _ = super::set_field(&mut record, &"nickname".into(), value);
    }

    #[test]
    #[should_panic(expected = "invalid field path")]
    fn record_set_unknown_nested_field_panics() {
        let mut record = person();
        let value = PatchValue::Set(json!("Cork"));
        let _ = super::set_field(&mut record, &"addr.city_name".into(), value);
    }

    #[test]
    fn record_set_wrong_type_fails() {
        let mut record = person();
        let value = PatchValue::Set(json!(42));
        let error = super::set_field(&mut record, &"name".into(), value)
            .expect_err("decoding a number into a string to fail");
        match error.kind() {
            crate::ErrorKind::FieldMapDecode => (),
            kind => panic!("unexpected error kind: {:?}", kind),
        }
        assert_eq!(record.name, "Alice");
    }
}
