use serde_json::json;
use serde_json::Value;
use slog::o;
use slog::Discard;
use slog::Logger;

use crate::mock::Mock;
use crate::path::Path;

mod fixtures;

#[test]
fn clones_share_state() {
    let mock = Mock::default();
    let other = mock.clone();
    let doc = self::fixtures::alice_doc(&mock);
    doc.set(&json!({"a": 1}), None).unwrap();
    let doc = self::fixtures::alice_doc(&other);
    let value: Value = doc.get(None).unwrap().expect("document to exist");
    assert_eq!(value, json!({"a": 1}));
}

#[test]
fn collections_are_listed_once_addressed() {
    let mock = Mock::with_logger(Logger::root(Discard, o!()));
    let doc = self::fixtures::alice_doc(&mock);
    doc.collection("posts");
    doc.collection("friends");
    let collections = mock.collections(&self::fixtures::alice_path());
    assert_eq!(collections, vec!["friends".to_string(), "posts".to_string()]);
}

#[test]
fn collections_of_unknown_document() {
    let mock = Mock::default();
    let path = Path::collection("users").child("nobody");
    assert!(mock.collections(&path).is_empty());
}

#[test]
fn documents_are_materialised_without_data() {
    let mock = Mock::default();
    let doc = self::fixtures::alice_doc(&mock);
    assert_eq!(doc.path(), &self::fixtures::alice_path());
    assert!(!mock.exists(doc.path()));
    let state = mock.state.lock().unwrap();
    let node = state
        .tree
        .find_document(doc.path())
        .expect("addressed document to be in the tree");
    assert!(node.data.is_none());
}

#[test]
fn new_doc_uses_random_ids() {
    let mock = Mock::default();
    let users = mock.store().collection("users");
    let first = users.new_doc();
    let second = users.new_doc();
    assert_ne!(first.path(), second.path());
    assert!(first.path().is_document());
    assert_eq!(first.path().parent().as_ref(), Some(users.path()));
}

#[test]
fn nested_paths_follow_the_hierarchy() {
    let mock = Mock::default();
    let post = self::fixtures::alice_doc(&mock)
        .collection("posts")
        .doc("p1");
    assert_eq!(post.path().to_string(), "users/alice/posts/p1");
    post.set(&json!({"title": "hello"}), None).unwrap();
    assert!(mock.exists(post.path()));
    assert!(!mock.exists(&self::fixtures::alice_path()));
}

#[test]
#[should_panic(expected = "invalid path segment")]
fn document_ids_cannot_contain_separator() {
    let mock = Mock::default();
    mock.store().collection("users").doc("x/y/z");
}
