use std::fmt;

/// Separator used to render a `Path` as a single string.
pub const PATH_SEPARATOR: &str = "/";

/// Location of a collection or document in the store.
///
/// Paths alternate collection names and document IDs, starting from a top level collection:
///
///   * Paths with an odd number of segments identify a collection.
///   * Paths with an even number of segments identify a document.
///
/// A path is never empty: the root of the store is not addressable.
///
/// Segments must not contain `PATH_SEPARATOR` so that rendered paths
/// identify exactly one node.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// Path to a top level collection.
    ///
    /// # Panics
    /// If `name` contains `PATH_SEPARATOR`.
    pub fn collection<S: Into<String>>(name: S) -> Path {
        Path {
            segments: vec![checked_segment(name.into())],
        }
    }

    /// Path to the node named `segment` under this one.
    ///
    /// # Panics
    /// If `segment` contains `PATH_SEPARATOR`.
    pub fn child<S: Into<String>>(&self, segment: S) -> Path {
        let mut segments = self.segments.clone();
        segments.push(checked_segment(segment.into()));
        Path { segments }
    }

    /// ID of the addressed node (the last segment).
    pub fn id(&self) -> &str {
        self.segments
            .last()
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// True if the path identifies a collection.
    pub fn is_collection(&self) -> bool {
        self.segments.len() % 2 == 1
    }

    /// True if the path identifies a document.
    pub fn is_document(&self) -> bool {
        self.segments.len() % 2 == 0
    }

    /// Path of the node containing this one, `None` for top level collections.
    pub fn parent(&self) -> Option<Path> {
        if self.segments.len() < 2 {
            return None;
        }
        let segments = self.segments[..self.segments.len() - 1].to_vec();
        Some(Path { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

fn checked_segment(segment: String) -> String {
    if segment.contains(PATH_SEPARATOR) {
        panic!("invalid path segment '{}': contains '{}'", segment, PATH_SEPARATOR);
    }
    segment
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.segments.join(PATH_SEPARATOR))
    }
}

impl From<&Path> for String {
    fn from(path: &Path) -> String {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::Path;

    #[test]
    fn alternate_collections_and_documents() {
        let users = Path::collection("users");
        let alice = users.child("alice");
        let posts = alice.child("posts");
        assert!(users.is_collection());
        assert!(alice.is_document());
        assert!(posts.is_collection());
        assert_eq!(posts.segments(), &["users", "alice", "posts"]);
    }

    #[test]
    fn equality_follows_segments() {
        let first = Path::collection("users").child("alice");
        let second = Path::collection("users").child("alice");
        let other = Path::collection("users").child("bob");
        assert_eq!(first, second);
        assert_ne!(first, other);
    }

    #[test]
    fn parent_and_id() {
        let post = Path::collection("users").child("alice").child("posts").child("p1");
        assert_eq!(post.id(), "p1");
        let parent = post.parent().expect("document to have a parent");
        assert_eq!(parent.to_string(), "users/alice/posts");
        assert!(Path::collection("users").parent().is_none());
    }

    #[test]
    #[should_panic(expected = "invalid path segment")]
    fn reject_separator_in_collection_name() {
        Path::collection("users/alice");
    }

    #[test]
    #[should_panic(expected = "invalid path segment")]
    fn reject_separator_in_document_id() {
        Path::collection("users").child("x/y/z");
    }

    #[test]
    fn render_as_string() {
        let alice = Path::collection("users").child("alice");
        assert_eq!(alice.to_string(), "users/alice");
        assert_eq!(String::from(&alice), "users/alice");
    }
}
