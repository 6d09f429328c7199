use std::collections::HashSet;

use crate::path::Path;
use crate::ErrorKind;
use crate::Result;

/// Document operations that can be configured to fail.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Operation {
    Delete,
    Get,
    /// Full replace and merge writes.
    Set,
    Update,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::Delete => "delete",
            Operation::Get => "get",
            Operation::Set => "set",
            Operation::Update => "update",
        }
    }
}

/// Per operation, per document path, fault injection rules.
///
/// Rules match document paths exactly: arming a fault on a document
/// has no effect on its sub-collections or sibling documents.
#[derive(Clone, Debug, Default)]
pub struct Faults {
    rules: HashSet<(Operation, String)>,
}

impl Faults {
    /// Fail if a fault is armed for `op` on the document at `path`.
    pub fn check(&self, op: Operation, path: &Path) -> Result<()> {
        let path = path.to_string();
        if self.rules.contains(&(op, path.clone())) {
            return Err(ErrorKind::OperationFailed(op.name(), path).into());
        }
        Ok(())
    }

    /// Arm (`fails == true`) or clear (`fails == false`) the fault for `op` on `path`.
    pub fn configure(&mut self, op: Operation, path: String, fails: bool) {
        if fails {
            self.rules.insert((op, path));
        } else {
            self.rules.remove(&(op, path));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Faults;
    use super::Operation;
    use crate::path::Path;
    use crate::ErrorKind;

    #[test]
    fn armed_fault_fails() {
        let mut faults = Faults::default();
        let path = Path::collection("users").child("alice");
        faults.configure(Operation::Get, path.to_string(), true);
        let error = faults.check(Operation::Get, &path).unwrap_err();
        match error.kind() {
            ErrorKind::OperationFailed(op, document) => {
                assert_eq!(*op, "get");
                assert_eq!(document, "users/alice");
            }
            kind => panic!("unexpected error kind {:?}", kind),
        }
    }

    #[test]
    fn faults_are_per_operation() {
        let mut faults = Faults::default();
        let path = Path::collection("users").child("alice");
        faults.configure(Operation::Set, path.to_string(), true);
        assert!(faults.check(Operation::Get, &path).is_ok());
        assert!(faults.check(Operation::Set, &path).is_err());
    }

    #[test]
    fn faults_match_exact_paths() {
        let mut faults = Faults::default();
        let alice = Path::collection("users").child("alice");
        faults.configure(Operation::Delete, alice.to_string(), true);
        let post = alice.child("posts").child("p1");
        assert!(faults.check(Operation::Delete, &post).is_ok());
        let bob = Path::collection("users").child("bob");
        assert!(faults.check(Operation::Delete, &bob).is_ok());
    }

    #[test]
    fn cleared_fault_passes() {
        let mut faults = Faults::default();
        let path = Path::collection("users").child("alice");
        faults.configure(Operation::Update, path.to_string(), true);
        faults.configure(Operation::Update, path.to_string(), false);
        assert!(faults.check(Operation::Update, &path).is_ok());
    }
}
