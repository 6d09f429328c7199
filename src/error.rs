use std::fmt;

use failure::Backtrace;
use failure::Context;
use failure::Fail;

/// Error information returned by functions in case of errors.
#[derive(Debug)]
pub struct Error(Context<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.get_context()
    }
}

impl From<Context<ErrorKind>> for Error {
    fn from(inner: Context<ErrorKind>) -> Error {
        Error(inner)
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error(Context::new(kind))
    }
}

impl Fail for Error {
    fn cause(&self) -> Option<&dyn Fail> {
        self.0.cause()
    }

    fn backtrace(&self) -> Option<&Backtrace> {
        self.0.backtrace()
    }

    fn name(&self) -> Option<&str> {
        self.kind().kind_name()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Exhaustive list of possible errors emitted by this crate.
#[derive(Debug, Fail)]
pub enum ErrorKind {
    #[fail(display = "unable to decode document '{}'", _0)]
    DecodeDocument(String),

    #[fail(display = "document '{}' does not exist", _0)]
    DocumentNotFound(String),

    #[fail(display = "unable to encode value for document '{}'", _0)]
    EncodeDocument(String),

    #[fail(display = "unable to decode record from its field map")]
    FieldMapDecode,

    #[fail(display = "unable to encode record into a field map")]
    FieldMapEncode,

    #[fail(display = "unable to merge fields into a non-map value of document '{}'", _0)]
    MergeIntoNonMap(String),

    #[fail(display = "MongoDB BSON decode failed for document '{}'", _0)]
    MongoDBBsonDecode(String),

    #[fail(display = "MongoDB BSON encode failed for document '{}'", _0)]
    MongoDBBsonEncode(String),

    #[fail(display = "failed to connect to MongoDB URI '{}'", _0)]
    MongoDBConnect(String),

    #[fail(display = "MongoDB deleteOne operation failed")]
    MongoDBDeleteOne,

    #[fail(display = "MongoDB findOne operation failed")]
    MongoDBFindOne,

    #[fail(display = "MongoDB replaceOne operation failed")]
    MongoDBReplaceOne,

    #[fail(display = "failed to start a MongoDB session")]
    MongoDBSession,

    #[fail(display = "MongoDB transaction {} failed", _0)]
    MongoDBTransaction(&'static str),

    #[fail(display = "MongoDB updateOne operation failed")]
    MongoDBUpdateOne,

    #[fail(display = "{} operation on document '{}' failed", _0, _1)]
    OperationFailed(&'static str, String),
}

impl ErrorKind {
    fn kind_name(&self) -> Option<&str> {
        let name = match self {
            ErrorKind::DecodeDocument(_) => "DecodeDocument",
            ErrorKind::DocumentNotFound(_) => "DocumentNotFound",
            ErrorKind::EncodeDocument(_) => "EncodeDocument",
            ErrorKind::FieldMapDecode => "FieldMapDecode",
            ErrorKind::FieldMapEncode => "FieldMapEncode",
            ErrorKind::MergeIntoNonMap(_) => "MergeIntoNonMap",
            ErrorKind::MongoDBBsonDecode(_) => "MongoDBBsonDecode",
            ErrorKind::MongoDBBsonEncode(_) => "MongoDBBsonEncode",
            ErrorKind::MongoDBConnect(_) => "MongoDBConnect",
            ErrorKind::MongoDBDeleteOne => "MongoDBDeleteOne",
            ErrorKind::MongoDBFindOne => "MongoDBFindOne",
            ErrorKind::MongoDBReplaceOne => "MongoDBReplaceOne",
            ErrorKind::MongoDBSession => "MongoDBSession",
            ErrorKind::MongoDBTransaction(_) => "MongoDBTransaction",
            ErrorKind::MongoDBUpdateOne => "MongoDBUpdateOne",
            ErrorKind::OperationFailed(_, _) => "OperationFailed",
        };
        Some(name)
    }
}

/// Short form alias for functions returning `Error`s.
pub type Result<T> = ::std::result::Result<T, Error>;
