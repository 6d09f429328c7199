/// Field holding the store document value in MongoDB documents.
pub const FIELD_DATA: &str = "data";

/// Field holding the store document ID in MongoDB documents.
pub const FIELD_ID: &str = "_id";
