use serde::Deserialize;
use serde::Serialize;

use crate::mock::Mock;
use crate::path::Path;
use crate::store::document::Document;

pub const USERS: &str = "users";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "city")]
    pub city_name: String,
    pub zip: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "addr")]
    pub address: Address,
    pub name: String,
}

pub fn alice() -> User {
    User {
        address: Address {
            city_name: "Dublin".into(),
            zip: "D01".into(),
        },
        name: "Alice".into(),
    }
}

pub fn alice_doc(mock: &Mock) -> Document {
    mock.store().collection(USERS).doc("alice")
}

pub fn alice_path() -> Path {
    Path::collection(USERS).child("alice")
}

pub fn bob_doc(mock: &Mock) -> Document {
    mock.store().collection(USERS).doc("bob")
}
