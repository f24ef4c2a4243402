//! Serde adapter that always stores a [`Uuid`] as its hyphenated string.
//!
//! The bson serializer is not human readable, so a bare `Uuid` field would be
//! written as binary on insert while `doc! { "_id": id.to_string() }` filters
//! look for a string. Every id field persisted to MongoDB goes through this
//! module so lookups match what was written.
//!
//! ```ignore
//! #[derive(Serialize, Deserialize)]
//! struct Review {
//!     #[serde(rename = "_id", with = "database::mongodb::uuid_as_string")]
//!     id: Uuid,
//!     #[serde(with = "database::mongodb::uuid_as_string::option", default)]
//!     category_id: Option<Uuid>,
//! }
//! ```

use serde::{Deserialize, Deserializer, Serializer};
use uuid::Uuid;

pub fn serialize<S: Serializer>(id: &Uuid, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&id.hyphenated())
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Uuid, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Uuid::parse_str(&raw).map_err(serde::de::Error::custom)
}

/// Same as the parent module for `Option<Uuid>`; `None` is written as null.
pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(id: &Option<Uuid>, serializer: S) -> Result<S::Ok, S::Error> {
        match id {
            Some(id) => serializer.collect_str(&id.hyphenated()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Uuid>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| Uuid::parse_str(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}
