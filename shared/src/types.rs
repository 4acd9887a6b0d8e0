use serde::{Deserialize, Deserializer, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::UserError;

// ========== USER ==========
/// A single record of the users collection, keyed by `id`.
///
/// Every attribute is a free-form string. Missing or `null` fields decode
/// to `""` and unknown fields are ignored, so a body without `id` is accepted.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct User {
    #[serde(deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub address: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub school: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub color: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub age: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub family: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub company: String,
}

impl User {
    /// Parse a request body into a `User`.
    ///
    /// Anything that is not a JSON object of string attributes is rejected
    /// as a whole; no partially-filled record is ever returned.
    pub fn from_json(body: &[u8]) -> Result<Self, UserError> {
        serde_json::from_slice(body).map_err(UserError::Decode)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// New record id: current Unix time in nanoseconds, as a decimal string.
pub fn generate_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    nanos.to_string()
}
