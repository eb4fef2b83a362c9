//! Presence-aware decoding of a single target table.
//!
//! # Responsibilities
//! - Reject anything that is not a key/value table
//! - Decode each known key on its own so errors name the field
//! - Keep "absent" and "explicitly set" apart for every field
//!
//! # Design Decisions
//! - Every field is an `Option`: `None` means the key was not in the table
//! - Unknown keys are ignored, not rejected
//! - `alert_email` accepts a single string or a list of strings

use serde::de::DeserializeOwned;
use serde::Deserialize;
use toml::value::Table;
use toml::Value;

use crate::target::error::TargetError;

const KNOWN_KEYS: [&str; 7] = [
    "name",
    "url",
    "interval",
    "follow_redirects",
    "return_codes",
    "from_email",
    "alert_email",
];

/// One layer of target configuration, exactly as it appeared in the source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTarget {
    pub name: Option<String>,
    pub url: Option<String>,
    pub interval: Option<String>,
    pub follow_redirects: Option<bool>,
    pub return_codes: Option<Vec<u16>>,
    pub from_email: Option<String>,
    pub alert_email: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl RawTarget {
    /// Decode a raw configuration value into a target layer.
    pub fn from_value(value: &Value) -> Result<Self, TargetError> {
        let table = value.as_table().ok_or(TargetError::ConfigFormat {
            found: value.type_str(),
        })?;

        for key in table.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                tracing::debug!(key = %key, "Ignoring unknown target key");
            }
        }

        let alert_email = decode_field::<OneOrMany>(table, "alert_email")?.map(|v| match v {
            OneOrMany::One(addr) => vec![addr],
            OneOrMany::Many(list) => list,
        });

        Ok(Self {
            name: decode_field(table, "name")?,
            url: decode_field(table, "url")?,
            interval: decode_field(table, "interval")?,
            follow_redirects: decode_field(table, "follow_redirects")?,
            return_codes: decode_field(table, "return_codes")?,
            from_email: decode_field(table, "from_email")?,
            alert_email,
        })
    }
}

fn decode_field<T: DeserializeOwned>(
    table: &Table,
    field: &'static str,
) -> Result<Option<T>, TargetError> {
    match table.get(field) {
        None => Ok(None),
        Some(value) => value
            .clone()
            .try_into::<T>()
            .map(Some)
            .map_err(|e| TargetError::FieldDecode {
                field,
                reason: e.to_string(),
            }),
    }
}
