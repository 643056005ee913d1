//! Voucher model

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{Error, Result};

/// Identifier supplied by the client, kept as the type it arrived in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VoucherId {
    /// Whole number id (`1`)
    Integer(i64),
    /// Fractional number id (`1.5`)
    Float(f64),
    /// Text id (`"a7f3"`)
    Text(String),
}

impl Default for VoucherId {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for VoucherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for VoucherId {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for VoucherId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A redeemable-code record as exchanged with clients.
///
/// Every field is optional on input: missing or `null` values decode to
/// an empty string (or `false` for `redeemed`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voucher {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: VoucherId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub redeemed: bool,
    /// Redemption timestamp, empty when not redeemed
    #[serde(default, deserialize_with = "null_as_default")]
    pub redeemed_date: String,
}

impl Voucher {
    /// Create an unredeemed voucher
    #[must_use]
    pub fn new(id: impl Into<VoucherId>, title: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            code: code.into(),
            redeemed: false,
            redeemed_date: String::new(),
        }
    }

    /// Mark as redeemed at the given timestamp
    #[must_use]
    pub fn redeemed_at(mut self, timestamp: impl Into<String>) -> Self {
        self.redeemed = true;
        self.redeemed_date = timestamp.into();
        self
    }

    /// Whether a redemption timestamp was supplied
    pub fn has_redeemed_date(&self) -> bool {
        !self.redeemed_date.trim().is_empty()
    }

    /// Decode the `data` field of a sync request into a batch of vouchers.
    ///
    /// A missing or `null` batch is rejected, as is anything that is not an
    /// array or contains a malformed element.
    pub fn decode_batch(data: Option<Value>) -> Result<Vec<Self>> {
        let items = match data {
            None | Some(Value::Null) => {
                return Err(Error::InvalidInput("voucher data is missing".to_string()))
            }
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(Error::InvalidInput(format!(
                    "voucher data must be an array, got {}",
                    json_kind(&other)
                )))
            }
        };

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value(item).map_err(|err| {
                    Error::InvalidInput(format!("voucher at index {index} is malformed: {err}"))
                })
            })
            .collect()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
