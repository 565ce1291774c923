use std::cmp::Ordering;

use atrium_core::{AppError, AppResult};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PaginationKey;

/// Storage type of an ordering key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorKind {
    /// 64-bit signed integer column.
    Integer,
    /// Text column compared by byte order.
    Text,
    /// UUID column.
    Uuid,
    /// UTC timestamp column.
    Timestamp,
}

impl CursorKind {
    fn rank(self) -> u8 {
        match self {
            Self::Integer => 0,
            Self::Text => 1,
            Self::Uuid => 2,
            Self::Timestamp => 3,
        }
    }
}

/// Typed value of one ordering key, as captured in a cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CursorValue {
    /// SQL `NULL`; sorts after every non-null value.
    Null,
    /// Integer value.
    Integer(i64),
    /// Text value.
    Text(String),
    /// UUID value.
    Uuid(Uuid),
    /// Timestamp value.
    Timestamp(DateTime<Utc>),
}

impl CursorValue {
    /// Returns the storage type of a non-null value.
    #[must_use]
    pub fn kind(&self) -> Option<CursorKind> {
        match self {
            Self::Null => None,
            Self::Integer(_) => Some(CursorKind::Integer),
            Self::Text(_) => Some(CursorKind::Text),
            Self::Uuid(_) => Some(CursorKind::Uuid),
            Self::Timestamp(_) => Some(CursorKind::Timestamp),
        }
    }

    /// Returns whether the value is `NULL`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<Option<String>> for CursorValue {
    fn from(value: Option<String>) -> Self {
        value.map(Self::Text).unwrap_or(Self::Null)
    }
}

impl From<Option<DateTime<Utc>>> for CursorValue {
    fn from(value: Option<DateTime<Utc>>) -> Self {
        value.map(Self::Timestamp).unwrap_or(Self::Null)
    }
}

/// Ascending comparison where `NULL` is greater than every value.
pub(super) fn compare_ascending(left: &CursorValue, right: &CursorValue) -> Ordering {
    match (left, right) {
        (CursorValue::Null, CursorValue::Null) => Ordering::Equal,
        (CursorValue::Null, _) => Ordering::Greater,
        (_, CursorValue::Null) => Ordering::Less,
        (CursorValue::Integer(left), CursorValue::Integer(right)) => left.cmp(right),
        (CursorValue::Text(left), CursorValue::Text(right)) => left.cmp(right),
        (CursorValue::Uuid(left), CursorValue::Uuid(right)) => left.cmp(right),
        (CursorValue::Timestamp(left), CursorValue::Timestamp(right)) => left.cmp(right),
        (left, right) => {
            let left_rank = left.kind().map(CursorKind::rank);
            let right_rank = right.kind().map(CursorKind::rank);
            left_rank.cmp(&right_rank)
        }
    }
}

/// Which request slot a cursor was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorDirection {
    /// Continues with rows after the encoded row.
    After,
    /// Continues with rows before the encoded row.
    Before,
}

impl CursorDirection {
    fn label(self) -> &'static str {
        match self {
            Self::After => "afterCursor",
            Self::Before => "beforeCursor",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CursorPayload {
    #[serde(rename = "k")]
    keys: Vec<String>,
    #[serde(rename = "d")]
    direction: CursorDirection,
    #[serde(rename = "v")]
    values: Vec<CursorValue>,
}

/// Encodes a key tuple into an opaque URL-safe cursor.
pub fn encode_cursor(
    keys: &[PaginationKey],
    direction: CursorDirection,
    values: Vec<CursorValue>,
) -> AppResult<String> {
    let payload = CursorPayload {
        keys: keys.iter().map(|key| key.column().to_owned()).collect(),
        direction,
        values,
    };

    let bytes = serde_json::to_vec(&payload)
        .map_err(|error| AppError::Internal(format!("failed to encode cursor: {error}")))?;

    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Decodes a cursor issued for `keys` and supplied in the `expected` slot.
///
/// Fails with a validation error for anything that is not a cursor this key
/// set could have produced.
pub fn decode_cursor(
    raw: &str,
    keys: &[PaginationKey],
    expected: CursorDirection,
) -> AppResult<Vec<CursorValue>> {
    let bytes = URL_SAFE_NO_PAD
        .decode(raw.trim())
        .map_err(|_| invalid_cursor(expected, "not valid base64url"))?;

    let payload: CursorPayload = serde_json::from_slice(&bytes)
        .map_err(|_| invalid_cursor(expected, "payload is malformed"))?;

    let key_columns_match = payload.keys.len() == keys.len()
        && payload
            .keys
            .iter()
            .zip(keys)
            .all(|(column, key)| column == key.column());
    if !key_columns_match {
        return Err(invalid_cursor(
            expected,
            "it was issued for a different ordering",
        ));
    }

    if payload.direction != expected {
        return Err(invalid_cursor(
            expected,
            format!("it was issued as {}", payload.direction.label()).as_str(),
        ));
    }

    if payload.values.len() != keys.len() {
        return Err(invalid_cursor(expected, "payload is malformed"));
    }

    for (value, key) in payload.values.iter().zip(keys) {
        match value.kind() {
            None if !key.is_nullable() => {
                return Err(invalid_cursor(
                    expected,
                    format!("key '{}' cannot be null", key.column()).as_str(),
                ));
            }
            Some(kind) if kind != key.kind() => {
                return Err(invalid_cursor(
                    expected,
                    format!("key '{}' has the wrong type", key.column()).as_str(),
                ));
            }
            _ => {}
        }
    }

    Ok(payload.values)
}

fn invalid_cursor(direction: CursorDirection, reason: &str) -> AppError {
    AppError::Validation(format!("invalid {}: {reason}", direction.label()))
}
