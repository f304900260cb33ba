//! Shared response-shaping helpers for resource clients.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, ErrorKind};

/// Extracts and deserializes one field from a response.
///
/// A missing field is an invalid-response error naming the offending key.
pub(crate) fn field<T: DeserializeOwned>(response: &Value, key: &str) -> Result<T, Error> {
    let value = response.get(key).ok_or_else(|| Error::missing_field(key))?;
    serde_json::from_value(value.clone()).map_err(|e| {
        Error::new(
            ErrorKind::InvalidResponse,
            format!("field '{}' has unexpected shape: {}", key, e),
        )
    })
}

/// Extracts the item list from a (merged) list response.
pub(crate) fn items<T: DeserializeOwned>(response: &Value, key: &str) -> Result<Vec<T>, Error> {
    field(response, key)
}

/// Maps a not-found error to an empty result.
///
/// Used by singular `describe_*` lookups so that absent-state callers don't
/// have to special-case a 404.
pub(crate) fn none_on_not_found<T>(result: Result<T, Error>) -> Result<Option<T>, Error> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
