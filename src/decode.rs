use serde::de::{DeserializeOwned, Error as _};
use serde_json::{Map, Value};

use crate::TursoError;

/// Decodes the whole response body into `T`.
pub(crate) fn decode_body<T: DeserializeOwned>(
    operation: &'static str,
    body: &[u8],
) -> Result<T, TursoError> {
    serde_json::from_slice(body).map_err(|source| TursoError::Decode { operation, source })
}

/// Decodes the value stored under `key` of an enveloping object, e.g. the
/// `database` in `{"database": {...}}`.
pub(crate) fn decode_field<T: DeserializeOwned>(
    operation: &'static str,
    body: &[u8],
    key: &str,
) -> Result<T, TursoError> {
    let mut envelope: Map<String, Value> = decode_body(operation, body)?;
    let value = envelope.remove(key).ok_or_else(|| TursoError::Decode {
        operation,
        source: serde_json::Error::custom(format!("missing field `{key}`")),
    })?;
    serde_json::from_value(value).map_err(|source| TursoError::Decode { operation, source })
}
