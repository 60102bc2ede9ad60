use bytes::Bytes;
use http::Response;
use serde_json::Value;

use crate::error::RequestError;

/// Classify a buffered response and decode its JSON payload.
///
/// - `200..300` with an empty (or whitespace-only) body → `Value::Null`
/// - `200..300` with a body → the decoded JSON value, unmodified
/// - any other status → [`RequestError::HttpStatus`]; the body is dropped
pub(crate) fn decode(response: Response<Bytes>) -> Result<Value, RequestError> {
    let (parts, body) = response.into_parts();

    if !parts.status.is_success() {
        return Err(RequestError::HttpStatus {
            status: parts.status,
            headers: parts.headers,
        });
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    serde_json::from_slice(&body).map_err(RequestError::Decode)
}
