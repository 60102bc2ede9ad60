use http::{HeaderMap, StatusCode};
use thiserror::Error;

/// Construction-time configuration failure.
///
/// Raised by [`RancherClient::new`](crate::RancherClient::new) and the
/// config loaders. No network call has been made when this is returned.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    /// One or more required fields are missing or malformed.
    ///
    /// All violations found in a single validation pass are listed, in field
    /// declaration order.
    #[error("Invalid Rancher client configuration: {}", .violations.join("; "))]
    Invalid {
        /// Human-readable description of each violated constraint
        violations: Vec<String>,
    },

    /// The configuration could not be extracted from its sources
    /// (missing key, wrong type such as a non-numeric port, unreadable file).
    #[error("Failed to load Rancher client configuration: {0}")]
    Load(#[source] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Load(Box::new(err))
    }
}

/// Caller misuse detected before a request is built.
///
/// Always returned synchronously by the resource methods; the transport is
/// never touched when this is produced.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ValidationError {
    /// A required resource identifier was empty or absent.
    #[error("Must specify {role} id")]
    MissingId {
        /// Resource role named in the message (`container`, `stack`, `service`)
        role: &'static str,
    },

    /// The payload could not be serialized to JSON.
    #[error("Payload is not JSON-serializable: {0}")]
    InvalidPayload(#[source] serde_json::Error),
}

/// Failure of an issued request, surfaced through the returned future.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RequestError {
    /// No response was received (DNS failure, connection refused, reset).
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A response arrived with a status outside `200..300`.
    ///
    /// The body is not decoded; status and headers are kept for the caller.
    #[error("Invalid response code: {}", .status.as_u16())]
    HttpStatus {
        status: StatusCode,
        headers: HeaderMap,
    },

    /// A success response carried a body that is not valid JSON.
    #[error("Failed to decode response payload: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request URI or headers could not be assembled
    /// (e.g. an identifier containing characters not allowed in a URI).
    #[error("Failed to build request: {0}")]
    InvalidRequest(#[from] http::Error),
}

impl RequestError {
    /// HTTP status code of an [`RequestError::HttpStatus`] failure.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RequestError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Any error produced by this crate.
///
/// Lets callers that do not care about the synchronous/asynchronous split
/// chain construction, validation and the awaited request with a single `?`.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RancherError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Request(#[from] RequestError),
}
