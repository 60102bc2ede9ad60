use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Response};
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;

/// Default User-Agent string for Rancher API requests
pub const DEFAULT_USER_AGENT: &str = concat!("rancher-client/", env!("CARGO_PKG_VERSION"));

/// Boxed cause of a transport failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Executes one fully assembled HTTP request.
///
/// Implementations perform exactly one exchange per call and return the
/// response whatever its status; status classification happens in the
/// client. An `Err` means no response was received.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and buffer the whole response body.
    ///
    /// # Errors
    /// Returns the underlying cause when the exchange fails before a complete
    /// response is read (DNS, connect, reset, body read failure).
    async fn send(&self, request: Request<Full<Bytes>>) -> Result<Response<Bytes>, BoxError>;
}

/// [`Transport`] over a pooled `hyper-util` HTTP/1 client.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct HyperTransport {
    client: Client<HttpConnector, Full<Bytes>>,
}

impl HyperTransport {
    /// Create a transport with a fresh connection pool.
    ///
    /// Connections are opened lazily; a Tokio runtime is needed only when
    /// the first request is sent.
    #[must_use]
    pub fn new() -> Self {
        let client = Client::builder(TokioExecutor::new()).build_http();
        Self { client }
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HyperTransport {
    async fn send(&self, request: Request<Full<Bytes>>) -> Result<Response<Bytes>, BoxError> {
        let response = self.client.request(request).await?;
        let (parts, body) = response.into_parts();
        let body = body.collect().await?.to_bytes();
        Ok(Response::from_parts(parts, body))
    }
}
