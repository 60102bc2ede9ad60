use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use http::{HeaderValue, Method, Request};
use http_body_util::Full;
use serde::Serialize;
use serde_json::Value;
use tracing::Instrument;

use crate::auth::basic_auth_header;
use crate::config::RancherClientConfig;
use crate::error::{ConfigError, RequestError, ValidationError};
use crate::operation::{BodyRule, IdRule, Operation};
use crate::response;
use crate::transport::{DEFAULT_USER_AGENT, HyperTransport, Transport};

/// Future returned by every request; resolves to the decoded JSON payload.
pub type ResponseFuture = Pin<Box<dyn Future<Output = Result<Value, RequestError>> + Send>>;

const JSON: &str = "application/json";

/// Client for one Rancher environment.
///
/// Holds the base URL, the precomputed Basic-Auth header and the environment
/// segment derived from [`RancherClientConfig`]; none of it changes after
/// construction.
///
/// # Error split
///
/// Resource methods return `Result<ResponseFuture, ValidationError>`:
/// a missing identifier fails at the call site before anything is sent,
/// while transport, status and decoding failures come out of the future.
///
/// ```ignore
/// let services = client.get_stack_services("1st7")?.await?;
/// ```
///
/// # Thread Safety
///
/// `RancherClient` is `Clone + Send + Sync`; clones share the transport.
/// Returned futures are `'static` and may be spawned.
#[derive(Clone)]
pub struct RancherClient {
    base_url: String,
    environment: String,
    authorization: HeaderValue,
    transport: Arc<dyn Transport>,
}

impl RancherClient {
    /// Validate `config` and build a client over a [`HyperTransport`].
    ///
    /// No network I/O happens here.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] listing every missing or malformed field.
    pub fn new(config: RancherClientConfig) -> Result<Self, ConfigError> {
        Self::with_transport(config, Arc::new(HyperTransport::new()))
    }

    /// Same as [`new`](Self::new) with a caller-supplied transport.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] listing every missing or malformed field.
    pub fn with_transport(
        config: RancherClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let authorization = basic_auth_header(&config.access_key, &config.secret_key)
            .map_err(|e| ConfigError::Invalid {
                violations: vec![format!("credentials do not form a valid header: {e}")],
            })?;

        let client = Self {
            base_url: config.base_url(),
            environment: config.environment_id().to_owned(),
            authorization,
            transport,
        };

        tracing::debug!(
            base_url = %client.base_url,
            environment = %client.environment,
            "rancher client configured"
        );

        Ok(client)
    }

    /// Base URL requests are sent to (`http://{host}:{port}`).
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Environment (project) segment used in every path.
    #[must_use]
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Issue one request against `base_url + path`.
    ///
    /// `body`, when given, must already be JSON text and is sent with
    /// `Content-Type: application/json`. The `Authorization` header is
    /// attached to every request. Exactly one exchange happens per call;
    /// nothing is retried.
    ///
    /// The returned future fails with [`RequestError::Transport`] when no
    /// response arrives, [`RequestError::HttpStatus`] for statuses outside
    /// `200..300`, and [`RequestError::Decode`] when a success body is not
    /// JSON.
    #[must_use]
    pub fn request(&self, method: Method, path: &str, body: Option<String>) -> ResponseFuture {
        let span = tracing::debug_span!("rancher_request", method = %method, path = %path);
        let url = format!("{}{path}", self.base_url);
        let authorization = self.authorization.clone();
        let transport = Arc::clone(&self.transport);

        Box::pin(
            async move {
                let request = build_request(method, &url, authorization, body)?;

                tracing::debug!("sending request");
                let response = transport.send(request).await.map_err(|e| {
                    tracing::warn!(error = %e, "rancher request failed before a response");
                    RequestError::Transport(e)
                })?;

                let status = response.status();
                tracing::debug!(status = status.as_u16(), "received response");

                response::decode(response).inspect_err(|e| {
                    tracing::warn!(status = status.as_u16(), error = %e, "rancher request failed");
                })
            }
            .instrument(span),
        )
    }

    /// Dispatch `operation` through the routing table.
    ///
    /// This is what every named resource method delegates to. `id` is used
    /// for routes that take a caller-supplied identifier; `body` for routes
    /// that send a payload (`update_container` also reads its id from it).
    ///
    /// # Errors
    /// Returns [`ValidationError::MissingId`] when a required identifier is
    /// `None`, empty, or (for `update_container`) the payload has no
    /// non-empty string or numeric `id` field. Nothing is sent in that case.
    pub fn call(
        &self,
        operation: Operation,
        id: Option<&str>,
        body: Option<Value>,
    ) -> Result<ResponseFuture, ValidationError> {
        let route = operation.route();

        let path = {
            let id: Option<Cow<'_, str>> = match route.id {
                IdRule::None => None,
                IdRule::Unchecked => Some(Cow::Borrowed(id.unwrap_or_default())),
                IdRule::Required(role) => Some(Cow::Borrowed(
                    id.filter(|v| !v.is_empty())
                        .ok_or(ValidationError::MissingId { role })?,
                )),
                IdRule::FromPayload(role) => Some(
                    body.as_ref()
                        .and_then(|b| b.get("id"))
                        .and_then(payload_id)
                        .ok_or(ValidationError::MissingId { role })?,
                ),
            };

            route.path(&self.environment, id.as_deref())
        };
        let body = match route.body {
            BodyRule::Json => body.map(|b| b.to_string()),
            BodyRule::Empty => None,
        };

        Ok(self.request(route.method, &path, body))
    }

    /// `POST /container`
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidPayload`] if `container` cannot be serialized.
    pub fn create_container<T: Serialize + ?Sized>(
        &self,
        container: &T,
    ) -> Result<ResponseFuture, ValidationError> {
        self.call(Operation::CreateContainer, None, Some(to_payload(container)?))
    }

    /// `GET /container/{id}`
    ///
    /// # Errors
    /// Returns [`ValidationError::MissingId`] if `container_id` is empty.
    pub fn get_container(&self, container_id: &str) -> Result<ResponseFuture, ValidationError> {
        self.call(Operation::GetContainer, Some(container_id), None)
    }

    /// `POST /container/{container.id}` with the full container as body.
    ///
    /// # Errors
    /// Returns [`ValidationError::MissingId`] if the serialized container has
    /// no non-empty string or numeric `id`, or [`ValidationError::InvalidPayload`] if it
    /// cannot be serialized.
    pub fn update_container<T: Serialize + ?Sized>(
        &self,
        container: &T,
    ) -> Result<ResponseFuture, ValidationError> {
        self.call(Operation::UpdateContainer, None, Some(to_payload(container)?))
    }

    /// `POST /container/{id}/?action=stop`
    ///
    /// # Errors
    /// Returns [`ValidationError::MissingId`] if `container_id` is empty, or
    /// [`ValidationError::InvalidPayload`] if `params` cannot be serialized.
    pub fn stop_container<T: Serialize + ?Sized>(
        &self,
        container_id: &str,
        params: &T,
    ) -> Result<ResponseFuture, ValidationError> {
        self.call(
            Operation::StopContainer,
            Some(container_id),
            Some(to_payload(params)?),
        )
    }

    /// `POST /container/{id}/?action=start`
    ///
    /// # Errors
    /// Returns [`ValidationError::MissingId`] if `container_id` is empty.
    pub fn start_container(&self, container_id: &str) -> Result<ResponseFuture, ValidationError> {
        self.call(Operation::StartContainer, Some(container_id), None)
    }

    /// `POST /container/{id}/?action=restart`
    ///
    /// # Errors
    /// Returns [`ValidationError::MissingId`] if `container_id` is empty.
    pub fn restart_container(
        &self,
        container_id: &str,
    ) -> Result<ResponseFuture, ValidationError> {
        self.call(Operation::RestartContainer, Some(container_id), None)
    }

    /// `DELETE /container/{id}`
    ///
    /// # Errors
    /// Returns [`ValidationError::MissingId`] if `container_id` is empty.
    pub fn remove_container(&self, container_id: &str) -> Result<ResponseFuture, ValidationError> {
        self.call(Operation::RemoveContainer, Some(container_id), None)
    }

    /// `POST /container/{id}/?action=purge`
    ///
    /// # Errors
    /// Returns [`ValidationError::MissingId`] if `container_id` is empty.
    pub fn purge_container(&self, container_id: &str) -> Result<ResponseFuture, ValidationError> {
        self.call(Operation::PurgeContainer, Some(container_id), None)
    }

    /// `POST /container/{id}/?action=logs`
    ///
    /// # Errors
    /// Returns [`ValidationError::MissingId`] if `container_id` is empty.
    pub fn get_container_logs(
        &self,
        container_id: &str,
    ) -> Result<ResponseFuture, ValidationError> {
        self.call(Operation::GetContainerLogs, Some(container_id), None)
    }

    /// `POST /stack`
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidPayload`] if `stack` cannot be serialized.
    pub fn create_stack<T: Serialize + ?Sized>(
        &self,
        stack: &T,
    ) -> Result<ResponseFuture, ValidationError> {
        self.call(Operation::CreateStack, None, Some(to_payload(stack)?))
    }

    /// `GET /stack/{id}`
    ///
    /// # Errors
    /// Returns [`ValidationError::MissingId`] if `stack_id` is empty.
    pub fn get_stack(&self, stack_id: &str) -> Result<ResponseFuture, ValidationError> {
        self.call(Operation::GetStack, Some(stack_id), None)
    }

    /// `GET /stack/{id}/services`
    ///
    /// # Errors
    /// Returns [`ValidationError::MissingId`] if `stack_id` is empty.
    pub fn get_stack_services(&self, stack_id: &str) -> Result<ResponseFuture, ValidationError> {
        self.call(Operation::GetStackServices, Some(stack_id), None)
    }

    /// `POST /stack/{id}/?action=remove`
    ///
    /// # Errors
    /// Returns [`ValidationError::MissingId`] if `stack_id` is empty.
    pub fn remove_stack(&self, stack_id: &str) -> Result<ResponseFuture, ValidationError> {
        self.call(Operation::RemoveStack, Some(stack_id), None)
    }

    /// `GET /ports`
    #[must_use]
    pub fn get_ports(&self) -> ResponseFuture {
        self.collection(Operation::GetPorts)
    }

    /// `GET /hosts`
    #[must_use]
    pub fn get_hosts(&self) -> ResponseFuture {
        self.collection(Operation::GetHosts)
    }

    /// `GET /hosts/{id}`
    ///
    /// The host id is inserted as given; it is not validated.
    #[must_use]
    pub fn get_host(&self, host_id: &str) -> ResponseFuture {
        let route = Operation::GetHost.route();
        let path = route.path(&self.environment, Some(host_id));
        self.request(route.method, &path, None)
    }

    /// `GET /services/{id}`
    ///
    /// # Errors
    /// Returns [`ValidationError::MissingId`] if `service_id` is empty.
    pub fn get_service(&self, service_id: &str) -> Result<ResponseFuture, ValidationError> {
        self.call(Operation::GetService, Some(service_id), None)
    }

    /// `POST /services/{id}/?action=deactivate`
    ///
    /// # Errors
    /// Returns [`ValidationError::MissingId`] if `service_id` is empty.
    pub fn stop_service(&self, service_id: &str) -> Result<ResponseFuture, ValidationError> {
        self.call(Operation::StopService, Some(service_id), None)
    }

    /// `POST /services/{id}/?action=activate`
    ///
    /// # Errors
    /// Returns [`ValidationError::MissingId`] if `service_id` is empty.
    pub fn start_service(&self, service_id: &str) -> Result<ResponseFuture, ValidationError> {
        self.call(Operation::StartService, Some(service_id), None)
    }

    /// `POST /services/{id}/?action=restart`
    ///
    /// # Errors
    /// Returns [`ValidationError::MissingId`] if `service_id` is empty, or
    /// [`ValidationError::InvalidPayload`] if `params` cannot be serialized.
    pub fn restart_service<T: Serialize + ?Sized>(
        &self,
        service_id: &str,
        params: &T,
    ) -> Result<ResponseFuture, ValidationError> {
        self.call(
            Operation::RestartService,
            Some(service_id),
            Some(to_payload(params)?),
        )
    }

    fn collection(&self, operation: Operation) -> ResponseFuture {
        let route = operation.route();
        let path = route.path(&self.environment, None);
        self.request(route.method, &path, None)
    }
}

impl fmt::Debug for RancherClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RancherClient")
            .field("base_url", &self.base_url)
            .field("environment", &self.environment)
            .field("authorization", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Path segment for a payload `id`: non-empty strings as-is, numbers formatted.
fn payload_id(id: &Value) -> Option<Cow<'_, str>> {
    match id {
        Value::String(s) if !s.is_empty() => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        _ => None,
    }
}

fn to_payload<T: Serialize + ?Sized>(value: &T) -> Result<Value, ValidationError> {
    serde_json::to_value(value).map_err(ValidationError::InvalidPayload)
}

fn build_request(
    method: Method,
    url: &str,
    authorization: HeaderValue,
    body: Option<String>,
) -> Result<Request<Full<Bytes>>, RequestError> {
    let mut builder = Request::builder()
        .method(method)
        .uri(url)
        .header(AUTHORIZATION, authorization)
        .header(ACCEPT, JSON)
        .header(USER_AGENT, DEFAULT_USER_AGENT);

    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, JSON);
            Full::new(Bytes::from(json))
        }
        None => Full::new(Bytes::new()),
    };

    Ok(builder.body(body)?)
}
