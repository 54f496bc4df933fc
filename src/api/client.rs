//! The game service client.
//!
//! This module provides [`ApiClient`], which owns a [`ClientConfig`] and a
//! [`Transport`]. All endpoint methods funnel through one execution path,
//! [`ApiClient::request`], so every failure is reported the same way.

use log::{debug, info, warn};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::api::request_structs::RequestDescriptor;
use crate::api::requester::{HttpRequest, ReqwestTransport, Transport};
use crate::config::ClientConfig;
use crate::error::{ApiError, TransportFailure};
use crate::utils::render_body;

/// Header carrying the auth token.
pub const AUTH_HEADER: &str = "X-Firebase-AppCheck";

/// Separator between the parts of a transport error message.
const MESSAGE_SEPARATOR: &str = " | ";

/// Client for the game service.
///
/// The configuration can be changed at any time through [`Self::set_base_url`]
/// and [`Self::set_token`]. Each request works on a snapshot taken when it
/// starts, so a change only affects requests issued afterwards.
///
/// # Examples
///
/// ```no_run
/// # use geoguess_client::ApiClient;
/// # async fn run() -> Result<(), geoguess_client::ApiError> {
/// let client = ApiClient::new("geo.example.com", None)?;
/// client.set_token(Some("app-check-token")).await;
/// let game = client.start_game().await?;
/// println!("Game: {}", game);
/// # Ok(())
/// # }
/// ```
pub struct ApiClient<T: Transport = ReqwestTransport> {
    /// Base URL, auth token and timeout
    config: RwLock<ClientConfig>,
    /// Executes the HTTP round trip
    transport: T,
}

impl ApiClient<ReqwestTransport> {
    /// Create a new [ApiClient] using reqwest.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the service, normalized before use.
    /// * `auth_token` - Optional token sent in the `X-Firebase-AppCheck` header.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the base URL is empty or invalid.
    pub fn new(base_url: &str, auth_token: Option<&str>) -> Result<Self, ApiError> {
        Ok(Self::from_config(ClientConfig::new(base_url, auth_token)?))
    }

    /// Create a new [ApiClient] using reqwest from an existing configuration.
    pub fn from_config(config: ClientConfig) -> Self {
        Self::with_transport(config, ReqwestTransport::new())
    }
}

impl<T: Transport> ApiClient<T> {
    /// Create a new [ApiClient] on top of a custom [Transport].
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        ApiClient {
            config: RwLock::new(config),
            transport,
        }
    }

    /// Returns the normalized base URL.
    pub async fn base_url(&self) -> String {
        self.config.read().await.base_url().to_owned()
    }

    /// Returns `true` if an auth token is configured.
    pub async fn has_token(&self) -> bool {
        self.config.read().await.auth_token().is_some()
    }

    /// Replaces the base URL of subsequent requests.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the base URL is empty or invalid. The
    /// previous base URL is kept in that case.
    pub async fn set_base_url(&self, base_url: &str) -> Result<(), ApiError> {
        self.config.write().await.set_base_url(base_url)
    }

    /// Sets the auth token of subsequent requests. `None` or an empty token
    /// removes the header.
    pub async fn set_token(&self, token: Option<&str>) {
        self.config.write().await.set_token(token);
    }

    /// Executes a request and returns the decoded response body.
    ///
    /// # Arguments
    ///
    /// * `descriptor` - Method, path, body and query of the call.
    /// * `context` - Name of the operation, prefixed to error messages.
    ///
    /// # Returns
    ///
    /// The JSON body of a 2xx response, unchanged. An empty body is returned
    /// as [`Value::Null`] and a body that is not JSON as [`Value::String`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] on a non-2xx status, when no response
    /// arrives or when the request cannot be sent.
    pub async fn request(
        &self,
        descriptor: RequestDescriptor,
        context: Option<&str>,
    ) -> Result<Value, ApiError> {
        let config = self.snapshot().await;
        self.execute(&config, descriptor, context).await
    }

    /// Returns a copy of the current configuration.
    pub(crate) async fn snapshot(&self) -> ClientConfig {
        self.config.read().await.clone()
    }

    /// Returns a configuration snapshot if it carries an auth token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] naming `action` when no token is set.
    pub(crate) async fn require_token(&self, action: &str) -> Result<ClientConfig, ApiError> {
        let config = self.snapshot().await;
        if config.auth_token().is_none() {
            return Err(ApiError::config(format!("auth token required to {}", action)));
        }
        Ok(config)
    }

    /// Sends `descriptor` using `config` and normalizes the outcome.
    pub(crate) async fn execute(
        &self,
        config: &ClientConfig,
        descriptor: RequestDescriptor,
        context: Option<&str>,
    ) -> Result<Value, ApiError> {
        let request = build_request(config, descriptor);
        info!("request {}", context.unwrap_or(request.method.as_str()));
        debug!("request {} {}", request.method.as_str(), &request.url);

        let outcome = match self.transport.execute(request).await {
            Ok(response) if (200..300).contains(&response.status) => {
                return Ok(decode_body(&response.body));
            }
            Ok(response) => TransportFailure::Status {
                status: response.status,
                body: Some(response.body).filter(|b| !b.is_empty()),
            },
            Err(failure) => failure,
        };

        let error = wrap_failure(context, outcome);
        warn!("{}", error);
        Err(error)
    }
}

/// Resolves a descriptor against the configuration.
fn build_request(config: &ClientConfig, descriptor: RequestDescriptor) -> HttpRequest {
    let mut headers = vec![(
        ACCEPT.as_str().to_owned(),
        mime::APPLICATION_JSON.as_ref().to_owned(),
    )];
    if descriptor.body.is_some() {
        headers.push((
            CONTENT_TYPE.as_str().to_owned(),
            mime::APPLICATION_JSON.as_ref().to_owned(),
        ));
    }
    if let Some(token) = config.auth_token() {
        headers.push((AUTH_HEADER.to_owned(), token.to_owned()));
    }

    HttpRequest {
        method: descriptor.method,
        url: format!("{}{}", config.base_url(), descriptor.path),
        headers,
        query: descriptor.query,
        body: descriptor.body,
        timeout: config.timeout(),
    }
}

fn decode_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_owned()))
}

/// Builds the transport error reported to the caller.
fn wrap_failure(context: Option<&str>, failure: TransportFailure) -> ApiError {
    let mut parts = Vec::new();
    if let Some(context) = context {
        parts.push(format!("{} failed", context));
    }

    let status = match &failure {
        TransportFailure::Status { status, body } => {
            parts.push(format!("status {}", status));
            if let Some(rendered) = body.as_deref().and_then(render_body) {
                parts.push(rendered);
            }
            Some(*status)
        }
        TransportFailure::NoResponse(_) => {
            parts.push("no response received from server".to_owned());
            None
        }
        TransportFailure::Send(source) => {
            parts.push(error_chain(&**source));
            None
        }
    };

    ApiError::Transport {
        message: parts.join(MESSAGE_SEPARATOR),
        status,
        cause: failure,
    }
}

/// Joins an error and its sources, e.g. `builder error: invalid header value`.
fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !message.contains(&text) {
            message = format!("{}: {}", message, text);
        }
        source = inner.source();
    }
    message
}
