//! HTTP transport for the game service.
//!
//! This module provides the [`Transport`] trait, the seam between the client
//! and the network, and [`ReqwestTransport`], its reqwest implementation.
//! Requests arrive fully resolved: URL, headers, query and timeout are
//! computed by [`crate::ApiClient`] from its configuration at call time.

use std::time::Duration;

use log::debug;
use mockall::automock;
use reqwest::Client;
use serde_json::Value;

use crate::error::TransportFailure;

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

/// A request ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Absolute URL, base URL and endpoint path joined.
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub timeout: Duration,
}

impl HttpRequest {
    /// Returns the value of the first header named `name`, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A response as received from the server, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Executes HTTP requests.
///
/// Implementations return every response the server sends, 2xx or not, and
/// only fail with [`TransportFailure::NoResponse`] or
/// [`TransportFailure::Send`]. Status interpretation is left to the client.
#[automock]
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Sends the request and waits for the full response body.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure>;
}

/// [`Transport`] backed by a [`reqwest::Client`].
///
/// The underlying client is reused between requests so connections are
/// pooled by reqwest.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    /// HTTP client
    client: Client,
}

impl ReqwestTransport {
    /// Create a new [ReqwestTransport].
    pub fn new() -> Self {
        ReqwestTransport {
            client: Client::new(),
        }
    }

    /// Create a [ReqwestTransport] around an existing client, e.g. one with a
    /// custom proxy or TLS configuration.
    pub fn with_client(client: Client) -> Self {
        ReqwestTransport { client }
    }
}

impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure> {
        let mut builder = self
            .client
            .request(request.method.into(), &request.url)
            .timeout(request.timeout);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(
            "response from {} {} -> {} {}",
            request.method.as_str(),
            &request.url,
            status,
            &body
        );

        Ok(HttpResponse { status, body })
    }
}
