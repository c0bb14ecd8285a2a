//! HTTP client for the management API
//!
//! [`ManagementClient`] is the wire-level session object: base URL, CA
//! trust, insecure-TLS flag, and the bearer token. The token lives
//! behind a lock because re-authenticating mid-operation (after a token
//! rotation) mutates it in place.

pub mod error;
pub mod types;

mod api;

pub use error::ClientError;

use std::time::Duration;

use reqwest::{Client, ClientBuilder, header};
use tokio::sync::RwLock;

/// Client for the management API
pub struct ManagementClient {
    client: Client,
    base_url: String,
    api_root: String,
    bootstrap_mode: bool,
    token: RwLock<Option<String>>,
}

impl ManagementClient {
    /// Create a new client with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> ManagementClientBuilder {
        ManagementClientBuilder::default()
    }

    /// Get the configured base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The currently installed bearer token, if any
    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub(crate) async fn install_token(&self, token: &str) {
        *self.token.write().await = Some(token.to_string());
    }

    /// Create a request builder carrying the session's bearer token
    pub(crate) async fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let request = self.request_anonymous(method, path);
        match self.token.read().await.as_ref() {
            Some(token) => request.header(header::AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    /// Create a request builder carrying an explicit bearer token
    pub(crate) fn request_as(
        &self,
        method: reqwest::Method,
        path: &str,
        token: &str,
    ) -> reqwest::RequestBuilder {
        self.request_anonymous(method, path)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
    }

    /// Create a request builder with no credentials attached
    pub(crate) fn request_anonymous(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.api_root, path);
        self.client.request(method, url)
    }

    /// Execute a request and decode the JSON response
    pub(crate) async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            Err(ClientError::from_status(status, message))
        }
    }

    /// Execute a request, discarding any response body
    pub(crate) async fn execute_unit(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<(), ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            Err(ClientError::from_status(status, message))
        }
    }
}

/// Builder for ManagementClient
#[derive(Default)]
pub struct ManagementClientBuilder {
    base_url: Option<String>,
    token: Option<String>,
    ca_cert_pem: Option<String>,
    danger_accept_invalid_certs: bool,
    bootstrap_mode: bool,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ManagementClientBuilder {
    /// Set the base URL, including any API version segment (e.g. `/v3`)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Install a bearer token up front
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Trust additional CA certificates from a PEM bundle
    pub fn ca_cert_pem(mut self, pem: impl Into<String>) -> Self {
        self.ca_cert_pem = Some(pem.into());
        self
    }

    /// Skip TLS certificate verification
    pub fn danger_accept_invalid_certs(mut self, insecure: bool) -> Self {
        self.danger_accept_invalid_certs = insecure;
        self
    }

    /// Mark the endpoint as running in bootstrap mode
    pub fn bootstrap_mode(mut self, enabled: bool) -> Self {
        self.bootstrap_mode = enabled;
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ManagementClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        let base_url = base_url.trim_end_matches('/').to_string();
        // Endpoint paths below carry their own version segment, so the
        // request root is the base URL without a trailing /v3.
        let api_root = base_url
            .strip_suffix("/v3")
            .unwrap_or(&base_url)
            .to_string();

        let mut client_builder = ClientBuilder::new();

        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        if let Some(user_agent) = self.user_agent {
            client_builder = client_builder.user_agent(user_agent);
        } else {
            client_builder = client_builder.user_agent("stirrup-client/0.1.0");
        }

        if let Some(pem) = self.ca_cert_pem {
            let cert = reqwest::Certificate::from_pem(pem.as_bytes())?;
            client_builder = client_builder.add_root_certificate(cert);
        }

        if self.danger_accept_invalid_certs {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build()?;

        Ok(ManagementClient {
            client,
            base_url,
            api_root,
            bootstrap_mode: self.bootstrap_mode,
            token: RwLock::new(self.token),
        })
    }
}
