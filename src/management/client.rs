//! Management API client implementation.
//!
//! This module provides the HTTP client for the control plane's ARM-style
//! resource API: `GET`/`PUT <endpoint><resource-id>?api-version=<version>`.

use async_trait::async_trait;
use reqwest::{header, Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, trace};

use crate::error::{LookupError, ManagementError, Result};
use crate::resources::ProviderNamespace;

use super::api::ManagementClient;
use super::types::{
    ApplicationResource, ApplicationsCoreEnvironment, ErrorResponse, RadiusCoreEnvironment,
};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum number of attempts for transient failures.
const MAX_RETRIES: u32 = 3;

/// Delay between retries in milliseconds.
const RETRY_DELAY_MS: u64 = 1000;

/// HTTP client for the control plane.
#[derive(Debug, Clone)]
pub struct UcpClient {
    /// HTTP client.
    client: Client,
    /// Base endpoint, without a trailing slash.
    endpoint: String,
    /// Optional bearer token.
    token: Option<String>,
}

/// Raw outcome of a request that reached the server.
struct RawResponse {
    status: u16,
    body: String,
}

impl UcpClient {
    /// Creates a new client for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(endpoint: &str, token: Option<String>) -> Result<Self> {
        Self::with_timeout(endpoint, token, DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a client with a custom timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_timeout(endpoint: &str, token: Option<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ManagementError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Returns the base endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Builds the request URL for a resource ID.
    fn url(&self, id: &str, api_version: &str) -> String {
        format!("{}{id}?api-version={api_version}", self.endpoint)
    }

    /// Reads a resource. A 404 becomes [`LookupError::NotFound`].
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the resource does not exist and `Transport`
    /// for every other failure.
    pub async fn get_resource<T: DeserializeOwned>(
        &self,
        id: &str,
        api_version: &str,
    ) -> std::result::Result<T, LookupError> {
        debug!("GET {id}");
        let response = self.send(Method::GET, id, api_version, None).await?;

        if response.status == 404 {
            return Err(LookupError::not_found(id));
        }

        let body = Self::check_status(response)?;
        serde_json::from_str(&body).map_err(|e| {
            LookupError::Transport(ManagementError::invalid_response(format!(
                "Failed to parse {id}: {e}"
            )))
        })
    }

    /// Creates or replaces a resource and returns the server's representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    pub async fn put_resource<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        id: &str,
        api_version: &str,
        body: &B,
    ) -> std::result::Result<T, ManagementError> {
        debug!("PUT {id}");
        let body = serde_json::to_value(body)
            .map_err(|e| ManagementError::invalid_response(format!("Failed to encode request: {e}")))?;
        let response = self.send(Method::PUT, id, api_version, Some(&body)).await?;
        let text = Self::check_status(response)?;

        // some providers answer 202 with an empty body
        let payload = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(payload).map_err(|e| {
            ManagementError::invalid_response(format!("Failed to parse response for {id}: {e}"))
        })
    }

    /// Sends a request, retrying transient failures.
    async fn send(
        &self,
        method: Method,
        id: &str,
        api_version: &str,
        body: Option<&serde_json::Value>,
    ) -> std::result::Result<RawResponse, ManagementError> {
        let url = self.url(id, api_version);
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = last_error
                    .as_ref()
                    .and_then(ManagementError::retry_delay_secs)
                    .map_or_else(
                        || Duration::from_millis(RETRY_DELAY_MS * u64::from(attempt)),
                        Duration::from_secs,
                    );
                debug!("Retry attempt {attempt} of {MAX_RETRIES} in {delay:?}");
                tokio::time::sleep(delay).await;
            }

            match self.send_once(method.clone(), &url, body).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() => last_error = Some(e),
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| ManagementError::network("Max retries exceeded")))
    }

    /// Sends a single request.
    async fn send_once(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> std::result::Result<RawResponse, ManagementError> {
        trace!("{method} {url}");

        let mut request = self
            .client
            .request(method, url)
            .header(header::ACCEPT, "application/json");

        if let Some(token) = &self.token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ManagementError::network(format!("Request failed: {e}")))?;

        let status = response.status().as_u16();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(0);

            return Err(ManagementError::RateLimited {
                retry_after_secs: if retry_after == 0 { 60 } else { retry_after },
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ManagementError::network(format!("Failed to read response: {e}")))?;

        Ok(RawResponse { status, body })
    }

    /// Maps non-success statuses to errors and returns the body otherwise.
    fn check_status(response: RawResponse) -> std::result::Result<String, ManagementError> {
        match response.status {
            200..=299 => Ok(response.body),
            401 | 403 => Err(ManagementError::AuthenticationFailed {
                message: Self::error_message(&response.body),
            }),
            status => Err(ManagementError::api_error(status, Self::error_message(&response.body))),
        }
    }

    /// Extracts the message from an ARM error envelope, falling back to the raw body.
    fn error_message(body: &str) -> String {
        serde_json::from_str::<ErrorResponse>(body).map_or_else(
            |_| body.to_string(),
            |e| {
                if e.error.code.is_empty() {
                    e.error.message
                } else {
                    format!("{}: {}", e.error.code, e.error.message)
                }
            },
        )
    }
}

#[async_trait]
impl ManagementClient for UcpClient {
    async fn get_applications_core_environment(
        &self,
        id: &str,
    ) -> std::result::Result<ApplicationsCoreEnvironment, LookupError> {
        self.get_resource(id, ProviderNamespace::ApplicationsCore.api_version())
            .await
    }

    async fn get_radius_core_environment(
        &self,
        id: &str,
    ) -> std::result::Result<RadiusCoreEnvironment, LookupError> {
        self.get_resource(id, ProviderNamespace::RadiusCore.api_version())
            .await
    }

    async fn get_application(
        &self,
        namespace: ProviderNamespace,
        id: &str,
    ) -> std::result::Result<ApplicationResource, LookupError> {
        self.get_resource(id, namespace.api_version()).await
    }

    async fn create_or_update_application(
        &self,
        namespace: ProviderNamespace,
        id: &str,
        application: &ApplicationResource,
    ) -> Result<()> {
        let _: serde_json::Value = self
            .put_resource(id, namespace.api_version(), application)
            .await?;
        Ok(())
    }
}
