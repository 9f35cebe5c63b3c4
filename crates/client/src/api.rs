//! REST client for the owner service-request endpoints.
//!
//! Wraps the owner API (pending list, approval, assignment prospects,
//! assignment) using [`reqwest`]. Every request carries
//! `Content-Type: application/json`; none carries credentials.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use staffdesk_core::models::{self, AssignmentProspect, ServiceRequest};
use staffdesk_core::types::DbId;
use staffdesk_core::RemoteFailure;

use crate::config::ClientConfig;

/// Status filter for the pending-approval listing.
const PENDING_APPROVAL: &str = "PENDING_APPROVAL";

/// Errors from the owner API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The owner API returned a non-2xx status code.
    #[error("Owner API error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body text.
        body: String,
    },

    /// A success response carried a body that could not be decoded.
    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<ApiError> for RemoteFailure {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status { status, body } => RemoteFailure::Status { status, body },
            other => RemoteFailure::Transport(other.to_string()),
        }
    }
}

/// The four owner API calls the workflow needs.
///
/// [`OwnerApi`] is the HTTP implementation; tests substitute in-memory
/// fakes.
#[async_trait]
pub trait ServiceRequestApi: Send + Sync {
    /// `GET /owner/service-requests?status=PENDING_APPROVAL`
    async fn list_pending(&self) -> Result<Vec<ServiceRequest>, ApiError>;

    /// `PUT /owner/service-requests/{id}/approve`
    async fn approve(&self, request_id: DbId) -> Result<(), ApiError>;

    /// `GET /owner/service-requests/{id}/assignment-prospects`
    async fn list_prospects(&self, request_id: DbId)
        -> Result<Vec<AssignmentProspect>, ApiError>;

    /// `PUT /owner/service-requests/{requestId}/assign/{artistId}`
    async fn assign(&self, request_id: DbId, artist_id: DbId) -> Result<(), ApiError>;
}

/// HTTP client for the owner API.
pub struct OwnerApi {
    client: reqwest::Client,
    api_url: String,
}

impl OwnerApi {
    /// Build a client from configuration, applying the JSON content type
    /// and request timeout to every call.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self::with_client(client, config.api_url.clone()))
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    ///
    /// The caller is responsible for the client's default headers.
    pub fn with_client(client: reqwest::Client, api_url: String) -> Self {
        Self { client, api_url }
    }

    /// Base HTTP URL of the owner API.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn requests_url(&self) -> String {
        format!("{}/owner/service-requests", self.api_url)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`ApiError::Status`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Read a successful body as JSON. An empty body reads as `null`.
    async fn parse_value(response: reqwest::Response) -> Result<serde_json::Value, ApiError> {
        let response = Self::ensure_success(response).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl ServiceRequestApi for OwnerApi {
    async fn list_pending(&self) -> Result<Vec<ServiceRequest>, ApiError> {
        let response = self
            .client
            .get(self.requests_url())
            .query(&[("status", PENDING_APPROVAL)])
            .send()
            .await?;

        let value = Self::parse_value(response).await?;
        let requests = models::decode_pending(value)?;
        tracing::debug!(count = requests.len(), "Fetched pending service requests");
        Ok(requests)
    }

    async fn approve(&self, request_id: DbId) -> Result<(), ApiError> {
        let response = self
            .client
            .put(format!("{}/{request_id}/approve", self.requests_url()))
            .send()
            .await?;

        Self::check_status(response).await?;
        tracing::debug!(request_id, "Service request approved");
        Ok(())
    }

    async fn list_prospects(
        &self,
        request_id: DbId,
    ) -> Result<Vec<AssignmentProspect>, ApiError> {
        let response = self
            .client
            .get(format!(
                "{}/{request_id}/assignment-prospects",
                self.requests_url()
            ))
            .send()
            .await?;

        let value = Self::parse_value(response).await?;
        if !value.is_array() {
            tracing::warn!(request_id, "Prospect body is not an array, treating as empty");
        }

        let (prospects, skipped) = models::decode_prospects(value);
        for error in &skipped {
            tracing::debug!(request_id, error = %error, "Undecodable assignment prospect");
        }
        if !skipped.is_empty() {
            tracing::warn!(
                request_id,
                skipped = skipped.len(),
                "Skipped undecodable assignment prospects"
            );
        }
        tracing::debug!(request_id, count = prospects.len(), "Fetched assignment prospects");
        Ok(prospects)
    }

    async fn assign(&self, request_id: DbId, artist_id: DbId) -> Result<(), ApiError> {
        let response = self
            .client
            .put(format!(
                "{}/{request_id}/assign/{artist_id}",
                self.requests_url()
            ))
            .send()
            .await?;

        Self::check_status(response).await?;
        tracing::debug!(request_id, artist_id, "Artist assigned");
        Ok(())
    }
}
