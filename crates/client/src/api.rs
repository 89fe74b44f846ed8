//! REST client for the widget data endpoint.
//!
//! Wraps `GET {origin}/api/widget/{workspaceId}` using [`reqwest`]. The
//! request has a hard timeout and is never retried: a widget embedded in
//! someone else's page must fail fast rather than hang.

use std::time::Duration;

use async_trait::async_trait;
use proofwall_core::source::TestimonialSource;
use proofwall_core::testimonial::decode_widget_response;
use proofwall_core::{FetchOutcome, WidgetError};
use reqwest::Url;

/// Request timeout used by [`WidgetApi::new`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for one API origin.
pub struct WidgetApi {
    client: reqwest::Client,
    origin: String,
}

/// Errors from the widget REST layer.
#[derive(Debug, thiserror::Error)]
pub enum WidgetApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint returned a non-2xx status code.
    #[error("Widget API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The configured origin cannot carry an API path.
    #[error("Invalid API origin: {0}")]
    InvalidOrigin(String),
}

impl From<WidgetApiError> for WidgetError {
    fn from(err: WidgetApiError) -> Self {
        match err {
            WidgetApiError::Request(e) => WidgetError::Network(e.to_string()),
            WidgetApiError::ApiError { status, .. } => {
                WidgetError::Network(format!("HTTP {status}"))
            }
            WidgetApiError::InvalidOrigin(origin) => {
                WidgetError::Network(format!("invalid API origin {origin}"))
            }
        }
    }
}

impl WidgetApi {
    /// Create a client for `origin` (e.g. `https://www.proofwall.io`) with
    /// the default timeout.
    pub fn new(origin: impl Into<String>) -> Result<Self, WidgetApiError> {
        Self::with_timeout(origin, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        origin: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, WidgetApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, origin))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, origin: impl Into<String>) -> Self {
        Self {
            client,
            origin: origin.into(),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Full endpoint URL for a workspace; the id is percent-encoded as a
    /// single path segment.
    pub fn endpoint_url(&self, workspace_id: &str) -> Result<Url, WidgetApiError> {
        let mut url = Url::parse(&self.origin)
            .map_err(|e| WidgetApiError::InvalidOrigin(format!("{}: {e}", self.origin)))?;
        url.path_segments_mut()
            .map_err(|()| WidgetApiError::InvalidOrigin(self.origin.clone()))?
            .pop_if_empty()
            .extend(["api", "widget", workspace_id]);
        Ok(url)
    }

    /// Fetch the raw response body for a workspace.
    ///
    /// Sends one `GET /api/widget/{workspace_id}` request. Non-2xx answers
    /// become [`WidgetApiError::ApiError`].
    pub async fn fetch_body(&self, workspace_id: &str) -> Result<String, WidgetApiError> {
        let url = self.endpoint_url(workspace_id)?;
        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.text().await?)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, WidgetApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(WidgetApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl TestimonialSource for WidgetApi {
    async fn fetch(&self, workspace_id: &str) -> FetchOutcome {
        let outcome = match self.fetch_body(workspace_id).await {
            Ok(body) => decode_widget_response(&body),
            Err(e) => FetchOutcome::Failed(e.into()),
        };

        match &outcome {
            FetchOutcome::Loaded(payload) => tracing::info!(
                workspace_id,
                count = payload.testimonials.len(),
                "Loaded testimonials",
            ),
            FetchOutcome::Empty => tracing::info!(workspace_id, "Workspace has no testimonials"),
            FetchOutcome::Failed(e) => {
                tracing::warn!(workspace_id, error = %e, "Failed to load testimonials")
            }
        }
        outcome
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
