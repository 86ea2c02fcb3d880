//! REST client for the generation provider's HTTP endpoints.

use async_trait::async_trait;
use serde::Deserialize;

use callsheet_batch::{GenerateError, GenerationRequest, Generator};
use callsheet_core::types::ArtifactRef;

/// HTTP client for the remote generation service.
///
/// Holds a pooled [`reqwest::Client`], the provider base URL, and the API
/// key. Cheap to share by reference across concurrently pending calls.
pub struct RenderClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Response returned by the provider's `/v1/generations` endpoint.
#[derive(Debug, Deserialize)]
struct GenerationResponse {
    /// Provider-assigned reference to the generated artifact.
    artifact_id: String,
}

/// Errors from the provider REST layer.
#[derive(Debug, thiserror::Error)]
pub enum RenderClientError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Provider error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl RenderClient {
    /// Create a new client.
    ///
    /// * `base_url` - provider base URL, e.g. `https://api.example.com`.
    /// * `api_key`  - bearer token for authentication.
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling across services).
    pub fn with_client(client: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    /// Base URL this client targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit one generation request and wait for the artifact reference.
    ///
    /// Sends `POST /v1/generations` with the prompt, reference artifacts,
    /// and optional aspect ratio.
    pub async fn submit(
        &self,
        request: &GenerationRequest,
    ) -> Result<ArtifactRef, RenderClientError> {
        let body = serde_json::json!({
            "prompt": request.prompt,
            "reference_artifacts": request.reference_artifacts,
            "aspect_ratio": request.aspect_ratio,
        });

        let response = self
            .client
            .post(format!("{}/v1/generations", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RenderClientError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerationResponse = response.json().await?;
        tracing::debug!(
            request_id = %request.id,
            artifact_id = %parsed.artifact_id,
            "Generation submitted and resolved",
        );
        Ok(parsed.artifact_id)
    }
}

#[async_trait]
impl Generator for RenderClient {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<ArtifactRef, GenerateError> {
        // All provider failures surface uniformly as retryable remote errors;
        // the executor owns the retry budget.
        self.submit(request)
            .await
            .map_err(|e| GenerateError::Remote(e.to_string()))
    }
}
