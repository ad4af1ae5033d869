use crate::models::GenerationRequest;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use reqwest::Client;
use tracing::{info, error};

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("validation error: {0}")] Validation(String),
    #[error("service error: {0}")] Service(String),
    #[error("transport error: {0}")] Transport(String),
}

impl GenerateError {
    /// Operator-facing message: a service-supplied detail verbatim,
    /// everything else collapses to the generic fallback.
    pub fn display_message(&self) -> String {
        match self {
            GenerateError::Validation(msg) | GenerateError::Service(msg) => msg.clone(),
            GenerateError::Transport(_) => "An error occurred".to_string(),
        }
    }
}

/// The remote code generation collaborator.
///
/// One operation: hand over a complete [`GenerationRequest`], get back the
/// opaque response payload. Implemented over HTTP in production and by
/// in-memory fakes in tests.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<Value, GenerateError>;
}

pub struct HttpGenerationService {
    client: Client,
    base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    pub version: String,
}

impl HttpGenerationService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Reads `ARTGEN_API_BASE` and `ARTGEN_TIMEOUT_SECS`, falling back to
    /// `http://localhost:8000` and 60s.
    pub fn from_env() -> Self {
        let base_url = std::env::var("ARTGEN_API_BASE")
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let timeout: u64 = std::env::var("ARTGEN_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Self::with_timeout(base_url, Duration::from_secs(timeout))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to construct HTTP client");
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe the service's `/health` endpoint.
    pub async fn health(&self) -> Result<ServiceHealth, GenerateError> {
        let url = format!("{}/health", self.base_url);
        let response = self.client
            .get(&url)
            .send()
            .await
            .map_err(|e| GenerateError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerateError::Transport(format!("health check status={}", status)));
        }

        response.json::<ServiceHealth>().await
            .map_err(|e| GenerateError::Transport(format!("malformed health body: {}", e)))
    }
}

#[async_trait]
impl GenerationService for HttpGenerationService {
    async fn generate(&self, request: &GenerationRequest) -> Result<Value, GenerateError> {
        let url = format!("{}/generate", self.base_url);
        info!("🔗 Posting generation request to {}", url);

        let response = self.client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| GenerateError::Transport(e.to_string()))?;

        let status = response.status();
        info!("📥 Response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("❌ Generation rejected: status={} body={}", status, body);
            if let Some(detail) = extract_detail(&body) {
                return Err(GenerateError::Service(detail));
            }
            return Err(GenerateError::Transport(format!("status={} body={}", status, body)));
        }

        // The payload is opaque to the client; it is stored and rendered
        // verbatim, never interpreted.
        response.json::<Value>().await
            .map_err(|e| GenerateError::Transport(format!("malformed response body: {}", e)))
    }
}

fn extract_detail(body: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    parsed.get("detail")?.as_str().map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn detail_is_extracted_from_structured_bodies() {
        assert_eq!(
            extract_detail(r#"{"detail": "invalid url"}"#),
            Some("invalid url".to_string())
        );
    }

    #[test]
    fn detail_requires_a_json_string() {
        assert_eq!(extract_detail("Internal Server Error"), None);
        assert_eq!(extract_detail(r#"{"error": "nope"}"#), None);
        assert_eq!(extract_detail(r#"{"detail": 42}"#), None);
        assert_eq!(extract_detail(""), None);
    }

    #[test]
    fn transport_errors_collapse_to_the_generic_message() {
        let err = GenerateError::Transport("status=500 body=".into());
        assert_eq!(err.display_message(), "An error occurred");
    }

    #[test]
    fn service_detail_is_shown_verbatim() {
        let err = GenerateError::Service("invalid url".into());
        assert_eq!(err.display_message(), "invalid url");
    }
}
