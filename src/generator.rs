//! Client for the remote resume generation endpoint
//!
//! The endpoint is a black box: it accepts `{resumeUrl, jobDescription}` and
//! answers with `{markdown}`. Anything else is treated as a failure. The HTTP
//! status is logged but not interpreted, so an error page that still carries
//! a `markdown` field counts as a success.

use anyhow::{Context, Result};
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Opening marker the service wraps its answer in
const FENCE_OPEN: &str = "```markdown\n";
/// Closing marker the service wraps its answer in
const FENCE_CLOSE: &str = "\n```";

/// Body of the generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub resume_url: String,
    pub job_description: String,
}

/// Errors that can occur while asking the endpoint for a resume
///
/// These carry developer-facing detail only. The user always sees the same
/// fixed message (see `form::SUBMIT_FAILED_MESSAGE`).
#[derive(Debug)]
pub enum GenerateError {
    /// Request could not be sent or the body could not be read
    Network(String),
    /// Response body was not JSON
    Decode(String),
    /// JSON was valid but had no usable `markdown` field
    InvalidFormat,
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::Decode(msg) => write!(f, "Response is not JSON: {}", msg),
            Self::InvalidFormat => write!(f, "Invalid response format"),
        }
    }
}

impl std::error::Error for GenerateError {}

/// Remove the code fence the service wraps its markdown in
///
/// Literal replacement of the first opening marker and then the first
/// closing marker, wherever they occur. Text without markers is returned
/// unchanged.
pub fn strip_markdown_fence(markdown: &str) -> String {
    markdown
        .replacen(FENCE_OPEN, "", 1)
        .replacen(FENCE_CLOSE, "", 1)
}

/// Pull the formatted text out of a decoded response body
///
/// `markdown` must be a non-empty string. Missing, empty, null, or
/// non-string values are all `InvalidFormat`.
pub fn extract_markdown(body: &Value) -> Result<String, GenerateError> {
    match body.get("markdown") {
        Some(Value::String(markdown)) if !markdown.is_empty() => {
            Ok(strip_markdown_fence(markdown))
        }
        _ => Err(GenerateError::InvalidFormat),
    }
}

/// HTTP implementation of the generation call
#[derive(Clone)]
pub struct HttpGenerator {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpGenerator {
    /// Build a generator for `endpoint`
    ///
    /// `timeout` of `None` means the request may wait forever. There is no
    /// cancellation either way.
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Issue one POST and return the fence-stripped markdown
    pub async fn generate(&self, request: &GenerateRequest) -> Result<String, GenerateError> {
        tracing::info!(endpoint = %self.endpoint, "Submitting resume generation request");

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| GenerateError::Network(e.to_string()))?;

        let status = response.status();
        tracing::debug!("Generation endpoint responded with {}", status);

        let body = response
            .bytes()
            .await
            .map_err(|e| GenerateError::Network(e.to_string()))?;

        let json: Value =
            serde_json::from_slice(&body).map_err(|e| GenerateError::Decode(e.to_string()))?;

        let markdown = extract_markdown(&json)?;
        tracing::info!("Received {} bytes of formatted text", markdown.len());
        Ok(markdown)
    }
}
