//! HTTP transport for the chat completions endpoint.
//!
//! Owns the wire schema, including the provider-specific rename of the
//! canonical `max_tokens` field to `max_completion_tokens`. Nothing outside
//! this module knows the provider's field names.

use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::credentials::Credential;
use crate::types::{CompletionRequest, Message};
use crate::{Error, Result};

const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Network-level failures, distinct from the endpoint answering with an
/// error status (which is a service error).
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("deadline exceeded after {0:?}")]
    DeadlineExceeded(Duration),

    #[error("transport error: {0}")]
    Other(String),
}

/// Wire shape of a chat completions request.
#[derive(Serialize)]
struct WireRequest<'a> {
    messages: &'a [Message],
    model: &'a str,
    #[serde(rename = "max_completion_tokens")]
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    stream: bool,
}

impl<'a> WireRequest<'a> {
    fn from_request(request: &'a CompletionRequest) -> Self {
        Self {
            messages: &request.messages,
            model: &request.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
            stream: request.stream,
        }
    }
}

#[derive(Debug)]
pub(crate) struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<Credential>,
}

impl HttpTransport {
    /// Build the transport. No default request timeout is set: a
    /// caller-supplied deadline wraps the whole call instead.
    pub(crate) fn new(base_url: impl Into<String>, api_key: Option<Credential>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::configuration(format!("failed to create HTTP client: {e}")))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Issue exactly one POST to the chat completions endpoint and return
    /// the parsed JSON body of a successful response.
    pub(crate) async fn post_chat_completion(
        &self,
        request: &CompletionRequest,
    ) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.base_url, CHAT_COMPLETIONS_PATH);
        let request_id = Uuid::new_v4().to_string();

        let mut req = self
            .client
            .post(&url)
            .header("x-request-id", &request_id)
            .json(&WireRequest::from_request(request));
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key.expose());
        }

        let start = Instant::now();
        let response = req.send().await.map_err(TransportError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                http_status = status.as_u16(),
                request_id = request_id.as_str(),
                duration_ms = start.elapsed().as_millis() as u64,
                "chat completion request failed"
            );
            let message = if body.trim().is_empty() {
                status.to_string()
            } else {
                body
            };
            return Err(Error::service(Some(status.as_u16()), message));
        }

        debug!(
            http_status = status.as_u16(),
            request_id = request_id.as_str(),
            duration_ms = start.elapsed().as_millis() as u64,
            "chat completion request succeeded"
        );

        // A 2xx body that is not JSON is a malformed success, not a crash.
        response
            .json()
            .await
            .map_err(|e| Error::service(Some(status.as_u16()), format!("malformed response: {e}")))
    }
}

/// Extract `choices[0].message.content` verbatim, or fail with a
/// "malformed response" service error when the structure is absent.
pub(crate) fn first_choice_content(response: &serde_json::Value) -> Result<String> {
    response
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .map(str::to_owned)
        .ok_or_else(|| {
            Error::service(
                None,
                "malformed response: missing choices[0].message.content",
            )
        })
}
