//! The inference client: one completion round trip per call.

use std::time::Duration;

use tracing::warn;

use crate::credentials::{self, ConfigSource, EnvSource, NoConfig, ProcessEnv};
use crate::transport::{HttpTransport, TransportError};
use crate::types::{
    Completion, CompletionRequest, Message, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
    DEFAULT_TOP_P,
};
use crate::{transport, Error, Result};

/// Default inference endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.cerebras.ai";
/// Configuration key checked first for the API token.
pub const DEFAULT_CONFIG_KEY: &str = "api_key";
/// Environment variable checked when configuration yields nothing.
pub const DEFAULT_ENV_VAR: &str = "CEREBRAS_API_KEY";

/// Client for a hosted chat completions endpoint.
///
/// Holds only immutable state after construction (the resolved credential
/// and fixed request defaults), so one instance can serve concurrent
/// [`complete`](InferenceClient::complete) calls without locking.
///
/// The credential is resolved exactly once, at build time, from the two
/// injected lookup capabilities: configuration first, environment second.
/// Construction never touches the network and succeeds even when no
/// credential was found; such a client reports
/// [`is_authenticated`](InferenceClient::is_authenticated) `== false` and
/// every `complete` call fails fast with a configuration error.
#[derive(Debug)]
pub struct InferenceClient {
    transport: HttpTransport,
    model: String,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    config_key: String,
    env_var: String,
    authenticated: bool,
}

impl InferenceClient {
    pub fn builder() -> InferenceClientBuilder {
        InferenceClientBuilder::new()
    }

    /// Whether credential resolution found a non-empty token.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Perform one completion round trip for `prompt`.
    ///
    /// Fails before any network I/O when the client is unauthenticated
    /// (configuration error) or when the prompt trims to empty (validation
    /// error). Otherwise issues exactly one request and returns the first
    /// choice's message content verbatim. No retries: retry policy, if any,
    /// belongs to the caller.
    ///
    /// Dropping the returned future aborts the in-flight request; no
    /// partial result is ever returned.
    pub async fn complete(&self, prompt: &str) -> Result<Completion> {
        if !self.authenticated {
            return Err(Error::configuration(format!(
                "no API credential found: set the `{}` configuration value \
                 or the {} environment variable",
                self.config_key, self.env_var
            )));
        }

        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(Error::validation("prompt must not be empty"));
        }

        let request = CompletionRequest {
            messages: vec![Message::user(prompt)],
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
            stream: false,
        };

        let response = self.transport.post_chat_completion(&request).await?;
        let text = transport::first_choice_content(&response).map_err(|e| {
            warn!(model = self.model.as_str(), "response body missing first choice content");
            e
        })?;

        Ok(Completion { text })
    }

    /// [`complete`](InferenceClient::complete) bounded by a caller-supplied
    /// deadline. On expiry the in-flight request is aborted and the call
    /// resolves with [`TransportError::DeadlineExceeded`].
    pub async fn complete_with_deadline(
        &self,
        prompt: &str,
        deadline: Duration,
    ) -> Result<Completion> {
        match tokio::time::timeout(deadline, self.complete(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Transport(TransportError::DeadlineExceeded(deadline))),
        }
    }
}

/// Builder for [`InferenceClient`].
///
/// Keep this surface small and predictable: the lookup capabilities, the
/// endpoint override (primarily for mock servers in tests), and the fixed
/// request defaults.
pub struct InferenceClientBuilder {
    config: Box<dyn ConfigSource>,
    env: Box<dyn EnvSource>,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    config_key: String,
    env_var: String,
}

impl InferenceClientBuilder {
    pub fn new() -> Self {
        Self {
            config: Box::new(NoConfig),
            env: Box::new(ProcessEnv),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            config_key: DEFAULT_CONFIG_KEY.to_string(),
            env_var: DEFAULT_ENV_VAR.to_string(),
        }
    }

    /// Inject the configuration lookup capability. Default is [`NoConfig`].
    pub fn config_source(mut self, config: impl ConfigSource + 'static) -> Self {
        self.config = Box::new(config);
        self
    }

    /// Inject the environment lookup capability. Default is [`ProcessEnv`].
    pub fn env_source(mut self, env: impl EnvSource + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    /// Override the endpoint base URL (primarily for mock servers).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }

    /// Rename the configuration key consulted for the credential.
    pub fn config_key(mut self, key: impl Into<String>) -> Self {
        self.config_key = key.into();
        self
    }

    /// Rename the environment variable consulted for the credential.
    pub fn env_var(mut self, name: impl Into<String>) -> Self {
        self.env_var = name.into();
        self
    }

    /// Build the client. Resolves the credential once and validates the
    /// request defaults; performs no network I/O.
    pub fn build(self) -> Result<InferenceClient> {
        if self.max_tokens == 0 {
            return Err(Error::configuration("max_tokens must be positive"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::configuration(format!(
                "temperature must be in [0, 2], got {}",
                self.temperature
            )));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(Error::configuration(format!(
                "top_p must be in [0, 1], got {}",
                self.top_p
            )));
        }
        if self.model.trim().is_empty() {
            return Err(Error::configuration("model must be specified"));
        }

        let credential = credentials::resolve(
            self.config.as_ref(),
            &self.config_key,
            self.env.as_ref(),
            &self.env_var,
        );
        let authenticated = credential.is_some();
        let transport = HttpTransport::new(self.base_url, credential)?;

        Ok(InferenceClient {
            transport,
            model: self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
            config_key: self.config_key,
            env_var: self.env_var,
            authenticated,
        })
    }
}

impl Default for InferenceClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
