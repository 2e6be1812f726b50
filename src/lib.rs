//! # cerebras-ask
//!
//! Minimal async client for a hosted chat completions API (Cerebras and
//! compatible endpoints): resolve a credential, validate input, issue one
//! non-streaming inference round trip, and normalize the result or error.
//!
//! ## Core behavior
//!
//! - **Credential resolution**: an injected configuration lookup is checked
//!   first, an injected environment lookup second. Resolution happens once,
//!   at client construction; nothing is re-read per call.
//! - **Fail fast**: an unauthenticated client or an empty prompt is rejected
//!   before any network I/O.
//! - **One round trip**: exactly one outbound request per
//!   [`InferenceClient::complete`] call. No retries, no streaming, no
//!   conversation state.
//! - **Typed failures**: every outcome is [`Completion`] or one of the four
//!   [`Error`] kinds (configuration, validation, transport, service).
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use cerebras_ask::InferenceClient;
//!
//! #[tokio::main]
//! async fn main() -> cerebras_ask::Result<()> {
//!     // Credential from the CEREBRAS_API_KEY environment variable.
//!     let client = InferenceClient::builder().build()?;
//!
//!     let completion = client.complete("Say hello!").await?;
//!     println!("{}", completion.text);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod credentials;
pub mod error;
pub mod transport;
pub mod types;

pub use client::{InferenceClient, InferenceClientBuilder};
pub use credentials::{ConfigSource, Credential, EnvSource, NoConfig, ProcessEnv};
pub use error::Error;
pub use transport::TransportError;
pub use types::{Completion, CompletionRequest, Message, MessageRole};

/// Result type alias for the library.
pub type Result<T> = std::result::Result<T, Error>;
