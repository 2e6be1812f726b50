//! ask — one-shot prompt against the Cerebras chat completions API.
//!
//! Usage:
//!   ask <prompt words...>
//!
//! The credential is read from the CEREBRAS_API_KEY environment variable.

use cerebras_ask::{Error, InferenceClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("Usage: ask <prompt words...>");
        eprintln!();
        eprintln!("Environment:");
        eprintln!("  CEREBRAS_API_KEY    API credential (required)");
        std::process::exit(2);
    }
    let prompt = args.join(" ");

    let client = InferenceClient::builder().build()?;
    if !client.is_authenticated() {
        eprintln!("Warning: CEREBRAS_API_KEY is not set; the request will not be attempted.");
    }

    match client.complete(&prompt).await {
        Ok(completion) => {
            println!("{}", completion.text);
            Ok(())
        }
        Err(err) => {
            match &err {
                Error::Configuration { message } => eprintln!("Configuration: {message}"),
                Error::Validation { message } => eprintln!("Invalid input: {message}"),
                Error::Transport(cause) => eprintln!("Network failure: {cause}"),
                Error::Service { .. } => eprintln!("{err}"),
            }
            std::process::exit(1);
        }
    }
}
