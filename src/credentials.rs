//! Credential resolution from injected lookup capabilities.
//!
//! The client never reads settings or process environment on its own;
//! both lookups are passed in at construction time so resolution is
//! deterministic and testable without a live configuration store.

use std::collections::HashMap;
use std::fmt;

/// Configuration lookup capability (e.g. editor settings, a config file).
pub trait ConfigSource: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// Environment lookup capability. [`ProcessEnv`] is the production impl.
pub trait EnvSource: Send + Sync {
    fn var(&self, name: &str) -> Option<String>;
}

/// Configuration source that holds nothing. Useful for scripts and tests
/// that rely on the environment fallback alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConfig;

impl ConfigSource for NoConfig {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }
}

/// Environment source backed by the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

/// An opaque API token. The `Debug` impl redacts the value so the secret
/// cannot leak through logging or error messages.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a token, treating empty/whitespace-only values as absent.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token: String = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Credential(trimmed.to_string()))
        }
    }

    /// The raw token, for placing into an `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Resolve a credential: configuration first, environment as fallback.
///
/// Blank values from either source are skipped rather than shadowing the
/// other source.
pub fn resolve(
    config: &dyn ConfigSource,
    config_key: &str,
    env: &dyn EnvSource,
    env_var: &str,
) -> Option<Credential> {
    config
        .get(config_key)
        .and_then(Credential::new)
        .or_else(|| env.var(env_var).and_then(Credential::new))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn config_takes_priority_over_env() {
        let config = map(&[("api_key", "from-config")]);
        let env = map(&[("CEREBRAS_API_KEY", "from-env")]);
        let cred = resolve(&config, "api_key", &env, "CEREBRAS_API_KEY").unwrap();
        assert_eq!(cred.expose(), "from-config");
    }

    #[test]
    fn env_is_used_when_config_is_missing() {
        let env = map(&[("CEREBRAS_API_KEY", "from-env")]);
        let cred = resolve(&NoConfig, "api_key", &env, "CEREBRAS_API_KEY").unwrap();
        assert_eq!(cred.expose(), "from-env");
    }

    #[test]
    fn blank_config_value_falls_through_to_env() {
        let config = map(&[("api_key", "   ")]);
        let env = map(&[("CEREBRAS_API_KEY", "from-env")]);
        let cred = resolve(&config, "api_key", &env, "CEREBRAS_API_KEY").unwrap();
        assert_eq!(cred.expose(), "from-env");
    }

    #[test]
    fn resolves_to_none_when_both_sources_are_empty() {
        let env: HashMap<String, String> = HashMap::new();
        assert!(resolve(&NoConfig, "api_key", &env, "CEREBRAS_API_KEY").is_none());
    }

    #[test]
    fn debug_redacts_the_token() {
        let cred = Credential::new("super-secret").unwrap();
        let rendered = format!("{cred:?}");
        assert!(!rendered.contains("super-secret"));
        assert_eq!(rendered, "Credential(***)");
    }

    #[test]
    fn tokens_are_trimmed() {
        let cred = Credential::new("  tok  ").unwrap();
        assert_eq!(cred.expose(), "tok");
    }
}
