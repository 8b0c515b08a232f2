//! Environment-driven client configuration.
//!
//! `GEOPLACES_API_KEY` is the only required variable. `GEOPLACES_BASE_URL`
//! overrides the production endpoint (useful against a local mock) and
//! `GEOPLACES_TIMEOUT_SECS` bounds each request.

use std::fmt;

use crate::client::DEFAULT_BASE_URL;
use crate::error::PlacesError;

const ENV_API_KEY: &str = "GEOPLACES_API_KEY";
const ENV_BASE_URL: &str = "GEOPLACES_BASE_URL";
const ENV_TIMEOUT_SECS: &str = "GEOPLACES_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resolved client configuration.
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

// The key is a credential; keep it out of logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Loads configuration after sourcing a `.env` file when one is present.
///
/// # Errors
///
/// Same conditions as [`load_config_from_env`].
pub fn load_config() -> Result<ClientConfig, PlacesError> {
    dotenvy::dotenv().ok();
    load_config_from_env()
}

/// Loads configuration from process environment variables only.
///
/// # Errors
///
/// [`PlacesError::MissingEnvVar`] when `GEOPLACES_API_KEY` is unset, and
/// [`PlacesError::InvalidEnvVar`] when `GEOPLACES_TIMEOUT_SECS` does not
/// parse as a positive integer.
pub fn load_config_from_env() -> Result<ClientConfig, PlacesError> {
    build_config(|name| std::env::var(name).ok())
}

/// Builds configuration from an arbitrary variable lookup. Tests drive this
/// with a `HashMap` instead of the process environment.
///
/// # Errors
///
/// Same conditions as [`load_config_from_env`].
pub fn build_config<F>(lookup: F) -> Result<ClientConfig, PlacesError>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = lookup(ENV_API_KEY)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| PlacesError::MissingEnvVar(ENV_API_KEY.to_string()))?;

    let base_url = lookup(ENV_BASE_URL)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let timeout_secs = match lookup(ENV_TIMEOUT_SECS) {
        Some(raw) => raw
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| PlacesError::InvalidEnvVar {
                var: ENV_TIMEOUT_SECS.to_string(),
                reason: format!("expected a positive integer, got {raw:?}"),
            })?,
        None => DEFAULT_TIMEOUT_SECS,
    };

    Ok(ClientConfig {
        api_key,
        base_url,
        timeout_secs,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let vars = env(&[("GEOPLACES_API_KEY", "k-123")]);
        let config = build_config(|name| vars.get(name).cloned()).unwrap();
        assert_eq!(config.api_key, "k-123");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn missing_api_key_is_an_error() {
        let vars = env(&[]);
        let err = build_config(|name| vars.get(name).cloned()).unwrap_err();
        assert!(matches!(err, PlacesError::MissingEnvVar(ref v) if v == "GEOPLACES_API_KEY"));
    }

    #[test]
    fn empty_api_key_counts_as_missing() {
        let vars = env(&[("GEOPLACES_API_KEY", "")]);
        let err = build_config(|name| vars.get(name).cloned()).unwrap_err();
        assert!(matches!(err, PlacesError::MissingEnvVar(_)));
    }

    #[test]
    fn overrides_are_honored() {
        let vars = env(&[
            ("GEOPLACES_API_KEY", "k"),
            ("GEOPLACES_BASE_URL", "http://127.0.0.1:9000/maps/api/"),
            ("GEOPLACES_TIMEOUT_SECS", "5"),
        ]);
        let config = build_config(|name| vars.get(name).cloned()).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:9000/maps/api/");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn unparseable_timeout_is_an_error() {
        let vars = env(&[
            ("GEOPLACES_API_KEY", "k"),
            ("GEOPLACES_TIMEOUT_SECS", "soon"),
        ]);
        let err = build_config(|name| vars.get(name).cloned()).unwrap_err();
        assert!(matches!(err, PlacesError::InvalidEnvVar { ref var, .. } if var == "GEOPLACES_TIMEOUT_SECS"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let vars = env(&[("GEOPLACES_API_KEY", "k"), ("GEOPLACES_TIMEOUT_SECS", "0")]);
        assert!(build_config(|name| vars.get(name).cloned()).is_err());
    }

    #[test]
    fn debug_output_redacts_the_key() {
        let vars = env(&[("GEOPLACES_API_KEY", "super-secret")]);
        let config = build_config(|name| vars.get(name).cloned()).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
