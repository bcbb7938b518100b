//! Client configuration, read from the environment.

use std::path::PathBuf;

use crate::error::{ClientError, ClientResult};
use crate::token::TOKEN_KEY;

/// Backend used when `STEPWISE_API_URL` is not set (local development host).
pub const DEFAULT_API_URL: &str = "http://localhost:8002";

pub const API_URL_ENV: &str = "STEPWISE_API_URL";
pub const TOKEN_FILE_ENV: &str = "STEPWISE_TOKEN_FILE";

/// Settings needed to build an [`crate::ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every request path is appended to (no trailing `/`).
    pub api_url: String,
    /// JSON key-value file holding the bearer token.
    pub token_file: PathBuf,
    /// Key the bearer token is stored under.
    pub token_key: String,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>, token_file: impl Into<PathBuf>) -> ClientResult<Self> {
        Ok(Self {
            api_url: normalize_api_url(&api_url.into())?,
            token_file: token_file.into(),
            token_key: TOKEN_KEY.to_string(),
        })
    }

    /// Load from `STEPWISE_API_URL` and `STEPWISE_TOKEN_FILE`, falling back to
    /// the local development host and the OS data directory.
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ClientResult<Self> {
        let api_url = lookup(API_URL_ENV).unwrap_or_else(|| {
            tracing::debug!("{API_URL_ENV} not set; using {DEFAULT_API_URL}");
            DEFAULT_API_URL.to_string()
        });

        let token_file = match lookup(TOKEN_FILE_ENV) {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_token_file()?,
        };

        Self::new(api_url, token_file)
    }
}

fn normalize_api_url(raw: &str) -> ClientResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ClientError::Config("API URL must not be empty".into()));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ClientError::Config(format!(
            "API URL must start with http:// or https://, got {trimmed:?}"
        )));
    }
    Ok(trimmed.to_string())
}

fn default_token_file() -> ClientResult<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .ok_or_else(|| {
            ClientError::Config(
                "failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share"
                    .into(),
            )
        })?;

    Ok(base.join("stepwise").join("storage.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn explicit_values_win() {
        let config = ClientConfig::from_lookup(lookup(&[
            (API_URL_ENV, "https://api.example.com/"),
            (TOKEN_FILE_ENV, "/tmp/stepwise.json"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.token_file, PathBuf::from("/tmp/stepwise.json"));
        assert_eq!(config.token_key, "tokenAuth");
    }

    #[test]
    fn api_url_defaults_to_local_host() {
        let config =
            ClientConfig::from_lookup(lookup(&[(TOKEN_FILE_ENV, "/tmp/t.json")])).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn malformed_api_urls_are_rejected() {
        assert!(matches!(
            ClientConfig::new("  ", "/tmp/t.json"),
            Err(ClientError::Config(_))
        ));
        assert!(matches!(
            ClientConfig::new("localhost:8002", "/tmp/t.json"),
            Err(ClientError::Config(_))
        ));
    }
}
