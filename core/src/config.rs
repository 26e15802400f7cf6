//! Fixed client configuration.
//!
//! Everything here is decided once, when the `ApiClient` is built, and applies
//! uniformly to every call.

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_API_PREFIX: &str = "/api/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_prefix: String,
    pub timeout: Duration,
    pub content_type: String,
    /// Bearer token injected by the request interceptor, if set.
    pub token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            timeout: DEFAULT_TIMEOUT,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            token: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self::default().with_base_url(base_url)
    }

    /// Read `STUDIO_API_URL`, `STUDIO_API_PREFIX`, `STUDIO_API_TIMEOUT_MS` and
    /// `STUDIO_API_TOKEN`, falling back to the defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = lookup("STUDIO_API_URL") {
            config = config.with_base_url(&url);
        }
        if let Some(prefix) = lookup("STUDIO_API_PREFIX") {
            config = config.with_api_prefix(&prefix);
        }
        if let Some(raw) = lookup("STUDIO_API_TIMEOUT_MS") {
            let millis: u64 = raw
                .trim()
                .parse()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    var: "STUDIO_API_TIMEOUT_MS",
                    value: raw.clone(),
                })?;
            config.timeout = Duration::from_millis(millis);
        }
        config.token = lookup("STUDIO_API_TOKEN").filter(|t| !t.is_empty());
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Empty string disables the prefix.
    pub fn with_api_prefix(mut self, prefix: &str) -> Self {
        let prefix = prefix.trim_end_matches('/');
        self.api_prefix = if prefix.is_empty() || prefix.starts_with('/') {
            prefix.to_string()
        } else {
            format!("/{prefix}")
        };
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Absolute URL for a path relative to the API prefix.
    pub fn url_for(&self, path: &str) -> String {
        if path.is_empty() || path.starts_with('/') {
            format!("{}{}{path}", self.base_url, self.api_prefix)
        } else {
            format!("{}{}/{path}", self.base_url, self.api_prefix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name: &str| {
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_match_the_server_layout() {
        let config = ClientConfig::default();
        assert_eq!(config.url_for("/tasks/t-1"), "http://localhost:8000/api/v1/tasks/t-1");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.content_type, "application/json");
        assert!(config.token.is_none());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig::new("http://studio.local/");
        assert_eq!(config.url_for("/hotspots"), "http://studio.local/api/v1/hotspots");
    }

    #[test]
    fn prefix_is_normalized() {
        let config = ClientConfig::new("http://h").with_api_prefix("api/v2/");
        assert_eq!(config.url_for("scripts"), "http://h/api/v2/scripts");
        let bare = ClientConfig::new("http://h").with_api_prefix("");
        assert_eq!(bare.url_for("/scripts"), "http://h/scripts");
    }

    #[test]
    fn env_overrides_defaults() {
        let vars = [
            ("STUDIO_API_URL", "http://10.0.0.2:9000/"),
            ("STUDIO_API_TIMEOUT_MS", "1500"),
            ("STUDIO_API_TOKEN", "secret"),
        ];
        let config = ClientConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.base_url, "http://10.0.0.2:9000");
        assert_eq!(config.api_prefix, "/api/v1");
        assert_eq!(config.timeout, Duration::from_millis(1500));
        assert_eq!(config.token.as_deref(), Some("secret"));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        for raw in ["soon", "0", "-5"] {
            let vars = [("STUDIO_API_TIMEOUT_MS", raw)];
            let err = ClientConfig::from_lookup(lookup(&vars)).unwrap_err();
            assert_eq!(
                err,
                ConfigError::InvalidValue {
                    var: "STUDIO_API_TIMEOUT_MS",
                    value: raw.to_string(),
                }
            );
        }
    }

    #[test]
    fn empty_token_means_none() {
        let vars = [("STUDIO_API_TOKEN", "")];
        assert!(ClientConfig::from_lookup(lookup(&vars)).unwrap().token.is_none());
    }
}
