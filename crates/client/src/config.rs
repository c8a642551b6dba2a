//! Client configuration, read from the environment.

/// Environment variable holding the base URL of the inventory API.
pub const API_URL_VAR: &str = "INVTRACK_API_URL";
/// Environment variable holding an optional bearer token.
pub const AUTH_TOKEN_VAR: &str = "INVTRACK_AUTH_TOKEN";
/// Base URL used when `INVTRACK_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without a trailing slash, e.g. `http://localhost:5000`.
    pub api_url: String,
    pub auth_token: Option<String>,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: normalize_url(api_url.into()),
            auth_token: None,
        }
    }

    pub fn with_token(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            auth_token: Some(token.into()),
            ..Self::new(api_url)
        }
    }

    /// Read `INVTRACK_API_URL` and `INVTRACK_AUTH_TOKEN`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup. Blank values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = non_blank(API_URL_VAR).unwrap_or_else(|| {
            tracing::debug!("{API_URL_VAR} not set; using {DEFAULT_API_URL}");
            DEFAULT_API_URL.to_string()
        });

        match non_blank(AUTH_TOKEN_VAR) {
            Some(token) => Self::with_token(api_url, token.trim()),
            None => Self::new(api_url),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

fn normalize_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}
