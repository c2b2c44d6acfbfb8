//! Environment-driven configuration for the client and its test fixtures.

use std::fmt;

use tracing::debug;

use crate::error::ConfigError;

pub const API_URL_VAR: &str = "TEST_API_URL";
pub const API_KEY_VAR: &str = "TEST_API_KEY";
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Opaque bearer token. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials(String);

impl Credentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credentials(***)")
    }
}

/// Resolved service location and credentials.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub credentials: Credentials,
}

impl Config {
    /// Load `.env` overrides, then resolve from the process environment.
    ///
    /// A missing `.env` file is not an error; a malformed one is.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "loaded .env overrides"),
            Err(err) if err.not_found() => {}
            Err(err) => return Err(err.into()),
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup(API_URL_VAR)
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = api_url.trim_end_matches('/').to_string();

        let token = lookup(API_KEY_VAR)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey(API_KEY_VAR))?;

        Ok(Self {
            api_url,
            credentials: Credentials::new(token),
        })
    }
}
