//! Error types for configuration and request execution.
//!
//! # Design
//! Status codes reported by the service are never errors here; they travel
//! back to the caller inside `ApiResponse`. `ClientError` only covers the
//! cases where there is no response to hand back: the transport failed, the
//! payload could not be encoded, or the body was not JSON.

use thiserror::Error;

/// Fatal setup problems, raised before any request is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `TEST_API_KEY` is unset or empty.
    #[error("{0} environment variable is required")]
    MissingApiKey(&'static str),

    /// A `.env` file exists but could not be read or parsed.
    #[error("failed to load .env file: {0}")]
    DotEnv(#[from] dotenvy::Error),
}

/// Errors returned by `ShortenerClient` operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection refused, DNS failure, TLS failure and the like.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] ureq::Error),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// The response body could not be parsed as JSON.
    #[error("deserialization failed (HTTP {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}
