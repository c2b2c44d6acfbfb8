//! Wire DTOs for the shortener API.
//!
//! # Design
//! These mirror the service's JSON but are defined independently from the
//! mock-server crate. Response types ignore unknown keys so new server fields
//! never break decoding; only the keys the contract names are required.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

fn days_as_string<S: Serializer>(days: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error> {
    match days {
        Some(days) => serializer.serialize_str(&days.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Payload for creating a shortlink.
///
/// Absent optional fields are omitted from the JSON rather than sent as
/// `null`. `public` is always sent. `expiresIn` goes out as a decimal string.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShortlinkRequest {
    pub original_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "days_as_string"
    )]
    pub expires_in: Option<u32>,
    pub public: bool,
}

impl ShortlinkRequest {
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            title: None,
            expires_in: None,
            public: false,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Expire the link this many days after creation.
    pub fn expires_in(mut self, days: u32) -> Self {
        self.expires_in = Some(days);
        self
    }

    pub fn public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }
}

/// Partial update for an existing shortlink. Only present fields are sent.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShortlinkUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "days_as_string"
    )]
    pub expires_in: Option<u32>,
}

/// A shortlink as returned by create, get and update.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Shortlink {
    pub id: String,
    pub original_url: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Absent from list entries, which carry raw records.
    #[serde(default)]
    pub short_url: Option<String>,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expire_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub clicks: Option<u64>,
}

/// Body of `GET /shortener`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ShortlinkList {
    pub shortlinks: Vec<Shortlink>,
    pub count: usize,
}

/// Body of every 4xx/5xx response.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}
