//! Request builder and executor for the `/shortener` resource.
//!
//! # Design
//! `ShortenerClient` holds the collection URL, the bearer header and a ureq
//! agent; it carries no mutable state between calls. Each operation has a
//! `build_*` method that produces an `HttpRequest` and an executing method
//! that sends it and returns the `ApiResponse` verbatim.

use std::fmt;

use tracing::instrument;

use crate::config::Config;
use crate::error::{ClientError, ConfigError};
use crate::http::{self, HttpMethod, HttpRequest};
use crate::response::ApiResponse;
use crate::types::{ShortlinkRequest, ShortlinkUpdate};

const RESOURCE: &str = "shortener";

/// Blocking client for the shortener API.
#[derive(Clone)]
pub struct ShortenerClient {
    collection_url: String,
    authorization: String,
    agent: ureq::Agent,
}

impl fmt::Debug for ShortenerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShortenerClient")
            .field("collection_url", &self.collection_url)
            .finish_non_exhaustive()
    }
}

impl ShortenerClient {
    pub fn new(config: &Config) -> Self {
        Self {
            collection_url: format!("{}/{RESOURCE}", config.api_url.trim_end_matches('/')),
            authorization: config.credentials.bearer(),
            agent: http::agent(),
        }
    }

    /// Resolve configuration from the environment and build a client.
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::from_env().map(|config| Self::new(&config))
    }

    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    fn request(&self, method: HttpMethod, url: String, body: Option<String>) -> HttpRequest {
        let mut headers = vec![("authorization".to_string(), self.authorization.clone())];
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{id}", self.collection_url)
    }

    pub fn build_create(&self, input: &ShortlinkRequest) -> Result<HttpRequest, ClientError> {
        let body = serde_json::to_string(input).map_err(ClientError::Encode)?;
        Ok(self.request(HttpMethod::Post, self.collection_url.clone(), Some(body)))
    }

    pub fn build_list(&self) -> HttpRequest {
        self.request(HttpMethod::Get, self.collection_url.clone(), None)
    }

    pub fn build_get(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, self.item_url(id), None)
    }

    pub fn build_update(
        &self,
        id: &str,
        input: &ShortlinkUpdate,
    ) -> Result<HttpRequest, ClientError> {
        let body = serde_json::to_string(input).map_err(ClientError::Encode)?;
        Ok(self.request(HttpMethod::Put, self.item_url(id), Some(body)))
    }

    pub fn build_delete(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, self.item_url(id), None)
    }

    /// Send a built request and decode its body.
    pub fn execute(&self, request: &HttpRequest) -> Result<ApiResponse, ClientError> {
        ApiResponse::from_http(request.send(&self.agent)?)
    }

    #[instrument(skip_all, fields(url = %input.original_url))]
    pub fn create(&self, input: &ShortlinkRequest) -> Result<ApiResponse, ClientError> {
        self.execute(&self.build_create(input)?)
    }

    #[instrument(skip_all)]
    pub fn list(&self) -> Result<ApiResponse, ClientError> {
        self.execute(&self.build_list())
    }

    #[instrument(skip(self))]
    pub fn get(&self, id: &str) -> Result<ApiResponse, ClientError> {
        self.execute(&self.build_get(id))
    }

    #[instrument(skip(self, input))]
    pub fn update(&self, id: &str, input: &ShortlinkUpdate) -> Result<ApiResponse, ClientError> {
        self.execute(&self.build_update(id, input)?)
    }

    #[instrument(skip(self))]
    pub fn delete(&self, id: &str) -> Result<ApiResponse, ClientError> {
        self.execute(&self.build_delete(id))
    }
}
