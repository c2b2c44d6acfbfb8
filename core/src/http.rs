//! HTTP transport types and the ureq executor.
//!
//! # Design
//! Requests and responses are described as plain data. `ShortenerClient`
//! builds `HttpRequest` values without touching the network; `send` is the
//! single place that performs I/O. The agent is configured so 4xx/5xx
//! statuses come back as ordinary responses.

use tracing::debug;

use crate::error::ClientError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Build an agent that reports every status code as a normal response.
pub fn agent() -> ureq::Agent {
    ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent()
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

impl HttpRequest {
    /// Execute the request. Exactly one network round-trip, no retries.
    pub fn send(&self, agent: &ureq::Agent) -> Result<HttpResponse, ClientError> {
        debug!(method = self.method.as_str(), url = %self.url, "sending request");

        let result = match (self.method, self.body.as_deref()) {
            (HttpMethod::Get, _) => with_headers(agent.get(&self.url), &self.headers).call(),
            (HttpMethod::Delete, _) => {
                with_headers(agent.delete(&self.url), &self.headers).call()
            }
            (HttpMethod::Post, Some(body)) => {
                with_headers(agent.post(&self.url), &self.headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => {
                with_headers(agent.post(&self.url), &self.headers).send_empty()
            }
            (HttpMethod::Put, Some(body)) => {
                with_headers(agent.put(&self.url), &self.headers).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => {
                with_headers(agent.put(&self.url), &self.headers).send_empty()
            }
        };
        let mut response = result?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.body_mut().read_to_string()?;

        debug!(status, bytes = body.len(), "received response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
