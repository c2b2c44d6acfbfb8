//! Status code plus decoded JSON body, exactly as the service sent them.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ClientError;
use crate::http::HttpResponse;

/// The result of one API call. Nothing here is interpreted; a 400 is as
/// valid an `ApiResponse` as a 200.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    /// Decode the raw body as JSON. Non-JSON bodies are a `Decode` error.
    pub fn from_http(response: HttpResponse) -> Result<Self, ClientError> {
        let body = serde_json::from_str(&response.body).map_err(|source| ClientError::Decode {
            status: response.status,
            source,
        })?;
        Ok(Self {
            status: response.status,
            body,
        })
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `error` message of an error body, if there is one.
    pub fn error_message(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }

    /// Decode the body into a typed DTO.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        T::deserialize(&self.body).map_err(|source| ClientError::Decode {
            status: self.status,
            source,
        })
    }
}
