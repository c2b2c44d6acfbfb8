//! Blocking API client and contract harness for the shortener service.
//!
//! # Overview
//! `Config` resolves the service URL and bearer token from the environment.
//! `ShortenerClient` turns calls into one HTTP request each and hands back
//! the status code plus decoded JSON body without interpreting either, so
//! tests can assert on exactly what the service said.
//!
//! # Design
//! - Every operation is split into a pure `build_*` method that produces an
//!   `HttpRequest` value and an executing method that sends it through ureq.
//!   The builders are what the unit tests pin down.
//! - Non-2xx statuses are data, not errors. Only transport failures and
//!   non-JSON bodies become `ClientError`.
//! - DTOs are defined independently from the mock-server crate; the
//!   integration tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod response;
pub mod types;

pub use client::ShortenerClient;
pub use config::{Config, Credentials};
pub use error::{ClientError, ConfigError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use response::ApiResponse;
pub use types::{ErrorResponse, Shortlink, ShortlinkList, ShortlinkRequest, ShortlinkUpdate};
