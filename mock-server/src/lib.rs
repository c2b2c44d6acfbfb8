use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use url::Url;
use uuid::Uuid;

/// Stored record. Serialized as-is in list responses.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shortlink {
    pub id: String,
    pub original_url: String,
    pub title: Option<String>,
    pub user_id: String,
    pub public: bool,
    pub clicks: u64,
    pub created_at: DateTime<Utc>,
    pub expire_at: Option<DateTime<Utc>>,
}

/// Single-record response shape for create, get and update.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortlinkView {
    pub id: String,
    pub original_url: String,
    pub title: Option<String>,
    pub short_url: String,
    pub clicks: u64,
    pub public: bool,
    pub created_at: DateTime<Utc>,
    pub expire_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShortlinkList {
    pub shortlinks: Vec<Shortlink>,
    pub count: usize,
}

/// Keeps an explicit `null` as `Some(Value::Null)`; only a missing key is `None`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// Create and update payloads. Loosely typed fields are kept as raw JSON so
/// an explicit `null` can be told apart from an absent key.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortlinkInput {
    pub original_url: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub public: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub expires_in: Option<Value>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Invalid API key")]
    InvalidApiKey,
    #[error("Unauthorized")]
    Forbidden,
    #[error("Shortlink not found")]
    NotFound,
    #[error("Original URL is required")]
    MissingUrl,
    #[error("Invalid URL format")]
    InvalidUrl,
    #[error("URL must use HTTP or HTTPS protocol")]
    UnsupportedScheme,
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized | ApiError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MissingUrl | ApiError::InvalidUrl | ApiError::UnsupportedScheme => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            ApiError::InvalidUrl => json!({
                "error": self.to_string(),
                "details": "Please provide a valid URL including protocol (e.g., https://example.com)",
            }),
            _ => json!({ "error": self.to_string() }),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Accepted keys (each key is its own user) and the origin used for `shortUrl`.
#[derive(Clone, Debug)]
pub struct Settings {
    pub api_keys: Vec<String>,
    pub public_url: String,
}

impl Settings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_keys: vec![api_key.into()],
            public_url: "http://localhost:3000".to_string(),
        }
    }
}

pub type Db = Arc<RwLock<HashMap<String, Shortlink>>>;

#[derive(Clone)]
pub struct AppState {
    db: Db,
    settings: Arc<Settings>,
}

/// Routes are mounted under `/api` so the default client URL works unchanged.
pub fn app(settings: Settings) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(HashMap::new())),
        settings: Arc::new(settings),
    };
    let api = Router::new()
        .route("/shortener", get(list_shortlinks).post(create_shortlink))
        .route(
            "/shortener/{id}",
            get(get_shortlink).put(update_shortlink).delete(delete_shortlink),
        );
    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(listener: TcpListener, settings: Settings) -> Result<(), std::io::Error> {
    axum::serve(listener, app(settings)).await
}

/// A missing `.env` file is fine; a malformed one is an error.
pub fn optional_env_file<T>(
    loaded: Result<T, dotenvy::Error>,
) -> Result<Option<T>, dotenvy::Error> {
    match loaded {
        Ok(found) => Ok(Some(found)),
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

/// Resolve the caller's user id from `Authorization: Bearer <key>`.
fn authorize(state: &AppState, headers: &HeaderMap) -> Result<String, ApiError> {
    let key = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?;
    if state.settings.api_keys.iter().any(|k| k == key) {
        Ok(key.to_string())
    } else {
        Err(ApiError::InvalidApiKey)
    }
}

fn validate_url(raw: Option<&str>) -> Result<Url, ApiError> {
    let raw = raw.filter(|s| !s.is_empty()).ok_or(ApiError::MissingUrl)?;
    let url = Url::parse(raw).map_err(|_| ApiError::InvalidUrl)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ApiError::UnsupportedScheme),
    }
}

/// `expiresIn` could not be turned into a representable timestamp.
#[derive(Debug, PartialEq, Eq)]
pub struct InvalidExpiry;

/// Leading integer of a string: optional sign, then digits, rest ignored.
fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    rest[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// Expiry timestamp for `expiresIn` days after `now`.
///
/// Falsy values (`null`, `false`, `0`, `""`) mean no expiry. Anything else
/// must yield an integer day count whose offset stays in range; `"0"` is a
/// non-empty string and so expires immediately.
fn expiry_timestamp(
    value: &Value,
    now: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>, InvalidExpiry> {
    let days = match value {
        Value::Null | Value::Bool(false) => return Ok(None),
        Value::String(s) if s.is_empty() => return Ok(None),
        Value::Number(n) if n.as_f64() == Some(0.0) => return Ok(None),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => leading_int(s),
        _ => None,
    };
    days.and_then(TimeDelta::try_days)
        .and_then(|offset| now.checked_add_signed(offset))
        .map(Some)
        .ok_or(InvalidExpiry)
}

/// Create only honours the string `"true"`; a JSON bool is stored as private.
fn create_is_public(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::String(s)) if s == "true")
}

/// Update stores a JSON bool as given and also accepts its string spelling.
fn update_is_public(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => Some(s == "true"),
        _ => None,
    }
}

fn title_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn view(link: &Shortlink, public_url: &str) -> ShortlinkView {
    ShortlinkView {
        id: link.id.clone(),
        original_url: link.original_url.clone(),
        title: link.title.clone(),
        short_url: format!("{}/s/{}", public_url.trim_end_matches('/'), link.id),
        clicks: link.clicks,
        public: link.public,
        created_at: link.created_at,
        expire_at: link.expire_at,
    }
}

async fn list_shortlinks(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ShortlinkList>, ApiError> {
    let user = authorize(&state, &headers)?;
    let db = state.db.read().await;
    let mut shortlinks: Vec<Shortlink> = db
        .values()
        .filter(|link| link.user_id == user)
        .cloned()
        .collect();
    shortlinks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let count = shortlinks.len();
    Ok(Json(ShortlinkList { shortlinks, count }))
}

async fn create_shortlink(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<ShortlinkInput>,
) -> Result<Json<ShortlinkView>, ApiError> {
    let user = authorize(&state, &headers)?;
    validate_url(input.original_url.as_deref())?;

    let now = Utc::now();
    let expire_at = match &input.expires_in {
        Some(value) => expiry_timestamp(value, now)
            .map_err(|_| ApiError::Internal("Failed to create shortlink"))?,
        None => None,
    };
    let link = Shortlink {
        id: Uuid::new_v4().simple().to_string(),
        original_url: input.original_url.unwrap_or_default(),
        title: input
            .title
            .as_ref()
            .and_then(title_text)
            .filter(|t| !t.is_empty()),
        user_id: user,
        public: create_is_public(input.public.as_ref()),
        clicks: 0,
        created_at: now,
        expire_at,
    };
    tracing::debug!(id = %link.id, url = %link.original_url, "created shortlink");
    state.db.write().await.insert(link.id.clone(), link.clone());
    Ok(Json(view(&link, &state.settings.public_url)))
}

/// Look up a record owned by `user`, distinguishing missing from foreign.
fn owned<'a>(
    db: &'a HashMap<String, Shortlink>,
    id: &str,
    user: &str,
) -> Result<&'a Shortlink, ApiError> {
    let link = db.get(id).ok_or(ApiError::NotFound)?;
    if link.user_id != user {
        return Err(ApiError::Forbidden);
    }
    Ok(link)
}

async fn get_shortlink(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<ShortlinkView>, ApiError> {
    let user = authorize(&state, &headers)?;
    let db = state.db.read().await;
    let link = owned(&db, &id, &user)?;
    Ok(Json(view(link, &state.settings.public_url)))
}

async fn update_shortlink(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<ShortlinkInput>,
) -> Result<Json<ShortlinkView>, ApiError> {
    let user = authorize(&state, &headers)?;
    let mut db = state.db.write().await;
    owned(&db, &id, &user)?;

    if let Some(original_url) = input.original_url.as_deref().filter(|s| !s.is_empty()) {
        Url::parse(original_url).map_err(|_| ApiError::InvalidUrl)?;
    }
    let expire_at = match &input.expires_in {
        Some(value) => Some(
            expiry_timestamp(value, Utc::now())
                .map_err(|_| ApiError::Internal("Failed to update shortlink"))?,
        ),
        None => None,
    };

    let link = db.get_mut(&id).ok_or(ApiError::NotFound)?;
    if let Some(original_url) = input.original_url.filter(|s| !s.is_empty()) {
        link.original_url = original_url;
    }
    if let Some(title) = &input.title {
        link.title = title_text(title);
    }
    if let Some(public) = input.public.as_ref().and_then(update_is_public) {
        link.public = public;
    }
    if let Some(expire_at) = expire_at {
        link.expire_at = expire_at;
    }
    tracing::debug!(%id, "updated shortlink");
    Ok(Json(view(link, &state.settings.public_url)))
}

async fn delete_shortlink(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let user = authorize(&state, &headers)?;
    let mut db = state.db.write().await;
    owned(&db, &id, &user)?;
    db.remove(&id);
    tracing::debug!(%id, "deleted shortlink");
    Ok(Json(json!({ "message": "Shortlink deleted successfully" })))
}
