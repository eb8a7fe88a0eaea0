//! Remote content store client.
//!
//! The cache treats the remote store as an opaque fetch function behind the
//! [`ContentSource`] trait. [`HttpContentSource`] talks to a PostgREST-style
//! REST API:
//!
//! - `GET {base}/challenges?difficulty_level=eq.{LEVEL}`
//! - `GET {base}/exercise_content?exercise_id=eq.{id}&exercise_type=eq.{type}`
//! - `GET {base}/formats?id=eq.{id}`
//!
//! When an API key is configured it is sent both as `apikey` and as a bearer
//! token.

pub mod error;

pub use error::SourceError;

use async_trait::async_trait;
use inkwell_core::cache::normalize_category;
use inkwell_core::{Challenge, ExerciseContent, Format};
use reqwest::header;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use url::Url;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "inkwell/0.1";

/// Fetches content from the remote store on a cache miss.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// All challenges of a difficulty level.
    async fn fetch_challenges(&self, level: &str) -> Result<Vec<Challenge>, SourceError>;

    /// Content for one exercise of one type.
    async fn fetch_exercise_content(
        &self, exercise_id: &str, exercise_type: &str,
    ) -> Result<ExerciseContent, SourceError>;

    /// One format by id.
    async fn fetch_format(&self, id: &str) -> Result<Format, SourceError>;
}

/// HTTP content source configuration.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// REST endpoint root, e.g. `https://project.example.com/rest/v1`.
    pub base_url: String,
    /// Optional API key.
    pub api_key: Option<String>,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string (default: inkwell/0.x).
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self { base_url: String::new(), api_key: None, timeout: DEFAULT_TIMEOUT, user_agent: DEFAULT_USER_AGENT.to_string() }
    }
}

/// REST client for the remote content store.
#[derive(Debug, Clone)]
pub struct HttpContentSource {
    http: reqwest::Client,
    base_url: Url,
    config: SourceConfig,
}

impl HttpContentSource {
    pub fn new(config: SourceConfig) -> Result<Self, SourceError> {
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| SourceError::InvalidUrl(format!("{}: {e}", config.base_url)))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { http, base_url, config })
    }

    /// Build the URL for a table query.
    fn table_url(&self, table: &str, filters: &[(&str, &str)]) -> Result<Url, SourceError> {
        let mut url = self
            .base_url
            .join(table)
            .map_err(|e| SourceError::InvalidUrl(e.to_string()))?;
        {
            let mut query = url.query_pairs_mut();
            for (column, value) in filters {
                query.append_pair(column, &format!("eq.{value}"));
            }
        }
        Ok(url)
    }

    async fn get_rows<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, SourceError> {
        let start = Instant::now();
        tracing::debug!("fetching content: {}", url);

        let url_path = url.path().to_string();
        let mut request = self.http.get(url).header(header::ACCEPT, "application/json");
        if let Some(key) = &self.config.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("content API response status: {}", status);

        if status == 401 || status == 403 {
            return Err(SourceError::AuthError);
        }

        if status == 404 {
            return Err(SourceError::NotFound(url_path));
        }

        if status == 429 {
            return Err(SourceError::RateLimited);
        }

        if status.is_client_error() || status.is_server_error() {
            return Err(SourceError::HttpError { status: status.as_u16() });
        }

        let bytes = response.bytes().await?;
        let rows: Vec<T> = serde_json::from_slice(&bytes).map_err(|e| SourceError::Parse(e.to_string()))?;

        tracing::debug!("content fetch completed in {:?}, {} rows", start.elapsed(), rows.len());
        Ok(rows)
    }

    async fn get_one<T: DeserializeOwned>(&self, url: Url, what: String) -> Result<T, SourceError> {
        self.get_rows(url)
            .await?
            .into_iter()
            .next()
            .ok_or(SourceError::NotFound(what))
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn fetch_challenges(&self, level: &str) -> Result<Vec<Challenge>, SourceError> {
        let level = normalize_category(level);
        let url = self.table_url("challenges", &[("difficulty_level", level.as_str())])?;
        self.get_rows(url).await
    }

    async fn fetch_exercise_content(
        &self, exercise_id: &str, exercise_type: &str,
    ) -> Result<ExerciseContent, SourceError> {
        let url = self.table_url("exercise_content", &[("exercise_id", exercise_id), ("exercise_type", exercise_type)])?;
        self.get_one(url, format!("exercise {exercise_id} ({exercise_type})")).await
    }

    async fn fetch_format(&self, id: &str) -> Result<Format, SourceError> {
        let url = self.table_url("formats", &[("id", id)])?;
        self.get_one(url, format!("format {id}")).await
    }
}
