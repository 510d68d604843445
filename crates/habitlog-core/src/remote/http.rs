//! HTTP client for the habit API.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Response};
use url::Url;

use super::RemoteLogStore;
use crate::error::{ConfigError, RemoteError};
use crate::habit::{format_day, HabitEntry, LogRequest};
use crate::storage::ApiConfig;

/// [`RemoteLogStore`] over the habit REST API.
///
/// - `GET  {base}/habits?date=YYYY-MM-DD` returns the day's habits
/// - `POST {base}/habits/log` records one value
#[derive(Debug, Clone)]
pub struct HttpLogStore {
    client: Client,
    base_url: Url,
}

impl HttpLogStore {
    /// Create a store for `base_url` with the transport's default timeouts.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Self::with_timeout(base_url, None)
    }

    /// Create a store from the `[api]` config section.
    pub fn from_config(api: &ApiConfig) -> Result<Self, ConfigError> {
        Self::with_timeout(&api.base_url, api.timeout_secs.map(Duration::from_secs))
    }

    fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(base_url)?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ConfigError::InvalidValue {
            key: "api".into(),
            message: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, RemoteError> {
        self.base_url
            .join(path)
            .map_err(|e| RemoteError::new(format!("Invalid endpoint '{path}': {e}")))
    }
}

/// Parse the base URL, forcing a trailing slash so relative joins keep any
/// path prefix (`http://host/api` + `habits` -> `http://host/api/habits`).
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&with_slash).map_err(|e| ConfigError::InvalidValue {
        key: "api.base_url".into(),
        message: format!("'{raw}': {e}"),
    })
}

/// Turn non-2xx responses into errors carrying status and body.
async fn check_status(resp: Response) -> Result<Response, RemoteError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    if text.is_empty() {
        Err(RemoteError::new(format!("HTTP {status}")))
    } else {
        Err(RemoteError::new(format!("HTTP {status}: {text}")))
    }
}

#[async_trait]
impl RemoteLogStore for HttpLogStore {
    async fn fetch_day(&self, day: NaiveDate) -> Result<Vec<HabitEntry>, RemoteError> {
        let url = self.endpoint("habits")?;
        let resp = self
            .client
            .get(url)
            .query(&[("date", format_day(day))])
            .send()
            .await?;
        let habits = check_status(resp).await?.json::<Vec<HabitEntry>>().await?;
        tracing::debug!(%day, count = habits.len(), "fetched habits");
        Ok(habits)
    }

    async fn append_log(&self, habit_id: i64, day: NaiveDate, value: f64) -> Result<(), RemoteError> {
        let url = self.endpoint("habits/log")?;
        let body = LogRequest {
            habit_id,
            date: day,
            value,
        };
        let resp = self.client.post(url).json(&body).send().await?;
        check_status(resp).await?;
        tracing::debug!(%day, habit_id, value, "logged habit value");
        Ok(())
    }
}
