//! Remote history record store.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use tracing::debug;

use super::HistoryEntry;
use crate::config::RemoteConfig;
use crate::error::{Error, Result};

/// Row id that bulk deletes leave in place.
///
/// PostgREST refuses unfiltered deletes, so "delete everything" is
/// expressed as "delete every row whose id is not this one".
pub const SENTINEL_ID: &str = "00000000-0000-0000-0000-000000000000";

/// A remote collection of history records.
///
/// Implementations report failures; callers decide how to fall back.
#[async_trait]
pub trait RemoteHistory: Send + Sync {
    /// Insert one record.
    async fn insert(&self, entry: &HistoryEntry) -> Result<()>;

    /// Fetch the most recent records, newest first.
    async fn fetch_recent(&self, limit: usize) -> Result<Vec<HistoryEntry>>;

    /// Delete every record except the sentinel row.
    async fn delete_all(&self) -> Result<()>;
}

/// History table exposed through a PostgREST-style REST API.
#[derive(Debug, Clone)]
pub struct RestHistory {
    client: Client,
    endpoint: String,
    api_key: String,
}

#[derive(Serialize)]
struct NewRecord<'a> {
    expression: &'a str,
    result: &'a str,
    timestamp: chrono::DateTime<chrono::Utc>,
}

impl RestHistory {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(Error::Config("remote.url must not be empty".into()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/rest/v1/{}",
                config.url.trim_end_matches('/'),
                config.table
            ),
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

/// Turn a non-success status into [`Error::Remote`].
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(Error::Remote {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl RemoteHistory for RestHistory {
    async fn insert(&self, entry: &HistoryEntry) -> Result<()> {
        let record = NewRecord {
            expression: &entry.expression,
            result: &entry.result,
            timestamp: entry.timestamp,
        };

        let response = self
            .request(Method::POST, &self.endpoint)
            .header("Prefer", "return=minimal")
            .json(&record)
            .send()
            .await?;
        check(response).await?;

        debug!(expression = %entry.expression, "Inserted remote history record");
        Ok(())
    }

    async fn fetch_recent(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let url = format!(
            "{}?select=*&order=timestamp.desc&limit={}",
            self.endpoint, limit
        );

        let response = self.request(Method::GET, &url).send().await?;
        let entries: Vec<HistoryEntry> = check(response).await?.json().await?;

        debug!(count = entries.len(), "Fetched remote history");
        Ok(entries)
    }

    async fn delete_all(&self) -> Result<()> {
        let url = format!("{}?id=neq.{}", self.endpoint, SENTINEL_ID);

        let response = self.request(Method::DELETE, &url).send().await?;
        check(response).await?;

        debug!("Deleted remote history");
        Ok(())
    }
}
