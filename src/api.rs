use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::fmt;
use tracing::debug;

use crate::error::NetworkProblem;

/// Source of homework status payloads, keyed by a `from_date` cursor.
#[async_trait]
pub trait HomeworkSource: Send + Sync {
    /// Performs exactly one request; retries are the caller's business.
    async fn get_api_answer(&self, from_date: i64) -> Result<Value, NetworkProblem>;
}

#[derive(Clone)]
pub struct PracticumClient {
    http: Client,
    endpoint: Url,
    token: String,
}

impl fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl PracticumClient {
    pub fn new(endpoint: &str, token: String) -> Result<Self> {
        let endpoint = Url::parse(endpoint).context("invalid homework status endpoint")?;
        let http = Client::builder()
            .user_agent("homework-bot/0.1")
            .no_proxy()
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            endpoint,
            token,
        })
    }

    pub fn build_request(&self, from_date: i64) -> reqwest::Result<reqwest::Request> {
        self.http
            .get(self.endpoint.clone())
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .build()
    }

    fn transport_error(&self, from_date: i64, source: reqwest::Error) -> NetworkProblem {
        NetworkProblem::Transport {
            endpoint: self.endpoint.to_string(),
            from_date,
            source,
        }
    }
}

#[async_trait]
impl HomeworkSource for PracticumClient {
    async fn get_api_answer(&self, from_date: i64) -> Result<Value, NetworkProblem> {
        let request = self
            .build_request(from_date)
            .map_err(|err| self.transport_error(from_date, err))?;
        debug!(url = %request.url(), "requesting homework statuses");

        let res = self
            .http
            .execute(request)
            .await
            .map_err(|err| self.transport_error(from_date, err))?;

        if res.status() != StatusCode::OK {
            return Err(NetworkProblem::Status(res.status()));
        }

        res.json::<Value>().await.map_err(NetworkProblem::Decode)
    }
}
