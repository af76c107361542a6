use std::time::Duration;

use anyhow::{Error, Result, anyhow, bail};
use async_trait::async_trait;
use serde_json::Value;

use crate::api::public::help::HelpRequest;

/// Anything that can answer a help request with the coach's reply.
#[async_trait]
pub trait HelpTransport: Send + Sync {
    async fn request_help(&self, payload: &HelpRequest) -> Result<String, Error>;
}

/// Client for the `POST /api/help` endpoint.
#[derive(Clone, Debug)]
pub struct HelpClient {
    base_url: String,
    timeout: Duration,
}

impl HelpClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(60 * 10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn help_url(&self) -> String {
        format!("{}/api/help", self.base_url)
    }
}

#[async_trait]
impl HelpTransport for HelpClient {
    async fn request_help(&self, payload: &HelpRequest) -> Result<String, Error> {
        let response = reqwest::Client::new()
            .post(self.help_url())
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let json = serde_json::from_str::<Value>(&body).ok();

        if !status.is_success() {
            let message = json
                .as_ref()
                .and_then(|v| v["error"].as_str())
                .map(String::from)
                .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
            bail!(message);
        }

        json.as_ref()
            .and_then(|v| v["aiText"].as_str())
            .map(String::from)
            .ok_or(anyhow!("Response did not include aiText: {}", body))
    }
}
