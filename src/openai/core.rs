use std::time::Duration;

use anyhow::{Error, Result, anyhow, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::AppConfig;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum Role {
    #[serde(rename = "developer")]
    Developer,
    #[serde(rename = "user")]
    User,
}

// Content blocks for the Responses API input, e.g.
//
// {"type": "input_text", "text": "..."}
// {"type": "input_image", "image_url": "data:image/png;base64,..."}
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum InputContent {
    #[serde(rename = "input_text")]
    Text { text: String },
    #[serde(rename = "input_image")]
    Image { image_url: String },
}

impl InputContent {
    pub fn text(text: &str) -> Self {
        InputContent::Text {
            text: text.to_string(),
        }
    }

    pub fn image(image_url: &str) -> Self {
        InputContent::Image {
            image_url: image_url.to_string(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct InputMessage {
    pub role: Role,
    pub content: Vec<InputContent>,
}

impl InputMessage {
    pub fn new(role: Role, content: Vec<InputContent>) -> Self {
        InputMessage { role, content }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct TextFormat {
    pub r#type: String,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct TextOptions {
    pub format: TextFormat,
}

impl TextOptions {
    pub fn plain() -> Self {
        TextOptions {
            format: TextFormat {
                r#type: String::from("text"),
            },
        }
    }
}

/// Request body for `POST /v1/responses`.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ResponseRequest {
    pub model: String,
    pub store: bool,
    pub text: TextOptions,
    pub input: Vec<InputMessage>,
}

impl ResponseRequest {
    /// All image references in the user turns, in order.
    pub fn image_urls(&self) -> Vec<&str> {
        self.input
            .iter()
            .filter(|m| m.role == Role::User)
            .flat_map(|m| m.content.iter())
            .filter_map(|c| match c {
                InputContent::Image { image_url } => Some(image_url.as_str()),
                InputContent::Text { .. } => None,
            })
            .collect()
    }

    /// Concatenated text blocks of the user turns.
    pub fn user_text(&self) -> String {
        self.input
            .iter()
            .filter(|m| m.role == Role::User)
            .flat_map(|m| m.content.iter())
            .filter_map(|c| match c {
                InputContent::Text { text } => Some(text.as_str()),
                InputContent::Image { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub async fn create_response(
    request: &ResponseRequest,
    api_hostname: &str,
    api_key: &str,
    timeout: Duration,
) -> Result<Value, Error> {
    let url = format!("{}/v1/responses", api_hostname.trim_end_matches("/"));
    let response = reqwest::Client::new()
        .post(url)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .timeout(timeout)
        .json(request)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        // OpenAI errors look like {"error": {"message": "...", "type": "..."}}
        // but proxies and local servers don't always follow that
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(String::from))
            .unwrap_or(body);
        bail!("{} {}", status.as_u16(), message.trim());
    }

    let json = serde_json::from_str::<Value>(&body)
        .map_err(|e| anyhow!("Invalid response from model API: {}", e))?;
    Ok(json)
}

/// Extracts the assistant text from a Responses API result.
///
/// The SDKs expose this as `output_text`, which is the concatenation
/// of every `output_text` content part across the `output` items. Some
/// compatible servers include the field directly so prefer it when
/// present.
pub fn output_text(response: &Value) -> Option<String> {
    if let Some(text) = response["output_text"].as_str() {
        return Some(text.to_string());
    }

    let parts: Vec<&str> = response["output"]
        .as_array()?
        .iter()
        .filter_map(|item| item["content"].as_array())
        .flatten()
        .filter(|part| part["type"] == "output_text")
        .filter_map(|part| part["text"].as_str())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.concat())
    }
}

/// A hosted language model that turns a prepared request into text.
/// Returns `Ok(None)` when the model answered but produced no text.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn respond(&self, request: &ResponseRequest) -> Result<Option<String>, Error>;
}

/// `LanguageModel` backed by an OpenAI compatible Responses API.
#[derive(Clone, Debug)]
pub struct OpenAiModel {
    api_hostname: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl OpenAiModel {
    pub fn new(api_hostname: &str, api_key: Option<&str>, timeout: Duration) -> Self {
        Self {
            api_hostname: api_hostname.to_string(),
            api_key: api_key.map(String::from),
            timeout,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.openai_api_hostname,
            config.openai_api_key.as_deref(),
            Duration::from_secs(config.llm_timeout_secs),
        )
    }
}

#[async_trait]
impl LanguageModel for OpenAiModel {
    async fn respond(&self, request: &ResponseRequest) -> Result<Option<String>, Error> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(anyhow!("Missing OPENAI_API_KEY"))?;

        tracing::debug!(
            "Requesting response from {} with {} image(s)",
            request.model,
            request.image_urls().len()
        );

        let resp = create_response(request, &self.api_hostname, api_key, self.timeout).await?;
        Ok(output_text(&resp))
    }
}
