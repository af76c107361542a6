//! Test utilities for integration tests
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::{Error, Result, bail};
use async_trait::async_trait;
use axum::{Router, body::Body};

use clue::api::AppState;
use clue::api::app;
use clue::core::AppConfig;
use clue::openai::{LanguageModel, ResponseRequest};

pub fn test_config(openai_api_hostname: &str) -> AppConfig {
    AppConfig {
        openai_api_hostname: openai_api_hostname.to_string(),
        openai_api_key: Some(String::from("test-api-key")),
        openai_model: String::from("gpt-4o"),
        max_code_chars: 8000,
        llm_timeout_secs: 5,
        store_responses: true,
        max_body_bytes: 1024 * 1024,
    }
}

/// A model that answers every request with the same canned reply and
/// remembers what it was asked.
pub struct StubModel {
    reply: Option<String>,
    pub requests: Mutex<Vec<ResponseRequest>>,
}

impl StubModel {
    pub fn replying(reply: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.map(String::from),
            requests: Mutex::new(vec![]),
        })
    }

    pub fn last_request(&self) -> ResponseRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("Model was never called")
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LanguageModel for StubModel {
    async fn respond(&self, request: &ResponseRequest) -> Result<Option<String>, Error> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.reply.clone())
    }
}

/// A model whose every call fails.
pub struct FailingModel;

#[async_trait]
impl LanguageModel for FailingModel {
    async fn respond(&self, _request: &ResponseRequest) -> Result<Option<String>, Error> {
        bail!("503 The server is overloaded")
    }
}

/// Creates a test application router backed by `model`.
pub fn test_app(model: Arc<dyn LanguageModel>) -> Router {
    let app_state = AppState::new(test_config("https://api.openai.com"), model);
    app(Arc::new(app_state))
}

/// Creates a test application router with the given config and the
/// real OpenAI backed model.
pub fn test_app_with_config(config: AppConfig) -> Router {
    let model = clue::openai::OpenAiModel::from_config(&config);
    app(Arc::new(AppState::new(config, Arc::new(model))))
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

pub async fn body_to_json(body: Body) -> serde_json::Value {
    serde_json::from_str(&body_to_string(body).await).expect("Body is not JSON")
}
