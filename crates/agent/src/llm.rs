use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use qcars_core::config::{LlmConfig, LlmProvider};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};

/// One structured-output completion: a fixed system instruction, the user's
/// prompt, and the JSON schema the reply must follow.
#[derive(Clone, Debug)]
pub struct CompletionRequest {
    pub system_instruction: String,
    pub prompt: String,
    pub response_schema: Value,
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Returns the raw response text. Parsing is the caller's job.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

/// Picks the adapter for `config.provider`.
pub fn build_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>> {
    let http = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .context("failed to build http client for llm provider")?;

    let client: Arc<dyn LlmClient> = match config.provider {
        LlmProvider::Gemini => Arc::new(GeminiClient {
            http,
            base_url: config.effective_base_url().trim_end_matches('/').to_string(),
            model: config.effective_model().to_string(),
            api_key: config.api_key.clone(),
        }),
        LlmProvider::Ollama => Arc::new(OllamaClient {
            http,
            base_url: config.effective_base_url().trim_end_matches('/').to_string(),
            model: config.effective_model().to_string(),
        }),
    };
    Ok(client)
}

pub struct GeminiClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: Option<SecretString>,
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| anyhow!("gemini api key is not configured"))?;
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key.expose_secret())
            .json(&gemini_body(request))
            .send()
            .await
            .context("gemini generateContent request failed")?;
        if !response.status().is_success() {
            return Err(anyhow!("gemini generateContent returned {}", response.status()));
        }

        let payload: Value =
            response.json().await.context("failed to decode gemini response envelope")?;
        gemini_text(&payload)
    }
}

pub struct OllamaClient {
    http: Client,
    base_url: String,
    model: String,
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(&ollama_body(&self.model, request))
            .send()
            .await
            .context("ollama chat request failed")?;
        if !response.status().is_success() {
            return Err(anyhow!("ollama chat returned {}", response.status()));
        }

        let payload: Value =
            response.json().await.context("failed to decode ollama response envelope")?;
        ollama_text(&payload)
    }
}

fn gemini_body(request: &CompletionRequest) -> Value {
    json!({
        "systemInstruction": { "parts": [{ "text": request.system_instruction }] },
        "contents": [{ "role": "user", "parts": [{ "text": request.prompt }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": request.response_schema,
        },
    })
}

fn gemini_text(payload: &Value) -> Result<String> {
    let parts = payload
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("gemini response has no candidate parts"))?;
    let text: String = parts.iter().filter_map(|part| part.get("text")?.as_str()).collect();
    non_empty(text)
}

fn ollama_body(model: &str, request: &CompletionRequest) -> Value {
    json!({
        "model": model,
        "stream": false,
        "format": request.response_schema,
        "messages": [
            { "role": "system", "content": request.system_instruction },
            { "role": "user", "content": request.prompt },
        ],
    })
}

fn ollama_text(payload: &Value) -> Result<String> {
    let text = payload
        .pointer("/message/content")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("ollama response has no message content"))?;
    non_empty(text.to_string())
}

fn non_empty(text: String) -> Result<String> {
    if text.trim().is_empty() {
        return Err(anyhow!("no response text from llm provider"));
    }
    Ok(text)
}
