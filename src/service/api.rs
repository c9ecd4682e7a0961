//! Anthropic Messages API 連携

use async_trait::async_trait;
use job_match_common::{ServiceError, TextService};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 2048;

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

impl MessagesResponse {
    fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

pub struct ApiService {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl ApiService {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Unavailable(format!("HTTPクライアント構築エラー: {}", e)))?;
        Ok(Self {
            client,
            endpoint: ANTHROPIC_API_URL.to_string(),
            api_key,
            model,
            timeout,
        })
    }

    /// 送信先を変える（互換APIやプロキシ）
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl TextService for ApiService {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ServiceError> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let started = Instant::now();
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ServiceError::Timeout(self.timeout.as_secs())
                } else {
                    ServiceError::Unavailable(format!("API呼び出しエラー: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ServiceError::Failed(format!(
                "API failed with status {}: {}",
                status, text
            )));
        }

        let payload: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Failed(format!("APIレスポンスのパースに失敗: {}", e)))?;

        debug!(
            model = %self.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "API応答"
        );

        match payload.text().map(str::trim) {
            Some(text) if !text.is_empty() => Ok(text.to_string()),
            _ => Err(ServiceError::EmptyResponse),
        }
    }

    fn name(&self) -> &str {
        "api"
    }
}
