use crate::provider::{ChatResponse, GenerationConfig, Message, MessageRole, ModelProvider, ToolCall, ToolDefinition};
use async_trait::async_trait;
use docwright_core::{DocwrightError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub context_window: usize,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for OpenAiCompatibleConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            context_window: 128_000,
            timeout_secs: 120,
            max_retries: 3,
        }
    }
}

/// A chat-completions client against any OpenAI-compatible endpoint
/// (self-hosted inference servers included). One HTTP round trip per call,
/// with exponential-backoff retries on transport/5xx failures.
pub struct OpenAiCompatibleProvider {
    config: OpenAiCompatibleConfig,
    client: Client,
}

impl OpenAiCompatibleProvider {
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| DocwrightError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    async fn request(&self, body: serde_json::Value) -> Result<ChatCompletionResponse> {
        let mut last_error: Option<DocwrightError> = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = Duration::from_secs(2u64.pow(attempt - 1));
                tokio::time::sleep(delay).await;
            }

            let mut builder = self
                .client
                .post(format!("{}/chat/completions", self.config.base_url))
                .json(&body);
            if let Some(key) = &self.config.api_key {
                builder = builder.bearer_auth(key);
            }

            let outcome = tokio::time::timeout(Duration::from_secs(self.config.timeout_secs), builder.send()).await;

            match outcome {
                Err(_) => {
                    last_error = Some(DocwrightError::ModelUnavailable(format!(
                        "{} request timed out after {}s",
                        self.config.model, self.config.timeout_secs
                    )));
                    continue;
                }
                Ok(Err(e)) => {
                    last_error = Some(DocwrightError::ModelUnavailable(format!("transport error: {e}")));
                    continue;
                }
                Ok(Ok(response)) => {
                    let status = response.status();
                    if status.is_server_error() || status.as_u16() == 429 {
                        last_error = Some(DocwrightError::ModelUnavailable(format!(
                            "{} returned retryable status {status}",
                            self.config.model
                        )));
                        continue;
                    }
                    if !status.is_success() {
                        let body_text = response.text().await.unwrap_or_default();
                        return Err(DocwrightError::ModelFatal(format!(
                            "{} returned {status}: {body_text}",
                            self.config.model
                        )));
                    }
                    let text = response
                        .text()
                        .await
                        .map_err(|e| DocwrightError::ModelUnavailable(format!("failed to read response body: {e}")))?;
                    return serde_json::from_str(&text)
                        .map_err(|e| DocwrightError::ModelFatal(format!("malformed response from {}: {e}", self.config.model)));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DocwrightError::ModelUnavailable("all retry attempts exhausted".into())))
    }
}

#[async_trait]
impl ModelProvider for OpenAiCompatibleProvider {
    async fn generate_chat(&self, messages: &[Message], config: &GenerationConfig) -> Result<ChatResponse> {
        self.generate_chat_with_tools(messages, &[], config).await
    }

    async fn generate_chat_with_tools(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        config: &GenerationConfig,
    ) -> Result<ChatResponse> {
        let mut body = json!({
            "model": self.config.model,
            "messages": messages.iter().map(to_wire_message).collect::<Vec<_>>(),
        });
        if let Some(temp) = config.temperature {
            body["temperature"] = json!(temp);
        }
        if let Some(max_tokens) = config.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if !tools.is_empty() {
            body["tools"] = json!(tools
                .iter()
                .map(|t| json!({
                    "type": "function",
                    "function": {
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.parameters,
                    }
                }))
                .collect::<Vec<_>>());
        }

        let response = self.request(body).await?;
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DocwrightError::ModelFatal(format!("{} returned no choices", self.config.model)))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| ToolCall {
                id: tc.id,
                name: tc.function.name,
                arguments: tc.function.arguments,
            })
            .collect();

        Ok(ChatResponse {
            content: choice.message.content.unwrap_or_default(),
            tool_calls,
            total_tokens: response.usage.map(|u| u.total_tokens),
        })
    }

    fn provider_name(&self) -> &str {
        "openai-compatible"
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn context_window(&self) -> usize {
        self.config.context_window
    }
}

fn to_wire_message(message: &Message) -> serde_json::Value {
    let role = match message.role {
        MessageRole::System => "system",
        MessageRole::User => "user",
        MessageRole::Assistant => "assistant",
        MessageRole::Tool => "tool",
    };
    let mut value = json!({ "role": role, "content": message.content });
    if let Some(id) = &message.tool_call_id {
        value["tool_call_id"] = json!(id);
    }
    value
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Debug, Deserialize)]
struct WireToolCall {
    id: String,
    function: WireFunctionCall,
}

#[derive(Debug, Deserialize)]
struct WireFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: u32,
}
