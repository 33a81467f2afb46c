use async_trait::async_trait;
use docwright_core::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
            tool_call_id: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            tool_call_id: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            tool_call_id: None,
        }
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Tool,
            content: content.into(),
            tool_call_id: Some(tool_call_id.into()),
        }
    }
}

/// A tool definition offered to the model in a `generate_chat_with_tools`
/// call, shaped like the OpenAI function-calling schema.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// A tool invocation the model asked to make.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    /// Raw JSON-encoded arguments as returned by the provider. Parsing
    /// (including shape repair) happens in `docwright-agent`, not here.
    pub arguments: String,
}

#[derive(Debug, Clone, Default)]
pub struct GenerationConfig {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct ChatResponse {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
    pub total_tokens: Option<u32>,
}

impl ChatResponse {
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// A source of chat completions. `docwright-llm` ships one implementation
/// (`OpenAiCompatibleProvider`) against any OpenAI-compatible endpoint;
/// the trait exists so `FallbackChain` and the agent runtime never depend
/// on transport details.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    async fn generate_chat(&self, messages: &[Message], config: &GenerationConfig) -> Result<ChatResponse>;

    async fn generate_chat_with_tools(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        config: &GenerationConfig,
    ) -> Result<ChatResponse> {
        let _ = tools;
        tracing::warn!(
            provider = self.model_name(),
            "provider does not implement tool calling, falling back to plain chat"
        );
        self.generate_chat(messages, config).await
    }

    fn provider_name(&self) -> &str;
    fn model_name(&self) -> &str;
    fn context_window(&self) -> usize;

    async fn is_available(&self) -> bool {
        true
    }
}
