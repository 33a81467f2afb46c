pub mod fallback;
pub mod openai_compatible;
pub mod provider;
pub mod tokens;

pub use fallback::FallbackChain;
pub use openai_compatible::{OpenAiCompatibleConfig, OpenAiCompatibleProvider};
pub use provider::{ChatResponse, GenerationConfig, Message, MessageRole, ModelProvider, ToolCall, ToolDefinition};
pub use tokens::count_tokens;
