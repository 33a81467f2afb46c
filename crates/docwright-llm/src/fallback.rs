use crate::provider::{ChatResponse, GenerationConfig, Message, ModelProvider, ToolDefinition};
use docwright_core::{DocwrightError, Result};
use std::sync::Arc;

/// Tries providers in order, moving to the next on a retryable
/// (`ModelUnavailable`) failure and giving up immediately on a
/// `ModelFatal` one (spec.md §6/§8: fallback chain of models;
/// `ModelFatal` is surfaced as a run failure, not retried).
pub struct FallbackChain {
    providers: Vec<Arc<dyn ModelProvider>>,
}

impl FallbackChain {
    pub fn new(providers: Vec<Arc<dyn ModelProvider>>) -> Self {
        Self { providers }
    }

    pub async fn generate_chat(&self, messages: &[Message], config: &GenerationConfig) -> Result<ChatResponse> {
        if self.providers.is_empty() {
            return Err(DocwrightError::Configuration("no model providers configured".into()));
        }
        let mut last_error = None;
        for (index, provider) in self.providers.iter().enumerate() {
            match provider.generate_chat(messages, config).await {
                Ok(response) => return Ok(response),
                Err(DocwrightError::ModelFatal(msg)) => {
                    tracing::error!(provider = provider.model_name(), error = %msg, "model call failed fatally");
                    return Err(DocwrightError::ModelFatal(msg));
                }
                Err(other) => {
                    tracing::warn!(provider = provider.model_name(), index, error = %other, "provider unavailable, trying next in chain");
                    last_error = Some(other);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| DocwrightError::ModelUnavailable("fallback chain exhausted".into())))
    }

    pub async fn generate_chat_with_tools(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        config: &GenerationConfig,
    ) -> Result<ChatResponse> {
        if self.providers.is_empty() {
            return Err(DocwrightError::Configuration("no model providers configured".into()));
        }
        let mut last_error = None;
        for (index, provider) in self.providers.iter().enumerate() {
            match provider.generate_chat_with_tools(messages, tools, config).await {
                Ok(response) => return Ok(response),
                Err(DocwrightError::ModelFatal(msg)) => {
                    tracing::error!(provider = provider.model_name(), error = %msg, "model call failed fatally");
                    return Err(DocwrightError::ModelFatal(msg));
                }
                Err(other) => {
                    tracing::warn!(provider = provider.model_name(), index, error = %other, "provider unavailable, trying next in chain");
                    last_error = Some(other);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| DocwrightError::ModelUnavailable("fallback chain exhausted".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FlakyProvider {
        name: &'static str,
        calls: AtomicUsize,
        fail_with: Option<DocwrightError>,
    }

    #[async_trait]
    impl ModelProvider for FlakyProvider {
        async fn generate_chat(&self, _messages: &[Message], _config: &GenerationConfig) -> Result<ChatResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.fail_with {
                Some(DocwrightError::ModelUnavailable(m)) => Err(DocwrightError::ModelUnavailable(m.clone())),
                Some(DocwrightError::ModelFatal(m)) => Err(DocwrightError::ModelFatal(m.clone())),
                _ => Ok(ChatResponse {
                    content: "ok".to_string(),
                    tool_calls: vec![],
                    total_tokens: Some(10),
                }),
            }
        }

        fn provider_name(&self) -> &str {
            self.name
        }

        fn model_name(&self) -> &str {
            self.name
        }

        fn context_window(&self) -> usize {
            8192
        }
    }

    #[tokio::test]
    async fn falls_back_to_next_provider_on_unavailable_error() {
        let primary = Arc::new(FlakyProvider {
            name: "primary",
            calls: AtomicUsize::new(0),
            fail_with: Some(DocwrightError::ModelUnavailable("down".into())),
        });
        let secondary = Arc::new(FlakyProvider {
            name: "secondary",
            calls: AtomicUsize::new(0),
            fail_with: None,
        });
        let chain = FallbackChain::new(vec![primary, secondary]);

        let result = chain
            .generate_chat(&[Message::user("hi")], &GenerationConfig::default())
            .await
            .unwrap();
        assert_eq!(result.content, "ok");
    }

    #[tokio::test]
    async fn stops_immediately_on_fatal_error() {
        let primary = Arc::new(FlakyProvider {
            name: "primary",
            calls: AtomicUsize::new(0),
            fail_with: Some(DocwrightError::ModelFatal("bad request".into())),
        });
        let secondary = Arc::new(FlakyProvider {
            name: "secondary",
            calls: AtomicUsize::new(0),
            fail_with: None,
        });
        let chain = FallbackChain::new(vec![primary, secondary.clone()]);

        let result = chain.generate_chat(&[Message::user("hi")], &GenerationConfig::default()).await;
        assert!(matches!(result, Err(DocwrightError::ModelFatal(_))));
        assert_eq!(secondary.calls.load(Ordering::SeqCst), 0);
    }
}
