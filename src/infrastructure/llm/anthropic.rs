use async_trait::async_trait;
use rig::client::{CompletionClient, ProviderClient};
use rig::completion::Prompt;
use rig::providers::anthropic;
use std::time::Duration;

use crate::domain::{ports::LlmService, DomainError};
use crate::infrastructure::config::LlmConfig;

/// Claude chat completions through rig. Reads `ANTHROPIC_API_KEY` from the
/// environment.
pub struct AnthropicLlm {
    client: anthropic::Client,
    model: String,
    max_tokens: u64,
    timeout: Duration,
}

impl AnthropicLlm {
    pub fn new(model: impl Into<String>) -> Self {
        Self::from_config(&LlmConfig::default()).with_model(model)
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            client: anthropic::Client::from_env(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl LlmService for AnthropicLlm {
    async fn complete_with_system(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<String, DomainError> {
        let agent = self
            .client
            .agent(&self.model)
            .preamble(system)
            .max_tokens(self.max_tokens)
            .build();

        tokio::time::timeout(self.timeout, agent.prompt(prompt))
            .await
            .map_err(|_| DomainError::timeout("Completion timed out"))?
            .map_err(|e| DomainError::external(e.to_string()))
    }
}
