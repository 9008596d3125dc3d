use async_trait::async_trait;
use rig::client::{CompletionClient, ProviderClient};
use rig::completion::Prompt;
use rig::providers::anthropic;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{ports::ToolAgent, DomainError};
use crate::infrastructure::config::LlmConfig;
use crate::infrastructure::tools::DialogueTool;

/// Tool-calling agent backed by Claude through rig.
///
/// A new rig agent is built for every [`ToolAgent::run`] call and dropped
/// afterwards, so nothing said in one call leaks into the next.
pub struct RigToolAgent {
    client: anthropic::Client,
    model: String,
    max_tokens: u64,
    max_turns: usize,
    timeout: Duration,
    tools: Vec<Arc<dyn DialogueTool>>,
}

impl RigToolAgent {
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            client: anthropic::Client::from_env(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            max_turns: config.max_turns,
            timeout: Duration::from_secs(config.timeout_seconds),
            tools: Vec::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::from_config(&LlmConfig::default())
    }

    pub fn with_tool(mut self, tool: impl DialogueTool + 'static) -> Self {
        self.tools.push(Arc::new(tool));
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }
}

#[async_trait]
impl ToolAgent for RigToolAgent {
    async fn run(&self, input: &str) -> Result<String, DomainError> {
        let tools = self.tools.iter().map(|tool| tool.boxed()).collect();

        let agent = self
            .client
            .agent(&self.model)
            .max_tokens(self.max_tokens)
            .tools(tools)
            .build();

        tracing::debug!(tools = self.tools.len(), max_turns = self.max_turns, "running tool agent");

        tokio::time::timeout(self.timeout, agent.prompt(input).multi_turn(self.max_turns))
            .await
            .map_err(|_| DomainError::timeout("Agent execution timed out"))?
            .map_err(|e| DomainError::external(format!("Agent failed: {e}")))
    }
}
