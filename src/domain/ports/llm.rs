use crate::domain::errors::DomainError;
use async_trait::async_trait;

/// A hosted chat model answering one system instruction plus one user turn.
#[async_trait]
pub trait LlmService: Send + Sync {
    async fn complete_with_system(&self, system: &str, prompt: &str)
        -> Result<String, DomainError>;
}
