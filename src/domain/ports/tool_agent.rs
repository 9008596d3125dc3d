use crate::domain::errors::DomainError;
use async_trait::async_trait;

/// A reasoning loop that may call tools before producing its final answer.
///
/// Implementations keep no memory between calls: the answer depends only on
/// `input` and the tools they were built with.
#[async_trait]
pub trait ToolAgent: Send + Sync {
    async fn run(&self, input: &str) -> Result<String, DomainError>;
}
