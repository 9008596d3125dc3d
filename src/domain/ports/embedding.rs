use crate::domain::{errors::DomainError, Embedding};
use async_trait::async_trait;

/// Turns one string into one fixed-length vector.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError>;

    fn dimension(&self) -> usize;
}
