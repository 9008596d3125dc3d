use std::sync::Arc;
use tracing::instrument;

use crate::domain::{
    ports::{EmbeddingService, VectorStore},
    DomainError, SearchResult,
};

/// Answers text queries against an index by embedding the query first.
pub struct RagService {
    embedding: Arc<dyn EmbeddingService>,
    vector_store: Arc<dyn VectorStore>,
    default_top_k: usize,
}

impl RagService {
    pub fn new(
        embedding: Arc<dyn EmbeddingService>,
        vector_store: Arc<dyn VectorStore>,
        default_top_k: usize,
    ) -> Self {
        Self {
            embedding,
            vector_store,
            default_top_k,
        }
    }

    #[instrument(skip(self))]
    pub async fn retrieve(&self, query: &str) -> Result<Vec<SearchResult>, DomainError> {
        self.retrieve_top_k(query, self.default_top_k).await
    }

    #[instrument(skip(self))]
    pub async fn retrieve_top_k(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let embedding = self.embedding.embed(query).await?;
        let results = self.vector_store.search(&embedding, top_k)?;
        tracing::debug!(hits = results.len(), "retrieved");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Embedding, VectorIndex};
    use async_trait::async_trait;

    struct LengthEmbedding;

    #[async_trait]
    impl EmbeddingService for LengthEmbedding {
        async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
            Ok(Embedding::new(vec![1.0, text.len() as f32]))
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    #[tokio::test]
    async fn test_retrieve_ranks_by_similarity() {
        let index = VectorIndex::from_embeddings(
            vec![
                ("short".to_string(), Embedding::new(vec![1.0, 1.0])),
                ("long".to_string(), Embedding::new(vec![1.0, 20.0])),
            ],
            None,
            None,
        )
        .unwrap();
        let rag = RagService::new(Arc::new(LengthEmbedding), Arc::new(index), 1);

        let results = rag.retrieve("a rather long query text").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].content, "long");

        let results = rag.retrieve_top_k("x", 2).await.unwrap();
        assert_eq!(results[0].content, "short");
        assert_eq!(results.len(), 2);
    }
}
