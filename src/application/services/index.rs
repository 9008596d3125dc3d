use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::instrument;

use crate::domain::{
    ports::{EmbeddingService, TextSplitter},
    ChunkRecord, DomainError, Embedding, Metadata, VectorIndex,
};

/// Splits text, embeds every chunk and builds one index from the results.
pub struct IndexGenerator {
    embedding: Arc<dyn EmbeddingService>,
    splitter: Arc<dyn TextSplitter>,
    concurrency: usize,
}

impl IndexGenerator {
    pub fn new(embedding: Arc<dyn EmbeddingService>, splitter: Arc<dyn TextSplitter>) -> Self {
        Self {
            embedding,
            splitter,
            concurrency: 1,
        }
    }

    /// Number of embedding requests kept in flight. Chunk order in the index
    /// does not depend on it.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Builds an index over `text`.
    ///
    /// Chunk `i` carries `metadata` (if any) plus `chunk_index: i`. Explicit
    /// record ids are not supported; passing one fails before any work is done.
    /// Any embedding failure aborts the whole assembly.
    #[instrument(skip(self, text, metadata), fields(chars = text.len()))]
    pub async fn assemble(
        &self,
        text: &str,
        metadata: Option<&Metadata>,
        record_id: Option<&str>,
    ) -> Result<VectorIndex, DomainError> {
        if let Some(id) = record_id {
            return Err(DomainError::not_implemented(format!(
                "explicit record ids are not supported (got {id:?})"
            )));
        }
        if text.trim().is_empty() {
            return Err(DomainError::validation("cannot index empty text"));
        }

        let chunks = self.splitter.split_text(text)?;
        if chunks.is_empty() {
            return Err(DomainError::validation("text produced no chunks"));
        }
        tracing::debug!(chunks = chunks.len(), "text split");

        let embeddings: Vec<Embedding> = stream::iter(chunks.iter())
            .map(|chunk| self.embedding.embed(chunk))
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let records: Vec<ChunkRecord> = chunks
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(i, (content, embedding))| ChunkRecord::new(content, i, embedding, metadata))
            .collect();

        let index = VectorIndex::from_records(records, None)?;
        tracing::info!(entries = index.entries().len(), "index assembled");
        Ok(index)
    }
}

/// Folds every index into the first one, left to right, and returns it.
///
/// Takes ownership of the inputs, so the result never aliases an index the
/// caller still holds. An empty input is rejected.
pub fn merge_indexes(
    indexes: impl IntoIterator<Item = VectorIndex>,
) -> Result<VectorIndex, DomainError> {
    let mut indexes = indexes.into_iter();
    let mut merged = indexes
        .next()
        .ok_or_else(|| DomainError::validation("cannot merge an empty list of indexes"))?;

    let mut folded = 0;
    for index in indexes {
        merged.merge_from(index)?;
        folded += 1;
    }

    tracing::debug!(folded, entries = merged.entries().len(), "indexes merged");
    Ok(merged)
}
