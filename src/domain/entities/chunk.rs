use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Embedding;

/// Free-form key/value metadata attached to each indexed chunk.
pub type Metadata = serde_json::Map<String, Value>;

pub const CHUNK_INDEX_KEY: &str = "chunk_index";

/// A chunk of source text after embedding, ready to be indexed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub content: String,
    pub chunk_index: usize,
    pub embedding: Embedding,
    pub metadata: Metadata,
}

impl ChunkRecord {
    pub fn new(
        content: impl Into<String>,
        chunk_index: usize,
        embedding: Embedding,
        base: Option<&Metadata>,
    ) -> Self {
        Self {
            content: content.into(),
            chunk_index,
            embedding,
            metadata: chunk_metadata(base, chunk_index),
        }
    }
}

/// Caller metadata with `chunk_index` mixed in. The chunk index wins on a key
/// collision.
pub fn chunk_metadata(base: Option<&Metadata>, chunk_index: usize) -> Metadata {
    let mut metadata = base.cloned().unwrap_or_default();
    metadata.insert(CHUNK_INDEX_KEY.to_string(), Value::from(chunk_index));
    metadata
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub content: String,
    pub metadata: Metadata,
    pub score: f32,
}
