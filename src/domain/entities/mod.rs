mod chunk;
mod embedding;
mod transcript;
mod vector_index;

pub use chunk::{chunk_metadata, ChunkRecord, Metadata, SearchResult, CHUNK_INDEX_KEY};
pub use embedding::Embedding;
pub use transcript::{Transcript, SEED_LINE};
pub use vector_index::{IndexEntry, VectorIndex};
