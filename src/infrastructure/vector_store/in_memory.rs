use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::domain::{ports::VectorStore, DomainError, Embedding, SearchResult, VectorIndex};

/// JSON file persistence for [`VectorIndex`].
impl VectorIndex {
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DomainError> {
        let file = File::create(path.as_ref())?;
        serde_json::to_writer(BufWriter::new(file), self)
            .map_err(|e| DomainError::io(format!("failed to write index: {e}")))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let file = File::open(path.as_ref())?;
        let index: Self = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| DomainError::io(format!("failed to read index: {e}")))?;
        index.validate()?;
        Ok(index)
    }
}

impl VectorStore for VectorIndex {
    fn dimension(&self) -> usize {
        VectorIndex::dimension(self)
    }

    fn len(&self) -> usize {
        VectorIndex::len(self)
    }

    fn search(&self, query: &Embedding, top_k: usize) -> Result<Vec<SearchResult>, DomainError> {
        self.similarity_search_by_vector(query, top_k)
    }
}
