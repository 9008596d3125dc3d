use crate::domain::{errors::DomainError, Embedding, SearchResult};

pub trait VectorStore: Send + Sync {
    fn dimension(&self) -> usize;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn search(&self, query: &Embedding, top_k: usize) -> Result<Vec<SearchResult>, DomainError>;
}
