use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use super::{ChunkRecord, Embedding, Metadata, SearchResult};
use crate::domain::errors::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: String,
    pub content: String,
    pub metadata: Metadata,
    pub embedding: Embedding,
}

/// Exhaustive cosine-similarity index held in memory.
///
/// Every entry shares the index dimension. Entries keep insertion order, which
/// also breaks ties between equal scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndex {
    dimension: usize,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Builds an index in one call from parallel `(text, vector)` pairs,
    /// metadata and optional ids. Ids default to random UUIDs.
    pub fn from_embeddings(
        pairs: Vec<(String, Embedding)>,
        metadatas: Option<Vec<Metadata>>,
        ids: Option<Vec<String>>,
    ) -> Result<Self, DomainError> {
        let dimension = match pairs.first() {
            Some((_, embedding)) => embedding.dimension(),
            None => {
                return Err(DomainError::validation(
                    "cannot build an index from zero embeddings",
                ))
            }
        };

        let count = pairs.len();
        let metadatas = metadatas.unwrap_or_else(|| vec![Metadata::new(); count]);
        if metadatas.len() != count {
            return Err(DomainError::validation(format!(
                "got {} metadata entries for {count} texts",
                metadatas.len()
            )));
        }

        let ids = ids.unwrap_or_else(|| (0..count).map(|_| Uuid::new_v4().to_string()).collect());
        if ids.len() != count {
            return Err(DomainError::validation(format!(
                "got {} ids for {count} texts",
                ids.len()
            )));
        }

        let entries = pairs
            .into_iter()
            .zip(metadatas)
            .zip(ids)
            .map(|(((content, embedding), metadata), id)| IndexEntry {
                id,
                content,
                metadata,
                embedding,
            })
            .collect();

        let index = Self { dimension, entries };
        index.validate()?;
        Ok(index)
    }

    pub fn from_records(
        records: Vec<ChunkRecord>,
        ids: Option<Vec<String>>,
    ) -> Result<Self, DomainError> {
        let (pairs, metadatas): (Vec<_>, Vec<_>) = records
            .into_iter()
            .map(|record| ((record.content, record.embedding), record.metadata))
            .unzip();
        Self::from_embeddings(pairs, Some(metadatas), ids)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Ranks every entry by cosine similarity to `query`, best first.
    pub fn similarity_search_by_vector(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError> {
        if query.dimension() != self.dimension {
            return Err(DomainError::validation(format!(
                "query has dimension {}, index has {}",
                query.dimension(),
                self.dimension
            )));
        }

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i, query.cosine_similarity(&entry.embedding)))
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(top_k)
            .map(|(i, score)| {
                let entry = &self.entries[i];
                SearchResult {
                    id: entry.id.clone(),
                    content: entry.content.clone(),
                    metadata: entry.metadata.clone(),
                    score,
                }
            })
            .collect())
    }

    /// Appends every entry of `other` after the existing ones.
    pub fn merge_from(&mut self, other: VectorIndex) -> Result<(), DomainError> {
        if other.dimension != self.dimension {
            return Err(DomainError::validation(format!(
                "cannot merge an index of dimension {} into one of dimension {}",
                other.dimension, self.dimension
            )));
        }

        let existing: HashSet<&str> = self.entries.iter().map(|e| e.id.as_str()).collect();
        if let Some(dup) = other.entries.iter().find(|e| existing.contains(e.id.as_str())) {
            return Err(DomainError::validation(format!(
                "duplicate id {} while merging indexes",
                dup.id
            )));
        }

        self.entries.extend(other.entries);
        Ok(())
    }

    pub(crate) fn validate(&self) -> Result<(), DomainError> {
        if let Some(entry) = self
            .entries
            .iter()
            .find(|e| e.embedding.dimension() != self.dimension)
        {
            return Err(DomainError::validation(format!(
                "entry {} has dimension {}, expected {}",
                entry.id,
                entry.embedding.dimension(),
                self.dimension
            )));
        }

        let mut seen = HashSet::new();
        if let Some(entry) = self.entries.iter().find(|e| !seen.insert(e.id.as_str())) {
            return Err(DomainError::validation(format!("duplicate id {}", entry.id)));
        }

        Ok(())
    }
}
