use crate::domain::errors::DomainError;

/// Splits text into ordered, possibly overlapping chunks.
///
/// Must be deterministic for a fixed configuration and input.
pub trait TextSplitter: Send + Sync {
    fn split_text(&self, text: &str) -> Result<Vec<String>, DomainError>;
}
