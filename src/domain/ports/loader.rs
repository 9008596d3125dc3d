use std::path::Path;

use crate::domain::errors::DomainError;

/// Renders a document file into plain-text pages.
pub trait PageLoader: Send + Sync {
    fn load_pages(&self, path: &Path) -> Result<Vec<String>, DomainError>;
}
