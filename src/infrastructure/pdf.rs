use std::path::Path;

use crate::domain::{ports::PageLoader, DomainError};

/// Loader options passed through to `pdf-extract`.
#[derive(Debug, Clone, Default)]
pub struct PdfLoaderOptions {
    pub password: Option<String>,
}

/// Extracts the text of each page of a PDF file.
#[derive(Debug, Clone, Default)]
pub struct PdfLoader {
    options: PdfLoaderOptions,
}

impl PdfLoader {
    pub fn new(options: PdfLoaderOptions) -> Self {
        Self { options }
    }
}

impl PageLoader for PdfLoader {
    fn load_pages(&self, path: &Path) -> Result<Vec<String>, DomainError> {
        let pages = match &self.options.password {
            Some(password) => pdf_extract::extract_text_by_pages_encrypted(path, password),
            None => pdf_extract::extract_text_by_pages(path),
        }
        .map_err(|e| DomainError::io(format!("failed to load {}: {e}", path.display())))?;

        tracing::debug!(path = %path.display(), pages = pages.len(), "pdf loaded");
        Ok(pages)
    }
}
