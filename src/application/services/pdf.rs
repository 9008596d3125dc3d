use std::path::Path;
use std::sync::Arc;
use tracing::instrument;

use super::IndexGenerator;
use crate::domain::{ports::PageLoader, DomainError, Metadata, VectorIndex};

pub const DEFAULT_PAGE_SEPARATOR: &str = "\n";

/// Indexes a paged document: pages are joined into one text and handed to an
/// [`IndexGenerator`].
pub struct PdfIndexGenerator {
    generator: Arc<IndexGenerator>,
    loader: Arc<dyn PageLoader>,
    separator: String,
}

impl PdfIndexGenerator {
    pub fn new(generator: Arc<IndexGenerator>, loader: Arc<dyn PageLoader>) -> Self {
        Self {
            generator,
            loader,
            separator: DEFAULT_PAGE_SEPARATOR.to_string(),
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn load_text(&self, path: &Path) -> Result<String, DomainError> {
        Ok(self.loader.load_pages(path)?.join(&self.separator))
    }

    #[instrument(skip(self, metadata), fields(path = %path.display()))]
    pub async fn run(
        &self,
        path: &Path,
        metadata: Option<&Metadata>,
        record_id: Option<&str>,
    ) -> Result<VectorIndex, DomainError> {
        let text = self.load_text(path)?;
        self.generator.assemble(&text, metadata, record_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ports::EmbeddingService, Embedding};
    use crate::infrastructure::splitter::RecursiveCharacterSplitter;
    use async_trait::async_trait;
    use serde_json::json;

    struct StaticPages(Vec<&'static str>);

    impl PageLoader for StaticPages {
        fn load_pages(&self, _path: &Path) -> Result<Vec<String>, DomainError> {
            Ok(self.0.iter().map(|p| p.to_string()).collect())
        }
    }

    struct BrokenLoader;

    impl PageLoader for BrokenLoader {
        fn load_pages(&self, path: &Path) -> Result<Vec<String>, DomainError> {
            Err(DomainError::io(format!("cannot read {}", path.display())))
        }
    }

    struct UnitEmbedding;

    #[async_trait]
    impl EmbeddingService for UnitEmbedding {
        async fn embed(&self, _text: &str) -> Result<Embedding, DomainError> {
            Ok(Embedding::new(vec![1.0, 0.0]))
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    fn generator() -> Arc<IndexGenerator> {
        Arc::new(IndexGenerator::new(
            Arc::new(UnitEmbedding),
            Arc::new(RecursiveCharacterSplitter::new(1000, 0).unwrap()),
        ))
    }

    #[test]
    fn test_pages_joined_with_separator() {
        let pdf = PdfIndexGenerator::new(generator(), Arc::new(StaticPages(vec!["one", "two"])))
            .with_separator("\n---\n");

        assert_eq!(pdf.load_text(Path::new("doc.pdf")).unwrap(), "one\n---\ntwo");
    }

    #[tokio::test]
    async fn test_run_assembles_index() {
        let pdf = PdfIndexGenerator::new(
            generator(),
            Arc::new(StaticPages(vec!["Page one text.", "Page two text."])),
        );
        let metadata = json!({ "source": "report.pdf" }).as_object().cloned().unwrap();

        let index = pdf
            .run(Path::new("report.pdf"), Some(&metadata), None)
            .await
            .unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(index.entries()[0].content, "Page one text.\nPage two text.");
        assert_eq!(index.entries()[0].metadata["source"], json!("report.pdf"));
    }

    #[tokio::test]
    async fn test_unreadable_file() {
        let pdf = PdfIndexGenerator::new(generator(), Arc::new(BrokenLoader));
        assert!(matches!(
            pdf.run(Path::new("missing.pdf"), None, None).await,
            Err(DomainError::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_record_id_rejected() {
        let pdf = PdfIndexGenerator::new(generator(), Arc::new(StaticPages(vec!["text"])));
        assert!(matches!(
            pdf.run(Path::new("doc.pdf"), None, Some("id-1")).await,
            Err(DomainError::NotImplemented(_))
        ));
    }
}
