use rig::completion::ToolDefinition;
use rig::tool::Tool;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::application::RagService;
use crate::infrastructure::config::KnowledgeBaseToolConfig;

#[derive(Debug, thiserror::Error)]
#[error("Knowledge base error: {0}")]
pub struct KnowledgeBaseError(pub String);

#[derive(Debug, Deserialize, Serialize)]
pub struct KnowledgeBaseArgs {
    pub query: String,
}

/// Lets an agent search an assembled index.
#[derive(Clone)]
pub struct KnowledgeBaseTool {
    rag: Arc<RagService>,
    top_k: usize,
    config: KnowledgeBaseToolConfig,
}

impl KnowledgeBaseTool {
    pub fn new(rag: Arc<RagService>, top_k: usize, config: KnowledgeBaseToolConfig) -> Self {
        Self { rag, top_k, config }
    }

    pub fn with_defaults(rag: Arc<RagService>) -> Self {
        Self::new(rag, 4, KnowledgeBaseToolConfig::default())
    }

    fn format_results(&self, contents: &[String]) -> String {
        if contents.is_empty() {
            return self.config.no_results_message.clone();
        }

        contents
            .iter()
            .enumerate()
            .map(|(i, content)| format!("[{}] {}", i + 1, content))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Tool for KnowledgeBaseTool {
    const NAME: &'static str = "knowledge_base";

    type Error = KnowledgeBaseError;
    type Args = KnowledgeBaseArgs;
    type Output = String;

    fn name(&self) -> String {
        self.config.name.clone()
    }

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: self.config.name.clone(),
            description: self.config.description.clone(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "What to look up in the documents"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        tracing::debug!(query = %args.query, "knowledge base lookup");

        let results = self
            .rag
            .retrieve_top_k(&args.query, self.top_k)
            .await
            .map_err(|e| KnowledgeBaseError(e.to_string()))?;

        let contents: Vec<String> = results.into_iter().map(|r| r.content).collect();
        Ok(self.format_results(&contents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ports::EmbeddingService, DomainError, Embedding, VectorIndex};
    use async_trait::async_trait;

    struct AxisEmbedding;

    #[async_trait]
    impl EmbeddingService for AxisEmbedding {
        async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
            Ok(if text.contains("cat") {
                Embedding::new(vec![1.0, 0.0])
            } else {
                Embedding::new(vec![0.0, 1.0])
            })
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    fn tool() -> KnowledgeBaseTool {
        let index = VectorIndex::from_embeddings(
            vec![
                ("cats purr".to_string(), Embedding::new(vec![1.0, 0.0])),
                ("dogs bark".to_string(), Embedding::new(vec![0.0, 1.0])),
            ],
            None,
            None,
        )
        .unwrap();
        let rag = Arc::new(RagService::new(
            Arc::new(AxisEmbedding),
            Arc::new(index),
            2,
        ));
        KnowledgeBaseTool::new(rag, 1, KnowledgeBaseToolConfig::default())
    }

    #[tokio::test]
    async fn test_call_returns_best_chunk() {
        let output = tool()
            .call(KnowledgeBaseArgs {
                query: "what does a cat do".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(output, "[1] cats purr");
    }

    #[tokio::test]
    async fn test_definition_uses_config() {
        let definition = tool().definition(String::new()).await;
        assert_eq!(definition.name, "knowledge_base");
        assert_eq!(definition.parameters["required"], json!(["query"]));
    }

    #[test]
    fn test_no_results_message() {
        assert_eq!(tool().format_results(&[]), "No relevant documents found.");
    }
}
