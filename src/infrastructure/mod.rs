pub mod agent;
pub mod config;
pub mod embedding;
pub mod llm;
pub mod pdf;
pub mod splitter;
pub mod tools;
pub mod vector_store;

pub use agent::RigToolAgent;
pub use config::{AppConfig, Config, PromptsConfig};
pub use embedding::TextEmbedding;
pub use llm::AnthropicLlm;
pub use pdf::{PdfLoader, PdfLoaderOptions};
pub use splitter::{RecursiveCharacterSplitter, TokenizerLength};
pub use tools::{DialogueTool, KnowledgeBaseTool};
