mod embedding;
mod llm;
mod loader;
mod splitter;
mod tool_agent;
mod vector_store;

pub use embedding::EmbeddingService;
pub use llm::LlmService;
pub use loader::PageLoader;
pub use splitter::TextSplitter;
pub use tool_agent::ToolAgent;
pub use vector_store::VectorStore;
