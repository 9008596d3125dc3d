mod knowledge_base;

pub use knowledge_base::{KnowledgeBaseArgs, KnowledgeBaseError, KnowledgeBaseTool};

use rig::tool::{Tool, ToolDyn};

/// A tool that can be handed to a freshly built agent on every call.
pub trait DialogueTool: Send + Sync {
    fn boxed(&self) -> Box<dyn ToolDyn>;
}

impl<T> DialogueTool for T
where
    T: Tool + Clone + Send + Sync + 'static,
{
    fn boxed(&self) -> Box<dyn ToolDyn> {
        Box::new(self.clone())
    }
}
