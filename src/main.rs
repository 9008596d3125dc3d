use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use debate_index::application::{DialogueAgent, DialogueSimulator, RagService};
use debate_index::domain::{ports::LlmService, VectorIndex};
use debate_index::infrastructure::{
    AnthropicLlm, AppConfig, KnowledgeBaseTool, RigToolAgent, TextEmbedding,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debate=info,debate_index=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let app = AppConfig::from_env()?;
    let config = &app.config;
    if app.prompts.participants.is_empty() {
        anyhow::bail!("no participants configured");
    }

    // Tool-using participants can search a prebuilt index.
    let rag = match std::env::var("DEBATE_INDEX") {
        Ok(path) => {
            let index = VectorIndex::load(&path)?;
            info!(path = %path, entries = index.entries().len(), "knowledge base loaded");
            Some(Arc::new(RagService::new(
                Arc::new(TextEmbedding::from_config(&config.embedding)),
                Arc::new(index),
                config.rag.top_k,
            )))
        }
        Err(_) => None,
    };

    let llm: Arc<dyn LlmService> = Arc::new(AnthropicLlm::from_config(&config.llm));

    let agents = app
        .prompts
        .participants
        .iter()
        .map(|p| {
            let agent = if p.use_tools {
                let mut tool_agent = RigToolAgent::from_config(&config.llm);
                if let Some(rag) = &rag {
                    tool_agent = tool_agent.with_tool(KnowledgeBaseTool::new(
                        rag.clone(),
                        config.rag.top_k,
                        config.tools.knowledge_base.clone(),
                    ));
                }
                info!(name = %p.name, tools = tool_agent.tool_count(), "tool participant ready");
                DialogueAgent::with_tools(&p.name, &p.system, Arc::new(tool_agent))
            } else {
                DialogueAgent::new(&p.name, &p.system, llm.clone())
            };

            match &p.prefix {
                Some(prefix) => agent.with_prefix(prefix),
                None => agent,
            }
        })
        .collect();

    let mut simulator = DialogueSimulator::new(agents);
    simulator.reset();

    if let Some(opening) = &app.prompts.opening {
        simulator.inject(&opening.speaker, &opening.message);
        println!("({}): {}\n", opening.speaker, opening.message);
    }

    for _ in 0..config.dialogue.max_rounds {
        let (name, message) = simulator.step().await?;
        println!("({name}): {message}\n");
    }

    info!(steps = simulator.step_count(), "dialogue finished");
    Ok(())
}
