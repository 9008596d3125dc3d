use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use debate_index::application::{merge_indexes, IndexGenerator, PdfIndexGenerator};
use debate_index::domain::{Metadata, VectorIndex};
use debate_index::infrastructure::{AppConfig, PdfLoader, RecursiveCharacterSplitter, TextEmbedding};

const USAGE: &str = "usage: indexer <output.json> <input>...";

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

fn source_metadata(path: &Path) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("source".to_string(), json!(path.display().to_string()));
    metadata
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "indexer=info,debate_index=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let mut args = std::env::args().skip(1).map(PathBuf::from);
    let output = args.next().ok_or_else(|| anyhow::anyhow!(USAGE))?;
    let inputs: Vec<PathBuf> = args.collect();
    if inputs.is_empty() {
        anyhow::bail!(USAGE);
    }

    let config = AppConfig::from_env()?.config;

    let splitter = RecursiveCharacterSplitter::from_config(&config.splitter)?;
    let embedding = TextEmbedding::from_config(&config.embedding);
    let generator = Arc::new(
        IndexGenerator::new(Arc::new(embedding), Arc::new(splitter))
            .with_concurrency(config.embedding.concurrency),
    );
    let pdf = PdfIndexGenerator::new(generator.clone(), Arc::new(PdfLoader::default()));

    let mut indexes: Vec<VectorIndex> = Vec::with_capacity(inputs.len());
    for input in &inputs {
        let metadata = source_metadata(input);
        let index = if is_pdf(input) {
            pdf.run(input, Some(&metadata), None).await?
        } else {
            let text = std::fs::read_to_string(input)?;
            generator.assemble(&text, Some(&metadata), None).await?
        };
        info!(input = %input.display(), entries = index.entries().len(), "input indexed");
        indexes.push(index);
    }

    let merged = merge_indexes(indexes)?;
    merged.save(&output)?;
    info!(
        output = %output.display(),
        entries = merged.entries().len(),
        "index written"
    );

    Ok(())
}
