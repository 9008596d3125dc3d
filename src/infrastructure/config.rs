use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";
pub const DEFAULT_PROMPTS_PATH: &str = "config/prompts.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Runtime settings plus the role prompts of the dialogue participants.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub config: Config,
    pub prompts: PromptsConfig,
}

impl AppConfig {
    pub fn load(
        config_path: impl AsRef<Path>,
        prompts_path: impl AsRef<Path>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            config: read_yaml(config_path.as_ref())?,
            prompts: read_yaml(prompts_path.as_ref())?,
        })
    }

    /// Loads from `APP_CONFIG` / `APP_PROMPTS`, falling back to the files under
    /// `config/`. A missing file yields the built-in defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("APP_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        let prompts_path =
            std::env::var("APP_PROMPTS").unwrap_or_else(|_| DEFAULT_PROMPTS_PATH.into());

        Ok(Self {
            config: read_yaml_or_default(Path::new(&config_path))?,
            prompts: read_yaml_or_default(Path::new(&prompts_path))?,
        })
    }
}

fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&raw).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

fn read_yaml_or_default<T>(path: &Path) -> Result<T, ConfigError>
where
    T: serde::de::DeserializeOwned + Default,
{
    if !path.exists() {
        tracing::warn!(path = %path.display(), "config file not found, using defaults");
        return Ok(T::default());
    }
    read_yaml(path)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub splitter: SplitterConfig,
    pub rag: RagConfig,
    pub tools: ToolsConfig,
    pub dialogue: DialogueConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub max_tokens: u64,
    pub timeout_seconds: u64,
    /// Upper bound on tool-call rounds for one tool agent answer.
    pub max_turns: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "claude-3-5-sonnet-latest".to_string(),
            max_tokens: 1024,
            timeout_seconds: 120,
            max_turns: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub model: String,
    pub dimension: usize,
    /// Embedding requests kept in flight while assembling an index.
    pub concurrency: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            dimension: 1536,
            concurrency: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub separators: Vec<String>,
    pub strip_whitespace: bool,
    /// Measure chunks in tokens instead of characters.
    pub tokenizer: Option<TokenizerConfig>,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: 4096,
            chunk_overlap: 512,
            separators: ["\n\n", "\n", "   ", " ", ""]
                .into_iter()
                .map(String::from)
                .collect(),
            strip_whitespace: true,
            tokenizer: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenizerConfig {
    /// Path to a `tokenizer.json` file.
    pub path: PathBuf,
    #[serde(
        default = "SpecialTokens::none",
        with = "serde_yaml::with::singleton_map"
    )]
    pub allowed_special: SpecialTokens,
    #[serde(
        default = "SpecialTokens::all",
        with = "serde_yaml::with::singleton_map"
    )]
    pub disallowed_special: SpecialTokens,
}

/// Either `all`, `none` or `only: [token, ...]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecialTokens {
    All,
    None,
    Only(Vec<String>),
}

impl SpecialTokens {
    pub fn all() -> Self {
        Self::All
    }

    pub fn none() -> Self {
        Self::None
    }

    pub fn contains(&self, token: &str) -> bool {
        match self {
            Self::All => true,
            Self::None => false,
            Self::Only(tokens) => tokens.iter().any(|t| t == token),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    pub top_k: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self { top_k: 4 }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub knowledge_base: KnowledgeBaseToolConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KnowledgeBaseToolConfig {
    pub name: String,
    pub description: String,
    pub no_results_message: String,
}

impl Default for KnowledgeBaseToolConfig {
    fn default() -> Self {
        Self {
            name: "knowledge_base".to_string(),
            description: "Search the indexed documents for passages relevant to a query."
                .to_string(),
            no_results_message: "No relevant documents found.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DialogueConfig {
    pub max_rounds: usize,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self { max_rounds: 6 }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    pub participants: Vec<ParticipantPrompt>,
    pub opening: Option<OpeningPrompt>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParticipantPrompt {
    pub name: String,
    pub system: String,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub use_tools: bool,
}

/// Message broadcast to every participant before the first turn.
#[derive(Debug, Clone, Deserialize)]
pub struct OpeningPrompt {
    pub speaker: String,
    pub message: String,
}
