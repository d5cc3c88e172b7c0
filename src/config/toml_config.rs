use crate::adapters::{openai, pinecone, OpenAiSettings, PineconeSettings};
use crate::core::{indexer, qa, splitter, ConfigProvider};
use crate::domain::model::Metric;
use crate::utils::error::{QaError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub openai: OpenAiConfig,
    pub pinecone: PineconeConfig,
    pub index: IndexConfig,
    pub documents: DocumentsConfig,
    pub chunking: ChunkingConfig,
    pub query: QueryConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub embedding_model: String,
    pub completion_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub embedding_batch_size: usize,
    pub timeout_seconds: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            base_url: openai::DEFAULT_BASE_URL.to_string(),
            embedding_model: openai::DEFAULT_EMBEDDING_MODEL.to_string(),
            completion_model: openai::DEFAULT_COMPLETION_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 256,
            embedding_batch_size: 512,
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PineconeConfig {
    pub api_key: Option<String>,
    pub control_url: String,
    pub api_version: String,
    pub index_host: Option<String>,
    pub namespace: String,
    pub cloud: String,
    pub region: String,
    pub timeout_seconds: u64,
}

impl Default for PineconeConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("PINECONE_API_KEY").ok(),
            control_url: pinecone::DEFAULT_CONTROL_URL.to_string(),
            api_version: pinecone::DEFAULT_API_VERSION.to_string(),
            index_host: None,
            namespace: String::new(),
            cloud: "aws".to_string(),
            region: "us-east-1".to_string(),
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub name: String,
    pub dimension: usize,
    pub metric: String,
    pub ready_timeout_seconds: u64,
    pub poll_interval_ms: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            name: "docqa-index".to_string(),
            dimension: 1536,
            metric: "cosine".to_string(),
            ready_timeout_seconds: 80,
            poll_interval_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentsConfig {
    pub path: String,
    pub extensions: Vec<String>,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            path: "./documents".to_string(),
            extensions: vec!["txt".to_string(), "md".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub upsert_batch_size: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: splitter::DEFAULT_CHUNK_SIZE,
            chunk_overlap: splitter::DEFAULT_CHUNK_OVERLAP,
            upsert_batch_size: indexer::DEFAULT_UPSERT_BATCH_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub top_k: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            top_k: qa::DEFAULT_TOP_K,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `compact` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: "compact".to_string(),
        }
    }
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid pattern"))
}

impl TomlConfig {
    /// Loads and parses a TOML file, substituting `${VAR}` references first.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Reads `path` when it exists, otherwise falls back to defaults and env vars.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(
                "No config at {}, using defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| QaError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Unset variables are left as `${NAME}` so validation can name them.
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_required_secret("openai.api_key", &self.openai.api_key)?;
        validation::validate_url("openai.base_url", &self.openai.base_url)?;
        validation::validate_non_empty_string("openai.embedding_model", &self.openai.embedding_model)?;
        validation::validate_non_empty_string("openai.completion_model", &self.openai.completion_model)?;
        validation::validate_range("openai.temperature", self.openai.temperature, 0.0, 2.0)?;
        validation::validate_positive_number(
            "openai.embedding_batch_size",
            self.openai.embedding_batch_size,
            1,
        )?;

        validation::validate_required_secret("pinecone.api_key", &self.pinecone.api_key)?;
        validation::validate_url("pinecone.control_url", &self.pinecone.control_url)?;
        validation::validate_non_empty_string("pinecone.cloud", &self.pinecone.cloud)?;
        validation::validate_non_empty_string("pinecone.region", &self.pinecone.region)?;

        validation::validate_non_empty_string("index.name", &self.index.name)?;
        validation::validate_positive_number("index.dimension", self.index.dimension, 1)?;
        validation::validate_one_of("index.metric", &self.index.metric, &Metric::NAMES)?;

        validation::validate_path("documents.path", &self.documents.path)?;
        validation::validate_extensions("documents.extensions", &self.documents.extensions)?;

        validation::validate_positive_number("chunking.chunk_size", self.chunking.chunk_size, 1)?;
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(QaError::InvalidConfigValueError {
                field: "chunking.chunk_overlap".to_string(),
                value: self.chunking.chunk_overlap.to_string(),
                reason: format!(
                    "Overlap must be smaller than chunk_size ({})",
                    self.chunking.chunk_size
                ),
            });
        }
        validation::validate_positive_number(
            "chunking.upsert_batch_size",
            self.chunking.upsert_batch_size,
            1,
        )?;

        validation::validate_range("query.top_k", self.query.top_k, 1, 10_000)?;
        validation::validate_one_of("logging.format", &self.logging.format, &["compact", "json"])?;

        Ok(())
    }

    /// Assumes [`Validate::validate`] has passed.
    pub fn openai_settings(&self) -> OpenAiSettings {
        OpenAiSettings {
            api_key: self.openai.api_key.clone().unwrap_or_default(),
            base_url: self.openai.base_url.clone(),
            embedding_model: self.openai.embedding_model.clone(),
            completion_model: self.openai.completion_model.clone(),
            temperature: self.openai.temperature,
            max_tokens: self.openai.max_tokens,
            embedding_batch_size: self.openai.embedding_batch_size,
            timeout: Duration::from_secs(self.openai.timeout_seconds),
        }
    }

    pub fn pinecone_settings(&self) -> PineconeSettings {
        PineconeSettings {
            api_key: self.pinecone.api_key.clone().unwrap_or_default(),
            control_url: self.pinecone.control_url.clone(),
            api_version: self.pinecone.api_version.clone(),
            index_host: self.pinecone.index_host.clone().filter(|h| !h.is_empty()),
            namespace: self.pinecone.namespace.clone(),
            timeout: Duration::from_secs(self.pinecone.timeout_seconds),
        }
    }

    pub fn json_logging(&self) -> bool {
        self.logging.format == "json"
    }
}

impl ConfigProvider for TomlConfig {
    fn index_name(&self) -> &str {
        &self.index.name
    }

    fn vector_dimension(&self) -> usize {
        self.index.dimension
    }

    fn metric(&self) -> Metric {
        Metric::parse(&self.index.metric).unwrap_or(Metric::Cosine)
    }

    fn cloud(&self) -> &str {
        &self.pinecone.cloud
    }

    fn region(&self) -> &str {
        &self.pinecone.region
    }

    fn ready_timeout(&self) -> Duration {
        Duration::from_secs(self.index.ready_timeout_seconds)
    }

    fn ready_poll_interval(&self) -> Duration {
        Duration::from_millis(self.index.poll_interval_ms)
    }

    fn chunk_size(&self) -> usize {
        self.chunking.chunk_size
    }

    fn chunk_overlap(&self) -> usize {
        self.chunking.chunk_overlap
    }

    fn upsert_batch_size(&self) -> usize {
        self.chunking.upsert_batch_size
    }

    fn top_k(&self) -> usize {
        self.query.top_k
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
