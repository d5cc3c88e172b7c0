pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{Cli, Command};
pub use config::toml_config::TomlConfig;

pub use adapters::{
    LocalDocumentLoader, OpenAiCompletion, OpenAiEmbeddings, OpenAiSettings, PineconeClient,
    PineconeSettings,
};
pub use crate::core::engine::QaEngine;
pub use utils::error::{QaError, Result};

/// The engine as wired against the real services.
pub type DefaultEngine = QaEngine<PineconeClient, OpenAiEmbeddings, OpenAiCompletion, TomlConfig>;

impl DefaultEngine {
    /// Builds HTTP clients from a validated config.
    pub fn from_config(config: TomlConfig, monitor: bool) -> Result<Self> {
        let store = PineconeClient::new(config.pinecone_settings())?;
        let embedder = OpenAiEmbeddings::new(config.openai_settings())?;
        let llm = OpenAiCompletion::new(config.openai_settings())?;
        Ok(QaEngine::new_with_monitoring(store, embedder, llm, config, monitor))
    }
}
