use crate::config::toml_config::TomlConfig;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "docqa")]
#[command(about = "Index documents into Pinecone and answer questions with OpenAI")]
pub struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, global = true, default_value = "docqa.toml")]
    pub config: String,

    /// Override the configured index name
    #[arg(long, global = true)]
    pub index_name: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log process CPU and memory after each phase")]
    pub monitor: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create the vector index if it does not exist
    Setup,
    /// Load documents from a directory and upsert them into the index
    Index {
        /// Directory to read documents from
        #[arg(short, long)]
        path: Option<String>,
    },
    /// Answer a question from the indexed documents
    Ask {
        question: String,

        /// Number of chunks to retrieve
        #[arg(long)]
        top_k: Option<usize>,
    },
}

impl Cli {
    /// Command-line flags win over the config file. Returns a description of
    /// each applied override so the caller can log them once logging is up.
    pub fn apply_overrides(&self, config: &mut TomlConfig) -> Vec<String> {
        let mut applied = Vec::new();
        if let Some(name) = &self.index_name {
            applied.push(format!("Index name overridden to: {}", name));
            config.index.name = name.clone();
        }
        if self.log_json {
            config.logging.format = "json".to_string();
        }

        match &self.command {
            Command::Index { path: Some(path) } => {
                applied.push(format!("Documents path overridden to: {}", path));
                config.documents.path = path.clone();
            }
            Command::Ask {
                top_k: Some(top_k), ..
            } => {
                applied.push(format!("top_k overridden to: {}", top_k));
                config.query.top_k = *top_k;
            }
            _ => {}
        }
        applied
    }
}
