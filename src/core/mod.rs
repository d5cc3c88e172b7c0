pub mod engine;
pub mod indexer;
pub mod qa;
pub mod setup;
pub mod splitter;

#[cfg(test)]
pub(crate) mod mocks;

pub use crate::domain::model::{Document, IndexReport, SetupOutcome};
pub use crate::domain::ports::{ConfigProvider, DocumentLoader, Embedder, LanguageModel, VectorStore};
pub use crate::utils::error::Result;
pub use setup::IndexOptions;
