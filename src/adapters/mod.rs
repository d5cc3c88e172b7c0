// Adapters layer: concrete implementations of the domain ports for external systems.

mod http;
pub mod openai;
pub mod pinecone;
pub mod storage;

pub use openai::{OpenAiCompletion, OpenAiEmbeddings, OpenAiSettings};
pub use pinecone::{PineconeClient, PineconeSettings};
pub use storage::LocalDocumentLoader;
