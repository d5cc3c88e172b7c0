use crate::domain::model::{
    CreateIndexRequest, Document, IndexDescription, Metric, QueryMatch, QueryRequest, Vector,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait DocumentLoader: Send + Sync {
    fn load(&self) -> impl std::future::Future<Output = Result<Vec<Document>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn index_name(&self) -> &str;
    fn vector_dimension(&self) -> usize;
    fn metric(&self) -> Metric;
    fn cloud(&self) -> &str;
    fn region(&self) -> &str;
    fn ready_timeout(&self) -> Duration;
    fn ready_poll_interval(&self) -> Duration;
    fn chunk_size(&self) -> usize;
    fn chunk_overlap(&self) -> usize;
    fn upsert_batch_size(&self) -> usize;
    fn top_k(&self) -> usize;
}

#[async_trait]
pub trait Embedder: Send + Sync {
    /// One vector per input, in input order.
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn list_indexes(&self) -> Result<Vec<String>>;
    async fn create_index(&self, request: &CreateIndexRequest) -> Result<()>;
    async fn describe_index(&self, name: &str) -> Result<IndexDescription>;
    /// Returns the number of vectors the store acknowledged.
    async fn upsert(&self, index_name: &str, vectors: &[Vector]) -> Result<usize>;
    async fn query(&self, index_name: &str, request: &QueryRequest) -> Result<Vec<QueryMatch>>;
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}
