//! In-memory port implementations shared by the core unit tests.

use crate::domain::model::{
    CreateIndexRequest, IndexDescription, QueryMatch, QueryRequest, Vector,
};
use crate::domain::ports::{Embedder, LanguageModel, VectorStore};
use crate::utils::error::{QaError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone, Default)]
pub struct MockEmbedder {
    pub document_calls: Arc<Mutex<Vec<Vec<String>>>>,
    pub query_calls: Arc<Mutex<Vec<String>>>,
    /// Drop this many vectors from every `embed_documents` answer.
    pub short_by: usize,
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.document_calls.lock().await.push(texts.to_vec());
        let keep = texts.len().saturating_sub(self.short_by);
        Ok(texts
            .iter()
            .take(keep)
            .map(|t| vec![t.len() as f32, 1.0])
            .collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.query_calls.lock().await.push(text.to_string());
        Ok(vec![text.len() as f32, 1.0])
    }
}

#[derive(Clone, Default)]
pub struct MockVectorStore {
    pub indexes: Arc<Mutex<Vec<String>>>,
    pub created: Arc<Mutex<Vec<CreateIndexRequest>>>,
    pub describe_calls: Arc<Mutex<usize>>,
    /// `describe_index` reports ready once it has been called this many times.
    pub ready_after: usize,
    /// `describe_index` answers not-found for this many calls first.
    pub missing_for: usize,
    pub upserts: Arc<Mutex<Vec<Vec<Vector>>>>,
    pub queries: Arc<Mutex<Vec<QueryRequest>>>,
    pub matches: Vec<QueryMatch>,
}

impl MockVectorStore {
    pub fn with_indexes(names: &[&str]) -> Self {
        Self {
            indexes: Arc::new(Mutex::new(names.iter().map(|n| n.to_string()).collect())),
            ..Self::default()
        }
    }
}

#[async_trait]
impl VectorStore for MockVectorStore {
    async fn list_indexes(&self) -> Result<Vec<String>> {
        Ok(self.indexes.lock().await.clone())
    }

    async fn create_index(&self, request: &CreateIndexRequest) -> Result<()> {
        self.created.lock().await.push(request.clone());
        self.indexes.lock().await.push(request.name.clone());
        Ok(())
    }

    async fn describe_index(&self, name: &str) -> Result<IndexDescription> {
        if !self.indexes.lock().await.iter().any(|n| n == name) {
            return Err(QaError::IndexNotFound {
                name: name.to_string(),
            });
        }
        let mut calls = self.describe_calls.lock().await;
        *calls += 1;
        if *calls <= self.missing_for {
            return Err(QaError::IndexNotFound {
                name: name.to_string(),
            });
        }
        Ok(IndexDescription {
            name: name.to_string(),
            dimension: None,
            host: None,
            ready: *calls >= self.ready_after,
        })
    }

    async fn upsert(&self, _index_name: &str, vectors: &[Vector]) -> Result<usize> {
        self.upserts.lock().await.push(vectors.to_vec());
        Ok(vectors.len())
    }

    async fn query(&self, _index_name: &str, request: &QueryRequest) -> Result<Vec<QueryMatch>> {
        self.queries.lock().await.push(request.clone());
        Ok(self.matches.iter().take(request.top_k).cloned().collect())
    }
}

#[derive(Clone)]
pub struct MockLanguageModel {
    pub prompts: Arc<Mutex<Vec<String>>>,
    pub answer: String,
}

impl MockLanguageModel {
    pub fn answering(answer: &str) -> Self {
        Self {
            prompts: Arc::new(Mutex::new(Vec::new())),
            answer: answer.to_string(),
        }
    }
}

#[async_trait]
impl LanguageModel for MockLanguageModel {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().await.push(prompt.to_string());
        Ok(self.answer.clone())
    }
}

pub fn page_match(id: &str, content: &str) -> QueryMatch {
    let mut metadata = serde_json::Map::new();
    metadata.insert("pageContent".to_string(), content.into());
    QueryMatch {
        id: id.to_string(),
        score: 0.9,
        values: vec![],
        metadata: Some(metadata),
    }
}
