use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A loaded source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Where the text came from; becomes `txtPath` on every vector.
    pub source: String,
    pub page_content: String,
}

impl Document {
    pub fn new(source: impl Into<String>, page_content: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            page_content: page_content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub from: usize,
    pub to: usize,
}

/// Location of a chunk inside its document, serialized as `{"lines":{"from":..,"to":..}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkLocation {
    pub lines: LineRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub content: String,
    pub loc: ChunkLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub id: String,
    pub values: Vec<f32>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Cosine,
    Euclidean,
    Dotproduct,
}

impl Metric {
    pub const NAMES: [&'static str; 3] = ["cosine", "euclidean", "dotproduct"];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cosine" => Some(Metric::Cosine),
            "euclidean" => Some(Metric::Euclidean),
            "dotproduct" => Some(Metric::Dotproduct),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateIndexRequest {
    pub name: String,
    pub dimension: usize,
    pub metric: Metric,
    pub cloud: String,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexDescription {
    pub name: String,
    pub dimension: Option<usize>,
    pub host: Option<String>,
    pub ready: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub vector: Vec<f32>,
    pub top_k: usize,
    pub include_metadata: bool,
    pub include_values: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QueryMatch {
    pub id: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub values: Vec<f32>,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

impl QueryMatch {
    pub fn page_content(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.get("pageContent"))
            .and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupOutcome {
    Created,
    AlreadyExists,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexReport {
    pub documents: usize,
    pub chunks: usize,
    pub vectors_upserted: usize,
    pub batches: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl IndexReport {
    pub fn start() -> Self {
        let now = Utc::now();
        Self {
            documents: 0,
            chunks: 0,
            vectors_upserted: 0,
            batches: 0,
            started_at: now,
            finished_at: now,
        }
    }

    pub fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self
    }
}
