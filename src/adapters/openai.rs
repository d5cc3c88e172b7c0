use super::http::check_status;
use crate::domain::ports::{Embedder, LanguageModel};
use crate::utils::error::{QaError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SERVICE: &str = "OpenAI";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-3.5-turbo-instruct";

#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
    pub embedding_model: String,
    pub completion_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Maximum number of inputs per embeddings request.
    pub embedding_batch_size: usize,
    pub timeout: Duration,
}

impl OpenAiSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            completion_model: DEFAULT_COMPLETION_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 256,
            embedding_batch_size: 512,
            timeout: Duration::from_secs(60),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
}

fn build_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

#[derive(Debug, Clone)]
pub struct OpenAiEmbeddings {
    settings: OpenAiSettings,
    client: Client,
}

impl OpenAiEmbeddings {
    pub fn new(settings: OpenAiSettings) -> Result<Self> {
        let client = build_client(settings.timeout)?;
        Ok(Self { settings, client })
    }

    async fn embed_batch(&self, input: &[String]) -> Result<Vec<Vec<f32>>> {
        tracing::debug!(
            "Embedding {} inputs with {}",
            input.len(),
            self.settings.embedding_model
        );
        let response = self
            .client
            .post(self.settings.endpoint("embeddings"))
            .bearer_auth(&self.settings.api_key)
            .json(&EmbeddingRequest {
                model: &self.settings.embedding_model,
                input,
            })
            .send()
            .await?;

        let mut body: EmbeddingResponse = check_status(SERVICE, response).await?.json().await?;
        if body.data.len() != input.len() {
            return Err(QaError::EmbeddingCountMismatch {
                expected: input.len(),
                actual: body.data.len(),
            });
        }

        body.data.sort_by_key(|d| d.index);
        if let Some((position, d)) = body.data.iter().enumerate().find(|(i, d)| d.index != *i) {
            return Err(QaError::ProcessingError {
                message: format!(
                    "Embeddings response has index {} at position {}",
                    d.index, position
                ),
            });
        }
        Ok(body.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl Embedder for OpenAiEmbeddings {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.settings.embedding_batch_size.max(1)) {
            embeddings.extend(self.embed_batch(batch).await?);
        }
        Ok(embeddings)
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let input = [text.replace('\n', " ")];
        self.embed_batch(&input)
            .await?
            .pop()
            .ok_or_else(|| QaError::ProcessingError {
                message: "Embeddings response was empty".to_string(),
            })
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiCompletion {
    settings: OpenAiSettings,
    client: Client,
}

impl OpenAiCompletion {
    pub fn new(settings: OpenAiSettings) -> Result<Self> {
        let client = build_client(settings.timeout)?;
        Ok(Self { settings, client })
    }
}

#[async_trait]
impl LanguageModel for OpenAiCompletion {
    async fn complete(&self, prompt: &str) -> Result<String> {
        tracing::debug!("Requesting completion from {}", self.settings.completion_model);
        let response = self
            .client
            .post(self.settings.endpoint("completions"))
            .bearer_auth(&self.settings.api_key)
            .json(&CompletionRequest {
                model: &self.settings.completion_model,
                prompt,
                temperature: self.settings.temperature,
                max_tokens: self.settings.max_tokens,
            })
            .send()
            .await?;

        let body: CompletionResponse = check_status(SERVICE, response).await?.json().await?;
        body.choices
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or_else(|| QaError::api(SERVICE, 200, "Completion response had no choices"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let mut settings = OpenAiSettings::new("sk-test");
        settings.base_url = "http://localhost:9000/v1/".to_string();
        assert_eq!(settings.endpoint("embeddings"), "http://localhost:9000/v1/embeddings");
    }

    #[test]
    fn test_defaults() {
        let settings = OpenAiSettings::new("sk-test");
        assert_eq!(settings.embedding_model, "text-embedding-ada-002");
        assert_eq!(settings.max_tokens, 256);
        assert_eq!(settings.embedding_batch_size, 512);
    }
}
