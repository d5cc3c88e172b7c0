use crate::core::splitter::TextChunker;
use crate::domain::model::{Chunk, Document, IndexReport, Vector};
use crate::domain::ports::{Embedder, VectorStore};
use crate::utils::error::{QaError, Result};
use serde_json::{Map, Value};

pub const DEFAULT_UPSERT_BATCH_SIZE: usize = 100;

/// Splits, embeds and upserts every document into `index_name`.
///
/// Batches are flushed when full and after the last chunk of each document,
/// so a batch never mixes vectors from two documents.
pub async fn update_index<V, E>(
    store: &V,
    embedder: &E,
    chunker: &TextChunker,
    index_name: &str,
    docs: &[Document],
    batch_size: usize,
) -> Result<IndexReport>
where
    V: VectorStore + ?Sized,
    E: Embedder + ?Sized,
{
    let batch_size = batch_size.max(1);
    let mut report = IndexReport::start();
    tracing::info!("Pinecone index retrieved: {}", index_name);

    for doc in docs {
        let txt_path = doc.source.as_str();
        let chunks = chunker.split(&doc.page_content);
        report.documents += 1;

        if chunks.is_empty() {
            tracing::debug!("{} produced no chunks, skipping", txt_path);
            continue;
        }

        let inputs: Vec<String> = chunks.iter().map(|c| c.content.replace('\n', " ")).collect();
        let embeddings = embedder.embed_documents(&inputs).await?;
        if embeddings.len() != chunks.len() {
            return Err(QaError::EmbeddingCountMismatch {
                expected: chunks.len(),
                actual: embeddings.len(),
            });
        }
        tracing::info!("Finished embedding documents");
        tracing::info!(
            "Creating {} vectors array with id, values, and metadata...",
            chunks.len()
        );

        let mut batch = Vec::with_capacity(batch_size.min(chunks.len()));
        let last = chunks.len() - 1;

        for (idx, (chunk, values)) in chunks.iter().zip(embeddings).enumerate() {
            batch.push(build_vector(txt_path, idx, chunk, values)?);

            if batch.len() == batch_size || idx == last {
                let upserted = store.upsert(index_name, &batch).await?;
                tracing::debug!("Upserted {} vectors from {}", upserted, txt_path);
                report.vectors_upserted += upserted;
                report.batches += 1;
                batch.clear();
            }
        }

        report.chunks += chunks.len();
    }

    Ok(report.finish())
}

fn build_vector(txt_path: &str, idx: usize, chunk: &Chunk, values: Vec<f32>) -> Result<Vector> {
    let mut metadata = Map::new();
    metadata.insert(
        "loc".to_string(),
        Value::String(serde_json::to_string(&chunk.loc)?),
    );
    metadata.insert(
        "pageContent".to_string(),
        Value::String(chunk.content.clone()),
    );
    metadata.insert("txtPath".to_string(), Value::String(txt_path.to_string()));

    Ok(Vector {
        id: format!("{}_{}", txt_path, idx),
        values,
        metadata,
    })
}
