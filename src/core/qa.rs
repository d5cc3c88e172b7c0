use crate::domain::model::{QueryMatch, QueryRequest};
use crate::domain::ports::{Embedder, LanguageModel, VectorStore};
use crate::utils::error::Result;

pub const DEFAULT_TOP_K: usize = 10;

const QA_PROMPT: &str = "Use the following pieces of context to answer the question at the end. \
If you don't know the answer, just say that you don't know, don't try to make up an answer.

{context}

Question: {question}
Helpful Answer:";

/// Renders the "stuff" prompt: every retrieved passage goes into one context block.
pub fn render_qa_prompt(context: &str, question: &str) -> String {
    QA_PROMPT
        .replace("{context}", context)
        .replace("{question}", question)
}

/// Joins the `pageContent` of each match in rank order.
pub fn concatenate_page_content(matches: &[QueryMatch]) -> String {
    matches
        .iter()
        .filter_map(QueryMatch::page_content)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Retrieves the `top_k` closest chunks and asks the model. `None` when nothing matched.
pub async fn query_and_ask<V, E, L>(
    store: &V,
    embedder: &E,
    llm: &L,
    index_name: &str,
    question: &str,
    top_k: usize,
) -> Result<Option<String>>
where
    V: VectorStore + ?Sized,
    E: Embedder + ?Sized,
    L: LanguageModel + ?Sized,
{
    let vector = embedder.embed_query(question).await?;

    let matches = store
        .query(
            index_name,
            &QueryRequest {
                vector,
                top_k,
                include_metadata: true,
                include_values: true,
            },
        )
        .await?;

    tracing::info!("Found {} matches...", matches.len());
    tracing::info!("Asking question: {}...", question);

    if matches.is_empty() {
        tracing::info!("Since there are no matches, GPT-3 will not be queried.");
        return Ok(None);
    }

    let context = concatenate_page_content(&matches);
    let prompt = render_qa_prompt(&context, question);
    tracing::debug!("QA prompt is {} characters", prompt.len());

    let answer = llm.complete(&prompt).await?.trim().to_string();
    tracing::info!("Answer: {}", answer);
    Ok(Some(answer))
}
