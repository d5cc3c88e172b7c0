use crate::core::indexer::update_index;
use crate::core::qa::query_and_ask;
use crate::core::setup::{create_index, IndexOptions};
use crate::core::splitter::TextChunker;
use crate::domain::model::{Document, IndexReport, SetupOutcome};
use crate::domain::ports::{ConfigProvider, DocumentLoader, Embedder, LanguageModel, VectorStore};
use crate::utils::error::Result;
use crate::utils::monitor::PhaseMonitor;

/// Wires the vector store, embedder and language model to the three operations.
pub struct QaEngine<V, E, L, C> {
    store: V,
    embedder: E,
    llm: L,
    config: C,
    monitor: PhaseMonitor,
}

impl<V, E, L, C> QaEngine<V, E, L, C>
where
    V: VectorStore,
    E: Embedder,
    L: LanguageModel,
    C: ConfigProvider,
{
    pub fn new(store: V, embedder: E, llm: L, config: C) -> Self {
        Self::new_with_monitoring(store, embedder, llm, config, false)
    }

    pub fn new_with_monitoring(store: V, embedder: E, llm: L, config: C, monitor: bool) -> Self {
        let monitor = PhaseMonitor::new(monitor);
        if monitor.is_enabled() {
            tracing::info!("🔍 System monitoring enabled");
        }
        Self {
            store,
            embedder,
            llm,
            config,
            monitor,
        }
    }

    pub async fn setup(&self) -> Result<SetupOutcome> {
        let outcome = create_index(
            &self.store,
            self.config.index_name(),
            self.config.vector_dimension(),
            &IndexOptions::from_config(&self.config),
        )
        .await?;
        self.monitor.log_phase("Setup");
        Ok(outcome)
    }

    pub async fn index(&self, docs: &[Document]) -> Result<IndexReport> {
        let chunker = TextChunker::new(self.config.chunk_size(), self.config.chunk_overlap())?;
        let report = update_index(
            &self.store,
            &self.embedder,
            &chunker,
            self.config.index_name(),
            docs,
            self.config.upsert_batch_size(),
        )
        .await?;

        tracing::info!(
            "Indexed {} documents: {} chunks, {} vectors in {} batches",
            report.documents,
            report.chunks,
            report.vectors_upserted,
            report.batches
        );
        self.monitor.log_phase("Index");
        Ok(report)
    }

    pub async fn index_from<D: DocumentLoader>(&self, loader: &D) -> Result<IndexReport> {
        let docs = loader.load().await?;
        tracing::info!("Loaded {} documents", docs.len());
        self.monitor.log_phase("Load");
        self.index(&docs).await
    }

    pub async fn ask(&self, question: &str) -> Result<Option<String>> {
        let answer = query_and_ask(
            &self.store,
            &self.embedder,
            &self.llm,
            self.config.index_name(),
            question,
            self.config.top_k(),
        )
        .await?;
        self.monitor.log_phase("Query");
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mocks::{page_match, MockEmbedder, MockLanguageModel, MockVectorStore};
    use crate::domain::model::Metric;
    use std::time::Duration;

    struct TestConfig {
        top_k: usize,
    }

    impl ConfigProvider for TestConfig {
        fn index_name(&self) -> &str {
            "engine-test"
        }

        fn vector_dimension(&self) -> usize {
            2
        }

        fn metric(&self) -> Metric {
            Metric::Euclidean
        }

        fn cloud(&self) -> &str {
            "gcp"
        }

        fn region(&self) -> &str {
            "us-central1"
        }

        fn ready_timeout(&self) -> Duration {
            Duration::from_millis(10)
        }

        fn ready_poll_interval(&self) -> Duration {
            Duration::from_millis(1)
        }

        fn chunk_size(&self) -> usize {
            1000
        }

        fn chunk_overlap(&self) -> usize {
            200
        }

        fn upsert_batch_size(&self) -> usize {
            100
        }

        fn top_k(&self) -> usize {
            self.top_k
        }
    }

    struct StaticLoader(Vec<Document>);

    impl DocumentLoader for StaticLoader {
        async fn load(&self) -> Result<Vec<Document>> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_setup_uses_configured_index() {
        let store = MockVectorStore::default();
        let engine = QaEngine::new(
            store.clone(),
            MockEmbedder::default(),
            MockLanguageModel::answering("-"),
            TestConfig { top_k: 10 },
        );

        assert_eq!(engine.setup().await.unwrap(), SetupOutcome::Created);
        assert_eq!(engine.setup().await.unwrap(), SetupOutcome::AlreadyExists);

        let created = store.created.lock().await;
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].name, "engine-test");
        assert_eq!(created[0].metric, Metric::Euclidean);
        assert_eq!(created[0].region, "us-central1");
    }

    #[tokio::test]
    async fn test_index_from_loader_then_ask() {
        let store = MockVectorStore {
            matches: vec![page_match("notes.txt_0", "The launch is on Friday.")],
            ..MockVectorStore::default()
        };
        let llm = MockLanguageModel::answering("Friday");
        let engine = QaEngine::new(
            store.clone(),
            MockEmbedder::default(),
            llm.clone(),
            TestConfig { top_k: 3 },
        );

        let loader = StaticLoader(vec![Document::new("notes.txt", "The launch is on Friday.")]);
        let report = engine.index_from(&loader).await.unwrap();
        assert_eq!(report.vectors_upserted, 1);

        let answer = engine.ask("When is the launch?").await.unwrap();
        assert_eq!(answer.as_deref(), Some("Friday"));
        assert_eq!(store.queries.lock().await[0].top_k, 3);
    }

    #[tokio::test]
    async fn test_monitored_engine_runs_phases() {
        let store = MockVectorStore::default();
        let engine = QaEngine::new_with_monitoring(
            store.clone(),
            MockEmbedder::default(),
            MockLanguageModel::answering("-"),
            TestConfig { top_k: 1 },
            true,
        );

        assert_eq!(engine.setup().await.unwrap(), SetupOutcome::Created);
        let report = engine
            .index(&[Document::new("a.txt", "Monitoring stays out of the way.")])
            .await
            .unwrap();
        assert_eq!(report.vectors_upserted, 1);
        assert_eq!(store.created.lock().await.len(), 1);
    }
}
