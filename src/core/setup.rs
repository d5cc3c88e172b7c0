use crate::domain::model::{CreateIndexRequest, Metric, SetupOutcome};
use crate::domain::ports::{ConfigProvider, VectorStore};
use crate::utils::error::{QaError, Result};
use std::time::Duration;
use tokio::time::{sleep, Instant};

#[derive(Debug, Clone)]
pub struct IndexOptions {
    pub metric: Metric,
    pub cloud: String,
    pub region: String,
    /// Upper bound on the wait after creation.
    pub ready_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            metric: Metric::Cosine,
            cloud: "aws".to_string(),
            region: "us-east-1".to_string(),
            ready_timeout: Duration::from_secs(80),
            poll_interval: Duration::from_secs(5),
        }
    }
}

impl IndexOptions {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            metric: config.metric(),
            cloud: config.cloud().to_string(),
            region: config.region().to_string(),
            ready_timeout: config.ready_timeout(),
            poll_interval: config.ready_poll_interval(),
        }
    }
}

/// Ensures `index_name` exists, creating it when the store does not list it.
pub async fn create_index<V: VectorStore + ?Sized>(
    store: &V,
    index_name: &str,
    vector_dimension: usize,
    options: &IndexOptions,
) -> Result<SetupOutcome> {
    tracing::info!("Checking \"{}\"...", index_name);
    let existing = store.list_indexes().await?;

    if existing.iter().any(|name| name == index_name) {
        tracing::info!("\"{}\" already exists", index_name);
        return Ok(SetupOutcome::AlreadyExists);
    }

    tracing::info!("Creating \"{}\"...", index_name);
    store
        .create_index(&CreateIndexRequest {
            name: index_name.to_string(),
            dimension: vector_dimension,
            metric: options.metric,
            cloud: options.cloud.clone(),
            region: options.region.clone(),
        })
        .await?;
    tracing::info!("Index creation initiated. Please wait...");

    wait_until_ready(store, index_name, options).await?;
    Ok(SetupOutcome::Created)
}

async fn wait_until_ready<V: VectorStore + ?Sized>(
    store: &V,
    index_name: &str,
    options: &IndexOptions,
) -> Result<()> {
    let deadline = Instant::now() + options.ready_timeout;

    loop {
        match store.describe_index(index_name).await {
            Ok(description) if description.ready => {
                tracing::info!("\"{}\" is ready", index_name);
                return Ok(());
            }
            Ok(_) => tracing::debug!("\"{}\" still initializing", index_name),
            // A freshly created index can be briefly invisible or flaky
            Err(e) if is_transient(&e) => {
                tracing::debug!("\"{}\" not describable yet: {}", index_name, e)
            }
            Err(e) => return Err(e),
        }

        let now = Instant::now();
        if now >= deadline {
            tracing::warn!(
                "\"{}\" not ready after {:?}, continuing anyway",
                index_name,
                options.ready_timeout
            );
            return Ok(());
        }

        sleep(options.poll_interval.min(deadline - now)).await;
    }
}

fn is_transient(error: &QaError) -> bool {
    match error {
        QaError::IndexNotFound { .. } => true,
        QaError::ApiError { status, .. } => *status >= 500,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mocks::MockVectorStore;

    fn quick_options() -> IndexOptions {
        IndexOptions {
            ready_timeout: Duration::from_millis(50),
            poll_interval: Duration::from_millis(5),
            ..IndexOptions::default()
        }
    }

    #[tokio::test]
    async fn test_existing_index_is_left_alone() {
        let store = MockVectorStore::with_indexes(&["other", "docs"]);

        let outcome = create_index(&store, "docs", 1536, &quick_options())
            .await
            .unwrap();

        assert_eq!(outcome, SetupOutcome::AlreadyExists);
        assert!(store.created.lock().await.is_empty());
        assert_eq!(*store.describe_calls.lock().await, 0);
    }

    #[tokio::test]
    async fn test_missing_index_is_created_with_cosine_metric() {
        let store = MockVectorStore::with_indexes(&["other"]);

        let outcome = create_index(&store, "docs", 1536, &quick_options())
            .await
            .unwrap();

        assert_eq!(outcome, SetupOutcome::Created);
        let created = store.created.lock().await;
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].name, "docs");
        assert_eq!(created[0].dimension, 1536);
        assert_eq!(created[0].metric, Metric::Cosine);
        assert_eq!(created[0].cloud, "aws");
    }

    #[tokio::test]
    async fn test_waits_until_index_reports_ready() {
        let store = MockVectorStore {
            ready_after: 3,
            ..MockVectorStore::default()
        };
        let options = IndexOptions {
            ready_timeout: Duration::from_secs(5),
            ..quick_options()
        };

        create_index(&store, "docs", 8, &options).await.unwrap();

        assert_eq!(*store.describe_calls.lock().await, 3);
    }

    #[tokio::test]
    async fn test_gives_up_waiting_after_timeout() {
        let store = MockVectorStore {
            ready_after: usize::MAX,
            ..MockVectorStore::default()
        };

        let outcome = create_index(&store, "docs", 8, &quick_options()).await.unwrap();

        assert_eq!(outcome, SetupOutcome::Created);
        assert!(*store.describe_calls.lock().await >= 2);
    }

    #[tokio::test]
    async fn test_not_found_during_wait_keeps_polling() {
        let store = MockVectorStore {
            missing_for: 2,
            ..MockVectorStore::default()
        };
        let options = IndexOptions {
            ready_timeout: Duration::from_secs(5),
            ..quick_options()
        };

        let outcome = create_index(&store, "docs", 8, &options).await.unwrap();

        assert_eq!(outcome, SetupOutcome::Created);
        assert_eq!(*store.describe_calls.lock().await, 3);
    }

    #[tokio::test]
    async fn test_index_never_visible_times_out_as_created() {
        let store = MockVectorStore {
            missing_for: usize::MAX,
            ..MockVectorStore::default()
        };

        let outcome = create_index(&store, "docs", 8, &quick_options()).await.unwrap();

        assert_eq!(outcome, SetupOutcome::Created);
    }

    #[test]
    fn test_client_errors_are_not_transient() {
        assert!(is_transient(&QaError::api("Pinecone", 503, "busy")));
        assert!(!is_transient(&QaError::api("Pinecone", 401, "bad key")));
    }
}
