use crate::domain::model::Document;
use crate::domain::ports::DocumentLoader;
use crate::utils::error::{QaError, Result};
use std::path::{Path, PathBuf};

/// Loads every file under `base_path` whose extension is in `extensions`.
#[derive(Debug, Clone)]
pub struct LocalDocumentLoader {
    base_path: PathBuf,
    extensions: Vec<String>,
}

impl LocalDocumentLoader {
    pub fn new(base_path: impl Into<PathBuf>, extensions: Vec<String>) -> Self {
        Self {
            base_path: base_path.into(),
            extensions: extensions.into_iter().map(|e| e.to_lowercase()).collect(),
        }
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|e| *e == ext.to_lowercase()))
            .unwrap_or(false)
    }

    async fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut pending = vec![self.base_path.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push(path);
                } else if file_type.is_file() && self.accepts(&path) {
                    files.push(path);
                }
            }
        }

        files.sort();
        Ok(files)
    }
}

impl DocumentLoader for LocalDocumentLoader {
    async fn load(&self) -> Result<Vec<Document>> {
        let files = self.collect_files().await?;
        tracing::debug!(
            "Found {} documents under {}",
            files.len(),
            self.base_path.display()
        );

        let mut docs = Vec::with_capacity(files.len());
        for path in files {
            let bytes = tokio::fs::read(&path).await?;
            let page_content = String::from_utf8(bytes).map_err(|_| QaError::ProcessingError {
                message: format!("{} is not valid UTF-8 text", path.display()),
            })?;
            docs.push(Document {
                source: path.to_string_lossy().into_owned(),
                page_content,
            });
        }

        Ok(docs)
    }
}
