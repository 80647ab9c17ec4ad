//! Where static documents come from.

use std::collections::HashMap;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// The document does not exist (the analog of a non-success response).
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("io error reading {name}: {message}")]
    Io { name: String, message: String },
}

/// Read-only provider of named static documents.
pub trait DocumentSource {
    fn fetch(&self, name: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

/// Documents stored as files under one directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DocumentSource for DirSource {
    fn fetch(&self, name: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send {
        let path = self.root.join(name);
        let name = name.to_string();
        async move {
            tokio::fs::read(&path).await.map_err(|e| match e.kind() {
                ErrorKind::NotFound => FetchError::NotFound(name),
                _ => FetchError::Io {
                    name,
                    message: e.to_string(),
                },
            })
        }
    }
}

/// Documents held in memory, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    docs: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.docs.insert(name.into(), bytes.into());
    }

    pub fn with(mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(name, bytes);
        self
    }
}

impl DocumentSource for MemorySource {
    fn fetch(&self, name: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send {
        let found = self
            .docs
            .get(name)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(name.to_string()));
        std::future::ready(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_source_serves_inserted_documents() {
        let src = MemorySource::new().with("a.json", "{}");
        assert_eq!(src.fetch("a.json").await.unwrap(), b"{}".to_vec());
        assert_eq!(
            src.fetch("b.json").await,
            Err(FetchError::NotFound("b.json".into()))
        );
    }

    #[tokio::test]
    async fn dir_source_reports_missing_files() {
        let dir = std::env::temp_dir().join(format!("arena-src-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("present.json"), b"[1]").unwrap();
        let src = DirSource::new(&dir);
        assert_eq!(src.fetch("present.json").await.unwrap(), b"[1]".to_vec());
        assert!(matches!(
            src.fetch("absent.json").await,
            Err(FetchError::NotFound(_))
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
