// JSON file implementation of the cable catalog
use crate::application::cable_repository::{CableCatalogRepository, CatalogError};
use crate::domain::cable::CableSpec;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::sync::Mutex;

#[derive(Debug)]
pub struct JsonFileCatalog {
    path: PathBuf,
    // serializes read-modify-write cycles against the file
    write_lock: Mutex<()>,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// A missing file means nothing was saved yet; start from the defaults
    async fn load(&self) -> Result<Vec<CableSpec>, CatalogError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No catalog at {}, using defaults", self.path.display());
                Ok(CableSpec::defaults())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, entries: &[CableSpec]) -> Result<(), CatalogError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_vec_pretty(entries)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl CableCatalogRepository for JsonFileCatalog {
    async fn list(&self) -> Result<Vec<CableSpec>, CatalogError> {
        self.load().await
    }

    async fn add(&self, spec: CableSpec) -> Result<(), CatalogError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        if entries.iter().any(|e| e.name == spec.name) {
            return Err(CatalogError::Duplicate(spec.name));
        }
        entries.push(spec);
        self.save(&entries).await
    }

    async fn remove(&self, name: &str) -> Result<bool, CatalogError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        let before = entries.len();
        entries.retain(|e| e.name != name);
        if entries.len() == before {
            return Ok(false);
        }
        self.save(&entries).await?;
        Ok(true)
    }
}
