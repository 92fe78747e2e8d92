// Repository trait for the cable catalog
use crate::domain::cable::CableSpec;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("invalid cable entry: {0}")]
    Invalid(String),

    #[error("cable '{0}' already exists")]
    Duplicate(String),

    #[error("catalog storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("catalog is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),
}

#[async_trait]
pub trait CableCatalogRepository: Send + Sync {
    /// All entries in insertion order
    async fn list(&self) -> Result<Vec<CableSpec>, CatalogError>;

    /// Append an entry; names are unique
    async fn add(&self, spec: CableSpec) -> Result<(), CatalogError>;

    /// Remove by name, returning whether anything was removed
    async fn remove(&self, name: &str) -> Result<bool, CatalogError>;
}
