// Catalog service - Use cases for the cable library
use crate::application::cable_repository::{CableCatalogRepository, CatalogError};
use crate::domain::cable::CableSpec;
use std::sync::Arc;

#[derive(Clone)]
pub struct CatalogService {
    repository: Arc<dyn CableCatalogRepository>,
}

impl CatalogService {
    pub fn new(repository: Arc<dyn CableCatalogRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_cables(&self) -> Result<Vec<CableSpec>, CatalogError> {
        self.repository.list().await
    }

    /// Name and velocity of propagation are required; impedance may be blank
    pub async fn add_cable(&self, spec: CableSpec) -> Result<CableSpec, CatalogError> {
        let spec = CableSpec {
            name: spec.name.trim().to_string(),
            velocity_of_propagation: spec.velocity_of_propagation.trim().to_string(),
            impedance: spec.impedance.trim().to_string(),
        };
        if spec.name.is_empty() {
            return Err(CatalogError::Invalid("name is required".to_string()));
        }
        if spec.velocity_of_propagation.is_empty() {
            return Err(CatalogError::Invalid(
                "velocity of propagation is required".to_string(),
            ));
        }

        self.repository.add(spec.clone()).await?;
        tracing::info!("Added cable {} to catalog", spec.name);
        Ok(spec)
    }

    pub async fn remove_cable(&self, name: &str) -> Result<bool, CatalogError> {
        let removed = self.repository.remove(name).await?;
        if removed {
            tracing::info!("Removed cable {} from catalog", name);
        }
        Ok(removed)
    }
}
