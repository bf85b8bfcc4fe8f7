//! Static catalog lookup for the current content version
//!
//! Cosmetic only: the version tag lands in the published metadata. Any
//! failure falls back to [`PLACEHOLDER_VERSION`] and never blocks the run.

use crate::transport::{ApiError, TransportClient};
use async_trait::async_trait;

pub const PLACEHOLDER_VERSION: &str = "unknown";

#[async_trait]
pub trait ContentCatalog: Send + Sync {
    async fn current_version(&self) -> Result<String, ApiError>;
}

/// Data Dragon versions listing; the first entry is the live version
pub struct DataDragonCatalog {
    transport: TransportClient,
    versions_url: String,
}

impl DataDragonCatalog {
    /// `transport` should carry no credential
    pub fn new(transport: TransportClient, versions_url: impl Into<String>) -> Self {
        Self {
            transport,
            versions_url: versions_url.into(),
        }
    }
}

#[async_trait]
impl ContentCatalog for DataDragonCatalog {
    async fn current_version(&self) -> Result<String, ApiError> {
        let versions: Vec<String> = self.transport.get_json(&self.versions_url).await?;

        versions
            .into_iter()
            .map(|v| v.trim().to_string())
            .find(|v| !v.is_empty())
            .ok_or_else(|| ApiError::MalformedResponse {
                url: self.versions_url.clone(),
                reason: "empty version list".to_string(),
            })
    }
}

/// Current content version, or the placeholder if the catalog is unavailable
pub async fn resolve_content_version(catalog: &dyn ContentCatalog) -> String {
    match catalog.current_version().await {
        Ok(version) => {
            log::info!("📚 Content version: {}", version);
            version
        }
        Err(e) => {
            log::warn!(
                "⚠️  Catalog lookup failed, using '{}': {}",
                PLACEHOLDER_VERSION,
                e
            );
            PLACEHOLDER_VERSION.to_string()
        }
    }
}
