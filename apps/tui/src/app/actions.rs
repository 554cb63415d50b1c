use std::sync::Arc;

use crate::api::OrphanageApi;
use crate::domain::Orphanage;
use crate::error::ApiClientError;

/// Remote operations the screens trigger.
#[derive(Clone)]
pub struct AppActions {
    api: Arc<dyn OrphanageApi>,
}

impl std::fmt::Debug for AppActions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppActions").finish_non_exhaustive()
    }
}

impl AppActions {
    pub fn new(api: Arc<dyn OrphanageApi>) -> Self {
        Self { api }
    }

    pub fn api(&self) -> Arc<dyn OrphanageApi> {
        Arc::clone(&self.api)
    }

    pub async fn fetch_orphanages(&self) -> Result<Vec<Orphanage>, ApiClientError> {
        let orphanages = self.api.list_orphanages().await?;
        tracing::debug!(count = orphanages.len(), "fetched orphanages");
        Ok(orphanages)
    }

    pub async fn fetch_orphanage(&self, id: i64) -> Result<Orphanage, ApiClientError> {
        self.api.get_orphanage(id).await
    }
}
