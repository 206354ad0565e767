//! Activate handler: garbage-collect stale generations

use super::OfflineAgent;
use crate::error::AgentResult;
use futures_util::future::try_join_all;
use serde::Serialize;
use tracing::{error, info};

/// Result of a successful activation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivateReport {
    /// Generation that survived
    pub version: String,
    /// Generations that were deleted
    pub deleted: Vec<String>,
}

impl OfflineAgent {
    /// Delete every generation except the current one, then claim clients.
    ///
    /// Claiming only happens after cleanup succeeds: if enumerating or
    /// deleting a generation fails, the error is returned and clients are
    /// not claimed.
    pub async fn activate(&self) -> AgentResult<ActivateReport> {
        info!("Activating {}", self.settings.version);

        let deleted = match self.delete_stale_generations().await {
            Ok(deleted) => deleted,
            Err(e) => {
                error!("Cache cleanup failed: {}", e);
                return Err(e);
            }
        };

        self.host.claim_clients().await?;
        info!("Activation complete");

        Ok(ActivateReport {
            version: self.settings.version.clone(),
            deleted,
        })
    }

    async fn delete_stale_generations(&self) -> AgentResult<Vec<String>> {
        let stale: Vec<String> = self
            .storage
            .keys()
            .await?
            .into_iter()
            .filter(|name| *name != self.settings.version)
            .collect();

        try_join_all(stale.iter().map(|name| async move {
            info!("Deleting old cache {}", name);
            self.storage.delete(name).await
        }))
        .await?;

        Ok(stale)
    }
}
