use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::services::ai_service::CodeGenerator;
use crate::store::WebhookStore;

pub const BODY_DELIMITER: &str = "\n\n";

#[derive(Clone)]
pub struct GenerationService {
    store: Arc<dyn WebhookStore>,
    generator: Arc<dyn CodeGenerator>,
}

impl GenerationService {
    pub fn new(store: Arc<dyn WebhookStore>, generator: Arc<dyn CodeGenerator>) -> Self {
        Self { store, generator }
    }

    /// Joins the bodies of the selected webhooks and hands them to the generator
    /// once. Unknown ids are skipped as long as at least one id matches.
    pub async fn summarize(&self, ids: &[Uuid]) -> Result<String> {
        let mut seen = HashSet::with_capacity(ids.len());
        let unique: Vec<Uuid> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();
        if unique.is_empty() {
            return Err(Error::EmptySelection);
        }

        let webhooks = self.store.find_by_ids(&unique).await?;
        if webhooks.is_empty() {
            tracing::warn!(requested = unique.len(), "no selected webhooks exist");
            return Err(Error::NoMatchingRecords);
        }
        if webhooks.len() < unique.len() {
            tracing::warn!(
                requested = unique.len(),
                found = webhooks.len(),
                "some selected webhooks no longer exist"
            );
        }

        let payload = concat_bodies(webhooks.iter().map(|w| w.body.as_str()));

        self.generator.generate(&payload).await.map_err(|e| {
            tracing::error!(error = ?e, "handler generation failed");
            Error::GenerationFailed(e.to_string())
        })
    }
}

pub fn concat_bodies<'a>(bodies: impl Iterator<Item = &'a str>) -> String {
    bodies.collect::<Vec<_>>().join(BODY_DELIMITER)
}
