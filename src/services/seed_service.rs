use chrono::{Duration, Utc};
use rand::distributions::{Distribution, WeightedIndex};
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::models::webhook::Webhook;
use crate::services::event_bodies::{self, EventCatalogue};
use crate::store::WebhookStore;
use crate::utils::id::IdGenerator;
use crate::utils::time::{now, timestamp_of};

/// Status code and relative weight assigned to synthetic deliveries.
pub const STATUS_WEIGHTS: [(i32, u32); 4] = [(200, 85), (400, 5), (401, 3), (500, 7)];

const SEED_WINDOW_DAYS: i64 = 30;

pub struct SeedService {
    store: Arc<dyn WebhookStore>,
    catalogue: EventCatalogue,
    capture_path: String,
}

#[derive(Debug)]
pub struct SeedReport {
    pub cleared: u64,
    pub inserted: u64,
    /// Event type and count, most frequent first.
    pub distribution: Vec<(String, usize)>,
}

impl SeedService {
    pub fn new(store: Arc<dyn WebhookStore>, capture_path: impl Into<String>) -> Self {
        Self {
            store,
            catalogue: EventCatalogue::default(),
            capture_path: capture_path.into(),
        }
    }

    pub async fn reseed(&self, count: usize) -> Result<SeedReport> {
        let mut rng = StdRng::from_entropy();
        self.reseed_with(count, &mut rng).await
    }

    /// Clears the store and bulk-inserts `count` synthetic webhooks in one batch.
    pub async fn reseed_with(&self, count: usize, rng: &mut (dyn RngCore + Send)) -> Result<SeedReport> {
        let (webhooks, distribution) = self.generate(count, rng)?;

        let cleared = self.store.clear().await?;
        tracing::info!(cleared, "cleared existing webhooks");

        let inserted = self.store.insert_many(&webhooks).await?;
        tracing::info!(inserted, "seeded webhooks");

        Ok(SeedReport {
            cleared,
            inserted,
            distribution,
        })
    }

    /// Builds `count` webhooks with ids ordered by their creation time.
    pub fn generate(
        &self,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Result<(Vec<Webhook>, Vec<(String, usize)>)> {
        let statuses = WeightedIndex::new(STATUS_WEIGHTS.iter().map(|(_, weight)| *weight))
            .map_err(|e| Error::Internal(format!("Invalid status weights: {}", e)))?;

        let window = Duration::days(SEED_WINDOW_DAYS).num_milliseconds();
        let mut offsets: Vec<i64> = (0..count).map(|_| rng.gen_range(0..window)).collect();
        offsets.sort_unstable_by(|a, b| b.cmp(a));

        let ids = IdGenerator::new();
        let started = Utc::now();
        let mut tally: BTreeMap<&'static str, usize> = BTreeMap::new();
        let mut webhooks = Vec::with_capacity(count);

        for offset in offsets {
            let event_type = self.catalogue.random_event_type(rng);
            *tally.entry(event_type).or_default() += 1;

            let body = serde_json::to_string_pretty(&self.catalogue.body(event_type, rng))?;
            let id = ids.next_at(started - Duration::milliseconds(offset));
            let status_code = STATUS_WEIGHTS[statuses.sample(rng)].0;

            webhooks.push(Webhook {
                id,
                method: "POST".to_string(),
                path_name: self.capture_path.clone(),
                ip: Some(event_bodies::ipv4(rng)),
                status_code,
                content_type: Some("application/json".to_string()),
                content_length: body.len() as i64,
                query_params: query_params(rng),
                headers: provider_headers(rng),
                body,
                created_at: timestamp_of(&id).unwrap_or_else(now),
            });
        }

        let mut distribution: Vec<(String, usize)> = tally
            .into_iter()
            .map(|(event, n)| (event.to_string(), n))
            .collect();
        distribution.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Ok((webhooks, distribution))
    }
}

fn query_params(rng: &mut dyn RngCore) -> Option<HashMap<String, String>> {
    if !rng.gen_bool(0.5) {
        return None;
    }
    let source = event_bodies::pick(rng, &["stripe", "webhook", "api"]);
    Some(HashMap::from([("source".to_string(), source.to_string())]))
}

fn provider_headers(rng: &mut dyn RngCore) -> HashMap<String, String> {
    HashMap::from([
        ("content-type".to_string(), "application/json".to_string()),
        (
            "stripe-signature".to_string(),
            format!("t={},v1={}", Utc::now().timestamp(), event_bodies::hex(rng, 64)),
        ),
        (
            "user-agent".to_string(),
            "Stripe/1.0 (+https://stripe.com/docs/webhooks)".to_string(),
        ),
        (
            "x-stripe-webhook-id".to_string(),
            format!("whsec_{}", event_bodies::alnum(rng, 32)),
        ),
        ("accept".to_string(), "*/*".to_string()),
        ("host".to_string(), event_bodies::domain(rng)),
    ])
}
