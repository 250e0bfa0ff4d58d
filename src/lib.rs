pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod utils;

use crate::config::Config;
use crate::services::{
    ai_service::{ChatCompletionsGenerator, CodeGenerator},
    capture_service::CaptureService,
    generation_service::GenerationService,
    webhook_service::WebhookService,
};
use crate::store::WebhookStore;
use crate::utils::id::IdGenerator;
use reqwest::Client;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn WebhookStore>,
    pub capture_service: CaptureService,
    pub webhook_service: WebhookService,
    pub generation_service: GenerationService,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn WebhookStore>,
        generator: Arc<dyn CodeGenerator>,
    ) -> Self {
        let ids = Arc::new(IdGenerator::new());

        let capture_service = CaptureService::new(store.clone(), ids);
        let webhook_service = WebhookService::new(store.clone());
        let generation_service = GenerationService::new(store.clone(), generator);

        Self {
            config: Arc::new(config),
            store,
            capture_service,
            webhook_service,
            generation_service,
        }
    }

    /// State wired to the configured chat-completions endpoint.
    pub fn with_remote_generator(
        config: Config,
        store: Arc<dyn WebhookStore>,
    ) -> error::Result<Self> {
        let http_client = Client::builder()
            .timeout(config.generation_timeout)
            .build()
            .map_err(|e| error::Error::Config(format!("HTTP client: {}", e)))?;
        let generator = Arc::new(ChatCompletionsGenerator::new(&config, http_client));
        Ok(Self::new(config, store, generator))
    }
}
