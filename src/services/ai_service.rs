use anyhow::Context as _;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::Config;

/// Turns concatenated webhook bodies into source code.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodeGenerator: Send + Sync {
    async fn generate(&self, samples: &str) -> anyhow::Result<String>;
}

const HANDLER_INSTRUCTIONS: &str = r#"You will receive one or more example request bodies captured from webhook deliveries of a single API.
Each example represents an event type such as user.created, payment.failed or order.shipped.

Your task:
- Analyze every payload and infer its event type, field names and data structure.
- Produce a single TypeScript module that exports a function named handleWebhook.
- handleWebhook accepts a request body (unknown) and an event name (string).
- Declare one Zod schema per inferred event and validate the body with it.
- Dispatch on the event with a discriminated union or type guards and call a handler per event type.
- Export every inferred type with z.infer<typeof SchemaName>.

The output must be a complete, runnable TypeScript file.
Return only code: no explanations, no markdown fences, no comments."#;

#[derive(Clone)]
pub struct ChatCompletionsGenerator {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl ChatCompletionsGenerator {
    pub fn new(config: &Config, client: Client) -> Self {
        Self {
            client,
            api_url: config.generation_api_url.clone(),
            api_key: config.generation_api_key.clone(),
            model: config.generation_model.clone(),
            timeout: config.generation_timeout,
        }
    }

    async fn chat_completion(&self, user_content: String) -> anyhow::Result<String> {
        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: String,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
        }
        #[derive(Deserialize)]
        struct RespChoiceMsg {
            content: Option<String>,
        }
        #[derive(Deserialize)]
        struct RespChoice {
            message: RespChoiceMsg,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<RespChoice>,
        }

        let req = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: HANDLER_INSTRUCTIONS.to_string(),
                },
                Msg {
                    role: "user",
                    content: user_content,
                },
            ],
        };

        let res = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&req)
            .timeout(self.timeout)
            .send()
            .await
            .context("generation request failed")?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Generation API error {}: {}", status, text));
        }

        let body: Resp = res.json().await.context("generation response parse failed")?;
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow::anyhow!("Generation response contained no content"))
    }
}

#[async_trait]
impl CodeGenerator for ChatCompletionsGenerator {
    async fn generate(&self, samples: &str) -> anyhow::Result<String> {
        tracing::info!(model = %self.model, payload_bytes = samples.len(), "requesting handler generation");
        self.chat_completion(user_prompt(samples)).await
    }
}

fn user_prompt(samples: &str) -> String {
    format!("Webhook payloads:\n\n\"\"\"\n{}\n\"\"\"", samples)
}
