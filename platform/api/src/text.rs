use std::time::Duration;

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use serde_json::json;

use crate::config::TextConfig;

/// Fallbacks served when the provider is unreachable or returns garbage.
/// The clock face must never go blank.
pub const DEFAULT_TAGLINE: &str = "Defining moments in time.";
pub const DEFAULT_QUOTE: &str =
    "The future is not something we enter. The future is something we create.";

const TAGLINE_PROMPT: &str = "Generate an inspiring 5-word tagline for a luxury watch. \
    It should evoke first-class travel at night and the thrill of arriving somewhere opulent.";
const QUOTE_PROMPT: &str = "Generate a short inspirational quote about time, ambition and success. \
    One sentence, no attribution.";

/// The text-generation collaborator. Implementations may fail; callers
/// fall back to the defaults above.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_tagline(&self) -> Result<String>;

    async fn generate_quote(&self) -> Result<String>;
}

/// HTTP client for the generation provider. The provider speaks a plain
/// `{prompt} -> {text}` JSON contract.
pub struct HttpTextGenerator {
    config: TextConfig,
    client: reqwest::Client,
}

impl HttpTextGenerator {
    pub fn new(config: TextConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let res = self
            .client
            .post(&self.config.url)
            .timeout(Duration::from_millis(self.config.timeout_ms))
            .bearer_auth(&self.config.api_key)
            .json(&json!({ "prompt": prompt }))
            .send()
            .await
            .context("text provider request failed")?
            .error_for_status()
            .context("text provider returned an error status")?;

        let body = res
            .json::<serde_json::Value>()
            .await
            .context("text provider returned invalid json")?;

        let text = body["text"]
            .as_str()
            .context("text provider response missing text field")?
            .trim();

        if text.is_empty() {
            anyhow::bail!("text provider returned an empty string");
        }

        Ok(text.to_owned())
    }
}

#[async_trait]
impl TextGenerator for HttpTextGenerator {
    async fn generate_tagline(&self) -> Result<String> {
        self.generate(TAGLINE_PROMPT).await
    }

    async fn generate_quote(&self) -> Result<String> {
        self.generate(QUOTE_PROMPT).await
    }
}
