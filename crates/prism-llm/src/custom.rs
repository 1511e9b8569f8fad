use crate::{CompletionOptions, CompletionProvider, CustomConfig};
use async_trait::async_trait;
use prism_common::{PrismError, Result};
use serde_json::json;
use tracing::{debug, info};

/// Adapter for caller-supplied OpenAI-compatible chat-completions
/// endpoints, e.g. an internal gateway.
pub struct CustomProvider {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    provider_name: String,
    model: String,
}

impl CustomProvider {
    pub fn new(config: CustomConfig) -> Result<Self> {
        if config.api_url.is_empty() || config.api_key.is_empty() {
            return Err(PrismError::Config(
                "custom provider URL and API key are required".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_url: config.api_url,
            api_key: config.api_key,
            provider_name: config.provider_name,
            model: config.model,
        })
    }
}

#[async_trait]
impl CompletionProvider for CustomProvider {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str, options: &CompletionOptions) -> Result<String> {
        debug!("[{}] requesting completion", self.provider_name);

        let body = json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": prompt,
            }],
            "max_tokens": options.max_tokens,
            "temperature": options.temperature.unwrap_or(0.7),
        });

        let response = self
            .client
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PrismError::Upstream(format!(
                "{} API error ({status}): {error_text}",
                self.provider_name
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|err| PrismError::Upstream(format!("malformed provider response: {err}")))?;

        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                PrismError::Upstream(format!("{} returned no choices", self.provider_name))
            })?
            .to_string();

        info!(
            "[{}] generated {} characters",
            self.provider_name,
            content.len()
        );
        if let Some(usage) = payload["usage"].as_object() {
            debug!(
                "[{}] tokens: {} prompt + {} completion",
                self.provider_name,
                usage.get("prompt_tokens").and_then(|v| v.as_u64()).unwrap_or(0),
                usage.get("completion_tokens").and_then(|v| v.as_u64()).unwrap_or(0),
            );
        }

        Ok(content)
    }
}
