use crate::{CompletionOptions, CompletionProvider, HostedConfig};
use async_trait::async_trait;
use prism_common::{PrismError, Result};
use serde_json::json;
use tracing::{debug, info};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

/// Hosted messages-API provider.
pub struct HostedProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl HostedProvider {
    pub fn new(config: HostedConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(PrismError::Config(
                "hosted provider API key is required".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key: config.api_key,
            model: config.model,
        })
    }
}

#[async_trait]
impl CompletionProvider for HostedProvider {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str, options: &CompletionOptions) -> Result<String> {
        debug!("Calling hosted completion API with model {}", self.model);

        let mut body = json!({
            "model": self.model,
            "max_tokens": options.max_tokens,
            "messages": [{
                "role": "user",
                "content": prompt,
            }],
        });
        if let Some(temperature) = options.temperature {
            body["temperature"] = json!(temperature);
        }

        let response = self
            .client
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PrismError::Upstream(format!(
                "hosted provider error ({status}): {error_text}"
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|err| PrismError::Upstream(format!("malformed provider response: {err}")))?;

        let content = payload["content"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                PrismError::Upstream("provider response carried no text content".to_string())
            })?
            .to_string();

        info!("Hosted provider generated {} characters", content.len());
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires API key
    async fn live_completion() {
        let config = HostedConfig::new(std::env::var("ANTHROPIC_API_KEY").unwrap());
        let provider = HostedProvider::new(config).unwrap();
        let response = provider
            .complete("Say hello!", &CompletionOptions::default())
            .await;
        assert!(response.is_ok());
    }
}
