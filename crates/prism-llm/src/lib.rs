//! Completion-provider seam. The core is agnostic to which provider is
//! active; selection happens through an explicit configuration value, never
//! ambient state, and provider failures surface as one upstream error
//! domain.

pub mod custom;
pub mod hosted;

pub use custom::CustomProvider;
pub use hosted::HostedProvider;

use async_trait::async_trait;
use prism_common::Result;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct CompletionOptions {
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            max_tokens: 4096,
            temperature: None,
        }
    }
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Identifier recorded on generated artifacts.
    fn model_id(&self) -> &str;

    async fn complete(&self, prompt: &str, options: &CompletionOptions) -> Result<String>;
}

/// Which completion provider to use, decided by the caller's configuration.
#[derive(Debug, Clone, Default)]
pub enum ProviderConfig {
    /// Code generation is unavailable; analysis and guides still work.
    #[default]
    NoProvider,
    Hosted(HostedConfig),
    Custom(CustomConfig),
}

#[derive(Debug, Clone)]
pub struct HostedConfig {
    pub api_key: String,
    pub model: String,
}

impl HostedConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: "claude-3-5-sonnet-20241022".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CustomConfig {
    pub api_url: String,
    pub api_key: String,
    pub provider_name: String,
    pub model: String,
}

impl ProviderConfig {
    pub fn build(self) -> Result<Option<Arc<dyn CompletionProvider>>> {
        match self {
            ProviderConfig::NoProvider => Ok(None),
            ProviderConfig::Hosted(config) => Ok(Some(Arc::new(HostedProvider::new(config)?))),
            ProviderConfig::Custom(config) => Ok(Some(Arc::new(CustomProvider::new(config)?))),
        }
    }
}
