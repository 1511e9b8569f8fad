use prism_common::{PrismError, Result};
use prism_design::WalkLimits;
use prism_llm::{CustomConfig, HostedConfig, ProviderConfig};

/// Runtime configuration, assembled from the environment before any core
/// logic runs. Missing required values fail here, not mid-request.
#[derive(Debug, Clone)]
pub struct Config {
    pub design_access_token: String,
    pub store_url: String,
    pub store_api_key: String,
    pub repo_owner: String,
    pub repo_name: String,
    pub import_prefix: String,
    pub github_token: Option<String>,
    pub provider: ProviderConfig,
    pub limits: WalkLimits,
}

const REQUIRED: [&str; 5] = [
    "FIGMA_ACCESS_TOKEN",
    "STORE_URL",
    "STORE_API_KEY",
    "REPO_OWNER",
    "REPO_NAME",
];

impl Config {
    pub fn from_env() -> Result<Self> {
        let missing: Vec<&str> = REQUIRED
            .iter()
            .filter(|key| std::env::var(key).map(|v| v.is_empty()).unwrap_or(true))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(PrismError::Config(format!(
                "missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            design_access_token: std::env::var("FIGMA_ACCESS_TOKEN").unwrap_or_default(),
            store_url: std::env::var("STORE_URL").unwrap_or_default(),
            store_api_key: std::env::var("STORE_API_KEY").unwrap_or_default(),
            repo_owner: std::env::var("REPO_OWNER").unwrap_or_default(),
            repo_name: std::env::var("REPO_NAME").unwrap_or_default(),
            import_prefix: std::env::var("IMPORT_PREFIX")
                .unwrap_or_else(|_| "@design-system".to_string()),
            github_token: std::env::var("GITHUB_TOKEN").ok().filter(|v| !v.is_empty()),
            provider: provider_from_env()?,
            limits: WalkLimits::default(),
        })
    }
}

/// Explicit provider selection: a custom OpenAI-compatible endpoint when
/// enabled, otherwise the hosted provider when its key is present,
/// otherwise none (code generation is simply unavailable).
fn provider_from_env() -> Result<ProviderConfig> {
    let custom_enabled = std::env::var("CUSTOM_AI_PROVIDER")
        .map(|v| v == "true")
        .unwrap_or(false);

    if custom_enabled {
        let api_url = std::env::var("CUSTOM_AI_URL").unwrap_or_default();
        let api_key = std::env::var("CUSTOM_AI_KEY").unwrap_or_default();
        if api_url.is_empty() || api_key.is_empty() {
            return Err(PrismError::Config(
                "CUSTOM_AI_URL and CUSTOM_AI_KEY must be set when CUSTOM_AI_PROVIDER is enabled"
                    .to_string(),
            ));
        }

        return Ok(ProviderConfig::Custom(CustomConfig {
            api_url,
            api_key,
            provider_name: std::env::var("CUSTOM_AI_NAME")
                .unwrap_or_else(|_| "CustomAI".to_string()),
            model: std::env::var("CUSTOM_AI_MODEL").unwrap_or_else(|_| "gpt-4".to_string()),
        }));
    }

    match std::env::var("ANTHROPIC_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(ProviderConfig::Hosted(HostedConfig::new(key))),
        _ => Ok(ProviderConfig::NoProvider),
    }
}
