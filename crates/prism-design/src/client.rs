use crate::reference::normalize_node_id;
use crate::types::DesignNode;
use async_trait::async_trait;
use prism_common::{PrismError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info};

const DEFAULT_BASE_URL: &str = "https://api.figma.com/v1";

/// Read access to a design document service.
#[async_trait]
pub trait DesignSource: Send + Sync {
    /// Fetch the root document node of a file.
    async fn fetch_document(&self, file_key: &str) -> Result<DesignNode>;

    /// Fetch one node subtree of a file.
    async fn fetch_node(&self, file_key: &str, node_id: &str) -> Result<DesignNode>;
}

/// HTTP client for the design API.
pub struct DesignClient {
    http: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl DesignClient {
    pub fn new(access_token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            access_token,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .header("X-Figma-Token", &self.access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PrismError::Upstream(format!(
                "design API error ({status}): {body}"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|err| PrismError::Upstream(format!("malformed design API payload: {err}")))
    }
}

#[derive(Debug, Deserialize)]
struct FileResponse {
    #[allow(dead_code)]
    name: Option<String>,
    document: DesignNode,
}

#[derive(Debug, Deserialize)]
struct NodesResponse {
    nodes: HashMap<String, NodeEntry>,
}

#[derive(Debug, Deserialize)]
struct NodeEntry {
    document: Option<DesignNode>,
}

#[async_trait]
impl DesignSource for DesignClient {
    async fn fetch_document(&self, file_key: &str) -> Result<DesignNode> {
        info!("Fetching design document {}", file_key);
        let url = format!("{}/files/{}", self.base_url, file_key);
        let file: FileResponse = self.get_json(&url).await?;
        Ok(file.document)
    }

    async fn fetch_node(&self, file_key: &str, node_id: &str) -> Result<DesignNode> {
        let clean_id = normalize_node_id(node_id);
        info!("Fetching design node {} from {}", clean_id, file_key);

        let url = format!("{}/files/{}/nodes?ids={}", self.base_url, file_key, clean_id);
        let mut response: NodesResponse = self.get_json(&url).await?;

        response
            .nodes
            .remove(&clean_id)
            .and_then(|entry| entry.document)
            .ok_or_else(|| {
                PrismError::NotFound(format!("node '{node_id}' not found in file '{file_key}'"))
            })
    }
}
