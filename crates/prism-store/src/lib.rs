//! Remote record-store client. Records live in a hosted rows-as-JSON
//! query API; identifiers are opaque and server-generated, and writes are
//! fire-and-forget from the core's perspective.

use async_trait::async_trait;
use prism_catalog::{CatalogComponent, CatalogSource};
use prism_common::{PrismError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A persisted design-document snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignRecord {
    pub design_url: String,
    pub file_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    pub design_name: String,
    pub raw_data: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideRecord {
    pub design_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design_node_id: Option<String>,
    pub detected_components: serde_json::Value,
    pub implementation_code: String,
    pub customization_notes: String,
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedComponentRecord {
    pub design_id: String,
    pub component_name: String,
    pub component_code: String,
    pub props_interface: String,
    pub imports: Vec<String>,
    pub dependencies: Vec<String>,
    pub model_id: String,
    pub generation_prompt: String,
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub design_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_component_id: Option<String>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_time_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct IdRow {
    id: String,
}

/// Write access to the artifact record stores. Writes either ack with the
/// new record's opaque id or fail; there is no transactional coordination
/// across stores.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn store_design(&self, record: &DesignRecord) -> Result<String>;
    async fn store_guide(&self, record: &GuideRecord) -> Result<String>;
    async fn store_generated_component(&self, record: &GeneratedComponentRecord)
        -> Result<String>;
    async fn store_generation_history(&self, record: &HistoryRecord) -> Result<String>;
}

/// HTTP client for the record-store REST surface.
pub struct RecordStore {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RecordStore {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
    }

    async fn check_status(response: reqwest::Response, action: &str) -> Result<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PrismError::Upstream(format!(
                "failed to {action} ({status}): {body}"
            )));
        }
        Ok(response)
    }

    /// Insert one row and return its server-generated id.
    async fn insert_returning_id<T: Serialize>(&self, table: &str, record: &T) -> Result<String> {
        let url = format!("{}?select=id", self.table_url(table));
        let response = self
            .request(self.http.post(&url))
            .header("Prefer", "return=representation")
            .json(record)
            .send()
            .await?;

        let response = Self::check_status(response, &format!("store {table} record")).await?;
        let rows: Vec<IdRow> = response
            .json()
            .await
            .map_err(|err| PrismError::Upstream(format!("malformed {table} insert reply: {err}")))?;

        rows.into_iter()
            .next()
            .map(|row| row.id)
            .ok_or_else(|| PrismError::Upstream(format!("{table} insert returned no row")))
    }

}

#[async_trait]
impl ArtifactStore for RecordStore {
    async fn store_design(&self, record: &DesignRecord) -> Result<String> {
        let id = self.insert_returning_id("designs", record).await?;
        debug!("Stored design record {}", id);
        Ok(id)
    }

    async fn store_guide(&self, record: &GuideRecord) -> Result<String> {
        let id = self.insert_returning_id("implementation_guides", record).await?;
        debug!("Stored implementation guide {}", id);
        Ok(id)
    }

    async fn store_generated_component(
        &self,
        record: &GeneratedComponentRecord,
    ) -> Result<String> {
        let id = self.insert_returning_id("generated_components", record).await?;
        debug!("Stored generated component {}", id);
        Ok(id)
    }

    async fn store_generation_history(&self, record: &HistoryRecord) -> Result<String> {
        let id = self.insert_returning_id("generation_history", record).await?;
        debug!("Stored generation history {}", id);
        Ok(id)
    }
}

#[async_trait]
impl CatalogSource for RecordStore {
    async fn list_components(&self) -> Result<Vec<CatalogComponent>> {
        let url = format!("{}?select=*&order=name", self.table_url("components"));
        let response = self.request(self.http.get(&url)).send().await?;
        let response = Self::check_status(response, "list components").await?;

        response
            .json()
            .await
            .map_err(|err| PrismError::Upstream(format!("malformed component listing: {err}")))
    }

    async fn get_component(&self, name: &str) -> Result<Option<CatalogComponent>> {
        let url = format!(
            "{}?select=*&name=eq.{name}&limit=1",
            self.table_url("components")
        );
        let response = self.request(self.http.get(&url)).send().await?;
        let response = Self::check_status(response, "fetch component").await?;

        let rows: Vec<CatalogComponent> = response
            .json()
            .await
            .map_err(|err| PrismError::Upstream(format!("malformed component row: {err}")))?;

        Ok(rows.into_iter().next())
    }

    async fn upsert_components(&self, components: &[CatalogComponent]) -> Result<()> {
        let url = format!("{}?on_conflict=name", self.table_url("components"));
        let response = self
            .request(self.http.post(&url))
            .header("Prefer", "resolution=merge-duplicates")
            .json(components)
            .send()
            .await?;

        Self::check_status(response, "upsert components").await?;
        info!("Upserted {} catalog components", components.len());
        Ok(())
    }
}
