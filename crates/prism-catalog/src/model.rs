use async_trait::async_trait;
use prism_common::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Normalized record of one design-system component. `name` is the unique
/// identity within a catalog snapshot; reloads upsert by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogComponent {
    pub name: String,
    pub import_path: String,
    pub category: ComponentCategory,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub props: BTreeMap<String, PropSpec>,
    #[serde(default)]
    pub variants: Vec<VariantAxis>,
    #[serde(default)]
    pub visual_patterns: Vec<String>,
    #[serde(default)]
    pub figma_keywords: Vec<String>,
    #[serde(default)]
    pub usage_example: String,
    #[serde(default)]
    pub source_url: String,
}

impl CatalogComponent {
    pub fn has_prop(&self, name: &str) -> bool {
        self.props.contains_key(name)
    }

    /// Variant axes keep their declaration order; first-declared wins when
    /// deriving suggested props.
    pub fn variant_axis(&self, name: &str) -> Option<&VariantAxis> {
        self.variants.iter().find(|axis| axis.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropSpec {
    pub declared_type: String,
    #[serde(default)]
    pub required: bool,
}

/// One variant axis with its ordered value set, e.g.
/// `size -> [small, medium, large]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantAxis {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentCategory {
    Navigation,
    Layout,
    Forms,
    Display,
    Feedback,
    Typography,
    #[default]
    Other,
}

impl ComponentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentCategory::Navigation => "navigation",
            ComponentCategory::Layout => "layout",
            ComponentCategory::Forms => "forms",
            ComponentCategory::Display => "display",
            ComponentCategory::Feedback => "feedback",
            ComponentCategory::Typography => "typography",
            ComponentCategory::Other => "other",
        }
    }
}

/// Read/write access to the component catalog. Implemented by the record
/// store; the catalog is re-read per request, never cached in process.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn list_components(&self) -> Result<Vec<CatalogComponent>>;

    async fn get_component(&self, name: &str) -> Result<Option<CatalogComponent>>;

    /// Upsert key is the component name.
    async fn upsert_components(&self, components: &[CatalogComponent]) -> Result<()>;
}
