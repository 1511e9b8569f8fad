use prism_match::SuggestedProp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Assembled implementation guide; built fresh per request, never mutated
/// after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationGuide {
    pub overview: String,
    /// One import statement per path group, in discovery order.
    pub imports: Vec<String>,
    pub component_usage: Vec<ComponentUsage>,
    pub full_code: String,
    pub customization_notes: Vec<String>,
    pub design_tokens: GuideTokens,
    pub quick_prompts: Vec<QuickPrompt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentUsage {
    pub component_name: String,
    pub props: Vec<SuggestedProp>,
    pub code_snippet: String,
    pub figma_reference: String,
}

/// Root-level token summary embedded in the guide payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuideTokens {
    pub colors: BTreeMap<String, String>,
    pub spacing: BTreeMap<String, String>,
    pub typography: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickPrompt {
    pub question: String,
    pub category: String,
    pub applies_to: String,
}

impl QuickPrompt {
    pub fn new(question: &str, category: &str, applies_to: &str) -> Self {
        Self {
            question: question.to_string(),
            category: category.to_string(),
            applies_to: applies_to.to_string(),
        }
    }
}
