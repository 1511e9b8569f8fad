use prism_common::{PrismError, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// A parsed design reference: the file key plus an optional node id.
///
/// Accepted inputs are share URLs whose path contains a `/file/{key}`,
/// `/design/{key}` or `/proto/{key}` segment, optionally carrying a
/// `node-id=` query parameter. Parsing happens before any network call, so
/// a bad URL fails fast with an input error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignRef {
    pub file_key: String,
    pub node_id: Option<String>,
}

const KEY_MARKERS: [&str; 3] = ["file", "design", "proto"];

impl DesignRef {
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let url = Url::parse(trimmed)
            .map_err(|_| PrismError::Input(format!("invalid design URL: '{trimmed}'")))?;

        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.collect())
            .unwrap_or_default();

        let marker_index = segments
            .iter()
            .position(|segment| KEY_MARKERS.contains(segment))
            .ok_or_else(|| {
                PrismError::Input(format!(
                    "could not extract a file key from '{trimmed}': expected a /file/, /design/ or /proto/ segment"
                ))
            })?;

        let file_key = segments
            .get(marker_index + 1)
            .filter(|segment| !segment.is_empty())
            .map(|segment| segment.to_string())
            .ok_or_else(|| {
                PrismError::Input(format!("design URL '{trimmed}' has no file key after its path marker"))
            })?;

        let node_id = url
            .query_pairs()
            .find_map(|(key, value)| (key == "node-id").then(|| value.into_owned()))
            .map(|raw| normalize_node_id(&raw))
            .filter(|id| !id.is_empty());

        Ok(Self { file_key, node_id })
    }
}

/// Node ids appear colon-separated in API payloads but hyphen-separated in
/// URLs; lookups always use the hyphen form.
pub fn normalize_node_id(raw: &str) -> String {
    raw.trim().replace(':', "-")
}
