//! Scores design nodes against the component catalog using weighted
//! pattern and keyword similarity.

use prism_catalog::CatalogComponent;
use prism_common::Result;
use prism_design::{check_tree, DesignNode, LayoutMode, WalkLimits};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Minimum confidence for a per-node match to be emitted at all. Guide and
/// analysis surfaces additionally filter to [`PRESENTATION_THRESHOLD`].
pub const MATCH_THRESHOLD: f64 = 0.3;
pub const PRESENTATION_THRESHOLD: f64 = 0.5;

const PATTERN_WEIGHT: f64 = 0.6;
const KEYWORD_WEIGHT: f64 = 0.4;

/// One scored pairing of a design node and a catalog component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMatch {
    pub component_name: String,
    pub component_path: String,
    /// Normalized similarity in [0, 1].
    pub confidence: f64,
    pub matched_patterns: Vec<String>,
    pub suggested_props: Vec<SuggestedProp>,
    pub figma_node_id: String,
    pub figma_node_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedProp {
    pub name: String,
    pub value: PropValue,
}

impl SuggestedProp {
    pub fn text(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: PropValue::Text(value.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Text(String),
    Flag(bool),
    Json(serde_json::Value),
}

/// Matches design trees against a loaded catalog snapshot.
pub struct Matcher {
    limits: WalkLimits,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Matcher {
    pub fn new() -> Self {
        Self {
            limits: WalkLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: WalkLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Score one node against every catalog entry. Matches below
    /// [`MATCH_THRESHOLD`] are dropped; the rest come back ordered by
    /// descending confidence, ties keeping catalog order.
    pub fn match_node(
        &self,
        node: &DesignNode,
        catalog: &[CatalogComponent],
    ) -> Vec<ComponentMatch> {
        let patterns = detect_patterns(node);
        let keywords = extract_keywords(node);

        let mut matches: Vec<ComponentMatch> = catalog
            .iter()
            .filter_map(|entry| {
                let confidence = calculate_confidence(&patterns, &keywords, entry);
                (confidence > MATCH_THRESHOLD).then(|| ComponentMatch {
                    component_name: entry.name.clone(),
                    component_path: entry.import_path.clone(),
                    confidence,
                    matched_patterns: matched_patterns(&patterns, &entry.visual_patterns),
                    suggested_props: suggest_props(node, entry),
                    figma_node_id: node.id.clone(),
                    figma_node_name: node.name.clone(),
                })
            })
            .collect();

        sort_by_confidence(&mut matches);
        matches
    }

    /// Match every node of the tree. Per-node match lists concatenate in
    /// pre-order (parent before children), then one stable sort orders the
    /// whole sequence by descending confidence.
    pub fn match_tree(
        &self,
        root: &DesignNode,
        catalog: &[CatalogComponent],
    ) -> Result<Vec<ComponentMatch>> {
        check_tree(root, &self.limits)?;

        let mut matches = Vec::new();
        self.match_recursive(root, catalog, &mut matches);
        debug!("Collected {} raw matches from tree", matches.len());

        sort_by_confidence(&mut matches);
        Ok(matches)
    }

    fn match_recursive(
        &self,
        node: &DesignNode,
        catalog: &[CatalogComponent],
        matches: &mut Vec<ComponentMatch>,
    ) {
        matches.extend(self.match_node(node, catalog));
        for child in &node.children {
            self.match_recursive(child, catalog, matches);
        }
    }
}

fn sort_by_confidence(matches: &mut [ComponentMatch]) {
    matches.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Detect visual-pattern tags for a node. Rules fire independently; tags
/// are kept as a set in first-fired order.
pub fn detect_patterns(node: &DesignNode) -> Vec<String> {
    fn add(tags: &[&str], patterns: &mut Vec<String>) {
        for tag in tags {
            if !patterns.iter().any(|p| p == tag) {
                patterns.push(tag.to_string());
            }
        }
    }

    let mut patterns: Vec<String> = Vec::new();

    // By node type
    if node.node_type == "FRAME" || node.node_type == "COMPONENT" {
        add(&["container"], &mut patterns);
    }
    if node.node_type == "TEXT" {
        add(&["text", "typography"], &mut patterns);
    }
    if node.node_type == "RECTANGLE" && has_interactive_name(node) {
        add(&["clickable", "interactive"], &mut patterns);
    }

    // By layout
    match node.layout_mode() {
        LayoutMode::Horizontal => add(&["horizontal-layout", "flex-layout"], &mut patterns),
        LayoutMode::Vertical => add(&["vertical-layout", "flex-layout"], &mut patterns),
        LayoutMode::None => {}
    }

    // By name
    let name = node.name.to_lowercase();
    if name.contains("button") || name.contains("btn") {
        add(&["button", "clickable", "call-to-action"], &mut patterns);
    }
    if name.contains("hero") || name.contains("banner") {
        add(&["hero", "large-header", "banner", "featured-section"], &mut patterns);
    }
    if name.contains("card") {
        add(&["card", "container", "bordered-section", "content-block"], &mut patterns);
    }
    if name.contains("nav") || name.contains("menu") {
        add(&["navigation", "horizontal-menu", "header"], &mut patterns);
    }
    if name.contains("input") || name.contains("field") {
        add(&["input", "text-field", "form-control", "user-input"], &mut patterns);
    }
    if name.contains("modal") || name.contains("dialog") {
        add(&["modal", "dialog", "overlay"], &mut patterns);
    }
    if name.contains("footer") {
        add(&["footer", "bottom-section"], &mut patterns);
    }

    // By visual properties
    if !node.fills.is_empty() {
        add(&["colored-background"], &mut patterns);
    }
    if !node.strokes.is_empty() {
        add(&["bordered-section"], &mut patterns);
    }
    if node.effects.iter().any(|e| e.is_shadow()) {
        add(&["elevated", "card-like"], &mut patterns);
    }

    patterns
}

/// Split a lowercase node name on whitespace, hyphen, underscore and slash,
/// keeping tokens longer than two characters.
pub fn extract_keywords(node: &DesignNode) -> Vec<String> {
    node.name
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_' || c == '/')
        .filter(|word| word.len() > 2)
        .map(String::from)
        .collect()
}

/// Weighted pattern + keyword similarity, clamped to [0, 1]. Either term
/// contributes zero when its denominator is empty.
fn calculate_confidence(
    patterns: &[String],
    keywords: &[String],
    component: &CatalogComponent,
) -> f64 {
    let mut score = 0.0;

    if !component.visual_patterns.is_empty() {
        let pattern_matches = patterns
            .iter()
            .filter(|p| component.visual_patterns.contains(p))
            .count();
        score += pattern_matches as f64 / component.visual_patterns.len() as f64 * PATTERN_WEIGHT;
    }

    if !keywords.is_empty() {
        let keyword_matches = keywords
            .iter()
            .filter(|k| {
                component
                    .figma_keywords
                    .iter()
                    .any(|ck| ck.contains(*k) || k.contains(ck))
            })
            .count();
        score += keyword_matches as f64 / keywords.len() as f64 * KEYWORD_WEIGHT;
    }

    score.min(1.0)
}

/// Node patterns that also appear in the catalog entry, in node order.
fn matched_patterns(node_patterns: &[String], component_patterns: &[String]) -> Vec<String> {
    node_patterns
        .iter()
        .filter(|p| component_patterns.contains(p))
        .cloned()
        .collect()
}

/// Derive prop suggestions from the node against the entry's declared
/// props and variant axes.
fn suggest_props(node: &DesignNode, component: &CatalogComponent) -> Vec<SuggestedProp> {
    let mut props = Vec::new();
    let name = node.name.to_lowercase();

    if let Some(text) = node.characters.as_deref().filter(|t| !t.is_empty()) {
        if component.has_prop("children") {
            props.push(SuggestedProp::text("children", text));
        }
    }

    if let Some(axis) = component.variant_axis("variant") {
        // First declared value wins.
        if let Some(value) = axis
            .values
            .iter()
            .find(|value| name.contains(&value.to_lowercase()))
        {
            props.push(SuggestedProp::text("variant", value.clone()));
        }
    }

    if component.variant_axis("size").is_some() {
        let size = if name.contains("large") || name.contains("lg") {
            "large"
        } else if name.contains("small") || name.contains("sm") {
            "small"
        } else {
            "medium"
        };
        props.push(SuggestedProp::text("size", size));
    }

    if component.has_prop("className") {
        props.push(SuggestedProp::text("className", ""));
    }

    props
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_catalog::{PropSpec, VariantAxis};
    use prism_design::{Paint, Rgba};
    use std::collections::BTreeMap;

    fn primary_button() -> DesignNode {
        let mut node = DesignNode::new("4:38", "Primary Button", "RECTANGLE");
        node.fills = vec![Paint::solid(Rgba::opaque(0.23, 0.51, 0.96))];
        node
    }

    fn button_component() -> CatalogComponent {
        let mut props = BTreeMap::new();
        props.insert(
            "children".to_string(),
            PropSpec {
                declared_type: "React.ReactNode".to_string(),
                required: true,
            },
        );
        CatalogComponent {
            name: "Button".to_string(),
            import_path: "@acme/ui/forms".to_string(),
            visual_patterns: vec!["button".to_string(), "clickable".to_string()],
            figma_keywords: vec!["button".to_string(), "btn".to_string()],
            props,
            ..Default::default()
        }
    }

    #[test]
    fn detects_button_pattern_set() {
        let patterns = detect_patterns(&primary_button());
        for expected in ["button", "clickable", "call-to-action", "colored-background"] {
            assert!(patterns.contains(&expected.to_string()), "missing {expected}");
        }
        // Set semantics: "clickable" fires from two rules but appears once.
        assert_eq!(patterns.iter().filter(|p| *p == "clickable").count(), 1);
    }

    #[test]
    fn keyword_extraction_drops_short_tokens() {
        let node = DesignNode::new("1:1", "CTA_v2 / Hero-Banner", "FRAME");
        assert_eq!(extract_keywords(&node), vec!["cta", "hero", "banner"]);
    }

    #[test]
    fn primary_button_scores_point_eight() {
        let matcher = Matcher::new();
        let matches = matcher.match_node(&primary_button(), &[button_component()]);

        assert_eq!(matches.len(), 1);
        // 0.6 * (2/2 patterns) + 0.4 * (1/2 keywords) = 0.8
        assert!((matches[0].confidence - 0.8).abs() < 1e-9);
        assert_eq!(matches[0].matched_patterns, vec!["clickable", "button"]);
    }

    #[test]
    fn confidence_stays_within_bounds() {
        let matcher = Matcher::new();
        let components = vec![
            button_component(),
            CatalogComponent {
                name: "Everything".to_string(),
                visual_patterns: vec!["button".to_string()],
                figma_keywords: vec!["primary".to_string(), "button".to_string()],
                ..Default::default()
            },
        ];

        for m in matcher.match_node(&primary_button(), &components) {
            assert!(m.confidence >= 0.0 && m.confidence <= 1.0);
        }
    }

    #[test]
    fn low_confidence_matches_are_dropped() {
        let matcher = Matcher::new();
        let unrelated = CatalogComponent {
            name: "Tooltip".to_string(),
            visual_patterns: vec!["overlay".to_string(), "floating".to_string()],
            figma_keywords: vec!["tooltip".to_string()],
            ..Default::default()
        };
        assert!(matcher.match_node(&primary_button(), &[unrelated]).is_empty());
    }

    #[test]
    fn tree_matches_are_non_increasing() {
        let mut root = DesignNode::new("0:1", "Page", "FRAME");
        root.children.push(primary_button());
        let mut weak = DesignNode::new("0:2", "Button Area", "FRAME");
        weak.children.push(primary_button());
        root.children.push(weak);

        let matcher = Matcher::new();
        let matches = matcher.match_tree(&root, &[button_component()]).unwrap();

        assert!(matches.len() >= 2);
        for window in matches.windows(2) {
            assert!(window[0].confidence >= window[1].confidence);
        }
    }

    #[test]
    fn suggests_props_from_declarations() {
        let mut component = button_component();
        component.variants = vec![
            VariantAxis {
                name: "variant".to_string(),
                values: vec!["primary".to_string(), "secondary".to_string()],
            },
            VariantAxis {
                name: "size".to_string(),
                values: vec!["small".to_string(), "medium".to_string(), "large".to_string()],
            },
        ];
        component.props.insert(
            "className".to_string(),
            PropSpec {
                declared_type: "string".to_string(),
                required: false,
            },
        );

        let mut node = primary_button();
        node.name = "Primary Button Large".to_string();
        node.characters = Some("Get Started".to_string());

        let matches = Matcher::new().match_node(&node, &[component]);
        let props = &matches[0].suggested_props;

        assert_eq!(props[0], SuggestedProp::text("children", "Get Started"));
        assert_eq!(props[1], SuggestedProp::text("variant", "primary"));
        assert_eq!(props[2], SuggestedProp::text("size", "large"));
        assert_eq!(props[3], SuggestedProp::text("className", ""));
    }

    #[test]
    fn size_defaults_to_medium() {
        let mut component = button_component();
        component.variants = vec![VariantAxis {
            name: "size".to_string(),
            values: vec!["small".to_string(), "large".to_string()],
        }];

        let matches = Matcher::new().match_node(&primary_button(), &[component]);
        assert!(matches[0]
            .suggested_props
            .contains(&SuggestedProp::text("size", "medium")));
    }
}
