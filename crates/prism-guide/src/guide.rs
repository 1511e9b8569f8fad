use crate::types::{ComponentUsage, GuideTokens, ImplementationGuide, QuickPrompt};
use prism_design::{DesignNode, PaintType};
use prism_extract::rgba_to_hex;
use prism_match::{ComponentMatch, PropValue, SuggestedProp, PRESENTATION_THRESHOLD};
use tracing::debug;

/// Builds implementation guides from a deduplicated match set.
pub struct GuideBuilder;

impl Default for GuideBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GuideBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build_guide(&self, matches: &[ComponentMatch], root: &DesignNode) -> ImplementationGuide {
        let presentable: Vec<&ComponentMatch> = matches
            .iter()
            .filter(|m| m.confidence > PRESENTATION_THRESHOLD)
            .collect();
        let unique = deduplicate_matches(&presentable);
        debug!(
            "Building guide from {} unique matches ({} raw)",
            unique.len(),
            matches.len()
        );

        let overview = generate_overview(&unique);
        let imports = generate_imports(&unique);
        let component_usage = generate_component_usage(&unique);
        let full_code = generate_full_code(&imports, &component_usage);
        let customization_notes = generate_customization_notes(&unique);
        let design_tokens = extract_root_tokens(root);
        let quick_prompts = generate_quick_prompts(&unique);

        ImplementationGuide {
            overview,
            imports,
            component_usage,
            full_code,
            customization_notes,
            design_tokens,
            quick_prompts,
        }
    }

    /// Render a guide as a single markdown document.
    pub fn to_markdown(&self, guide: &ImplementationGuide) -> String {
        let mut md = String::from("# Implementation Guide\n\n");

        md.push_str("## Overview\n\n");
        md.push_str(&guide.overview);
        md.push_str("\n\n");

        md.push_str("## Components Used\n\n");
        for usage in &guide.component_usage {
            md.push_str(&format!("### {}\n\n", usage.component_name));
            md.push_str(&format!("{}\n\n", usage.figma_reference));
            md.push_str("```tsx\n");
            md.push_str(&usage.code_snippet);
            md.push_str("\n```\n\n");
        }

        md.push_str("## Full Implementation\n\n");
        md.push_str("```tsx\n");
        md.push_str(&guide.full_code);
        md.push_str("```\n\n");

        md.push_str("## Design Tokens\n\n");
        if !guide.design_tokens.colors.is_empty() {
            md.push_str("### Colors\n\n");
            for (name, value) in &guide.design_tokens.colors {
                md.push_str(&format!("- **{name}**: `{value}`\n"));
            }
            md.push('\n');
        }

        md.push_str("## Customization Notes\n\n");
        md.push_str(&guide.customization_notes.join("\n"));
        md.push_str("\n\n");

        md.push_str("## Quick Customization Questions\n\n");
        for prompt in &guide.quick_prompts {
            md.push_str(&format!("- **{}**: {}\n", prompt.category, prompt.question));
        }
        md.push('\n');

        md
    }
}

/// Keep the highest-confidence match per component name; ties keep the
/// first encountered, and surviving entries stay in first-encounter order.
fn deduplicate_matches(matches: &[&ComponentMatch]) -> Vec<ComponentMatch> {
    let mut unique: Vec<ComponentMatch> = Vec::new();

    for m in matches {
        match unique
            .iter_mut()
            .find(|existing| existing.component_name == m.component_name)
        {
            Some(existing) => {
                if m.confidence > existing.confidence {
                    *existing = (*m).clone();
                }
            }
            None => unique.push((*m).clone()),
        }
    }

    unique
}

fn generate_overview(matches: &[ComponentMatch]) -> String {
    let component_names: Vec<&str> = matches.iter().map(|m| m.component_name.as_str()).collect();

    format!(
        "This design can be implemented using {} existing design-system components: {}.\n\n\
         Below is a step-by-step implementation guide with code examples.",
        matches.len(),
        component_names.join(", ")
    )
}

/// Group matches by import path, one statement per group, components in
/// discovery order.
fn generate_imports(matches: &[ComponentMatch]) -> Vec<String> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();

    for m in matches {
        match groups.iter_mut().find(|(path, _)| *path == m.component_path) {
            Some((_, names)) => names.push(m.component_name.clone()),
            None => groups.push((m.component_path.clone(), vec![m.component_name.clone()])),
        }
    }

    groups
        .into_iter()
        .map(|(path, names)| format!("import {{ {} }} from '{path}';", names.join(", ")))
        .collect()
}

fn generate_component_usage(matches: &[ComponentMatch]) -> Vec<ComponentUsage> {
    matches
        .iter()
        .map(|m| {
            let percent = (m.confidence * 100.0).round() as i64;
            ComponentUsage {
                component_name: m.component_name.clone(),
                props: m.suggested_props.clone(),
                code_snippet: render_snippet(&m.component_name, &m.suggested_props),
                figma_reference: format!(
                    "Figma node: \"{}\" ({percent}% match)",
                    m.figma_node_name
                ),
            }
        })
        .collect()
}

/// Render a self-closing usage snippet; `children` renders as inner text
/// between opening and closing tags instead of an attribute.
fn render_snippet(component_name: &str, props: &[SuggestedProp]) -> String {
    let attrs = format_props(props);
    match children_text(props) {
        Some(children) => format!(
            "<{component_name}{attrs}>{children}</{component_name}>"
        ),
        None => format!("<{component_name}{attrs} />"),
    }
}

fn children_text(props: &[SuggestedProp]) -> Option<&str> {
    props.iter().find_map(|prop| {
        if prop.name != "children" {
            return None;
        }
        match &prop.value {
            PropValue::Text(text) => Some(text.as_str()),
            _ => None,
        }
    })
}

/// JSX attribute formatting: strings are quoted, `true` renders bare,
/// `false` is omitted, everything else is JSON inside braces.
fn format_props(props: &[SuggestedProp]) -> String {
    let rendered: Vec<String> = props
        .iter()
        .filter_map(|prop| match &prop.value {
            PropValue::Text(_) if prop.name == "children" => None,
            PropValue::Text(value) => Some(format!("{}=\"{}\"", prop.name, value)),
            PropValue::Flag(true) => Some(prop.name.clone()),
            PropValue::Flag(false) => None,
            PropValue::Json(value) => Some(format!("{}={{{}}}", prop.name, value)),
        })
        .collect();

    if rendered.is_empty() {
        String::new()
    } else {
        format!(" {}", rendered.join(" "))
    }
}

fn generate_full_code(imports: &[String], usage: &[ComponentUsage]) -> String {
    let mut code = String::from("// Implementation using design-system components\n\n");
    code.push_str(&imports.join("\n"));
    code.push_str("\n\n");
    code.push_str("export default function DesignImplementation() {\n");
    code.push_str("  return (\n");
    code.push_str("    <div className=\"design-container\">\n");

    for component in usage {
        code.push_str(&format!("      {}\n", component.code_snippet));
    }

    code.push_str("    </div>\n");
    code.push_str("  );\n");
    code.push_str("}\n");

    code
}

fn generate_customization_notes(matches: &[ComponentMatch]) -> Vec<String> {
    let mut notes = Vec::new();

    notes.push("## Matched Components".to_string());
    for m in matches {
        let percent = (m.confidence * 100.0).round() as i64;
        notes.push(format!(
            "- **{}**: {percent}% match (patterns: {})",
            m.component_name,
            m.matched_patterns.join(", ")
        ));
    }

    notes.push("\n## Design Customization".to_string());
    notes.push("- Extract colors from the design and add them to your theme config".to_string());
    notes.push("- Verify spacing matches your design system scale (8px grid)".to_string());
    notes.push("- Check typography scales (font-size, line-height, font-weight)".to_string());

    notes.push("\n## Responsive Considerations".to_string());
    notes.push("- Add breakpoint-specific classes (sm:, md:, lg:)".to_string());
    notes.push("- Test on mobile, tablet, and desktop viewports".to_string());
    notes.push("- Consider touch targets for mobile (min 44x44px)".to_string());

    notes.push("\n## Accessibility".to_string());
    notes.push("- Verify color contrast ratios (WCAG AA: 4.5:1 for text)".to_string());
    notes.push("- Add ARIA labels where needed".to_string());
    notes.push("- Test keyboard navigation".to_string());
    notes.push("- Ensure focus indicators are visible".to_string());

    notes
}

/// Root-node token summary: first-level fills, padding and gap, text style.
fn extract_root_tokens(root: &DesignNode) -> GuideTokens {
    let mut tokens = GuideTokens::default();

    for (index, fill) in root.fills.iter().enumerate() {
        if fill.paint_type == PaintType::Solid {
            if let Some(color) = &fill.color {
                tokens
                    .colors
                    .insert(format!("color-{}", index + 1), rgba_to_hex(color));
            }
        }
    }

    if let Some(padding) = root.padding_left.filter(|p| *p != 0.0) {
        tokens.spacing.insert("padding-x".to_string(), format!("{padding}px"));
    }
    if let Some(padding) = root.padding_top.filter(|p| *p != 0.0) {
        tokens.spacing.insert("padding-y".to_string(), format!("{padding}px"));
    }
    if let Some(gap) = root.item_spacing.filter(|g| *g != 0.0) {
        tokens.spacing.insert("gap".to_string(), format!("{gap}px"));
    }

    if let Some(style) = &root.style {
        if let Some(size) = style.font_size {
            tokens
                .typography
                .insert("font-size".to_string(), format!("{size}px"));
        }
        if let Some(weight) = style.font_weight {
            tokens
                .typography
                .insert("font-weight".to_string(), format!("{weight}"));
        }
        if let Some(line_height) = style.line_height_px {
            tokens
                .typography
                .insert("line-height".to_string(), format!("{line_height}px"));
        }
    }

    tokens
}

/// Fixed base prompts plus entries gated on matched component names.
fn generate_quick_prompts(matches: &[ComponentMatch]) -> Vec<QuickPrompt> {
    let mut prompts = vec![
        QuickPrompt::new("Do you want to customize the colors?", "styling", "all"),
        QuickPrompt::new(
            "Do you need to adjust spacing (padding, margins, gaps)?",
            "styling",
            "all",
        ),
        QuickPrompt::new(
            "Should this design be responsive? (mobile, tablet, desktop)",
            "responsive",
            "all",
        ),
    ];

    let name_contains =
        |needle: &str| matches.iter().any(|m| m.component_name.to_lowercase().contains(needle));

    if name_contains("button") {
        prompts.push(QuickPrompt::new(
            "What should happen when the button is clicked?",
            "behavior",
            "Button",
        ));
    }
    if name_contains("nav") {
        prompts.push(QuickPrompt::new(
            "Do you need a mobile menu for the navigation?",
            "responsive",
            "Navigation",
        ));
    }
    if name_contains("form") || name_contains("input") {
        prompts.push(QuickPrompt::new(
            "Do you need form validation?",
            "behavior",
            "Form",
        ));
    }

    prompts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_match(name: &str, path: &str, confidence: f64) -> ComponentMatch {
        ComponentMatch {
            component_name: name.to_string(),
            component_path: path.to_string(),
            confidence,
            matched_patterns: vec!["button".to_string()],
            suggested_props: Vec::new(),
            figma_node_id: "1:1".to_string(),
            figma_node_name: format!("{name} node"),
        }
    }

    #[test]
    fn dedup_keeps_highest_confidence() {
        let first = test_match("Button", "@acme/ui", 0.8);
        let second = test_match("Button", "@acme/ui", 0.6);
        let unique = deduplicate_matches(&[&second, &first]);

        assert_eq!(unique.len(), 1);
        assert!((unique[0].confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn dedup_ties_keep_first() {
        let mut first = test_match("Button", "@acme/ui", 0.7);
        first.figma_node_id = "first".to_string();
        let mut second = test_match("Button", "@acme/ui", 0.7);
        second.figma_node_id = "second".to_string();

        let unique = deduplicate_matches(&[&first, &second]);
        assert_eq!(unique[0].figma_node_id, "first");
    }

    #[test]
    fn imports_group_by_path_in_discovery_order() {
        let matches = vec![
            test_match("Button", "@acme/ui/forms", 0.8),
            test_match("Card", "@acme/ui/display", 0.7),
            test_match("Input", "@acme/ui/forms", 0.6),
        ];
        let imports = generate_imports(&matches);

        assert_eq!(
            imports,
            vec![
                "import { Button, Input } from '@acme/ui/forms';",
                "import { Card } from '@acme/ui/display';",
            ]
        );
    }

    #[test]
    fn snippet_renders_children_as_inner_text() {
        let props = vec![
            SuggestedProp::text("children", "Get Started"),
            SuggestedProp::text("variant", "primary"),
        ];
        assert_eq!(
            render_snippet("Button", &props),
            "<Button variant=\"primary\">Get Started</Button>"
        );
    }

    #[test]
    fn props_format_booleans_and_json() {
        let props = vec![
            SuggestedProp {
                name: "disabled".to_string(),
                value: PropValue::Flag(true),
            },
            SuggestedProp {
                name: "hidden".to_string(),
                value: PropValue::Flag(false),
            },
            SuggestedProp {
                name: "columns".to_string(),
                value: PropValue::Json(serde_json::json!(3)),
            },
        ];
        assert_eq!(format_props(&props), " disabled columns={3}");
    }

    #[test]
    fn guide_filters_below_presentation_threshold() {
        let matches = vec![
            test_match("Button", "@acme/ui", 0.8),
            test_match("Card", "@acme/ui", 0.4),
        ];
        let guide = GuideBuilder::new().build_guide(&matches, &DesignNode::default());

        assert_eq!(guide.component_usage.len(), 1);
        assert_eq!(guide.component_usage[0].component_name, "Button");
    }

    #[test]
    fn full_code_wraps_snippets_in_container() {
        let matches = vec![test_match("Button", "@acme/ui", 0.8)];
        let guide = GuideBuilder::new().build_guide(&matches, &DesignNode::default());

        assert!(guide.full_code.contains("design-container"));
        assert!(guide.full_code.contains("<Button />"));
        assert!(guide
            .full_code
            .starts_with("// Implementation using design-system components"));
    }

    #[test]
    fn quick_prompts_gate_on_component_names() {
        let matches = vec![
            test_match("PrimaryButton", "@acme/ui", 0.8),
            test_match("NavBar", "@acme/ui", 0.7),
        ];
        let guide = GuideBuilder::new().build_guide(&matches, &DesignNode::default());

        let categories: Vec<&str> = guide
            .quick_prompts
            .iter()
            .map(|p| p.applies_to.as_str())
            .collect();
        assert!(categories.contains(&"Button"));
        assert!(categories.contains(&"Navigation"));
        assert!(!categories.contains(&"Form"));
    }

    #[test]
    fn markdown_includes_all_sections() {
        let matches = vec![test_match("Button", "@acme/ui", 0.8)];
        let builder = GuideBuilder::new();
        let guide = builder.build_guide(&matches, &DesignNode::default());
        let md = builder.to_markdown(&guide);

        for heading in [
            "# Implementation Guide",
            "## Overview",
            "## Components Used",
            "## Full Implementation",
            "## Customization Notes",
            "## Quick Customization Questions",
        ] {
            assert!(md.contains(heading), "missing {heading}");
        }
        assert!(md.contains("80% match"));
    }
}
