use prism_catalog::CatalogComponent;
use prism_common::Result;
use prism_extract::{Complexity, ComponentNode, DesignTokens, ExtractedDesign};
use prism_llm::{CompletionOptions, CompletionProvider};
use prism_style::{layout_to_classes, styles_to_classes};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// AI-generated component artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedComponent {
    pub component_name: String,
    pub component_code: String,
    pub props_interface: String,
    pub imports: Vec<String>,
    pub dependencies: Vec<String>,
    pub model_id: String,
    pub generation_prompt: String,
    pub complexity: Complexity,
}

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub component_name: Option<String>,
    pub include_typescript: bool,
    pub include_comments: bool,
    pub split_strategy: SplitStrategy,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            component_name: None,
            include_typescript: true,
            include_comments: false,
            split_strategy: SplitStrategy::Auto,
        }
    }
}

/// Accepted for interface stability; generation currently always produces
/// a single component regardless of strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitStrategy {
    #[default]
    Auto,
    None,
}

/// Generates React components from extracted designs through the
/// configured completion provider.
pub struct CodeGenerator {
    provider: Arc<dyn CompletionProvider>,
}

impl CodeGenerator {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    pub async fn generate(
        &self,
        design: &ExtractedDesign,
        options: &GenerateOptions,
        catalog: &[CatalogComponent],
    ) -> Result<GeneratedComponent> {
        let component_name = options
            .component_name
            .clone()
            .unwrap_or_else(|| sanitize_component_name(&design.root_name));

        let prompt = build_generation_prompt(design, &component_name, options, catalog);
        info!(
            "Generating component '{}' ({} prompt characters)",
            component_name,
            prompt.len()
        );

        let response = self
            .provider
            .complete(&prompt, &CompletionOptions::default())
            .await?;

        let parsed = parse_generated_code(&response, &component_name);
        debug!(
            "Parsed {} code characters, {} imports",
            parsed.code.len(),
            parsed.imports.len()
        );

        Ok(GeneratedComponent {
            component_name,
            component_code: parsed.code,
            props_interface: parsed.props_interface,
            imports: parsed.imports,
            dependencies: vec!["react".to_string(), "lucide-react".to_string()],
            model_id: self.provider.model_id().to_string(),
            generation_prompt: prompt,
            complexity: design.metadata.complexity,
        })
    }

    /// Strategy-aware entry point. The split strategy is a deliberate
    /// no-op: every strategy yields exactly one component.
    pub async fn generate_components(
        &self,
        design: &ExtractedDesign,
        options: &GenerateOptions,
        catalog: &[CatalogComponent],
    ) -> Result<Vec<GeneratedComponent>> {
        let component = self.generate(design, options, catalog).await?;
        Ok(vec![component])
    }
}

/// One prompt embedding the tree description, token summary, metadata and
/// (when a catalog is loaded) the must-use component library block.
pub fn build_generation_prompt(
    design: &ExtractedDesign,
    component_name: &str,
    options: &GenerateOptions,
    catalog: &[CatalogComponent],
) -> String {
    let component_description = describe_components(&design.component_tree);
    let tokens_description = describe_design_tokens(&design.design_tokens);
    let metadata = &design.metadata;

    let language = if options.include_typescript {
        "TypeScript"
    } else {
        "JavaScript"
    };
    let comments_rule = if options.include_comments {
        "Include helpful comments"
    } else {
        "Do NOT include comments"
    };

    let library_block = if catalog.is_empty() {
        String::new()
    } else {
        let entries: Vec<String> = catalog
            .iter()
            .map(|component| {
                format!(
                    "- {} (import from '{}'): {}",
                    component.name, component.import_path, component.description
                )
            })
            .collect();
        format!(
            "\n## Component Library\nYou MUST prefer these existing design-system components over ad hoc markup:\n{}\n",
            entries.join("\n")
        )
    };

    format!(
        r#"You are an expert React developer. Generate a clean, production-ready React component based on this design.

## Component Name
{component_name}

## Design Analysis
{component_description}

## Design Tokens
{tokens_description}

## Metadata
- Total Elements: {total}
- Has Interactive Elements: {interactive}
- Has Images: {images}
- Has Text: {text}
- Complexity: {complexity}
{library_block}
## Requirements
1. Use React with {language}
2. Use utility classes for all styling (no inline styles)
3. Use lucide-react for icons where appropriate
4. Make the component responsive (mobile-first approach)
5. Include proper TypeScript interfaces for props
6. Use semantic HTML elements
7. Make interactive elements accessible (ARIA labels, keyboard navigation)
8. {comments_rule}
9. Use functional components with hooks

## Output Format
Provide ONLY the code in a single fenced code block:

```tsx
import React from 'react';

interface {component_name}Props {{
  // props here
}}

export function {component_name}({{ ...props }}: {component_name}Props) {{
  return (
    // JSX here
  );
}}
```

Generate the component now. Be creative but faithful to the design structure."#,
        total = metadata.total_nodes,
        interactive = metadata.has_interactive_elements,
        images = metadata.has_images,
        text = metadata.has_text,
        complexity = metadata.complexity.as_str(),
    )
}

/// Indented depth-first description, one line per node with its role,
/// utility classes and text content.
fn describe_components(tree: &[ComponentNode]) -> String {
    let mut lines = Vec::new();

    fn describe(nodes: &[ComponentNode], depth: usize, lines: &mut Vec<String>) {
        let indent = "  ".repeat(depth);

        for node in nodes {
            let mut classes = layout_to_classes(&node.layout);
            classes.extend(styles_to_classes(&node.styles));

            lines.push(format!(
                "{indent}- {} ({}, role: {})",
                node.name,
                node.node_type,
                node.role.as_str()
            ));

            if !classes.is_empty() {
                lines.push(format!("{indent}  Classes: {}", classes.join(" ")));
            }
            if let Some(content) = &node.content {
                lines.push(format!("{indent}  Content: \"{content}\""));
            }

            if !node.children.is_empty() {
                describe(&node.children, depth + 1, lines);
            }
        }
    }

    describe(tree, 0, &mut lines);
    lines.join("\n")
}

fn describe_design_tokens(tokens: &DesignTokens) -> String {
    let mut lines = Vec::new();

    if !tokens.colors.is_empty() {
        lines.push("Colors:".to_string());
        for (name, value) in &tokens.colors {
            lines.push(format!("  - {name}: {value}"));
        }
    }

    if !tokens.spacing.is_empty() {
        lines.push(format!("Spacing: {}px", join_numbers(&tokens.spacing)));
    }
    if !tokens.font_sizes.is_empty() {
        lines.push(format!("Font Sizes: {}px", join_numbers(&tokens.font_sizes)));
    }
    if !tokens.border_radii.is_empty() {
        lines.push(format!(
            "Border Radii: {}px",
            join_numbers(&tokens.border_radii)
        ));
    }

    lines.join("\n")
}

fn join_numbers(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, PartialEq)]
pub struct ParsedCode {
    pub code: String,
    pub props_interface: String,
    pub imports: Vec<String>,
}

/// Best-effort response parsing: first fenced code block (raw text when no
/// fence is present), line-anchored imports, and a brace-matched props
/// interface named after the component.
pub fn parse_generated_code(response: &str, component_name: &str) -> ParsedCode {
    let fence_re = Regex::new(r"(?s)```(?:tsx|jsx|typescript|javascript)?\n(.+?)\n```").unwrap();
    let code = fence_re
        .captures(response)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| response.to_string());

    let import_re = Regex::new(r"(?m)^import .+;$").unwrap();
    let imports: Vec<String> = import_re
        .find_iter(&code)
        .map(|m| m.as_str().trim().to_string())
        .collect();

    let props_interface = extract_interface(&code, &format!("{component_name}Props"));

    ParsedCode {
        code: code.trim().to_string(),
        props_interface,
        imports,
    }
}

/// Extract `interface <name> { ... }` by matching braces, tolerating nested
/// blocks. Empty string when the interface is absent or unterminated.
fn extract_interface(code: &str, interface_name: &str) -> String {
    let header_re = Regex::new(&format!(
        r"interface\s+{}\s*\{{",
        regex::escape(interface_name)
    ))
    .unwrap();

    let Some(header) = header_re.find(code) else {
        return String::new();
    };

    let body_start = header.end();
    let mut depth = 1usize;

    for (offset, ch) in code[body_start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return code[header.start()..body_start + offset + 1].to_string();
                }
            }
            _ => {}
        }
    }

    String::new()
}

/// Derive a PascalCase component name from a free-form node name.
pub fn sanitize_component_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();

    let mut sanitized: String = cleaned
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect();

    if sanitized.is_empty() {
        sanitized = "Component".to_string();
    }
    if !sanitized.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
        sanitized = format!("Component{sanitized}");
    }

    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use prism_design::DesignNode;
    use prism_extract::Extractor;

    struct CannedProvider(String);

    #[async_trait]
    impl CompletionProvider for CannedProvider {
        fn model_id(&self) -> &str {
            "canned-model"
        }

        async fn complete(&self, _prompt: &str, _options: &CompletionOptions) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    const RESPONSE: &str = "Here is your component:\n```tsx\nimport React from 'react';\nimport { Star } from 'lucide-react';\n\ninterface HeroProps {\n  title: string;\n  meta: { tags: string[] };\n}\n\nexport function Hero({ title }: HeroProps) {\n  return <div>{title}</div>;\n}\n```\nLet me know if you need changes.";

    #[test]
    fn parses_first_fenced_block() {
        let parsed = parse_generated_code(RESPONSE, "Hero");
        assert!(parsed.code.starts_with("import React"));
        assert!(!parsed.code.contains("Here is your component"));
        assert!(!parsed.code.contains("Let me know"));
    }

    #[test]
    fn extracts_line_anchored_imports() {
        let parsed = parse_generated_code(RESPONSE, "Hero");
        assert_eq!(
            parsed.imports,
            vec![
                "import React from 'react';",
                "import { Star } from 'lucide-react';",
            ]
        );
    }

    #[test]
    fn brace_matching_survives_nested_blocks() {
        let parsed = parse_generated_code(RESPONSE, "Hero");
        assert!(parsed.props_interface.starts_with("interface HeroProps {"));
        assert!(parsed.props_interface.contains("tags: string[]"));
        assert!(parsed.props_interface.ends_with('}'));
    }

    #[test]
    fn unfenced_response_is_used_verbatim() {
        let parsed = parse_generated_code("const x = 1;", "Hero");
        assert_eq!(parsed.code, "const x = 1;");
        assert_eq!(parsed.props_interface, "");
    }

    #[test]
    fn sanitizes_component_names() {
        assert_eq!(sanitize_component_name("hero section v2!"), "HeroSectionV2");
        assert_eq!(sanitize_component_name("Primary Button"), "PrimaryButton");
        assert_eq!(sanitize_component_name("***"), "Component");
        assert_eq!(sanitize_component_name("42 grid"), "Component42Grid");
    }

    fn sample_design() -> ExtractedDesign {
        let mut root = DesignNode::new("0:1", "Hero Section", "FRAME");
        root.layout_mode = Some(prism_design::LayoutMode::Vertical);
        let mut title = DesignNode::new("0:2", "Title", "TEXT");
        title.characters = Some("Welcome".to_string());
        root.children.push(title);
        Extractor::new().extract(&root).unwrap()
    }

    #[test]
    fn prompt_embeds_tree_and_catalog_block() {
        let design = sample_design();
        let catalog = vec![CatalogComponent {
            name: "Hero".to_string(),
            import_path: "@acme/ui/layout".to_string(),
            description: "Large header section".to_string(),
            ..Default::default()
        }];

        let prompt =
            build_generation_prompt(&design, "HeroSection", &GenerateOptions::default(), &catalog);

        assert!(prompt.contains("- Hero Section (FRAME, role: container)"));
        assert!(prompt.contains("Content: \"Welcome\""));
        assert!(prompt.contains("## Component Library"));
        assert!(prompt.contains("- Hero (import from '@acme/ui/layout')"));
        assert!(prompt.contains("interface HeroSectionProps"));
    }

    #[test]
    fn prompt_omits_library_block_without_catalog() {
        let design = sample_design();
        let prompt =
            build_generation_prompt(&design, "HeroSection", &GenerateOptions::default(), &[]);
        assert!(!prompt.contains("## Component Library"));
    }

    #[tokio::test]
    async fn split_strategy_always_yields_one_component() {
        let generator = CodeGenerator::new(Arc::new(CannedProvider(RESPONSE.to_string())));
        let design = sample_design();

        for strategy in [SplitStrategy::Auto, SplitStrategy::None] {
            let options = GenerateOptions {
                split_strategy: strategy,
                ..Default::default()
            };
            let generated = generator
                .generate_components(&design, &options, &[])
                .await
                .unwrap();
            assert_eq!(generated.len(), 1);
            assert_eq!(generated[0].model_id, "canned-model");
        }
    }
}
