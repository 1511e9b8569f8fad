use crate::model::{CatalogComponent, ComponentCategory, PropSpec, VariantAxis};
use prism_common::{PrismError, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Extracts a [`CatalogComponent`] from one source file. Parsers are
/// pluggable so the scanner stays decoupled from any particular component
/// library's source language.
pub trait ComponentParser: Send + Sync {
    /// Returns `None` when the file is not a component source.
    fn parse(&self, file: &SourceFile) -> Option<CatalogComponent>;
}

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub path: String,
    pub content: String,
    pub source_url: String,
}

/// Static text-pattern parser for React/TSX component sources.
pub struct ReactComponentParser {
    import_prefix: String,
    props_re: Regex,
    prop_line_re: Regex,
    variant_re: Regex,
    size_re: Regex,
    jsdoc_re: Regex,
    comment_re: Regex,
    example_re: Regex,
}

impl ReactComponentParser {
    pub fn new(import_prefix: impl Into<String>) -> Self {
        Self {
            import_prefix: import_prefix.into(),
            props_re: Regex::new(r"(?:interface|type)\s+\w+Props\s*=?\s*\{([^}]+)\}").unwrap(),
            prop_line_re: Regex::new(r"(\w+)(\?)?:\s*(.+?)(?:;|$)").unwrap(),
            variant_re: Regex::new(r#"variant\??:\s*((?:['"][\w-]+['"]\s*\|\s*)+['"][\w-]+['"])"#)
                .unwrap(),
            size_re: Regex::new(r#"size\??:\s*((?:['"][\w-]+['"]\s*\|\s*)+['"][\w-]+['"])"#)
                .unwrap(),
            jsdoc_re: Regex::new(r"/\*\*\s*\n\s*\*\s*(.+?)\n").unwrap(),
            comment_re: Regex::new(r"(?i)//\s*(.+?component.+)").unwrap(),
            example_re: Regex::new(r"(?s)@example\s*\n\s*\*\s*```(?:tsx?|jsx?)?\n(.*?)```").unwrap(),
        }
    }

    fn component_name(&self, file_name: &str) -> String {
        file_name
            .trim_end_matches(".tsx")
            .trim_end_matches(".jsx")
            .to_string()
    }

    fn import_path(&self, file_path: &str) -> String {
        // components/forms/Button.tsx -> {prefix}/forms
        if let Some(rest) = file_path
            .split_once("components/")
            .map(|(_, rest)| rest)
            .and_then(|rest| rest.rsplit_once('.'))
            .map(|(stem, _)| stem)
        {
            let dir = rest.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
            if dir.is_empty() {
                return self.import_prefix.clone();
            }
            return format!("{}/{}", self.import_prefix, dir);
        }
        file_path.to_string()
    }

    fn description(&self, content: &str) -> String {
        if let Some(caps) = self.jsdoc_re.captures(content) {
            return caps[1].trim().to_string();
        }
        self.comment_re
            .captures(content)
            .map(|caps| caps[1].trim().to_string())
            .unwrap_or_default()
    }

    fn categorize(&self, name: &str) -> ComponentCategory {
        let table: [(ComponentCategory, &[&str]); 6] = [
            (
                ComponentCategory::Navigation,
                &["navbar", "nav", "menu", "sidebar", "breadcrumb", "tabs"],
            ),
            (
                ComponentCategory::Layout,
                &["container", "grid", "flex", "section", "hero", "footer", "header"],
            ),
            (
                ComponentCategory::Forms,
                &["input", "button", "form", "select", "checkbox", "radio", "textarea"],
            ),
            (
                ComponentCategory::Display,
                &["card", "modal", "dialog", "tooltip", "popover", "badge", "avatar"],
            ),
            (
                ComponentCategory::Feedback,
                &["alert", "toast", "notification", "spinner", "loader", "progress"],
            ),
            (
                ComponentCategory::Typography,
                &["heading", "text", "paragraph", "title"],
            ),
        ];

        let lower = name.to_lowercase();
        for (category, keywords) in table {
            if keywords.iter().any(|keyword| lower.contains(keyword)) {
                return category;
            }
        }
        ComponentCategory::Other
    }

    fn props(&self, content: &str) -> BTreeMap<String, PropSpec> {
        let mut props = BTreeMap::new();

        let Some(caps) = self.props_re.captures(content) else {
            return props;
        };

        for line in caps[1].lines() {
            if let Some(prop) = self.prop_line_re.captures(line.trim()) {
                let name = prop[1].to_string();
                let optional = prop.get(2).is_some();
                let declared_type = prop[3].trim().trim_end_matches(';').to_string();
                props.insert(
                    name,
                    PropSpec {
                        declared_type,
                        required: !optional,
                    },
                );
            }
        }

        props
    }

    fn union_values(&self, re: &Regex, content: &str) -> Vec<String> {
        re.captures(content)
            .map(|caps| {
                caps[1]
                    .split('|')
                    .map(|value| value.trim().trim_matches(|c| c == '\'' || c == '"').to_string())
                    .filter(|value| !value.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn variants(&self, content: &str) -> Vec<VariantAxis> {
        let mut axes = Vec::new();

        let variant_values = self.union_values(&self.variant_re, content);
        if !variant_values.is_empty() {
            axes.push(VariantAxis {
                name: "variant".to_string(),
                values: variant_values,
            });
        }

        let size_values = self.union_values(&self.size_re, content);
        if !size_values.is_empty() {
            axes.push(VariantAxis {
                name: "size".to_string(),
                values: size_values,
            });
        }

        axes
    }

    fn visual_patterns(&self, name: &str, content: &str) -> Vec<String> {
        let mut patterns: Vec<String> = Vec::new();
        let lower = name.to_lowercase();

        let mut push = |tags: &[&str]| {
            for tag in tags {
                patterns.push(tag.to_string());
            }
        };

        if lower.contains("button") {
            push(&["clickable", "call-to-action", "interactive"]);
        }
        if lower.contains("hero") {
            push(&["large-header", "banner", "featured-section"]);
        }
        if lower.contains("card") {
            push(&["container", "bordered-section", "content-block"]);
        }
        if lower.contains("nav") {
            push(&["horizontal-menu", "navigation", "header"]);
        }
        if lower.contains("input") {
            push(&["text-field", "form-control", "user-input"]);
        }

        if content.contains("grid") || content.contains("Grid") {
            patterns.push("grid-layout".to_string());
        }
        if content.contains("flex") || content.contains("Flex") {
            patterns.push("flex-layout".to_string());
        }

        patterns
    }

    fn keywords(&self, name: &str) -> Vec<String> {
        let mut keywords = vec![name.to_lowercase()];

        // CamelCase -> "camel case" and "camel-case" forms for fuzzy lookup.
        let mut spaced = String::new();
        let mut dashed = String::new();
        for (i, ch) in name.chars().enumerate() {
            if ch.is_uppercase() && i > 0 {
                spaced.push(' ');
                dashed.push('-');
            }
            spaced.extend(ch.to_lowercase());
            dashed.extend(ch.to_lowercase());
        }
        keywords.push(spaced.trim().to_string());
        keywords.push(dashed.trim().to_string());

        keywords.sort();
        keywords.dedup();
        keywords
    }

    fn usage_example(&self, content: &str, name: &str) -> String {
        if let Some(caps) = self.example_re.captures(content) {
            let body: String = caps[1]
                .lines()
                .map(|line| line.trim_start_matches(" *").trim_start())
                .collect::<Vec<_>>()
                .join("\n");
            return body.trim().to_string();
        }

        format!(
            "import {{ {name} }} from '{}';\n\n<{name} />",
            self.import_prefix
        )
    }
}

impl ComponentParser for ReactComponentParser {
    fn parse(&self, file: &SourceFile) -> Option<CatalogComponent> {
        if !file.name.ends_with(".tsx") && !file.name.ends_with(".jsx") {
            return None;
        }

        let name = self.component_name(&file.name);

        Some(CatalogComponent {
            import_path: self.import_path(&file.path),
            category: self.categorize(&name),
            description: self.description(&file.content),
            props: self.props(&file.content),
            variants: self.variants(&file.content),
            visual_patterns: self.visual_patterns(&name, &file.content),
            figma_keywords: self.keywords(&name),
            usage_example: self.usage_example(&file.content, &name),
            source_url: file.source_url.clone(),
            name,
        })
    }
}

/// GitHub contents-API source for the component repository.
pub struct GithubRepoSource {
    http: reqwest::Client,
    owner: String,
    repo: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentsEntry {
    name: String,
    path: String,
    #[serde(rename = "type")]
    entry_type: String,
}

const COMPONENT_DIRECTORIES: [&str; 3] = ["src/components", "components", "lib/components"];

impl GithubRepoSource {
    pub fn new(owner: String, repo: String, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            owner,
            repo,
            token,
        }
    }

    fn request(&self, url: &str, accept: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .http
            .get(url)
            .header("Accept", accept)
            .header("User-Agent", "prism-catalog-scanner");
        if let Some(token) = &self.token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        builder
    }

    /// Lists component files from the first conventional directory that
    /// exists in the repository.
    async fn component_files(&self) -> Result<Vec<ContentsEntry>> {
        for dir in COMPONENT_DIRECTORIES {
            let url = format!(
                "https://api.github.com/repos/{}/{}/contents/{dir}",
                self.owner, self.repo
            );
            let response = self
                .request(&url, "application/vnd.github.v3+json")
                .send()
                .await?;

            if response.status().is_success() {
                return response.json::<Vec<ContentsEntry>>().await.map_err(|err| {
                    PrismError::Upstream(format!("malformed repository listing: {err}"))
                });
            }
            debug!("Directory {} not found, trying next", dir);
        }

        Ok(Vec::new())
    }

    async fn file_content(&self, path: &str) -> Result<Option<String>> {
        let url = format!(
            "https://api.github.com/repos/{}/{}/contents/{path}",
            self.owner, self.repo
        );
        let response = self.request(&url, "application/vnd.github.v3.raw").send().await?;

        if !response.status().is_success() {
            warn!("Failed to fetch {}: {}", path, response.status());
            return Ok(None);
        }

        Ok(Some(response.text().await?))
    }

    fn source_url(&self, path: &str) -> String {
        format!(
            "https://github.com/{}/{}/blob/main/{path}",
            self.owner, self.repo
        )
    }
}

/// Scans a component repository and extracts catalog records through the
/// configured parser.
pub struct CatalogScanner {
    source: GithubRepoSource,
    parser: Box<dyn ComponentParser>,
}

impl CatalogScanner {
    pub fn new(source: GithubRepoSource, parser: Box<dyn ComponentParser>) -> Self {
        Self { source, parser }
    }

    pub async fn scan(&self) -> Result<Vec<CatalogComponent>> {
        let files = self.source.component_files().await?;
        info!("Scanning {} repository entries", files.len());

        let mut components = Vec::new();
        for entry in files {
            if entry.entry_type != "file" {
                continue;
            }

            let Some(content) = self.source.file_content(&entry.path).await? else {
                continue;
            };

            let file = SourceFile {
                source_url: self.source.source_url(&entry.path),
                name: entry.name,
                path: entry.path,
                content,
            };

            if let Some(component) = self.parser.parse(&file) {
                debug!("Parsed component {}", component.name);
                components.push(component);
            }
        }

        Ok(components)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUTTON_SOURCE: &str = r#"/**
 * Button component for primary user actions.
 *
 * @example
 * ```tsx
 * <Button variant="primary">Save</Button>
 * ```
 */
interface ButtonProps {
  children: React.ReactNode;
  variant?: 'primary' | 'secondary' | 'ghost';
  size?: 'small' | 'medium' | 'large';
  disabled?: boolean;
  onClick: () => void;
}
export function Button({ children }: ButtonProps) {
  return <button className="flex">{children}</button>;
}
"#;

    fn parse_button() -> CatalogComponent {
        let parser = ReactComponentParser::new("@acme/ui");
        parser
            .parse(&SourceFile {
                name: "Button.tsx".to_string(),
                path: "src/components/forms/Button.tsx".to_string(),
                content: BUTTON_SOURCE.to_string(),
                source_url: "https://example.com/Button.tsx".to_string(),
            })
            .unwrap()
    }

    #[test]
    fn parses_component_identity_and_category() {
        let component = parse_button();
        assert_eq!(component.name, "Button");
        assert_eq!(component.category, ComponentCategory::Forms);
        assert_eq!(component.import_path, "@acme/ui/forms");
        assert_eq!(
            component.description,
            "Button component for primary user actions."
        );
    }

    #[test]
    fn parses_props_with_optionality() {
        let component = parse_button();
        assert!(component.props["children"].required);
        assert!(!component.props["variant"].required);
        assert!(component.props["onClick"].required);
    }

    #[test]
    fn parses_variant_axes_in_declaration_order() {
        let component = parse_button();
        let variant = component.variant_axis("variant").unwrap();
        assert_eq!(variant.values, vec!["primary", "secondary", "ghost"]);
        let size = component.variant_axis("size").unwrap();
        assert_eq!(size.values, vec!["small", "medium", "large"]);
    }

    #[test]
    fn derives_patterns_and_keywords() {
        let component = parse_button();
        assert!(component.visual_patterns.contains(&"clickable".to_string()));
        assert!(component.visual_patterns.contains(&"flex-layout".to_string()));
        assert!(component.figma_keywords.contains(&"button".to_string()));
    }

    #[test]
    fn extracts_usage_example_from_doc_comment() {
        let component = parse_button();
        assert!(component.usage_example.contains("<Button variant=\"primary\">"));
    }

    #[test]
    fn ignores_non_component_files() {
        let parser = ReactComponentParser::new("@acme/ui");
        assert!(parser
            .parse(&SourceFile {
                name: "helpers.ts".to_string(),
                path: "src/components/helpers.ts".to_string(),
                content: String::new(),
                source_url: String::new(),
            })
            .is_none());
    }
}
