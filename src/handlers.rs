use crate::config::Config;
use prism_catalog::{
    CatalogComponent, CatalogScanner, CatalogSource, GithubRepoSource, ReactComponentParser,
};
use prism_common::{OperationOutput, PrismError, Result};
use prism_design::{DesignClient, DesignNode, DesignRef, DesignSource, WalkLimits};
use prism_extract::Extractor;
use prism_guide::{CodeGenerator, GenerateOptions, GeneratedComponent, GuideBuilder};
use prism_llm::CompletionProvider;
use prism_match::{ComponentMatch, Matcher, PropValue, SuggestedProp, PRESENTATION_THRESHOLD};
use prism_store::{
    ArtifactStore, DesignRecord, GeneratedComponentRecord, GuideRecord, HistoryRecord, RecordStore,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// The externally exposed operations. Each sequences the collaborators and
/// returns a structured payload; raw errors never cross this boundary
/// unwrapped.
pub struct Handlers {
    design: Arc<dyn DesignSource>,
    catalog: Arc<dyn CatalogSource>,
    artifacts: Arc<dyn ArtifactStore>,
    provider: Option<Arc<dyn CompletionProvider>>,
    scanner: Option<CatalogScanner>,
    limits: WalkLimits,
}

impl Handlers {
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = Arc::new(RecordStore::new(
            config.store_url.clone(),
            config.store_api_key.clone(),
        ));
        let scanner = CatalogScanner::new(
            GithubRepoSource::new(
                config.repo_owner.clone(),
                config.repo_name.clone(),
                config.github_token.clone(),
            ),
            Box::new(ReactComponentParser::new(config.import_prefix.clone())),
        );

        Ok(Self {
            design: Arc::new(DesignClient::new(config.design_access_token.clone())),
            catalog: store.clone(),
            artifacts: store,
            provider: config.provider.clone().build()?,
            scanner: Some(scanner),
            limits: config.limits,
        })
    }

    /// Wire up explicit collaborators; used by tests and embedders.
    pub fn new(
        design: Arc<dyn DesignSource>,
        catalog: Arc<dyn CatalogSource>,
        artifacts: Arc<dyn ArtifactStore>,
        provider: Option<Arc<dyn CompletionProvider>>,
    ) -> Self {
        Self {
            design,
            catalog,
            artifacts,
            provider,
            scanner: None,
            limits: WalkLimits::default(),
        }
    }

    /// Scan the component repository and upsert the catalog.
    pub async fn scan_catalog(&self) -> Result<OperationOutput> {
        let scanner = self.scanner.as_ref().ok_or_else(|| {
            PrismError::Config("component repository is not configured".to_string())
        })?;

        let components = scanner.scan().await?;
        if components.is_empty() {
            return Ok(OperationOutput::ok(
                "No components found in the repository. Check that it has a \
                 src/components, components or lib/components directory with \
                 .tsx/.jsx sources.",
            ));
        }

        self.catalog.upsert_components(&components).await?;

        let listing: Vec<String> = components
            .iter()
            .map(|c| format!("- {} ({})", c.name, c.category.as_str()))
            .collect();
        Ok(OperationOutput::ok(format!(
            "Scanned and stored {} components:\n{}",
            components.len(),
            listing.join("\n")
        )))
    }

    /// Match a design against the catalog and summarize the results.
    pub async fn analyze_design(&self, design_url: &str) -> Result<OperationOutput> {
        let reference = DesignRef::parse(design_url)?;

        let components = self
            .catalog
            .list_components()
            .await
            .map_err(|err| contextualize(err, "analyze-design", design_url))?;
        if components.is_empty() {
            return Ok(OperationOutput::ok(EMPTY_CATALOG_GUIDANCE));
        }

        let root = self
            .fetch_root(&reference)
            .await
            .map_err(|err| contextualize(err, "analyze-design", design_url))?;

        let matcher = Matcher::new().with_limits(self.limits);
        let matches = matcher.match_tree(&root, &components)?;

        let high_confidence: Vec<&ComponentMatch> = matches
            .iter()
            .filter(|m| m.confidence > PRESENTATION_THRESHOLD)
            .collect();
        if high_confidence.is_empty() {
            return Ok(OperationOutput::ok(NO_MATCHES_GUIDANCE));
        }

        info!(
            "analyze-design found {} high-confidence matches",
            high_confidence.len()
        );
        Ok(OperationOutput::ok(render_match_summary(&high_confidence)))
    }

    /// Build and persist a full implementation guide.
    pub async fn generate_guide(&self, design_url: &str) -> Result<OperationOutput> {
        let reference = DesignRef::parse(design_url)?;

        let components = self
            .catalog
            .list_components()
            .await
            .map_err(|err| contextualize(err, "generate-guide", design_url))?;
        if components.is_empty() {
            return Ok(OperationOutput::ok(EMPTY_CATALOG_GUIDANCE));
        }

        let root = self
            .fetch_root(&reference)
            .await
            .map_err(|err| contextualize(err, "generate-guide", design_url))?;

        let matcher = Matcher::new().with_limits(self.limits);
        let matches = matcher.match_tree(&root, &components)?;
        if matches.is_empty() {
            return Ok(OperationOutput::ok(NO_MATCHES_GUIDANCE));
        }

        let builder = GuideBuilder::new();
        let guide = builder.build_guide(&matches, &root);
        let markdown = builder.to_markdown(&guide);

        // Artifact success is independent of logging success; a failed
        // guide-record write degrades to a warning.
        let mut warnings = Vec::new();
        let detected: Vec<serde_json::Value> = matches
            .iter()
            .filter(|m| m.confidence > PRESENTATION_THRESHOLD)
            .map(|m| json!({ "name": m.component_name, "confidence": m.confidence }))
            .collect();
        let record = GuideRecord {
            design_url: design_url.to_string(),
            design_node_id: reference.node_id.clone(),
            detected_components: json!(detected),
            implementation_code: guide.full_code.clone(),
            customization_notes: guide.customization_notes.join("\n"),
            metadata: json!({ "design_tokens": guide.design_tokens }),
        };
        if let Err(err) = self.artifacts.store_guide(&record).await {
            warn!("Failed to persist implementation guide: {}", err);
            warnings.push(format!("guide record write failed: {err}"));
        }

        Ok(OperationOutput::ok(markdown).with_warnings(warnings))
    }

    /// Detail view of one catalog component.
    pub async fn get_component(&self, name: &str) -> Result<OperationOutput> {
        let Some(component) = self.catalog.get_component(name).await? else {
            let all = self.catalog.list_components().await?;
            let listing: Vec<String> =
                all.iter().map(|c| format!("  - {}", c.name)).collect();
            return Ok(OperationOutput::ok(format!(
                "Component '{name}' not found.\n\nAvailable components:\n{}\n\n\
                 Tip: component names are case-sensitive.",
                listing.join("\n")
            )));
        };

        Ok(OperationOutput::ok(render_component_details(&component)))
    }

    /// Generate a React component for a design via the completion provider.
    pub async fn generate_code(
        &self,
        design_url: &str,
        options: &GenerateOptions,
    ) -> Result<OperationOutput> {
        let start = Instant::now();

        let provider = self.provider.as_ref().ok_or_else(|| {
            PrismError::Config(
                "a completion provider is required for code generation; \
                 set ANTHROPIC_API_KEY or enable a custom provider"
                    .to_string(),
            )
        })?;

        let reference = DesignRef::parse(design_url)?;
        let root = self
            .fetch_root(&reference)
            .await
            .map_err(|err| contextualize(err, "generate-code", design_url))?;

        // The design record is stored before generation; a later failure
        // leaves an orphaned record by design, not a transaction.
        let design_id = self
            .artifacts
            .store_design(&DesignRecord {
                design_url: design_url.to_string(),
                file_key: reference.file_key.clone(),
                node_id: reference.node_id.clone(),
                design_name: root.name.clone(),
                raw_data: serde_json::to_value(&root)?,
            })
            .await
            .map_err(|err| contextualize(err, "generate-code", design_url))?;

        let design = Extractor::new().with_limits(self.limits).extract(&root)?;
        let catalog = self
            .catalog
            .list_components()
            .await
            .map_err(|err| contextualize(err, "generate-code", design_url))?;

        let generator = CodeGenerator::new(provider.clone());
        let generated = generator
            .generate(&design, options, &catalog)
            .await
            .map_err(|err| contextualize(err, "generate-code", design_url))?;

        let mut warnings = Vec::new();
        let component_id = match self
            .artifacts
            .store_generated_component(&GeneratedComponentRecord {
                design_id: design_id.clone(),
                component_name: generated.component_name.clone(),
                component_code: generated.component_code.clone(),
                props_interface: generated.props_interface.clone(),
                imports: generated.imports.clone(),
                dependencies: generated.dependencies.clone(),
                model_id: generated.model_id.clone(),
                generation_prompt: generated.generation_prompt.clone(),
                metadata: json!({
                    "design_tokens": design.design_tokens,
                    "complexity": design.metadata.complexity,
                }),
            })
            .await
        {
            Ok(id) => Some(id),
            Err(err) => {
                warn!("Failed to persist generated component: {}", err);
                warnings.push(format!("generated-component record write failed: {err}"));
                None
            }
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        if let Err(err) = self
            .artifacts
            .store_generation_history(&HistoryRecord {
                design_id,
                generated_component_id: component_id,
                success: true,
                error_message: None,
                generation_time_ms: Some(elapsed_ms),
            })
            .await
        {
            warn!("Failed to persist generation history: {}", err);
            warnings.push(format!("history record write failed: {err}"));
        }

        Ok(
            OperationOutput::ok(render_generated_component(&generated, &design, elapsed_ms))
                .with_warnings(warnings),
        )
    }

    async fn fetch_root(&self, reference: &DesignRef) -> Result<DesignNode> {
        match &reference.node_id {
            Some(node_id) => self.design.fetch_node(&reference.file_key, node_id).await,
            None => self.design.fetch_document(&reference.file_key).await,
        }
    }
}

const EMPTY_CATALOG_GUIDANCE: &str = "No components found in the catalog. \
Run the scan-catalog operation first to load the component library.";

const NO_MATCHES_GUIDANCE: &str = "No matching components found for this design.

Tips to improve matching:
- Use descriptive layer names (e.g. \"Hero Section\", \"Primary Button\")
- Ensure the design uses patterns that match your component library
- Check that components were scanned successfully";

/// Rewrap an error with the failing operation and design reference; the
/// error kind is preserved.
fn contextualize(err: PrismError, operation: &str, reference: &str) -> PrismError {
    match err {
        PrismError::Upstream(message) => {
            PrismError::Upstream(format!("{operation} for '{reference}': {message}"))
        }
        PrismError::NotFound(message) => {
            PrismError::NotFound(format!("{operation} for '{reference}': {message}"))
        }
        other => other,
    }
}

fn render_match_summary(matches: &[&ComponentMatch]) -> String {
    let sections: Vec<String> = matches
        .iter()
        .take(10)
        .map(|m| {
            let percent = (m.confidence * 100.0).round() as i64;
            format!(
                "### {} ({percent}% match)\n\
                 - **Import**: `{}`\n\
                 - **Figma node**: \"{}\"\n\
                 - **Matched patterns**: {}\n\
                 - **Suggested props**: {}",
                m.component_name,
                m.component_path,
                m.figma_node_name,
                m.matched_patterns.join(", "),
                render_props_json(&m.suggested_props),
            )
        })
        .collect();

    format!(
        "# Design Analysis\n\nFound {} high-confidence matches:\n\n{}\n\n\
         Use the generate-guide operation to get complete implementation code.",
        matches.len(),
        sections.join("\n\n")
    )
}

/// Render suggested props as a JSON object literal, preserving suggestion
/// order.
fn render_props_json(props: &[SuggestedProp]) -> String {
    if props.is_empty() {
        return "{}".to_string();
    }

    let entries: Vec<String> = props
        .iter()
        .map(|prop| {
            let value = match &prop.value {
                PropValue::Text(text) => {
                    serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string())
                }
                PropValue::Flag(flag) => flag.to_string(),
                PropValue::Json(value) => value.to_string(),
            };
            format!("\"{}\": {value}", prop.name)
        })
        .collect();

    format!("{{ {} }}", entries.join(", "))
}

fn render_component_details(component: &CatalogComponent) -> String {
    let props: Vec<String> = component
        .props
        .iter()
        .map(|(name, spec)| {
            let required = if spec.required { "(required)" } else { "(optional)" };
            format!("  - **{name}** {required}: `{}`", spec.declared_type)
        })
        .collect();
    let props = if props.is_empty() {
        "No props documented".to_string()
    } else {
        props.join("\n")
    };

    let variants: Vec<String> = component
        .variants
        .iter()
        .map(|axis| format!("  - **{}**: {}", axis.name, axis.values.join(", ")))
        .collect();
    let variants = if variants.is_empty() {
        "No variants available".to_string()
    } else {
        variants.join("\n")
    };

    let description = if component.description.is_empty() {
        "No description available"
    } else {
        &component.description
    };

    format!(
        "# {name}\n\n{description}\n\n\
         ## Import\n\n```tsx\nimport {{ {name} }} from '{path}';\n```\n\n\
         ## Props\n\n{props}\n\n\
         ## Variants\n\n{variants}\n\n\
         ## Visual Patterns\n\n{patterns}\n\n\
         ## Usage Example\n\n```tsx\n{example}\n```\n\n\
         ## Repository\n\n{repo}",
        name = component.name,
        path = component.import_path,
        patterns = component.visual_patterns.join(", "),
        example = component.usage_example,
        repo = if component.source_url.is_empty() {
            "No repository link available"
        } else {
            &component.source_url
        },
    )
}

fn render_generated_component(
    generated: &GeneratedComponent,
    design: &prism_extract::ExtractedDesign,
    elapsed_ms: u64,
) -> String {
    format!(
        "# Generated React Component\n\n\
         ## Component: {name}\n\n\
         ### Generation Summary\n\
         - **Time:** {elapsed_ms}ms\n\
         - **Complexity:** {complexity}\n\
         - **Total Elements:** {total}\n\
         - **AI Model:** {model}\n\n\
         ### Design Tokens Extracted\n\
         **Colors:** {colors} unique colors\n\
         **Spacing:** {spacing} values\n\
         **Font Sizes:** {fonts} values\n\
         **Border Radii:** {radii} values\n\n\
         ### Generated Code\n\n```tsx\n{code}\n```\n\n\
         ### Next Steps\n\
         1. Copy the generated code into your project\n\
         2. Install dependencies: `npm install {deps}`\n\
         3. Review and customize the component as needed\n\
         4. Test the component in your application",
        name = generated.component_name,
        complexity = generated.complexity.as_str(),
        total = design.metadata.total_nodes,
        model = generated.model_id,
        colors = design.design_tokens.colors.len(),
        spacing = design.design_tokens.spacing.len(),
        fonts = design.design_tokens.font_sizes.len(),
        radii = design.design_tokens.border_radii.len(),
        code = generated.component_code,
        deps = generated.dependencies.join(" "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use prism_design::{Paint, Rgba};

    struct StubCatalog {
        components: Vec<CatalogComponent>,
    }

    #[async_trait]
    impl CatalogSource for StubCatalog {
        async fn list_components(&self) -> Result<Vec<CatalogComponent>> {
            Ok(self.components.clone())
        }

        async fn get_component(&self, name: &str) -> Result<Option<CatalogComponent>> {
            Ok(self.components.iter().find(|c| c.name == name).cloned())
        }

        async fn upsert_components(&self, _components: &[CatalogComponent]) -> Result<()> {
            Ok(())
        }
    }

    struct StubDesign {
        root: DesignNode,
    }

    #[async_trait]
    impl DesignSource for StubDesign {
        async fn fetch_document(&self, _file_key: &str) -> Result<DesignNode> {
            Ok(self.root.clone())
        }

        async fn fetch_node(&self, _file_key: &str, _node_id: &str) -> Result<DesignNode> {
            Ok(self.root.clone())
        }
    }

    /// Artifact store whose guide writes fail; everything else acks.
    struct FlakyArtifacts {
        fail_guides: bool,
    }

    #[async_trait]
    impl ArtifactStore for FlakyArtifacts {
        async fn store_design(&self, _record: &DesignRecord) -> Result<String> {
            Ok("design-1".to_string())
        }

        async fn store_guide(&self, _record: &GuideRecord) -> Result<String> {
            if self.fail_guides {
                Err(PrismError::Upstream("store offline".to_string()))
            } else {
                Ok("guide-1".to_string())
            }
        }

        async fn store_generated_component(
            &self,
            _record: &GeneratedComponentRecord,
        ) -> Result<String> {
            Ok("component-1".to_string())
        }

        async fn store_generation_history(&self, _record: &HistoryRecord) -> Result<String> {
            Ok("history-1".to_string())
        }
    }

    fn button_catalog() -> Vec<CatalogComponent> {
        vec![CatalogComponent {
            name: "Button".to_string(),
            import_path: "@acme/ui/forms".to_string(),
            visual_patterns: vec!["button".to_string(), "clickable".to_string()],
            figma_keywords: vec!["button".to_string(), "btn".to_string()],
            ..Default::default()
        }]
    }

    fn button_design() -> DesignNode {
        let mut root = DesignNode::new("0:1", "Page", "FRAME");
        let mut button = DesignNode::new("4:38", "Primary Button", "RECTANGLE");
        button.fills = vec![Paint::solid(Rgba::opaque(0.23, 0.51, 0.96))];
        root.children.push(button);
        root
    }

    fn handlers(
        components: Vec<CatalogComponent>,
        root: DesignNode,
        fail_guides: bool,
    ) -> Handlers {
        Handlers::new(
            Arc::new(StubDesign { root }),
            Arc::new(StubCatalog { components }),
            Arc::new(FlakyArtifacts { fail_guides }),
            None,
        )
    }

    const URL: &str = "https://www.figma.com/file/ABC123/Landing?node-id=4-38";

    #[tokio::test]
    async fn empty_catalog_yields_guidance_not_error() {
        let handlers = handlers(Vec::new(), button_design(), false);
        let output = handlers.analyze_design(URL).await.unwrap();

        assert!(!output.is_error);
        assert!(output.text.contains("No components found in the catalog"));
    }

    #[tokio::test]
    async fn bad_url_fails_before_any_fetch() {
        let handlers = handlers(button_catalog(), button_design(), false);
        let err = handlers
            .analyze_design("https://example.com/not-a-design")
            .await
            .unwrap_err();
        assert!(matches!(err, PrismError::Input(_)));
    }

    #[tokio::test]
    async fn analyze_reports_high_confidence_matches() {
        let handlers = handlers(button_catalog(), button_design(), false);
        let output = handlers.analyze_design(URL).await.unwrap();

        assert!(output.text.contains("# Design Analysis"));
        assert!(output.text.contains("### Button (80% match)"));
    }

    #[tokio::test]
    async fn guide_write_failure_degrades_to_warning() {
        let handlers = handlers(button_catalog(), button_design(), true);
        let output = handlers.generate_guide(URL).await.unwrap();

        assert!(!output.is_error);
        assert!(output.text.contains("# Implementation Guide"));
        assert_eq!(output.warnings.len(), 1);
        assert!(output.warnings[0].contains("guide record write failed"));
    }

    #[tokio::test]
    async fn guide_succeeds_without_warnings_when_store_acks() {
        let handlers = handlers(button_catalog(), button_design(), false);
        let output = handlers.generate_guide(URL).await.unwrap();
        assert!(output.warnings.is_empty());
    }

    #[tokio::test]
    async fn missing_component_lists_alternatives() {
        let handlers = handlers(button_catalog(), button_design(), false);
        let output = handlers.get_component("Tooltip").await.unwrap();

        assert!(!output.is_error);
        assert!(output.text.contains("Component 'Tooltip' not found"));
        assert!(output.text.contains("- Button"));
    }

    #[tokio::test]
    async fn generate_code_requires_a_provider() {
        let handlers = handlers(button_catalog(), button_design(), false);
        let err = handlers
            .generate_code(URL, &GenerateOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PrismError::Config(_)));
    }
}
