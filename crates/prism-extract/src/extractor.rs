use crate::color::rgba_to_hex;
use crate::types::*;
use prism_common::Result;
use prism_design::{check_tree, AxisAlign, DesignNode, LayoutMode, LayoutWrap, WalkLimits};
use tracing::debug;

/// Converts a raw design node into a normalized component tree, a set of
/// deduplicated design tokens, and complexity metadata.
pub struct Extractor {
    limits: WalkLimits,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    pub fn new() -> Self {
        Self {
            limits: WalkLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: WalkLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn extract(&self, root: &DesignNode) -> Result<ExtractedDesign> {
        check_tree(root, &self.limits)?;

        let component_tree = vec![self.build_node(root)];
        let design_tokens = self.collect_design_tokens(root);
        let metadata = self.analyze_metadata(root);

        debug!(
            "Extracted {} nodes ({:?}) from '{}'",
            metadata.total_nodes, metadata.complexity, root.name
        );

        Ok(ExtractedDesign {
            root_name: root.name.clone(),
            component_tree,
            design_tokens,
            metadata,
        })
    }

    fn build_node(&self, node: &DesignNode) -> ComponentNode {
        ComponentNode {
            id: node.id.clone(),
            name: node.name.clone(),
            node_type: node.node_type.clone(),
            role: infer_role(node),
            layout: extract_layout(node),
            styles: extract_styles(node),
            content: node.characters.clone(),
            children: node.children.iter().map(|c| self.build_node(c)).collect(),
        }
    }

    fn collect_design_tokens(&self, root: &DesignNode) -> DesignTokens {
        let mut tokens = DesignTokens::default();
        collect_tokens(root, &mut tokens);

        sort_dedup(&mut tokens.spacing);
        sort_dedup(&mut tokens.font_sizes);
        sort_dedup(&mut tokens.border_radii);
        tokens.shadows.sort();
        tokens.shadows.dedup();

        tokens
    }

    fn analyze_metadata(&self, root: &DesignNode) -> ExtractMetadata {
        let mut total_nodes = 0usize;
        let mut has_interactive_elements = false;
        let mut has_images = false;
        let mut has_text = false;

        fn analyze(
            node: &DesignNode,
            total: &mut usize,
            interactive: &mut bool,
            images: &mut bool,
            text: &mut bool,
        ) {
            *total += 1;

            if node.node_type == "TEXT" {
                *text = true;
            }
            if node.has_image_fill() {
                *images = true;
            }
            let name = node.name.to_lowercase();
            if name.contains("button") || name.contains("input") {
                *interactive = true;
            }

            for child in &node.children {
                analyze(child, total, interactive, images, text);
            }
        }

        analyze(
            root,
            &mut total_nodes,
            &mut has_interactive_elements,
            &mut has_images,
            &mut has_text,
        );

        let complexity = if total_nodes > 20 {
            Complexity::Complex
        } else if total_nodes > 10 {
            Complexity::Moderate
        } else {
            Complexity::Simple
        };

        ExtractMetadata {
            total_nodes,
            has_interactive_elements,
            has_images,
            has_text,
            complexity,
        }
    }
}

/// Role inference precedence; the first matching rule wins and name checks
/// are case-insensitive.
fn infer_role(node: &DesignNode) -> NodeRole {
    let name = node.name.to_lowercase();

    if node.node_type == "TEXT" {
        return NodeRole::Text;
    }
    if node.node_type == "RECTANGLE" && node.has_image_fill() {
        return NodeRole::Image;
    }

    if name.contains("button") || name.contains("btn") || name.contains("cta") || name.contains("action") {
        return NodeRole::Button;
    }
    if name.contains("input") || name.contains("field") || name.contains("search") || name.contains("textbox") {
        return NodeRole::Input;
    }
    if name.contains("card") {
        return NodeRole::Card;
    }
    if name.contains("nav") || name.contains("menu") || name.contains("header") || name.contains("footer") {
        return NodeRole::Navigation;
    }
    if name.contains("list") || name.contains("grid") {
        return NodeRole::List;
    }

    if node.layout_mode() != LayoutMode::None || !node.children.is_empty() {
        return NodeRole::Container;
    }

    NodeRole::Unknown
}

fn extract_layout(node: &DesignNode) -> LayoutInfo {
    let mut layout = LayoutInfo::default();

    match node.layout_mode() {
        LayoutMode::Horizontal | LayoutMode::Vertical => {
            layout.display = Display::Flex;
            layout.direction = Some(if node.layout_mode() == LayoutMode::Horizontal {
                Direction::Row
            } else {
                Direction::Column
            });

            // MIN is the primary-axis default and stays unset.
            layout.justify_content = match node.primary_axis_align_items {
                Some(AxisAlign::Center) => Some("center".to_string()),
                Some(AxisAlign::Max) => Some("flex-end".to_string()),
                Some(AxisAlign::SpaceBetween) => Some("space-between".to_string()),
                _ => None,
            };
            layout.align_items = match node.counter_axis_align_items {
                Some(AxisAlign::Center) => Some("center".to_string()),
                Some(AxisAlign::Max) => Some("flex-end".to_string()),
                _ => None,
            };

            layout.gap = Some(node.item_spacing.unwrap_or(0.0));
            layout.wrap = node.layout_wrap == Some(LayoutWrap::Wrap);
        }
        LayoutMode::None => {}
    }

    let top = node.padding_top.unwrap_or(0.0);
    let right = node.padding_right.unwrap_or(0.0);
    let bottom = node.padding_bottom.unwrap_or(0.0);
    let left = node.padding_left.unwrap_or(0.0);
    if top != 0.0 || right != 0.0 || bottom != 0.0 || left != 0.0 {
        layout.padding = Some(PaddingBox {
            top,
            right,
            bottom,
            left,
        });
    }

    if let Some(bounds) = &node.absolute_bounding_box {
        layout.width = Some(Dimension::Px(bounds.width));
        layout.height = Some(Dimension::Px(bounds.height));
    }

    layout
}

fn extract_styles(node: &DesignNode) -> StyleInfo {
    let mut styles = StyleInfo::default();

    if let Some(fill) = node.first_solid_fill() {
        if let Some(color) = &fill.color {
            styles.background_color = Some(rgba_to_hex(color));
        }
    }

    if let Some(text_style) = &node.style {
        styles.font_size = text_style.font_size;
        styles.font_weight = text_style.font_weight;
        styles.font_family = text_style.font_family.clone();
    }

    if let Some(radius) = node.corner_radius {
        if radius != 0.0 {
            styles.border_radius = Some(radius);
        }
    }

    if let (Some(stroke), Some(weight)) = (node.strokes.first(), node.stroke_weight) {
        if weight != 0.0 {
            styles.border_width = Some(weight);
            if let Some(color) = &stroke.color {
                styles.border_color = Some(rgba_to_hex(color));
            }
        }
    }

    if let Some(shadow) = node.effects.iter().find(|e| e.is_visible_drop_shadow()) {
        if let (Some(offset), Some(color)) = (&shadow.offset, &shadow.color) {
            styles.box_shadow = Some(format_shadow(
                offset.x,
                offset.y,
                shadow.radius.unwrap_or(0.0),
                color,
            ));
        }
    }

    if let Some(opacity) = node.opacity {
        if opacity != 1.0 {
            styles.opacity = Some(opacity);
        }
    }

    styles
}

fn format_shadow(x: f64, y: f64, radius: f64, color: &prism_design::Rgba) -> String {
    format!("{}px {}px {}px {}", x, y, radius, rgba_to_hex(color))
}

fn collect_tokens(node: &DesignNode, tokens: &mut DesignTokens) {
    use prism_design::PaintType;

    for fill in &node.fills {
        if fill.paint_type == PaintType::Solid {
            if let Some(color) = &fill.color {
                let hex = rgba_to_hex(color);
                tokens.colors.insert(format!("fill-{hex}"), hex);
            }
        }
    }

    for spacing in [
        node.item_spacing,
        node.padding_top,
        node.padding_right,
        node.padding_bottom,
        node.padding_left,
    ]
    .into_iter()
    .flatten()
    {
        if spacing != 0.0 {
            tokens.spacing.push(spacing);
        }
    }

    if let Some(size) = node.style.as_ref().and_then(|s| s.font_size) {
        tokens.font_sizes.push(size);
    }

    if let Some(radius) = node.corner_radius {
        if radius != 0.0 {
            tokens.border_radii.push(radius);
        }
    }

    for effect in &node.effects {
        if effect.is_visible_drop_shadow() {
            if let (Some(offset), Some(color)) = (&effect.offset, &effect.color) {
                tokens.shadows.push(format_shadow(
                    offset.x,
                    offset.y,
                    effect.radius.unwrap_or(0.0),
                    color,
                ));
            }
        }
    }

    for child in &node.children {
        collect_tokens(child, tokens);
    }
}

fn sort_dedup(values: &mut Vec<f64>) {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    values.dedup();
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_design::{Effect, EffectType, Paint, Rgba, Vector};

    fn button_node() -> DesignNode {
        let mut node = DesignNode::new("1:1", "Primary Button", "RECTANGLE");
        node.fills = vec![Paint::solid(Rgba::opaque(0.23, 0.51, 0.96))];
        node
    }

    #[test]
    fn infers_button_role_from_name() {
        assert_eq!(infer_role(&button_node()), NodeRole::Button);
    }

    #[test]
    fn infers_text_role_from_type() {
        let node = DesignNode::new("1:2", "Anything", "TEXT");
        assert_eq!(infer_role(&node), NodeRole::Text);
    }

    #[test]
    fn infers_image_role_from_image_fill() {
        let mut node = DesignNode::new("1:3", "Photo", "RECTANGLE");
        node.fills = vec![Paint {
            paint_type: prism_design::PaintType::Image,
            ..Default::default()
        }];
        assert_eq!(infer_role(&node), NodeRole::Image);
    }

    #[test]
    fn container_beats_unknown_for_parents() {
        let mut node = DesignNode::new("1:4", "Wrapper", "FRAME");
        node.children.push(DesignNode::new("1:5", "Leaf", "TEXT"));
        assert_eq!(infer_role(&node), NodeRole::Container);

        let bare = DesignNode::new("1:6", "Thing", "RECTANGLE");
        assert_eq!(infer_role(&bare), NodeRole::Unknown);
    }

    fn sample_tree() -> DesignNode {
        let mut root = DesignNode::new("0:1", "Hero Section", "FRAME");
        root.layout_mode = Some(prism_design::LayoutMode::Vertical);
        root.item_spacing = Some(24.0);
        root.padding_top = Some(32.0);
        root.padding_bottom = Some(32.0);
        root.padding_left = Some(16.0);
        root.padding_right = Some(16.0);
        root.fills = vec![Paint::solid(Rgba::opaque(1.0, 1.0, 1.0))];
        root.effects = vec![Effect {
            effect_type: EffectType::DropShadow,
            visible: Some(true),
            radius: Some(4.0),
            color: Some(Rgba {
                r: 0.0,
                g: 0.0,
                b: 0.0,
                a: 0.25,
            }),
            offset: Some(Vector { x: 0.0, y: 2.0 }),
        }];

        let mut title = DesignNode::new("0:2", "Title", "TEXT");
        title.characters = Some("Welcome".to_string());
        title.style = Some(prism_design::TextStyle {
            font_size: Some(32.0),
            font_weight: Some(700.0),
            ..Default::default()
        });

        let mut button = button_node();
        button.corner_radius = Some(8.0);
        button.padding_top = Some(16.0);

        root.children.push(title);
        root.children.push(button);
        root
    }

    #[test]
    fn extraction_is_idempotent() {
        let extractor = Extractor::new();
        let tree = sample_tree();

        let first = extractor.extract(&tree).unwrap();
        let second = extractor.extract(&tree).unwrap();

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn tree_shape_mirrors_source() {
        let extracted = Extractor::new().extract(&sample_tree()).unwrap();
        let root = &extracted.component_tree[0];
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].role, NodeRole::Text);
        assert_eq!(root.children[0].content.as_deref(), Some("Welcome"));
        assert_eq!(root.children[1].role, NodeRole::Button);
    }

    #[test]
    fn tokens_are_deduped_and_ascending() {
        let extracted = Extractor::new().extract(&sample_tree()).unwrap();
        let tokens = &extracted.design_tokens;

        // 24 gap, 32 top/bottom, 16 left/right/button-top collapse to three.
        assert_eq!(tokens.spacing, vec![16.0, 24.0, 32.0]);
        assert_eq!(tokens.font_sizes, vec![32.0]);
        assert_eq!(tokens.border_radii, vec![8.0]);
        assert_eq!(tokens.shadows.len(), 1);
        assert_eq!(tokens.colors.len(), 2);

        for window in tokens.spacing.windows(2) {
            assert!(window[0] < window[1]);
        }
    }

    #[test]
    fn shadow_string_uses_px_geometry_and_hex_color() {
        let extracted = Extractor::new().extract(&sample_tree()).unwrap();
        assert_eq!(
            extracted.component_tree[0].styles.box_shadow.as_deref(),
            Some("0px 2px 4px #00000040")
        );
    }

    #[test]
    fn flex_layout_is_normalized() {
        let extracted = Extractor::new().extract(&sample_tree()).unwrap();
        let layout = &extracted.component_tree[0].layout;
        assert_eq!(layout.display, Display::Flex);
        assert_eq!(layout.direction, Some(Direction::Column));
        assert_eq!(layout.gap, Some(24.0));
        assert_eq!(
            layout.padding,
            Some(PaddingBox {
                top: 32.0,
                right: 16.0,
                bottom: 32.0,
                left: 16.0
            })
        );
    }

    #[test]
    fn complexity_thresholds() {
        let extractor = Extractor::new();

        let mut root = DesignNode::new("0:0", "Root", "FRAME");
        for i in 0..10 {
            root.children.push(DesignNode::new(format!("c{i}"), "Leaf", "TEXT"));
        }
        let moderate = extractor.extract(&root).unwrap();
        assert_eq!(moderate.metadata.complexity, Complexity::Moderate);

        for i in 10..25 {
            root.children.push(DesignNode::new(format!("c{i}"), "Leaf", "TEXT"));
        }
        let complex = extractor.extract(&root).unwrap();
        assert_eq!(complex.metadata.complexity, Complexity::Complex);

        let simple = extractor
            .extract(&DesignNode::new("0:0", "Root", "FRAME"))
            .unwrap();
        assert_eq!(simple.metadata.complexity, Complexity::Simple);
    }

    #[test]
    fn oversized_tree_is_an_input_error() {
        let extractor = Extractor::new().with_limits(prism_design::WalkLimits {
            max_depth: 64,
            max_nodes: 2,
        });
        let err = extractor.extract(&sample_tree()).unwrap_err();
        assert!(matches!(err, prism_common::PrismError::Input(_)));
    }
}
