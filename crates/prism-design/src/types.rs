use serde::{Deserialize, Serialize};

/// One element of a hierarchical design document, as returned by the design
/// API. Every attribute beyond identity is optional; absent fields read as
/// zero/empty so malformed exports degrade instead of failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub visible: Option<bool>,

    #[serde(default)]
    pub absolute_bounding_box: Option<BoundingBox>,

    // Auto-layout attributes
    #[serde(default)]
    pub layout_mode: Option<LayoutMode>,
    #[serde(default)]
    pub primary_axis_align_items: Option<AxisAlign>,
    #[serde(default)]
    pub counter_axis_align_items: Option<AxisAlign>,
    #[serde(default)]
    pub padding_left: Option<f64>,
    #[serde(default)]
    pub padding_right: Option<f64>,
    #[serde(default)]
    pub padding_top: Option<f64>,
    #[serde(default)]
    pub padding_bottom: Option<f64>,
    #[serde(default)]
    pub item_spacing: Option<f64>,
    #[serde(default)]
    pub layout_wrap: Option<LayoutWrap>,

    // Visual attributes
    #[serde(default)]
    pub fills: Vec<Paint>,
    #[serde(default)]
    pub strokes: Vec<Paint>,
    #[serde(default)]
    pub stroke_weight: Option<f64>,
    #[serde(default)]
    pub corner_radius: Option<f64>,
    #[serde(default)]
    pub effects: Vec<Effect>,
    #[serde(default)]
    pub opacity: Option<f64>,

    // Text attributes
    #[serde(default)]
    pub characters: Option<String>,
    #[serde(default)]
    pub style: Option<TextStyle>,

    #[serde(default)]
    pub children: Vec<DesignNode>,
}

impl DesignNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            node_type: node_type.into(),
            ..Default::default()
        }
    }

    pub fn layout_mode(&self) -> LayoutMode {
        self.layout_mode.unwrap_or(LayoutMode::None)
    }

    pub fn has_image_fill(&self) -> bool {
        self.fills.iter().any(|f| f.paint_type == PaintType::Image)
    }

    /// First solid, visible fill — ordering matters, later fills are ignored.
    pub fn first_solid_fill(&self) -> Option<&Paint> {
        self.fills
            .first()
            .filter(|f| f.paint_type == PaintType::Solid && f.color.is_some())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutMode {
    Horizontal,
    Vertical,
    #[default]
    #[serde(other)]
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AxisAlign {
    Center,
    Max,
    SpaceBetween,
    #[default]
    #[serde(other)]
    Min,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutWrap {
    Wrap,
    #[default]
    #[serde(other)]
    NoWrap,
}

/// A fill or stroke entry. Strokes reuse the same shape; gradient stops are
/// not consumed by any pipeline stage and are left unmodeled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paint {
    #[serde(rename = "type")]
    pub paint_type: PaintType,
    #[serde(default)]
    pub color: Option<Rgba>,
    #[serde(default)]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default)]
    pub image_ref: Option<String>,
}

impl Paint {
    pub fn solid(color: Rgba) -> Self {
        Self {
            paint_type: PaintType::Solid,
            color: Some(color),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaintType {
    #[default]
    Solid,
    GradientLinear,
    GradientRadial,
    Image,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    #[serde(rename = "type")]
    pub effect_type: EffectType,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default)]
    pub radius: Option<f64>,
    #[serde(default)]
    pub color: Option<Rgba>,
    #[serde(default)]
    pub offset: Option<Vector>,
}

impl Effect {
    /// Drop shadows count unless explicitly hidden.
    pub fn is_visible_drop_shadow(&self) -> bool {
        self.effect_type == EffectType::DropShadow && self.visible != Some(false)
    }

    pub fn is_shadow(&self) -> bool {
        matches!(
            self.effect_type,
            EffectType::DropShadow | EffectType::InnerShadow
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectType {
    #[default]
    DropShadow,
    InnerShadow,
    LayerBlur,
    BackgroundBlur,
    #[serde(other)]
    Unknown,
}

/// Color channels as floats in [0, 1], the design API's native encoding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "default_alpha")]
    pub a: f64,
}

fn default_alpha() -> f64 {
    1.0
}

impl Rgba {
    pub fn opaque(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub font_weight: Option<f64>,
    #[serde(default)]
    pub font_size: Option<f64>,
    #[serde(default)]
    pub line_height_px: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_auto_layout_frame() {
        let json = r#"{
            "id": "1:2",
            "name": "Hero Section",
            "type": "FRAME",
            "layoutMode": "VERTICAL",
            "primaryAxisAlignItems": "CENTER",
            "itemSpacing": 24,
            "paddingTop": 32,
            "paddingBottom": 32,
            "fills": [{ "type": "SOLID", "color": { "r": 1, "g": 1, "b": 1, "a": 1 } }],
            "children": []
        }"#;

        let node: DesignNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.layout_mode(), LayoutMode::Vertical);
        assert_eq!(node.primary_axis_align_items, Some(AxisAlign::Center));
        assert_eq!(node.item_spacing, Some(24.0));
        assert!(node.first_solid_fill().is_some());
    }

    #[test]
    fn unknown_enum_values_fall_back() {
        let json = r#"{
            "id": "1:3",
            "name": "Odd",
            "type": "FRAME",
            "layoutMode": "GRID",
            "fills": [{ "type": "GRADIENT_ANGULAR" }]
        }"#;

        let node: DesignNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.layout_mode(), LayoutMode::None);
        assert_eq!(node.fills[0].paint_type, PaintType::Unknown);
    }

    #[test]
    fn missing_alpha_defaults_to_opaque() {
        let json = r#"{ "r": 0.5, "g": 0.25, "b": 0.0 }"#;
        let color: Rgba = serde_json::from_str(json).unwrap();
        assert_eq!(color.a, 1.0);
    }
}
