//! Maps normalized layout and style attributes to ordered utility-class
//! tokens. Every function here is pure and deterministic: known values snap
//! to the fixed scales below, everything else falls back to an explicit
//! pixel or hex literal.

use prism_extract::{Dimension, Display, LayoutInfo, StyleInfo};

/// Scale units above the direct 0-6 range; one unit is 4px.
const STANDARD_SPACING_UNITS: [u32; 11] = [8, 10, 12, 16, 20, 24, 32, 40, 48, 56, 64];

/// Common pixel sizes and their scale steps for width/height classes.
const STANDARD_SIZES: [(u32, &str); 14] = [
    (16, "4"),
    (24, "6"),
    (32, "8"),
    (40, "10"),
    (48, "12"),
    (64, "16"),
    (80, "20"),
    (96, "24"),
    (128, "32"),
    (160, "40"),
    (192, "48"),
    (256, "64"),
    (320, "80"),
    (384, "96"),
];

/// Common hex values and their named scale tokens.
const STANDARD_COLORS: [(&str, &str); 17] = [
    ("#000000", "black"),
    ("#ffffff", "white"),
    ("#f3f4f6", "gray-100"),
    ("#e5e7eb", "gray-200"),
    ("#d1d5db", "gray-300"),
    ("#9ca3af", "gray-400"),
    ("#6b7280", "gray-500"),
    ("#4b5563", "gray-600"),
    ("#374151", "gray-700"),
    ("#1f2937", "gray-800"),
    ("#111827", "gray-900"),
    ("#3b82f6", "blue-500"),
    ("#2563eb", "blue-600"),
    ("#1d4ed8", "blue-700"),
    ("#ef4444", "red-500"),
    ("#10b981", "green-500"),
    ("#f59e0b", "yellow-500"),
];

/// Convert normalized layout attributes to an ordered class list.
pub fn layout_to_classes(layout: &LayoutInfo) -> Vec<String> {
    let mut classes = Vec::new();

    if layout.display == Display::Flex {
        classes.push("flex".to_string());

        match layout.direction {
            Some(prism_extract::Direction::Column) => classes.push("flex-col".to_string()),
            _ => classes.push("flex-row".to_string()),
        }

        if let Some(justify) = &layout.justify_content {
            if let Some(class) = justify_class(justify) {
                classes.push(class.to_string());
            }
        }

        if let Some(align) = &layout.align_items {
            if let Some(class) = align_class(align) {
                classes.push(class.to_string());
            }
        }

        if let Some(gap) = layout.gap {
            classes.push(spacing_class(gap, "gap"));
        }

        if layout.wrap {
            classes.push("flex-wrap".to_string());
        }
    }

    if let Some(padding) = &layout.padding {
        let (top, right, bottom, left) = (padding.top, padding.right, padding.bottom, padding.left);

        if top == right && right == bottom && bottom == left {
            classes.push(spacing_class(top, "p"));
        } else if top == bottom && left == right {
            classes.push(spacing_class(top, "py"));
            classes.push(spacing_class(left, "px"));
        } else {
            classes.push(spacing_class(top, "pt"));
            classes.push(spacing_class(right, "pr"));
            classes.push(spacing_class(bottom, "pb"));
            classes.push(spacing_class(left, "pl"));
        }
    }

    if let Some(width) = layout.width {
        classes.push(dimension_class(width, "w"));
    }
    if let Some(height) = layout.height {
        classes.push(dimension_class(height, "h"));
    }

    classes
}

/// Convert normalized style attributes to an ordered class list.
pub fn styles_to_classes(styles: &StyleInfo) -> Vec<String> {
    let mut classes = Vec::new();

    if let Some(background) = &styles.background_color {
        classes.push(color_class(background, "bg"));
    }

    if let Some(color) = &styles.color {
        classes.push(color_class(color, "text"));
    }

    if let Some(size) = styles.font_size {
        classes.push(font_size_class(size));
    }

    if let Some(weight) = styles.font_weight {
        classes.push(font_weight_class(weight));
    }

    if let Some(radius) = styles.border_radius {
        classes.push(border_radius_class(radius));
    }

    if let Some(width) = styles.border_width {
        classes.push(border_width_class(width));
        if let Some(color) = &styles.border_color {
            classes.push(color_class(color, "border"));
        }
    }

    // Exact shadow geometry is not reproduced; presence maps to one token.
    if styles.box_shadow.is_some() {
        classes.push("shadow-lg".to_string());
    }

    if let Some(opacity) = styles.opacity {
        if opacity < 1.0 {
            classes.push(opacity_class(opacity));
        }
    }

    classes
}

pub fn combine_classes(classes: &[String]) -> String {
    classes.join(" ")
}

fn justify_class(value: &str) -> Option<&'static str> {
    match value {
        "center" => Some("justify-center"),
        "flex-start" => Some("justify-start"),
        "flex-end" => Some("justify-end"),
        "space-between" => Some("justify-between"),
        "space-around" => Some("justify-around"),
        _ => None,
    }
}

fn align_class(value: &str) -> Option<&'static str> {
    match value {
        "center" => Some("items-center"),
        "flex-start" => Some("items-start"),
        "flex-end" => Some("items-end"),
        "stretch" => Some("items-stretch"),
        _ => None,
    }
}

/// px → scale units (1 unit = 4px): 0-6 map directly, 7-64 snap to the
/// nearest standard unit, larger values keep an explicit pixel literal.
fn spacing_class(px: f64, prefix: &str) -> String {
    let unit = (px / 4.0).round() as i64;

    if unit == 0 {
        return format!("{prefix}-0");
    }
    if unit <= 6 {
        return format!("{prefix}-{unit}");
    }
    if unit <= 64 {
        let closest = STANDARD_SPACING_UNITS
            .iter()
            .copied()
            .min_by_key(|candidate| (*candidate as i64 - unit).abs())
            .unwrap_or(64);
        return format!("{prefix}-{closest}");
    }

    format!("{prefix}-[{px}px]")
}

fn dimension_class(value: Dimension, prefix: &str) -> String {
    match value {
        Dimension::Full => format!("{prefix}-full"),
        Dimension::Auto => format!("{prefix}-auto"),
        Dimension::Px(px) => size_class(px, prefix),
    }
}

fn size_class(px: f64, prefix: &str) -> String {
    if px == 0.0 {
        return format!("{prefix}-0");
    }

    if px.fract() == 0.0 {
        let whole = px as u32;
        if let Some((_, step)) = STANDARD_SIZES.iter().find(|(size, _)| *size == whole) {
            return format!("{prefix}-{step}");
        }
    }

    format!("{prefix}-[{px}px]")
}

fn color_class(hex: &str, prefix: &str) -> String {
    let lower = hex.to_lowercase();
    let normalized = if lower.len() > 7 { &lower[..7] } else { &lower };

    if let Some((_, name)) = STANDARD_COLORS.iter().find(|(value, _)| *value == normalized) {
        return format!("{prefix}-{name}");
    }

    format!("{prefix}-[{hex}]")
}

fn font_size_class(size: f64) -> String {
    match size {
        s if s <= 12.0 => "text-xs".to_string(),
        s if s <= 14.0 => "text-sm".to_string(),
        s if s <= 16.0 => "text-base".to_string(),
        s if s <= 18.0 => "text-lg".to_string(),
        s if s <= 20.0 => "text-xl".to_string(),
        s if s <= 24.0 => "text-2xl".to_string(),
        s if s <= 30.0 => "text-3xl".to_string(),
        s if s <= 36.0 => "text-4xl".to_string(),
        s if s <= 48.0 => "text-5xl".to_string(),
        s if s <= 60.0 => "text-6xl".to_string(),
        _ => format!("text-[{size}px]"),
    }
}

fn font_weight_class(weight: f64) -> String {
    let class = match weight {
        w if w <= 200.0 => "font-extralight",
        w if w <= 300.0 => "font-light",
        w if w <= 400.0 => "font-normal",
        w if w <= 500.0 => "font-medium",
        w if w <= 600.0 => "font-semibold",
        w if w <= 700.0 => "font-bold",
        w if w <= 800.0 => "font-extrabold",
        _ => "font-black",
    };
    class.to_string()
}

fn border_radius_class(radius: f64) -> String {
    match radius {
        r if r == 0.0 => "rounded-none".to_string(),
        r if r >= 9999.0 => "rounded-full".to_string(),
        r if r <= 2.0 => "rounded-sm".to_string(),
        r if r <= 4.0 => "rounded".to_string(),
        r if r <= 6.0 => "rounded-md".to_string(),
        r if r <= 8.0 => "rounded-lg".to_string(),
        r if r <= 12.0 => "rounded-xl".to_string(),
        r if r <= 16.0 => "rounded-2xl".to_string(),
        _ => format!("rounded-[{radius}px]"),
    }
}

fn border_width_class(width: f64) -> String {
    match width {
        w if w == 0.0 => "border-0".to_string(),
        w if w <= 1.0 => "border".to_string(),
        w if w <= 2.0 => "border-2".to_string(),
        w if w <= 4.0 => "border-4".to_string(),
        w if w <= 8.0 => "border-8".to_string(),
        _ => format!("border-[{width}px]"),
    }
}

fn opacity_class(opacity: f64) -> String {
    let percent = (opacity * 100.0).round() as i64;

    let class = match percent {
        0 => "opacity-0",
        p if p <= 5 => "opacity-5",
        p if p <= 10 => "opacity-10",
        p if p <= 25 => "opacity-25",
        p if p <= 50 => "opacity-50",
        p if p <= 75 => "opacity-75",
        p if p <= 90 => "opacity-90",
        p if p <= 95 => "opacity-95",
        _ => "opacity-100",
    };
    class.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_extract::{Direction, PaddingBox};

    #[test]
    fn uniform_padding_collapses_to_one_class() {
        let layout = LayoutInfo {
            padding: Some(PaddingBox::uniform(16.0)),
            ..Default::default()
        };
        assert_eq!(layout_to_classes(&layout), vec!["p-4"]);
    }

    #[test]
    fn axis_padding_collapses_to_two_classes() {
        let layout = LayoutInfo {
            padding: Some(PaddingBox {
                top: 8.0,
                bottom: 8.0,
                left: 24.0,
                right: 24.0,
            }),
            ..Default::default()
        };
        assert_eq!(layout_to_classes(&layout), vec!["py-2", "px-6"]);
    }

    #[test]
    fn mixed_padding_emits_four_classes() {
        let layout = LayoutInfo {
            padding: Some(PaddingBox {
                top: 4.0,
                right: 8.0,
                bottom: 12.0,
                left: 16.0,
            }),
            ..Default::default()
        };
        assert_eq!(
            layout_to_classes(&layout),
            vec!["pt-1", "pr-2", "pb-3", "pl-4"]
        );
    }

    #[test]
    fn flex_layout_emits_direction_and_alignment() {
        let layout = LayoutInfo {
            display: Display::Flex,
            direction: Some(Direction::Row),
            justify_content: Some("space-between".to_string()),
            align_items: Some("center".to_string()),
            gap: Some(12.0),
            wrap: true,
            ..Default::default()
        };
        assert_eq!(
            layout_to_classes(&layout),
            vec![
                "flex",
                "flex-row",
                "justify-between",
                "items-center",
                "gap-3",
                "flex-wrap"
            ]
        );
    }

    #[test]
    fn spacing_snaps_to_nearest_standard_unit() {
        // 60px = 15 units, nearest of {12, 16} is 16.
        assert_eq!(spacing_class(60.0, "p"), "p-16");
        // 300px = 75 units, beyond the scale: explicit literal.
        assert_eq!(spacing_class(300.0, "p"), "p-[300px]");
    }

    #[test]
    fn sizes_use_lookup_table_with_literal_fallback() {
        assert_eq!(size_class(128.0, "w"), "w-32");
        assert_eq!(size_class(130.0, "w"), "w-[130px]");
        assert_eq!(size_class(0.0, "h"), "h-0");
    }

    #[test]
    fn known_colors_map_to_named_tokens() {
        let styles = StyleInfo {
            background_color: Some("#3b82f6".to_string()),
            ..Default::default()
        };
        assert_eq!(styles_to_classes(&styles), vec!["bg-blue-500"]);
    }

    #[test]
    fn unknown_colors_fall_back_to_literals() {
        let styles = StyleInfo {
            background_color: Some("#123456".to_string()),
            ..Default::default()
        };
        assert_eq!(styles_to_classes(&styles), vec!["bg-[#123456]"]);
    }

    #[test]
    fn translucent_hex_matches_on_rgb_prefix() {
        // An eight-digit hex still matches its six-digit base color.
        assert_eq!(color_class("#ffffff80", "bg"), "bg-white");
    }

    #[test]
    fn threshold_ladders() {
        assert_eq!(font_size_class(15.0), "text-base");
        assert_eq!(font_size_class(72.0), "text-[72px]");
        assert_eq!(font_weight_class(700.0), "font-bold");
        assert_eq!(border_radius_class(8.0), "rounded-lg");
        assert_eq!(border_radius_class(9999.0), "rounded-full");
        assert_eq!(border_width_class(1.0), "border");
        assert_eq!(opacity_class(0.5), "opacity-50");
    }

    #[test]
    fn shadow_presence_maps_to_single_token() {
        let styles = StyleInfo {
            box_shadow: Some("0px 2px 4px #00000040".to_string()),
            ..Default::default()
        };
        assert_eq!(styles_to_classes(&styles), vec!["shadow-lg"]);
    }
}
