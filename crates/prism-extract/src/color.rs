use prism_design::Rgba;

/// Encode RGBA floats in [0, 1] as `#rrggbb`, or `#rrggbbaa` when the color
/// is not fully opaque. Channels round to the nearest integer 0-255,
/// two-digit lowercase hex.
pub fn rgba_to_hex(color: &Rgba) -> String {
    let r = channel_to_u8(color.r);
    let g = channel_to_u8(color.g);
    let b = channel_to_u8(color.b);

    if color.a < 1.0 {
        let a = channel_to_u8(color.a);
        format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
    } else {
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

/// Inverse of [`rgba_to_hex`], accurate to 1/255 per channel. Accepts
/// `#rgb`-less forms only: six or eight hex digits with a leading `#`.
pub fn hex_to_rgba(hex: &str) -> Option<Rgba> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 && digits.len() != 8 {
        return None;
    }

    let parse = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .ok()
            .map(|v| v as f64 / 255.0)
    };

    let r = parse(0..2)?;
    let g = parse(2..4)?;
    let b = parse(4..6)?;
    let a = if digits.len() == 8 { parse(6..8)? } else { 1.0 };

    Some(Rgba { r, g, b, a })
}

fn channel_to_u8(channel: f64) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}
