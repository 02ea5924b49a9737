use image::Rgba;

use crate::error::{IconError, Result};

/// Fill color used when neither the config file nor the CLI says otherwise.
pub const DEFAULT_COLOR: &str = "#5DADE2";

/// A fill color given either as a color name or a hex string.
///
/// Resolution to a concrete RGBA value happens in [`ColorSpec::resolve`],
/// before any drawing takes place.
#[derive(Clone, Debug, PartialEq)]
pub enum ColorSpec {
    Named(String),
    Hex(String),
}

impl ColorSpec {
    pub fn parse(spec: &str) -> Self {
        if spec.starts_with('#') {
            ColorSpec::Hex(spec.to_string())
        } else {
            ColorSpec::Named(spec.to_ascii_lowercase())
        }
    }

    pub fn resolve(&self) -> Result<Rgba<u8>> {
        match self {
            ColorSpec::Named(name) => {
                named_color(name).ok_or_else(|| IconError::Color(name.clone()))
            }
            ColorSpec::Hex(hex) => parse_hex(hex).ok_or_else(|| IconError::Color(hex.clone())),
        }
    }
}

/// The CSS basic color keywords, plus a couple of common aliases.
fn named_color(name: &str) -> Option<Rgba<u8>> {
    let rgb = match name {
        "black" => [0, 0, 0],
        "silver" => [192, 192, 192],
        "gray" | "grey" => [128, 128, 128],
        "white" => [255, 255, 255],
        "maroon" => [128, 0, 0],
        "red" => [255, 0, 0],
        "purple" => [128, 0, 128],
        "fuchsia" | "magenta" => [255, 0, 255],
        "green" => [0, 128, 0],
        "lime" => [0, 255, 0],
        "olive" => [128, 128, 0],
        "yellow" => [255, 255, 0],
        "navy" => [0, 0, 128],
        "blue" => [0, 0, 255],
        "teal" => [0, 128, 128],
        "aqua" | "cyan" => [0, 255, 255],
        "orange" => [255, 165, 0],
        _ => return None,
    };
    Some(Rgba([rgb[0], rgb[1], rgb[2], 255]))
}

/// Parses `#RGB`, `#RGBA`, `#RRGGBB` and `#RRGGBBAA`.
fn parse_hex(hex: &str) -> Option<Rgba<u8>> {
    let digits = hex.strip_prefix('#')?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let pair = |s: &str| u8::from_str_radix(s, 16).ok();
    // A single digit expands to both nibbles, 0xA -> 0xAA.
    let single = |s: &str| pair(s).map(|n| n * 17);
    match digits.len() {
        3 => Some(Rgba([
            single(&digits[0..1])?,
            single(&digits[1..2])?,
            single(&digits[2..3])?,
            255,
        ])),
        4 => Some(Rgba([
            single(&digits[0..1])?,
            single(&digits[1..2])?,
            single(&digits[2..3])?,
            single(&digits[3..4])?,
        ])),
        6 => Some(Rgba([
            pair(&digits[0..2])?,
            pair(&digits[2..4])?,
            pair(&digits[4..6])?,
            255,
        ])),
        8 => Some(Rgba([
            pair(&digits[0..2])?,
            pair(&digits[2..4])?,
            pair(&digits[4..6])?,
            pair(&digits[6..8])?,
        ])),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_colors() {
        assert_eq!(
            ColorSpec::parse("red").resolve().unwrap(),
            Rgba([255, 0, 0, 255])
        );
        // Names are case-insensitive
        assert_eq!(
            ColorSpec::parse("Orange").resolve().unwrap(),
            Rgba([255, 165, 0, 255])
        );
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(
            ColorSpec::parse("#5DADE2").resolve().unwrap(),
            Rgba([0x5d, 0xad, 0xe2, 255])
        );
        assert_eq!(
            ColorSpec::parse("#fff").resolve().unwrap(),
            Rgba([255, 255, 255, 255])
        );
        assert_eq!(
            ColorSpec::parse("#11223344").resolve().unwrap(),
            Rgba([0x11, 0x22, 0x33, 0x44])
        );
    }

    #[test]
    fn test_invalid_colors() {
        assert!(ColorSpec::parse("#12345").resolve().is_err());
        assert!(ColorSpec::parse("#gggggg").resolve().is_err());
        assert!(ColorSpec::parse("notacolor").resolve().is_err());
    }

    #[test]
    fn test_default_color_resolves() {
        assert!(ColorSpec::parse(DEFAULT_COLOR).resolve().is_ok());
    }
}
