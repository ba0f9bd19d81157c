//! # Themes
//!
//! A theme is a flat set of named visual constants: colors, font families,
//! sizes and spacing. It is resolved once per render and shared read-only by
//! every block renderer.
//!
//! Theme files are partial: any key they leave out takes the value from the
//! default theme, so `{"accent": "#0b7285"}` is a complete theme.

use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

/// An RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse `#rgb` or `#rrggbb`. Returns `None` for anything else.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        let (r, g, b) = match hex.len() {
            3 => (
                channel(&hex[0..1].repeat(2))?,
                channel(&hex[1..2].repeat(2))?,
                channel(&hex[2..3].repeat(2))?,
            ),
            6 => (
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            ),
            _ => return None,
        };
        Some(Self::rgb(
            r as f64 / 255.0,
            g as f64 / 255.0,
            b as f64 / 255.0,
        ))
    }

    /// Hex literal for built-in themes. Invalid input yields black.
    fn hex(hex: &str) -> Self {
        Self::from_hex(hex).unwrap_or(Color::BLACK)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

// Colors arrive either as "#rrggbb" strings (hand-written theme files) or as
// {r, g, b, a} objects (machine-written ones).
impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ColorVisitor;

        impl<'de> Visitor<'de> for ColorVisitor {
            type Value = Color;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a \"#rrggbb\" string or an {r, g, b, a} object")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Color, E> {
                Color::from_hex(v).ok_or_else(|| E::custom(format!("invalid color '{}'", v)))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Color, A::Error> {
                let mut color = Color::BLACK;
                while let Some(key) = map.next_key::<String>()? {
                    let v: f64 = map.next_value()?;
                    match key.as_str() {
                        "r" => color.r = v,
                        "g" => color.g = v,
                        "b" => color.b = v,
                        "a" => color.a = v,
                        _ => {}
                    }
                }
                Ok(color)
            }
        }

        deserializer.deserialize_any(ColorVisitor)
    }
}

/// Text direction for a render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

impl Direction {
    pub fn is_rtl(self) -> bool {
        matches!(self, Direction::Rtl)
    }
}

/// Horizontal alignment of a line within its frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Named visual constants consumed by the block renderers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub name: String,

    // Colors
    pub heading_color: Color,
    pub text_color: Color,
    pub muted_color: Color,
    pub accent_color: Color,
    pub rule_color: Color,
    pub link_color: Color,
    pub chip_background: Color,
    pub chip_text: Color,
    pub avatar_ring: Color,

    // Fonts
    pub font_family: String,
    /// Family used when a run of text is in a right-to-left script.
    pub rtl_font_family: Option<String>,

    // Sizes, in points
    pub name_size: f64,
    pub title_size: f64,
    pub heading_size: f64,
    pub text_size: f64,
    pub small_size: f64,
    /// Line height as a multiple of the font size.
    pub leading: f64,

    // Rules and spacing, in points
    pub rule_width: f64,
    pub gap_after_heading: f64,
    pub rule_to_text_gap: f64,
    pub paragraph_gap: f64,
    pub item_gap: f64,
    pub section_gap: f64,
    pub chip_padding_x: f64,
    pub chip_padding_y: f64,
    pub chip_gap: f64,
    pub chip_radius: f64,
    pub avatar_ring_width: f64,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            heading_color: Color::hex("#1f2937"),
            text_color: Color::hex("#111111"),
            muted_color: Color::hex("#6b7280"),
            accent_color: Color::hex("#2563eb"),
            rule_color: Color::hex("#d1d5db"),
            link_color: Color::hex("#1d4ed8"),
            chip_background: Color::hex("#eef2f7"),
            chip_text: Color::hex("#1f2937"),
            avatar_ring: Color::hex("#d1d5db"),
            font_family: "Helvetica".to_string(),
            rtl_font_family: None,
            name_size: 22.0,
            title_size: 12.0,
            heading_size: 12.5,
            text_size: 10.0,
            small_size: 9.0,
            leading: 1.35,
            rule_width: 0.8,
            gap_after_heading: 6.0,
            rule_to_text_gap: 4.0,
            paragraph_gap: 4.0,
            item_gap: 6.0,
            section_gap: 12.0,
            chip_padding_x: 6.0,
            chip_padding_y: 3.0,
            chip_gap: 5.0,
            chip_radius: 4.0,
            avatar_ring_width: 1.0,
        }
    }
}

impl Theme {
    /// Names of the themes compiled into the crate.
    pub const BUILT_IN: [&'static str; 3] = ["default", "classic", "aqua"];

    /// Look up a built-in theme by (normalized) name.
    pub fn built_in(name: &str) -> Option<Theme> {
        match normalize_theme_name(name).as_str() {
            "" | "default" => Some(Theme::default()),
            "classic" => Some(Theme {
                name: "classic".to_string(),
                heading_color: Color::BLACK,
                text_color: Color::BLACK,
                accent_color: Color::hex("#444444"),
                rule_color: Color::BLACK,
                link_color: Color::hex("#222222"),
                chip_background: Color::WHITE,
                chip_text: Color::BLACK,
                font_family: "Times".to_string(),
                rule_width: 0.5,
                ..Theme::default()
            }),
            "aqua" | "aqua-card-3col" => Some(Theme {
                name: "aqua".to_string(),
                heading_color: Color::hex("#0b7285"),
                accent_color: Color::hex("#1098ad"),
                rule_color: Color::hex("#99e9f2"),
                link_color: Color::hex("#0c8599"),
                chip_background: Color::hex("#e3fafc"),
                chip_text: Color::hex("#0b7285"),
                avatar_ring: Color::hex("#1098ad"),
                chip_radius: 8.0,
                avatar_ring_width: 2.0,
                ..Theme::default()
            }),
            _ => None,
        }
    }

    /// Resolve a theme name, falling back to `default` (with a warning) when
    /// the name is unknown.
    pub fn resolve(name: &str) -> Theme {
        match Theme::built_in(name) {
            Some(theme) => theme,
            None => {
                log::warn!("Unknown theme '{}', using 'default'", name);
                Theme::default()
            }
        }
    }

    /// Parse a (possibly partial) theme file. Missing keys come from the
    /// default theme.
    pub fn from_json(json: &str) -> crate::error::Result<Theme> {
        Ok(serde_json::from_str(json)?)
    }

    /// Line height for a given font size.
    pub fn line_height(&self, size: f64) -> f64 {
        size * self.leading
    }

    /// Family to use for a piece of text, switching to the RTL family when
    /// one is configured and the text needs it.
    pub fn family_for(&self, text: &str) -> &str {
        match &self.rtl_font_family {
            Some(family) if crate::text::bidi::needs_rtl_font(text) => family,
            _ => &self.font_family,
        }
    }
}

/// Drop a trailing `.theme.json` and surrounding whitespace.
pub fn normalize_theme_name(name: &str) -> String {
    let name = name.trim();
    name.strip_suffix(".theme.json").unwrap_or(name).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        let c = Color::from_hex("#ff8000").unwrap();
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-9);
        assert_eq!(c.b, 0.0);
        assert_eq!(Color::from_hex("#fff"), Some(Color::WHITE));
        assert!(Color::from_hex("#12345").is_none());
        assert!(Color::from_hex("zzzzzz").is_none());
    }

    #[test]
    fn color_deserializes_from_string_or_object() {
        let a: Color = serde_json::from_str("\"#000000\"").unwrap();
        assert_eq!(a, Color::BLACK);
        let b: Color = serde_json::from_str(r#"{"r": 1, "g": 1, "b": 1, "a": 1}"#).unwrap();
        assert_eq!(b, Color::WHITE);
        assert!(serde_json::from_str::<Color>("\"red\"").is_err());
    }

    #[test]
    fn theme_name_normalization() {
        assert_eq!(normalize_theme_name("aqua.theme.json"), "aqua");
        assert_eq!(normalize_theme_name(" classic "), "classic");
        assert_eq!(normalize_theme_name("default"), "default");
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        let theme = Theme::resolve("does-not-exist");
        assert_eq!(theme.name, "default");
        assert_eq!(Theme::resolve("aqua.theme.json").name, "aqua");
    }

    #[test]
    fn partial_theme_file_layers_over_default() {
        let theme = Theme::from_json(r##"{"name": "mine", "accent_color": "#000000", "text_size": 11}"##)
            .unwrap();
        assert_eq!(theme.name, "mine");
        assert_eq!(theme.accent_color, Color::BLACK);
        assert_eq!(theme.text_size, 11.0);
        assert_eq!(theme.name_size, Theme::default().name_size);
    }

    #[test]
    fn every_built_in_resolves() {
        for name in Theme::BUILT_IN {
            assert!(Theme::built_in(name).is_some(), "{}", name);
        }
    }

    #[test]
    fn rtl_family_only_for_rtl_text() {
        let theme = Theme {
            rtl_font_family: Some("Amiri".to_string()),
            ..Theme::default()
        };
        assert_eq!(theme.family_for("Hello"), "Helvetica");
        assert_eq!(theme.family_for("مرحبا"), "Amiri");
    }
}
