//! # Font Management
//!
//! The font context answers two questions for the rest of the engine: how
//! wide is this text, and which font object does the PDF writer embed for a
//! given (family, weight, italic) triple.
//!
//! The standard PDF fonts (Helvetica, Times, Courier) are always available
//! and need no embedding. TrueType fonts registered at engine start-up are
//! parsed with ttf-parser for their metrics and embedded whole.

pub mod metrics;

use std::collections::HashMap;
use std::path::Path;

pub use metrics::StandardFontMetrics;

use crate::error::{Result, VitaeError};

/// A font registry that maps font family + weight + style to font data.
pub struct FontRegistry {
    fonts: HashMap<FontKey, FontData>,
}

#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct FontKey {
    pub family: String,
    pub weight: u32,
    pub italic: bool,
}

impl FontKey {
    pub fn new(family: &str, weight: u32, italic: bool) -> Self {
        Self {
            family: family.to_string(),
            weight: snap_weight(weight),
            italic,
        }
    }
}

/// Weights collapse to regular (400) or bold (700).
pub fn snap_weight(weight: u32) -> u32 {
    if weight >= 600 {
        700
    } else {
        400
    }
}

#[derive(Debug, Clone)]
pub enum FontData {
    /// One of the standard PDF fonts. No embedding needed.
    Standard(StandardFont),
    /// A TrueType font that is embedded in the output.
    Custom {
        data: Vec<u8>,
        metrics: CustomFontMetrics,
    },
}

static HELVETICA: FontData = FontData::Standard(StandardFont::Helvetica);

/// Parsed metrics from a TrueType/OpenType font via ttf-parser.
#[derive(Debug, Clone)]
pub struct CustomFontMetrics {
    pub units_per_em: u16,
    pub advance_widths: HashMap<char, u16>,
    pub default_advance: u16,
    pub ascender: i16,
    pub descender: i16,
}

impl CustomFontMetrics {
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let w = self
            .advance_widths
            .get(&ch)
            .copied()
            .unwrap_or(self.default_advance);
        (w as f64 / self.units_per_em as f64) * font_size
    }

    pub fn from_font_data(data: &[u8]) -> Option<Self> {
        let face = ttf_parser::Face::parse(data, 0).ok()?;
        let units_per_em = face.units_per_em();

        let mut advance_widths = HashMap::new();
        let mut default_advance = 0u16;
        for code in 32u32..=0xFFFF {
            let Some(ch) = char::from_u32(code) else {
                continue;
            };
            if let Some(glyph_id) = face.glyph_index(ch) {
                let advance = face.glyph_hor_advance(glyph_id).unwrap_or(0);
                advance_widths.insert(ch, advance);
                if ch == ' ' {
                    default_advance = advance;
                }
            }
        }
        if default_advance == 0 {
            default_advance = units_per_em / 2;
        }

        Some(CustomFontMetrics {
            units_per_em,
            advance_widths,
            default_advance,
            ascender: face.ascender(),
            descender: face.descender(),
        })
    }
}

/// The standard PDF fonts a résumé can use without embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

impl StandardFont {
    /// The PDF name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
            Self::HelveticaBoldOblique => "Helvetica-BoldOblique",
            Self::TimesRoman => "Times-Roman",
            Self::TimesBold => "Times-Bold",
            Self::TimesItalic => "Times-Italic",
            Self::TimesBoldItalic => "Times-BoldItalic",
            Self::Courier => "Courier",
            Self::CourierBold => "Courier-Bold",
            Self::CourierOblique => "Courier-Oblique",
            Self::CourierBoldOblique => "Courier-BoldOblique",
        }
    }
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FontRegistry {
    pub fn new() -> Self {
        let standard_mappings = [
            (("Helvetica", 400, false), StandardFont::Helvetica),
            (("Helvetica", 700, false), StandardFont::HelveticaBold),
            (("Helvetica", 400, true), StandardFont::HelveticaOblique),
            (("Helvetica", 700, true), StandardFont::HelveticaBoldOblique),
            (("Times", 400, false), StandardFont::TimesRoman),
            (("Times", 700, false), StandardFont::TimesBold),
            (("Times", 400, true), StandardFont::TimesItalic),
            (("Times", 700, true), StandardFont::TimesBoldItalic),
            (("Courier", 400, false), StandardFont::Courier),
            (("Courier", 700, false), StandardFont::CourierBold),
            (("Courier", 400, true), StandardFont::CourierOblique),
            (("Courier", 700, true), StandardFont::CourierBoldOblique),
        ];

        let fonts = standard_mappings
            .into_iter()
            .map(|((family, weight, italic), font)| {
                (FontKey::new(family, weight, italic), FontData::Standard(font))
            })
            .collect();

        Self { fonts }
    }

    /// Look up a font. Unknown families fall back to Helvetica; a missing
    /// italic face falls back to the upright one of the same family.
    pub fn resolve(&self, family: &str, weight: u32, italic: bool) -> &FontData {
        self.fonts
            .get(&self.resolve_key(family, weight, italic))
            .unwrap_or(&HELVETICA)
    }

    /// The key of the face [`FontRegistry::resolve`] picks. Two requests
    /// that fall back to the same face get the same key.
    pub fn resolve_key(&self, family: &str, weight: u32, italic: bool) -> FontKey {
        let weight = snap_weight(weight);
        let candidates = [
            (family, weight, italic),
            (family, weight, false),
            (family, 400, false),
            ("Helvetica", weight, italic),
        ];
        candidates
            .iter()
            .map(|(f, w, i)| FontKey::new(f, *w, *i))
            .find(|key| self.fonts.contains_key(key))
            .unwrap_or_else(|| FontKey::new("Helvetica", 400, false))
    }

    /// Register a TrueType font. Fails if the data is not a parseable font.
    pub fn register(&mut self, family: &str, weight: u32, italic: bool, data: Vec<u8>) -> Result<()> {
        let metrics = CustomFontMetrics::from_font_data(&data).ok_or_else(|| {
            VitaeError::Font(format!("Failed to parse font data for family '{}'", family))
        })?;
        self.fonts.insert(
            FontKey::new(family, weight, italic),
            FontData::Custom { data, metrics },
        );
        Ok(())
    }

    pub fn contains_family(&self, family: &str) -> bool {
        self.fonts.keys().any(|k| k.family == family)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FontKey, &FontData)> {
        self.fonts.iter()
    }
}

/// Shared font context used by the renderers and the PDF writer.
/// Provides text measurement with real glyph metrics.
#[derive(Default)]
pub struct FontContext {
    registry: FontRegistry,
}

impl FontContext {
    pub fn new() -> Self {
        Self {
            registry: FontRegistry::new(),
        }
    }

    /// Advance width of a single character in points.
    pub fn char_width(&self, ch: char, family: &str, weight: u32, italic: bool, font_size: f64) -> f64 {
        match self.registry.resolve(family, weight, italic) {
            FontData::Standard(std_font) => std_font.metrics().char_width(ch, font_size),
            FontData::Custom { metrics, .. } => metrics.char_width(ch, font_size),
        }
    }

    /// Width of a string in points.
    pub fn measure_string(&self, text: &str, family: &str, weight: u32, italic: bool, font_size: f64) -> f64 {
        match self.registry.resolve(family, weight, italic) {
            FontData::Standard(std_font) => std_font.metrics().measure_string(text, font_size),
            FontData::Custom { metrics, .. } => {
                text.chars().map(|ch| metrics.char_width(ch, font_size)).sum()
            }
        }
    }

    /// Distance from the top of a line box to the baseline, in points.
    pub fn ascent(&self, family: &str, weight: u32, italic: bool, font_size: f64) -> f64 {
        match self.registry.resolve(family, weight, italic) {
            FontData::Standard(std_font) => std_font.metrics().ascent as f64 / 1000.0 * font_size,
            FontData::Custom { metrics, .. } => {
                metrics.ascender as f64 / metrics.units_per_em as f64 * font_size
            }
        }
    }

    pub fn resolve(&self, family: &str, weight: u32, italic: bool) -> &FontData {
        self.registry.resolve(family, weight, italic)
    }

    pub fn resolve_key(&self, family: &str, weight: u32, italic: bool) -> FontKey {
        self.registry.resolve_key(family, weight, italic)
    }

    pub fn registry(&self) -> &FontRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut FontRegistry {
        &mut self.registry
    }

    /// Register every `.ttf`/`.otf` file in a directory. The file stem names
    /// the face: `Amiri-Bold.ttf` is family "Amiri", weight 700;
    /// `Inter-Italic.ttf` is "Inter", italic. Unreadable files are logged and
    /// skipped. Returns the number of faces registered.
    pub fn load_font_dir(&mut self, dir: &Path) -> Result<usize> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.extension()
                    .and_then(|e| e.to_str())
                    .map(|e| matches!(e.to_ascii_lowercase().as_str(), "ttf" | "otf"))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();

        let mut count = 0;
        for path in paths {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let (family, weight, italic) = parse_face_name(stem);
            let data = match std::fs::read(&path) {
                Ok(data) => data,
                Err(e) => {
                    log::warn!("Skipping font {}: {}", path.display(), e);
                    continue;
                }
            };
            match self.registry.register(&family, weight, italic, data) {
                Ok(()) => {
                    log::debug!("Registered font {} ({}, {}, italic={})", path.display(), family, weight, italic);
                    count += 1;
                }
                Err(e) => log::warn!("Skipping font {}: {}", path.display(), e),
            }
        }
        Ok(count)
    }
}

/// Split a font file stem into (family, weight, italic).
fn parse_face_name(stem: &str) -> (String, u32, bool) {
    let (family, style) = match stem.rsplit_once('-') {
        Some((family, style)) if !family.is_empty() => (family, style.to_ascii_lowercase()),
        _ => return (stem.to_string(), 400, false),
    };
    let weight = match style.trim_end_matches("italic") {
        "bold" | "semibold" | "extrabold" | "black" => 700,
        "" | "regular" | "medium" | "light" | "book" => 400,
        // Unrecognized suffix: part of the family name.
        _ => return (stem.to_string(), 400, false),
    };
    (family.to_string(), weight, style.ends_with("italic"))
}
