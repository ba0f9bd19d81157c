//! # Input Model
//!
//! The two documents a render call consumes: a [`Profile`] (structured
//! personal data) and a [`Layout`] (an ordered flow of frames, each holding
//! ordered block instances). Both deserialize leniently: unknown keys are
//! ignored and missing keys take their documented defaults, so renderers can
//! assume every list is present.
//!
//! Geometry uses PDF points (1/72 inch) with the origin at the top-left of
//! the page and y growing downwards. The PDF writer flips to PDF's
//! bottom-up coordinate system at serialization time.

pub mod layout;
pub mod profile;

pub use layout::{BlockInstance, Frame, FrameGeometry, Layout, Unit};
pub use profile::{Contact, EducationEntry, Header, Profile, ProjectEntry};

use serde::{Deserialize, Serialize};

/// Points per millimetre.
pub const PT_PER_MM: f64 = 72.0 / 25.4;

/// Convert millimetres to points.
pub fn mm(v: f64) -> f64 {
    v * PT_PER_MM
}

/// Document metadata embedded in the PDF.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    /// Document language (BCP 47 tag, e.g. "en-US"). Emitted as /Lang in the PDF Catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

/// Configuration for a page: size and margins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    /// Page size. Defaults to A4.
    #[serde(default)]
    pub size: PageSize,

    /// Page margins in points.
    #[serde(default = "default_margin")]
    pub margin: Edges,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            size: PageSize::A4,
            margin: default_margin(),
        }
    }
}

fn default_margin() -> Edges {
    Edges::uniform(36.0)
}

impl PageConfig {
    /// (width, height) of the page in points.
    pub fn dimensions(&self) -> (f64, f64) {
        self.size.dimensions()
    }

    /// The y coordinate content must not cross.
    pub fn content_bottom(&self) -> f64 {
        self.size.dimensions().1 - self.margin.bottom
    }

    pub fn content_width(&self) -> f64 {
        (self.size.dimensions().0 - self.margin.horizontal()).max(0.0)
    }
}

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points. Negative or NaN custom sizes
    /// read as zero.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (width.max(0.0), height.max(0.0)),
        }
    }
}

/// Edge values (top, right, bottom, left) used for margins.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Edges {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub right: f64,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default)]
    pub left: f64,
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mm_conversion() {
        assert!((mm(25.4) - 72.0).abs() < 1e-9);
        assert!((mm(42.0) - 119.055).abs() < 0.001);
    }

    #[test]
    fn page_config_defaults_to_a4() {
        let cfg: PageConfig = serde_json::from_str("{}").unwrap();
        let (w, h) = cfg.dimensions();
        assert!((w - 595.28).abs() < 0.01);
        assert!((h - 841.89).abs() < 0.01);
        assert!((cfg.content_bottom() - (841.89 - 36.0)).abs() < 0.01);
    }

    #[test]
    fn custom_page_size() {
        let cfg: PageConfig = serde_json::from_str(
            r#"{"size": {"Custom": {"width": 300, "height": 400}}, "margin": {"top": 10, "bottom": 20}}"#,
        )
        .unwrap();
        assert_eq!(cfg.dimensions(), (300.0, 400.0));
        assert_eq!(cfg.content_bottom(), 380.0);
        assert_eq!(cfg.content_width(), 300.0);
    }
}
