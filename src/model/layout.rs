//! The declarative page layout: an ordered flow of frames, each owning an
//! ordered list of block instances, plus a global override map.
//!
//! ```json
//! {
//!   "page": { "size": "A4", "margin": { "top": 36, "right": 36, "bottom": 36, "left": 36 } },
//!   "flow": [
//!     { "x": 36, "y": 36, "w": 170, "blocks": [ { "block_id": "avatar_circle" } ] },
//!     { "x": 226, "y": 36, "w": 333, "blocks": [ { "block_id": "header_name" },
//!                                                { "block_id": "text_section:summary" } ] }
//!   ],
//!   "overrides": { "header_name": { "data": { "title": "Engineer" } } }
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{mm, PageConfig};

/// A complete layout document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default)]
    pub page: PageConfig,

    /// Frames in drawing order.
    #[serde(default)]
    pub flow: Vec<Frame>,

    /// Block data keyed by block id (`"projects"`) or parametrized id
    /// (`"text_section:summary"`). Each entry is `{"data": {...}}`.
    #[serde(default)]
    pub overrides: Map<String, Value>,
}

impl Layout {
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Total number of block instances across all frames.
    pub fn block_count(&self) -> usize {
        self.flow.iter().map(|f| f.blocks.len()).sum()
    }
}

/// Length unit for frame geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Pt,
    Mm,
}

impl Unit {
    fn to_pt(self, v: f64) -> f64 {
        match self {
            Unit::Pt => v,
            Unit::Mm => mm(v),
        }
    }
}

/// A rectangular region of the page with its own vertical cursor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Frame {
    /// Optional label, used in log output only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub x: Option<f64>,
    /// Top edge, measured from the top of the page.
    pub y: Option<f64>,
    #[serde(alias = "width")]
    pub w: Option<f64>,
    /// Frame height; content never crosses `y + h`.
    #[serde(alias = "height")]
    pub h: Option<f64>,
    #[serde(default)]
    pub unit: Unit,
    #[serde(default)]
    pub blocks: Vec<BlockInstance>,
}

/// Frame geometry resolved against a page, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameGeometry {
    pub x: f64,
    pub top: f64,
    pub width: f64,
    /// The y coordinate content must not cross.
    pub bottom: f64,
}

impl Frame {
    /// Resolve the frame against the page: missing values fall back to the
    /// page's content box, and frames wider or taller than the page are
    /// clamped to it.
    pub fn geometry(&self, page: &PageConfig) -> FrameGeometry {
        let (page_w, page_h) = page.dimensions();
        let x = self
            .x
            .map(|v| self.unit.to_pt(v))
            .unwrap_or(page.margin.left)
            .max(0.0)
            .min(page_w);
        let top = self
            .y
            .map(|v| self.unit.to_pt(v))
            .unwrap_or(page.margin.top)
            .max(0.0)
            .min(page_h);
        let max_width = (page_w - x).max(0.0);
        let width = self
            .w
            .map(|v| self.unit.to_pt(v))
            .unwrap_or_else(|| (page_w - page.margin.right - x).max(0.0))
            .max(0.0)
            .min(max_width);
        let page_bottom = page.content_bottom();
        let bottom = match self.h {
            Some(h) => (top + self.unit.to_pt(h)).min(page_bottom),
            None => page_bottom,
        };
        FrameGeometry {
            x,
            top,
            width,
            bottom: bottom.max(top),
        }
    }

    pub fn label(&self, index: usize) -> String {
        self.name.clone().unwrap_or_else(|| format!("frame#{}", index))
    }
}

/// One block in a frame: a type identifier and optional inline data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockInstance {
    #[serde(alias = "type")]
    pub block_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl BlockInstance {
    pub fn new(block_id: &str) -> Self {
        Self {
            block_id: block_id.to_string(),
            data: None,
        }
    }

    pub fn with_data(block_id: &str, data: Value) -> Self {
        Self {
            block_id: block_id.to_string(),
            data: Some(data),
        }
    }
}
