//! # Canvas
//!
//! Renderers never draw straight onto a page. They record draw commands into
//! a detached [`Layer`]; the layout interpreter measures the layer, decides
//! which page it belongs on, shifts it if it moves to a new page, and only
//! then commits it to the [`Canvas`]. That is what keeps a block from being
//! split across a page boundary.
//!
//! All coordinates are in points, origin at the top-left of the page, y
//! growing downwards.

use std::sync::Arc;

use crate::image_loader::LoadedImage;
use crate::model::PageConfig;
use crate::style::Color;
use crate::text::TextStyle;

/// One drawing primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// A single line of text, already in visual order.
    Text {
        x: f64,
        baseline: f64,
        text: String,
        style: TextStyle,
        color: Color,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width: f64,
        color: Color,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: f64,
        fill: Option<Color>,
        stroke: Option<(Color, f64)>,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        fill: Option<Color>,
        stroke: Option<(Color, f64)>,
    },
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        image: Arc<LoadedImage>,
    },
    /// A clickable URI area. Draws nothing.
    Link {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        uri: String,
    },
}

impl DrawCommand {
    /// Vertical extent `(top, bottom)` of what this command paints.
    fn vertical_extent(&self) -> (f64, f64) {
        match self {
            DrawCommand::Text { baseline, style, .. } => {
                (baseline - style.size, baseline + style.size * 0.3)
            }
            DrawCommand::Line { y1, y2, width, .. } => {
                (y1.min(*y2) - width / 2.0, y1.max(*y2) + width / 2.0)
            }
            DrawCommand::Rect { y, height, .. }
            | DrawCommand::Image { y, height, .. }
            | DrawCommand::Link { y, height, .. } => (*y, y + height),
            DrawCommand::Circle { cy, r, stroke, .. } => {
                let half = stroke.map(|(_, w)| w / 2.0).unwrap_or(0.0);
                (cy - r - half, cy + r + half)
            }
        }
    }

    fn shift_y(&mut self, dy: f64) {
        match self {
            DrawCommand::Text { baseline, .. } => *baseline += dy,
            DrawCommand::Line { y1, y2, .. } => {
                *y1 += dy;
                *y2 += dy;
            }
            DrawCommand::Rect { y, .. }
            | DrawCommand::Image { y, .. }
            | DrawCommand::Link { y, .. } => *y += dy,
            DrawCommand::Circle { cy, .. } => *cy += dy,
        }
    }
}

/// A detached list of draw commands produced by one block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layer {
    commands: Vec<DrawCommand>,
}

impl Layer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn text(&mut self, x: f64, baseline: f64, text: &str, style: &TextStyle, color: Color) {
        if text.is_empty() {
            return;
        }
        self.commands.push(DrawCommand::Text {
            x,
            baseline,
            text: text.to_string(),
            style: style.clone(),
            color,
        });
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, width: f64, color: Color) {
        if width <= 0.0 {
            return;
        }
        self.commands.push(DrawCommand::Line {
            x1,
            y1,
            x2,
            y2,
            width,
            color,
        });
    }

    pub fn filled_rect(&mut self, x: f64, y: f64, width: f64, height: f64, radius: f64, fill: Color) {
        self.commands.push(DrawCommand::Rect {
            x,
            y,
            width,
            height,
            radius,
            fill: Some(fill),
            stroke: None,
        });
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, fill: Option<Color>, stroke: Option<(Color, f64)>) {
        self.commands.push(DrawCommand::Circle {
            cx,
            cy,
            r,
            fill,
            stroke,
        });
    }

    pub fn image(&mut self, x: f64, y: f64, width: f64, height: f64, image: Arc<LoadedImage>) {
        self.commands.push(DrawCommand::Image {
            x,
            y,
            width,
            height,
            image,
        });
    }

    pub fn link(&mut self, x: f64, y: f64, width: f64, height: f64, uri: &str) {
        if uri.is_empty() || width <= 0.0 || height <= 0.0 {
            return;
        }
        self.commands.push(DrawCommand::Link {
            x,
            y,
            width,
            height,
            uri: uri.to_string(),
        });
    }

    /// `(top, bottom)` of everything painted, or `None` for an empty layer.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        self.commands
            .iter()
            .map(DrawCommand::vertical_extent)
            .reduce(|(t1, b1), (t2, b2)| (t1.min(t2), b1.max(b2)))
    }

    /// Move every command down by `dy` points (up when negative).
    pub fn offset_y(&mut self, dy: f64) {
        for command in &mut self.commands {
            command.shift_y(dy);
        }
    }
}

/// A finished page.
#[derive(Debug, Clone)]
pub struct CanvasPage {
    pub width: f64,
    pub height: f64,
    pub commands: Vec<DrawCommand>,
}

/// The page-addressable drawing surface of one render call.
///
/// Pages are created on demand when a layer is committed to an index that
/// does not exist yet. [`Canvas::finish`] consumes the canvas, so a canvas
/// can be finalized only once.
#[derive(Debug)]
pub struct Canvas {
    width: f64,
    height: f64,
    pages: Vec<CanvasPage>,
}

impl Canvas {
    pub fn new(page: &PageConfig) -> Self {
        let (width, height) = page.dimensions();
        Self {
            width,
            height,
            pages: Vec::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Make sure pages `0..=index` exist.
    pub fn ensure_page(&mut self, index: usize) {
        while self.pages.len() <= index {
            self.pages.push(CanvasPage {
                width: self.width,
                height: self.height,
                commands: Vec::new(),
            });
        }
    }

    /// Append a layer's commands to a page.
    pub fn commit(&mut self, page_index: usize, layer: Layer) {
        self.ensure_page(page_index);
        self.pages[page_index].commands.extend(layer.commands);
    }

    /// Close the canvas. There is always at least one (possibly blank) page.
    pub fn finish(mut self) -> Vec<CanvasPage> {
        self.ensure_page(0);
        self.pages
    }
}
