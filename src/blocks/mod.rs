//! # Blocks
//!
//! A block is a self-contained visual unit (a heading with a body, a list, a
//! photo) identified by a type string such as `"projects"` or the
//! parametrized `"text_section:summary"`.
//!
//! Every renderer shares one contract: draw into the given [`Layer`] starting
//! at `frame.y`, and return the y just below what was drawn plus the block's
//! trailing gap. A renderer that gets insufficient data draws nothing and
//! returns `frame.y` unchanged. Renderers never fail.

pub mod avatar;
pub mod common;
pub mod contact_info;
pub mod data;
pub mod education;
pub mod header_name;
pub mod key_skills;
pub mod languages;
pub mod projects;
pub mod social_links;
pub mod text_section;

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

pub use data::BlockData;

use crate::canvas::Layer;
use crate::error::{Result, VitaeError};
use crate::font::FontContext;
use crate::style::{Direction, Theme};
use crate::text::{BrokenLine, TextLayout, TextStyle};

/// Geometry handed to a renderer for one call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderFrame {
    pub x: f64,
    /// Cursor: where the block starts.
    pub y: f64,
    pub width: f64,
    /// The y coordinate the frame's content must not cross.
    pub bottom: f64,
}

/// Read-only state shared by every renderer during one render call.
pub struct RenderContext<'a> {
    pub theme: &'a Theme,
    pub fonts: &'a FontContext,
    pub direction: Direction,
    pub lang: &'a str,
    text_layout: TextLayout,
}

impl<'a> RenderContext<'a> {
    pub fn new(theme: &'a Theme, fonts: &'a FontContext, direction: Direction, lang: &'a str) -> Self {
        Self {
            theme,
            fonts,
            direction,
            lang,
            text_layout: TextLayout::new(),
        }
    }

    /// Theme font for `text` at `size`, switching to the RTL family for
    /// right-to-left scripts.
    pub fn style(&self, text: &str, size: f64, bold: bool) -> TextStyle {
        let family = self.theme.family_for(text);
        if bold {
            TextStyle::bold(family, size)
        } else {
            TextStyle::regular(family, size)
        }
    }

    pub fn measure(&self, text: &str, style: &TextStyle) -> f64 {
        self.fonts
            .measure_string(text, &style.family, style.weight, style.italic, style.size)
    }

    pub fn wrap(&self, text: &str, width: f64, style: &TextStyle) -> Vec<BrokenLine> {
        self.text_layout
            .break_into_lines(self.fonts, text, width, style, Some(self.lang))
    }

    /// Height of one line of text at `size`.
    pub fn line_height(&self, size: f64) -> f64 {
        self.theme.line_height(size)
    }

    /// Baseline of a line whose line box starts at `top`.
    pub fn baseline(&self, top: f64, style: &TextStyle) -> f64 {
        let half_leading = (self.line_height(style.size) - style.size) / 2.0;
        top + half_leading
            + self
                .fonts
                .ascent(&style.family, style.weight, style.italic, style.size)
    }

    /// Convert a line from logical to visual order for the document direction.
    pub fn visual<'t>(&self, text: &'t str) -> Cow<'t, str> {
        crate::text::bidi::visual_order(text, self.direction)
    }

    /// Left edge of a line of `width` points: flush left, or flush right in
    /// right-to-left documents.
    pub fn align_x(&self, frame: &RenderFrame, width: f64) -> f64 {
        if self.direction.is_rtl() {
            frame.x + (frame.width - width).max(0.0)
        } else {
            frame.x
        }
    }
}

/// The single capability every block type implements.
pub trait BlockRenderer: Send + Sync {
    /// Draw the block and return the new cursor.
    fn render(&self, layer: &mut Layer, frame: &RenderFrame, data: &BlockData, ctx: &RenderContext) -> f64;
}

/// Block type identifier → renderer.
///
/// Built during engine initialization and read-only afterwards, so it can be
/// shared across threads.
#[derive(Default, Clone)]
pub struct BlockRegistry {
    renderers: HashMap<String, Arc<dyn BlockRenderer>>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the nine built-in block types.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("header_name", header_name::HeaderNameBlock);
        registry.register("contact_info", contact_info::ContactInfoBlock);
        registry.register("key_skills", key_skills::KeySkillsBlock);
        registry.register("languages", languages::LanguagesBlock);
        registry.register("projects", projects::ProjectsBlock);
        registry.register("education", education::EducationBlock);
        registry.register("text_section", text_section::TextSectionBlock);
        registry.register("avatar_circle", avatar::AvatarCircleBlock);
        registry.register("social_links", social_links::SocialLinksBlock);
        registry
    }

    /// Add or replace the renderer for a block type.
    pub fn register(&mut self, block_type: &str, renderer: impl BlockRenderer + 'static) {
        self.renderers
            .insert(block_type.to_string(), Arc::new(renderer));
    }

    /// Find the renderer for a block type. `"text_section:about"` falls back
    /// to the renderer registered for `"text_section"`.
    pub fn resolve(&self, block_type: &str) -> Result<&dyn BlockRenderer> {
        self.renderers
            .get(block_type)
            .or_else(|| self.renderers.get(base_type(block_type)))
            .map(|r| r.as_ref())
            .ok_or_else(|| VitaeError::UnknownBlockType(block_type.to_string()))
    }

    /// Take over every renderer of `other`, replacing same-named ones.
    pub fn extend(&mut self, other: BlockRegistry) {
        self.renderers.extend(other.renderers);
    }

    pub fn contains(&self, block_type: &str) -> bool {
        self.resolve(block_type).is_ok()
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    /// Registered identifiers, sorted.
    pub fn block_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.renderers.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

/// `"text_section:summary"` → `"text_section"`.
pub fn base_type(block_type: &str) -> &str {
    block_type.split(':').next().unwrap_or(block_type)
}

/// `"text_section:summary"` → `Some("summary")`.
pub fn type_param(block_type: &str) -> Option<&str> {
    block_type
        .split_once(':')
        .map(|(_, p)| p.trim())
        .filter(|p| !p.is_empty())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    pub fn frame() -> RenderFrame {
        RenderFrame {
            x: 40.0,
            y: 100.0,
            width: 240.0,
            bottom: 800.0,
        }
    }

    /// Render one block with the default theme and return the layer and the
    /// new cursor.
    pub fn render(block: &dyn BlockRenderer, data: &BlockData, direction: Direction) -> (Layer, f64) {
        let theme = Theme::default();
        let fonts = FontContext::new();
        let ctx = RenderContext::new(&theme, &fonts, direction, "en");
        let mut layer = Layer::new();
        let y = block.render(&mut layer, &frame(), data, &ctx);
        (layer, y)
    }

    pub fn texts(layer: &Layer) -> Vec<String> {
        layer
            .commands()
            .iter()
            .filter_map(|c| match c {
                crate::canvas::DrawCommand::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64);

    impl BlockRenderer for Fixed {
        fn render(&self, _: &mut Layer, frame: &RenderFrame, _: &BlockData, _: &RenderContext) -> f64 {
            frame.y + self.0
        }
    }

    #[test]
    fn builtins_are_registered() {
        let registry = BlockRegistry::with_builtins();
        assert_eq!(registry.len(), 9);
        for id in [
            "header_name",
            "contact_info",
            "key_skills",
            "languages",
            "projects",
            "education",
            "text_section:summary",
            "avatar_circle",
            "social_links",
        ] {
            assert!(registry.contains(id), "{}", id);
        }
    }

    #[test]
    fn unknown_type_is_an_error() {
        let registry = BlockRegistry::with_builtins();
        match registry.resolve("timeline") {
            Err(VitaeError::UnknownBlockType(id)) => assert_eq!(id, "timeline"),
            _ => panic!("expected UnknownBlockType"),
        }
    }

    #[test]
    fn exact_parametrized_id_beats_base_type() {
        let mut registry = BlockRegistry::new();
        registry.register("text_section", Fixed(1.0));
        registry.register("text_section:about", Fixed(2.0));
        let theme = Theme::default();
        let fonts = FontContext::new();
        let ctx = RenderContext::new(&theme, &fonts, Direction::Ltr, "en");
        let frame = RenderFrame {
            x: 0.0,
            y: 10.0,
            width: 100.0,
            bottom: 500.0,
        };
        let data = BlockData::Unknown(Default::default());
        let mut layer = Layer::new();
        let about = registry.resolve("text_section:about").unwrap();
        assert_eq!(about.render(&mut layer, &frame, &data, &ctx), 12.0);
        let summary = registry.resolve("text_section:summary").unwrap();
        assert_eq!(summary.render(&mut layer, &frame, &data, &ctx), 11.0);
    }

    #[test]
    fn type_helpers() {
        assert_eq!(base_type("text_section:summary"), "text_section");
        assert_eq!(base_type("projects"), "projects");
        assert_eq!(type_param("text_section:about"), Some("about"));
        assert_eq!(type_param("text_section:"), None);
        assert_eq!(type_param("projects"), None);
    }

    #[test]
    fn rtl_alignment_is_flush_right() {
        let theme = Theme::default();
        let fonts = FontContext::new();
        let frame = RenderFrame {
            x: 50.0,
            y: 0.0,
            width: 200.0,
            bottom: 500.0,
        };
        let rtl = RenderContext::new(&theme, &fonts, Direction::Rtl, "ar");
        assert_eq!(rtl.align_x(&frame, 80.0), 170.0);
        let ltr = RenderContext::new(&theme, &fonts, Direction::Ltr, "en");
        assert_eq!(ltr.align_x(&frame, 80.0), 50.0);
    }
}
