//! # Document Builder
//!
//! Orchestrates one render call: readiness check, theme, text direction,
//! profile overrides, layout walk, PDF serialization. The builder is the
//! only owner of the canvas for the duration of the call.

use serde::{Deserialize, Serialize};

use crate::blocks::RenderContext;
use crate::canvas::Canvas;
use crate::engine::Engine;
use crate::error::Result;
use crate::layout::{self, merge, LayoutInterpreter, RenderOutcome};
use crate::mapper::profile_to_overrides;
use crate::model::{Layout, Metadata, Profile};
use crate::pdf::PdfWriter;
use crate::style::Theme;
use crate::text::bidi::direction_for;

/// A render request as sent by a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderRequest {
    #[serde(default = "default_theme", alias = "theme")]
    pub theme_name: String,
    #[serde(default = "default_lang")]
    pub ui_lang: String,
    #[serde(default)]
    pub rtl_mode: bool,
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub layout_inline: Layout,
}

fn default_theme() -> String {
    "default".to_string()
}

fn default_lang() -> String {
    "en".to_string()
}

impl Default for RenderRequest {
    fn default() -> Self {
        Self {
            theme_name: default_theme(),
            ui_lang: default_lang(),
            rtl_mode: false,
            profile: Profile::default(),
            layout_inline: Layout::default(),
        }
    }
}

impl RenderRequest {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// The PDF plus what the interpreter did to produce it.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub pdf: Vec<u8>,
    pub page_count: usize,
    pub outcome: RenderOutcome,
}

pub struct DocumentBuilder<'e> {
    engine: &'e Engine,
    theme: Theme,
    lang: String,
    rtl: bool,
}

impl<'e> DocumentBuilder<'e> {
    pub fn new(engine: &'e Engine) -> Self {
        Self {
            engine,
            theme: Theme::default(),
            lang: default_lang(),
            rtl: false,
        }
    }

    /// Set up a builder from a request's options.
    pub fn for_request(engine: &'e Engine, request: &RenderRequest) -> Self {
        Self::new(engine)
            .theme_name(&request.theme_name)
            .lang(&request.ui_lang)
            .rtl(request.rtl_mode)
    }

    /// Use a built-in theme. Unknown names fall back to `default`.
    pub fn theme_name(mut self, name: &str) -> Self {
        self.theme = Theme::resolve(name);
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn lang(mut self, lang: &str) -> Self {
        self.lang = lang.trim().to_string();
        self
    }

    /// Force right-to-left regardless of the language.
    pub fn rtl(mut self, rtl: bool) -> Self {
        self.rtl = rtl;
        self
    }

    pub fn build(&self, profile: &Profile, layout: &Layout) -> Result<Vec<u8>> {
        Ok(self.render(profile, layout)?.pdf)
    }

    pub fn render(&self, profile: &Profile, layout: &Layout) -> Result<RenderedDocument> {
        self.engine.ensure_ready()?;

        let direction = direction_for(&self.lang, self.rtl);
        let derived = profile_to_overrides(profile);
        let overrides = merge::merge_overrides(&layout.overrides, derived.as_map());
        let frames = layout::prepare(layout, &overrides);

        let ctx = RenderContext::new(&self.theme, self.engine.fonts(), direction, &self.lang);
        let mut canvas = Canvas::new(&layout.page);
        let outcome = LayoutInterpreter::new(self.engine.blocks()).run(&frames, &ctx, &mut canvas);
        let pages = canvas.finish();

        log::info!(
            "Rendered {} block(s) on {} page(s) with theme '{}' ({:?})",
            outcome.placements.len(),
            pages.len(),
            self.theme.name,
            direction
        );

        let metadata = self.metadata(profile);
        let pdf = PdfWriter::new().write(&pages, &metadata, self.engine.fonts())?;
        Ok(RenderedDocument {
            pdf,
            page_count: pages.len(),
            outcome,
        })
    }

    fn metadata(&self, profile: &Profile) -> Metadata {
        let name = profile.header.name.trim();
        let (title, author) = if name.is_empty() {
            ("Résumé".to_string(), None)
        } else {
            (format!("{} \u{2014} Résumé", name), Some(name.to_string()))
        };
        Metadata {
            title: Some(title),
            author,
            subject: None,
            lang: Some(self.lang.clone()).filter(|l| !l.is_empty()),
        }
    }
}

/// Parse a request and render it with `engine`.
pub fn render_request(engine: &Engine, request: &RenderRequest) -> Result<Vec<u8>> {
    DocumentBuilder::for_request(engine, request).build(&request.profile, &request.layout_inline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VitaeError;
    use crate::model::BlockInstance;
    use serde_json::json;

    fn layout(blocks: &[&str]) -> Layout {
        serde_json::from_value(json!({
            "flow": [{
                "x": 36, "y": 36, "w": 300,
                "blocks": blocks.iter().map(|b| json!({"block_id": b})).collect::<Vec<_>>()
            }]
        }))
        .unwrap()
    }

    fn profile() -> Profile {
        serde_json::from_value(json!({
            "header": {"name": "Ada Lovelace", "title": "Analyst"},
            "skills": ["Maths", "Engines"]
        }))
        .unwrap()
    }

    #[test]
    fn request_defaults() {
        let request = RenderRequest::from_json("{}").unwrap();
        assert_eq!(request.theme_name, "default");
        assert_eq!(request.ui_lang, "en");
        assert!(!request.rtl_mode);
        assert!(request.layout_inline.flow.is_empty());
    }

    #[test]
    fn theme_alias_is_accepted() {
        let request = RenderRequest::from_json(r#"{"theme": "aqua.theme.json"}"#).unwrap();
        assert_eq!(request.theme_name, "aqua.theme.json");
    }

    #[test]
    fn metadata_uses_the_name() {
        let engine = Engine::new();
        let builder = DocumentBuilder::new(&engine).lang("de");
        let meta = builder.metadata(&profile());
        assert_eq!(meta.title.as_deref(), Some("Ada Lovelace \u{2014} Résumé"));
        assert_eq!(meta.author.as_deref(), Some("Ada Lovelace"));
        assert_eq!(meta.lang.as_deref(), Some("de"));

        let meta = builder.metadata(&Profile::default());
        assert_eq!(meta.title.as_deref(), Some("Résumé"));
        assert!(meta.author.is_none());
    }

    #[test]
    fn renders_profile_blocks() {
        let engine = Engine::new();
        let doc = DocumentBuilder::new(&engine)
            .render(&profile(), &layout(&["header_name", "key_skills", "timeline"]))
            .unwrap();
        assert!(doc.pdf.starts_with(b"%PDF-1.7"));
        assert_eq!(doc.page_count, 1);
        assert_eq!(doc.outcome.skipped, vec!["timeline".to_string()]);
        assert_eq!(doc.outcome.placements.len(), 2);
    }

    #[test]
    fn inline_block_data_renders() {
        let engine = Engine::new();
        let mut layout = layout(&[]);
        layout.flow[0]
            .blocks
            .push(BlockInstance::with_data("header_name", json!({"name": "Override"})));
        let doc = DocumentBuilder::new(&engine).render(&profile(), &layout).unwrap();
        let text = String::from_utf8_lossy(&doc.pdf);
        assert!(text.contains("/Author (Ada Lovelace)"));
        assert_eq!(doc.outcome.placements.len(), 1);
    }

    #[test]
    fn uninitialized_engine_is_fatal() {
        let engine = Engine::builder().without_builtins().build().unwrap();
        let err = DocumentBuilder::new(&engine)
            .build(&profile(), &layout(&["header_name"]))
            .unwrap_err();
        assert!(matches!(err, VitaeError::NotInitialized(_)));
    }

    #[test]
    fn unknown_theme_still_renders() {
        let engine = Engine::new();
        let request = RenderRequest {
            theme_name: "no-such-theme".to_string(),
            profile: profile(),
            layout_inline: layout(&["header_name"]),
            ..RenderRequest::default()
        };
        let pdf = render_request(&engine, &request).unwrap();
        assert!(pdf.ends_with(b"%%EOF\n"));
    }
}
