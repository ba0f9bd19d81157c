//! `text_section:<key>`: a generic heading plus paragraphs, reused for the
//! summary, "about me", career objective and any other free-text section.

use super::common::{draw_heading, draw_paragraphs};
use super::{BlockData, BlockRenderer, RenderContext, RenderFrame};
use crate::canvas::Layer;

/// Default heading for a section key.
pub fn default_title(key: &str) -> String {
    match key {
        "summary" => "Professional Summary".to_string(),
        "about" => "About Me".to_string(),
        "objective" => "Career Objective".to_string(),
        other => capitalize_runs(other),
    }
}

/// Uppercase the first letter of every run of letters and lowercase the
/// rest. Separators are kept: `"career_goals"` → `"Career_Goals"`.
fn capitalize_runs(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut in_word = false;
    for c in key.chars() {
        if in_word {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        in_word = c.is_alphabetic();
    }
    out
}

pub struct TextSectionBlock;

impl BlockRenderer for TextSectionBlock {
    fn render(&self, layer: &mut Layer, frame: &RenderFrame, data: &BlockData, ctx: &RenderContext) -> f64 {
        let BlockData::TextSection {
            key,
            title,
            paragraphs,
        } = data
        else {
            return frame.y;
        };
        if paragraphs.is_empty() {
            return frame.y;
        }

        let title = title.clone().unwrap_or_else(|| default_title(key));
        let y = draw_heading(layer, frame, ctx, &title, frame.y);
        let y = draw_paragraphs(layer, frame, ctx, paragraphs, y);
        y + ctx.theme.section_gap
    }
}
