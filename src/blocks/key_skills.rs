//! `key_skills`: skills as rounded "chips" flowing in rows across the frame.
//! Rows fill from the reading-start edge. A skill too wide for the frame is
//! cut short with an ellipsis so its chip stays inside.

use std::borrow::Cow;

use super::common::{draw_heading, heading_title};
use super::{BlockData, BlockRenderer, RenderContext, RenderFrame};
use crate::canvas::Layer;
use crate::text::TextStyle;

const ELLIPSIS: char = '\u{2026}';

pub struct KeySkillsBlock;

impl BlockRenderer for KeySkillsBlock {
    fn render(&self, layer: &mut Layer, frame: &RenderFrame, data: &BlockData, ctx: &RenderContext) -> f64 {
        let BlockData::KeySkills { title, skills } = data else {
            return frame.y;
        };
        if skills.is_empty() {
            return frame.y;
        }

        let theme = ctx.theme;
        let y = draw_heading(layer, frame, ctx, &heading_title(title, "Key Skills"), frame.y);
        let chip_height = theme.small_size + 2.0 * theme.chip_padding_y;
        let max_text_width = (frame.width - 2.0 * theme.chip_padding_x).max(0.0);

        let mut row_top = y;
        let mut used = 0.0;
        for skill in skills {
            let style = ctx.style(skill, theme.small_size, false);
            let visual = fit_chip_text(ctx, ctx.visual(skill), &style, max_text_width);
            let text_width = ctx.measure(&visual, &style);
            let chip_width = text_width + 2.0 * theme.chip_padding_x;

            if used > 0.0 && used + chip_width > frame.width {
                row_top += chip_height + theme.chip_gap;
                used = 0.0;
            }

            let offset = used;
            let x = if ctx.direction.is_rtl() {
                frame.x + frame.width - offset - chip_width
            } else {
                frame.x + offset
            };
            layer.filled_rect(x, row_top, chip_width, chip_height, theme.chip_radius, theme.chip_background);
            let baseline = row_top + theme.chip_padding_y
                + ctx.fonts.ascent(&style.family, style.weight, style.italic, style.size);
            layer.text(x + theme.chip_padding_x, baseline, &visual, &style, theme.chip_text);

            used += chip_width + theme.chip_gap;
        }

        row_top + chip_height + theme.section_gap
    }
}

/// Shorten `visual` until it fits `max_width`, dropping characters from the
/// logical end. In right-to-left text that end is the left side of the
/// visual string. Empty when not even the ellipsis fits.
fn fit_chip_text<'t>(ctx: &RenderContext, visual: Cow<'t, str>, style: &TextStyle, max_width: f64) -> Cow<'t, str> {
    if ctx.measure(&visual, style) <= max_width {
        return visual;
    }
    let chars: Vec<char> = visual.chars().collect();
    let rtl = ctx.direction.is_rtl();
    for keep in (0..chars.len()).rev() {
        let candidate: String = if rtl {
            let kept: String = chars[chars.len() - keep..].iter().collect();
            std::iter::once(ELLIPSIS).chain(kept.trim_start().chars()).collect()
        } else {
            let kept: String = chars[..keep].iter().collect();
            kept.trim_end().chars().chain(std::iter::once(ELLIPSIS)).collect()
        };
        if ctx.measure(&candidate, style) <= max_width {
            return Cow::Owned(candidate);
        }
    }
    Cow::Owned(String::new())
}
