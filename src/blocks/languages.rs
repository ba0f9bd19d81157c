//! `languages`: a bulleted list.

use super::common::{draw_heading, draw_wrapped, heading_title, indented};
use super::{BlockData, BlockRenderer, RenderContext, RenderFrame};
use crate::canvas::Layer;

const BULLET: &str = "\u{2022}";
const BULLET_INDENT: f64 = 10.0;

pub struct LanguagesBlock;

impl BlockRenderer for LanguagesBlock {
    fn render(&self, layer: &mut Layer, frame: &RenderFrame, data: &BlockData, ctx: &RenderContext) -> f64 {
        let BlockData::Languages { title, languages } = data else {
            return frame.y;
        };
        if languages.is_empty() {
            return frame.y;
        }

        let theme = ctx.theme;
        let mut y = draw_heading(layer, frame, ctx, &heading_title(title, "Languages"), frame.y);
        let body = indented(frame, ctx, BULLET_INDENT);

        for (i, language) in languages.iter().enumerate() {
            if i > 0 {
                y += theme.item_gap / 2.0;
            }
            let style = ctx.style(language, theme.text_size, false);
            let bullet_style = ctx.style(BULLET, theme.text_size, false);
            let bullet_x = if ctx.direction.is_rtl() {
                frame.x + frame.width - ctx.measure(BULLET, &bullet_style)
            } else {
                frame.x
            };
            layer.text(bullet_x, ctx.baseline(y, &bullet_style), BULLET, &bullet_style, theme.accent_color);
            y = draw_wrapped(layer, &body, ctx, language, y, &style, theme.text_color);
        }
        y + theme.section_gap
    }
}
