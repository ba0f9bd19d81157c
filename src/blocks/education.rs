//! `education`: entries arrive pre-joined, one line per field. The first line
//! (the degree or program) is bold; the rest are wrapped body text.

use super::common::{draw_heading, draw_wrapped, heading_title};
use super::{BlockData, BlockRenderer, RenderContext, RenderFrame};
use crate::canvas::Layer;

pub struct EducationBlock;

impl BlockRenderer for EducationBlock {
    fn render(&self, layer: &mut Layer, frame: &RenderFrame, data: &BlockData, ctx: &RenderContext) -> f64 {
        let BlockData::Education { title, items } = data else {
            return frame.y;
        };
        if items.iter().all(|item| item.trim().is_empty()) {
            return frame.y;
        }

        let theme = ctx.theme;
        let mut y = draw_heading(layer, frame, ctx, &heading_title(title, "Education"), frame.y);

        let entries = items.iter().filter(|item| !item.trim().is_empty());
        for (i, item) in entries.enumerate() {
            if i > 0 {
                y += theme.item_gap;
            }
            let mut lines = item.lines().map(str::trim).filter(|l| !l.is_empty());
            if let Some(first) = lines.next() {
                let style = ctx.style(first, theme.text_size, true);
                y = draw_wrapped(layer, frame, ctx, first, y, &style, theme.heading_color);
            }
            for line in lines {
                let style = ctx.style(line, theme.text_size, false);
                y = draw_wrapped(layer, frame, ctx, line, y, &style, theme.text_color);
            }
        }
        y + theme.section_gap
    }
}
