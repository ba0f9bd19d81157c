//! `header_name`: the person's name in large bold type, the job title below
//! it in the accent color.

use super::common::draw_wrapped;
use super::{BlockData, BlockRenderer, RenderContext, RenderFrame};
use crate::canvas::Layer;

pub struct HeaderNameBlock;

impl BlockRenderer for HeaderNameBlock {
    fn render(&self, layer: &mut Layer, frame: &RenderFrame, data: &BlockData, ctx: &RenderContext) -> f64 {
        let BlockData::HeaderName { name, title } = data else {
            return frame.y;
        };
        if name.is_empty() && title.is_empty() {
            return frame.y;
        }

        let theme = ctx.theme;
        let mut y = frame.y;
        if !name.is_empty() {
            let style = ctx.style(name, theme.name_size, true);
            y = draw_wrapped(layer, frame, ctx, name, y, &style, theme.heading_color);
        }
        if !title.is_empty() {
            let style = ctx.style(title, theme.title_size, false);
            y = draw_wrapped(layer, frame, ctx, title, y, &style, theme.accent_color);
        }
        y + theme.section_gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::testing::{frame, render, texts};
    use crate::style::Direction;

    #[test]
    fn draws_name_and_title() {
        let data = BlockData::HeaderName {
            name: "Ada Lovelace".into(),
            title: "Engineer".into(),
        };
        let (layer, y) = render(&HeaderNameBlock, &data, Direction::Ltr);
        assert_eq!(texts(&layer), vec!["Ada Lovelace", "Engineer"]);
        assert!(y > frame().y);
    }

    #[test]
    fn empty_header_is_a_no_op() {
        let data = BlockData::HeaderName {
            name: String::new(),
            title: String::new(),
        };
        let (layer, y) = render(&HeaderNameBlock, &data, Direction::Ltr);
        assert!(layer.is_empty());
        assert_eq!(y, frame().y);
    }

    #[test]
    fn wrong_data_shape_is_a_no_op() {
        let (layer, y) = render(&HeaderNameBlock, &BlockData::Unknown(Default::default()), Direction::Ltr);
        assert!(layer.is_empty());
        assert_eq!(y, frame().y);
    }
}
