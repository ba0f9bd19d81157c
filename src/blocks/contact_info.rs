//! `contact_info`: a two-column list of contact fields. Labels on the
//! reading-start side, values next to them; e-mail addresses, phone numbers
//! and web addresses become links.

use super::common::{draw_heading, draw_line_of_text, draw_linked, heading_title, indented, link_target, title_case};
use super::{BlockData, BlockRenderer, RenderContext, RenderFrame};
use crate::canvas::Layer;

const LABEL_GAP: f64 = 6.0;

pub struct ContactInfoBlock;

impl BlockRenderer for ContactInfoBlock {
    fn render(&self, layer: &mut Layer, frame: &RenderFrame, data: &BlockData, ctx: &RenderContext) -> f64 {
        let BlockData::ContactInfo { title, items } = data else {
            return frame.y;
        };
        if items.is_empty() {
            return frame.y;
        }

        let theme = ctx.theme;
        let mut y = draw_heading(layer, frame, ctx, &heading_title(title, "Contact"), frame.y);

        let labels: Vec<String> = items.iter().map(|(field, _)| title_case(field)).collect();
        let label_width = labels
            .iter()
            .map(|l| ctx.measure(l, &ctx.style(l, theme.small_size, true)))
            .fold(0.0, f64::max)
            + LABEL_GAP;
        let label_width = label_width.min(frame.width * 0.4);

        let label_frame = RenderFrame {
            x: if ctx.direction.is_rtl() {
                frame.x + frame.width - label_width
            } else {
                frame.x
            },
            width: label_width,
            ..*frame
        };
        let value_frame = indented(frame, ctx, label_width);

        for (i, ((field, value), label)) in items.iter().zip(&labels).enumerate() {
            if i > 0 {
                y += theme.item_gap / 2.0;
            }
            let label_style = ctx.style(label, theme.small_size, true);
            let value_style = ctx.style(value, theme.text_size, false);
            // Align the label with the value's first baseline.
            let label_top = y + ctx.baseline(0.0, &value_style) - ctx.baseline(0.0, &label_style);
            draw_line_of_text(layer, &label_frame, ctx, label, label_top, &label_style, theme.muted_color);

            let uri = link_target(field, value);
            let color = if uri.is_some() {
                theme.link_color
            } else {
                theme.text_color
            };
            y = draw_linked(layer, &value_frame, ctx, value, y, &value_style, color, uri.as_deref());
        }
        y + theme.section_gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::testing::{frame, render, texts};
    use crate::canvas::DrawCommand;
    use crate::style::Direction;

    fn data() -> BlockData {
        BlockData::ContactInfo {
            title: None,
            items: vec![
                ("email".into(), "ada@example.com".into()),
                ("location".into(), "London".into()),
            ],
        }
    }

    #[test]
    fn labels_values_and_links() {
        let (layer, y) = render(&ContactInfoBlock, &data(), Direction::Ltr);
        let texts = texts(&layer);
        assert_eq!(texts, vec!["Contact", "Email", "ada@example.com", "Location", "London"]);
        let links: Vec<&str> = layer
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Link { uri, .. } => Some(uri.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(links, vec!["mailto:ada@example.com"]);
        assert!(y > frame().y);
    }

    #[test]
    fn custom_title() {
        let data = BlockData::ContactInfo {
            title: Some("Reach me".into()),
            items: vec![("phone".into(), "123".into())],
        };
        let (layer, _) = render(&ContactInfoBlock, &data, Direction::Ltr);
        assert_eq!(texts(&layer)[0], "Reach me");
    }

    #[test]
    fn no_items_no_output() {
        let data = BlockData::ContactInfo {
            title: Some("Contact".into()),
            items: vec![],
        };
        let (layer, y) = render(&ContactInfoBlock, &data, Direction::Ltr);
        assert!(layer.is_empty());
        assert_eq!(y, frame().y);
    }

    #[test]
    fn rtl_puts_labels_on_the_right() {
        let (layer, _) = render(&ContactInfoBlock, &data(), Direction::Rtl);
        let label_x = layer
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::Text { text, x, .. } if text == "Email" => Some(*x),
                _ => None,
            })
            .unwrap();
        let value_x = layer
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::Text { text, x, .. } if text == "ada@example.com" => Some(*x),
                _ => None,
            })
            .unwrap();
        assert!(label_x > value_x);
    }
}
