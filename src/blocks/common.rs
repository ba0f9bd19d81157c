//! Drawing helpers shared by the block renderers: section headings with a
//! rule underneath, and wrapped, direction-aware paragraphs.

use super::{RenderContext, RenderFrame};
use crate::canvas::Layer;
use crate::style::Color;
use crate::text::TextStyle;

/// The heading text: the data's `title` when present, else `default`.
pub fn heading_title(title: &Option<String>, default: &str) -> String {
    title.clone().unwrap_or_else(|| default.to_string())
}

/// Draw a section heading at `y` with a full-width rule below it.
/// Returns the y where the section body starts.
pub fn draw_heading(layer: &mut Layer, frame: &RenderFrame, ctx: &RenderContext, title: &str, y: f64) -> f64 {
    let theme = ctx.theme;
    let style = ctx.style(title, theme.heading_size, true);
    let y = draw_line_of_text(layer, frame, ctx, title, y, &style, theme.heading_color);

    let rule_y = y + theme.gap_after_heading / 2.0;
    layer.line(
        frame.x,
        rule_y,
        frame.x + frame.width,
        rule_y,
        theme.rule_width,
        theme.rule_color,
    );
    rule_y + theme.rule_width + theme.rule_to_text_gap
}

/// Draw one unwrapped line. Returns the y below its line box.
pub fn draw_line_of_text(
    layer: &mut Layer,
    frame: &RenderFrame,
    ctx: &RenderContext,
    text: &str,
    y: f64,
    style: &TextStyle,
    color: Color,
) -> f64 {
    let visual = ctx.visual(text);
    let width = ctx.measure(&visual, style);
    let x = ctx.align_x(frame, width);
    layer.text(x, ctx.baseline(y, style), &visual, style, color);
    y + ctx.line_height(style.size)
}

/// Wrap `text` to the frame width and draw it line by line.
/// Returns the y below the last line; empty text draws nothing.
pub fn draw_wrapped(
    layer: &mut Layer,
    frame: &RenderFrame,
    ctx: &RenderContext,
    text: &str,
    y: f64,
    style: &TextStyle,
    color: Color,
) -> f64 {
    draw_linked(layer, frame, ctx, text, y, style, color, None)
}

/// Like [`draw_wrapped`], with every drawn line made a link to `uri`.
#[allow(clippy::too_many_arguments)]
pub fn draw_linked(
    layer: &mut Layer,
    frame: &RenderFrame,
    ctx: &RenderContext,
    text: &str,
    y: f64,
    style: &TextStyle,
    color: Color,
    uri: Option<&str>,
) -> f64 {
    let line_height = ctx.line_height(style.size);
    let mut y = y;
    for line in ctx.wrap(text, frame.width, style) {
        if !line.text.is_empty() {
            let visual = ctx.visual(&line.text);
            let x = ctx.align_x(frame, line.width);
            layer.text(x, ctx.baseline(y, style), &visual, style, color);
            if let Some(uri) = uri {
                layer.link(x, y, line.width, line_height, uri);
            }
        }
        y += line_height;
    }
    y
}

/// Draw paragraphs in body style, separated by the theme's paragraph gap.
pub fn draw_paragraphs(layer: &mut Layer, frame: &RenderFrame, ctx: &RenderContext, paragraphs: &[String], y: f64) -> f64 {
    let theme = ctx.theme;
    let mut y = y;
    for (i, paragraph) in paragraphs.iter().enumerate() {
        if i > 0 {
            y += theme.paragraph_gap;
        }
        let style = ctx.style(paragraph, theme.text_size, false);
        y = draw_wrapped(layer, frame, ctx, paragraph, y, &style, theme.text_color);
    }
    y
}

/// A narrower frame: `indent` points in from the reading-start edge.
pub fn indented(frame: &RenderFrame, ctx: &RenderContext, indent: f64) -> RenderFrame {
    let indent = indent.min(frame.width);
    RenderFrame {
        x: if ctx.direction.is_rtl() {
            frame.x
        } else {
            frame.x + indent
        },
        width: frame.width - indent,
        ..*frame
    }
}

/// Humanized label: `"personal_site"` → `"Personal Site"`.
pub fn title_case(key: &str) -> String {
    key.split(['_', '-', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Link target for a contact value: e-mail addresses get `mailto:`, phone
/// numbers `tel:`, bare domains `https://`. Returns `None` for plain text.
pub fn link_target(field: &str, value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let lower = value.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("mailto:") {
        return Some(value.to_string());
    }
    match field {
        "email" | "mail" if value.contains('@') => Some(format!("mailto:{}", value)),
        "phone" | "tel" | "mobile" => {
            let digits: String = value
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '+')
                .collect();
            (!digits.is_empty()).then(|| format!("tel:{}", digits))
        }
        _ if !value.contains(' ') && value.contains('.') && !value.contains('@') => {
            Some(format!("https://{}", value))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontContext;
    use crate::style::{Direction, Theme};

    fn frame() -> RenderFrame {
        RenderFrame {
            x: 40.0,
            y: 100.0,
            width: 200.0,
            bottom: 800.0,
        }
    }

    #[test]
    fn heading_draws_text_and_rule() {
        let theme = Theme::default();
        let fonts = FontContext::new();
        let ctx = RenderContext::new(&theme, &fonts, Direction::Ltr, "en");
        let mut layer = Layer::new();
        let y = draw_heading(&mut layer, &frame(), &ctx, "Projects", 100.0);
        assert_eq!(layer.commands().len(), 2);
        assert!(y > 100.0 + theme.line_height(theme.heading_size));
    }

    #[test]
    fn wrapped_text_advances_per_line() {
        let theme = Theme::default();
        let fonts = FontContext::new();
        let ctx = RenderContext::new(&theme, &fonts, Direction::Ltr, "en");
        let mut layer = Layer::new();
        let style = ctx.style("x", 10.0, false);
        let text = "word ".repeat(60);
        let y = draw_wrapped(&mut layer, &frame(), &ctx, &text, 0.0, &style, theme.text_color);
        let lines = layer.commands().len() as f64;
        assert!(lines > 1.0);
        assert!((y - lines * theme.line_height(10.0)).abs() < 1e-9);
    }

    #[test]
    fn empty_paragraph_list_is_a_no_op() {
        let theme = Theme::default();
        let fonts = FontContext::new();
        let ctx = RenderContext::new(&theme, &fonts, Direction::Ltr, "en");
        let mut layer = Layer::new();
        assert_eq!(draw_paragraphs(&mut layer, &frame(), &ctx, &[], 5.0), 5.0);
        assert!(layer.is_empty());
    }

    #[test]
    fn indent_follows_direction() {
        let theme = Theme::default();
        let fonts = FontContext::new();
        let ltr = RenderContext::new(&theme, &fonts, Direction::Ltr, "en");
        let rtl = RenderContext::new(&theme, &fonts, Direction::Rtl, "ar");
        assert_eq!(indented(&frame(), &ltr, 10.0).x, 50.0);
        assert_eq!(indented(&frame(), &rtl, 10.0).x, 40.0);
        assert_eq!(indented(&frame(), &rtl, 10.0).width, 190.0);
    }

    #[test]
    fn title_casing() {
        assert_eq!(title_case("objective"), "Objective");
        assert_eq!(title_case("personal_site"), "Personal Site");
        assert_eq!(title_case("VOLUNTEER-work"), "Volunteer Work");
    }

    #[test]
    fn link_targets() {
        assert_eq!(link_target("email", "a@b.io").as_deref(), Some("mailto:a@b.io"));
        assert_eq!(link_target("phone", "+1 (555) 010").as_deref(), Some("tel:+1555010"));
        assert_eq!(link_target("website", "example.com").as_deref(), Some("https://example.com"));
        assert_eq!(link_target("website", "https://x.dev").as_deref(), Some("https://x.dev"));
        assert_eq!(link_target("location", "Berlin, Germany"), None);
    }
}
