//! `social_links`: recognized social handles as badge + link rows.
//!
//! Fields that are not social networks (email, phone, location) are skipped;
//! those belong to `contact_info`.

use super::common::{draw_heading, draw_linked};
use super::{BlockData, BlockRenderer, RenderContext, RenderFrame};
use crate::canvas::Layer;
use crate::style::Color;

/// A social network the block knows how to link to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Network {
    /// Badge text.
    pub badge: &'static str,
    /// Prefix turning a bare handle into a URL.
    pub url_prefix: &'static str,
}

/// Look up a contact field name.
pub fn network(field: &str) -> Option<Network> {
    let (badge, url_prefix) = match field.to_ascii_lowercase().as_str() {
        "github" => ("GH", "https://github.com/"),
        "linkedin" => ("in", "https://www.linkedin.com/in/"),
        "twitter" | "x" => ("X", "https://x.com/"),
        "gitlab" => ("GL", "https://gitlab.com/"),
        "website" | "site" | "homepage" | "url" => ("W", "https://"),
        "stackoverflow" => ("SO", "https://stackoverflow.com/users/"),
        "telegram" => ("TG", "https://t.me/"),
        _ => return None,
    };
    Some(Network { badge, url_prefix })
}

/// The URL for a handle. Full URLs pass through untouched; a leading `@`
/// is dropped from bare handles.
pub fn profile_url(network: Network, handle: &str) -> String {
    let handle = handle.trim();
    let lower = handle.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return handle.to_string();
    }
    let handle = handle.trim_start_matches('@');
    if network.url_prefix == "https://" {
        return format!("https://{}", handle);
    }
    // A domain-qualified handle like "github.com/me" is already a URL.
    let host = network
        .url_prefix
        .trim_start_matches("https://")
        .trim_start_matches("www.");
    let host = host.split('/').next().unwrap_or(host);
    if lower.trim_start_matches("www.").starts_with(host) {
        return format!("https://{}", handle);
    }
    format!("{}{}", network.url_prefix, handle)
}

pub struct SocialLinksBlock;

impl BlockRenderer for SocialLinksBlock {
    fn render(&self, layer: &mut Layer, frame: &RenderFrame, data: &BlockData, ctx: &RenderContext) -> f64 {
        let BlockData::SocialLinks { title, links } = data else {
            return frame.y;
        };
        let links: Vec<(Network, &str)> = links
            .iter()
            .filter_map(|(field, handle)| network(field).map(|n| (n, handle.as_str())))
            .collect();
        if links.is_empty() {
            return frame.y;
        }

        let theme = ctx.theme;
        let mut y = match title {
            Some(title) => draw_heading(layer, frame, ctx, title, frame.y),
            None => frame.y,
        };

        let line_height = ctx.line_height(theme.text_size);
        let r = (theme.text_size * 0.8).min(line_height / 2.0);
        let badge_gap = 6.0;
        let text_frame = RenderFrame {
            x: if ctx.direction.is_rtl() {
                frame.x
            } else {
                frame.x + 2.0 * r + badge_gap
            },
            width: (frame.width - 2.0 * r - badge_gap).max(0.0),
            ..*frame
        };

        for (i, (network, handle)) in links.iter().enumerate() {
            if i > 0 {
                y += theme.item_gap / 2.0;
            }
            let cx = if ctx.direction.is_rtl() {
                frame.x + frame.width - r
            } else {
                frame.x + r
            };
            let cy = y + line_height / 2.0;
            layer.circle(cx, cy, r, Some(theme.accent_color), None);

            let badge_style = ctx.style(network.badge, theme.small_size * 0.8, true);
            let badge_width = ctx.measure(network.badge, &badge_style);
            let badge_baseline = cy + badge_style.size * 0.35;
            layer.text(cx - badge_width / 2.0, badge_baseline, network.badge, &badge_style, Color::WHITE);

            let url = profile_url(*network, handle);
            let style = ctx.style(handle, theme.text_size, false);
            let next = draw_linked(layer, &text_frame, ctx, handle, y, &style, theme.link_color, Some(&url));
            y = next.max(y + 2.0 * r);
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

    fn uris(layer: &Layer) -> Vec<String> {
        layer
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Link { uri, .. } => Some(uri.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn urls_for_handles() {
        let gh = network("github").unwrap();
        assert_eq!(profile_url(gh, "me"), "https://github.com/me");
        assert_eq!(profile_url(gh, "github.com/me"), "https://github.com/me");
        assert_eq!(profile_url(gh, "https://github.com/me"), "https://github.com/me");
        let x = network("twitter").unwrap();
        assert_eq!(profile_url(x, "@me"), "https://x.com/me");
        let li = network("LinkedIn").unwrap();
        assert_eq!(profile_url(li, "me"), "https://www.linkedin.com/in/me");
        let site = network("website").unwrap();
        assert_eq!(profile_url(site, "me.dev"), "https://me.dev");
        assert!(network("email").is_none());
    }

    #[test]
    fn only_social_fields_are_drawn() {
        let data = BlockData::SocialLinks {
            title: None,
            links: vec![
                ("email".into(), "a@b.io".into()),
                ("github".into(), "me".into()),
                ("telegram".into(), "@tg".into()),
            ],
        };
        let (layer, y) = render(&SocialLinksBlock, &data, Direction::Ltr);
        assert_eq!(texts(&layer), vec!["GH", "me", "TG", "@tg"]);
        assert_eq!(uris(&layer), vec!["https://github.com/me", "https://t.me/tg"]);
        assert!(y > frame().y);
    }

    #[test]
    fn heading_only_with_title() {
        let data = BlockData::SocialLinks {
            title: Some("Links".into()),
            links: vec![("github".into(), "me".into())],
        };
        let (layer, _) = render(&SocialLinksBlock, &data, Direction::Ltr);
        assert_eq!(texts(&layer)[0], "Links");
    }

    #[test]
    fn nothing_recognized_draws_nothing() {
        let data = BlockData::SocialLinks {
            title: Some("Links".into()),
            links: vec![("phone".into(), "1".into())],
        };
        let (layer, y) = render(&SocialLinksBlock, &data, Direction::Ltr);
        assert!(layer.is_empty());
        assert_eq!(y, frame().y);
    }
}
