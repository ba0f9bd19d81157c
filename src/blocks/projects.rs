//! `projects`: one entry per project, with a bold title, a wrapped
//! description and the project URL as a link.

use super::common::{draw_heading, draw_linked, draw_wrapped, heading_title, link_target};
use super::{BlockData, BlockRenderer, RenderContext, RenderFrame};
use crate::canvas::Layer;

pub struct ProjectsBlock;

impl BlockRenderer for ProjectsBlock {
    fn render(&self, layer: &mut Layer, frame: &RenderFrame, data: &BlockData, ctx: &RenderContext) -> f64 {
        let BlockData::Projects { title, items } = data else {
            return frame.y;
        };
        let items: Vec<_> = items.iter().filter(|p| !p.is_empty()).collect();
        if items.is_empty() {
            return frame.y;
        }

        let theme = ctx.theme;
        let mut y = draw_heading(layer, frame, ctx, &heading_title(title, "Projects"), frame.y);

        for (i, project) in items.iter().enumerate() {
            if i > 0 {
                y += theme.item_gap;
            }
            if !project.title.is_empty() {
                let style = ctx.style(&project.title, theme.text_size, true);
                y = draw_wrapped(layer, frame, ctx, &project.title, y, &style, theme.heading_color);
            }
            if !project.description.is_empty() {
                let style = ctx.style(&project.description, theme.text_size, false);
                y = draw_wrapped(layer, frame, ctx, &project.description, y, &style, theme.text_color);
            }
            if !project.url.is_empty() {
                let style = ctx.style(&project.url, theme.small_size, false);
                let uri = link_target("url", &project.url);
                y = draw_linked(layer, frame, ctx, &project.url, y, &style, theme.link_color, uri.as_deref());
            }
        }
        y + theme.section_gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::testing::{frame, render, texts};
    use crate::canvas::DrawCommand;
    use crate::model::ProjectEntry;
    use crate::style::Direction;

    fn project(title: &str, description: &str, url: &str) -> ProjectEntry {
        ProjectEntry {
            title: title.into(),
            description: description.into(),
            url: url.into(),
        }
    }

    #[test]
    fn title_description_and_link() {
        let data = BlockData::Projects {
            title: None,
            items: vec![project("Vitae", "PDF résumés", "github.com/me/vitae"), project("B", "", "")],
        };
        let (layer, _) = render(&ProjectsBlock, &data, Direction::Ltr);
        assert_eq!(
            texts(&layer),
            vec!["Projects", "Vitae", "PDF résumés", "github.com/me/vitae", "B"]
        );
        assert!(layer.commands().iter().any(|c| matches!(
            c,
            DrawCommand::Link { uri, .. } if uri == "https://github.com/me/vitae"
        )));
    }

    #[test]
    fn all_empty_entries_draw_nothing() {
        let data = BlockData::Projects {
            title: Some("Work".into()),
            items: vec![project("", "", "")],
        };
        let (layer, y) = render(&ProjectsBlock, &data, Direction::Ltr);
        assert!(layer.is_empty());
        assert_eq!(y, frame().y);
    }

    #[test]
    fn taller_with_more_projects() {
        let one = BlockData::Projects {
            title: None,
            items: vec![project("A", "first", "")],
        };
        let two = BlockData::Projects {
            title: None,
            items: vec![project("A", "first", ""), project("B", "second", "")],
        };
        let (_, y1) = render(&ProjectsBlock, &one, Direction::Ltr);
        let (_, y2) = render(&ProjectsBlock, &two, Direction::Ltr);
        assert!(y2 > y1);
    }
}
