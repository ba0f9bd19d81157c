//! `avatar_circle`: the profile photo, masked to a circle, with a thin ring.

use super::{BlockData, BlockRenderer, RenderContext, RenderFrame};
use crate::canvas::Layer;
use crate::model::mm;
use crate::style::TextAlign;

pub struct AvatarCircleBlock;

impl BlockRenderer for AvatarCircleBlock {
    fn render(&self, layer: &mut Layer, frame: &RenderFrame, data: &BlockData, ctx: &RenderContext) -> f64 {
        let BlockData::Avatar {
            photo: Some(photo),
            max_d_mm,
            align,
        } = data
        else {
            return frame.y;
        };

        let d = mm(*max_d_mm).min(frame.width);
        if d <= 0.0 {
            return frame.y;
        }
        let x = match align {
            TextAlign::Left => frame.x,
            TextAlign::Right => frame.x + frame.width - d,
            TextAlign::Center => frame.x + (frame.width - d) / 2.0,
        };

        let theme = ctx.theme;
        layer.image(x, frame.y, d, d, photo.clone());
        if theme.avatar_ring_width > 0.0 {
            let r = d / 2.0;
            layer.circle(
                x + r,
                frame.y + r,
                r,
                None,
                Some((theme.avatar_ring, theme.avatar_ring_width)),
            );
        }
        frame.y + d + theme.section_gap
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::blocks::testing::{frame, render};
    use crate::canvas::DrawCommand;
    use crate::image_loader::LoadedImage;
    use crate::style::{Direction, Theme};

    fn photo() -> Arc<LoadedImage> {
        Arc::new(LoadedImage {
            width_px: 2,
            height_px: 2,
            rgb: vec![0; 12],
            alpha: Some(vec![255; 4]),
        })
    }

    fn image_rect(layer: &Layer) -> (f64, f64, f64) {
        layer
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::Image { x, y, width, .. } => Some((*x, *y, *width)),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn centered_by_default() {
        let data = BlockData::Avatar {
            photo: Some(photo()),
            max_d_mm: 42.0,
            align: TextAlign::Center,
        };
        let (layer, y) = render(&AvatarCircleBlock, &data, Direction::Ltr);
        let f = frame();
        let (x, top, d) = image_rect(&layer);
        assert!((d - mm(42.0)).abs() < 1e-9);
        assert!((x - (f.x + (f.width - d) / 2.0)).abs() < 1e-9);
        assert_eq!(top, f.y);
        assert!((y - (f.y + d + Theme::default().section_gap)).abs() < 1e-9);
        assert_eq!(layer.commands().len(), 2);
    }

    #[test]
    fn diameter_capped_by_frame_width() {
        let data = BlockData::Avatar {
            photo: Some(photo()),
            max_d_mm: 500.0,
            align: TextAlign::Left,
        };
        let (layer, _) = render(&AvatarCircleBlock, &data, Direction::Ltr);
        let (x, _, d) = image_rect(&layer);
        assert_eq!(d, frame().width);
        assert_eq!(x, frame().x);
    }

    #[test]
    fn no_photo_draws_nothing() {
        let data = BlockData::Avatar {
            photo: None,
            max_d_mm: 42.0,
            align: TextAlign::Center,
        };
        let (layer, y) = render(&AvatarCircleBlock, &data, Direction::Ltr);
        assert!(layer.is_empty());
        assert_eq!(y, frame().y);
    }
}
