//! # Layout Interpreter
//!
//! Walks a layout's flow of frames and places every block on a page.
//!
//! ## How It Works
//!
//! 1. **Prepare.** Before anything is drawn, each block instance's effective
//!    data is computed (inline data, with overrides filling the gaps) and
//!    parsed into typed [`BlockData`]. Avatar photos are decoded here, once.
//! 2. **Walk.** Frames are visited in order. Each frame starts at its top
//!    edge on the first page with its own cursor; frames are independent
//!    columns, not a continuation of one another.
//! 3. **Render detached.** A block is rendered into a scratch [`Layer`] at
//!    the cursor. Nothing touches the canvas yet.
//! 4. **Decide.** If what the block painted crosses the frame's bottom and
//!    the cursor is below the frame top, the whole layer is shifted to the
//!    frame top on the next page. Blocks are never split.
//! 5. **Commit.** The layer goes onto its page and the cursor moves to the
//!    y the renderer returned (shifted along with the layer).
//!
//! The walk is an explicit state machine so every transition is visible in
//! one place, and so a page break is its own step rather than a side effect
//! buried inside block rendering.

pub mod merge;
pub mod page_break;

use serde_json::{Map, Value};

use crate::blocks::{BlockData, BlockRegistry, RenderContext, RenderFrame};
use crate::canvas::{Canvas, Layer};
use crate::model::{FrameGeometry, Layout};
use page_break::{decide_break, fits_in_frame, BreakDecision};

/// A block instance with its data resolved and parsed.
#[derive(Debug, Clone)]
pub struct PreparedBlock {
    pub block_id: String,
    pub data: BlockData,
}

/// A frame resolved against the page, ready to walk.
#[derive(Debug, Clone)]
pub struct PreparedFrame {
    pub label: String,
    pub geometry: FrameGeometry,
    pub blocks: Vec<PreparedBlock>,
}

/// Resolve frame geometry and the typed data of every block.
pub fn prepare(layout: &Layout, overrides: &Map<String, Value>) -> Vec<PreparedFrame> {
    layout
        .flow
        .iter()
        .enumerate()
        .map(|(i, frame)| PreparedFrame {
            label: frame.label(i),
            geometry: frame.geometry(&layout.page),
            blocks: frame
                .blocks
                .iter()
                .map(|block| {
                    let value = merge::effective_data(&block.block_id, block.data.as_ref(), overrides);
                    PreparedBlock {
                        block_id: block.block_id.clone(),
                        data: BlockData::from_value(&block.block_id, &value),
                    }
                })
                .collect(),
        })
        .collect()
}

/// Where a block ended up.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockPlacement {
    pub block_id: String,
    pub frame: String,
    pub page: usize,
    /// Painted extent. Equal when the block drew nothing.
    pub top: f64,
    pub bottom: f64,
}

/// Summary of one interpreter run.
#[derive(Debug, Clone, Default)]
pub struct RenderOutcome {
    pub placements: Vec<BlockPlacement>,
    /// Block ids with no registered renderer.
    pub skipped: Vec<String>,
    /// Page breaks taken.
    pub page_breaks: usize,
}

impl RenderOutcome {
    /// Number of pages any block was placed on.
    pub fn pages_used(&self) -> usize {
        self.placements
            .iter()
            .map(|p| p.page + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Interpreter states.
enum State {
    AwaitingFrame,
    RenderingFrame,
    AwaitingBlock,
    RenderingBlock,
    AdvanceCursor { layer: Layer, next_y: f64 },
    PageBreak { layer: Layer, next_y: f64 },
    Done,
}

/// The per-frame cursor: a page and a y position on it.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    page: usize,
    y: f64,
}

pub struct LayoutInterpreter<'r> {
    registry: &'r BlockRegistry,
}

impl<'r> LayoutInterpreter<'r> {
    pub fn new(registry: &'r BlockRegistry) -> Self {
        Self { registry }
    }

    /// Render every frame onto `canvas`.
    pub fn run(&self, frames: &[PreparedFrame], ctx: &RenderContext, canvas: &mut Canvas) -> RenderOutcome {
        let mut outcome = RenderOutcome::default();
        let mut state = State::AwaitingFrame;
        let mut frame_idx = 0;
        let mut block_idx = 0;
        let mut cursor = Cursor { page: 0, y: 0.0 };

        loop {
            state = match state {
                State::AwaitingFrame => {
                    if frame_idx < frames.len() {
                        State::RenderingFrame
                    } else {
                        State::Done
                    }
                }

                State::RenderingFrame => {
                    let frame = &frames[frame_idx];
                    cursor = Cursor {
                        page: 0,
                        y: frame.geometry.top,
                    };
                    block_idx = 0;
                    log::debug!(
                        "{}: x={:.1} top={:.1} width={:.1} bottom={:.1}, {} block(s)",
                        frame.label,
                        frame.geometry.x,
                        frame.geometry.top,
                        frame.geometry.width,
                        frame.geometry.bottom,
                        frame.blocks.len()
                    );
                    State::AwaitingBlock
                }

                State::AwaitingBlock => {
                    if block_idx < frames[frame_idx].blocks.len() {
                        State::RenderingBlock
                    } else {
                        frame_idx += 1;
                        State::AwaitingFrame
                    }
                }

                State::RenderingBlock => {
                    let frame = &frames[frame_idx];
                    let block = &frame.blocks[block_idx];
                    block_idx += 1;

                    match self.registry.resolve(&block.block_id) {
                        Err(e) => {
                            log::warn!("{}: {}; block skipped", frame.label, e);
                            outcome.skipped.push(block.block_id.clone());
                            State::AwaitingBlock
                        }
                        Ok(renderer) => {
                            let g = &frame.geometry;
                            let render_frame = RenderFrame {
                                x: g.x,
                                y: cursor.y,
                                width: g.width,
                                bottom: g.bottom,
                            };
                            let mut layer = Layer::new();
                            let next_y = renderer.render(&mut layer, &render_frame, &block.data, ctx);
                            match layer.bounds() {
                                Some((_, bottom)) => match decide_break(cursor.y, g.top, g.bottom, bottom) {
                                    BreakDecision::Place => State::AdvanceCursor { layer, next_y },
                                    BreakDecision::MoveToNextPage => State::PageBreak { layer, next_y },
                                },
                                None => State::AdvanceCursor { layer, next_y },
                            }
                        }
                    }
                }

                State::PageBreak { mut layer, next_y } => {
                    let frame = &frames[frame_idx];
                    let dy = frame.geometry.top - cursor.y;
                    layer.offset_y(dy);
                    cursor = Cursor {
                        page: cursor.page + 1,
                        y: frame.geometry.top,
                    };
                    outcome.page_breaks += 1;
                    log::debug!(
                        "{}: page break before '{}', continuing on page {}",
                        frame.label,
                        frame.blocks[block_idx - 1].block_id,
                        cursor.page + 1
                    );
                    State::AdvanceCursor {
                        layer,
                        next_y: next_y + dy,
                    }
                }

                State::AdvanceCursor { layer, next_y } => {
                    let frame = &frames[frame_idx];
                    let block_id = &frame.blocks[block_idx - 1].block_id;
                    let (top, bottom) = layer.bounds().unwrap_or((cursor.y, cursor.y));
                    if !layer.is_empty() && !fits_in_frame(bottom - top, frame.geometry.top, frame.geometry.bottom) {
                        log::warn!(
                            "{}: '{}' is {:.1}pt tall, taller than the frame; it will overflow",
                            frame.label,
                            block_id,
                            bottom - top
                        );
                    }
                    log::debug!(
                        "{}: '{}' on page {} at {:.1}..{:.1}",
                        frame.label,
                        block_id,
                        cursor.page + 1,
                        top,
                        bottom
                    );
                    outcome.placements.push(BlockPlacement {
                        block_id: block_id.clone(),
                        frame: frame.label.clone(),
                        page: cursor.page,
                        top,
                        bottom,
                    });
                    if !layer.is_empty() {
                        canvas.commit(cursor.page, layer);
                    }
                    cursor.y = next_y;
                    State::AwaitingBlock
                }

                State::Done => break,
            };
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::BlockRenderer;
    use crate::font::FontContext;
    use crate::model::{BlockInstance, Frame, PageConfig};
    use crate::style::{Color, Direction, Theme};
    use serde_json::json;

    /// Paints a box of fixed height at the cursor.
    struct Boxed(f64);

    impl BlockRenderer for Boxed {
        fn render(&self, layer: &mut Layer, frame: &RenderFrame, _: &BlockData, _: &RenderContext) -> f64 {
            layer.filled_rect(frame.x, frame.y, frame.width, self.0, 0.0, Color::BLACK);
            frame.y + self.0
        }
    }

    /// Draws nothing, moves nothing.
    struct Nothing;

    impl BlockRenderer for Nothing {
        fn render(&self, _: &mut Layer, frame: &RenderFrame, _: &BlockData, _: &RenderContext) -> f64 {
            frame.y
        }
    }

    fn registry() -> BlockRegistry {
        let mut r = BlockRegistry::new();
        r.register("box100", Boxed(100.0));
        r.register("box300", Boxed(300.0));
        r.register("huge", Boxed(2000.0));
        r.register("nothing", Nothing);
        r
    }

    fn layout(frames: Vec<Vec<&str>>) -> Layout {
        Layout {
            page: PageConfig::default(),
            flow: frames
                .into_iter()
                .map(|ids| Frame {
                    blocks: ids.into_iter().map(BlockInstance::new).collect(),
                    ..Default::default()
                })
                .collect(),
            overrides: Map::new(),
        }
    }

    fn run(layout: &Layout) -> (RenderOutcome, usize) {
        let registry = registry();
        let theme = Theme::default();
        let fonts = FontContext::new();
        let ctx = RenderContext::new(&theme, &fonts, Direction::Ltr, "en");
        let frames = prepare(layout, &layout.overrides);
        let mut canvas = Canvas::new(&layout.page);
        let outcome = LayoutInterpreter::new(&registry).run(&frames, &ctx, &mut canvas);
        (outcome, canvas.finish().len())
    }

    #[test]
    fn blocks_stack_down_the_frame() {
        let (outcome, pages) = run(&layout(vec![vec!["box100", "box100"]]));
        assert_eq!(pages, 1);
        assert_eq!(outcome.placements[0].top, 36.0);
        assert_eq!(outcome.placements[1].top, 136.0);
    }

    #[test]
    fn overflowing_block_moves_whole_to_next_page() {
        // Content box is 36..805.89: two 300pt boxes fit, the third does not.
        let (outcome, pages) = run(&layout(vec![vec!["box300", "box300", "box300"]]));
        assert_eq!(pages, 2);
        assert_eq!(outcome.page_breaks, 1);
        let third = &outcome.placements[2];
        assert_eq!(third.page, 1);
        assert_eq!(third.top, 36.0);
        assert_eq!(third.bottom, 336.0);
    }

    #[test]
    fn no_block_straddles_the_frame_bottom() {
        let ids = vec!["box100"; 20];
        let (outcome, pages) = run(&layout(vec![ids]));
        assert!(pages > 1);
        let bottom = PageConfig::default().content_bottom();
        for p in &outcome.placements {
            assert!(p.bottom <= bottom + 0.01, "{:?}", p);
        }
    }

    #[test]
    fn oversized_block_is_placed_at_the_frame_top() {
        let (outcome, pages) = run(&layout(vec![vec!["huge", "box100"]]));
        assert_eq!(outcome.placements[0].page, 0);
        assert_eq!(outcome.page_breaks, 1);
        assert_eq!(outcome.placements[1].page, 1);
        assert_eq!(pages, 2);
    }

    #[test]
    fn unknown_block_leaves_cursor_alone() {
        let (outcome, _) = run(&layout(vec![vec!["box100", "timeline", "box100"]]));
        assert_eq!(outcome.skipped, vec!["timeline".to_string()]);
        assert_eq!(outcome.placements.len(), 2);
        assert_eq!(outcome.placements[1].top, 136.0);
    }

    #[test]
    fn empty_block_records_placement_without_moving() {
        let (outcome, _) = run(&layout(vec![vec!["nothing", "box100"]]));
        assert_eq!(outcome.placements[0].top, outcome.placements[0].bottom);
        assert_eq!(outcome.placements[1].top, 36.0);
    }

    #[test]
    fn each_frame_starts_on_the_first_page() {
        let mut l = layout(vec![vec!["box300"; 4], vec!["box100"]]);
        l.flow[1].x = Some(300.0);
        l.flow[1].y = Some(50.0);
        let (outcome, pages) = run(&l);
        assert_eq!(pages, 2);
        let last = outcome.placements.last().unwrap();
        assert_eq!(last.page, 0);
        assert_eq!(last.top, 50.0);
    }

    #[test]
    fn frame_height_limits_the_column() {
        let mut l = layout(vec![vec!["box100", "box100"]]);
        l.flow[0].h = Some(150.0);
        let (outcome, _) = run(&l);
        assert_eq!(outcome.placements[1].page, 1);
    }

    #[test]
    fn empty_flow_renders_nothing() {
        let (outcome, pages) = run(&layout(vec![]));
        assert!(outcome.placements.is_empty());
        assert_eq!(outcome.pages_used(), 0);
        assert_eq!(pages, 1);
    }

    #[test]
    fn prepare_merges_overrides_under_inline_data() {
        let mut l = layout(vec![]);
        l.flow.push(Frame {
            blocks: vec![BlockInstance::with_data("header_name", json!({"title": "Inline"}))],
            ..Default::default()
        });
        l.overrides
            .insert("header_name".into(), json!({"data": {"name": "Ada", "title": "Derived"}}));
        let frames = prepare(&l, &l.overrides);
        assert_eq!(
            frames[0].blocks[0].data,
            BlockData::HeaderName {
                name: "Ada".into(),
                title: "Inline".into()
            }
        );
    }

    #[test]
    fn text_blocks_break_without_splitting() {
        let mut r = BlockRegistry::with_builtins();
        r.register("box300", Boxed(300.0));
        let theme = Theme::default();
        let fonts = FontContext::new();
        let ctx = RenderContext::new(&theme, &fonts, Direction::Ltr, "en");
        r.register("box100", Boxed(100.0));
        let mut l = layout(vec![vec!["box300", "box300", "box100", "languages"]]);
        l.overrides.insert(
            "languages".into(),
            json!({"data": {"languages": ["English", "French", "German", "Arabic", "Spanish", "Italian", "Greek"]}}),
        );
        let frames = prepare(&l, &l.overrides);
        let mut canvas = Canvas::new(&l.page);
        let outcome = LayoutInterpreter::new(&r).run(&frames, &ctx, &mut canvas);
        let pages = canvas.finish();
        assert_eq!(outcome.placements[3].page, 1);
        let on_second: usize = pages[1]
            .commands
            .iter()
            .filter(|c| matches!(c, crate::canvas::DrawCommand::Text { .. }))
            .count();
        // Heading + a bullet and a line per language, all on page two.
        assert_eq!(on_second, 1 + 2 * 7);
    }
}
