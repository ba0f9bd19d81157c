//! # Page Break Decisions
//!
//! Blocks are unbreakable: a rendered block either stays where it was drawn
//! or moves, whole, to the top of the same frame on the next page.

/// Tolerance for floating point comparisons against frame edges.
const EPSILON: f64 = 0.01;

/// What to do with a block after it has been rendered at the cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BreakDecision {
    /// The block fits (or cannot fit anywhere better): commit it here.
    Place,
    /// Move the block to the frame top on the next page.
    MoveToNextPage,
}

/// Decide where a block painted over `[block_top, block_bottom]` goes.
///
/// A block that crosses `frame_bottom` moves to the next page, unless the
/// cursor is already at the frame top. Moving would then gain nothing, so
/// an oversized block is placed and left to overflow.
pub fn decide_break(cursor: f64, frame_top: f64, frame_bottom: f64, block_bottom: f64) -> BreakDecision {
    if block_bottom <= frame_bottom + EPSILON {
        return BreakDecision::Place;
    }
    if cursor <= frame_top + EPSILON {
        return BreakDecision::Place;
    }
    BreakDecision::MoveToNextPage
}

/// Whether content of `height` fits a frame spanning `frame_top..frame_bottom`.
pub fn fits_in_frame(height: f64, frame_top: f64, frame_bottom: f64) -> bool {
    height <= frame_bottom - frame_top + EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_inside_frame_is_placed() {
        assert_eq!(decide_break(100.0, 36.0, 800.0, 790.0), BreakDecision::Place);
    }

    #[test]
    fn overflowing_block_moves() {
        assert_eq!(
            decide_break(700.0, 36.0, 800.0, 820.0),
            BreakDecision::MoveToNextPage
        );
    }

    #[test]
    fn overflow_at_frame_top_is_placed() {
        assert_eq!(decide_break(36.0, 36.0, 800.0, 2000.0), BreakDecision::Place);
    }

    #[test]
    fn rounding_noise_does_not_break() {
        assert_eq!(decide_break(700.0, 36.0, 800.0, 800.005), BreakDecision::Place);
    }

    #[test]
    fn frame_fit() {
        assert!(fits_in_frame(764.0, 36.0, 800.0));
        assert!(!fits_in_frame(765.0, 36.0, 800.0));
    }
}
