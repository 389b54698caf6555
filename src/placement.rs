//! Preview placement around an anchor link.
//!
//! The solver prefers the side that keeps the anchor link visible and the
//! preview inside the body. Candidate sides are scored by *overflow*, the
//! positive excess by which the preview would cross a body edge; the default
//! side wins unless the alternative overflows strictly less.
//!
//! Returned offsets are relative to the anchor-link box: the preview
//! container is attached as a child of the link element.
//!
//! | Mode            | Default side | Alternative | Free axis            |
//! |-----------------|--------------|-------------|----------------------|
//! | `horizontal-tb` | below        | above       | `left`, clamped to 0 |
//! | `vertical-rl`   | left         | right       | `top`, pinned to 0   |
//! | `vertical-lr`   | right        | left        | `top`, pinned to 0   |
//!
//! In horizontal mode the right-edge check only resets `left` to `0`; a
//! preview wider than the remaining space is not pulled back to
//! `body.width - preview.width`.

use crate::geometry::{AnchorLinkPos, PhysicalPos, PhysicalSize, PreviewPos};
use crate::writing_mode::WritingMode;

/// Side of the anchor link the preview was placed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum PreviewSide {
    Below,
    Above,
    Left,
    Right,
}

/// Solver result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    /// Container offset relative to the anchor-link box.
    pub pos: PreviewPos,
    /// Chosen side on the block axis.
    pub side: PreviewSide,
    /// Free axis was reset to the body origin to limit overflow.
    pub edge_clamped: bool,
}

/// Positive excess of `end` past `limit`.
///
/// Geometry comes from untrusted layout output, so all solver arithmetic
/// saturates instead of wrapping.
fn overflow(end: i32, limit: i32) -> i32 {
    end.saturating_sub(limit).max(0)
}

/// `-(size + 2 * spacing)`: offset that puts the preview before the link.
fn before_link(size: i32, spacing: i32) -> i32 {
    size.saturating_add(spacing.saturating_mul(2)).saturating_neg()
}

/// Compute the preview container offset.
pub fn solve(
    mode: WritingMode,
    body: PhysicalSize,
    anchor_pos: AnchorLinkPos,
    anchor_size: PhysicalSize,
    preview_size: PhysicalSize,
    spacing: i32,
) -> PreviewPos {
    place(mode, body, anchor_pos, anchor_size, preview_size, spacing).pos
}

/// Compute the preview container offset along with the decision taken.
pub fn place(
    mode: WritingMode,
    body: PhysicalSize,
    anchor_pos: AnchorLinkPos,
    anchor_size: PhysicalSize,
    preview_size: PhysicalSize,
    spacing: i32,
) -> Placement {
    let placement = if mode.is_text_horizontal() {
        place_horizontal(body, anchor_pos, anchor_size, preview_size, spacing)
    } else {
        place_vertical(mode, body, anchor_pos, anchor_size, preview_size, spacing)
    };
    log::trace!(
        "preview placement mode={} side={:?} left={} top={} clamped={}",
        mode,
        placement.side,
        placement.pos.left,
        placement.pos.top,
        placement.edge_clamped
    );
    placement
}

fn place_horizontal(
    body: PhysicalSize,
    anchor: AnchorLinkPos,
    anchor_size: PhysicalSize,
    preview: PhysicalSize,
    spacing: i32,
) -> Placement {
    let right_over = overflow(anchor.left.saturating_add(preview.width), body.width);
    let down_over = overflow(
        anchor
            .top
            .saturating_add(anchor_size.height)
            .saturating_add(preview.height),
        body.height,
    );
    let up_over = overflow(preview.height, anchor.top);

    let left = if right_over > 0 { 0 } else { anchor.left };
    let (side, top) = if down_over > up_over {
        (PreviewSide::Above, before_link(preview.height, spacing))
    } else {
        (PreviewSide::Below, anchor_size.height.saturating_add(spacing))
    };
    Placement {
        pos: PhysicalPos::new(left, top),
        side,
        edge_clamped: right_over > 0,
    }
}

fn place_vertical(
    mode: WritingMode,
    body: PhysicalSize,
    anchor: AnchorLinkPos,
    anchor_size: PhysicalSize,
    preview: PhysicalSize,
    spacing: i32,
) -> Placement {
    let right_over = overflow(
        anchor
            .left
            .saturating_add(anchor_size.width)
            .saturating_add(preview.width),
        body.width,
    );
    let left_over = overflow(preview.width, anchor.left);
    let down_over = overflow(anchor.top.saturating_add(preview.height), body.height);

    let to_right = if mode.is_vertical_rl() {
        left_over > right_over
    } else {
        right_over <= left_over
    };
    let (side, left) = if to_right {
        (PreviewSide::Right, anchor_size.width.saturating_add(spacing))
    } else {
        (PreviewSide::Left, before_link(preview.width, spacing))
    };
    let top = if down_over > 0 { 0 } else { anchor.top };
    Placement {
        pos: PhysicalPos::new(left, top),
        side,
        edge_clamped: down_over > 0,
    }
}
