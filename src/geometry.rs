//! Logical/physical geometry conversion.
//!
//! Layout boxes report their size and position relative to the text-flow
//! axes: *measure* runs along the line, *extent* along block progression.
//! Overlays are positioned in screen space, so every value is normalised
//! through the active [`WritingMode`] before placement.

use crate::layout::LayoutNode;
use crate::writing_mode::WritingMode;

/// Flow-relative size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogicalSize {
    /// Size along the inline (line) axis.
    pub measure: i32,
    /// Size along the block-progression axis.
    pub extent: i32,
}

impl LogicalSize {
    pub fn new(measure: i32, extent: i32) -> Self {
        Self { measure, extent }
    }

    /// Map onto screen axes: vertical modes swap measure and extent.
    pub fn to_physical(self, mode: WritingMode) -> PhysicalSize {
        if mode.is_text_horizontal() {
            PhysicalSize::new(self.measure, self.extent)
        } else {
            PhysicalSize::new(self.extent, self.measure)
        }
    }
}

/// Screen-space size in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhysicalSize {
    pub width: i32,
    pub height: i32,
}

impl PhysicalSize {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Grow both axes by `px`.
    pub fn grow(self, px: i32) -> Self {
        Self::new(self.width.saturating_add(px), self.height.saturating_add(px))
    }
}

/// Flow-relative offset of a box inside its container.
///
/// `before` is measured from the block-progression leading edge, which is the
/// body's right edge under `vertical-rl`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogicalOffset {
    /// Offset along the inline axis.
    pub start: i32,
    /// Offset along the block-progression axis.
    pub before: i32,
}

impl LogicalOffset {
    pub fn new(start: i32, before: i32) -> Self {
        Self { start, before }
    }
}

/// Screen position, origin at the body's top-left corner, y grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhysicalPos {
    pub left: i32,
    pub top: i32,
}

impl PhysicalPos {
    pub fn new(left: i32, top: i32) -> Self {
        Self { left, top }
    }
}

/// Position of an anchor-link box in body coordinates.
pub type AnchorLinkPos = PhysicalPos;

/// Position of a preview container, relative to its anchor-link box.
pub type PreviewPos = PhysicalPos;

/// Snapshot of a laid-out box: logical size, logical offset and mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeGeometry {
    pub size: LogicalSize,
    pub offset: LogicalOffset,
    pub writing_mode: WritingMode,
}

impl NodeGeometry {
    pub fn new(size: LogicalSize, offset: LogicalOffset, writing_mode: WritingMode) -> Self {
        Self {
            size,
            offset,
            writing_mode,
        }
    }

    /// Screen-space size of the box.
    pub fn physical_size(&self) -> PhysicalSize {
        self.size.to_physical(self.writing_mode)
    }
}

impl LayoutNode for NodeGeometry {
    fn measure(&self) -> i32 {
        self.size.measure
    }

    fn extent(&self) -> i32 {
        self.size.extent
    }

    fn offset(&self) -> LogicalOffset {
        self.offset
    }

    fn writing_mode(&self) -> WritingMode {
        self.writing_mode
    }

    fn geometry(&self) -> NodeGeometry {
        *self
    }
}

/// Physical body size from the flow root's maximum measure and extent.
pub fn body_size(max_measure: i32, max_extent: i32, mode: WritingMode) -> PhysicalSize {
    LogicalSize::new(max_measure, max_extent).to_physical(mode)
}

/// Convert a node's logical offset into body coordinates.
pub fn anchor_link_pos(body: PhysicalSize, node: &NodeGeometry) -> AnchorLinkPos {
    let offset = node.offset;
    match node.writing_mode {
        WritingMode::HorizontalTb => PhysicalPos::new(offset.start, offset.before),
        // `before` is a right-edge distance here.
        WritingMode::VerticalRl => PhysicalPos::new(
            body.width
                .saturating_sub(offset.before)
                .saturating_sub(node.size.extent),
            offset.start,
        ),
        WritingMode::VerticalLr => PhysicalPos::new(offset.before, offset.start),
    }
}

/// Outer size of a preview: the target box plus container padding.
pub fn preview_size(target: &NodeGeometry, spacing: i32) -> PhysicalSize {
    target.physical_size().grow(spacing)
}
