//! Layout-engine collaborator interface.
//!
//! The preview system never computes geometry itself. It reads finished box
//! geometry through [`LayoutNode`] and reaches the document's anchors and
//! renderer through [`FlowRoot`].

use crate::anchor::{Anchor, AnchorRegistry};
use crate::geometry::{body_size, LogicalOffset, LogicalSize, NodeGeometry, PhysicalSize};
use crate::writing_mode::WritingMode;

/// A laid-out box.
pub trait LayoutNode {
    /// Size along the inline axis.
    fn measure(&self) -> i32;
    /// Size along the block-progression axis.
    fn extent(&self) -> i32;
    /// Offset relative to the containing box.
    fn offset(&self) -> LogicalOffset;
    fn writing_mode(&self) -> WritingMode;

    fn geometry(&self) -> NodeGeometry {
        NodeGeometry::new(
            LogicalSize::new(self.measure(), self.extent()),
            self.offset(),
            self.writing_mode(),
        )
    }
}

/// The document body: outermost flow and owner of the anchor registry.
pub trait FlowRoot {
    type Node: LayoutNode;
    /// Renderable element produced from a box.
    type Rendered;

    fn max_measure(&self) -> i32;
    fn max_extent(&self) -> i32;
    fn writing_mode(&self) -> WritingMode;

    fn anchors(&self) -> &AnchorRegistry<Self::Node, Self::Rendered>;

    /// Materialize a box into a renderable element.
    ///
    /// Called at most once per anchor through
    /// [`rendered_anchor`](Self::rendered_anchor).
    fn evaluate(&self, node: &Self::Node) -> Self::Rendered;

    fn body_size(&self) -> PhysicalSize {
        body_size(self.max_measure(), self.max_extent(), self.writing_mode())
    }

    fn resolve_anchor(&self, name: &str) -> Option<&Anchor<Self::Node>> {
        self.anchors().get(name)
    }

    /// Rendered element for anchor `name`, evaluated on first request.
    fn rendered_anchor(&self, name: &str) -> Option<&Self::Rendered> {
        self.anchors()
            .rendered_or_init(name, |node| self.evaluate(node))
    }
}
