//! Element-tree collaborator interface and preview styling.

use alloc::string::String;

use crate::geometry::PhysicalPos;

/// Styling of the floating preview container.
///
/// The container is always absolutely positioned; its padding equals the
/// configured preview spacing.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ContainerStyle {
    /// CSS `border` shorthand.
    pub border: String,
    /// CSS `background`.
    pub background: String,
    pub z_index: i32,
}

impl Default for ContainerStyle {
    fn default() -> Self {
        Self {
            border: String::from("1px solid #dadada"),
            background: String::from("white"),
            z_index: 100,
        }
    }
}

/// Styling applied to the clone of the anchor target.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TargetStyle {
    /// CSS `color` forced on the clone.
    pub color: String,
}

impl Default for TargetStyle {
    fn default() -> Self {
        Self {
            color: String::from("black"),
        }
    }
}

/// Element operations needed to show a preview.
///
/// `Element` is a cheap handle (node id, reference-counted pointer, ...).
/// `Rendered` is what the layout engine's evaluator produces for a box.
pub trait PreviewDom {
    type Element: Clone;
    type Rendered;

    /// Create an empty, detached, absolutely positioned container.
    fn create_preview_container(&mut self, style: &ContainerStyle, padding: i32) -> Self::Element;

    /// Deep-clone a rendered anchor target for display inside a container.
    ///
    /// Implementations clear `left`/`top`/`right`/`bottom` on the clone and
    /// switch it to relative positioning, since it now flows inside the
    /// container.
    fn clone_preview_target(&mut self, rendered: &Self::Rendered, style: &TargetStyle)
        -> Self::Element;

    fn append_child(&mut self, parent: &Self::Element, child: &Self::Element);

    /// Remove `child` from `parent`. Removing a non-child is a no-op.
    fn remove_child(&mut self, parent: &Self::Element, child: &Self::Element);

    /// Whether `child` is currently a descendant of `parent`.
    fn contains(&self, parent: &Self::Element, child: &Self::Element) -> bool;

    fn child_element_count(&self, element: &Self::Element) -> usize;

    /// Write `left`/`top` pixel offsets.
    fn set_offset(&mut self, element: &Self::Element, pos: PhysicalPos);
}
