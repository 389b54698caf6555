//! Per-link preview lifecycle.
//!
//! A [`PreviewController`] is bound to one anchor-link element and owns that
//! link's preview container for its whole lifetime. The embedding layer
//! forwards hover, click and page-change events to it; the controller
//! resolves the anchor, computes placement and attaches or detaches the
//! container.
//!
//! ```text
//!            hover-enter (resolved, extent > 0)
//!   Hidden ─────────────────────────────────────▶ Showing
//!     ▲                                             │
//!     └──────── hover-exit | click | page-change ───┘
//! ```

use alloc::string::String;

use crate::anchor::Anchor;
use crate::config::PreviewOptions;
use crate::dom::{PreviewDom, TargetStyle};
use crate::geometry::{anchor_link_pos, preview_size, NodeGeometry, PhysicalSize};
use crate::layout::{FlowRoot, LayoutNode};
use crate::placement::{place, Placement};

/// Whether the link's preview container is attached.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum OverlayState {
    #[default]
    Hidden,
    Showing,
}

impl OverlayState {
    pub fn is_showing(self) -> bool {
        matches!(self, Self::Showing)
    }
}

/// Result of a hover-enter event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverOutcome {
    /// Container attached at the computed placement.
    Shown(Placement),
    /// A preview was already attached; nothing changed.
    AlreadyShowing,
    /// The fragment does not name a laid-out anchor.
    Unresolved,
    /// The anchor's target box has zero extent.
    DegenerateTarget,
}

impl HoverOutcome {
    pub fn placement(&self) -> Option<Placement> {
        match self {
            Self::Shown(placement) => Some(*placement),
            _ => None,
        }
    }
}

/// Result of a click event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The navigation sink was called.
    Navigated,
    /// The fragment does not name an anchor; nothing happened.
    Unresolved,
}

/// Preview lifecycle for a single anchor-link element.
#[derive(Clone, Debug)]
pub struct PreviewController<E> {
    anchor_name: String,
    link: E,
    container: E,
    link_geometry: NodeGeometry,
    body: PhysicalSize,
    spacing: i32,
    target_style: TargetStyle,
    state: OverlayState,
}

impl<E> PreviewController<E> {
    /// Bind a controller to `link` and its dedicated, detached `container`.
    pub fn new(
        anchor_name: impl Into<String>,
        link: E,
        container: E,
        link_geometry: NodeGeometry,
        body: PhysicalSize,
        options: &PreviewOptions,
    ) -> Self {
        Self {
            anchor_name: anchor_name.into(),
            link,
            container,
            link_geometry,
            body,
            spacing: options.spacing_px.max(0),
            target_style: options.target.clone(),
            state: OverlayState::Hidden,
        }
    }

    pub fn anchor_name(&self) -> &str {
        &self.anchor_name
    }

    pub fn link(&self) -> &E {
        &self.link
    }

    pub fn container(&self) -> &E {
        &self.container
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn is_showing(&self) -> bool {
        self.state.is_showing()
    }

    /// Show the preview for the link's anchor.
    pub fn on_hover_enter<R, D>(&mut self, root: &R, dom: &mut D) -> HoverOutcome
    where
        R: FlowRoot,
        D: PreviewDom<Element = E, Rendered = R::Rendered>,
    {
        if self.state.is_showing() {
            return HoverOutcome::AlreadyShowing;
        }
        let Some(target) = root
            .resolve_anchor(&self.anchor_name)
            .and_then(Anchor::target)
        else {
            log::debug!("preview skipped: anchor #{} unresolved", self.anchor_name);
            return HoverOutcome::Unresolved;
        };
        let target = target.geometry();
        if target.size.extent == 0 {
            log::debug!("preview skipped: anchor #{} has empty extent", self.anchor_name);
            return HoverOutcome::DegenerateTarget;
        }
        let Some(rendered) = root.rendered_anchor(&self.anchor_name) else {
            return HoverOutcome::Unresolved;
        };

        if dom.child_element_count(&self.container) == 0 {
            let clone = dom.clone_preview_target(rendered, &self.target_style);
            dom.append_child(&self.container, &clone);
        }

        let placement = place(
            self.link_geometry.writing_mode,
            self.body,
            anchor_link_pos(self.body, &self.link_geometry),
            self.link_geometry.physical_size(),
            preview_size(&target, self.spacing),
            self.spacing,
        );
        dom.set_offset(&self.container, placement.pos);
        dom.append_child(&self.link, &self.container);
        self.state = OverlayState::Showing;
        log::trace!("preview #{} attached ({:?})", self.anchor_name, placement.side);
        HoverOutcome::Shown(placement)
    }

    /// Hide on pointer exit. Returns whether the container was detached.
    pub fn on_hover_exit<D>(&mut self, dom: &mut D) -> bool
    where
        D: PreviewDom<Element = E>,
    {
        self.hide(dom)
    }

    /// Hide when the reader turns the page.
    pub fn on_page_change<D>(&mut self, dom: &mut D) -> bool
    where
        D: PreviewDom<Element = E>,
    {
        self.hide(dom)
    }

    /// Hide the preview and hand the anchor to `navigate`.
    ///
    /// Navigation does not depend on a preview having been shown.
    pub fn on_click<R, D, F>(&mut self, root: &R, dom: &mut D, navigate: F) -> ClickOutcome
    where
        R: FlowRoot,
        D: PreviewDom<Element = E>,
        F: FnOnce(&Anchor<R::Node>),
    {
        let Some(anchor) = root.resolve_anchor(&self.anchor_name) else {
            log::debug!("click ignored: anchor #{} unresolved", self.anchor_name);
            return ClickOutcome::Unresolved;
        };
        self.hide(dom);
        navigate(anchor);
        ClickOutcome::Navigated
    }

    fn hide<D>(&mut self, dom: &mut D) -> bool
    where
        D: PreviewDom<Element = E>,
    {
        if !self.state.is_showing() {
            return false;
        }
        dom.remove_child(&self.link, &self.container);
        self.state = OverlayState::Hidden;
        log::trace!("preview #{} detached", self.anchor_name);
        true
    }
}
