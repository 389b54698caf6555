//! Anchor-link rule registration.
//!
//! The embedding document matches elements against
//! [`ANCHOR_LINK_SELECTOR`] while it builds the page and calls
//! [`AnchorPreviewRule::on_create`] once per match. The returned controller
//! is then wired to the element's hover, click and page-change events.

use alloc::boxed::Box;
use core::fmt;

use crate::anchor::Anchor;
use crate::config::PreviewOptions;
use crate::controller::PreviewController;
use crate::dom::PreviewDom;
use crate::layout::{FlowRoot, LayoutNode};

/// Same-document fragment links.
pub const ANCHOR_LINK_SELECTOR: &str = "a[href^='#']";

/// Whether an element matches [`ANCHOR_LINK_SELECTOR`].
pub fn matches_anchor_link(tag: &str, href: Option<&str>) -> bool {
    tag.eq_ignore_ascii_case("a") && href.is_some_and(|href| href.starts_with('#'))
}

/// Fragment identifier of a same-document href.
pub fn anchor_name(href: &str) -> Option<&str> {
    href.strip_prefix('#')
}

/// A matched anchor-link element at build time.
#[derive(Clone, Copy, Debug)]
pub struct AnchorLink<'a, N, E> {
    /// Raw `href` attribute value.
    pub href: &'a str,
    /// Layout box of the link.
    pub node: &'a N,
    /// Rendered link element.
    pub element: E,
}

type NavigateCallback<N> = Box<dyn FnMut(&Anchor<N>) + 'static>;

/// Rule binding hover previews to every same-document link.
pub struct AnchorPreviewRule<N> {
    options: PreviewOptions,
    on_click: NavigateCallback<N>,
}

/// Create the anchor-link rule.
///
/// `on_click` receives the resolved anchor whenever a link is clicked and is
/// expected to move the reader to the anchor's page.
pub fn create<N, F>(options: PreviewOptions, on_click: F) -> AnchorPreviewRule<N>
where
    F: FnMut(&Anchor<N>) + 'static,
{
    AnchorPreviewRule {
        options,
        on_click: Box::new(on_click),
    }
}

impl<N> AnchorPreviewRule<N> {
    pub fn selector(&self) -> &'static str {
        ANCHOR_LINK_SELECTOR
    }

    pub fn options(&self) -> &PreviewOptions {
        &self.options
    }

    pub fn matches(&self, tag: &str, href: Option<&str>) -> bool {
        matches_anchor_link(tag, href)
    }

    /// Build-time callback for one matching element.
    ///
    /// Creates the element's preview container and the controller owning it.
    /// Returns `None` when `href` is not a fragment link.
    pub fn on_create<R, D>(
        &self,
        root: &R,
        link: AnchorLink<'_, N, D::Element>,
        dom: &mut D,
    ) -> Option<PreviewController<D::Element>>
    where
        N: LayoutNode,
        R: FlowRoot<Node = N>,
        D: PreviewDom,
    {
        let name = anchor_name(link.href)?;
        let container =
            dom.create_preview_container(&self.options.container, self.options.spacing_px.max(0));
        Some(PreviewController::new(
            name,
            link.element,
            container,
            link.node.geometry(),
            root.body_size(),
            &self.options,
        ))
    }

    /// Forward a click to the navigation callback.
    pub fn navigate(&mut self, anchor: &Anchor<N>) {
        (self.on_click)(anchor);
    }
}

impl<N> fmt::Debug for AnchorPreviewRule<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnchorPreviewRule")
            .field("selector", &ANCHOR_LINK_SELECTOR)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
