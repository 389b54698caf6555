//! Page host: wires the anchor-link rule into a loaded page.
//!
//! The host mirrors the page into a [`MemoryDom`], binds a
//! [`PreviewController`] to every `a[href^='#']` element and routes pointer
//! events to the controller of the element they hit.

use anchor_preview::{
    create, Anchor, AnchorPreviewRule, ClickOutcome, FlowRoot, HoverOutcome, Placement,
    PreviewController, PreviewOptions,
};

use crate::document::{BoxNode, StaticDocument};
use crate::dom::{MemoryDom, NodeId};
use crate::error::DocumentError;

/// Pointer event delivered to an anchor-link element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostEvent {
    HoverEnter,
    HoverExit,
    Click,
}

/// What an event did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventEffect {
    Hover(HoverOutcome),
    /// `true` when a visible preview was detached.
    Hidden(bool),
    Click(ClickOutcome),
    /// The element has no preview controller.
    NoController,
}

pub(crate) struct BoundLink {
    pub(crate) href: String,
    pub(crate) controller: PreviewController<NodeId>,
    /// Placement of the most recent successful hover.
    pub(crate) last_placement: Option<Placement>,
}

/// A loaded page with previews bound to its anchor links.
pub struct DocumentHost {
    pub(crate) document: StaticDocument,
    pub(crate) dom: MemoryDom,
    rule: AnchorPreviewRule<BoxNode>,
    pub(crate) links: Vec<BoundLink>,
    elements: Vec<NodeId>,
    pub(crate) page_index: usize,
}

impl DocumentHost {
    /// Load `xhtml` and bind previews to its anchor links.
    pub fn build<F>(
        xhtml: &[u8],
        options: PreviewOptions,
        on_click: F,
    ) -> Result<Self, DocumentError>
    where
        F: FnMut(&Anchor<BoxNode>) + 'static,
    {
        let document = StaticDocument::parse(xhtml)?;
        Self::from_document(document, options, on_click)
    }

    /// Bind previews to an already loaded page.
    pub fn from_document<F>(
        document: StaticDocument,
        options: PreviewOptions,
        on_click: F,
    ) -> Result<Self, DocumentError>
    where
        F: FnMut(&Anchor<BoxNode>) + 'static,
    {
        options.validate()?;
        let rule = create(options, on_click);
        let mut dom = MemoryDom::new();
        let elements = mirror(&document, &mut dom);

        let mut links = Vec::new();
        for (index, element) in elements.iter().enumerate() {
            let Some(tag) = document.tag(index) else {
                continue;
            };
            let href = document.attribute(index, "href");
            if !rule.matches(tag, href) {
                continue;
            }
            let (Some(href), Some(node)) = (href, document.box_node(index)) else {
                continue;
            };
            let link = anchor_preview::AnchorLink {
                href,
                node: &node,
                element: *element,
            };
            if let Some(controller) = rule.on_create(&document, link, &mut dom) {
                links.push(BoundLink {
                    href: href.to_string(),
                    controller,
                    last_placement: None,
                });
            }
        }
        log::debug!("bound previews to {} anchor links", links.len());

        Ok(Self {
            document,
            dom,
            rule,
            links,
            elements,
            page_index: 0,
        })
    }

    /// Deliver `event` to the anchor-link element `link`.
    pub fn dispatch(&mut self, link: NodeId, event: HostEvent) -> EventEffect {
        let Self {
            document,
            dom,
            rule,
            links,
            ..
        } = self;
        let Some(bound) = links.iter_mut().find(|bound| *bound.controller.link() == link) else {
            log::trace!("event {:?} on unbound element {:?}", event, link);
            return EventEffect::NoController;
        };
        match event {
            HostEvent::HoverEnter => {
                let outcome = bound.controller.on_hover_enter(&*document, &mut *dom);
                if let Some(placement) = outcome.placement() {
                    bound.last_placement = Some(placement);
                }
                EventEffect::Hover(outcome)
            }
            HostEvent::HoverExit => EventEffect::Hidden(bound.controller.on_hover_exit(&mut *dom)),
            HostEvent::Click => EventEffect::Click(bound.controller.on_click(
                &*document,
                &mut *dom,
                |anchor| rule.navigate(anchor),
            )),
        }
    }

    /// Turn to page `page_index`, hiding every visible preview.
    ///
    /// Returns how many previews were hidden.
    pub fn set_page(&mut self, page_index: usize) -> usize {
        let mut hidden = 0;
        for bound in &mut self.links {
            if bound.controller.on_page_change(&mut self.dom) {
                hidden += 1;
            }
        }
        self.page_index = page_index;
        log::debug!("page {} shown, {} previews hidden", page_index, hidden);
        hidden
    }

    pub fn current_page(&self) -> usize {
        self.page_index
    }

    /// Element of the first bound link whose `href` equals `href`.
    pub fn find_link(&self, href: &str) -> Option<NodeId> {
        self.links
            .iter()
            .find(|bound| bound.href == href)
            .map(|bound| *bound.controller.link())
    }

    /// Mirrored node of source node `index`.
    pub fn element(&self, index: usize) -> Option<NodeId> {
        self.elements.get(index).copied()
    }

    pub fn controller(&self, link: NodeId) -> Option<&PreviewController<NodeId>> {
        self.links
            .iter()
            .map(|bound| &bound.controller)
            .find(|controller| *controller.link() == link)
    }

    /// Placement of the most recent preview shown for `link`.
    pub fn last_placement(&self, link: NodeId) -> Option<Placement> {
        self.links
            .iter()
            .find(|bound| *bound.controller.link() == link)
            .and_then(|bound| bound.last_placement)
    }

    /// Elements of all bound links, in document order.
    pub fn link_elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.links.iter().map(|bound| *bound.controller.link())
    }

    /// Hrefs of all bound links, in document order.
    pub fn link_hrefs(&self) -> impl Iterator<Item = &str> {
        self.links.iter().map(|bound| bound.href.as_str())
    }

    pub fn document(&self) -> &StaticDocument {
        &self.document
    }

    pub fn dom(&self) -> &MemoryDom {
        &self.dom
    }

    pub fn options(&self) -> &PreviewOptions {
        self.rule.options()
    }

    pub fn writing_mode(&self) -> anchor_preview::WritingMode {
        self.document.writing_mode()
    }
}

/// Copy the page's node tree into `dom`; node `i` mirrors source `i`.
fn mirror(document: &StaticDocument, dom: &mut MemoryDom) -> Vec<NodeId> {
    let count = document.node_count();
    let mut elements = Vec::with_capacity(count);
    for index in 0..count {
        if document.is_text(index) {
            elements.push(dom.create_text(document.text(index).unwrap_or_default()));
            continue;
        }
        let id = dom.create_element(document.tag(index).unwrap_or_default());
        for (name, value) in document.attributes(index) {
            dom.set_attribute(id, name, value);
        }
        elements.push(id);
    }
    for (index, parent) in elements.iter().enumerate() {
        for child in document.children(index) {
            if let Some(child) = elements.get(*child) {
                dom.append(*parent, *child);
            }
        }
    }
    elements
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_preview::{OverlayState, PhysicalPos, PreviewDom, PreviewSide};
    use std::cell::RefCell;
    use std::rc::Rc;

    const PAGE: &str = r##"<html>
<body data-max-measure="800" data-max-extent="600">
  <p data-measure="800" data-extent="40" data-before="540">
    <a href="#n1" data-measure="50" data-extent="20" data-start="100" data-before="560">1</a>
    <a href="#nowhere" data-measure="50" data-extent="20" data-start="200" data-before="560">2</a>
    <a href="other.xhtml#n1" data-measure="50" data-extent="20"/>
  </p>
  <aside id="n1" data-measure="180" data-extent="90" data-before="0" data-page="3">Footnote</aside>
</body>
</html>"##;

    fn host_with_sink() -> (DocumentHost, Rc<RefCell<Vec<String>>>) {
        let visited = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&visited);
        let options = PreviewOptions::default().with_spacing(10);
        let host = DocumentHost::build(PAGE.as_bytes(), options, move |anchor| {
            sink.borrow_mut().push(anchor.name().to_string());
        })
        .expect("build host");
        (host, visited)
    }

    #[test]
    fn binds_only_fragment_links() {
        let (host, _) = host_with_sink();
        let hrefs: Vec<&str> = host.link_hrefs().collect();
        assert_eq!(hrefs, vec!["#n1", "#nowhere"]);
        assert!(host.find_link("other.xhtml#n1").is_none());
    }

    #[test]
    fn hover_places_preview_above_link_near_bottom() {
        let (mut host, _) = host_with_sink();
        let link = host.find_link("#n1").expect("link");

        let effect = host.dispatch(link, HostEvent::HoverEnter);
        let EventEffect::Hover(HoverOutcome::Shown(placement)) = effect else {
            panic!("unexpected effect {effect:?}");
        };
        // preview height 90 + 10; top = -(100 + 2 * 10)
        assert_eq!(placement.pos, PhysicalPos::new(100, -120));
        assert_eq!(placement.side, PreviewSide::Above);
        assert_eq!(host.last_placement(link), Some(placement));

        let container = *host.controller(link).expect("controller").container();
        assert_eq!(host.dom().parent(container), Some(link));
        assert_eq!(host.dom().style(container, "top"), Some("-120px"));
    }

    #[test]
    fn hover_exit_detaches_container() {
        let (mut host, _) = host_with_sink();
        let link = host.find_link("#n1").expect("link");
        host.dispatch(link, HostEvent::HoverEnter);

        assert_eq!(host.dispatch(link, HostEvent::HoverExit), EventEffect::Hidden(true));
        assert_eq!(host.dispatch(link, HostEvent::HoverExit), EventEffect::Hidden(false));
        let controller = host.controller(link).expect("controller");
        assert_eq!(controller.state(), OverlayState::Hidden);
        assert_eq!(host.dom().parent(*controller.container()), None);
    }

    #[test]
    fn hover_exit_after_external_detach_does_not_panic() {
        let (mut host, _) = host_with_sink();
        let link = host.find_link("#n1").expect("link");
        host.dispatch(link, HostEvent::HoverEnter);
        let container = *host.controller(link).expect("controller").container();

        host.dom.detach(container);
        assert_eq!(host.dispatch(link, HostEvent::HoverExit), EventEffect::Hidden(true));
        assert_eq!(host.dom().parent(container), None);
        assert!(matches!(
            host.dispatch(link, HostEvent::HoverEnter),
            EventEffect::Hover(HoverOutcome::Shown(_))
        ));
        assert_eq!(host.dom().parent(container), Some(link));
    }

    #[test]
    fn mirror_keeps_text_nodes_in_order() {
        let (host, _) = host_with_sink();
        let aside = (0..host.document().node_count())
            .find(|index| host.document().attribute(*index, "id") == Some("n1"))
            .and_then(|index| host.element(index))
            .expect("aside");
        let fragment = host.dom().to_fragment(aside).expect("fragment");
        assert_eq!(fragment.text_content(), "Footnote");
        assert_eq!(host.dom().child_element_count(&aside), 0);
    }

    #[test]
    fn unresolved_link_neither_previews_nor_navigates() {
        let (mut host, visited) = host_with_sink();
        let link = host.find_link("#nowhere").expect("link");

        assert_eq!(
            host.dispatch(link, HostEvent::HoverEnter),
            EventEffect::Hover(HoverOutcome::Unresolved)
        );
        assert_eq!(
            host.dispatch(link, HostEvent::Click),
            EventEffect::Click(ClickOutcome::Unresolved)
        );
        assert!(visited.borrow().is_empty());
    }

    #[test]
    fn click_hides_and_navigates() {
        let (mut host, visited) = host_with_sink();
        let link = host.find_link("#n1").expect("link");
        host.dispatch(link, HostEvent::HoverEnter);

        assert_eq!(
            host.dispatch(link, HostEvent::Click),
            EventEffect::Click(ClickOutcome::Navigated)
        );
        assert_eq!(visited.borrow().as_slice(), ["n1".to_string()]);
        assert!(!host.controller(link).expect("controller").is_showing());
    }

    #[test]
    fn page_change_hides_visible_previews() {
        let (mut host, _) = host_with_sink();
        let link = host.find_link("#n1").expect("link");
        host.dispatch(link, HostEvent::HoverEnter);

        assert_eq!(host.set_page(3), 1);
        assert_eq!(host.current_page(), 3);
        assert_eq!(host.set_page(4), 0);
    }

    #[test]
    fn events_on_plain_elements_are_ignored() {
        let (mut host, _) = host_with_sink();
        let body = host.element(host.document().body_index()).expect("body");
        assert_eq!(host.dispatch(body, HostEvent::HoverEnter), EventEffect::NoController);
    }

    #[test]
    fn negative_spacing_is_rejected() {
        let options = PreviewOptions {
            spacing_px: -4,
            ..PreviewOptions::default()
        };
        let result = DocumentHost::build(PAGE.as_bytes(), options, |_| {});
        assert!(matches!(result, Err(DocumentError::Options(_))));
    }
}
