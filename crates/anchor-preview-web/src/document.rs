//! Pre-laid-out XHTML pages.
//!
//! The page carries the layout engine's output on `data-*` attributes, so a
//! document can be reloaded and previewed without running layout again.
//!
//! | Attribute           | Element | Meaning                                  |
//! |---------------------|---------|------------------------------------------|
//! | `data-writing-mode` | body    | `horizontal-tb`, `vertical-rl`, ...      |
//! | `data-max-measure`  | body    | maximum inline size of the flow          |
//! | `data-max-extent`   | body    | maximum block size of the flow           |
//! | `data-measure`      | any     | box inline size                          |
//! | `data-extent`       | any     | box block size                           |
//! | `data-start`        | any     | inline offset                            |
//! | `data-before`       | any     | block offset from the block-start edge   |
//! | `data-page`         | any     | 0-based page holding the box             |
//! | `data-pending`      | any     | box not laid out yet (anchor w/o target) |
//!
//! Every element with an `id` registers an anchor of that name.
//!
//! Character data becomes [`TEXT_TAG`] nodes in document order. Whitespace
//! runs collapse to one space and are trimmed at element boundaries only,
//! so `See <b>this</b> now` keeps both spaces. Numeric and predefined XML
//! entities are resolved; unknown entities stay as written.

use std::cell::Cell;
use std::collections::BTreeMap;

use anchor_preview::{
    anchor_link_pos, Anchor, AnchorRegistry, FlowRoot, LayoutNode, LogicalOffset, LogicalSize,
    NodeGeometry, WritingMode,
};
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::dom::{Fragment, TEXT_TAG};
use crate::error::DocumentError;

/// Limits applied while loading a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DocumentLimits {
    /// Maximum number of nodes, text nodes included.
    pub max_nodes: usize,
    /// Maximum element nesting depth.
    pub max_depth: usize,
}

impl Default for DocumentLimits {
    fn default() -> Self {
        Self {
            max_nodes: 64 * 1024,
            max_depth: 256,
        }
    }
}

/// A laid-out element of a [`StaticDocument`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoxNode {
    index: usize,
    geometry: NodeGeometry,
}

impl BoxNode {
    /// Index of the source element inside its document.
    pub fn source_index(&self) -> usize {
        self.index
    }
}

impl LayoutNode for BoxNode {
    fn measure(&self) -> i32 {
        self.geometry.size.measure
    }

    fn extent(&self) -> i32 {
        self.geometry.size.extent
    }

    fn offset(&self) -> LogicalOffset {
        self.geometry.offset
    }

    fn writing_mode(&self) -> WritingMode {
        self.geometry.writing_mode
    }

    fn geometry(&self) -> NodeGeometry {
        self.geometry
    }
}

#[derive(Clone, Debug, Default)]
struct SourceNode {
    tag: String,
    attrs: BTreeMap<String, String>,
    text: Option<String>,
    children: Vec<usize>,
    size: LogicalSize,
    offset: LogicalOffset,
    page: Option<usize>,
    pending: bool,
}

impl SourceNode {
    fn text_node(text: &str) -> Self {
        Self {
            tag: TEXT_TAG.to_string(),
            text: Some(text.to_string()),
            ..Self::default()
        }
    }

    fn is_text(&self) -> bool {
        self.tag == TEXT_TAG
    }
}

/// A page whose layout is already known.
pub struct StaticDocument {
    nodes: Vec<SourceNode>,
    body: usize,
    writing_mode: WritingMode,
    max_measure: i32,
    max_extent: i32,
    anchors: AnchorRegistry<BoxNode, Fragment>,
    evaluations: Cell<usize>,
}

impl StaticDocument {
    /// Load a page with default limits.
    pub fn parse(xhtml: &[u8]) -> Result<Self, DocumentError> {
        Self::parse_with_limits(xhtml, DocumentLimits::default())
    }

    /// Load a page with explicit limits.
    pub fn parse_with_limits(xhtml: &[u8], limits: DocumentLimits) -> Result<Self, DocumentError> {
        let nodes = read_nodes(xhtml, limits)?;
        let body = nodes
            .iter()
            .position(|node| node.tag == "body")
            .ok_or(DocumentError::MissingBody)?;
        let body_node = &nodes[body];
        let writing_mode = match body_node.attrs.get("data-writing-mode") {
            Some(value) => value.parse::<WritingMode>()?,
            None => WritingMode::default(),
        };
        let max_measure = match body_node.attrs.get("data-max-measure") {
            Some(value) => parse_px("data-max-measure", value)?,
            None => body_node.size.measure,
        };
        let max_extent = match body_node.attrs.get("data-max-extent") {
            Some(value) => parse_px("data-max-extent", value)?,
            None => body_node.size.extent,
        };

        let mut document = Self {
            nodes,
            body,
            writing_mode,
            max_measure,
            max_extent,
            anchors: AnchorRegistry::new(),
            evaluations: Cell::new(0),
        };
        document.register_anchors();
        log::debug!(
            "loaded page: {} nodes, {} anchors, mode={}",
            document.nodes.len(),
            document.anchors.len(),
            document.writing_mode
        );
        Ok(document)
    }

    fn register_anchors(&mut self) {
        for index in 0..self.nodes.len() {
            let Some(node) = self.nodes.get(index) else {
                continue;
            };
            let Some(id) = node.attrs.get("id") else {
                continue;
            };
            if self.anchors.contains(id) {
                log::warn!("duplicate anchor id {:?}; keeping the first", id);
                continue;
            }
            let mut anchor = Anchor::new(id.as_str());
            if !node.pending {
                if let Some(target) = self.box_node(index) {
                    anchor = anchor.with_target(target);
                }
            }
            if let Some(page) = node.page {
                anchor = anchor.with_page_index(page);
            }
            self.anchors.insert(anchor);
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Source index of the `<body>` element.
    pub fn body_index(&self) -> usize {
        self.body
    }

    pub fn tag(&self, index: usize) -> Option<&str> {
        self.nodes.get(index).map(|node| node.tag.as_str())
    }

    pub fn attribute(&self, index: usize, name: &str) -> Option<&str> {
        self.nodes.get(index)?.attrs.get(name).map(String::as_str)
    }

    pub fn attributes(&self, index: usize) -> impl Iterator<Item = (&str, &str)> {
        self.nodes
            .get(index)
            .into_iter()
            .flat_map(|node| node.attrs.iter())
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn is_text(&self, index: usize) -> bool {
        self.nodes.get(index).is_some_and(SourceNode::is_text)
    }

    /// Character data of the text node at `index`.
    pub fn text(&self, index: usize) -> Option<&str> {
        self.nodes.get(index)?.text.as_deref()
    }

    pub fn children(&self, index: usize) -> &[usize] {
        match self.nodes.get(index) {
            Some(node) => node.children.as_slice(),
            None => &[],
        }
    }

    /// Layout box of the element at `index`.
    pub fn box_node(&self, index: usize) -> Option<BoxNode> {
        let node = self.nodes.get(index)?;
        Some(BoxNode {
            index,
            geometry: NodeGeometry::new(node.size, node.offset, self.writing_mode),
        })
    }

    /// How many times a box was evaluated into a [`Fragment`].
    pub fn evaluation_count(&self) -> usize {
        self.evaluations.get()
    }

    /// Forget rendered anchor targets, e.g. after the page was re-laid out.
    pub fn reset_rendered(&mut self) {
        self.anchors.reset_rendered();
    }

    fn fragment_at(&self, index: usize) -> Fragment {
        let Some(node) = self.nodes.get(index) else {
            return Fragment::default();
        };
        Fragment {
            tag: node.tag.clone(),
            attrs: node.attrs.clone(),
            style: BTreeMap::new(),
            text: node.text.clone(),
            children: node
                .children
                .iter()
                .map(|child| self.fragment_at(*child))
                .collect(),
        }
    }
}

impl FlowRoot for StaticDocument {
    type Node = BoxNode;
    type Rendered = Fragment;

    fn max_measure(&self) -> i32 {
        self.max_measure
    }

    fn max_extent(&self) -> i32 {
        self.max_extent
    }

    fn writing_mode(&self) -> WritingMode {
        self.writing_mode
    }

    fn anchors(&self) -> &AnchorRegistry<BoxNode, Fragment> {
        &self.anchors
    }

    /// Render the box's source subtree at its absolute page position.
    fn evaluate(&self, node: &BoxNode) -> Fragment {
        self.evaluations.set(self.evaluations.get() + 1);
        let mut fragment = self.fragment_at(node.index);
        let pos = anchor_link_pos(self.body_size(), &node.geometry);
        let size = node.geometry.physical_size();
        for (property, value) in [
            ("position", "absolute".to_string()),
            ("left", format!("{}px", pos.left)),
            ("top", format!("{}px", pos.top)),
            ("width", format!("{}px", size.width)),
            ("height", format!("{}px", size.height)),
        ] {
            fragment.style.insert(property.to_string(), value);
        }
        fragment
    }
}

fn read_nodes(xhtml: &[u8], limits: DocumentLimits) -> Result<Vec<SourceNode>, DocumentError> {
    let mut reader = Reader::from_reader(xhtml);
    reader.config_mut().trim_text(false);

    let mut nodes: Vec<SourceNode> = Vec::with_capacity(64);
    let mut stack: Vec<usize> = Vec::with_capacity(16);
    let mut buf = Vec::with_capacity(256);

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                if stack.len() >= limits.max_depth {
                    return Err(DocumentError::LimitExceeded {
                        kind: "depth",
                        actual: stack.len() + 1,
                        limit: limits.max_depth,
                    });
                }
                let index = push_node(&reader, &e, &mut nodes, stack.last().copied(), limits)?;
                stack.push(index);
            }
            Event::Empty(e) => {
                push_node(&reader, &e, &mut nodes, stack.last().copied(), limits)?;
            }
            Event::End(_) => match stack.pop() {
                Some(index) => trim_trailing_text(&mut nodes, index),
                None => log::warn!("unbalanced end tag ignored"),
            },
            Event::Text(e) => {
                let text = reader.decoder().decode(&e).unwrap_or_default();
                let run = collapse_whitespace(&text);
                push_text(&mut nodes, stack.last().copied(), &run, limits)?;
            }
            Event::CData(e) => {
                let text = reader.decoder().decode(&e).unwrap_or_default();
                let run = collapse_whitespace(&text);
                push_text(&mut nodes, stack.last().copied(), &run, limits)?;
            }
            Event::GeneralRef(e) => {
                let name = e.decode().unwrap_or_default();
                let resolved = resolve_entity(&name);
                push_text(&mut nodes, stack.last().copied(), &resolved, limits)?;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(nodes)
}

fn push_node(
    reader: &Reader<&[u8]>,
    e: &BytesStart<'_>,
    nodes: &mut Vec<SourceNode>,
    parent: Option<usize>,
    limits: DocumentLimits,
) -> Result<usize, DocumentError> {
    check_node_limit(nodes, limits)?;
    let mut node = SourceNode {
        tag: decode_tag_name(reader, e.name().as_ref()),
        ..SourceNode::default()
    };
    for attr in e.attributes().flatten() {
        let key = match reader.decoder().decode(attr.key.as_ref()) {
            Ok(v) => v.to_ascii_lowercase(),
            Err(_) => continue,
        };
        let value = match reader.decoder().decode(&attr.value) {
            Ok(v) => match unescape(&v) {
                Ok(unescaped) => unescaped.into_owned(),
                Err(_) => v.into_owned(),
            },
            Err(_) => continue,
        };
        match key.as_str() {
            "data-measure" => node.size.measure = parse_px(&key, &value)?,
            "data-extent" => node.size.extent = parse_px(&key, &value)?,
            "data-start" => node.offset.start = parse_px(&key, &value)?,
            "data-before" => node.offset.before = parse_px(&key, &value)?,
            "data-page" => node.page = Some(parse_index(&key, &value)?),
            "data-pending" => node.pending = true,
            _ => {}
        }
        node.attrs.insert(key, value);
    }

    let index = nodes.len();
    nodes.push(node);
    if let Some(parent) = parent.and_then(|parent| nodes.get_mut(parent)) {
        parent.children.push(index);
    }
    Ok(index)
}

fn check_node_limit(nodes: &[SourceNode], limits: DocumentLimits) -> Result<(), DocumentError> {
    if nodes.len() >= limits.max_nodes {
        return Err(DocumentError::LimitExceeded {
            kind: "nodes",
            actual: nodes.len() + 1,
            limit: limits.max_nodes,
        });
    }
    Ok(())
}

/// Append a character run under `parent`, merging into a preceding text
/// node. Leading whitespace of an element's first child is dropped.
fn push_text(
    nodes: &mut Vec<SourceNode>,
    parent: Option<usize>,
    run: &str,
    limits: DocumentLimits,
) -> Result<(), DocumentError> {
    let Some(parent) = parent else {
        return Ok(());
    };
    let Some(siblings) = nodes.get(parent).map(|node| node.children.as_slice()) else {
        return Ok(());
    };
    let previous = siblings.last().copied();
    let first_child = siblings.is_empty();

    if let Some(text) = previous
        .and_then(|index| nodes.get_mut(index))
        .filter(|node| node.is_text())
        .and_then(|node| node.text.as_mut())
    {
        let run = if text.ends_with(' ') {
            run.strip_prefix(' ').unwrap_or(run)
        } else {
            run
        };
        text.push_str(run);
        return Ok(());
    }

    let run = if first_child {
        run.trim_start_matches(' ')
    } else {
        run
    };
    if run.is_empty() {
        return Ok(());
    }
    check_node_limit(nodes, limits)?;
    let index = nodes.len();
    nodes.push(SourceNode::text_node(run));
    if let Some(node) = nodes.get_mut(parent) {
        node.children.push(index);
    }
    Ok(())
}

/// Drop trailing whitespace from the last text child of a closed element.
fn trim_trailing_text(nodes: &mut Vec<SourceNode>, parent: usize) {
    let Some(last) = nodes.get(parent).and_then(|node| node.children.last().copied()) else {
        return;
    };
    let Some(text) = nodes
        .get_mut(last)
        .filter(|node| node.is_text())
        .and_then(|node| node.text.as_mut())
    else {
        return;
    };
    let kept = text.trim_end_matches(' ').len();
    text.truncate(kept);
    // a text child closing its parent is always the newest node
    if kept == 0 && last + 1 == nodes.len() {
        nodes.pop();
        if let Some(node) = nodes.get_mut(parent) {
            node.children.pop();
        }
    }
}

/// Collapse each XML whitespace run to a single space.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if matches!(ch, ' ' | '\t' | '\n' | '\r') {
            if !in_space {
                out.push(' ');
                in_space = true;
            }
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

/// Resolve `&name;`, keeping unknown entities verbatim.
fn resolve_entity(name: &str) -> String {
    let escaped = format!("&{};", name);
    match unescape(&escaped) {
        Ok(resolved) => resolved.into_owned(),
        Err(err) => {
            log::warn!("unresolved entity {}: {:?}", escaped, err);
            escaped
        }
    }
}

fn decode_tag_name(reader: &Reader<&[u8]>, raw: &[u8]) -> String {
    let decoded = reader
        .decoder()
        .decode(raw)
        .unwrap_or_else(|_| String::from_utf8_lossy(raw));
    let local_name = decoded.rsplit(':').next().unwrap_or(&*decoded);
    local_name.to_ascii_lowercase()
}

fn parse_px(name: &str, value: &str) -> Result<i32, DocumentError> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed);
    number
        .trim()
        .parse::<i32>()
        .map_err(|_| invalid_attribute(name, value))
}

fn parse_index(name: &str, value: &str) -> Result<usize, DocumentError> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| invalid_attribute(name, value))
}

fn invalid_attribute(name: &str, value: &str) -> DocumentError {
    DocumentError::InvalidAttribute {
        name: name.to_string(),
        value: value.to_string(),
    }
}
