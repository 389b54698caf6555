//! In-memory element tree.
//!
//! Character data lives in text nodes tagged [`TEXT_TAG`], kept in document
//! order among their element siblings.

use anchor_preview::{ContainerStyle, PhysicalPos, PreviewDom, TargetStyle};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// Handle to an element inside a [`MemoryDom`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Tag carried by text nodes.
pub const TEXT_TAG: &str = "#text";

/// Detached, owned node subtree.
///
/// This is what the page evaluator produces for an anchor target and what
/// snapshots report for a visible preview. Only text nodes set `text`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub tag: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Fragment>,
}

impl Fragment {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn text_node(text: impl Into<String>) -> Self {
        Self {
            tag: TEXT_TAG.to_string(),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn is_text(&self) -> bool {
        self.tag == TEXT_TAG
    }

    /// Text of all descendant text nodes, in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if self.is_text() {
            out.push_str(self.text.as_deref().unwrap_or_default());
            return;
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }
}

#[derive(Clone, Debug, Default)]
struct DomNode {
    tag: String,
    attrs: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: Option<String>,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
}

/// Arena-backed element tree with parent links and inline styles.
///
/// Unknown [`NodeId`]s are ignored by setters and yield `None` from getters.
#[derive(Clone, Debug, Default)]
pub struct MemoryDom {
    nodes: Vec<DomNode>,
}

/// Inline-style properties cleared on a preview clone.
const POSITION_PROPERTIES: [&str; 4] = ["left", "top", "right", "bottom"];

impl MemoryDom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes ever created.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(DomNode {
            tag: tag.to_string(),
            ..DomNode::default()
        });
        id
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        let id = self.create_element(TEXT_TAG);
        if let Some(node) = self.node_mut(id) {
            node.text = Some(text.to_string());
        }
        id
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|node| node.tag == TEXT_TAG)
    }

    fn node(&self, id: NodeId) -> Option<&DomNode> {
        self.nodes.get(id.0)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut DomNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|node| node.tag.as_str())
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(node) = self.node_mut(id) {
            node.attrs.insert(name.to_string(), value.to_string());
        }
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)?.attrs.get(name).map(String::as_str)
    }

    /// Set an inline style property, reusing the existing entry when present.
    pub fn set_style(&mut self, id: NodeId, property: &str, value: &str) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        match node.style.get_mut(property) {
            Some(existing) => {
                existing.clear();
                existing.push_str(value);
            }
            None => {
                node.style.insert(property.to_string(), value.to_string());
            }
        }
    }

    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.node(id)?.style.get(property).map(String::as_str)
    }

    pub fn remove_style(&mut self, id: NodeId, property: &str) {
        if let Some(node) = self.node_mut(id) {
            node.style.remove(property);
        }
    }

    /// Character data of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.node(id)?.text.as_deref()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.node(id) {
            Some(node) => node.children.as_slice(),
            None => &[],
        }
    }

    /// Whether `node` is `ancestor` or sits below it.
    pub fn is_inclusive_descendant(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Detach `child` from whatever parent it has.
    pub fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|id| *id != child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = None;
        }
    }

    /// Append `child` under `parent`, moving it out of its previous parent.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        if self.node(parent).is_none() || self.node(child).is_none() || parent == child {
            return;
        }
        self.detach(child);
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
    }

    /// Build a detached node tree from `fragment`.
    pub fn instantiate(&mut self, fragment: &Fragment) -> NodeId {
        let id = self.create_element(&fragment.tag);
        if let Some(node) = self.node_mut(id) {
            node.attrs = fragment.attrs.clone();
            node.style = fragment.style.clone();
            node.text = fragment.text.clone();
        }
        for child in &fragment.children {
            let child_id = self.instantiate(child);
            self.append(id, child_id);
        }
        id
    }

    /// Owned copy of the subtree rooted at `id`.
    pub fn to_fragment(&self, id: NodeId) -> Option<Fragment> {
        let node = self.node(id)?;
        Some(Fragment {
            tag: node.tag.clone(),
            attrs: node.attrs.clone(),
            style: node.style.clone(),
            text: node.text.clone(),
            children: node
                .children
                .iter()
                .filter_map(|child| self.to_fragment(*child))
                .collect(),
        })
    }
}

impl PreviewDom for MemoryDom {
    type Element = NodeId;
    type Rendered = Fragment;

    fn create_preview_container(&mut self, style: &ContainerStyle, padding: i32) -> NodeId {
        let id = self.create_element("div");
        self.set_style(id, "padding", &format!("{}px", padding));
        self.set_style(id, "border", &style.border);
        self.set_style(id, "position", "absolute");
        self.set_style(id, "background", &style.background);
        self.set_style(id, "z-index", &style.z_index.to_string());
        id
    }

    fn clone_preview_target(&mut self, rendered: &Fragment, style: &TargetStyle) -> NodeId {
        let id = self.instantiate(rendered);
        for property in POSITION_PROPERTIES {
            self.remove_style(id, property);
        }
        self.set_style(id, "position", "relative");
        self.set_style(id, "color", &style.color);
        id
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
        self.append(*parent, *child);
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) {
        if self.parent(*child) == Some(*parent) {
            self.detach(*child);
        }
    }

    fn contains(&self, parent: &NodeId, child: &NodeId) -> bool {
        self.is_inclusive_descendant(*parent, *child)
    }

    fn child_element_count(&self, element: &NodeId) -> usize {
        self.children(*element)
            .iter()
            .filter(|child| !self.is_text(**child))
            .count()
    }

    fn set_offset(&mut self, element: &NodeId, pos: PhysicalPos) {
        self.set_style(*element, "left", &format!("{}px", pos.left));
        self.set_style(*element, "top", &format!("{}px", pos.top));
    }
}
