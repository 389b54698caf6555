//! Named anchors and their render cache.

use alloc::collections::BTreeMap;
use alloc::string::String;
use core::cell::OnceCell;

/// A named target location reachable through a fragment link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Anchor<B> {
    name: String,
    target: Option<B>,
    page_index: Option<usize>,
}

impl<B> Anchor<B> {
    /// Anchor whose target box has not been laid out yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: None,
            page_index: None,
        }
    }

    /// Attach the laid-out target box.
    pub fn with_target(mut self, target: B) -> Self {
        self.target = Some(target);
        self
    }

    /// Record the page the target box was placed on.
    pub fn with_page_index(mut self, page_index: usize) -> Self {
        self.page_index = Some(page_index);
        self
    }

    /// Fragment identifier, without the leading `#`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> Option<&B> {
        self.target.as_ref()
    }

    /// 0-based page holding the target, when known.
    pub fn page_index(&self) -> Option<usize> {
        self.page_index
    }
}

struct AnchorSlot<B, R> {
    anchor: Anchor<B>,
    rendered: OnceCell<R>,
}

/// Anchor lookup table owned by the layout engine.
///
/// Each anchor carries a write-once slot for its rendered element. The slot
/// is filled by [`rendered_or_init`](Self::rendered_or_init) the first time a
/// preview needs it and is shared by every link pointing at the anchor.
pub struct AnchorRegistry<B, R> {
    slots: BTreeMap<String, AnchorSlot<B, R>>,
}

impl<B, R> Default for AnchorRegistry<B, R> {
    fn default() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }
}

impl<B, R> AnchorRegistry<B, R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an anchor. Returns the anchor it replaced, if any.
    ///
    /// Replacing an anchor drops its cached render.
    pub fn insert(&mut self, anchor: Anchor<B>) -> Option<Anchor<B>> {
        let name = anchor.name.clone();
        let slot = AnchorSlot {
            anchor,
            rendered: OnceCell::new(),
        };
        self.slots.insert(name, slot).map(|old| old.anchor)
    }

    pub fn get(&self, name: &str) -> Option<&Anchor<B>> {
        self.slots.get(name).map(|slot| &slot.anchor)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate anchors in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Anchor<B>> {
        self.slots.values().map(|slot| &slot.anchor)
    }

    /// Cached render for `name`, if one was produced already.
    pub fn rendered(&self, name: &str) -> Option<&R> {
        self.slots.get(name).and_then(|slot| slot.rendered.get())
    }

    /// Get the rendered element for `name`, producing it with `render` on
    /// first use.
    ///
    /// Returns `None` when the anchor is unknown or has no target box yet;
    /// `render` is not called in that case.
    pub fn rendered_or_init<F>(&self, name: &str, render: F) -> Option<&R>
    where
        F: FnOnce(&B) -> R,
    {
        let slot = self.slots.get(name)?;
        let target = slot.anchor.target.as_ref()?;
        Some(slot.rendered.get_or_init(|| render(target)))
    }

    /// Drop every cached render, e.g. after the page was rebuilt.
    pub fn reset_rendered(&mut self) {
        for slot in self.slots.values_mut() {
            slot.rendered.take();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Anchor, AnchorRegistry};
    use core::cell::Cell;

    #[test]
    fn anchor_builder_records_target_and_page() {
        let anchor = Anchor::new("note-1").with_target(7u32).with_page_index(3);
        assert_eq!(anchor.name(), "note-1");
        assert_eq!(anchor.target(), Some(&7));
        assert_eq!(anchor.page_index(), Some(3));
        assert_eq!(Anchor::<u32>::new("x").target(), None);
    }

    #[test]
    fn rendered_or_init_renders_once() {
        let mut registry: AnchorRegistry<u32, String> = AnchorRegistry::new();
        registry.insert(Anchor::new("a").with_target(5));
        let calls = Cell::new(0usize);

        for _ in 0..4 {
            let rendered = registry.rendered_or_init("a", |target| {
                calls.set(calls.get() + 1);
                format!("box-{target}")
            });
            assert_eq!(rendered.map(String::as_str), Some("box-5"));
        }
        assert_eq!(calls.get(), 1);
        assert_eq!(registry.rendered("a").map(String::as_str), Some("box-5"));
    }

    #[test]
    fn rendered_or_init_skips_unknown_or_unlaid_anchors() {
        let mut registry: AnchorRegistry<u32, u32> = AnchorRegistry::new();
        registry.insert(Anchor::new("pending"));

        assert!(registry.rendered_or_init("missing", |_| unreachable!()).is_none());
        assert!(registry.rendered_or_init("pending", |_| unreachable!()).is_none());
        assert!(registry.rendered("pending").is_none());
    }

    #[test]
    fn reset_rendered_allows_rerender() {
        let mut registry: AnchorRegistry<u32, u32> = AnchorRegistry::new();
        registry.insert(Anchor::new("a").with_target(1));
        assert_eq!(registry.rendered_or_init("a", |t| t + 10), Some(&11));

        registry.reset_rendered();
        assert!(registry.rendered("a").is_none());
        assert_eq!(registry.rendered_or_init("a", |t| t + 20), Some(&21));
    }

    #[test]
    fn insert_replaces_anchor_and_cache() {
        let mut registry: AnchorRegistry<u32, u32> = AnchorRegistry::new();
        assert!(registry.insert(Anchor::new("a").with_target(1)).is_none());
        registry.rendered_or_init("a", |t| *t);

        let old = registry.insert(Anchor::new("a").with_target(2));
        assert_eq!(old.and_then(|a| a.target().copied()), Some(1));
        assert!(registry.rendered("a").is_none());
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("a"));
        assert_eq!(registry.iter().count(), 1);
    }
}
