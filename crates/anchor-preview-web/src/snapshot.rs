//! Serializable view of a host's overlay state.

use anchor_preview::{FlowRoot, OverlayState, PhysicalSize, Placement, WritingMode};
use serde::{Deserialize, Serialize};

use crate::dom::Fragment;
use crate::error::DocumentError;
use crate::host::DocumentHost;

/// Overlay state of every bound link on the page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlaySnapshot {
    pub writing_mode: WritingMode,
    pub body: PhysicalSize,
    pub page_index: usize,
    pub links: Vec<LinkSnapshot>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSnapshot {
    pub href: String,
    pub state: OverlayState,
    /// Present while the preview is showing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,
    /// Attached container subtree, present while the preview is showing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<Fragment>,
}

impl OverlaySnapshot {
    pub fn showing(&self) -> impl Iterator<Item = &LinkSnapshot> {
        self.links.iter().filter(|link| link.state.is_showing())
    }
}

impl DocumentHost {
    /// Capture the current overlay state.
    pub fn snapshot(&self) -> OverlaySnapshot {
        let links = self
            .links
            .iter()
            .map(|bound| {
                let state = bound.controller.state();
                let (placement, preview) = if state.is_showing() {
                    (
                        bound.last_placement,
                        self.dom.to_fragment(*bound.controller.container()),
                    )
                } else {
                    (None, None)
                };
                LinkSnapshot {
                    href: bound.href.clone(),
                    state,
                    placement,
                    preview,
                }
            })
            .collect();
        OverlaySnapshot {
            writing_mode: self.document.writing_mode(),
            body: self.document.body_size(),
            page_index: self.page_index,
            links,
        }
    }

    /// [`snapshot`](Self::snapshot) as pretty-printed JSON.
    pub fn snapshot_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }
}
