//! Headless host for anchor-link previews.
//!
//! Loads a pre-laid-out XHTML page ([`StaticDocument`]), mirrors it into an
//! in-memory element tree ([`MemoryDom`]) and binds a preview controller to
//! every same-document link ([`DocumentHost`]). The host's overlay state can
//! be captured as an [`OverlaySnapshot`] and serialized to JSON.
//!
//! ```rust
//! use anchor_preview::{HoverOutcome, PreviewOptions, PreviewSide};
//! use anchor_preview_web::{DocumentHost, EventEffect, HostEvent};
//!
//! let page = br##"<html><body data-max-measure="800" data-max-extent="600">
//!   <a href="#n1" data-measure="50" data-extent="20" data-start="100" data-before="100">1</a>
//!   <p id="n1" data-measure="190" data-extent="90" data-before="400">Note</p>
//! </body></html>"##;
//!
//! let mut host = DocumentHost::build(page, PreviewOptions::default(), |_| {})?;
//! let link = host.find_link("#n1").expect("bound link");
//! match host.dispatch(link, HostEvent::HoverEnter) {
//!     EventEffect::Hover(HoverOutcome::Shown(placement)) => {
//!         assert_eq!(placement.side, PreviewSide::Below)
//!     }
//!     other => panic!("unexpected {other:?}"),
//! }
//! # Ok::<(), anchor_preview_web::DocumentError>(())
//! ```

#![cfg_attr(
    not(test),
    deny(
        clippy::disallowed_methods,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::panic_in_result_fn,
        clippy::todo,
        clippy::unimplemented
    )
)]

pub mod document;
pub mod dom;
pub mod error;
pub mod host;
pub mod options;
pub mod snapshot;

pub use document::{BoxNode, DocumentLimits, StaticDocument};
pub use dom::{Fragment, MemoryDom, NodeId, TEXT_TAG};
pub use error::DocumentError;
pub use host::{DocumentHost, EventEffect, HostEvent};
pub use options::load_options;
pub use snapshot::{LinkSnapshot, OverlaySnapshot};
