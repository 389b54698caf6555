//! Hover previews for intra-document anchor links.
//!
//! Hovering a same-document link (`<a href="#note">`) shows a floating copy
//! of the linked content next to the link. Placement is writing-mode aware
//! (`horizontal-tb`, `vertical-rl`, `vertical-lr`) and picks the side of the
//! link that overflows the page body least. Clicking the link hands the
//! resolved [`Anchor`] to a navigation callback.
//!
//! The crate does not lay out text or build elements itself. It talks to the
//! layout engine through [`FlowRoot`]/[`LayoutNode`] and to the element tree
//! through [`PreviewDom`].
//!
//! # Usage
//!
//! ```rust
//! use anchor_preview::{solve, PhysicalPos, PhysicalSize, WritingMode};
//!
//! let pos = solve(
//!     WritingMode::HorizontalTb,
//!     PhysicalSize::new(800, 600),
//!     PhysicalPos::new(100, 560),
//!     PhysicalSize::new(50, 20),
//!     PhysicalSize::new(200, 100),
//!     10,
//! );
//! // Not enough room below the link: the preview goes above it.
//! assert_eq!(pos, PhysicalPos::new(100, -120));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
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

extern crate alloc;

pub mod anchor;
pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod placement;
pub mod stylesheet;
pub mod writing_mode;

pub use anchor::{Anchor, AnchorRegistry};
pub use config::PreviewOptions;
pub use controller::{ClickOutcome, HoverOutcome, OverlayState, PreviewController};
pub use dom::{ContainerStyle, PreviewDom, TargetStyle};
pub use error::PreviewError;
pub use geometry::{
    anchor_link_pos, body_size, preview_size, AnchorLinkPos, LogicalOffset, LogicalSize,
    NodeGeometry, PhysicalPos, PhysicalSize, PreviewPos,
};
pub use layout::{FlowRoot, LayoutNode};
pub use placement::{place, solve, Placement, PreviewSide};
pub use stylesheet::{
    anchor_name, create, matches_anchor_link, AnchorLink, AnchorPreviewRule, ANCHOR_LINK_SELECTOR,
};
pub use writing_mode::WritingMode;
