//! Error types for preview configuration and parsing.

use alloc::string::String;
use core::fmt;

/// Errors raised while building preview configuration.
///
/// Runtime lookups (unknown fragment, empty target box) are not errors; they
/// surface as [`HoverOutcome`](crate::HoverOutcome) and
/// [`ClickOutcome`](crate::ClickOutcome) variants instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PreviewError {
    /// Unknown `writing-mode` keyword.
    InvalidWritingMode(String),
    /// Preview spacing must be non-negative.
    NegativeSpacing(i32),
}

impl fmt::Display for PreviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidWritingMode(value) => {
                write!(f, "invalid writing-mode keyword: {:?}", value)
            }
            Self::NegativeSpacing(px) => {
                write!(f, "preview spacing must be non-negative (got {}px)", px)
            }
        }
    }
}

impl core::error::Error for PreviewError {}
