//! Preview options.

use crate::dom::{ContainerStyle, TargetStyle};
use crate::error::PreviewError;

/// Options carried by the anchor-link rule.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct PreviewOptions {
    /// Gap between link and preview, also used as container padding.
    pub spacing_px: i32,
    pub container: ContainerStyle,
    pub target: TargetStyle,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            spacing_px: Self::DEFAULT_SPACING_PX,
            container: ContainerStyle::default(),
            target: TargetStyle::default(),
        }
    }
}

impl PreviewOptions {
    pub const DEFAULT_SPACING_PX: i32 = 8;

    /// Set the preview spacing.
    ///
    /// Negative values are treated as `0`.
    pub fn with_spacing(mut self, spacing_px: i32) -> Self {
        self.spacing_px = spacing_px.max(0);
        self
    }

    pub fn with_container_style(mut self, container: ContainerStyle) -> Self {
        self.container = container;
        self
    }

    pub fn with_target_style(mut self, target: TargetStyle) -> Self {
        self.target = target;
        self
    }

    /// Check options built without the clamping setters (e.g. deserialized).
    pub fn validate(&self) -> Result<(), PreviewError> {
        if self.spacing_px < 0 {
            return Err(PreviewError::NegativeSpacing(self.spacing_px));
        }
        Ok(())
    }
}
