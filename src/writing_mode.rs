//! Text-flow orientation.

use alloc::string::ToString;
use core::fmt;
use core::str::FromStr;

use crate::error::PreviewError;

/// Writing mode determines the block and inline flow directions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum WritingMode {
    /// Lines run left to right, blocks stack top to bottom.
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "horizontal"))]
    HorizontalTb,
    /// Lines run top to bottom, blocks stack right to left.
    VerticalRl,
    /// Lines run top to bottom, blocks stack left to right.
    VerticalLr,
}

impl WritingMode {
    pub fn is_text_horizontal(self) -> bool {
        matches!(self, Self::HorizontalTb)
    }

    pub fn is_text_vertical(self) -> bool {
        !self.is_text_horizontal()
    }

    pub fn is_vertical_rl(self) -> bool {
        matches!(self, Self::VerticalRl)
    }

    pub fn is_vertical_lr(self) -> bool {
        matches!(self, Self::VerticalLr)
    }

    /// CSS keyword for this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HorizontalTb => "horizontal-tb",
            Self::VerticalRl => "vertical-rl",
            Self::VerticalLr => "vertical-lr",
        }
    }
}

impl FromStr for WritingMode {
    type Err = PreviewError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "horizontal-tb" | "horizontal" => Ok(Self::HorizontalTb),
            "vertical-rl" => Ok(Self::VerticalRl),
            "vertical-lr" => Ok(Self::VerticalLr),
            _ => Err(PreviewError::InvalidWritingMode(value.to_string())),
        }
    }
}

impl fmt::Display for WritingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
