use anchor_preview::PreviewError;
use std::fmt;

/// Errors raised while loading a page or its preview options.
#[derive(Debug)]
pub enum DocumentError {
    /// Malformed XHTML.
    Xml(quick_xml::Error),
    /// A geometry or page attribute did not hold an integer.
    InvalidAttribute { name: String, value: String },
    /// The page has no `<body>` element.
    MissingBody,
    /// The page exceeded configured load limits.
    LimitExceeded {
        kind: &'static str,
        actual: usize,
        limit: usize,
    },
    /// Preview options or writing mode failed validation.
    Options(PreviewError),
    /// JSON encode/decode failure.
    Json(serde_json::Error),
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xml(err) => write!(f, "xhtml parse failed: {}", err),
            Self::InvalidAttribute { name, value } => {
                write!(f, "invalid {} attribute value: {:?}", name, value)
            }
            Self::MissingBody => write!(f, "document has no body element"),
            Self::LimitExceeded {
                kind,
                actual,
                limit,
            } => write!(
                f,
                "document limit exceeded: {} (actual={} limit={})",
                kind, actual, limit
            ),
            Self::Options(err) => write!(f, "invalid preview options: {}", err),
            Self::Json(err) => write!(f, "json error: {}", err),
        }
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Xml(err) => Some(err),
            Self::Options(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::InvalidAttribute { .. } | Self::MissingBody | Self::LimitExceeded { .. } => None,
        }
    }
}

impl From<quick_xml::Error> for DocumentError {
    fn from(value: quick_xml::Error) -> Self {
        Self::Xml(value)
    }
}

impl From<PreviewError> for DocumentError {
    fn from(value: PreviewError) -> Self {
        Self::Options(value)
    }
}

impl From<serde_json::Error> for DocumentError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
