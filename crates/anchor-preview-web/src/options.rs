//! Preview options from JSON.

use anchor_preview::PreviewOptions;

use crate::error::DocumentError;

/// Decode and validate preview options.
///
/// Missing fields take their defaults, so `{}` yields
/// [`PreviewOptions::default`].
pub fn load_options(json: &str) -> Result<PreviewOptions, DocumentError> {
    let options: PreviewOptions = serde_json::from_str(json)?;
    options.validate()?;
    Ok(options)
}
