use anyhow::{Context, Result};
use mime_guess::MimeGuess;
use std::path::Path;

use crate::http::resource::Resource;

pub const DEFAULT_MIME: &str = "application/octet-stream";

/// Reads a file into a [`Resource`], with its MIME type and modification time.
pub async fn load_file(path: &Path) -> Result<Resource> {
    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;

    let last_modified = tokio::fs::metadata(path)
        .await
        .and_then(|meta| meta.modified())
        .with_context(|| format!("reading modification time of {}", path.display()))?;

    Ok(Resource::new(content, mime_for(path), last_modified))
}

pub fn mime_for<P: AsRef<Path>>(path: P) -> String {
    MimeGuess::from_path(path)
        .first()
        .map_or_else(|| DEFAULT_MIME.to_string(), |m| m.to_string())
}
