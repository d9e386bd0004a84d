use bytes::Bytes;
use std::time::SystemTime;

/// Content resolved for a request, ready to be attached to a response.
#[derive(Debug, Clone)]
pub struct Resource {
    pub content: Bytes,
    /// Byte length of `content`.
    pub size: usize,
    /// MIME type, e.g. `text/html`.
    pub content_type: String,
    /// File modification time, or creation time for synthetic content.
    pub last_modified: SystemTime,
}

impl Resource {
    pub fn new(
        content: impl Into<Bytes>,
        content_type: impl Into<String>,
        last_modified: SystemTime,
    ) -> Self {
        let content = content.into();
        Self {
            size: content.len(),
            content,
            content_type: content_type.into(),
            last_modified,
        }
    }

    /// Synthetic content stamped with the current time.
    ///
    /// An empty `content_type` falls back to `text/plain`.
    pub fn from_text(text: impl Into<String>, content_type: &str) -> Self {
        let content_type = if content_type.is_empty() {
            "text/plain"
        } else {
            content_type
        };
        Self::new(text.into(), content_type, SystemTime::now())
    }
}
