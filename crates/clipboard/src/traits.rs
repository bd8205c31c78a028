use crate::ClipboardImage;
use anyhow::Result;
use std::sync::Arc;

/// Pull-based read access to the host clipboard.
///
/// An absent value is not an error: `read_text` returns an empty string and
/// `read_image` returns [`ClipboardImage::empty`]. `Err` is a transient read
/// failure (clipboard locked by another process, backend unavailable, ...).
pub trait ClipboardSource: Send + Sync {
    fn read_text(&self) -> Result<String>;
    fn read_image(&self) -> Result<ClipboardImage>;
}

impl<T: ClipboardSource + ?Sized> ClipboardSource for Arc<T> {
    fn read_text(&self) -> Result<String> {
        (**self).read_text()
    }

    fn read_image(&self) -> Result<ClipboardImage> {
        (**self).read_image()
    }
}
