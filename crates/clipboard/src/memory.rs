use crate::{ClipboardImage, ClipboardSource};
use anyhow::{anyhow, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Default)]
struct Contents {
    text: String,
    image: ClipboardImage,
}

/// An in-process clipboard with scripted contents and read failures.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Contents>,
    failing_reads: AtomicUsize,
    text_reads: AtomicUsize,
    image_reads: AtomicUsize,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        let clipboard = Self::new();
        clipboard.set_text(text);
        clipboard
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.lock().text = text.into();
    }

    pub fn set_image(&self, image: ClipboardImage) {
        self.lock().image = image;
    }

    pub fn clear_image(&self) {
        self.lock().image = ClipboardImage::empty();
    }

    /// Makes the next `count` reads fail, whichever format they ask for.
    pub fn fail_reads(&self, count: usize) {
        self.failing_reads.store(count, Ordering::SeqCst);
    }

    /// Number of `read_text` calls so far, failed ones included.
    pub fn text_reads(&self) -> usize {
        self.text_reads.load(Ordering::SeqCst)
    }

    pub fn image_reads(&self) -> usize {
        self.image_reads.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Contents> {
        self.contents.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_failure(&self) -> Result<()> {
        let failed = self
            .failing_reads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(anyhow!("Clipboard is locked"));
        }
        Ok(())
    }
}

impl ClipboardSource for MemoryClipboard {
    fn read_text(&self) -> Result<String> {
        self.text_reads.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self.lock().text.clone())
    }

    fn read_image(&self) -> Result<ClipboardImage> {
        self.image_reads.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self.lock().image.clone())
    }
}
