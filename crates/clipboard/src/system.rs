use crate::{ClipboardImage, ClipboardSource};
use anyhow::{anyhow, Result};
use arboard::Clipboard;

/// The desktop clipboard, read through arboard.
///
/// A fresh arboard handle is opened for every read so that no clipboard
/// ownership is held between polls.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }

    fn open() -> Result<Clipboard> {
        Clipboard::new().map_err(|e| anyhow!("Failed to init clipboard: {}", e))
    }
}

impl ClipboardSource for SystemClipboard {
    fn read_text(&self) -> Result<String> {
        match Self::open()?.get_text() {
            Ok(text) => Ok(text),
            Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
            Err(e) => Err(anyhow!("Failed to get text: {}", e)),
        }
    }

    fn read_image(&self) -> Result<ClipboardImage> {
        match Self::open()?.get_image() {
            Ok(image) => {
                log::trace!("Read clipboard image {}x{}", image.width, image.height);
                ClipboardImage::from_rgba(image.width, image.height, image.bytes.into_owned())
            }
            Err(arboard::Error::ContentNotAvailable) => Ok(ClipboardImage::empty()),
            Err(e) => Err(anyhow!("Failed to get image: {}", e)),
        }
    }
}
