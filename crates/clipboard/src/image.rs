use anyhow::{anyhow, Result};
use base64::Engine;
use image::ImageOutputFormat;
use std::fmt;
use std::sync::OnceLock;

const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// An RGBA8 clipboard image.
///
/// Equality between clipboard images is decided by [`comparable_form`](Self::comparable_form),
/// a PNG data URL computed at most once per handle.
#[derive(Clone, Default)]
pub struct ClipboardImage {
    width: usize,
    height: usize,
    bytes: Vec<u8>,
    comparable: OnceLock<Option<String>>,
}

impl ClipboardImage {
    /// The "no image on the clipboard" sentinel.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_rgba(width: usize, height: usize, bytes: Vec<u8>) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|px| px.checked_mul(4))
            .ok_or(anyhow!("Image dimensions overflow: {}x{}", width, height))?;
        if bytes.len() != expected {
            return Err(anyhow!(
                "Invalid image buffer: {}x{} needs {} bytes, got {}",
                width,
                height,
                expected,
                bytes.len()
            ));
        }
        Ok(Self {
            width,
            height,
            bytes,
            comparable: OnceLock::new(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.bytes.is_empty()
    }

    pub fn to_png(&self) -> Result<Vec<u8>> {
        let buffer = image::ImageBuffer::<image::Rgba<u8>, _>::from_raw(
            self.width as u32,
            self.height as u32,
            self.bytes.clone(),
        )
        .ok_or(anyhow!("Invalid image buffer"))?;

        let mut png = Vec::new();
        buffer.write_to(&mut std::io::Cursor::new(&mut png), ImageOutputFormat::Png)?;
        Ok(png)
    }

    /// `data:image/png;base64,...` encoding of the image, or `None` for an
    /// empty image or one that cannot be encoded.
    pub fn comparable_form(&self) -> Option<&str> {
        self.comparable
            .get_or_init(|| {
                if self.is_empty() {
                    return None;
                }
                match self.to_png() {
                    Ok(png) => Some(format!(
                        "{}{}",
                        DATA_URL_PREFIX,
                        base64::engine::general_purpose::STANDARD.encode(png)
                    )),
                    Err(e) => {
                        log::warn!("Failed to encode clipboard image: {}", e);
                        None
                    }
                }
            })
            .as_deref()
    }
}

impl fmt::Debug for ClipboardImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClipboardImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl PartialEq for ClipboardImage {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.bytes == other.bytes
    }
}

impl Eq for ClipboardImage {}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: usize, height: usize, rgba: [u8; 4]) -> ClipboardImage {
        let bytes = rgba.iter().copied().cycle().take(width * height * 4).collect();
        ClipboardImage::from_rgba(width, height, bytes).unwrap()
    }

    #[test]
    fn empty_sentinel_has_no_comparable_form() {
        let image = ClipboardImage::empty();
        assert!(image.is_empty());
        assert_eq!(image.comparable_form(), None);
    }

    #[test]
    fn rejects_mismatched_buffer() {
        assert!(ClipboardImage::from_rgba(2, 2, vec![0; 15]).is_err());
        assert!(ClipboardImage::from_rgba(usize::MAX, 2, vec![]).is_err());
    }

    #[test]
    fn comparable_form_is_png_data_url() {
        let image = solid(3, 2, [255, 0, 0, 255]);
        let form = image.comparable_form().unwrap();
        assert!(form.starts_with("data:image/png;base64,"));

        let png = base64::engine::general_purpose::STANDARD
            .decode(&form[DATA_URL_PREFIX.len()..])
            .unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
        assert_eq!(decoded.into_raw(), image.rgba());
    }

    #[test]
    fn identical_pixels_share_a_comparable_form() {
        let a = solid(4, 4, [1, 2, 3, 255]);
        let b = solid(4, 4, [1, 2, 3, 255]);
        let c = solid(4, 4, [3, 2, 1, 255]);
        assert_eq!(a.comparable_form(), b.comparable_form());
        assert_ne!(a.comparable_form(), c.comparable_form());
    }
}
