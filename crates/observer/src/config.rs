use clipwatch_clipboard::ClipboardImage;
use clipwatch_core::{ObserverSettings, DEFAULT_INTERVAL_MS};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Called with `(new_text, previous_text)`.
pub type TextCallback = Arc<dyn Fn(&str, Option<&str>) + Send + Sync>;
/// Called with `(new_image, previous_image)`.
pub type ImageCallback = Arc<dyn Fn(&ClipboardImage, Option<&ClipboardImage>) + Send + Sync>;

/// What to poll, how often, and whom to tell.
#[derive(Clone)]
pub struct ObserverConfig {
    pub interval: Duration,
    pub on_text_change: Option<TextCallback>,
    pub on_image_change: Option<ImageCallback>,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            on_text_change: None,
            on_image_change: None,
        }
    }
}

impl ObserverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the interval only; callbacks are attached by the caller
    /// according to `watch_text` / `watch_image`.
    pub fn from_settings(settings: &ObserverSettings) -> Self {
        Self::new().interval_ms(settings.interval_ms)
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval_ms(self, ms: u64) -> Self {
        self.interval(Duration::from_millis(ms))
    }

    pub fn on_text_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str, Option<&str>) + Send + Sync + 'static,
    {
        self.on_text_change = Some(Arc::new(callback));
        self
    }

    pub fn on_image_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ClipboardImage, Option<&ClipboardImage>) + Send + Sync + 'static,
    {
        self.on_image_change = Some(Arc::new(callback));
        self
    }

    pub fn has_callbacks(&self) -> bool {
        self.on_text_change.is_some() || self.on_image_change.is_some()
    }
}

impl fmt::Debug for ObserverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverConfig")
            .field("interval", &self.interval)
            .field("on_text_change", &self.on_text_change.is_some())
            .field("on_image_change", &self.on_image_change.is_some())
            .finish()
    }
}
