use crate::config::{ImageCallback, ObserverConfig, TextCallback};
use crate::diff;
use crate::error::ObserverError;
use clipwatch_clipboard::{ClipboardImage, ClipboardSource};
use clipwatch_core::validate_interval;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

#[derive(Debug, Default)]
struct LastKnown {
    text: Option<String>,
    image: Option<ClipboardImage>,
}

struct Shared {
    source: Arc<dyn ClipboardSource>,
    config: Mutex<ObserverConfig>,
    last_known: Mutex<LastKnown>,
}

/// Polls a [`ClipboardSource`] on a fixed interval and reports text and
/// image changes to the configured callbacks.
///
/// Each tick reads only the formats that have a callback, text first and
/// image second. A change is delivered as `(new, previous)` exactly once,
/// after which `new` becomes the baseline for the next tick. Failed reads
/// count as "no change" and are retried on the next tick.
///
/// Callbacks run synchronously on the timer task; a slow callback delays
/// the next tick and overdue ticks are skipped rather than queued.
pub struct ClipboardObserver {
    shared: Arc<Shared>,
    runtime: Handle,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl ClipboardObserver {
    /// Builds an observer on the current tokio runtime. Polling starts right
    /// away if at least one callback is configured.
    pub fn new<S>(source: S, config: ObserverConfig) -> Result<Self, ObserverError>
    where
        S: ClipboardSource + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| ObserverError::NoRuntime)?;
        Self::with_runtime(runtime, source, config)
    }

    pub fn with_runtime<S>(
        runtime: Handle,
        source: S,
        config: ObserverConfig,
    ) -> Result<Self, ObserverError>
    where
        S: ClipboardSource + 'static,
    {
        validate_interval(config.interval)?;
        let observer = Self {
            shared: Arc::new(Shared {
                source: Arc::new(source),
                config: Mutex::new(config),
                last_known: Mutex::new(LastKnown::default()),
            }),
            runtime,
            timer: Mutex::new(None),
        };
        observer.start();
        Ok(observer)
    }

    /// Seeds the last known values from a live read and (re)schedules the
    /// timer. Calling it while running replaces the timer, never adds one.
    pub fn start(&self) {
        let config = self.shared.config().clone();
        if !config.has_callbacks() {
            debug!("No clipboard callbacks configured, observer stays dormant");
            return;
        }

        self.shared.seed(
            config.on_text_change.is_some(),
            config.on_image_change.is_some(),
        );

        let mut timer = lock(&self.timer);
        if let Some(previous) = timer.take() {
            previous.abort();
        }
        *timer = Some(self.runtime.spawn(run_timer(Arc::clone(&self.shared))));
        debug!("Clipboard observer started ({:?} interval)", config.interval);
    }

    /// Cancels the timer. Last known values are kept; the next `start`
    /// re-seeds them anyway.
    ///
    /// Cancellation does not wait for a tick already in progress. On a
    /// multi-thread runtime a callback running on another worker can still
    /// complete after `stop` returns; callers that need a hard barrier must
    /// synchronize with their callbacks themselves. Called from inside a
    /// callback, or on a current-thread runtime, no further tick runs.
    pub fn stop(&self) {
        if let Some(timer) = lock(&self.timer).take() {
            timer.abort();
            debug!("Clipboard observer stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        lock(&self.timer)
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }

    /// Replaces interval and callbacks. The running timer picks them up at
    /// its next tick. Channels enabled by this call are seeded first so
    /// content already on the clipboard is not reported; removing every
    /// callback stops the observer.
    pub fn reconfigure(&self, config: ObserverConfig) -> Result<(), ObserverError> {
        validate_interval(config.interval)?;

        if !config.has_callbacks() {
            self.stop();
            *self.shared.config() = config;
            return Ok(());
        }

        if self.is_running() {
            let previous = self.shared.config().clone();
            self.shared.seed(
                previous.on_text_change.is_none() && config.on_text_change.is_some(),
                previous.on_image_change.is_none() && config.on_image_change.is_some(),
            );
        }
        *self.shared.config() = config;
        Ok(())
    }
}

impl Drop for ClipboardObserver {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Shared {
    fn config(&self) -> MutexGuard<'_, ObserverConfig> {
        lock(&self.config)
    }

    fn last_known(&self) -> MutexGuard<'_, LastKnown> {
        lock(&self.last_known)
    }

    fn interval(&self) -> Duration {
        self.config().interval
    }

    fn seed(&self, text: bool, image: bool) {
        if text {
            match self.source.read_text() {
                Ok(current) => self.last_known().text = Some(current),
                Err(e) => warn!("Failed to seed clipboard text, keeping previous value: {}", e),
            }
        }
        if image {
            match self.source.read_image() {
                Ok(current) => self.last_known().image = Some(current),
                Err(e) => warn!("Failed to seed clipboard image, keeping previous value: {}", e),
            }
        }
    }

    fn tick(&self) {
        let (on_text, on_image) = {
            let config = self.config();
            (config.on_text_change.clone(), config.on_image_change.clone())
        };

        if let Some(callback) = on_text {
            self.check_text(&callback);
        }
        if let Some(callback) = on_image {
            self.check_image(&callback);
        }
    }

    fn check_text(&self, callback: &TextCallback) {
        let current = match self.source.read_text() {
            Ok(text) => text,
            Err(e) => {
                debug!("Clipboard text read failed, retrying next tick: {}", e);
                return;
            }
        };

        // The baseline moves before the callback runs so a panicking
        // callback does not get the same change again.
        let previous = {
            let mut last = self.last_known();
            if !diff::text_changed(last.text.as_deref(), &current) {
                return;
            }
            last.text.replace(current.clone())
        };

        trace!("Clipboard text changed ({} bytes)", current.len());
        deliver("text", || callback(&current, previous.as_deref()));
    }

    fn check_image(&self, callback: &ImageCallback) {
        let current = match self.source.read_image() {
            Ok(image) => image,
            Err(e) => {
                debug!("Clipboard image read failed, retrying next tick: {}", e);
                return;
            }
        };

        let previous = {
            let mut last = self.last_known();
            if !diff::image_changed(last.image.as_ref(), &current) {
                return;
            }
            last.image.replace(current.clone())
        };

        trace!(
            "Clipboard image changed ({}x{})",
            current.width(),
            current.height()
        );
        deliver("image", || callback(&current, previous.as_ref()));
    }
}

const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

async fn run_timer(shared: Arc<Shared>) {
    let mut deadline = Instant::now();
    loop {
        let period = shared.interval();
        deadline = advance(deadline, period);

        let now = Instant::now();
        if deadline <= now {
            let mut skipped = 0u32;
            while deadline <= now {
                deadline = advance(deadline, period);
                skipped += 1;
            }
            debug!("Clipboard tick overran, skipped {} tick(s)", skipped);
        }

        time::sleep_until(deadline).await;
        shared.tick();
    }
}

/// Deadline arithmetic that cannot overflow `Instant`; an unrepresentable
/// deadline becomes a sleep that never realistically ends.
fn advance(deadline: Instant, period: Duration) -> Instant {
    deadline
        .checked_add(period)
        .unwrap_or_else(|| Instant::now() + FAR_FUTURE)
}

fn deliver(kind: &str, callback: impl FnOnce()) {
    if panic::catch_unwind(AssertUnwindSafe(callback)).is_err() {
        warn!("Clipboard {} callback panicked", kind);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
