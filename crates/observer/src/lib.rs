pub mod config;
pub mod diff;
pub mod error;
pub mod observer;

pub use config::{ImageCallback, ObserverConfig, TextCallback};
pub use error::ObserverError;
pub use observer::ClipboardObserver;
