pub mod image;
pub mod memory;
pub mod system;
pub mod traits;

pub use self::image::ClipboardImage;
pub use memory::MemoryClipboard;
pub use system::SystemClipboard;
pub use traits::*;

pub type DefaultClipboard = SystemClipboard;
