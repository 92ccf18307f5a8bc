//! Injectable logging
//!
//! Components take an `Arc<dyn Logger>` at construction; nothing in the
//! crate consults global debug flags.

mod traits;
mod noop;
mod console;
mod memory;

pub use traits::{Logger, SharedLogger};
pub use noop::NoOpLogger;
pub use console::ConsoleLogger;
pub use memory::MemoryLogger;
