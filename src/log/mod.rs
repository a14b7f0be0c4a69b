//! Leveled, indentable, multi-channel logging.
//!
//! - **level**: ordered `LogLevel`
//! - **entry**: eager or lazy log messages
//! - **channel**: one sink with its own filter, timing and erasable text
//! - **logger**: named channel collection with global indentation
//! - **bridge**: `tracing` layer feeding a shared `Logger`
//!
//! # Output format
//!
//! ```text
//! [ 1.2s (+ 15ms)  INFO]     message
//!  ^cumulative ^delta ^level ^indent
//! ```

pub mod bridge;
pub mod channel;
pub mod entry;
pub mod level;
pub mod logger;

pub use bridge::{LoggerLayer, SharedLogger};
pub use channel::{LogChannel, Sink};
pub use entry::Entry;
pub use level::LogLevel;
pub use logger::{IndentGuard, Logger, CONSOLE_CHANNEL};
