//! termsession - terminal session lifecycle and multi-channel logging
//!
//! termsession owns the lifecycle of a terminal control session (raw mode,
//! echo, keypad) and provides a leveled, indentable logger that fans out to
//! several channels, including erasable status text on the console.
//!
//! # Architecture
//!
//! ```text
//! Session
//! ├── Logger
//! │   └── LogChannel (console / file / any writer)
//! └── Terminal (MemoryTerminal | CrosstermTerminal)
//!     └── Window (coordinate-addressed read/write + AttributeMask)
//! ```
//!
//! # Quick Start
//!
//! ```no_run
//! use termsession::{CrosstermTerminal, Logger, Session};
//!
//! let mut logger = Logger::new();
//! logger.add_file_channel("main", "session.log", Default::default())?;
//!
//! let mut session = Session::with_logger(logger, CrosstermTerminal::new());
//! session.start()?;
//! if let Some(mut window) = session.window() {
//!     window.write("hello", 0, 0, None, None)?;
//! }
//! session.stop();
//! # Ok::<(), termsession::Error>(())
//! ```

pub mod attr;
pub mod config;
pub mod error;
pub mod log;
pub mod session;
pub mod term;
pub mod time;
pub mod window;

pub use attr::{Attr, AttributeMask};
pub use config::LoggerConfig;
pub use error::{Error, Result};
pub use log::{Entry, IndentGuard, LogChannel, LogLevel, Logger, LoggerLayer, Sink};
pub use session::Session;
pub use term::{CrosstermTerminal, MemoryTerminal, Terminal, TerminalError, TerminalStep};
pub use window::Window;
