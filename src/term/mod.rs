//! Terminal handle abstraction.
//!
//! - **screen**: cell grid used as a shadow of what is displayed
//! - **memory**: headless terminal with observable modes
//! - **console**: real terminal driven through crossterm
//!
//! A `Session` drives any `Terminal` through the same ordered acquisition
//! steps, so backends are interchangeable.

pub mod console;
pub mod memory;
pub mod screen;

use std::fmt;
use std::io;

use thiserror::Error;

use crate::attr::Attr;

pub use console::CrosstermTerminal;
pub use memory::MemoryTerminal;
pub use screen::ScreenBuffer;

/// One step of terminal mode acquisition or release
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TerminalStep {
    Init,
    Color,
    Echo,
    CharacterBreak,
    Keypad,
    Teardown,
}

impl fmt::Display for TerminalStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TerminalStep::Init => "initialize screen",
            TerminalStep::Color => "color mode",
            TerminalStep::Echo => "echo mode",
            TerminalStep::CharacterBreak => "character break mode",
            TerminalStep::Keypad => "keypad mode",
            TerminalStep::Teardown => "shut down screen",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum TerminalError {
    #[error("Terminal is already in use by another session")]
    AlreadyActive,

    #[error("Terminal is not initialized")]
    NotInitialized,

    #[error("Terminal does not support color")]
    NoColor,

    #[error("Injected failure in {0}")]
    Injected(TerminalStep),

    #[error("Terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, TerminalError>;

/// Raw terminal device.
///
/// Coordinates are zero-based columns (`x`) and rows (`y`).
pub trait Terminal {
    /// Acquire the screen
    fn init(&mut self) -> Result<()>;

    /// Release the screen and restore the original terminal state
    fn teardown(&mut self) -> Result<()>;

    fn enable_color(&mut self) -> Result<()>;

    fn set_echo(&mut self, enabled: bool) -> Result<()>;

    /// Deliver input without line buffering
    fn set_character_break(&mut self, enabled: bool) -> Result<()>;

    /// Decode special keys into single key codes
    fn set_keypad(&mut self, enabled: bool) -> Result<()>;

    /// Read up to `length` columns starting at (`x`, `y`), stopping at the right edge
    fn read_string(&self, x: u16, y: u16, length: usize) -> Result<String>;

    /// Overwrite cells starting at (`x`, `y`); text past the right edge is dropped
    fn write_string(&mut self, x: u16, y: u16, text: &str, attrs: Attr) -> Result<()>;

    fn refresh(&mut self) -> Result<()>;

    /// (columns, rows)
    fn size(&self) -> (u16, u16);
}

impl<T: Terminal + ?Sized> Terminal for Box<T> {
    fn init(&mut self) -> Result<()> {
        (**self).init()
    }

    fn teardown(&mut self) -> Result<()> {
        (**self).teardown()
    }

    fn enable_color(&mut self) -> Result<()> {
        (**self).enable_color()
    }

    fn set_echo(&mut self, enabled: bool) -> Result<()> {
        (**self).set_echo(enabled)
    }

    fn set_character_break(&mut self, enabled: bool) -> Result<()> {
        (**self).set_character_break(enabled)
    }

    fn set_keypad(&mut self, enabled: bool) -> Result<()> {
        (**self).set_keypad(enabled)
    }

    fn read_string(&self, x: u16, y: u16, length: usize) -> Result<String> {
        (**self).read_string(x, y, length)
    }

    fn write_string(&mut self, x: u16, y: u16, text: &str, attrs: Attr) -> Result<()> {
        (**self).write_string(x, y, text, attrs)
    }

    fn refresh(&mut self) -> Result<()> {
        (**self).refresh()
    }

    fn size(&self) -> (u16, u16) {
        (**self).size()
    }
}
