//! Real terminal driven through crossterm
//!
//! Echo and character-break both map onto crossterm's raw mode: raw mode is
//! on whenever echo is off or character-break is on. Since the terminal
//! cannot be read back, writes are mirrored into a shadow `ScreenBuffer`.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::{self, Attribute, Print, SetAttribute},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::{debug, warn};

use crate::attr::Attr;

use super::screen::ScreenBuffer;
use super::{Result, Terminal, TerminalError};

/// Set while some `CrosstermTerminal` holds the process terminal
static TERMINAL_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Application cursor keys + application keypad (smkx / rmkx)
const KEYPAD_ON: &str = "\x1b[?1h\x1b=";
const KEYPAD_OFF: &str = "\x1b[?1l\x1b>";

/// Fallback when the terminal size cannot be queried
const DEFAULT_SIZE: (u16, u16) = (80, 24);

/// The process terminal on stdout
#[derive(Debug)]
pub struct CrosstermTerminal {
    /// Shadow of what has been written
    screen: ScreenBuffer,
    /// Alternate screen entered and process flag held
    initialized: bool,
    /// Requested echo state
    echo: bool,
    /// Requested character-break state
    character_break: bool,
    /// Whether crossterm raw mode is currently on
    raw: bool,
    /// Keypad sequences sent
    keypad: bool,
}

impl Default for CrosstermTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermTerminal {
    /// Create a handle; nothing touches the terminal until `init`
    pub fn new() -> Self {
        Self {
            screen: ScreenBuffer::new(0, 0),
            initialized: false,
            echo: true,
            character_break: false,
            raw: false,
            keypad: false,
        }
    }

    /// Whether any terminal in this process is currently initialized
    pub fn is_active() -> bool {
        TERMINAL_ACTIVE.load(Ordering::SeqCst)
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(TerminalError::NotInitialized)
        }
    }

    fn sync_raw_mode(&mut self) -> Result<()> {
        let want = !self.echo || self.character_break;
        if want == self.raw {
            return Ok(());
        }
        if want {
            terminal::enable_raw_mode()?;
        } else {
            terminal::disable_raw_mode()?;
        }
        debug!("Raw mode: {}", want);
        self.raw = want;
        Ok(())
    }

    /// Follow terminal resizes in the shadow buffer
    fn sync_size(&mut self) {
        match terminal::size() {
            Ok(size) if size != self.screen.size() => {
                debug!("Terminal resized to {}x{}", size.0, size.1);
                self.screen.resize(size.0, size.1);
            }
            Ok(_) => {}
            Err(e) => debug!("Could not query terminal size: {}", e),
        }
    }

    fn enter_screen(&mut self) -> io::Result<()> {
        let (cols, rows) = terminal::size().unwrap_or_else(|e| {
            warn!("Could not query terminal size: {}", e);
            DEFAULT_SIZE
        });
        self.screen = ScreenBuffer::new(cols, rows);

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Clear(ClearType::All), MoveTo(0, 0), Hide)?;
        debug!("Entered alternate screen ({}x{})", cols, rows);
        Ok(())
    }
}

impl Terminal for CrosstermTerminal {
    fn init(&mut self) -> Result<()> {
        if self.initialized
            || TERMINAL_ACTIVE
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
        {
            return Err(TerminalError::AlreadyActive);
        }

        if let Err(e) = self.enter_screen() {
            TERMINAL_ACTIVE.store(false, Ordering::SeqCst);
            return Err(e.into());
        }
        self.initialized = true;
        Ok(())
    }

    fn teardown(&mut self) -> Result<()> {
        self.ensure_initialized()?;
        self.initialized = false;

        let mut stdout = io::stdout();
        let _ = execute!(stdout, SetAttribute(Attribute::Reset), Show);
        if self.keypad {
            let _ = write!(stdout, "{}", KEYPAD_OFF);
            self.keypad = false;
        }
        let screen = execute!(stdout, LeaveAlternateScreen);

        // Raw mode must go even if leaving the screen failed
        let raw = if self.raw {
            self.raw = false;
            terminal::disable_raw_mode()
        } else {
            Ok(())
        };
        self.echo = true;
        self.character_break = false;
        TERMINAL_ACTIVE.store(false, Ordering::SeqCst);
        debug!("Left alternate screen");

        screen?;
        raw?;
        Ok(())
    }

    fn enable_color(&mut self) -> Result<()> {
        self.ensure_initialized()?;
        let colors = style::available_color_count();
        debug!("Available colors: {}", colors);
        if colors < 8 {
            return Err(TerminalError::NoColor);
        }
        Ok(())
    }

    fn set_echo(&mut self, enabled: bool) -> Result<()> {
        self.ensure_initialized()?;
        let previous = self.echo;
        self.echo = enabled;
        self.sync_raw_mode().map_err(|e| {
            self.echo = previous;
            e
        })
    }

    fn set_character_break(&mut self, enabled: bool) -> Result<()> {
        self.ensure_initialized()?;
        let previous = self.character_break;
        self.character_break = enabled;
        self.sync_raw_mode().map_err(|e| {
            self.character_break = previous;
            e
        })
    }

    fn set_keypad(&mut self, enabled: bool) -> Result<()> {
        self.ensure_initialized()?;
        let mut stdout = io::stdout();
        write!(stdout, "{}", if enabled { KEYPAD_ON } else { KEYPAD_OFF })?;
        stdout.flush()?;
        self.keypad = enabled;
        Ok(())
    }

    fn read_string(&self, x: u16, y: u16, length: usize) -> Result<String> {
        self.ensure_initialized()?;
        Ok(self.screen.get_str(x, y, length))
    }

    fn write_string(&mut self, x: u16, y: u16, text: &str, attrs: Attr) -> Result<()> {
        self.ensure_initialized()?;
        let written = self.screen.put_str(x, y, text, attrs);
        if written == 0 {
            return Ok(());
        }
        let visible = self.screen.get_str(x, y, written as usize);

        let mut stdout = io::stdout();
        queue!(stdout, MoveTo(x, y))?;
        for attribute in attrs.to_crossterm() {
            queue!(stdout, SetAttribute(attribute))?;
        }
        queue!(stdout, Print(visible), SetAttribute(Attribute::Reset))?;
        Ok(())
    }

    /// Flush queued output and pick up any size change
    fn refresh(&mut self) -> Result<()> {
        self.ensure_initialized()?;
        io::stdout().flush()?;
        self.sync_size();
        Ok(())
    }

    fn size(&self) -> (u16, u16) {
        self.screen.size()
    }
}

impl Drop for CrosstermTerminal {
    fn drop(&mut self) {
        if self.initialized {
            let _ = self.teardown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modes_require_init() {
        let mut term = CrosstermTerminal::new();
        assert!(matches!(term.set_keypad(true), Err(TerminalError::NotInitialized)));
        assert!(matches!(term.enable_color(), Err(TerminalError::NotInitialized)));
        assert!(matches!(term.teardown(), Err(TerminalError::NotInitialized)));
        assert!(matches!(term.read_string(0, 0, 3), Err(TerminalError::NotInitialized)));
        assert_eq!(term.size(), (0, 0));
    }
}
