//! Headless terminal

use std::collections::HashSet;

use crate::attr::Attr;

use super::screen::ScreenBuffer;
use super::{Result, Terminal, TerminalError, TerminalStep};

/// A terminal that lives entirely in memory.
///
/// Mode flags are observable, and any step can be made to fail, which
/// makes it suitable for exercising session lifecycles without a tty.
#[derive(Debug, Clone)]
pub struct MemoryTerminal {
    /// Screen contents
    screen: ScreenBuffer,
    /// Between `init` and `teardown`
    initialized: bool,
    /// Color mode enabled
    color: bool,
    /// Input echo
    echo: bool,
    /// Unbuffered input
    character_break: bool,
    /// Special key decoding
    keypad: bool,
    /// Number of `refresh` calls
    refreshes: usize,
    /// Steps that always fail
    failing: HashSet<TerminalStep>,
}

impl Default for MemoryTerminal {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

impl MemoryTerminal {
    /// Create a terminal of `cols` x `rows`, not yet initialized
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            screen: ScreenBuffer::new(cols, rows),
            initialized: false,
            color: false,
            echo: true,
            character_break: false,
            keypad: false,
            refreshes: 0,
            failing: HashSet::new(),
        }
    }

    /// Make every call for `step` fail, in both directions
    pub fn failing(mut self, step: TerminalStep) -> Self {
        self.failing.insert(step);
        self
    }

    /// Turn failure injection for `step` on or off
    pub fn set_failing(&mut self, step: TerminalStep, failing: bool) {
        if failing {
            self.failing.insert(step);
        } else {
            self.failing.remove(&step);
        }
    }

    /// Whether the screen is acquired
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether color mode is on
    pub fn has_color(&self) -> bool {
        self.color
    }

    /// Whether typed input is echoed
    pub fn is_echo(&self) -> bool {
        self.echo
    }

    /// Whether input is delivered without line buffering
    pub fn is_character_break(&self) -> bool {
        self.character_break
    }

    /// Whether special keys are decoded
    pub fn is_keypad(&self) -> bool {
        self.keypad
    }

    /// Number of refreshes so far
    pub fn refresh_count(&self) -> usize {
        self.refreshes
    }

    /// Get the screen contents
    pub fn screen(&self) -> &ScreenBuffer {
        &self.screen
    }

    /// Simulate a terminal resize. Contents inside the new bounds are kept.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.screen.resize(cols, rows);
    }

    fn check(&self, step: TerminalStep) -> Result<()> {
        if self.failing.contains(&step) {
            return Err(TerminalError::Injected(step));
        }
        if step != TerminalStep::Init && !self.initialized {
            return Err(TerminalError::NotInitialized);
        }
        Ok(())
    }
}

impl Terminal for MemoryTerminal {
    fn init(&mut self) -> Result<()> {
        self.check(TerminalStep::Init)?;
        self.screen.clear();
        self.initialized = true;
        Ok(())
    }

    fn teardown(&mut self) -> Result<()> {
        self.check(TerminalStep::Teardown)?;
        self.initialized = false;
        self.color = false;
        Ok(())
    }

    fn enable_color(&mut self) -> Result<()> {
        self.check(TerminalStep::Color)?;
        self.color = true;
        Ok(())
    }

    fn set_echo(&mut self, enabled: bool) -> Result<()> {
        self.check(TerminalStep::Echo)?;
        self.echo = enabled;
        Ok(())
    }

    fn set_character_break(&mut self, enabled: bool) -> Result<()> {
        self.check(TerminalStep::CharacterBreak)?;
        self.character_break = enabled;
        Ok(())
    }

    fn set_keypad(&mut self, enabled: bool) -> Result<()> {
        self.check(TerminalStep::Keypad)?;
        self.keypad = enabled;
        Ok(())
    }

    fn read_string(&self, x: u16, y: u16, length: usize) -> Result<String> {
        if !self.initialized {
            return Err(TerminalError::NotInitialized);
        }
        Ok(self.screen.get_str(x, y, length))
    }

    fn write_string(&mut self, x: u16, y: u16, text: &str, attrs: Attr) -> Result<()> {
        if !self.initialized {
            return Err(TerminalError::NotInitialized);
        }
        self.screen.put_str(x, y, text, attrs);
        Ok(())
    }

    fn refresh(&mut self) -> Result<()> {
        if !self.initialized {
            return Err(TerminalError::NotInitialized);
        }
        self.refreshes += 1;
        Ok(())
    }

    fn size(&self) -> (u16, u16) {
        self.screen.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modes_require_init() {
        let mut term = MemoryTerminal::default();
        assert!(matches!(term.set_echo(false), Err(TerminalError::NotInitialized)));
        assert!(matches!(term.read_string(0, 0, 1), Err(TerminalError::NotInitialized)));

        term.init().unwrap();
        term.set_echo(false).unwrap();
        term.set_character_break(true).unwrap();
        term.set_keypad(true).unwrap();
        assert!(!term.is_echo());
        assert!(term.is_character_break());
        assert!(term.is_keypad());
    }

    #[test]
    fn test_injected_failure_leaves_state_unchanged() {
        let mut term = MemoryTerminal::default().failing(TerminalStep::Keypad);
        term.init().unwrap();
        assert!(matches!(
            term.set_keypad(true),
            Err(TerminalError::Injected(TerminalStep::Keypad))
        ));
        assert!(!term.is_keypad());

        term.set_failing(TerminalStep::Keypad, false);
        term.set_keypad(true).unwrap();
        assert!(term.is_keypad());
    }

    #[test]
    fn test_resize_keeps_contents_and_clips_reads() {
        let mut term = MemoryTerminal::new(10, 2);
        term.init().unwrap();
        term.write_string(0, 0, "abcdefgh", Attr::empty()).unwrap();

        term.resize(4, 1);
        assert_eq!(term.size(), (4, 1));
        assert_eq!(term.read_string(0, 0, 10).unwrap(), "abcd");
        assert_eq!(term.read_string(0, 1, 4).unwrap(), "");

        term.resize(6, 3);
        assert_eq!(term.read_string(0, 0, 6).unwrap(), "abcd  ");
        term.write_string(0, 2, "new row", Attr::empty()).unwrap();
        assert_eq!(term.read_string(0, 2, 6).unwrap(), "new ro");
    }

    #[test]
    fn test_init_clears_screen() {
        let mut term = MemoryTerminal::new(10, 2);
        term.init().unwrap();
        term.write_string(0, 1, "left over", Attr::empty()).unwrap();
        term.teardown().unwrap();
        term.init().unwrap();
        assert_eq!(term.read_string(0, 1, 9).unwrap(), "         ");
    }
}
