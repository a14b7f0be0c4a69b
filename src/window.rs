//! Coordinate-addressed text access to a running terminal

use crate::attr::AttributeMask;
use crate::error::Result;
use crate::term::Terminal;

/// A window over the whole terminal, borrowed from a running `Session`
pub struct Window<'a, T: Terminal> {
    terminal: &'a mut T,
    attributes: AttributeMask,
}

impl<'a, T: Terminal> Window<'a, T> {
    /// Window with NORMAL attributes
    pub fn new(terminal: &'a mut T) -> Self {
        Self {
            terminal,
            attributes: AttributeMask::default(),
        }
    }

    /// Attributes used by `write` when none are given
    pub fn attributes(&self) -> AttributeMask {
        self.attributes
    }

    /// Change the default attributes for later writes
    pub fn set_attributes(&mut self, attributes: AttributeMask) -> &mut Self {
        self.attributes = attributes;
        self
    }

    /// (columns, rows)
    pub fn size(&self) -> (u16, u16) {
        self.terminal.size()
    }

    /// Read up to `length` characters at (`x`, `y`). Empty cells read as
    /// spaces; nothing past the right edge is returned.
    pub fn read(&self, x: u16, y: u16, length: usize) -> Result<String> {
        Ok(self.terminal.read_string(x, y, length)?)
    }

    /// Write at most `length` characters of `value` at (`x`, `y`), then refresh.
    ///
    /// Later writes overwrite earlier ones in place.
    pub fn write(
        &mut self,
        value: &str,
        x: u16,
        y: u16,
        length: Option<usize>,
        attributes: Option<AttributeMask>,
    ) -> Result<&mut Self> {
        let attributes = attributes.unwrap_or(self.attributes);
        let value = match length {
            Some(length) => match value.char_indices().nth(length) {
                Some((end, _)) => &value[..end],
                None => value,
            },
            None => value,
        };

        self.terminal.write_string(x, y, value, attributes.attr())?;
        self.terminal.refresh()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::Attr;
    use crate::error::Error;
    use crate::term::{MemoryTerminal, TerminalError};

    fn terminal() -> MemoryTerminal {
        let mut term = MemoryTerminal::new(40, 5);
        term.init().unwrap();
        term
    }

    #[test]
    fn test_empty_region_reads_spaces() {
        let mut term = terminal();
        let window = Window::new(&mut term);
        assert_eq!(window.read(0, 0, 10).unwrap(), "          ");
    }

    #[test]
    fn test_write_then_read() {
        let mut term = terminal();
        let mut window = Window::new(&mut term);
        window.write("alpha", 0, 0, None, None).unwrap();
        assert_eq!(window.read(0, 0, 10).unwrap(), "alpha     ");
    }

    #[test]
    fn test_overlapping_writes() {
        let mut term = terminal();
        let mut window = Window::new(&mut term);
        window
            .write("alpha", 0, 0, None, None)
            .unwrap()
            .write("bravo", 3, 0, None, None)
            .unwrap();
        assert_eq!(window.read(0, 0, 10).unwrap(), "alpbravo  ");
    }

    #[test]
    fn test_length_truncates() {
        let mut term = terminal();
        let mut window = Window::new(&mut term);
        window.write("charlie", 2, 1, Some(4), None).unwrap();
        assert_eq!(window.read(0, 1, 8).unwrap(), "  char  ");
        window.write("xy", 0, 2, Some(10), None).unwrap();
        assert_eq!(window.read(0, 2, 3).unwrap(), "xy ");
    }

    #[test]
    fn test_attributes_and_refresh() {
        let mut term = terminal();
        {
            let mut window = Window::new(&mut term);
            let mut bold = AttributeMask::new();
            bold.set_bold(true);
            window.set_attributes(bold);
            window.write("a", 0, 0, None, None).unwrap();
            window
                .write("b", 1, 0, None, Some(AttributeMask::from(Attr::UNDERLINE)))
                .unwrap();
        }
        assert_eq!(term.screen().cell(0, 0).unwrap().attrs, Attr::BOLD);
        assert_eq!(term.screen().cell(1, 0).unwrap().attrs, Attr::UNDERLINE);
        assert_eq!(term.refresh_count(), 2);
    }

    #[test]
    fn test_read_past_right_edge_is_clamped() {
        let mut term = MemoryTerminal::new(10, 1);
        term.init().unwrap();
        let mut window = Window::new(&mut term);
        window.write("abc", 5, 0, None, None).unwrap();
        assert_eq!(window.read(5, 0, usize::MAX - 2).unwrap(), "abc  ");
        assert_eq!(window.read(0, 3, 4).unwrap(), "");
    }

    #[test]
    fn test_errors_surface_as_window_errors() {
        let mut term = MemoryTerminal::new(10, 1);
        let window = Window::new(&mut term);
        assert!(matches!(
            window.read(0, 0, 1),
            Err(Error::Window(TerminalError::NotInitialized))
        ));
    }
}
