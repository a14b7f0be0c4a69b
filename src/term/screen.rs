//! Cell grid holding what is displayed on screen

use unicode_width::UnicodeWidthChar;

use crate::attr::Attr;

/// A single cell
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    /// Character plus any combining marks; empty for a blank cell
    pub grapheme: String,
    /// Display width; 0 marks the right half of a wide character
    pub width: u8,
    /// Display attributes
    pub attrs: Attr,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            grapheme: String::new(),
            width: 1,
            attrs: Attr::empty(),
        }
    }
}

impl Cell {
    /// Reset to a blank cell
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Right half of a wide character
    pub fn continuation(attrs: Attr) -> Self {
        Self {
            grapheme: String::new(),
            width: 0,
            attrs,
        }
    }

    pub fn is_continuation(&self) -> bool {
        self.width == 0
    }

    /// Get the display character (space if empty)
    pub fn display_char(&self) -> &str {
        if self.grapheme.is_empty() {
            " "
        } else {
            &self.grapheme
        }
    }
}

/// Screen contents, row-major
#[derive(Clone, Debug)]
pub struct ScreenBuffer {
    /// Width in columns
    cols: u16,
    /// Cell rows, each `cols` wide
    rows: Vec<Vec<Cell>>,
}

impl ScreenBuffer {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows: vec![vec![Cell::default(); cols as usize]; rows as usize],
        }
    }

    /// (columns, rows)
    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows.len() as u16)
    }

    /// Change dimensions, keeping cells that still fit
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows.resize(rows as usize, Vec::new());
        for row in &mut self.rows {
            row.resize(cols as usize, Cell::default());
        }
    }

    pub fn clear(&mut self) {
        for cell in self.rows.iter_mut().flatten() {
            cell.clear();
        }
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        self.rows.get(y as usize)?.get(x as usize)
    }

    /// Overwrite cells in place starting at (`x`, `y`).
    ///
    /// Returns the number of columns written. Nothing wraps to the next row.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, attrs: Attr) -> u16 {
        let cols = self.cols as usize;
        let Some(row) = self.rows.get_mut(y as usize) else {
            return 0;
        };

        let mut col = x as usize;
        for ch in text.chars() {
            let width = ch.width().unwrap_or(0);
            if width == 0 {
                // Combining character - append to previous cell
                if col > 0 && col <= cols {
                    row[col - 1].grapheme.push(ch);
                }
                continue;
            }
            if col + width > cols {
                break;
            }

            // Overwriting half of a wide character blanks the other half
            if row[col].is_continuation() && col > 0 {
                row[col - 1].clear();
            }
            if col + width < cols && row[col + width].is_continuation() {
                row[col + width].clear();
            }

            row[col] = Cell {
                grapheme: ch.to_string(),
                width: width as u8,
                attrs,
            };
            if width == 2 {
                row[col + 1] = Cell::continuation(attrs);
            }
            col += width;
        }
        (col - x as usize) as u16
    }

    /// Read up to `length` columns starting at (`x`, `y`).
    ///
    /// Empty cells read as spaces. The read stops at the right edge, and a
    /// row outside the screen reads as empty.
    pub fn get_str(&self, x: u16, y: u16, length: usize) -> String {
        let Some(row) = self.rows.get(y as usize) else {
            return String::new();
        };

        let start = (x as usize).min(row.len());
        let end = (x as usize).saturating_add(length).min(row.len());
        let mut text = String::with_capacity(end - start);
        for cell in &row[start..end] {
            if !cell.is_continuation() {
                text.push_str(cell.display_char());
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read_pads() {
        let mut screen = ScreenBuffer::new(20, 3);
        screen.put_str(0, 0, "alpha", Attr::empty());
        assert_eq!(screen.get_str(0, 0, 10), "alpha     ");
    }

    #[test]
    fn test_overlapping_writes_overwrite_in_place() {
        let mut screen = ScreenBuffer::new(20, 3);
        screen.put_str(0, 0, "alpha", Attr::empty());
        screen.put_str(3, 0, "bravo", Attr::empty());
        assert_eq!(screen.get_str(0, 0, 10), "alpbravo  ");
    }

    #[test]
    fn test_clips_at_right_edge() {
        let mut screen = ScreenBuffer::new(6, 1);
        assert_eq!(screen.put_str(3, 0, "overflow", Attr::BOLD), 3);
        assert_eq!(screen.get_str(0, 0, 6), "   ove");
        assert_eq!(screen.cell(3, 0).unwrap().attrs, Attr::BOLD);
        // Reading stops at the right edge
        assert_eq!(screen.get_str(4, 0, 5), "ve");
        assert_eq!(screen.get_str(9, 0, 2), "");
    }

    #[test]
    fn test_out_of_range_row() {
        let mut screen = ScreenBuffer::new(4, 1);
        assert_eq!(screen.put_str(0, 5, "x", Attr::empty()), 0);
        assert_eq!(screen.get_str(0, 5, 3), "");
    }

    #[test]
    fn test_huge_length_is_clamped() {
        let mut screen = ScreenBuffer::new(10, 1);
        screen.put_str(5, 0, "tail", Attr::empty());
        assert_eq!(screen.get_str(5, 0, usize::MAX - 2), "tail ");
        assert_eq!(screen.get_str(u16::MAX, 0, usize::MAX), "");
    }

    #[test]
    fn test_wide_characters() {
        let mut screen = ScreenBuffer::new(10, 1);
        assert_eq!(screen.put_str(0, 0, "日本", Attr::empty()), 4);
        assert!(screen.cell(1, 0).unwrap().is_continuation());
        assert_eq!(screen.get_str(0, 0, 4), "日本");

        // Overwrite the right half of the first wide char
        screen.put_str(1, 0, "x", Attr::empty());
        assert_eq!(screen.get_str(0, 0, 4), " x本");
    }

    #[test]
    fn test_resize_and_clear() {
        let mut screen = ScreenBuffer::new(4, 1);
        screen.put_str(0, 0, "abcd", Attr::empty());
        screen.resize(6, 2);
        assert_eq!(screen.size(), (6, 2));
        assert_eq!(screen.get_str(0, 0, 6), "abcd  ");
        screen.clear();
        assert_eq!(screen.get_str(0, 0, 6), "      ");
    }
}
