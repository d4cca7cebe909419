//! In-memory terminal with scripted input
//!
//! Keeps a character grid that mirrors what a real screen would show after
//! writes, cursor moves and clears, so redraw-in-place behavior can be checked
//! without a tty. With a viewport height set, a newline on the last row
//! scrolls, and cursor rows become relative to the viewport like on a real
//! terminal.

use super::{Key, Terminal};
use std::collections::VecDeque;
use std::io;

#[derive(Debug, Default)]
pub struct MemoryTerminal {
    lines: VecDeque<String>,
    keys: VecDeque<Key>,
    screen: Vec<Vec<char>>,
    column: usize,
    /// Cursor row inside the viewport
    row: usize,
    /// Grid row shown at the top of the viewport
    top: usize,
    height: Option<usize>,
    transcript: String,
    color: bool,
}

impl MemoryTerminal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue lines returned by successive `read_line` calls
    pub fn with_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
        self
    }

    /// Queue keys returned by successive `read_key` calls
    pub fn with_keys<I>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = Key>,
    {
        self.keys.extend(keys);
        self
    }

    /// Queue one `Key::Char` per character of `keys`
    pub fn with_key_chars(self, keys: &str) -> Self {
        self.with_keys(keys.chars().map(Key::Char))
    }

    /// Limit the viewport to `height` rows
    pub fn with_height(mut self, height: usize) -> Self {
        self.height = Some(height.max(1));
        self
    }

    /// Report color support (output will then contain ANSI sequences)
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn push_key(&mut self, key: Key) {
        self.keys.push_back(key);
    }

    /// Everything ever written, including echoed input
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// A screen row with trailing blanks removed
    pub fn line(&self, row: usize) -> String {
        self.screen
            .get(row)
            .map(|cells| cells.iter().collect::<String>().trim_end().to_string())
            .unwrap_or_default()
    }

    /// All screen rows with trailing blanks removed
    pub fn screen_lines(&self) -> Vec<String> {
        (0..self.screen.len()).map(|row| self.line(row)).collect()
    }

    /// Visible screen text with blank rows dropped
    pub fn visible_text(&self) -> String {
        self.screen_lines()
            .into_iter()
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Scripted input that has not been consumed yet
    pub fn remaining_input(&self) -> usize {
        self.lines.len() + self.keys.len()
    }

    fn put_char(&mut self, c: char) {
        match c {
            '\n' => {
                self.row += 1;
                self.column = 0;
                if let Some(height) = self.height {
                    if self.row >= height {
                        self.top += self.row + 1 - height;
                        self.row = height - 1;
                    }
                }
            }
            '\r' => self.column = 0,
            _ => {
                let column = self.column;
                let row = self.row_mut();
                if row.len() <= column {
                    row.resize(column + 1, ' ');
                }
                row[column] = c;
                self.column += 1;
            }
        }
    }

    fn row_mut(&mut self) -> &mut Vec<char> {
        let row = self.top + self.row;
        if self.screen.len() <= row {
            self.screen.resize_with(row + 1, Vec::new);
        }
        &mut self.screen[row]
    }

    fn put_str(&mut self, s: &str) {
        let mut chars = s.chars().peekable();
        while let Some(c) = chars.next() {
            // ANSI escape sequences occupy no cells
            if c == '\u{1b}' {
                if chars.peek() == Some(&'[') {
                    chars.next();
                    for c in chars.by_ref() {
                        if c.is_ascii_alphabetic() {
                            break;
                        }
                    }
                }
                continue;
            }
            self.put_char(c);
        }
    }
}

impl Terminal for MemoryTerminal {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.transcript.push_str(s);
        self.put_str(s);
        Ok(())
    }

    fn read_line(&mut self) -> io::Result<String> {
        let line = self
            .lines
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted line left"))?;
        // A real terminal echoes what the user typed, then the Enter key
        self.write_str(&line)?;
        self.write_str("\n")?;
        Ok(line)
    }

    fn read_key(&mut self) -> io::Result<Key> {
        self.keys
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted key left"))
    }

    fn cursor_position(&mut self) -> io::Result<(u16, u16)> {
        Ok((self.column as u16, self.row as u16))
    }

    fn move_cursor_to(&mut self, column: u16, row: u16) -> io::Result<()> {
        self.column = column as usize;
        self.row = match self.height {
            Some(height) => (row as usize).min(height - 1),
            None => row as usize,
        };
        Ok(())
    }

    fn clear_to_eol(&mut self) -> io::Result<()> {
        let column = self.column;
        let row = self.row_mut();
        row.truncate(column);
        Ok(())
    }

    fn supports_color(&self) -> bool {
        self.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_land_on_grid() {
        let mut term = MemoryTerminal::new();
        term.write_str("hello\nworld").unwrap();
        assert_eq!(term.screen_lines(), vec!["hello", "world"]);
        assert_eq!(term.cursor_position().unwrap(), (5, 1));
    }

    #[test]
    fn test_overwrite_and_clear() {
        let mut term = MemoryTerminal::new();
        term.write_str("abcdef").unwrap();
        term.move_cursor_to(2, 0).unwrap();
        term.write_str("X").unwrap();
        term.clear_to_eol().unwrap();
        assert_eq!(term.line(0), "abX");
    }

    #[test]
    fn test_read_line_echoes_input() {
        let mut term = MemoryTerminal::new().with_lines(["Foo"]);
        term.write_str("Name: ").unwrap();
        assert_eq!(term.read_line().unwrap(), "Foo");
        assert_eq!(term.line(0), "Name: Foo");
        assert_eq!(term.cursor_position().unwrap(), (0, 1));
    }

    #[test]
    fn test_exhausted_script_is_eof() {
        let mut term = MemoryTerminal::new();
        let err = term.read_key().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_newline_on_last_row_scrolls() {
        let mut term = MemoryTerminal::new().with_height(2);
        term.write_str("a\nb\nc").unwrap();
        assert_eq!(term.cursor_position().unwrap(), (1, 1));
        assert_eq!(term.screen_lines(), vec!["a", "b", "c"]);

        // row 0 of the viewport is now "b"
        term.move_cursor_to(0, 0).unwrap();
        term.write_str("B").unwrap();
        assert_eq!(term.screen_lines(), vec!["a", "B", "c"]);
    }

    #[test]
    fn test_escape_sequences_take_no_cells() {
        let mut term = MemoryTerminal::new();
        term.write_str("\u{1b}[32mok\u{1b}[0m").unwrap();
        assert_eq!(term.line(0), "ok");
        assert_eq!(term.cursor_position().unwrap(), (2, 0));
    }
}
