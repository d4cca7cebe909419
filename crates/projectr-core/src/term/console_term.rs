//! Real terminal backed by `console` with `crossterm` cursor queries

use super::{Key, Terminal};
use crossterm::terminal::{Clear, ClearType};
use std::io;

/// The process' standard output terminal
pub struct ConsoleTerminal {
    term: console::Term,
}

impl ConsoleTerminal {
    pub fn stdout() -> Self {
        Self {
            term: console::Term::stdout(),
        }
    }

    /// Make the cursor visible again (used on exit paths)
    pub fn show_cursor(&self) -> io::Result<()> {
        self.term.show_cursor()
    }
}

impl Default for ConsoleTerminal {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Terminal for ConsoleTerminal {
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.term.write_str(s)?;
        self.term.flush()
    }

    fn read_line(&mut self) -> io::Result<String> {
        self.term.read_line()
    }

    fn read_key(&mut self) -> io::Result<Key> {
        Ok(match self.term.read_key()? {
            console::Key::Char(c) => Key::Char(c),
            console::Key::Enter => Key::Enter,
            console::Key::Escape => Key::Escape,
            _ => Key::Other,
        })
    }

    fn cursor_position(&mut self) -> io::Result<(u16, u16)> {
        crossterm::cursor::position()
    }

    fn move_cursor_to(&mut self, column: u16, row: u16) -> io::Result<()> {
        self.term.move_cursor_to(column as usize, row as usize)
    }

    fn clear_to_eol(&mut self) -> io::Result<()> {
        crossterm::execute!(self.term, Clear(ClearType::UntilNewLine))
    }

    fn supports_color(&self) -> bool {
        self.term.features().colors_supported()
    }
}
