//! Terminal capability used by the writer and the prompts
//!
//! Everything the interactive layer needs from a terminal goes through the
//! [`Terminal`] trait, so the same prompt code drives a real console or a
//! scripted in-memory screen.

#[cfg(feature = "tui")]
mod console_term;
mod memory;

#[cfg(feature = "tui")]
pub use console_term::ConsoleTerminal;
pub use memory::MemoryTerminal;

use std::io;

/// A single keypress as seen by the prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Other,
}

/// Minimal terminal capability
///
/// Cursor coordinates are zero-based `(column, row)` pairs. Implementations
/// must answer [`Terminal::cursor_position`] from the terminal itself rather
/// than from a cached value, since any write moves the cursor.
pub trait Terminal {
    /// Write text at the cursor
    fn write_str(&mut self, s: &str) -> io::Result<()>;

    /// Block until a full line is entered; the line terminator is stripped
    fn read_line(&mut self) -> io::Result<String>;

    /// Block until a single key is pressed (not echoed)
    fn read_key(&mut self) -> io::Result<Key>;

    /// Current cursor position as `(column, row)`
    fn cursor_position(&mut self) -> io::Result<(u16, u16)>;

    /// Move the cursor to an absolute `(column, row)`
    fn move_cursor_to(&mut self, column: u16, row: u16) -> io::Result<()>;

    /// Erase from the cursor to the end of the current line
    fn clear_to_eol(&mut self) -> io::Result<()>;

    /// Whether ANSI colors should be emitted
    fn supports_color(&self) -> bool {
        false
    }
}
