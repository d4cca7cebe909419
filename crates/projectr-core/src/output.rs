//! Themed, optionally column-aligned terminal output
//!
//! [`Writer`] owns the terminal together with an explicit [`OutputState`]
//! (current theme and alignment). With alignment enabled, successive
//! [`Writer::write_line`] calls alternate between a label padded out to a
//! fixed column and the value that completes the row:
//!
//! ```text
//! Source directory ............... Source
//! Entry point file ............... Source\main.cpp
//! ```

use crate::term::Terminal;
use crate::theme::Theme;
use std::io;
use std::ops::{Deref, DerefMut};

/// Where the next `write_line` lands in a label/value row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignMode {
    /// Plain lines
    #[default]
    Off,
    /// Next line is a label padded out to the column
    Pending,
    /// Next line is the value completing the row
    Active,
}

/// Column alignment settings
///
/// Invariant: `column == 0` exactly when the mode is [`AlignMode::Off`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alignment {
    mode: AlignMode,
    column: u16,
    fill_char: char,
    fill: String,
}

impl Alignment {
    /// `column == 0` turns alignment off and drops the fill buffer
    pub fn set(&mut self, column: u16, fill_char: char) {
        if column == 0 {
            *self = Alignment::default();
            return;
        }

        self.mode = AlignMode::Pending;
        self.column = column;
        self.fill_char = fill_char;
        self.fill = std::iter::repeat(fill_char)
            .take(column as usize)
            .collect();
    }

    pub fn mode(&self) -> AlignMode {
        self.mode
    }

    pub fn column(&self) -> u16 {
        self.column
    }

    pub fn is_enabled(&self) -> bool {
        self.mode != AlignMode::Off
    }

    /// Start a fresh label/value row if alignment is on
    pub(crate) fn rearm(&mut self) {
        if self.is_enabled() {
            self.mode = AlignMode::Pending;
        }
    }

    /// Up to `count` filler characters, bounded by the fill buffer
    fn padding(&self, count: usize) -> &str {
        let count = count.min(self.column as usize);
        &self.fill[..count * self.fill_char.len_utf8()]
    }
}

/// Process-wide output state, threaded explicitly through the writer
#[derive(Debug, Clone, Default)]
pub struct OutputState {
    pub theme: Theme,
    pub alignment: Alignment,
}

/// Terminal writer applying themes and alignment
pub struct Writer<T: Terminal> {
    term: T,
    state: OutputState,
}

impl<T: Terminal> Writer<T> {
    pub fn new(term: T) -> Self {
        Self {
            term,
            state: OutputState::default(),
        }
    }

    pub fn term(&self) -> &T {
        &self.term
    }

    pub fn term_mut(&mut self) -> &mut T {
        &mut self.term
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.state.theme = theme;
    }

    pub fn theme(&self) -> Theme {
        self.state.theme
    }

    pub fn set_alignment(&mut self, column: u16, fill_char: char) {
        self.state.alignment.set(column, fill_char);
    }

    pub fn alignment(&self) -> &Alignment {
        &self.state.alignment
    }

    pub(crate) fn rearm_alignment(&mut self) {
        self.state.alignment.rearm();
    }

    /// Emit text in the current theme without touching alignment
    pub fn write(&mut self, content: &str) -> io::Result<()> {
        self.paint(content)
    }

    /// Emit a line, taking part in the label/value layout when aligned
    pub fn write_line(&mut self, content: &str) -> io::Result<()> {
        match self.state.alignment.mode {
            AlignMode::Off => {
                self.paint(content)?;
                self.term.write_str("\n")
            }
            AlignMode::Pending => {
                self.paint(content)?;
                let fill_char = self.state.alignment.fill_char;
                self.paint(fill_char.encode_utf8(&mut [0; 4]))?;

                // The label may have moved the cursor anywhere, so ask
                let (column, _) = self.term.cursor_position()?;
                let missing = self.state.alignment.column.saturating_sub(column) as usize;
                let padding = self.state.alignment.padding(missing).to_string();
                self.paint(&padding)?;
                self.paint(" ")?;

                self.state.alignment.mode = AlignMode::Active;
                Ok(())
            }
            AlignMode::Active => {
                self.paint(content)?;
                self.term.write_str("\n")?;
                self.state.alignment.mode = AlignMode::Pending;
                Ok(())
            }
        }
    }

    /// Switch to `theme` until the returned guard is dropped
    pub fn themed(&mut self, theme: Theme) -> ThemeGuard<'_, T> {
        let saved = self.state.theme;
        self.set_theme(theme);
        ThemeGuard {
            writer: self,
            saved,
        }
    }

    pub fn color_write(&mut self, content: &str, theme: Theme) -> io::Result<()> {
        let mut guard = self.themed(theme);
        guard.write(content)
    }

    pub fn color_write_line(&mut self, content: &str, theme: Theme) -> io::Result<()> {
        let mut guard = self.themed(theme);
        guard.write_line(content)
    }

    /// Write a complete `label ... value` row (alignment must be on)
    pub fn row(&mut self, label: &str, value: &str, theme: Theme) -> io::Result<()> {
        self.write_line(label)?;
        self.color_write_line(value, theme)
    }

    /// Print an unaligned heading, then put alignment back as it was
    pub fn section(&mut self, title: &str, theme: Theme) -> io::Result<()> {
        let saved = self.state.alignment.clone();
        self.state.alignment.set(0, ' ');
        let result = self.color_write_line(title, theme);
        self.state.alignment = saved;
        result
    }

    fn paint(&mut self, content: &str) -> io::Result<()> {
        if content.is_empty() {
            return Ok(());
        }
        if self.term.supports_color() {
            let painted = self.state.theme.paint(content).to_string();
            self.term.write_str(&painted)
        } else {
            self.term.write_str(content)
        }
    }
}

/// Restores the previous theme on drop, even if a write failed in between
pub struct ThemeGuard<'a, T: Terminal> {
    writer: &'a mut Writer<T>,
    saved: Theme,
}

impl<T: Terminal> Deref for ThemeGuard<'_, T> {
    type Target = Writer<T>;

    fn deref(&self) -> &Self::Target {
        self.writer
    }
}

impl<T: Terminal> DerefMut for ThemeGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.writer
    }
}

impl<T: Terminal> Drop for ThemeGuard<'_, T> {
    fn drop(&mut self) {
        self.writer.set_theme(self.saved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{Key, MemoryTerminal};

    fn writer() -> Writer<MemoryTerminal> {
        Writer::new(MemoryTerminal::new())
    }

    #[test]
    fn test_off_mode_writes_plain_lines() {
        let mut out = writer();
        out.write_line("one").unwrap();
        out.write_line("two").unwrap();
        assert_eq!(out.term().screen_lines(), vec!["one", "two"]);
    }

    #[test]
    fn test_short_label_pads_to_column() {
        for column in [5u16, 12, 30] {
            let mut out = writer();
            out.set_alignment(column, '.');
            out.write_line("abc").unwrap();
            out.write_line("value").unwrap();

            let line = out.term().line(0);
            let value_at = line.find("value").unwrap();
            // label + fillers fill exactly `column` cells, then one space
            assert_eq!(value_at, column as usize + 1);
            assert!(line[3..column as usize].chars().all(|c| c == '.'));
        }
    }

    #[test]
    fn test_long_label_still_gets_one_filler() {
        let mut out = writer();
        out.set_alignment(4, '.');
        out.write_line("a long label").unwrap();
        out.write_line("v").unwrap();
        assert_eq!(out.term().line(0), "a long label. v");
    }

    #[test]
    fn test_modes_alternate_until_turned_off() {
        let mut out = writer();
        out.set_alignment(10, ' ');
        assert_eq!(out.alignment().mode(), AlignMode::Pending);
        out.write_line("a").unwrap();
        assert_eq!(out.alignment().mode(), AlignMode::Active);
        out.write_line("b").unwrap();
        assert_eq!(out.alignment().mode(), AlignMode::Pending);
        out.write_line("c").unwrap();
        assert_eq!(out.alignment().mode(), AlignMode::Active);

        out.set_alignment(0, ' ');
        assert_eq!(out.alignment().mode(), AlignMode::Off);
        assert_eq!(out.alignment().column(), 0);
        assert_eq!(out.alignment().padding(10), "");
    }

    #[test]
    fn test_reset_from_pending_turns_alignment_off() {
        let mut out = writer();
        out.set_alignment(10, '.');
        out.write_line("label").unwrap();
        out.write_line("value").unwrap();
        assert_eq!(out.alignment().mode(), AlignMode::Pending);

        out.set_alignment(0, '.');
        assert_eq!(out.alignment().mode(), AlignMode::Off);
        assert!(!out.alignment().is_enabled());
        assert_eq!(out.alignment().column(), 0);

        // plain lines again, no padding
        out.write_line("plain").unwrap();
        assert_eq!(out.term().line(1), "plain");
        assert_eq!(out.alignment().mode(), AlignMode::Off);
    }

    #[test]
    fn test_write_does_not_advance_alignment() {
        let mut out = writer();
        out.set_alignment(8, '.');
        out.write("prefix ").unwrap();
        assert_eq!(out.alignment().mode(), AlignMode::Pending);
    }

    #[test]
    fn test_padding_uses_current_cursor_column() {
        let mut out = writer();
        out.set_alignment(10, '-');
        out.write("ab").unwrap();
        out.write_line("cd").unwrap();
        out.write_line("x").unwrap();
        assert_eq!(out.term().line(0), "abcd------ x");
    }

    #[test]
    fn test_color_write_restores_theme() {
        let mut out = writer();
        out.set_theme(Theme::Subtext);
        out.color_write_line("boom", Theme::Error).unwrap();
        assert_eq!(out.theme(), Theme::Subtext);
    }

    struct FailingTerminal;

    impl Terminal for FailingTerminal {
        fn write_str(&mut self, _s: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
        fn read_line(&mut self) -> io::Result<String> {
            Ok(String::new())
        }
        fn read_key(&mut self) -> io::Result<Key> {
            Ok(Key::Other)
        }
        fn cursor_position(&mut self) -> io::Result<(u16, u16)> {
            Ok((0, 0))
        }
        fn move_cursor_to(&mut self, _column: u16, _row: u16) -> io::Result<()> {
            Ok(())
        }
        fn clear_to_eol(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_theme_restored_when_write_fails() {
        let mut out = Writer::new(FailingTerminal);
        out.set_theme(Theme::Highlight);
        assert!(out.color_write("x", Theme::Warning).is_err());
        assert_eq!(out.theme(), Theme::Highlight);
    }

    #[test]
    fn test_colors_only_when_supported() {
        let mut plain = writer();
        plain.color_write("ok", Theme::Good).unwrap();
        assert_eq!(plain.term().transcript(), "ok");

        let mut painted = Writer::new(MemoryTerminal::new().with_color(true));
        colored::control::set_override(true);
        painted.color_write("ok", Theme::Good).unwrap();
        colored::control::unset_override();
        assert!(painted.term().transcript().contains('\u{1b}'));
        assert_eq!(painted.term().line(0), "ok");
    }

    #[test]
    fn test_section_keeps_alignment() {
        let mut out = writer();
        out.set_alignment(6, '.');
        out.section("Heading", Theme::Subtext).unwrap();
        assert_eq!(out.alignment().mode(), AlignMode::Pending);
        out.row("a", "b", Theme::Highlight).unwrap();
        assert_eq!(out.term().screen_lines(), vec!["Heading", "a..... b"]);
    }
}
