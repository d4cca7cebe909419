//! Blocking prompts built on the themed writer
//!
//! All prompts redraw in place: they remember where the cursor was before the
//! prompt, and go back there to re-prompt or to erase themselves. This assumes
//! nothing else scrolls the screen while a prompt is up.

use crate::output::Writer;
use crate::preset::PresetTable;
use crate::term::{Key, Terminal};
use crate::theme::Theme;
use std::io;
use thiserror::Error;

const CYCLE_PROMPT: &str = "Press Y to confirm, any other key to cycle";

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("the preset chooser needs column alignment to be enabled first")]
    AlignmentDisabled,

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl PromptError {
    /// The read was cut short by Ctrl+C
    pub fn is_interrupted(&self) -> bool {
        matches!(self, PromptError::Io(e) if e.kind() == io::ErrorKind::Interrupted)
    }
}

fn is_yes(key: Key) -> bool {
    matches!(key, Key::Char('y' | 'Y'))
}

fn is_no(key: Key) -> bool {
    matches!(key, Key::Char('n' | 'N'))
}

impl<T: Terminal> Writer<T> {
    /// Prompt for a line of input
    ///
    /// Blank answers are refused by redrawing the prompt on the same row,
    /// unless `allow_blank` is set. With `clear_after`, the prompt and the
    /// answer are wiped before returning.
    pub fn read_line(
        &mut self,
        prompt: &str,
        clear_after: bool,
        allow_blank: bool,
    ) -> Result<String, PromptError> {
        self.read_line_checked(prompt, clear_after, allow_blank, |_| true)
    }

    /// Like [`Writer::read_line`], also refusing non-blank answers that
    /// `accept` rejects
    pub fn read_line_checked(
        &mut self,
        prompt: &str,
        clear_after: bool,
        allow_blank: bool,
        accept: impl Fn(&str) -> bool,
    ) -> Result<String, PromptError> {
        // The echoed Enter must not scroll the prompt row away
        let (column, row) = self.reserve_rows(1)?;

        loop {
            self.write(prompt)?;
            let line = self.term_mut().read_line()?;
            let line = line.trim_end_matches(['\r', '\n']).to_string();

            let blank = line.trim().is_empty();
            if (blank && !allow_blank) || (!blank && !accept(&line)) {
                tracing::debug!(answer = %line, "answer refused");
                self.term_mut().move_cursor_to(column, row)?;
                self.term_mut().clear_to_eol()?;
                continue;
            }

            if clear_after {
                let width = prompt.chars().count() + line.chars().count();
                self.blank(column, row, width)?;
            }
            return Ok(line);
        }
    }

    /// Prompt for a single Y or N keypress; other keys are ignored
    pub fn read_yes_no(&mut self, prompt: &str, clear_after: bool) -> Result<bool, PromptError> {
        let (column, row) = self.term_mut().cursor_position()?;
        self.write(prompt)?;

        let answer = loop {
            let key = self.term_mut().read_key()?;
            if is_yes(key) {
                break true;
            }
            if is_no(key) {
                break false;
            }
        };

        if clear_after {
            self.blank(column, row, prompt.chars().count())?;
        } else {
            self.write_line_plain(if answer { "Y" } else { "N" })?;
        }
        Ok(answer)
    }

    /// Let the user cycle through `table` and confirm one row
    ///
    /// Each category is shown next to the current row's value using the
    /// aligned label/value layout, so alignment must already be enabled. The
    /// whole block is erased once a row is confirmed; the chosen index is
    /// returned.
    pub fn choose_preset(
        &mut self,
        table: &PresetTable,
        highlight: Theme,
    ) -> Result<usize, PromptError> {
        if !self.alignment().is_enabled() {
            return Err(PromptError::AlignmentDisabled);
        }
        self.rearm_alignment();

        let (column, row) = self.reserve_rows(table.categories().len() as u16)?;
        let mut index = 0;

        loop {
            self.term_mut().move_cursor_to(column, row)?;

            for (category, value) in table.categories().iter().zip(table.row(index)) {
                self.write_line(category)?;
                self.color_write(value, highlight)?;
                // A longer value from the previous row may still be on screen
                self.term_mut().clear_to_eol()?;
                self.write_line("")?;
            }

            self.color_write(
                &format!("{} ({}/{}) ", CYCLE_PROMPT, index + 1, table.len()),
                Theme::Subtext,
            )?;
            self.term_mut().clear_to_eol()?;

            let key = self.term_mut().read_key()?;
            if is_yes(key) {
                break;
            }
            index = table.next_index(index);
            tracing::trace!(index, "preset cycled");
        }

        let height = table.categories().len() as u16 + 1;
        for offset in 0..height {
            let start = if offset == 0 { column } else { 0 };
            self.term_mut().move_cursor_to(start, row + offset)?;
            self.term_mut().clear_to_eol()?;
        }
        self.term_mut().move_cursor_to(column, row)?;

        Ok(index)
    }

    /// Make sure `rows` lines below the cursor exist on screen
    ///
    /// At the bottom of the viewport, drawing below the cursor scrolls and
    /// invalidates any remembered row. Scrolling up front and coming back
    /// keeps the returned position valid for the whole prompt.
    fn reserve_rows(&mut self, rows: u16) -> io::Result<(u16, u16)> {
        let (column, row) = self.term_mut().cursor_position()?;
        if rows == 0 {
            return Ok((column, row));
        }
        self.term_mut().write_str(&"\n".repeat(rows as usize))?;
        let (_, bottom) = self.term_mut().cursor_position()?;
        let row = bottom.saturating_sub(rows);
        self.term_mut().move_cursor_to(column, row)?;
        Ok((column, row))
    }

    /// Overwrite `width` cells at `(column, row)` with spaces and return there
    fn blank(&mut self, column: u16, row: u16, width: usize) -> io::Result<()> {
        self.term_mut().move_cursor_to(column, row)?;
        self.term_mut().write_str(&" ".repeat(width))?;
        self.term_mut().move_cursor_to(column, row)
    }

    fn write_line_plain(&mut self, content: &str) -> io::Result<()> {
        self.write(content)?;
        self.term_mut().write_str("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::AlignMode;
    use crate::preset::PresetCatalog;
    use crate::term::MemoryTerminal;

    fn writer(term: MemoryTerminal) -> Writer<MemoryTerminal> {
        Writer::new(term)
    }

    #[test]
    fn test_read_line_returns_and_clears() {
        let mut out = writer(MemoryTerminal::new().with_lines(["main"]));
        let value = out.read_line("Entry file: ", true, false).unwrap();
        assert_eq!(value, "main");
        assert_eq!(out.term().visible_text(), "");
        assert_eq!(out.term_mut().cursor_position().unwrap(), (0, 0));
    }

    #[test]
    fn test_read_line_keeps_prompt_without_clear() {
        let mut out = writer(MemoryTerminal::new().with_lines(["main"]));
        out.read_line("Entry file: ", false, false).unwrap();
        assert_eq!(out.term().line(0), "Entry file: main");
    }

    #[test]
    fn test_read_line_rejects_blank() {
        let mut out = writer(MemoryTerminal::new().with_lines(["", "   ", "ok"]));
        let value = out.read_line("Name: ", true, false).unwrap();
        assert_eq!(value, "ok");
        assert_eq!(out.term().remaining_input(), 0);
        // re-prompted on the same row, three times
        assert_eq!(out.term().transcript().matches("Name: ").count(), 3);
        assert_eq!(out.term().visible_text(), "");
    }

    #[test]
    fn test_read_line_allows_blank() {
        let mut out = writer(MemoryTerminal::new().with_lines(["", "later"]));
        let value = out.read_line("Optional: ", true, true).unwrap();
        assert_eq!(value, "");
        assert_eq!(out.term().remaining_input(), 1);
    }

    #[test]
    fn test_read_line_checked_reprompts_until_accepted() {
        let mut out = writer(MemoryTerminal::new().with_lines(["../main.cpp", "main"]));
        let value = out
            .read_line_checked("Entry file: ", true, false, crate::params::is_plain_name)
            .unwrap();
        assert_eq!(value, "main");
        assert_eq!(out.term().transcript().matches("Entry file: ").count(), 2);
        assert_eq!(out.term().visible_text(), "");
    }

    #[test]
    fn test_read_line_at_bottom_clears_its_own_row() {
        let mut out = writer(MemoryTerminal::new().with_height(2).with_lines(["ok"]));
        out.write_line("x").unwrap();
        assert_eq!(out.read_line("Name: ", true, false).unwrap(), "ok");
        assert_eq!(out.term().visible_text(), "x");
        assert_eq!(out.term_mut().cursor_position().unwrap(), (0, 0));
    }

    #[test]
    fn test_read_line_propagates_eof() {
        let mut out = writer(MemoryTerminal::new());
        let err = out.read_line("Name: ", true, false).unwrap_err();
        assert!(matches!(err, PromptError::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof));
    }

    #[test]
    fn test_interrupted_read_is_recognised() {
        let interrupted = PromptError::from(io::Error::from(io::ErrorKind::Interrupted));
        assert!(interrupted.is_interrupted());
        assert!(!PromptError::AlignmentDisabled.is_interrupted());
        assert!(!PromptError::from(io::Error::from(io::ErrorKind::UnexpectedEof)).is_interrupted());
    }

    #[test]
    fn test_yes_no_ignores_other_keys() {
        let mut out = writer(MemoryTerminal::new().with_key_chars("xq1n"));
        assert!(!out.read_yes_no("Continue? (Y/N) ", true).unwrap());
        assert_eq!(out.term().remaining_input(), 0);
        assert_eq!(out.term().visible_text(), "");

        let mut out = writer(MemoryTerminal::new().with_keys([Key::Enter, Key::Char('Y')]));
        assert!(out.read_yes_no("Continue? (Y/N) ", true).unwrap());
    }

    #[test]
    fn test_yes_no_without_clear_shows_answer() {
        let mut out = writer(MemoryTerminal::new().with_key_chars("y"));
        out.read_yes_no("Continue? ", false).unwrap();
        assert_eq!(out.term().line(0), "Continue? Y");
    }

    #[test]
    fn test_choose_preset_requires_alignment() {
        let table = PresetCatalog::builtin().pch;
        let mut out = writer(MemoryTerminal::new().with_key_chars("y"));
        let err = out.choose_preset(&table, Theme::Highlight).unwrap_err();
        assert!(matches!(err, PromptError::AlignmentDisabled));
        // nothing was drawn or read
        assert_eq!(out.term().transcript(), "");
        assert_eq!(out.term().remaining_input(), 1);
    }

    #[test]
    fn test_choose_preset_confirms_first_row() {
        let table = PresetCatalog::builtin().pch;
        let mut out = writer(MemoryTerminal::new().with_key_chars("y"));
        out.set_alignment(20, '.');
        assert_eq!(out.choose_preset(&table, Theme::Highlight).unwrap(), 0);
    }

    #[test]
    fn test_choose_preset_cycles_and_wraps() {
        let table = PresetCatalog::builtin().pch;
        let mut out = writer(MemoryTerminal::new().with_key_chars("ab Y"));
        out.set_alignment(20, '.');
        assert_eq!(out.choose_preset(&table, Theme::Highlight).unwrap(), 0);

        let mut out = writer(MemoryTerminal::new().with_key_chars("xxy"));
        out.set_alignment(20, '.');
        assert_eq!(out.choose_preset(&table, Theme::Highlight).unwrap(), 2);
    }

    #[test]
    fn test_choose_preset_redraws_in_place() {
        let table = PresetCatalog::builtin().subsystem;
        let mut out = writer(MemoryTerminal::new());
        out.write_line("header").unwrap();
        out.set_alignment(16, '.');

        // Drive one cycle, then inspect the screen before confirming
        out.term_mut().push_key(Key::Char('x'));
        out.term_mut().push_key(Key::Char('x'));
        out.term_mut().push_key(Key::Char('x'));
        out.term_mut().push_key(Key::Char('y'));
        let index = out.choose_preset(&table, Theme::Highlight).unwrap();
        assert_eq!(index, 3);

        let transcript = out.term().transcript().to_string();
        assert!(transcript.contains("wmain(int argc, wchar_t* argv[], wchar_t* envp[])"));
        // block erased, header untouched, cursor back where the block began
        assert_eq!(out.term().visible_text(), "header");
        assert_eq!(out.term_mut().cursor_position().unwrap(), (0, 1));
        assert_eq!(out.alignment().mode(), AlignMode::Pending);
    }

    #[test]
    fn test_choose_preset_at_bottom_of_viewport() {
        let table = PresetCatalog::builtin().pch;
        let mut out = writer(MemoryTerminal::new().with_height(5).with_key_chars("xy"));
        out.write_line("a").unwrap();
        out.write_line("b").unwrap();
        out.set_alignment(24, '.');

        assert_eq!(out.choose_preset(&table, Theme::Highlight).unwrap(), 1);
        // the block was erased where it was drawn, lines above are intact
        assert_eq!(out.term().visible_text(), "a\nb");
        assert_eq!(out.term_mut().cursor_position().unwrap(), (0, 1));
    }

    #[test]
    fn test_choose_preset_clears_stale_tail() {
        let table = PresetCatalog::builtin().subsystem;
        // row 2 has the long wmain signature, row 3 the short "main()";
        // input runs out while row 3 is on screen
        let mut out = writer(MemoryTerminal::new().with_key_chars("xxx"));
        out.set_alignment(12, '.');
        assert!(out.choose_preset(&table, Theme::Highlight).is_err());
        assert_eq!(out.term().line(0), "Subsystem... Windows");
        assert_eq!(out.term().line(1), "Entry point. main()");
    }
}
