//! Color themes for terminal output

use colored::{Color, ColoredString, Colorize};

/// Named foreground/background pairings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Default,
    Subtext,
    Highlight,
    Good,
    Warning,
    Error,
}

impl Theme {
    pub const ALL: [Theme; 6] = [
        Theme::Default,
        Theme::Subtext,
        Theme::Highlight,
        Theme::Good,
        Theme::Warning,
        Theme::Error,
    ];

    /// Look a theme up by its index
    ///
    /// # Panics
    ///
    /// Panics when `index` is outside the enumerated range.
    pub fn from_index(index: usize) -> Theme {
        Self::ALL[index]
    }

    /// `(foreground, background)` colors
    pub fn colors(self) -> (Color, Color) {
        match self {
            Theme::Default => (Color::White, Color::Black),
            Theme::Subtext => (Color::BrightBlack, Color::Black),
            Theme::Highlight => (Color::BrightWhite, Color::Black),
            Theme::Good => (Color::Green, Color::Black),
            Theme::Warning => (Color::Yellow, Color::Black),
            Theme::Error => (Color::Red, Color::Black),
        }
    }

    pub fn paint(self, content: &str) -> ColoredString {
        let (fg, bg) = self.colors();
        content.color(fg).on_color(bg)
    }
}
