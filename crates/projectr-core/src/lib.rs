//! Projectr Core - Interactive scaffolding for MSBuild C++ projects
//!
//! This library walks a user through a short terminal session (directory
//! layout, precompiled header, subsystem and entry point, third-party
//! libraries) and writes a ready-to-build project from the answers.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Terminal** - The [`Terminal`] capability, with a real console
//!   implementation and a scripted in-memory one
//! - **Layer 2: Output and prompts** - [`Writer`] (themes, label/value column
//!   alignment) and the blocking prompts built on it
//! - **Layer 3: Project model** - Preset tables, [`ProjectParams`] and the file
//!   [`generate`] step
//! - **Layer 4: Session** - [`scaffold::run`], which sequences everything
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables [`ConsoleTerminal`], backed by `console` and
//!   `crossterm`
//!
//! # Example Usage (without a real terminal)
//!
//! ```ignore
//! use projectr_core::{scaffold, MemoryTerminal, PresetCatalog, Writer};
//!
//! let term = MemoryTerminal::new()
//!     .with_key_chars("yyynn")
//!     .with_lines(["main", "Assets"]);
//! let mut out = Writer::new(term);
//! let options = scaffold::ScaffoldOptions {
//!     base_dir: std::env::current_dir()?,
//!     presets: PresetCatalog::builtin(),
//! };
//! let outcome = scaffold::run(&mut out, &["Foo".to_string()], &options)?;
//! ```

pub mod generate;
pub mod output;
pub mod params;
pub mod preset;
pub mod prompt;
pub mod scaffold;
pub mod term;
pub mod theme;

// Re-export main types for convenience
pub use output::{AlignMode, Alignment, Writer};
pub use params::ProjectParams;
pub use preset::{PresetCatalog, PresetError, PresetTable, PRESETS_ENV};
pub use prompt::PromptError;
pub use scaffold::{run, Invocation, Outcome, ScaffoldOptions};
pub use term::{Key, MemoryTerminal, Terminal};
pub use theme::Theme;

#[cfg(feature = "tui")]
pub use term::ConsoleTerminal;
