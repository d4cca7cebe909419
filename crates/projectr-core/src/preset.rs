//! Preset tables and the preset catalog
//!
//! A preset table is a fixed matrix: one label per column (the categories)
//! and one row per selectable preset. The catalog holds the three tables the
//! scaffolder asks about. Built-in tables can be replaced from a YAML file:
//!
//! ```yaml
//! directories:
//!   categories: [Source, Binary, Intermediate, Library, Assets, Workspace]
//!   rows:
//!     - [src, bin, obj, lib, assets, workspace]
//! pch:
//!   categories: [Use PCH, PCH name, PCH source file name]
//!   rows:
//!     - ["No", None, None]
//!     - ["Yes", stdafx.h, stdafx.cpp]
//! ```

use crate::params::{DirectoryLayout, Pch, Startup};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming a preset override file
pub const PRESETS_ENV: &str = "PROJECTR_PRESETS";

#[derive(Debug, Error)]
pub enum PresetError {
    #[error("preset table has no categories")]
    NoCategories,

    #[error("preset table has no rows")]
    NoRows,

    #[error("preset row {row} has {found} values, expected {expected}")]
    RowWidth {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("{table} presets need {expected} categories, found {found}")]
    TableWidth {
        table: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{table} preset row {row}: {message}")]
    InvalidRow {
        table: &'static str,
        row: usize,
        message: String,
    },

    #[error("failed to read preset file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse preset file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Labeled option rows; every row is as wide as the category list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct PresetTable {
    categories: Vec<String>,
    rows: Vec<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTable {
    categories: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TryFrom<RawTable> for PresetTable {
    type Error = PresetError;

    fn try_from(raw: RawTable) -> Result<Self, Self::Error> {
        PresetTable::new(raw.categories, raw.rows)
    }
}

impl PresetTable {
    pub fn new(categories: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, PresetError> {
        if categories.is_empty() {
            return Err(PresetError::NoCategories);
        }
        if rows.is_empty() {
            return Err(PresetError::NoRows);
        }
        if let Some((row, values)) = rows
            .iter()
            .enumerate()
            .find(|(_, values)| values.len() != categories.len())
        {
            return Err(PresetError::RowWidth {
                row,
                found: values.len(),
                expected: categories.len(),
            });
        }
        Ok(Self { categories, rows })
    }

    fn from_static(categories: &[&str], rows: &[&[&str]]) -> Self {
        let owned = |values: &[&str]| values.iter().map(|v| v.to_string()).collect::<Vec<_>>();
        Self {
            categories: owned(categories),
            rows: rows.iter().copied().map(owned).collect(),
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Values of one preset, one per category
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`PresetTable::len`].
    pub fn row(&self, index: usize) -> &[String] {
        &self.rows[index]
    }

    /// Number of rows, never zero
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Index following `index`, wrapping back to the first row
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.rows.len()
    }

    fn check_width(&self, table: &'static str, expected: usize) -> Result<(), PresetError> {
        if self.categories.len() != expected {
            return Err(PresetError::TableWidth {
                table,
                expected,
                found: self.categories.len(),
            });
        }
        Ok(())
    }

    fn check_rows<T>(
        &self,
        table: &'static str,
        parse: impl Fn(&[String]) -> Result<T, String>,
    ) -> Result<(), PresetError> {
        for (row, values) in self.rows.iter().enumerate() {
            parse(values).map_err(|message| PresetError::InvalidRow {
                table,
                row,
                message,
            })?;
        }
        Ok(())
    }
}

/// The tables offered during a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetCatalog {
    pub directories: PresetTable,
    pub pch: PresetTable,
    pub subsystem: PresetTable,
}

/// Shape of an override file; absent tables keep the built-ins
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PresetOverrides {
    #[serde(default)]
    directories: Option<PresetTable>,
    #[serde(default)]
    pch: Option<PresetTable>,
    #[serde(default)]
    subsystem: Option<PresetTable>,
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PresetCatalog {
    pub fn builtin() -> Self {
        Self {
            directories: PresetTable::from_static(
                &DirectoryLayout::LABELS,
                &[
                    &["Source", "Bin", "Int", "Lib", "Assets", "Workspace"],
                    &["src", "bin", "obj", "lib", "assets", "workspace"],
                    &["Code", "Build", "Temp", "Deps", "Data", "Project"],
                ],
            ),
            pch: PresetTable::from_static(
                &["Use PCH", "PCH name", "PCH source file name"],
                &[
                    &["No", "None", "None"],
                    &["Yes", "core.h", "core.cpp"],
                    &["Yes", "pch.h", "pch.cpp"],
                ],
            ),
            subsystem: PresetTable::from_static(
                &["Subsystem", "Entry point"],
                &[
                    &["Console", "main()"],
                    &["Console", "main(int argc, char* argv[])"],
                    &["Console", "wmain(int argc, wchar_t* argv[], wchar_t* envp[])"],
                    &["Windows", "main()"],
                    &["Windows", "main(int argc, char* argv[])"],
                    &["Windows", "wmain(int argc, wchar_t* argv[], wchar_t* envp[])"],
                    &["Windows", "WinMain(...)"],
                    &["Windows", "wWinMain(...)"],
                ],
            ),
        }
    }

    /// Built-ins with the tables present in `yaml` replaced
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        let overrides: PresetOverrides = serde_yaml::from_str(yaml)?;
        let mut catalog = Self::builtin();
        if let Some(table) = overrides.directories {
            catalog.directories = table;
        }
        if let Some(table) = overrides.pch {
            catalog.pch = table;
        }
        if let Some(table) = overrides.subsystem {
            catalog.subsystem = table;
        }
        Ok(catalog)
    }

    /// Load and validate an override file
    pub fn load(path: &Path) -> Result<Self, PresetError> {
        let content = std::fs::read_to_string(path).map_err(|source| PresetError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_yaml(&content).map_err(|source| PresetError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        catalog.validate()?;
        tracing::debug!(path = %path.display(), "loaded preset overrides");
        Ok(catalog)
    }

    /// Resolve the catalog from an explicit path, then the environment
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, PresetError> {
        match explicit {
            Some(path) => Self::load(path),
            None => match std::env::var_os(PRESETS_ENV) {
                Some(path) if !path.is_empty() => Self::load(Path::new(&path)),
                _ => Ok(Self::builtin()),
            },
        }
    }

    /// Check that every row can be turned into scaffold parameters
    pub fn validate(&self) -> Result<(), PresetError> {
        self.directories.check_width("directory", 6)?;
        self.directories
            .check_rows("directory", DirectoryLayout::from_row)?;

        self.pch.check_width("PCH", 3)?;
        self.pch.check_rows("PCH", Pch::from_row)?;

        self.subsystem.check_width("subsystem", 2)?;
        self.subsystem.check_rows("subsystem", Startup::parse_row)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = PresetCatalog::builtin();
        catalog.validate().unwrap();
        assert_eq!(catalog.directories.categories().len(), 6);
        assert_eq!(catalog.pch.len(), 3);
        assert_eq!(catalog.subsystem.len(), 8);
    }

    #[test]
    fn test_next_index_wraps() {
        let table = PresetCatalog::builtin().pch;
        assert_eq!(table.next_index(0), 1);
        assert_eq!(table.next_index(1), 2);
        assert_eq!(table.next_index(2), 0);
    }

    #[test]
    fn test_ragged_table_rejected() {
        let err = PresetTable::new(
            vec!["a".into(), "b".into()],
            vec![vec!["1".into(), "2".into()], vec!["3".into()]],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PresetError::RowWidth {
                row: 1,
                found: 1,
                expected: 2
            }
        ));
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(matches!(
            PresetTable::new(vec!["a".into()], vec![]),
            Err(PresetError::NoRows)
        ));
        assert!(matches!(
            PresetTable::new(vec![], vec![vec![]]),
            Err(PresetError::NoCategories)
        ));
    }

    #[test]
    fn test_yaml_override_replaces_only_given_tables() {
        let yaml = r#"
pch:
  categories: [Use PCH, PCH name, PCH source file name]
  rows:
    - ["No", None, None]
    - ["Yes", stdafx.h, stdafx.cpp]
"#;
        let catalog = PresetCatalog::from_yaml(yaml).unwrap();
        catalog.validate().unwrap();
        assert_eq!(catalog.pch.len(), 2);
        assert_eq!(catalog.pch.row(1)[1], "stdafx.h");
        assert_eq!(catalog.directories, PresetCatalog::builtin().directories);
    }

    #[test]
    fn test_yaml_ragged_rows_fail_to_parse() {
        let yaml = r#"
subsystem:
  categories: [Subsystem, Entry point]
  rows:
    - [Console]
"#;
        assert!(PresetCatalog::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_unknown_entry_point_fails_validation() {
        let yaml = r#"
subsystem:
  categories: [Subsystem, Entry point]
  rows:
    - [Console, "start()"]
"#;
        let catalog = PresetCatalog::from_yaml(yaml).unwrap();
        let err = catalog.validate().unwrap_err();
        assert!(matches!(err, PresetError::InvalidRow { row: 0, .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presets.yaml");
        std::fs::write(
            &path,
            "directories:\n  categories: [S, B, I, L, A, W]\n  rows:\n    - [s, b, i, l, a, w]\n",
        )
        .unwrap();

        let catalog = PresetCatalog::load(&path).unwrap();
        assert_eq!(catalog.directories.row(0)[0], "s");

        let missing = PresetCatalog::load(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(missing, PresetError::Read { .. }));
    }

    #[test]
    fn test_explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.yaml");
        std::fs::write(&path, "{}").unwrap();
        assert_eq!(
            PresetCatalog::resolve(Some(&path)).unwrap(),
            PresetCatalog::builtin()
        );
    }
}
