//! Project scaffold parameters collected during a session
//!
//! These are plain data. The preset rows chosen by the user are turned into
//! the typed values below, and the finished [`ProjectParams`] is handed to
//! the generators.

use std::fmt;

/// The six project directories, in preset column order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryLayout {
    pub source: String,
    pub binary: String,
    pub intermediate: String,
    pub library: String,
    pub assets: String,
    pub workspace: String,
}

impl DirectoryLayout {
    pub const LABELS: [&'static str; 6] = [
        "Source",
        "Binary",
        "Intermediate",
        "Library",
        "Assets",
        "Workspace",
    ];

    /// Build from a preset row; `row` must hold exactly six names
    pub fn from_row(row: &[String]) -> Result<Self, String> {
        let [source, binary, intermediate, library, assets, workspace] = row else {
            return Err(format!("expected 6 directory names, found {}", row.len()));
        };
        let layout = Self {
            source: source.clone(),
            binary: binary.clone(),
            intermediate: intermediate.clone(),
            library: library.clone(),
            assets: assets.clone(),
            workspace: workspace.clone(),
        };
        if let Some(bad) = layout.names().into_iter().find(|n| !is_plain_name(n)) {
            return Err(format!("'{}' is not a plain directory name", bad));
        }
        Ok(layout)
    }

    pub fn names(&self) -> [&str; 6] {
        [
            &self.source,
            &self.binary,
            &self.intermediate,
            &self.library,
            &self.assets,
            &self.workspace,
        ]
    }

    /// `(label, name)` pairs in column order
    pub fn labeled(&self) -> impl Iterator<Item = (&'static str, &str)> {
        Self::LABELS.into_iter().zip(self.names())
    }
}

/// A single file or directory name that stays inside its parent
pub fn is_plain_name(name: &str) -> bool {
    !name.trim().is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', ':', '*', '?', '"', '<', '>', '|'])
}

/// A relative path made of plain names, e.g. `lib\x64`
pub fn is_relative_path(path: &str) -> bool {
    !path.trim().is_empty()
        && !path.starts_with(['/', '\\'])
        && path
            .split(['/', '\\'])
            .all(|part| part.is_empty() || is_plain_name(part))
}

/// Precompiled header strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pch {
    None,
    Use { header: String, source: String },
}

impl Pch {
    /// Build from a `[use, header, source]` preset row
    pub fn from_row(row: &[String]) -> Result<Self, String> {
        let [enabled, header, source] = row else {
            return Err(format!("expected 3 PCH values, found {}", row.len()));
        };
        match enabled.to_ascii_lowercase().as_str() {
            "no" => Ok(Pch::None),
            "yes" if [header, source].iter().any(|f| !is_plain_name(f)) => Err(format!(
                "PCH files must be plain file names, got '{}' and '{}'",
                header, source
            )),
            "yes" if header.contains('.') && source.contains('.') => Ok(Pch::Use {
                header: header.clone(),
                source: source.clone(),
            }),
            "yes" => Err(format!(
                "PCH files need extensions, got '{}' and '{}'",
                header, source
            )),
            other => Err(format!("expected Yes or No, found '{}'", other)),
        }
    }

    pub fn header(&self) -> Option<&str> {
        match self {
            Pch::None => None,
            Pch::Use { header, .. } => Some(header),
        }
    }

    pub fn source(&self) -> Option<&str> {
        match self {
            Pch::None => None,
            Pch::Use { source, .. } => Some(source),
        }
    }
}

/// Linker subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subsystem {
    Console,
    Windows,
}

impl Subsystem {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "console" => Some(Subsystem::Console),
            "windows" => Some(Subsystem::Windows),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Subsystem::Console => "Console",
            Subsystem::Windows => "Windows",
        }
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry point function shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
    Main,
    MainArgs,
    WMain,
    WinMain,
    WWinMain,
}

impl EntryPoint {
    /// Recognise a preset signature such as `main(int argc, char* argv[])`
    pub fn parse(signature: &str) -> Option<Self> {
        let signature = signature.trim();
        let (name, rest) = signature.split_once('(')?;
        let args = rest.trim_end_matches(')').trim();
        match name.trim() {
            "main" if args.is_empty() || args == "void" => Some(EntryPoint::Main),
            "main" => Some(EntryPoint::MainArgs),
            "wmain" => Some(EntryPoint::WMain),
            "WinMain" => Some(EntryPoint::WinMain),
            "wWinMain" => Some(EntryPoint::WWinMain),
            _ => None,
        }
    }

    /// CRT startup symbol passed to the linker
    pub fn startup_symbol(&self) -> &'static str {
        match self {
            EntryPoint::Main | EntryPoint::MainArgs => "mainCRTStartup",
            EntryPoint::WMain => "wmainCRTStartup",
            EntryPoint::WinMain => "WinMainCRTStartup",
            EntryPoint::WWinMain => "wWinMainCRTStartup",
        }
    }

    /// Whether the entry point only makes sense for GUI programs
    pub fn is_gui(&self) -> bool {
        matches!(self, EntryPoint::WinMain | EntryPoint::WWinMain)
    }
}

/// Subsystem and entry point for both configurations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Startup {
    pub debug_subsystem: Subsystem,
    pub release_subsystem: Subsystem,
    pub entry: EntryPoint,
    /// Entry source file name inside the source directory
    pub entry_file: String,
}

impl Startup {
    /// Parse a `[subsystem, entry point]` preset row
    pub fn parse_row(row: &[String]) -> Result<(Subsystem, EntryPoint), String> {
        let [subsystem, entry] = row else {
            return Err(format!("expected 2 subsystem values, found {}", row.len()));
        };
        let subsystem = Subsystem::parse(subsystem)
            .ok_or_else(|| format!("unknown subsystem '{}'", subsystem))?;
        let entry =
            EntryPoint::parse(entry).ok_or_else(|| format!("unknown entry point '{}'", entry))?;
        if entry.is_gui() && subsystem == Subsystem::Console {
            return Err(format!("{} needs the Windows subsystem", entry_name(entry)));
        }
        Ok((subsystem, entry))
    }

    /// Release may switch a console program to the Windows subsystem
    pub fn can_switch_release(subsystem: Subsystem) -> bool {
        subsystem == Subsystem::Console
    }
}

fn entry_name(entry: EntryPoint) -> &'static str {
    match entry {
        EntryPoint::Main | EntryPoint::MainArgs => "main",
        EntryPoint::WMain => "wmain",
        EntryPoint::WinMain => "WinMain",
        EntryPoint::WWinMain => "wWinMain",
    }
}

/// Add `.cpp` when the entered file name has no extension
pub fn normalize_entry_file(name: &str) -> String {
    let name = name.trim();
    if name.contains('.') {
        name.to_string()
    } else {
        format!("{}.cpp", name)
    }
}

/// Build configuration a library value applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildConfig {
    Common,
    Debug,
    Release,
}

impl BuildConfig {
    pub const ALL: [BuildConfig; 3] = [BuildConfig::Common, BuildConfig::Debug, BuildConfig::Release];

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildConfig::Common => "common",
            BuildConfig::Debug => "Debug",
            BuildConfig::Release => "Release",
        }
    }
}

/// Ordered values split by build configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLists {
    pub common: Vec<String>,
    pub debug: Vec<String>,
    pub release: Vec<String>,
}

impl ConfigLists {
    pub fn get(&self, config: BuildConfig) -> &[String] {
        match config {
            BuildConfig::Common => &self.common,
            BuildConfig::Debug => &self.debug,
            BuildConfig::Release => &self.release,
        }
    }

    pub fn get_mut(&mut self, config: BuildConfig) -> &mut Vec<String> {
        match config {
            BuildConfig::Common => &mut self.common,
            BuildConfig::Debug => &mut self.debug,
            BuildConfig::Release => &mut self.release,
        }
    }

    /// Common values followed by the ones specific to `config`
    ///
    /// `config` is `Debug` or `Release`; asking for `Common` yields only the
    /// common values.
    pub fn effective(&self, config: BuildConfig) -> impl Iterator<Item = &str> {
        let specific: &[String] = match config {
            BuildConfig::Common => &[],
            other => self.get(other),
        };
        self.common.iter().chain(specific).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.common.is_empty() && self.debug.is_empty() && self.release.is_empty()
    }
}

/// A third-party library living under the library directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Library {
    pub name: String,
    /// Include directory relative to the library root
    pub include_dir: String,
    /// Directories holding `.lib` files, relative to the library root
    pub lib_dirs: ConfigLists,
    pub lib_files: ConfigLists,
    /// Directories holding DLLs, relative to the library root
    pub dll_dirs: ConfigLists,
    pub dll_files: ConfigLists,
}

impl Library {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            include_dir: "include".to_string(),
            ..Self::default()
        }
    }

    pub fn ships_dlls(&self) -> bool {
        !self.dll_files.is_empty()
    }
}

/// Strip the separators users tend to type after a directory name
pub fn clean_library_name(name: &str) -> String {
    name.trim().trim_end_matches(['\\', '/']).to_string()
}

/// Everything the generators need, fixed once the session is over
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectParams {
    pub name: String,
    pub directories: DirectoryLayout,
    pub pch: Pch,
    pub startup: Startup,
    /// Folder under the output directory that receives the assets
    pub asset_folder: String,
    pub libraries: Vec<Library>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_directory_layout_from_row() {
        let layout =
            DirectoryLayout::from_row(&row(&["Source", "Bin", "Int", "Lib", "Assets", "Workspace"]))
                .unwrap();
        assert_eq!(layout.binary, "Bin");
        assert_eq!(layout.workspace, "Workspace");
        assert_eq!(layout.labeled().next(), Some(("Source", "Source")));
    }

    #[test]
    fn test_directory_layout_rejects_paths() {
        assert!(DirectoryLayout::from_row(&row(&["a/b", "b", "c", "d", "e", "f"])).is_err());
        assert!(DirectoryLayout::from_row(&row(&["a", "b"])).is_err());
    }

    #[test]
    fn test_pch_rows() {
        assert_eq!(Pch::from_row(&row(&["No", "None", "None"])).unwrap(), Pch::None);
        let pch = Pch::from_row(&row(&["Yes", "pch.h", "pch.cpp"])).unwrap();
        assert_eq!(pch.header(), Some("pch.h"));
        assert_eq!(pch.source(), Some("pch.cpp"));
        assert!(Pch::from_row(&row(&["Maybe", "a.h", "a.cpp"])).is_err());
        assert!(Pch::from_row(&row(&["Yes", "None", "None"])).is_err());
        assert!(Pch::from_row(&row(&["Yes", "../pch.h", "pch.cpp"])).is_err());
    }

    #[test]
    fn test_plain_names_stay_inside_parent() {
        assert!(is_plain_name("main.cpp"));
        assert!(is_plain_name("My Assets"));
        for bad in ["", "  ", ".", "..", "../main.cpp", "/tmp/x.cpp", "C:x", "a\\b", "as\"set"] {
            assert!(!is_plain_name(bad), "{:?} accepted", bad);
        }
    }

    #[test]
    fn test_relative_paths() {
        assert!(is_relative_path("lib\\x64"));
        assert!(is_relative_path("include/SDL2"));
        for bad in ["", "\\lib", "/usr/lib", "C:\\lib", "lib\\..\\..", "li\"b"] {
            assert!(!is_relative_path(bad), "{:?} accepted", bad);
        }
    }

    #[test]
    fn test_entry_point_parse() {
        assert_eq!(EntryPoint::parse("main()"), Some(EntryPoint::Main));
        assert_eq!(
            EntryPoint::parse("main(int argc, char* argv[])"),
            Some(EntryPoint::MainArgs)
        );
        assert_eq!(
            EntryPoint::parse("wmain(int argc, wchar_t* argv[], wchar_t* envp[])"),
            Some(EntryPoint::WMain)
        );
        assert_eq!(EntryPoint::parse("WinMain(...)"), Some(EntryPoint::WinMain));
        assert_eq!(EntryPoint::parse("wWinMain(...)"), Some(EntryPoint::WWinMain));
        assert_eq!(EntryPoint::parse("start"), None);
        assert_eq!(EntryPoint::WMain.startup_symbol(), "wmainCRTStartup");
    }

    #[test]
    fn test_gui_entry_needs_windows_subsystem() {
        assert!(Startup::parse_row(&row(&["Console", "WinMain(...)"])).is_err());
        assert_eq!(
            Startup::parse_row(&row(&["Windows", "main()"])).unwrap(),
            (Subsystem::Windows, EntryPoint::Main)
        );
    }

    #[test]
    fn test_entry_file_gets_extension() {
        assert_eq!(normalize_entry_file("main"), "main.cpp");
        assert_eq!(normalize_entry_file("app.cc"), "app.cc");
    }

    #[test]
    fn test_library_name_cleanup() {
        assert_eq!(clean_library_name("SDL2\\"), "SDL2");
        assert_eq!(clean_library_name(" glfw/ "), "glfw");
    }

    #[test]
    fn test_effective_lists_put_common_first() {
        let mut lists = ConfigLists::default();
        lists.get_mut(BuildConfig::Common).push("a.lib".into());
        lists.get_mut(BuildConfig::Debug).push("b_d.lib".into());
        lists.get_mut(BuildConfig::Release).push("b.lib".into());

        let debug: Vec<_> = lists.effective(BuildConfig::Debug).collect();
        assert_eq!(debug, vec!["a.lib", "b_d.lib"]);
        let release: Vec<_> = lists.effective(BuildConfig::Release).collect();
        assert_eq!(release, vec!["a.lib", "b.lib"]);
        let common: Vec<_> = lists.effective(BuildConfig::Common).collect();
        assert_eq!(common, vec!["a.lib"]);
    }
}
