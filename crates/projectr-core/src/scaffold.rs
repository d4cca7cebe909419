//! Interactive scaffolding session
//!
//! Sequences the prompts that collect a [`ProjectParams`], creates the
//! directory tree and hands the result to the generators.

use crate::generate::{self, GenerationReport};
use crate::output::Writer;
use crate::params::{
    clean_library_name, is_plain_name, is_relative_path, normalize_entry_file, BuildConfig,
    ConfigLists, DirectoryLayout, Library, Pch, ProjectParams, Startup, Subsystem,
};
use crate::preset::{PresetCatalog, PresetTable};
use crate::term::Terminal;
use crate::theme::Theme;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Column the label/value rows are padded to
pub const ALIGN_COLUMN: u16 = 34;
pub const ALIGN_FILL: char = '.';

const BANNER: &str = "-------------";

/// What the command line asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Create { name: String },
    Usage,
}

impl Invocation {
    /// Exactly one project name is accepted; `help` in any of its
    /// `/help`, `-help`, `--help` spellings asks for usage
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Self {
        let args: Vec<&str> = args
            .iter()
            .map(|a| a.as_ref().trim_matches(['/', '-', ' ']))
            .collect();

        match args.as_slice() {
            [name] if !name.eq_ignore_ascii_case("help") && is_valid_name(name) => {
                Invocation::Create {
                    name: name.to_string(),
                }
            }
            _ => Invocation::Usage,
        }
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', ':', '*', '?', '"', '<', '>', '|'])
}

/// How a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created {
        project_dir: PathBuf,
        files: usize,
        failures: usize,
    },
    Usage,
    Aborted,
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Created { failures: 0, .. } => 0,
            Outcome::Created { .. } | Outcome::Aborted => 1,
            Outcome::Usage => 2,
        }
    }
}

/// Session settings
#[derive(Debug, Clone)]
pub struct ScaffoldOptions {
    /// Directory the project directory is created in
    pub base_dir: PathBuf,
    pub presets: PresetCatalog,
}

/// Run a full session, framed by the banner lines
pub fn run<T: Terminal>(
    out: &mut Writer<T>,
    args: &[String],
    options: &ScaffoldOptions,
) -> Result<Outcome> {
    out.set_theme(Theme::Default);
    out.write_line(&format!("{}\n", BANNER))?;

    let outcome = session(out, args, options);

    out.set_alignment(0, ' ');
    out.set_theme(Theme::Default);
    let closing = out.write_line(&format!("\n{}", BANNER));

    let outcome = outcome?;
    closing?;
    Ok(outcome)
}

fn session<T: Terminal>(
    out: &mut Writer<T>,
    args: &[String],
    options: &ScaffoldOptions,
) -> Result<Outcome> {
    let name = match Invocation::parse(args) {
        Invocation::Create { name } => name,
        Invocation::Usage => {
            print_usage(out)?;
            return Ok(Outcome::Usage);
        }
    };

    let project_dir = options.base_dir.join(&name);
    if is_occupied(&project_dir)? {
        tracing::info!(path = %project_dir.display(), "project directory not empty");
        out.color_write_line("Error\n", Theme::Error)?;
        out.color_write_line(
            &format!(
                "Project directory \"{}\" already exists and isn't empty. Aborting.",
                project_dir.display()
            ),
            Theme::Default,
        )?;
        return Ok(Outcome::Aborted);
    }

    std::fs::create_dir_all(&project_dir).with_context(|| {
        format!(
            "Failed to create project directory: {}",
            project_dir.display()
        )
    })?;
    tracing::info!(path = %project_dir.display(), "project directory created");

    out.set_alignment(ALIGN_COLUMN, ALIGN_FILL);
    out.row("Project", &name, Theme::Highlight)?;
    out.row("Location", &project_dir.display().to_string(), Theme::Subtext)?;

    let directories = choose_directories(out, &options.presets.directories, &project_dir)?;
    let pch = choose_pch(out, &options.presets.pch)?;
    let startup = choose_startup(out, &options.presets.subsystem, &directories)?;
    let libraries = collect_libraries(out, &directories)?;

    out.section("\nOutput", Theme::Subtext)?;
    let asset_folder = out
        .read_line_checked(
            "Enter the desired name for the asset output folder: ",
            true,
            false,
            |answer| is_plain_name(answer.trim()),
        )?
        .trim()
        .to_string();
    out.row("Asset output folder", &asset_folder, Theme::Highlight)?;

    let params = ProjectParams {
        name,
        directories,
        pch,
        startup,
        asset_folder,
        libraries,
    };
    tracing::debug!(?params, "parameters collected");

    out.section("\nFiles", Theme::Subtext)?;
    let report = generate::generate_all(
        out,
        &generate::default_generators(),
        &params,
        &project_dir,
    )?;

    let files = count_files(&project_dir);
    print_summary(out, &params, &project_dir, files, &report)?;

    Ok(Outcome::Created {
        project_dir,
        files,
        failures: report.failed.len(),
    })
}

fn print_usage<T: Terminal>(out: &mut Writer<T>) -> Result<()> {
    out.color_write_line("Error\n", Theme::Error)?;
    out.color_write_line("Usage:", Theme::Subtext)?;
    out.color_write("projectr ProjectName   ", Theme::Highlight)?;
    out.color_write_line("Create a new project (initiate sequence).", Theme::Subtext)?;
    out.color_write("projectr help          ", Theme::Highlight)?;
    out.color_write_line("Show this message.", Theme::Subtext)?;
    Ok(())
}

/// An existing file, or a directory with anything in it
fn is_occupied(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    if !path.is_dir() {
        return Ok(true);
    }
    let mut entries = std::fs::read_dir(path)
        .with_context(|| format!("Failed to read directory: {}", path.display()))?;
    Ok(entries.next().is_some())
}

/// Show the confirmed preset so it stays on screen after the chooser is gone
fn echo_preset<T: Terminal>(out: &mut Writer<T>, table: &PresetTable, index: usize) -> Result<()> {
    for (category, value) in table.categories().iter().zip(table.row(index)) {
        out.row(category, value, Theme::Highlight)?;
    }
    Ok(())
}

fn choose_directories<T: Terminal>(
    out: &mut Writer<T>,
    table: &PresetTable,
    project_dir: &Path,
) -> Result<DirectoryLayout> {
    out.section("\nDirectories", Theme::Subtext)?;
    let index = out.choose_preset(table, Theme::Highlight)?;
    echo_preset(out, table, index)?;

    let layout = DirectoryLayout::from_row(table.row(index)).map_err(anyhow::Error::msg)?;
    for (label, dir) in layout.labeled() {
        let path = project_dir.join(dir);
        std::fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        tracing::debug!(label, path = %path.display(), "directory created");
    }
    tracing::info!(preset = index, "directories created");
    out.row("Directories", "Created", Theme::Good)?;

    Ok(layout)
}

fn choose_pch<T: Terminal>(out: &mut Writer<T>, table: &PresetTable) -> Result<Pch> {
    out.section("\nPrecompiled header", Theme::Subtext)?;
    let index = out.choose_preset(table, Theme::Highlight)?;
    echo_preset(out, table, index)?;
    tracing::info!(preset = index, "PCH chosen");

    Pch::from_row(table.row(index)).map_err(anyhow::Error::msg)
}

fn choose_startup<T: Terminal>(
    out: &mut Writer<T>,
    table: &PresetTable,
    directories: &DirectoryLayout,
) -> Result<Startup> {
    out.section("\nSubsystem and entry point", Theme::Subtext)?;
    let index = out.choose_preset(table, Theme::Highlight)?;
    echo_preset(out, table, index)?;
    tracing::info!(preset = index, "subsystem chosen");

    let (subsystem, entry) = Startup::parse_row(table.row(index)).map_err(anyhow::Error::msg)?;

    let entry_file = normalize_entry_file(&out.read_line_checked(
        "Enter the desired name for the entry point source file: ",
        true,
        false,
        |answer| is_plain_name(&normalize_entry_file(answer)),
    )?);
    out.row(
        "Entry point file",
        &format!("{}\\{}", directories.source, entry_file),
        Theme::Highlight,
    )?;

    let mut release_subsystem = subsystem;
    if Startup::can_switch_release(subsystem) {
        let switch = out.read_yes_no(
            "Set subsystem to Windows (same entry point) for Release configuration? (Y/N) ",
            true,
        )?;
        if switch {
            release_subsystem = Subsystem::Windows;
        }
        out.row(
            "Release subsystem",
            release_subsystem.as_str(),
            Theme::Warning,
        )?;
    }

    Ok(Startup {
        debug_subsystem: subsystem,
        release_subsystem,
        entry,
        entry_file,
    })
}

fn collect_libraries<T: Terminal>(
    out: &mut Writer<T>,
    directories: &DirectoryLayout,
) -> Result<Vec<Library>> {
    out.section("\nLibraries", Theme::Subtext)?;
    let mut libraries = Vec::new();

    while out.read_yes_no("Add a library? (Y/N) ", true)? {
        if let Some(library) = read_library(out, directories)? {
            libraries.push(library);
        }
    }

    if libraries.is_empty() {
        out.row("Libraries", "None", Theme::Subtext)?;
    }
    Ok(libraries)
}

/// Ask for one library; `None` when the user discards it at the end
fn read_library<T: Terminal>(
    out: &mut Writer<T>,
    directories: &DirectoryLayout,
) -> Result<Option<Library>> {
    let name = clean_library_name(&out.read_line_checked(
        &format!("Enter library name: {}\\", directories.library),
        true,
        false,
        |answer| is_plain_name(&clean_library_name(answer)),
    )?);
    out.row("Library", &name, Theme::Highlight)?;

    let root = format!("{}\\{}\\", directories.library, name);
    let mut library = Library::new(name.as_str());

    let include = out.read_line_checked(
        &format!("Include directory, blank for \"include\": {}", root),
        true,
        true,
        |answer| is_relative_path(&clean_library_name(answer)),
    )?;
    let include = clean_library_name(&include);
    if !include.is_empty() {
        library.include_dir = include;
    }
    out.row(
        "Include directory",
        &format!("{}{}", root, library.include_dir),
        Theme::Highlight,
    )?;

    let split = out.read_yes_no("Separate Debug/Release binaries? (Y/N) ", true)?;
    let configs: &[BuildConfig] = if split {
        &BuildConfig::ALL
    } else {
        &[BuildConfig::Common]
    };

    for &config in configs {
        read_list(out, &root, "Library directory", config, &mut library.lib_dirs)?;
        read_list(out, "", "Library file", config, &mut library.lib_files)?;
    }

    if out.read_yes_no("Does the library ship DLLs? (Y/N) ", true)? {
        for &config in configs {
            read_list(out, &root, "DLL directory", config, &mut library.dll_dirs)?;
            read_list(out, "", "DLL file", config, &mut library.dll_files)?;
        }
    }

    let keep = out.read_yes_no(&format!("Keep library \"{}\"? (Y/N) ", name), true)?;
    if keep {
        tracing::info!(library = %name, "library added");
        out.row(&name, "Added", Theme::Good)?;
        Ok(Some(library))
    } else {
        tracing::info!(library = %name, "library discarded");
        out.row(&name, "Discarded", Theme::Warning)?;
        Ok(None)
    }
}

/// Collect values until a blank line
///
/// Entries shown under a directory `prefix` may be relative paths; the rest
/// must be plain file names.
fn read_list<T: Terminal>(
    out: &mut Writer<T>,
    prefix: &str,
    what: &str,
    config: BuildConfig,
    lists: &mut ConfigLists,
) -> Result<()> {
    let accept: fn(&str) -> bool = if prefix.is_empty() {
        is_plain_name
    } else {
        is_relative_path
    };
    loop {
        let value = out.read_line_checked(
            &format!("{} ({}), blank to finish: {}", what, config.as_str(), prefix),
            true,
            true,
            |answer| accept(&clean_library_name(answer)),
        )?;
        let value = clean_library_name(&value);
        if value.is_empty() {
            return Ok(());
        }
        out.row(
            &format!("{} ({})", what, config.as_str()),
            &format!("{}{}", prefix, value),
            Theme::Highlight,
        )?;
        lists.get_mut(config).push(value);
    }
}

fn count_files(dir: &Path) -> usize {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .count()
}

fn print_summary<T: Terminal>(
    out: &mut Writer<T>,
    params: &ProjectParams,
    project_dir: &Path,
    files: usize,
    report: &GenerationReport,
) -> Result<()> {
    out.set_alignment(0, ' ');
    out.write_line("")?;
    out.color_write_line(
        &format!("Created {} files in {}", files, project_dir.display()),
        Theme::Good,
    )?;
    if !report.is_success() {
        out.color_write_line(
            &format!("{} file(s) could not be written", report.failed.len()),
            Theme::Warning,
        )?;
    }

    out.write_line("")?;
    out.color_write_line("  Next steps", Theme::Highlight)?;
    out.write_line("")?;
    let steps = [
        format!("cd {}", params.name),
        "build.bat".to_string(),
        "run.bat".to_string(),
    ];
    for (i, step) in steps.iter().enumerate() {
        out.write_line(&format!("  {}.  {}", i + 1, step))?;
    }
    Ok(())
}
