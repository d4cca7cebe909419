//! File generators consuming the collected project parameters
//!
//! This module provides:
//! - C++ sources implied by the PCH and entry point choices
//! - The MSBuild project file
//! - Build, run and clean batch scripts
//! - The editor workspace file
//!
//! Generators only produce [`Artifact`]s. Writing them is done by
//! [`write_artifacts`], which reports every file and keeps going when one
//! fails.

pub mod msbuild;
pub mod scripts;
pub mod sources;
pub mod workspace;
pub mod xml;

use crate::output::Writer;
use crate::params::ProjectParams;
use crate::term::Terminal;
use crate::theme::Theme;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub use msbuild::MsBuildGenerator;
pub use scripts::ScriptGenerator;
pub use sources::SourceGenerator;
pub use workspace::WorkspaceGenerator;

/// A file to be written, relative to the project directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Short description shown in the report
    pub label: String,
    pub path: PathBuf,
    pub content: String,
}

impl Artifact {
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Turns project parameters into files
pub trait Generator {
    fn name(&self) -> &'static str;

    fn artifacts(&self, params: &ProjectParams) -> Result<Vec<Artifact>>;
}

/// The generators run for every project, in order
pub fn default_generators() -> Vec<Box<dyn Generator>> {
    vec![
        Box::new(SourceGenerator),
        Box::new(MsBuildGenerator),
        Box::new(ScriptGenerator),
        Box::new(WorkspaceGenerator),
    ]
}

/// What happened to each artifact
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub created: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl GenerationReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Run every generator and write its artifacts under `project_dir`
///
/// A generator or file that fails is reported in the error theme and skipped;
/// only terminal errors abort.
pub fn generate_all<T: Terminal>(
    out: &mut Writer<T>,
    generators: &[Box<dyn Generator>],
    params: &ProjectParams,
    project_dir: &Path,
) -> Result<GenerationReport> {
    let mut report = GenerationReport::default();

    for generator in generators {
        match generator.artifacts(params) {
            Ok(artifacts) => write_artifacts(out, project_dir, &artifacts, &mut report)?,
            Err(e) => {
                tracing::warn!(generator = generator.name(), error = %e, "generator failed");
                out.row(generator.name(), &format!("Failed: {:#}", e), Theme::Error)?;
                report
                    .failed
                    .push((PathBuf::from(generator.name()), format!("{:#}", e)));
            }
        }
    }

    Ok(report)
}

/// Write artifacts one by one, reporting each file
pub fn write_artifacts<T: Terminal>(
    out: &mut Writer<T>,
    project_dir: &Path,
    artifacts: &[Artifact],
    report: &mut GenerationReport,
) -> Result<()> {
    for artifact in artifacts {
        let target = project_dir.join(&artifact.path);
        match write_file(&target, &artifact.content) {
            Ok(()) => {
                tracing::debug!(path = %target.display(), "artifact written");
                out.row(&artifact.label, &display_path(&artifact.path), Theme::Good)?;
                report.created.push(artifact.path.clone());
            }
            Err(e) => {
                tracing::warn!(path = %target.display(), error = %e, "artifact failed");
                out.row(&artifact.label, &format!("Failed: {:#}", e), Theme::Error)?;
                report.failed.push((artifact.path.clone(), format!("{:#}", e)));
            }
        }
    }
    Ok(())
}

fn write_file(target: &Path, content: &str) -> Result<()> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(target, content)
        .with_context(|| format!("Failed to write file: {}", target.display()))
}

/// Project-relative path in the Windows form used inside generated files
pub fn display_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("\\")
}
