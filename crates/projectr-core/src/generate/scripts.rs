//! Batch scripts for building, running and cleaning the project

use super::{Artifact, Generator};
use crate::params::ProjectParams;
use anyhow::Result;

pub struct ScriptGenerator;

impl Generator for ScriptGenerator {
    fn name(&self) -> &'static str {
        "Scripts"
    }

    fn artifacts(&self, params: &ProjectParams) -> Result<Vec<Artifact>> {
        Ok(vec![
            Artifact::new("Build script", "build.bat", build_script(params)),
            Artifact::new("Run script", "run.bat", run_script(params)),
            Artifact::new("Clean script", "clean.bat", clean_script(params)),
        ])
    }
}

/// Lines joined with CRLF, as cmd.exe expects
fn batch(lines: &[String]) -> String {
    let mut out = lines.join("\r\n");
    out.push_str("\r\n");
    out
}

/// Shared prologue: work from the script's folder, pick the configuration
fn prologue() -> Vec<String> {
    vec![
        "@echo off".to_string(),
        "setlocal".to_string(),
        "cd /d \"%~dp0\"".to_string(),
        "set CONFIG=%~1".to_string(),
        "if \"%CONFIG%\"==\"\" set CONFIG=Debug".to_string(),
    ]
}

pub fn build_script(params: &ProjectParams) -> String {
    let mut lines = prologue();
    lines.push(format!(
        "msbuild \"{}.vcxproj\" /nologo /m /p:Configuration=%CONFIG% /p:Platform=x64",
        params.name
    ));
    lines.push("exit /b %ERRORLEVEL%".to_string());
    batch(&lines)
}

pub fn run_script(params: &ProjectParams) -> String {
    let mut lines = prologue();
    let exe = format!(
        "{}\\{}-x64-%CONFIG%\\{}.exe",
        params.directories.binary, params.name, params.name
    );
    lines.push(format!("if not exist \"{}\" call build.bat %CONFIG%", exe));
    lines.push("if errorlevel 1 exit /b %ERRORLEVEL%".to_string());
    lines.push(format!("pushd \"{}\\{}-x64-%CONFIG%\"", params.directories.binary, params.name));
    lines.push(format!("\"{}.exe\" %2 %3 %4 %5 %6 %7 %8 %9", params.name));
    lines.push("set RESULT=%ERRORLEVEL%".to_string());
    lines.push("popd".to_string());
    lines.push("exit /b %RESULT%".to_string());
    batch(&lines)
}

pub fn clean_script(params: &ProjectParams) -> String {
    let mut lines = vec![
        "@echo off".to_string(),
        "cd /d \"%~dp0\"".to_string(),
    ];
    for dir in [&params.directories.binary, &params.directories.intermediate] {
        lines.push(format!("if exist \"{0}\" rmdir /s /q \"{0}\"", dir));
    }
    lines.push(format!("echo Cleaned {}", params.name));
    batch(&lines)
}
