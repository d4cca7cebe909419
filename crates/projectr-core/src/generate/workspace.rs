//! Editor workspace file (`<Workspace>/<Name>.code-workspace`)

use super::{Artifact, Generator};
use crate::params::ProjectParams;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;
use std::path::Path;

pub struct WorkspaceGenerator;

#[derive(Serialize)]
struct Workspace {
    folders: Vec<Folder>,
    settings: serde_json::Value,
    tasks: Tasks,
}

#[derive(Serialize)]
struct Folder {
    name: String,
    path: String,
}

#[derive(Serialize)]
struct Tasks {
    version: &'static str,
    tasks: Vec<Task>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Task {
    label: String,
    #[serde(rename = "type")]
    kind: &'static str,
    command: String,
    args: Vec<String>,
    options: serde_json::Value,
    problem_matcher: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<serde_json::Value>,
}

impl Task {
    fn script(label: &str, script: &str, args: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            kind: "shell",
            command: format!("${{workspaceFolder:{}}}\\{}", FOLDER_NAME, script),
            args: args.iter().map(|a| a.to_string()).collect(),
            options: json!({ "cwd": format!("${{workspaceFolder:{}}}", FOLDER_NAME) }),
            problem_matcher: Vec::new(),
            group: None,
        }
    }
}

const FOLDER_NAME: &str = "Project";

impl Generator for WorkspaceGenerator {
    fn name(&self) -> &'static str {
        "Workspace"
    }

    fn artifacts(&self, params: &ProjectParams) -> Result<Vec<Artifact>> {
        let path = Path::new(&params.directories.workspace)
            .join(format!("{}.code-workspace", params.name));
        Ok(vec![Artifact::new(
            "Workspace file",
            path,
            workspace_file(params)?,
        )])
    }
}

pub fn workspace_file(params: &ProjectParams) -> Result<String> {
    let dirs = &params.directories;
    let exclude: serde_json::Map<String, serde_json::Value> = [&dirs.binary, &dirs.intermediate]
        .into_iter()
        .map(|dir| (format!("{}/**", dir), json!(true)))
        .collect();

    let mut build = Task::script("Build (Debug)", "build.bat", &["Debug"]);
    build.problem_matcher = vec!["$msCompile"];
    build.group = Some(json!({ "kind": "build", "isDefault": true }));
    let mut release = Task::script("Build (Release)", "build.bat", &["Release"]);
    release.problem_matcher = vec!["$msCompile"];
    release.group = Some(json!("build"));

    let workspace = Workspace {
        folders: vec![Folder {
            name: FOLDER_NAME.to_string(),
            path: "..".to_string(),
        }],
        settings: json!({
            "files.exclude": exclude,
            "C_Cpp.default.cppStandard": "c++20",
            "C_Cpp.default.includePath": include_paths(params),
        }),
        tasks: Tasks {
            version: "2.0.0",
            tasks: vec![
                build,
                release,
                Task::script("Run", "run.bat", &["Debug"]),
                Task::script("Clean", "clean.bat", &[]),
            ],
        },
    };

    let mut content =
        serde_json::to_string_pretty(&workspace).context("Failed to serialize workspace file")?;
    content.push('\n');
    Ok(content)
}

fn include_paths(params: &ProjectParams) -> Vec<String> {
    let root = format!("${{workspaceFolder:{}}}", FOLDER_NAME);
    let mut paths = vec![format!("{}/{}", root, params.directories.source)];
    for lib in &params.libraries {
        paths.push(format!(
            "{}/{}/{}/{}",
            root,
            params.directories.library,
            lib.name,
            lib.include_dir.replace('\\', "/")
        ));
    }
    paths
}
