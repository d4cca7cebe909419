//! Starter C++ sources: precompiled header pair and entry point

use super::{Artifact, Generator};
use crate::params::{EntryPoint, Pch, ProjectParams};
use anyhow::Result;
use std::path::Path;

pub struct SourceGenerator;

impl Generator for SourceGenerator {
    fn name(&self) -> &'static str {
        "Sources"
    }

    fn artifacts(&self, params: &ProjectParams) -> Result<Vec<Artifact>> {
        let source_dir = Path::new(&params.directories.source);
        let mut artifacts = Vec::new();

        if let Pch::Use { header, source } = &params.pch {
            artifacts.push(Artifact::new(
                "PCH header",
                source_dir.join(header),
                "#pragma once\n",
            ));
            artifacts.push(Artifact::new(
                "PCH source",
                source_dir.join(source),
                format!("#include \"{}\"\n", header),
            ));
        }

        artifacts.push(Artifact::new(
            "Entry point file",
            source_dir.join(&params.startup.entry_file),
            entry_source(params.startup.entry, params.pch.header()),
        ));

        Ok(artifacts)
    }
}

/// Body of the entry source file, including the PCH header first if any
pub fn entry_source(entry: EntryPoint, pch_header: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(header) = pch_header {
        out.push_str(&format!("#include \"{}\"\n\n", header));
    }

    match entry {
        EntryPoint::Main => out.push_str("int main()\n"),
        EntryPoint::MainArgs => out.push_str("int main(int argc, char* argv[])\n"),
        EntryPoint::WMain => {
            out.push_str("int wmain(int argc, wchar_t* argv[], wchar_t* envp[])\n")
        }
        EntryPoint::WinMain | EntryPoint::WWinMain => {
            let (name, args) = if entry == EntryPoint::WinMain {
                ("WinMain", "LPSTR")
            } else {
                ("wWinMain", "LPWSTR")
            };
            out.push_str("#include <Windows.h>\n\n");
            out.push_str(&format!(
                "int __stdcall {}(\n\
                 \tHINSTANCE instance,\n\
                 \tHINSTANCE previousInstance,\n\
                 \t{} arguments,\n\
                 \tint showCommand)\n",
                name, args
            ));
        }
    }

    out.push_str("{\n\n\treturn 0;\n}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::fixtures;
    use std::path::PathBuf;

    #[test]
    fn test_no_pch_only_entry_file() {
        let artifacts = SourceGenerator.artifacts(&fixtures::params()).unwrap();
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].path, PathBuf::from("Source").join("main.cpp"));
        assert_eq!(artifacts[0].content, "int main()\n{\n\n\treturn 0;\n}\n");
    }

    #[test]
    fn test_pch_pair_and_include() {
        let mut params = fixtures::params();
        params.pch = Pch::Use {
            header: "core.h".into(),
            source: "core.cpp".into(),
        };
        params.startup.entry = EntryPoint::WWinMain;

        let artifacts = SourceGenerator.artifacts(&params).unwrap();
        assert_eq!(artifacts.len(), 3);
        assert_eq!(artifacts[0].content, "#pragma once\n");
        assert_eq!(artifacts[1].content, "#include \"core.h\"\n");

        let entry = &artifacts[2].content;
        assert!(entry.starts_with("#include \"core.h\"\n\n#include <Windows.h>"));
        assert!(entry.contains("int __stdcall wWinMain("));
        assert!(entry.contains("\tLPWSTR arguments,"));
    }

    #[test]
    fn test_wmain_signature() {
        let source = entry_source(EntryPoint::WMain, None);
        assert!(source.starts_with("int wmain(int argc, wchar_t* argv[], wchar_t* envp[])"));
    }
}
