//! MSBuild C++ project file (`<Name>.vcxproj`)

use super::xml::Element;
use super::{Artifact, Generator};
use crate::params::{BuildConfig, Library, ProjectParams, Subsystem};
use anyhow::Result;

const MSBUILD_NS: &str = "http://schemas.microsoft.com/developer/msbuild/2003";
const PLATFORM: &str = "x64";
const PLATFORM_DEFINES: &[&str] = &["BUILD_X64", "BUILD_WINDOWS"];

/// Per-configuration project settings
struct Configuration {
    build: BuildConfig,
    debug_libraries: bool,
    whole_program_optimization: bool,
    incremental_link: bool,
    optimize: bool,
    defines: &'static [&'static str],
    subsystem: Subsystem,
}

impl Configuration {
    fn name(&self) -> &'static str {
        self.build.as_str()
    }

    fn condition(&self) -> String {
        format!("'$(Configuration)'=='{}'", self.name())
    }
}

fn configurations(params: &ProjectParams) -> [Configuration; 2] {
    [
        Configuration {
            build: BuildConfig::Debug,
            debug_libraries: true,
            whole_program_optimization: false,
            incremental_link: true,
            optimize: false,
            defines: &["_DEBUG", "BUILD_DEBUG"],
            subsystem: params.startup.debug_subsystem,
        },
        Configuration {
            build: BuildConfig::Release,
            debug_libraries: false,
            whole_program_optimization: true,
            incremental_link: false,
            optimize: true,
            defines: &["NDEBUG", "BUILD_RELEASE", "BUILD_OPTIMIZED"],
            subsystem: params.startup.release_subsystem,
        },
    ]
}

fn flag(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn import(project: &str) -> Element {
    Element::new("Import").attr("Project", project)
}

pub struct MsBuildGenerator;

impl Generator for MsBuildGenerator {
    fn name(&self) -> &'static str {
        "Project file"
    }

    fn artifacts(&self, params: &ProjectParams) -> Result<Vec<Artifact>> {
        Ok(vec![Artifact::new(
            "Project file",
            format!("{}.vcxproj", params.name),
            project_file(params),
        )])
    }
}

/// Render the whole project file
pub fn project_file(params: &ProjectParams) -> String {
    let configs = configurations(params);
    let dirs = &params.directories;
    let source = format!("$(ProjectDir){}\\", dirs.source);

    let mut project = Element::new("Project")
        .attr("DefaultTargets", "Build")
        .attr("ToolsVersion", "16.0")
        .attr("ReplaceWildcardsInProjectItems", "true")
        .attr("xmlns", MSBUILD_NS);

    project.comment(" Configurations and platforms ");
    let mut item_group = Element::new("ItemGroup").attr("Label", "ProjectConfigurations");
    for config in &configs {
        item_group.push(
            Element::new("ProjectConfiguration")
                .attr("Include", format!("{}|{}", config.name(), PLATFORM))
                .child(Element::text("Configuration", config.name()))
                .child(Element::text("Platform", PLATFORM)),
        );
    }
    project.push(item_group);

    project.comment(" Property settings ");
    project.push(import("$(VCTargetsPath)\\Microsoft.Cpp.default.props"));

    let mut globals = Element::new("PropertyGroup").attr("Label", "Globals");
    globals.push_text("RootNamespace", params.name.as_str());
    globals.push_text("ConfigurationType", "Application");
    globals.push_text("PlatformToolset", "v143");
    globals.push_text("PreferredToolArchitecture", "x64");
    project.push(globals);

    for config in &configs {
        let mut group = Element::new("PropertyGroup").attr("Condition", config.condition());
        group.push_text("UseDebugLibraries", flag(config.debug_libraries));
        group.push_text(
            "WholeProgramOptimization",
            flag(config.whole_program_optimization),
        );
        group.push_text("LinkIncremental", flag(config.incremental_link));
        project.push(group);
    }

    project.push(import("$(VCTargetsPath)\\Microsoft.Cpp.props"));

    let mut output_dirs = Element::new("PropertyGroup");
    output_dirs.push_text(
        "OutDir",
        format!(
            "$(ProjectDir){}\\$(ProjectName)-$(Platform)-$(Configuration)\\",
            dirs.binary
        ),
    );
    output_dirs.push_text(
        "IntDir",
        format!(
            "$(ProjectDir){}\\$(ProjectName)-$(Platform)-$(Configuration)\\",
            dirs.intermediate
        ),
    );
    project.push(output_dirs);

    project.comment(" Definition settings ");
    let mut compile = Element::new("ClCompile");
    compile.push_text("WarningLevel", "Level3");
    compile.push_text("SDLCheck", "true");
    compile.push_text("ConformanceMode", "true");
    compile.push_text("LanguageStandard", "stdcpp20");
    compile.push_text("FunctionLevelLinking", "true");
    if let Some(header) = params.pch.header() {
        compile.push_text("PrecompiledHeader", "Use");
        compile.push_text("PrecompiledHeaderFile", header);
    }
    let includes: Vec<String> = params
        .libraries
        .iter()
        .map(|lib| format!("{}{}", library_root(params, lib), lib.include_dir))
        .collect();
    if !includes.is_empty() {
        compile.push_text(
            "AdditionalIncludeDirectories",
            with_inherited(&includes, "AdditionalIncludeDirectories"),
        );
    }
    project.push(
        Element::new("ItemDefinitionGroup")
            .child(compile)
            .child(Element::new("Link").child(Element::text("GenerateDebugInformation", "true"))),
    );

    let entry_symbol = params.startup.entry.startup_symbol();
    for config in &configs {
        let mut link = Element::new("Link");
        link.push_text("SubSystem", config.subsystem.as_str());
        link.push_text("EntryPointSymbol", entry_symbol);
        link.push_text("OptimizeReferences", flag(config.optimize));
        link.push_text("EnableCOMDATFolding", flag(config.optimize));

        let lib_dirs = library_values(params, config.build, |lib| &lib.lib_dirs, true);
        if !lib_dirs.is_empty() {
            link.push_text(
                "AdditionalLibraryDirectories",
                with_inherited(&lib_dirs, "AdditionalLibraryDirectories"),
            );
        }
        let lib_files = library_values(params, config.build, |lib| &lib.lib_files, false);
        if !lib_files.is_empty() {
            link.push_text(
                "AdditionalDependencies",
                with_inherited(&lib_files, "AdditionalDependencies"),
            );
        }

        project.push(
            Element::new("ItemDefinitionGroup")
                .attr("Condition", config.condition())
                .child(link),
        );
    }

    project.comment(" Preprocessor definitions ");
    for config in &configs {
        let defines: Vec<String> = config
            .defines
            .iter()
            .chain(PLATFORM_DEFINES)
            .map(|d| d.to_string())
            .collect();
        project.push(
            Element::new("ItemDefinitionGroup")
                .attr(
                    "Condition",
                    format!(
                        "'$(Configuration)|$(Platform)'=='{}|{}'",
                        config.name(),
                        PLATFORM
                    ),
                )
                .child(Element::new("ClCompile").child(Element::text(
                    "PreprocessorDefinitions",
                    with_inherited(&defines, "PreprocessorDefinitions"),
                ))),
        );
    }

    project.comment(" Post-build events ");
    for config in &configs {
        project.push(
            Element::new("ItemDefinitionGroup")
                .attr("Condition", config.condition())
                .child(Element::new("PostBuildEvent").child(Element::text(
                    "Command",
                    post_build_commands(params, config.build).join("\n"),
                ))),
        );
    }

    project.comment(" File arguments ");
    let mut sources = Element::new("ItemGroup");
    if let Some(pch_source) = params.pch.source() {
        sources.push(
            Element::new("ClCompile")
                .attr("Include", format!("{}{}", source, pch_source))
                .child(Element::text("PrecompiledHeader", "Create")),
        );
    }
    for pattern in ["*.cpp", "*.c"] {
        let mut wildcard =
            Element::new("_WildCardClCompile").attr("Include", format!("{}{}", source, pattern));
        if let Some(pch_source) = params.pch.source() {
            wildcard = wildcard.attr("Exclude", format!("{}{}", source, pch_source));
        }
        sources.push(wildcard);
    }
    project.push(sources);

    let mut headers = Element::new("ItemGroup");
    for pattern in ["*.h", "*.hpp"] {
        headers.push(
            Element::new("_WildCardClInclude").attr("Include", format!("{}{}", source, pattern)),
        );
    }
    project.push(headers);

    project.push(
        Element::new("Target")
            .attr("Name", "AddWildCardItems")
            .attr("AfterTargets", "BuildGenerateSources")
            .child(
                Element::new("ItemGroup")
                    .child(Element::new("ClCompile").attr("Include", "@(_WildCardClCompile)")),
            )
            .child(
                Element::new("ItemGroup")
                    .child(Element::new("ClInclude").attr("Include", "@(_WildCardClInclude)")),
            ),
    );

    project.push(import("$(VCTargetsPath)\\Microsoft.Cpp.Targets"));

    project.to_document()
}

/// `$(ProjectDir)<Lib>\<name>\`
fn library_root(params: &ProjectParams, lib: &Library) -> String {
    format!(
        "$(ProjectDir){}\\{}\\",
        params.directories.library, lib.name
    )
}

/// Values from every library for `config`, optionally prefixed with the library root
fn library_values(
    params: &ProjectParams,
    config: BuildConfig,
    lists: impl Fn(&Library) -> &crate::params::ConfigLists,
    rooted: bool,
) -> Vec<String> {
    params
        .libraries
        .iter()
        .flat_map(|lib| {
            let root = if rooted {
                library_root(params, lib)
            } else {
                String::new()
            };
            lists(lib)
                .effective(config)
                .map(move |value| format!("{}{}", root, value))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn with_inherited(values: &[String], property: &str) -> String {
    format!("{};%({})", values.join(";"), property)
}

/// Asset copy plus one guarded copy per DLL candidate location
fn post_build_commands(params: &ProjectParams, config: BuildConfig) -> Vec<String> {
    let mut commands = vec![format!(
        "xcopy /y /e /q /i \"$(ProjectDir){}\" \"$(OutDir){}\\\"",
        params.directories.assets, params.asset_folder
    )];

    for lib in params.libraries.iter().filter(|lib| lib.ships_dlls()) {
        let root = library_root(params, lib);
        let dirs: Vec<&str> = lib.dll_dirs.effective(config).collect();
        for file in lib.dll_files.effective(config) {
            if dirs.is_empty() {
                commands.push(copy_if_exists(&format!("{}{}", root, file)));
            }
            for dir in &dirs {
                commands.push(copy_if_exists(&format!("{}{}\\{}", root, dir, file)));
            }
        }
    }

    commands
}

fn copy_if_exists(path: &str) -> String {
    format!("if exist \"{0}\" xcopy /y /q \"{0}\" \"$(OutDir)\"", path)
}
