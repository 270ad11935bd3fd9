use std::path::{Component, Path, PathBuf};

use crate::error::{CreateError, Result};
use crate::exec::{check_version, CommandRunner};
use crate::naming::{
    escapes_base, is_valid_package_name, slugify_package_name, slugify_project_name,
    FALLBACK_PACKAGE_NAME,
};
use crate::plugin::{plugin_for, Plugin};
use crate::project::{PackageManager, ProjectConfig, TemplateKind};
use crate::prompt::{
    Choice, Prompter, TextPrompt, PACKAGE_DESCRIPTION_QUESTION, PACKAGE_MANAGER_QUESTION,
    PACKAGE_NAME_QUESTION, PROJECT_NAME_QUESTION, PROJECT_TEMPLATE_QUESTION,
};

/// Entries that do not make a directory count as non-empty, and that
/// "remove files" leaves in place.
pub const IGNORED_ENTRIES: &[&str] = &[".git", ".idea", ".vscode"];

const DEFAULT_PROJECT_NAME: &str = "untitled";
const DEFAULT_DESCRIPTION: &str = "My project description.";

/// Answers supplied on the command line, each of which skips a question.
#[derive(Debug, Default, Clone)]
pub struct PromptArgs {
    pub directory: Option<String>,
    pub template: Option<String>,
    pub overwrite: bool,
    /// Report instead of removing files when clearing a directory.
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conflict {
    Cancel,
    Remove,
    Ignore,
}

/// Run the ordered question sequence and bind the template's plugin.
///
/// `cwd` is the directory the project name is resolved against. Package
/// manager probes go through `runner`.
pub fn collect_config(
    args: &PromptArgs,
    cwd: &Path,
    prompter: &mut dyn Prompter,
    runner: &dyn CommandRunner,
) -> Result<(ProjectConfig, &'static Plugin)> {
    let target_dir = resolve_target_dir(args, prompter)?;
    let project_dir = cwd.join(&target_dir);

    resolve_conflict(args, &target_dir, &project_dir, prompter)?;

    let package_name = resolve_package_name(&project_dir, prompter)?;

    let description = prompter.text(
        &TextPrompt::new(PACKAGE_DESCRIPTION_QUESTION)
            .with_default(DEFAULT_DESCRIPTION)
            .with_placeholder("Anonymous"),
    )?;

    let template = resolve_template(args, prompter)?;
    let plugin = plugin_for(template);

    let pkg_manager = if plugin.requires_pnpm {
        tracing::debug!(template = %template, "template requires pnpm");
        PackageManager::Pnpm
    } else {
        select_package_manager(cwd, prompter, runner)?
    };

    let mut config = ProjectConfig {
        target_dir,
        package_name,
        description,
        pkg_manager,
        template,
        use_ci: false,
        use_vitest: false,
        repo: String::new(),
    };

    (plugin.extend_prompts)(&mut config, prompter)?;

    Ok((config, plugin))
}

fn resolve_target_dir(args: &PromptArgs, prompter: &mut dyn Prompter) -> Result<String> {
    if let Some(dir) = args.directory.as_deref() {
        match usable_project_name(dir) {
            Some(name) => {
                tracing::debug!(target_dir = %name, "project name from arguments");
                return Ok(name);
            }
            None => tracing::warn!(directory = dir, "directory argument unusable, asking instead"),
        }
    }

    let answer = prompter.text(
        &TextPrompt::new(PROJECT_NAME_QUESTION)
            .with_default(DEFAULT_PROJECT_NAME)
            .with_placeholder("Anonymous"),
    )?;
    Ok(usable_project_name(&answer).unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string()))
}

/// The slugified name, unless it is empty or climbs out of the working directory.
fn usable_project_name(input: &str) -> Option<String> {
    let name = slugify_project_name(input);
    (!name.is_empty() && !escapes_base(&name)).then_some(name)
}

fn resolve_conflict(
    args: &PromptArgs,
    target_dir: &str,
    project_dir: &Path,
    prompter: &mut dyn Prompter,
) -> Result<()> {
    if !project_dir.exists() || is_empty_dir(project_dir, IGNORED_ENTRIES)? {
        return Ok(());
    }

    let choice = if args.overwrite {
        Conflict::Remove
    } else {
        let which = if target_dir == "." { "Current" } else { "Target" };
        let message = format!("{which} directory \"{target_dir}\" is not empty:");
        let options = [
            (Conflict::Cancel, "Cancel operation"),
            (Conflict::Remove, "Remove files and continue"),
            (Conflict::Ignore, "Ignore files and continue"),
        ];
        let choices: Vec<Choice> = options.iter().map(|(_, label)| Choice::new(*label)).collect();
        let idx = prompter.select(&message, &choices)?;
        options[idx].0
    };

    match choice {
        Conflict::Cancel => Err(CreateError::Cancelled),
        Conflict::Remove if args.dry_run => {
            tracing::info!(dir = %project_dir.display(), "dry run, not removing existing files");
            Ok(())
        }
        Conflict::Remove => empty_dir(project_dir, IGNORED_ENTRIES),
        Conflict::Ignore => Ok(()),
    }
}

fn resolve_package_name(project_dir: &Path, prompter: &mut dyn Prompter) -> Result<String> {
    let base = normalize(project_dir)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| FALLBACK_PACKAGE_NAME.to_string());

    if is_valid_package_name(&base) {
        return Ok(base);
    }

    let suggestion = slugify_package_name(&base);
    prompter.text(
        &TextPrompt::new(PACKAGE_NAME_QUESTION)
            .with_initial(&suggestion)
            .with_placeholder(&suggestion)
            .with_validator(|input| {
                (!is_valid_package_name(input)).then_some("Invalid package.json name")
            }),
    )
}

fn resolve_template(args: &PromptArgs, prompter: &mut dyn Prompter) -> Result<TemplateKind> {
    if let Some(name) = args.template.as_deref() {
        match name.parse::<TemplateKind>() {
            Ok(kind) => {
                tracing::debug!(template = %kind, "template from arguments");
                return Ok(kind);
            }
            Err(e) => tracing::warn!("{e}, asking instead"),
        }
    }

    let choices: Vec<Choice> = TemplateKind::ALL
        .iter()
        .map(|kind| Choice::new(kind.as_str()).with_hint(kind.hint()))
        .collect();
    let idx = prompter.select(PROJECT_TEMPLATE_QUESTION, &choices)?;
    Ok(TemplateKind::ALL[idx])
}

fn select_package_manager(
    cwd: &Path,
    prompter: &mut dyn Prompter,
    runner: &dyn CommandRunner,
) -> Result<PackageManager> {
    let available: Vec<(PackageManager, String)> = PackageManager::ALL
        .into_iter()
        .filter_map(|pm| check_version(runner, pm, cwd).map(|version| (pm, version)))
        .collect();

    if available.is_empty() {
        return Err(CreateError::NoPackageManager);
    }

    let choices: Vec<Choice> = available
        .iter()
        .map(|(pm, version)| Choice::new(pm.as_str()).with_hint(version.as_str()))
        .collect();
    let idx = prompter.select(PACKAGE_MANAGER_QUESTION, &choices)?;
    Ok(available[idx].0)
}

/// Whether `dir` has no entries other than `ignore`d ones.
pub fn is_empty_dir(dir: &Path, ignore: &[&str]) -> Result<bool> {
    let entries = std::fs::read_dir(dir).map_err(|e| CreateError::Io {
        context: format!("reading directory {}", dir.display()),
        source: e,
    })?;
    for entry in entries {
        let entry = entry.map_err(|e| CreateError::Io {
            context: format!("reading directory {}", dir.display()),
            source: e,
        })?;
        let name = entry.file_name();
        if !ignore.iter().any(|i| name == *i) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Delete everything in `dir` except the `ignore`d entries.
pub fn empty_dir(dir: &Path, ignore: &[&str]) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| CreateError::Io {
        context: format!("reading directory {}", dir.display()),
        source: e,
    })?;
    for entry in entries {
        let entry = entry.map_err(|e| CreateError::Io {
            context: format!("reading directory {}", dir.display()),
            source: e,
        })?;
        let name = entry.file_name();
        if ignore.iter().any(|i| name == *i) {
            continue;
        }
        let path = entry.path();
        let removed = if path.is_dir() && !path.is_symlink() {
            std::fs::remove_dir_all(&path)
        } else {
            std::fs::remove_file(&path)
        };
        removed.map_err(|e| CreateError::Io {
            context: format!("removing {}", path.display()),
            source: e,
        })?;
    }
    Ok(())
}

/// Lexically resolve `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}
