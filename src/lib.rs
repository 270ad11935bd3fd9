pub mod config;
pub mod context;
pub mod copy;
pub mod error;
pub mod exec;
pub mod naming;
pub mod plugin;
pub mod project;
pub mod prompt;
pub mod rewrite;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::Datelike;

use crate::config::{resolve_template_root, UserConfig};
use crate::context::DeferredMutations;
use crate::copy::{execute_copy, plan_copy, CopyPlan};
use crate::error::{CreateError, Result};
use crate::exec::{git_identity, is_git_repo, quote, CommandRunner, GitIdentity};
use crate::plugin::{HookContext, Plugin};
use crate::project::{ProjectConfig, TemplateKind};
use crate::prompt::{collect_config, PromptArgs, Prompter};
use crate::rewrite::{edit_file, render_license, render_readme};

/// LICENSE owner when neither git nor the user config names one.
pub const FALLBACK_OWNER: &str = "Anonymous";

pub struct CreateOptions {
    pub directory: Option<String>,
    pub template: Option<String>,
    pub overwrite: bool,
    pub dry_run: bool,
    /// Overrides template root discovery.
    pub templates_dir: Option<PathBuf>,
    /// Directory the project name is resolved against.
    pub cwd: PathBuf,
}

/// One template tree to copy.
pub struct LayerPlan {
    pub name: &'static str,
    pub source_dir: PathBuf,
    pub plan: CopyPlan,
}

/// Everything needed to create a project that has been planned but not yet written.
pub struct CreatePlan {
    pub config: ProjectConfig,
    pub plugin: &'static Plugin,
    pub project_dir: PathBuf,
    pub layers: Vec<LayerPlan>,
    pub user: UserConfig,
}

impl CreatePlan {
    /// Relative paths of the files the copy would produce, deduplicated across layers.
    pub fn planned_files(&self) -> BTreeSet<PathBuf> {
        self.layers
            .iter()
            .flat_map(|layer| layer.plan.files())
            .map(|entry| entry.relative_path.clone())
            .collect()
    }
}

#[derive(Debug)]
pub struct CreatedProject {
    pub project_dir: PathBuf,
    pub files: Vec<PathBuf>,
    /// Shell steps that failed. None of them stopped the pipeline.
    pub warnings: Vec<CreateError>,
}

/// Plan a project: locate templates, ask the questions, plan every copy layer.
///
/// Nothing is written to disk, except that "remove files and continue" at the
/// conflict question clears the target directory outside dry-run mode.
pub fn plan_creation(
    options: &CreateOptions,
    user: UserConfig,
    prompter: &mut dyn Prompter,
    runner: &dyn CommandRunner,
) -> Result<CreatePlan> {
    let template_root = resolve_template_root(options.templates_dir.as_deref(), &user)?;

    let args = PromptArgs {
        directory: options.directory.clone(),
        template: options.template.clone(),
        overwrite: options.overwrite,
        dry_run: options.dry_run,
    };
    let (config, plugin) = collect_config(&args, &options.cwd, prompter, runner)?;

    let copy_options = (plugin.copy_options)(&config)?;
    let layers = plugin
        .layers
        .iter()
        .map(|&name| {
            let source_dir = template_root.join(name);
            let plan = plan_copy(&source_dir, &copy_options)?;
            Ok(LayerPlan {
                name,
                source_dir,
                plan,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let project_dir = options.cwd.join(&config.target_dir);

    Ok(CreatePlan {
        config,
        plugin,
        project_dir,
        layers,
        user,
    })
}

/// Execute a previously planned creation: copy, rewrite, mutate the manifest,
/// initialize git.
pub fn execute_creation(plan: CreatePlan, runner: &dyn CommandRunner) -> Result<CreatedProject> {
    let CreatePlan {
        config,
        plugin,
        project_dir,
        layers,
        user,
    } = plan;

    std::fs::create_dir_all(&project_dir).map_err(|e| CreateError::Io {
        context: format!("creating directory {}", project_dir.display()),
        source: e,
    })?;

    let mut mutations = DeferredMutations::new();
    let mut ctx = HookContext {
        config: &config,
        project_dir: &project_dir,
        mutations: &mut mutations,
        runner,
    };

    (plugin.before_copy)(&mut ctx)?;

    let mut files = Vec::new();
    for layer in &layers {
        tracing::debug!(layer = layer.name, source = %layer.source_dir.display(), "copying layer");
        files.extend(execute_copy(&layer.plan, &project_dir)?);
    }
    files.sort();
    files.dedup();

    let identity = git_identity(runner, &project_dir);
    let owner = identity
        .name
        .as_deref()
        .or(user.owner.as_deref())
        .unwrap_or(FALLBACK_OWNER);
    let year = chrono::Local::now().year();

    edit_file(&project_dir.join("README.md"), |content| {
        render_readme(&content, &config)
    })?;
    edit_file(&project_dir.join("LICENSE"), |content| {
        render_license(&content, year, owner)
    })?;

    (plugin.after_copy)(&mut ctx)?;
    let mut warnings = (plugin.after_all)(&mut ctx);

    for command in finishing_commands(&config, &identity) {
        run_collecting(runner, &command, &project_dir, &mut warnings);
    }

    if is_git_repo(runner, &project_dir) {
        tracing::debug!("already inside a git work tree, skipping git init");
    } else {
        let rename = format!("git branch -M {}", user.default_branch());
        for command in ["git init", rename.as_str()] {
            run_collecting(runner, command, &project_dir, &mut warnings);
        }
    }

    Ok(CreatedProject {
        project_dir,
        files,
        warnings,
    })
}

/// Manifest identity commands run after the plugin hooks.
fn finishing_commands(config: &ProjectConfig, identity: &GitIdentity) -> Vec<String> {
    let mut commands = vec![format!(
        "npm pkg set name={} description={}",
        quote(&config.package_name),
        quote(&config.description)
    )];

    let author: Vec<String> = [("name", &identity.name), ("email", &identity.email)]
        .into_iter()
        .filter_map(|(field, value)| {
            value
                .as_deref()
                .map(|value| format!("author.{field}={}", quote(value)))
        })
        .collect();
    if !author.is_empty() {
        commands.push(format!("npm pkg set {}", author.join(" ")));
    }
    commands
}

fn run_collecting(
    runner: &dyn CommandRunner,
    command: &str,
    cwd: &Path,
    warnings: &mut Vec<CreateError>,
) {
    if let Err(e) = runner.run(command, cwd) {
        tracing::warn!(command = %command, error = %e, "command failed");
        warnings.push(e);
    }
}

/// Plan and execute in one go.
pub fn create(
    options: &CreateOptions,
    user: UserConfig,
    prompter: &mut dyn Prompter,
    runner: &dyn CommandRunner,
) -> Result<CreatedProject> {
    let plan = plan_creation(options, user, prompter, runner)?;
    execute_creation(plan, runner)
}

/// The closing "next steps" text. Every command line starts with `prefix`.
pub fn done_message(
    config: &ProjectConfig,
    plugin: &Plugin,
    cwd: &Path,
    project_dir: &Path,
    prefix: &str,
) -> String {
    let mut msg = String::from("Done. Now run:\n");

    let relative = project_dir.strip_prefix(cwd).unwrap_or(project_dir);
    if !relative.as_os_str().is_empty() && relative != Path::new(".") {
        let dir = relative.display().to_string();
        let dir = if dir.contains(' ') {
            format!("\"{dir}\"")
        } else {
            dir
        };
        msg.push_str(&format!("{prefix} cd {dir}\n"));
    }

    let dev = if config.template == TemplateKind::Electron {
        "start"
    } else {
        "dev"
    };
    let pm = config.pkg_manager;
    msg.push_str(&format!("{prefix} {}", pm.install_command()));
    msg.push_str(&format!("{prefix} {} {dev}", pm.run_prefix()));
    msg.push_str(&(plugin.done_message)(prefix));
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::plugin_for;
    use crate::project::PackageManager;
    use rstest::rstest;

    fn config(template: TemplateKind, pm: PackageManager) -> ProjectConfig {
        ProjectConfig {
            target_dir: "my app".into(),
            package_name: "my-app".into(),
            description: "An app".into(),
            pkg_manager: pm,
            template,
            use_ci: false,
            use_vitest: false,
            repo: String::new(),
        }
    }

    #[rstest]
    #[case(PackageManager::Npm, TemplateKind::Lib, "\n$ npm install\n$ npm run dev")]
    #[case(PackageManager::Yarn, TemplateKind::Lib, "\n$ yarn\n$ yarn dev")]
    #[case(PackageManager::Pnpm, TemplateKind::Electron, "\n$ pnpm install\n$ pnpm run start")]
    fn test_done_message_commands(
        #[case] pm: PackageManager,
        #[case] template: TemplateKind,
        #[case] expected_tail: &str,
    ) {
        let cwd = Path::new("/work");
        let msg = done_message(
            &config(template, pm),
            plugin_for(template),
            cwd,
            cwd,
            "\n$",
        );
        assert_eq!(msg, format!("Done. Now run:\n{expected_tail}"));
    }

    #[test]
    fn test_done_message_quotes_cd_with_spaces() {
        let cfg = config(TemplateKind::Monorepo, PackageManager::Pnpm);
        let msg = done_message(
            &cfg,
            plugin_for(TemplateKind::Monorepo),
            Path::new("/work"),
            Path::new("/work/my app"),
            "\n$",
        );
        assert_eq!(
            msg,
            "Done. Now run:\n\n$ cd \"my app\"\n\n$ pnpm install\n$ pnpm run dev\n\n$ pnpm cs:init"
        );
    }

    #[test]
    fn test_finishing_commands_skip_unknown_author() {
        let cfg = config(TemplateKind::Lib, PackageManager::Npm);

        let bare = finishing_commands(&cfg, &GitIdentity::default());
        assert_eq!(
            bare,
            vec!["npm pkg set name=\"my-app\" description=\"An app\"".to_string()]
        );

        let email_only = finishing_commands(
            &cfg,
            &GitIdentity {
                name: None,
                email: Some("me@example.com".into()),
            },
        );
        assert_eq!(email_only[1], "npm pkg set author.email=\"me@example.com\"");
    }
}
