//! The library family: lib, cli, plugin and monorepo.

use crate::error::Result;
use crate::exec::check_version;
use crate::naming::unscoped_name;
use crate::plugin::{base, HookContext, Plugin};
use crate::project::{PackageManager, ProjectConfig, TemplateKind};
use crate::prompt::{Prompter, VITEST_USE_QUESTION};
use crate::rewrite::{edit_json_file, remove_plugin};

const RELEASE_DEV_DEPS: [&str; 3] = [
    "release-it",
    "release-it-pnpm",
    "@release-it/conventional-changelog",
];
const PNPM_RELEASE_PLUGIN: &str = "release-it-pnpm";
const VITEST_DEV_DEPS: [&str; 2] = ["vitest", "@vitest/coverage-v8"];
const VITEST_SCRIPTS: [(&str, &str); 3] = [
    ("test", "vitest run"),
    ("test:e2e", "vitest run -c vitest.config.e2e.mts"),
    ("test:cov", "vitest run --coverage"),
];
const CHANGESET_SCRIPTS: [(&str, &str); 4] = [
    ("cs:init", "changeset init"),
    ("cs:add", "changeset add"),
    ("cs:version", "changeset version"),
    ("cs:publish", "changeset publish"),
];

const LIBRARY: Plugin = Plugin {
    kind: TemplateKind::Lib,
    layers: &["lib"],
    requires_pnpm: false,
    extend_prompts,
    copy_options: base::copy_options,
    before_copy: base::before_copy,
    after_copy,
    after_all: base::after_all,
    done_message: base::done_message,
};

pub static LIB: Plugin = LIBRARY;

pub static CLI: Plugin = Plugin {
    kind: TemplateKind::Cli,
    layers: &["lib", "cli"],
    after_copy: cli_after_copy,
    ..LIBRARY
};

pub static PLUGIN: Plugin = Plugin {
    kind: TemplateKind::Plugin,
    layers: &["lib", "plugin"],
    ..LIBRARY
};

pub static MONOREPO: Plugin = Plugin {
    kind: TemplateKind::Monorepo,
    layers: &["monorepo"],
    requires_pnpm: true,
    after_copy: monorepo_after_copy,
    done_message: monorepo_done_message,
    ..LIBRARY
};

fn extend_prompts(config: &mut ProjectConfig, prompter: &mut dyn Prompter) -> Result<()> {
    base::extend_prompts(config, prompter)?;
    config.use_vitest = prompter.confirm(VITEST_USE_QUESTION, true)?;
    Ok(())
}

/// Prune or wire up release automation and the test framework.
fn after_copy(ctx: &mut HookContext<'_>) -> Result<()> {
    let config = ctx.config;

    if config.use_ci {
        ctx.mutations.set_scripts([("release", "release-it")]);
        if config.pkg_manager != PackageManager::Pnpm {
            ctx.mutations.remove_dev_deps([PNPM_RELEASE_PLUGIN]);
            edit_json_file(&ctx.project_dir.join(".release-it.json"), |json| {
                remove_plugin(json, PNPM_RELEASE_PLUGIN)
            })?;
        }
    } else {
        ctx.mutations.remove_dev_deps(RELEASE_DEV_DEPS);
    }

    if config.use_vitest {
        ctx.mutations.set_scripts(VITEST_SCRIPTS);
    } else {
        ctx.mutations.remove_dev_deps(VITEST_DEV_DEPS);
    }

    base::after_copy(ctx)
}

fn cli_after_copy(ctx: &mut HookContext<'_>) -> Result<()> {
    let bin = unscoped_name(&ctx.config.package_name);
    ctx.mutations
        .enqueue_command([format!("npm pkg set bin[{bin}]=\"index.js\"")]);
    after_copy(ctx)
}

fn monorepo_after_copy(ctx: &mut HookContext<'_>) -> Result<()> {
    if ctx.config.use_ci {
        ctx.mutations.set_scripts(CHANGESET_SCRIPTS);
    } else {
        ctx.mutations.remove_dev_deps(["@changesets/cli"]);
    }

    match check_version(ctx.runner, PackageManager::Pnpm, ctx.project_dir) {
        Some(version) => ctx
            .mutations
            .enqueue_command([format!("npm pkg set packageManager=\"pnpm@{version}\"")]),
        None => tracing::debug!("pnpm version unknown, packageManager left unset"),
    }

    after_copy(ctx)
}

fn monorepo_done_message(prefix: &str) -> String {
    format!("\n{prefix} pnpm cs:init")
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use serde_json::json;

    use super::*;
    use crate::context::DeferredMutations;
    use crate::error::CreateError;
    use crate::exec::CommandRunner;

    struct PnpmOnly(Option<&'static str>);

    impl CommandRunner for PnpmOnly {
        fn run(&self, command: &str, _cwd: &Path) -> Result<String> {
            match (command, self.0) {
                ("pnpm --version", Some(v)) => Ok(v.to_string()),
                _ => Err(CreateError::CommandFailed {
                    command: command.to_string(),
                    message: "not available".into(),
                }),
            }
        }
    }

    fn config(kind: TemplateKind, pm: PackageManager, use_ci: bool, use_vitest: bool) -> ProjectConfig {
        ProjectConfig {
            target_dir: "demo".into(),
            package_name: "@acme/demo".into(),
            description: "d".into(),
            pkg_manager: pm,
            template: kind,
            use_ci,
            use_vitest,
            repo: String::new(),
        }
    }

    fn run_after_copy(
        plugin: &Plugin,
        config: &ProjectConfig,
        dir: &Path,
        runner: &dyn CommandRunner,
    ) -> Vec<String> {
        let mut mutations = DeferredMutations::new();
        let mut ctx = HookContext {
            config,
            project_dir: dir,
            mutations: &mut mutations,
            runner,
        };
        (plugin.after_copy)(&mut ctx).unwrap();
        mutations.commands()
    }

    #[test]
    fn test_declined_ci_and_vitest_prune_dev_deps() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(TemplateKind::Lib, PackageManager::Npm, false, false);

        let commands = run_after_copy(&LIB, &cfg, dir.path(), &PnpmOnly(None));

        assert_eq!(
            commands,
            vec![
                "npm pkg delete devDependencies[release-it] devDependencies[release-it-pnpm] \
                 devDependencies[@release-it/conventional-changelog] devDependencies[vitest] \
                 devDependencies[@vitest/coverage-v8]"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_ci_without_pnpm_trims_release_config() {
        let dir = tempfile::tempdir().unwrap();
        let release = dir.path().join(".release-it.json");
        std::fs::write(
            &release,
            r#"{"git":{},"plugins":{"release-it-pnpm":{},"@release-it/conventional-changelog":{}}}"#,
        )
        .unwrap();
        let cfg = config(TemplateKind::Lib, PackageManager::Yarn, true, true);

        let commands = run_after_copy(&LIB, &cfg, dir.path(), &PnpmOnly(None));

        assert_eq!(
            commands,
            vec![
                "npm pkg delete devDependencies[release-it-pnpm]".to_string(),
                "npm pkg set scripts.release=\"release-it\" scripts.test=\"vitest run\" \
                 scripts.test:e2e=\"vitest run -c vitest.config.e2e.mts\" \
                 scripts.test:cov=\"vitest run --coverage\""
                    .to_string(),
            ]
        );
        let trimmed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&release).unwrap()).unwrap();
        assert_eq!(
            trimmed["plugins"],
            json!({"@release-it/conventional-changelog": {}})
        );
    }

    #[test]
    fn test_cli_binds_unscoped_bin_after_library_edits() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(TemplateKind::Cli, PackageManager::Pnpm, true, true);

        let commands = run_after_copy(&CLI, &cfg, dir.path(), &PnpmOnly(None));

        assert_eq!(commands.last().unwrap(), "npm pkg set bin[demo]=\"index.js\"");
        assert!(commands[0].starts_with("npm pkg set scripts.release="));
    }

    #[test]
    fn test_cli_bin_keeps_dotted_name_as_one_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config(TemplateKind::Cli, PackageManager::Npm, false, false);
        cfg.package_name = "@acme/my.tool".into();

        let commands = run_after_copy(&CLI, &cfg, dir.path(), &PnpmOnly(None));

        assert_eq!(commands.last().unwrap(), "npm pkg set bin[my.tool]=\"index.js\"");
    }

    #[test]
    fn test_monorepo_pins_pnpm_version() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(TemplateKind::Monorepo, PackageManager::Pnpm, true, false);

        let commands = run_after_copy(&MONOREPO, &cfg, dir.path(), &PnpmOnly(Some("9.12.0")));

        assert!(commands[1].contains("scripts.cs:init=\"changeset init\""));
        assert!(commands[1].contains("scripts.cs:publish=\"changeset publish\""));
        assert_eq!(
            commands.last().unwrap(),
            "npm pkg set packageManager=\"pnpm@9.12.0\""
        );
    }

    #[test]
    fn test_monorepo_without_pnpm_skips_pin_and_drops_changesets() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(TemplateKind::Monorepo, PackageManager::Pnpm, false, true);

        let commands = run_after_copy(&MONOREPO, &cfg, dir.path(), &PnpmOnly(None));

        assert!(commands[0].starts_with("npm pkg delete devDependencies[@changesets/cli]"));
        assert!(commands.iter().all(|c| !c.contains("packageManager")));
    }

    #[test]
    fn test_done_messages() {
        assert_eq!((MONOREPO.done_message)("  $"), "\n  $ pnpm cs:init");
        assert_eq!((LIB.done_message)("  $"), "");
        assert_eq!((PLUGIN.done_message)("  $"), "");
    }
}
