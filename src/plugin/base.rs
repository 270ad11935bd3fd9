use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::copy::{CopyOptions, SkipFn};
use crate::error::{CreateError, Result};
use crate::naming::{is_valid_repo_slug, unscoped_name};
use crate::plugin::HookContext;
use crate::project::{PackageManager, ProjectConfig};
use crate::prompt::{Prompter, TextPrompt, PROJECT_CI_QUESTION, PROJECT_REPO_QUESTION};
use crate::rewrite::{edit_json_file, patch_repository};

/// Template file names and the names they are copied under.
pub const RENAMES: &[(&str, &str)] = &[
    ("_gitignore", ".gitignore"),
    ("_npmrc", ".npmrc"),
    ("_github", ".github"),
    ("_release-it.json", ".release-it.json"),
];

/// Left out when CI is declined.
pub const CI_FILES: &[&str] = &[
    "_github",
    "_release-it.json",
    "release.config.ts",
    "renovate.json",
];

/// Left out unless pnpm is the package manager.
pub const PNPM_FILES: &[&str] = &["pnpm-workspace.yaml"];

/// Left out when the test framework is declined.
pub const TEST_FILE_PATTERNS: &[&str] = &[
    "test",
    "tests",
    "__tests__",
    "*.spec.ts",
    "*.spec.tsx",
    "*.test.ts",
    "*.test.tsx",
    "*.e2e-spec.ts",
    "vitest.config*",
    "vitest-globals.d.ts",
];

pub fn extend_prompts(config: &mut ProjectConfig, prompter: &mut dyn Prompter) -> Result<()> {
    config.use_ci = prompter.confirm(PROJECT_CI_QUESTION, false)?;

    let default_repo = format!("__USER__/{}", unscoped_name(&config.package_name));
    config.repo = prompter.text(
        &TextPrompt::new(PROJECT_REPO_QUESTION)
            .with_initial(&default_repo)
            .with_placeholder(&default_repo)
            .with_validator(|input| (!is_valid_repo_slug(input)).then_some("Invalid (user/repo)")),
    )?;
    Ok(())
}

pub fn copy_options(config: &ProjectConfig) -> Result<CopyOptions> {
    let use_ci = config.use_ci;
    let use_vitest = config.use_vitest;
    let is_pnpm = config.pkg_manager == PackageManager::Pnpm;
    let test_files = build_glob_set(TEST_FILE_PATTERNS)?;

    Ok(CopyOptions {
        rename: RENAMES
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect(),
        skips: vec![
            Box::new(move |name: &str| !use_ci && CI_FILES.contains(&name)) as SkipFn,
            Box::new(move |name: &str| !use_vitest && test_files.is_match(name)),
            Box::new(move |name: &str| !is_pnpm && PNPM_FILES.contains(&name)),
        ],
    })
}

pub fn before_copy(_ctx: &mut HookContext<'_>) -> Result<()> {
    Ok(())
}

/// Fill in the manifest's repository links when a slug was given.
pub fn after_copy(ctx: &mut HookContext<'_>) -> Result<()> {
    let repo = ctx.config.repo.as_str();
    if repo.is_empty() {
        return Ok(());
    }
    edit_json_file(&ctx.project_dir.join("package.json"), |pkg| {
        patch_repository(pkg, repo)
    })?;
    Ok(())
}

pub fn after_all(ctx: &mut HookContext<'_>) -> Vec<CreateError> {
    std::mem::take(ctx.mutations).apply_changes(ctx.runner, ctx.project_dir)
}

pub fn done_message(_prefix: &str) -> String {
    String::new()
}

fn build_glob_set(patterns: &[&str]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| CreateError::GlobPattern {
            pattern: pattern.to_string(),
            source: e,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| CreateError::GlobPattern {
        pattern: "<combined>".into(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DeferredMutations;
    use crate::project::TemplateKind;
    use rstest::rstest;

    fn config(use_ci: bool, use_vitest: bool, pm: PackageManager) -> ProjectConfig {
        ProjectConfig {
            target_dir: "demo".into(),
            package_name: "demo".into(),
            description: "d".into(),
            pkg_manager: pm,
            template: TemplateKind::Lib,
            use_ci,
            use_vitest,
            repo: String::new(),
        }
    }

    #[rstest]
    #[case("_github", false, true)]
    #[case("renovate.json", false, true)]
    #[case("_github", true, false)]
    #[case("package.json", false, false)]
    fn test_ci_files_follow_ci_choice(
        #[case] name: &str,
        #[case] use_ci: bool,
        #[case] skipped: bool,
    ) {
        let options = copy_options(&config(use_ci, true, PackageManager::Pnpm)).unwrap();
        assert_eq!(options.is_skipped(name), skipped);
    }

    #[rstest]
    #[case("test")]
    #[case("index.spec.ts")]
    #[case("app.e2e-spec.ts")]
    #[case("vitest.config.mts")]
    #[case("vitest.config.e2e.mts")]
    #[case("vitest-globals.d.ts")]
    fn test_test_files_skipped_without_vitest(#[case] name: &str) {
        let without = copy_options(&config(true, false, PackageManager::Npm)).unwrap();
        let with = copy_options(&config(true, true, PackageManager::Npm)).unwrap();
        assert!(without.is_skipped(name));
        assert!(!with.is_skipped(name));
    }

    #[test]
    fn test_source_files_are_not_test_files() {
        let options = copy_options(&config(true, false, PackageManager::Npm)).unwrap();
        assert!(!options.is_skipped("index.ts"));
        assert!(!options.is_skipped("src"));
    }

    #[rstest]
    #[case(PackageManager::Pnpm, false)]
    #[case(PackageManager::Npm, true)]
    #[case(PackageManager::Yarn, true)]
    fn test_pnpm_workspace_file(#[case] pm: PackageManager, #[case] skipped: bool) {
        let options = copy_options(&config(true, true, pm)).unwrap();
        assert_eq!(options.is_skipped("pnpm-workspace.yaml"), skipped);
    }

    #[test]
    fn test_renames_unhide_dotfiles() {
        let options = copy_options(&config(true, true, PackageManager::Npm)).unwrap();
        assert_eq!(options.renamed("_gitignore"), ".gitignore");
        assert_eq!(options.renamed("_github"), ".github");
        assert_eq!(options.renamed("src"), "src");
    }

    #[test]
    fn test_after_copy_without_repo_leaves_manifest() {
        struct NoRun;
        impl crate::exec::CommandRunner for NoRun {
            fn run(&self, command: &str, _cwd: &std::path::Path) -> Result<String> {
                panic!("unexpected command {command}")
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("package.json");
        std::fs::write(&manifest, "{\"name\":\"demo\"}").unwrap();
        let cfg = config(false, false, PackageManager::Npm);
        let mut mutations = DeferredMutations::new();
        let mut ctx = HookContext {
            config: &cfg,
            project_dir: dir.path(),
            mutations: &mut mutations,
            runner: &NoRun,
        };

        after_copy(&mut ctx).unwrap();

        assert_eq!(std::fs::read_to_string(&manifest).unwrap(), "{\"name\":\"demo\"}");
    }
}
