use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CreateError, Result};

pub const DEFAULT_BRANCH: &str = "master";
const TEMPLATE_DIR_NAME: &str = "template";

/// User-level configuration loaded from `~/.config/create-project/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UserConfig {
    /// Where template trees live when no `--templates-dir` is given.
    pub templates_dir: Option<PathBuf>,
    /// LICENSE owner used when git has no `user.name`.
    pub owner: Option<String>,
    /// Branch name passed to `git branch -M` after `git init`.
    pub default_branch: Option<String>,
}

impl UserConfig {
    pub fn default_branch(&self) -> &str {
        self.default_branch.as_deref().unwrap_or(DEFAULT_BRANCH)
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("create-project").join("config.toml"))
}

/// Load user configuration from the platform config directory.
///
/// A missing file yields the defaults; an unreadable or malformed one is an error.
pub fn load_user_config() -> Result<UserConfig> {
    match config_path() {
        Some(path) => load_user_config_from(&path),
        None => Ok(UserConfig::default()),
    }
}

pub fn load_user_config_from(path: &Path) -> Result<UserConfig> {
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| CreateError::Io {
        context: format!("reading user config {}", path.display()),
        source: e,
    })?;

    toml::from_str(&content).map_err(|e| CreateError::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Locate the directory holding one template tree per kind.
///
/// Candidates in order: the explicit override, the user config, `template/`
/// beside the executable, then `template/` in the crate sources. The first
/// existing directory wins.
pub fn resolve_template_root(explicit: Option<&Path>, user: &UserConfig) -> Result<PathBuf> {
    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(TEMPLATE_DIR_NAME)));
    let in_sources = Path::new(env!("CARGO_MANIFEST_DIR")).join(TEMPLATE_DIR_NAME);

    let candidates = [
        explicit.map(Path::to_path_buf),
        user.templates_dir.clone(),
        beside_exe,
        Some(in_sources),
    ];
    first_existing_dir(candidates)
}

fn first_existing_dir(candidates: impl IntoIterator<Item = Option<PathBuf>>) -> Result<PathBuf> {
    for candidate in candidates.into_iter().flatten() {
        if candidate.is_dir() {
            tracing::debug!(root = %candidate.display(), "template root resolved");
            return Ok(candidate);
        }
        tracing::debug!(candidate = %candidate.display(), "template root candidate missing");
    }
    Err(CreateError::TemplateRootMissing)
}
