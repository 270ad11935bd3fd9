//! Post-copy edits of generated files.
//!
//! Every edit is a no-op when its file does not exist.

use std::path::Path;
use std::sync::OnceLock;

use regex_lite::{NoExpand, Regex};
use serde_json::{json, Value};

use crate::error::{CreateError, Result};
use crate::project::ProjectConfig;

/// Rewrite `path` through `edit`. Returns `false` if the file is absent.
pub fn edit_file(path: &Path, edit: impl FnOnce(String) -> String) -> Result<bool> {
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "edit skipped, file missing");
        return Ok(false);
    }
    let content = std::fs::read_to_string(path).map_err(|e| CreateError::Io {
        context: format!("reading {}", path.display()),
        source: e,
    })?;
    std::fs::write(path, edit(content)).map_err(|e| CreateError::Io {
        context: format!("writing {}", path.display()),
        source: e,
    })?;
    Ok(true)
}

/// Parse `path` as JSON, mutate it, and write it back pretty-printed with
/// key order preserved.
pub fn edit_json_file(path: &Path, edit: impl FnOnce(&mut Value)) -> Result<bool> {
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "edit skipped, file missing");
        return Ok(false);
    }
    let content = std::fs::read_to_string(path).map_err(|e| CreateError::Io {
        context: format!("reading {}", path.display()),
        source: e,
    })?;
    let mut value: Value =
        serde_json::from_str(&content).map_err(|e| CreateError::JsonParse {
            path: path.to_path_buf(),
            source: e,
        })?;
    edit(&mut value);
    let mut out = serde_json::to_string_pretty(&value).map_err(|e| CreateError::JsonParse {
        path: path.to_path_buf(),
        source: e,
    })?;
    out.push('\n');
    std::fs::write(path, out).map_err(|e| CreateError::Io {
        context: format!("writing {}", path.display()),
        source: e,
    })?;
    Ok(true)
}

fn guarded_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\$START(.*?)\$END").expect("guarded block pattern is valid"))
}

fn blank_lines_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\r?\n){3,}").expect("blank lines pattern is valid"))
}

fn title_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<title>.*?</title>").expect("title pattern is valid"))
}

/// Fill README placeholders.
///
/// `$START ... $END` blocks keep their content only when the test framework
/// is enabled.
pub fn render_readme(content: &str, config: &ProjectConfig) -> String {
    let pm = config.pkg_manager;
    let replaced = content
        .replace("$PACKAGE_NAME", &config.package_name)
        .replace("$DESCRIPTION", &config.description)
        .replace("$INSTALL", &pm.install_command())
        .replace("$RUN", &pm.run_prefix());

    let keep = config.use_vitest;
    let guarded = guarded_block_re().replace_all(&replaced, |caps: &regex_lite::Captures<'_>| {
        if keep {
            caps[1].to_string()
        } else {
            String::new()
        }
    });

    blank_lines_re().replace_all(&guarded, "\n\n").into_owned()
}

pub fn render_license(content: &str, year: i32, owner: &str) -> String {
    content
        .replace("$YEAR", &year.to_string())
        .replace("$OWNER", owner)
}

/// Point the manifest's repository, bugs and homepage fields at `repo`.
pub fn patch_repository(manifest: &mut Value, repo: &str) {
    let Some(obj) = manifest.as_object_mut() else {
        return;
    };
    obj.insert(
        "repository".into(),
        json!({ "type": "git", "url": format!("https://github.com/{repo}.git") }),
    );
    obj.insert(
        "bugs".into(),
        json!({ "url": format!("https://github.com/{repo}/issues") }),
    );
    obj.insert(
        "homepage".into(),
        Value::String(format!("https://github.com/{repo}#readme")),
    );
}

/// Drop `plugin` from a release-it style config's `plugins` table.
pub fn remove_plugin(config: &mut Value, plugin: &str) {
    if let Some(plugins) = config.get_mut("plugins").and_then(Value::as_object_mut) {
        plugins.shift_remove(plugin);
    }
}

pub fn set_html_title(content: &str, title: &str) -> String {
    title_re()
        .replacen(content, 1, NoExpand(&format!("<title>{title}</title>")))
        .into_owned()
}
