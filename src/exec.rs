use std::path::Path;
use std::process::Command;

use crate::error::{CreateError, Result};
use crate::project::PackageManager;

/// Runs shell command lines on behalf of the pipeline.
pub trait CommandRunner: Sync {
    /// Run `command` in `cwd` and return its trimmed stdout.
    fn run(&self, command: &str, cwd: &Path) -> Result<String>;
}

/// Executes commands through `sh -c`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str, cwd: &Path) -> Result<String> {
        tracing::debug!(command, cwd = %cwd.display(), "running command");
        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(cwd)
            .output()
            .map_err(|e| CreateError::CommandFailed {
                command: command.to_string(),
                message: format!("failed to execute: {e}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CreateError::CommandFailed {
                command: command.to_string(),
                message: format!("exited with status {}: {}", output.status, stderr.trim()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Run a probe command; any failure or empty output counts as absent.
pub fn probe<R: CommandRunner + ?Sized>(runner: &R, command: &str, cwd: &Path) -> Option<String> {
    match runner.run(command, cwd) {
        Ok(out) if !out.is_empty() => Some(out),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(command, error = %e, "probe failed");
            None
        }
    }
}

/// Installed version of a package manager, if it is on the PATH.
pub fn check_version<R: CommandRunner + ?Sized>(
    runner: &R,
    manager: PackageManager,
    cwd: &Path,
) -> Option<String> {
    probe(runner, &format!("{manager} --version"), cwd)
}

/// Whether `dir` lies inside a git working tree.
pub fn is_git_repo<R: CommandRunner + ?Sized>(runner: &R, dir: &Path) -> bool {
    probe(runner, "git rev-parse --is-inside-work-tree", dir).as_deref() == Some("true")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitIdentity {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Read `user.name` and `user.email` from git. The two lookups run concurrently.
pub fn git_identity<R: CommandRunner + ?Sized>(runner: &R, cwd: &Path) -> GitIdentity {
    std::thread::scope(|s| {
        let name = s.spawn(|| probe(runner, "git config user.name", cwd));
        let email = s.spawn(|| probe(runner, "git config user.email", cwd));
        GitIdentity {
            name: name.join().unwrap_or(None),
            email: email.join().unwrap_or(None),
        }
    })
}

/// Double-quote `value` for `sh`.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}
