use std::path::Path;

use indexmap::IndexMap;

use crate::error::CreateError;
use crate::exec::{quote, CommandRunner};

/// Manifest changes and shell commands batched for a single flush at the end
/// of the per-template pipeline.
#[derive(Debug, Default)]
pub struct DeferredMutations {
    scripts: IndexMap<String, String>,
    deps_to_remove: Vec<String>,
    dev_deps_to_remove: Vec<String>,
    pending_commands: Vec<String>,
}

impl DeferredMutations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge scripts; a later value for an existing key wins.
    pub fn set_scripts<K, V>(&mut self, scripts: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (name, command) in scripts {
            self.scripts.insert(name.into(), command.into());
        }
    }

    pub fn remove_deps<S: Into<String>>(&mut self, names: impl IntoIterator<Item = S>) {
        self.deps_to_remove.extend(names.into_iter().map(Into::into));
    }

    pub fn remove_dev_deps<S: Into<String>>(&mut self, names: impl IntoIterator<Item = S>) {
        self.dev_deps_to_remove
            .extend(names.into_iter().map(Into::into));
    }

    pub fn enqueue_command<S: Into<String>>(&mut self, commands: impl IntoIterator<Item = S>) {
        self.pending_commands
            .extend(commands.into_iter().map(Into::into));
    }

    /// The commands a flush would run, in order: the manifest delete command,
    /// the manifest set command, then everything enqueued explicitly.
    pub fn commands(&self) -> Vec<String> {
        let removals: Vec<String> = self
            .deps_to_remove
            .iter()
            .map(|name| format!("dependencies[{name}]"))
            .chain(
                self.dev_deps_to_remove
                    .iter()
                    .map(|name| format!("devDependencies[{name}]")),
            )
            .collect();
        let assignments: Vec<String> = self
            .scripts
            .iter()
            .map(|(name, command)| format!("scripts.{name}={}", quote(command)))
            .collect();

        let mut commands = Vec::with_capacity(self.pending_commands.len() + 2);
        if !removals.is_empty() {
            commands.push(format!("npm pkg delete {}", removals.join(" ")));
        }
        if !assignments.is_empty() {
            commands.push(format!("npm pkg set {}", assignments.join(" ")));
        }
        commands.extend(self.pending_commands.iter().cloned());
        commands
    }

    /// Run every queued command in `cwd`, strictly one after another.
    ///
    /// A failing command does not stop the ones after it; all failures are
    /// returned to the caller.
    pub fn apply_changes(self, runner: &dyn CommandRunner, cwd: &Path) -> Vec<CreateError> {
        let mut failures = Vec::new();
        for command in self.commands() {
            if let Err(e) = runner.run(&command, cwd) {
                tracing::warn!(command = %command, error = %e, "command failed");
                failures.push(e);
            }
        }
        failures
    }
}
