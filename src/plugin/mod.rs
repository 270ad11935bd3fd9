//! Per-template behavior.
//!
//! Each template kind maps to one [`Plugin`]: a record of hook functions.
//! Shared behavior lives in [`base`]; the library family in [`library`] wraps it,
//! and the app templates in [`app`] use or replace it.

pub mod app;
pub mod base;
pub mod library;

use std::path::Path;

use crate::context::DeferredMutations;
use crate::copy::CopyOptions;
use crate::error::{CreateError, Result};
use crate::exec::CommandRunner;
use crate::project::{ProjectConfig, TemplateKind};
use crate::prompt::Prompter;

/// State handed to the copy hooks.
pub struct HookContext<'a> {
    pub config: &'a ProjectConfig,
    /// The generated project's root. File edits are relative to it and
    /// commands run in it.
    pub project_dir: &'a Path,
    pub mutations: &'a mut DeferredMutations,
    pub runner: &'a dyn CommandRunner,
}

pub type ExtendPromptsFn = fn(&mut ProjectConfig, &mut dyn Prompter) -> Result<()>;
pub type CopyOptionsFn = fn(&ProjectConfig) -> Result<CopyOptions>;
pub type HookFn = fn(&mut HookContext<'_>) -> Result<()>;
pub type AfterAllFn = fn(&mut HookContext<'_>) -> Vec<CreateError>;
pub type DoneMessageFn = fn(prefix: &str) -> String;

pub struct Plugin {
    pub kind: TemplateKind,
    /// Template directories copied in order; later layers overwrite earlier ones.
    pub layers: &'static [&'static str],
    pub requires_pnpm: bool,
    pub extend_prompts: ExtendPromptsFn,
    pub copy_options: CopyOptionsFn,
    pub before_copy: HookFn,
    pub after_copy: HookFn,
    /// Flushes deferred mutations and returns the commands that failed.
    pub after_all: AfterAllFn,
    /// Extra lines for the closing "next steps" message.
    pub done_message: DoneMessageFn,
}

impl std::fmt::Debug for Plugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plugin")
            .field("kind", &self.kind)
            .field("layers", &self.layers)
            .field("requires_pnpm", &self.requires_pnpm)
            .finish_non_exhaustive()
    }
}

/// The plugin bound to `kind`.
pub fn plugin_for(kind: TemplateKind) -> &'static Plugin {
    match kind {
        TemplateKind::Lib => &library::LIB,
        TemplateKind::Cli => &library::CLI,
        TemplateKind::Plugin => &library::PLUGIN,
        TemplateKind::Monorepo => &library::MONOREPO,
        TemplateKind::Electron => &app::ELECTRON,
        TemplateKind::React => &app::REACT,
    }
}
