use std::fmt;
use std::str::FromStr;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManager {
    pub const ALL: [PackageManager; 3] = [Self::Npm, Self::Yarn, Self::Pnpm];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Yarn => "yarn",
            Self::Pnpm => "pnpm",
        }
    }

    /// Command that installs dependencies, as shown to the user.
    pub fn install_command(self) -> String {
        match self {
            Self::Yarn => "yarn".to_string(),
            other => format!("{other} install"),
        }
    }

    /// Prefix used to run a package script.
    pub fn run_prefix(self) -> String {
        match self {
            Self::Yarn => "yarn".to_string(),
            other => format!("{other} run"),
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed set of project skeletons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Lib,
    Cli,
    Plugin,
    Monorepo,
    Electron,
    React,
}

impl TemplateKind {
    /// Prompt order.
    pub const ALL: [TemplateKind; 6] = [
        Self::Lib,
        Self::Cli,
        Self::Plugin,
        Self::Monorepo,
        Self::Electron,
        Self::React,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lib => "lib",
            Self::Cli => "cli",
            Self::Plugin => "plugin",
            Self::Monorepo => "monorepo",
            Self::Electron => "electron",
            Self::React => "react",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            Self::Lib => "TypeScript library",
            Self::Cli => "Command-line tool",
            Self::Plugin => "Plugin package built on the library template",
            Self::Monorepo => "pnpm workspace monorepo",
            Self::Electron => "Electron desktop app",
            Self::React => "React web app",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown template '{s}'"))
    }
}

/// Answers collected for one invocation, threaded through every step.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub target_dir: String,
    pub package_name: String,
    pub description: String,
    pub pkg_manager: PackageManager,
    pub template: TemplateKind,
    #[serde(rename = "useCI")]
    pub use_ci: bool,
    pub use_vitest: bool,
    /// `owner/name`; empty when no repository was asked for.
    pub repo: String,
}
