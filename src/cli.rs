use std::path::PathBuf;
use std::sync::OnceLock;

use clap::{ArgAction, Parser};
use create_project::project::TemplateKind;

#[derive(Parser, Debug)]
#[command(
    name = "create-project",
    about = "Scaffold a new JavaScript/TypeScript project from a template",
    version,
    disable_version_flag = true,
    after_help = templates_help()
)]
pub struct Cli {
    /// Directory to create the project in
    pub directory: Option<String>,

    /// Unexpected extra words; rejected as an invalid command
    #[arg(hide = true)]
    pub extra: Vec<String>,

    /// Show what would be created without writing anything
    #[arg(short, long)]
    pub dry_run: bool,

    /// Remove existing files in the target directory without asking
    #[arg(short, long)]
    pub overwrite: bool,

    /// Template to use (skips the template question)
    #[arg(short, long, value_name = "NAME")]
    pub template: Option<String>,

    /// Directory holding the template trees
    #[arg(long, value_name = "PATH", env = "CREATE_PROJECT_TEMPLATES")]
    pub templates_dir: Option<PathBuf>,

    /// Print version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,
}

fn templates_help() -> &'static str {
    static HELP: OnceLock<String> = OnceLock::new();
    HELP.get_or_init(|| {
        let mut help = String::from("Templates:\n");
        for kind in TemplateKind::ALL {
            help.push_str(&format!("  {:<10} {}\n", kind.as_str(), kind.hint()));
        }
        help
    })
}
