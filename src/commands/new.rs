use std::io::{self, Write};
use std::path::PathBuf;

use console::style;
use create_project::config::load_user_config;
use create_project::error::CreateError;
use create_project::exec::ShellRunner;
use create_project::prompt::InquirePrompter;
use create_project::{done_message, execute_creation, plan_creation, CreateOptions};
use miette::{IntoDiagnostic, Result};

pub fn run(
    directory: Option<String>,
    template: Option<String>,
    overwrite: bool,
    dry_run: bool,
    templates_dir: Option<PathBuf>,
) -> Result<()> {
    println!("{}", style(" create-project ").black().on_cyan());

    let cwd = std::env::current_dir().map_err(|e| CreateError::Io {
        context: "getting current directory".into(),
        source: e,
    })?;
    let user = load_user_config()?;
    let options = CreateOptions {
        directory,
        template,
        overwrite,
        dry_run,
        templates_dir,
        cwd: cwd.clone(),
    };

    let runner = ShellRunner;
    let plan = match plan_creation(&options, user, &mut InquirePrompter, &runner) {
        Err(CreateError::Cancelled) => {
            println!("{} operation cancelled", style("\u{2716}").red().bold());
            return Ok(());
        }
        other => other?,
    };

    if dry_run {
        println!(
            "\n{} Dry run, project would be created in {}:",
            style("==>").cyan().bold(),
            style(plan.project_dir.display()).cyan()
        );
        let config = serde_json::to_string_pretty(&plan.config).into_diagnostic()?;
        for line in config.lines() {
            println!("  {}", style(line).dim());
        }
        println!();
        for file in plan.planned_files() {
            println!("  {} {}", style("create").green(), file.display());
        }
        println!(
            "\n{} Dry run, nothing changed.",
            style("\u{2139}").blue().bold()
        );
        return Ok(());
    }

    let config = plan.config.clone();
    let plugin = plan.plugin;
    let created = execute_creation(plan, &runner)?;

    println!(
        "\n{} Project created at {} ({} files)",
        style("\u{2713}").green().bold(),
        style(created.project_dir.display()).cyan(),
        created.files.len()
    );

    let prefix = format!("\n  {}", style("$").dim());
    let done = done_message(&config, plugin, &cwd, &created.project_dir, &prefix);
    write_outcome(&mut std::io::stdout().lock(), &done, &created.warnings).into_diagnostic()?;

    Ok(())
}

/// The next-steps text, then one line per failed shell step.
fn write_outcome(out: &mut impl Write, done: &str, warnings: &[CreateError]) -> io::Result<()> {
    writeln!(out, "\n{done}")?;
    if !warnings.is_empty() {
        writeln!(out)?;
    }
    for warning in warnings {
        writeln!(
            out,
            "{} {}",
            style("warning:").yellow().bold(),
            style(warning).yellow()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_follow_the_done_message() {
        let warnings = vec![CreateError::CommandFailed {
            command: "git init".into(),
            message: "exit status: 1".into(),
        }];
        let mut out = Vec::new();

        write_outcome(&mut out, "Done. Now run:\n\n  $ npm install", &warnings).unwrap();

        let text = String::from_utf8(out).unwrap();
        let done_at = text.find("npm install").unwrap();
        let warning_at = text.find("`git init` failed").unwrap();
        assert!(done_at < warning_at);
    }

    #[test]
    fn no_warnings_prints_only_done_message() {
        let mut out = Vec::new();
        write_outcome(&mut out, "Done. Now run:", &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\nDone. Now run:\n");
    }
}
