use crate::error::Result;
use crate::plugin::{base, HookContext, Plugin};
use crate::project::{ProjectConfig, TemplateKind};
use crate::prompt::Prompter;
use crate::rewrite::{edit_file, set_html_title};

const APP: Plugin = Plugin {
    kind: TemplateKind::Electron,
    layers: &["electron"],
    requires_pnpm: false,
    extend_prompts: base::extend_prompts,
    copy_options: base::copy_options,
    before_copy: base::before_copy,
    after_copy: base::after_copy,
    after_all: base::after_all,
    done_message: base::done_message,
};

/// Desktop app. Base behavior only; no test framework is offered.
pub static ELECTRON: Plugin = APP;

/// Web app. Asks nothing beyond the common questions.
pub static REACT: Plugin = Plugin {
    kind: TemplateKind::React,
    layers: &["react"],
    extend_prompts: no_prompts,
    after_copy: react_after_copy,
    ..APP
};

fn no_prompts(_config: &mut ProjectConfig, _prompter: &mut dyn Prompter) -> Result<()> {
    Ok(())
}

fn react_after_copy(ctx: &mut HookContext<'_>) -> Result<()> {
    let title = ctx.config.package_name.as_str();
    edit_file(&ctx.project_dir.join("index.html"), |html| {
        set_html_title(&html, title)
    })?;
    Ok(())
}
