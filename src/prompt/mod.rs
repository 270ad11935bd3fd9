pub mod engine;

use std::fmt;

use console::style;
use inquire::validator::{ErrorMessage, Validation};
use inquire::InquireError;

use crate::error::{CreateError, Result};

pub use engine::{collect_config, PromptArgs, IGNORED_ENTRIES};

pub const PROJECT_NAME_QUESTION: &str = "Project name:";
pub const PACKAGE_NAME_QUESTION: &str = "Package name:";
pub const PACKAGE_DESCRIPTION_QUESTION: &str = "Project description:";
pub const PROJECT_TEMPLATE_QUESTION: &str = "Select project template:";
pub const PACKAGE_MANAGER_QUESTION: &str = "Select package manager:";
pub const PROJECT_CI_QUESTION: &str = "Add CI/automation configurations?";
pub const PROJECT_REPO_QUESTION: &str = "GitHub repo:";
pub const VITEST_USE_QUESTION: &str = "Use Vitest as testing framework?";

/// Returns an error message when the input is rejected.
pub type TextValidator = fn(&str) -> Option<&'static str>;

/// A free-text question.
#[derive(Debug, Clone, Copy)]
pub struct TextPrompt<'a> {
    pub message: &'a str,
    /// Value used when the answer is left empty.
    pub default: Option<&'a str>,
    /// Pre-filled, editable answer.
    pub initial: Option<&'a str>,
    pub placeholder: Option<&'a str>,
    pub validator: Option<TextValidator>,
}

impl<'a> TextPrompt<'a> {
    pub fn new(message: &'a str) -> Self {
        Self {
            message,
            default: None,
            initial: None,
            placeholder: None,
            validator: None,
        }
    }

    pub fn with_default(mut self, default: &'a str) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_initial(mut self, initial: &'a str) -> Self {
        self.initial = Some(initial);
        self
    }

    pub fn with_placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn with_validator(mut self, validator: TextValidator) -> Self {
        self.validator = Some(validator);
        self
    }
}

/// One option of a single-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub hint: Option<String>,
}

impl Choice {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.hint {
            Some(hint) => write!(f, "{} {}", self.label, style(format!("({hint})")).dim()),
            None => f.write_str(&self.label),
        }
    }
}

/// Interactive questions asked by the flow.
///
/// Every method returns [`CreateError::Cancelled`] when the user aborts.
/// Text validation and re-asking happen inside the implementation.
pub trait Prompter {
    fn text(&mut self, prompt: &TextPrompt<'_>) -> Result<String>;

    /// Returns the index of the chosen option.
    fn select(&mut self, message: &str, choices: &[Choice]) -> Result<usize>;

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool>;
}

/// Terminal prompts backed by `inquire`.
#[derive(Debug, Default, Clone, Copy)]
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn text(&mut self, prompt: &TextPrompt<'_>) -> Result<String> {
        let mut text = inquire::Text::new(prompt.message);
        if let Some(default) = prompt.default {
            text = text.with_default(default);
        }
        if let Some(initial) = prompt.initial {
            text = text.with_initial_value(initial);
        }
        if let Some(placeholder) = prompt.placeholder {
            text = text.with_placeholder(placeholder);
        }
        if let Some(validator) = prompt.validator {
            text = text.with_validator(move |input: &str| {
                Ok(match validator(input) {
                    None => Validation::Valid,
                    Some(msg) => Validation::Invalid(ErrorMessage::Custom(msg.to_string())),
                })
            });
        }
        text.prompt().map_err(map_inquire_error)
    }

    fn select(&mut self, message: &str, choices: &[Choice]) -> Result<usize> {
        inquire::Select::new(message, choices.to_vec())
            .raw_prompt()
            .map(|option| option.index)
            .map_err(map_inquire_error)
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        inquire::Confirm::new(message)
            .with_default(default)
            .prompt()
            .map_err(map_inquire_error)
    }
}

fn map_inquire_error(err: InquireError) -> CreateError {
    match err {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => {
            CreateError::Cancelled
        }
        other => CreateError::Prompt { source: other },
    }
}
