use dialoguer::{Input, Password};

use crate::error::{DeployError, DeployResult};

/// Source of interactive answers.
pub trait Prompter {
    /// Ask for a line of input. Empty answers are allowed.
    fn ask(&mut self, label: &str) -> DeployResult<String>;

    /// Ask for a line of input without echoing it.
    fn ask_secret(&mut self, label: &str) -> DeployResult<String>;
}

/// [`Prompter`] reading from the controlling terminal.
#[derive(Debug, Default)]
pub struct Terminal;

impl Prompter for Terminal {
    fn ask(&mut self, label: &str) -> DeployResult<String> {
        Input::<String>::new()
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()
            .map(|s| s.trim().to_string())
            .map_err(|e| DeployError::Other(format!("prompt failed: {e}")))
    }

    fn ask_secret(&mut self, label: &str) -> DeployResult<String> {
        Password::new()
            .with_prompt(label)
            .allow_empty_password(true)
            .interact()
            .map_err(|e| DeployError::Other(format!("prompt failed: {e}")))
    }
}

/// `y`/`Y` means yes; anything else, including empty input, is no.
#[must_use]
pub fn parse_yes(answer: &str) -> bool {
    matches!(answer.trim(), "y" | "Y")
}
