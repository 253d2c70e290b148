//! User input and interaction handling.

use crate::error::{Error, Result};
use dialoguer::{Input, Select};

/// Line-buffered, blocking prompt provider. The engine only ever needs a raw
/// line of input or a selection from a list; defaults are applied by the
/// parameter resolver, not here.
pub trait Prompter {
    /// Displays the prompt text and returns the raw line the user entered,
    /// which may be empty.
    fn prompt_line(&self, text: &str) -> Result<String>;

    /// Asks the user to pick one of the items and returns its index.
    fn select(&self, text: &str, items: &[String]) -> Result<usize>;
}

/// Terminal prompter backed by dialoguer.
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        DialoguerPrompter::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn prompt_line(&self, text: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(text)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| Error::PromptError(e.to_string()))
    }

    fn select(&self, text: &str, items: &[String]) -> Result<usize> {
        Select::new()
            .with_prompt(text)
            .items(items)
            .default(0)
            .interact()
            .map_err(|e| Error::PromptError(e.to_string()))
    }
}
