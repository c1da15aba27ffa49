//! Operator confirmation.

use anyhow::{Context, Result};
use dialoguer::Confirm;

/// Ask a yes/no question on the terminal. Defaults to "no".
pub fn confirm(question: &str) -> Result<bool> {
    Confirm::new()
        .with_prompt(question)
        .default(false)
        .interact()
        .context("confirmation needs an interactive terminal; pass --yes to skip it")
}
