//! `ghrole template`: print the template `deploy` would submit.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use ghrole_core::Template;

/// Arguments for `ghrole template`.
#[derive(Args, Debug)]
pub struct TemplateArgs {
    /// Template file to validate and print instead of the default lookup.
    #[arg(long, value_name = "PATH")]
    pub template: Option<PathBuf>,
}

impl TemplateArgs {
    pub fn run(self) -> Result<()> {
        let template =
            Template::resolve(self.template.as_deref()).context("failed to load the stack template")?;
        eprintln!("# source: {}", template.origin().display());
        print!("{}", template.body());
        Ok(())
    }
}
