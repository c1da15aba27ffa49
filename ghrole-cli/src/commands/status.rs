//! `ghrole status`: read-only view of the role stack.

use anyhow::{Context, Result};
use clap::{ArgGroup, Args};
use colored::Colorize;
use serde::Serialize;

use ghrole_core::{AwsSettings, StackDescription, StackName, StackState, ROLE_OUTPUT_KEY};
use ghrole_stack::aws::{load_sdk_config, CloudFormationApi};
use ghrole_stack::{pipeline, StackSnapshot};

use super::{block_on, parse_repo, stack_name, AwsArgs};

/// Arguments for `ghrole status`.
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("target").required(true).multiple(true).args(["repo", "stack"])))]
pub struct StatusArgs {
    /// GitHub repository whose stack to show.
    #[arg(long)]
    pub repo: Option<String>,

    /// Stack name (overrides the name derived from --repo).
    #[arg(long)]
    pub stack: Option<String>,

    #[command(flatten)]
    pub aws: AwsArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct StatusJson<'a> {
    stack: &'a str,
    exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<StackState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role_arn: Option<&'a str>,
    outputs: Vec<OutputJson<'a>>,
}

#[derive(Serialize)]
struct OutputJson<'a> {
    key: &'a str,
    value: &'a str,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let repo = self.repo.as_deref().map(parse_repo).transpose()?;
        let stack = stack_name(self.stack.as_deref(), repo.as_ref())?;
        let settings = AwsSettings::from(self.aws.clone());

        let snapshot = block_on(async {
            let config = load_sdk_config(&settings).await;
            let api = CloudFormationApi::new(&config);
            pipeline::inspect(&api, &stack).await
        })?
        .with_context(|| format!("failed to read stack {stack}"))?;

        if self.json {
            print_json(&stack, &snapshot)
        } else {
            print_human(&stack, &snapshot);
            Ok(())
        }
    }
}

fn print_json(stack: &StackName, snapshot: &StackSnapshot) -> Result<()> {
    let description = match snapshot {
        StackSnapshot::Absent => None,
        StackSnapshot::Present(description) => Some(description),
    };
    let payload = StatusJson {
        stack: stack.as_str(),
        exists: description.is_some(),
        status: description.map(|d| d.status.as_str()),
        state: description.map(|d| d.status.state()),
        role_arn: description.and_then(role_arn),
        outputs: description
            .and_then(|d| d.outputs.as_ref())
            .map(|outputs| {
                outputs
                    .0
                    .iter()
                    .map(|(key, value)| OutputJson { key, value })
                    .collect()
            })
            .unwrap_or_default(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to render status JSON")?
    );
    Ok(())
}

fn print_human(stack: &StackName, snapshot: &StackSnapshot) {
    let description = match snapshot {
        StackSnapshot::Absent => {
            println!("{} {stack} does not exist yet", "■".bright_black().bold());
            println!("Run 'ghrole deploy --repo <owner/repo>' to create it.");
            return;
        }
        StackSnapshot::Present(description) => description,
    };

    let state = description.status.state();
    let marker = match state {
        StackState::Stable => "■".green().bold(),
        StackState::Updating => "■".yellow().bold(),
        StackState::Failed => "■".red().bold(),
    };
    println!("{marker} {stack}  {} ({state})", description.status);

    match description.outputs.as_ref().filter(|o| !o.is_empty()) {
        Some(outputs) => {
            for (key, value) in &outputs.0 {
                println!("  {key}: {value}");
            }
        }
        None => println!("  (no outputs)"),
    }
    if role_arn(description).is_none() && state == StackState::Stable {
        println!(
            "{}",
            format!("  stack exposes no '{ROLE_OUTPUT_KEY}' output").yellow()
        );
    }
}

fn role_arn(description: &StackDescription) -> Option<&str> {
    description
        .outputs
        .as_ref()
        .and_then(|outputs| outputs.get(ROLE_OUTPUT_KEY))
}
