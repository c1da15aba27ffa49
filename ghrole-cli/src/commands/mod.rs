//! Subcommands and the arguments they share.

pub mod deploy;
pub mod status;
pub mod template;

use std::future::Future;

use anyhow::{Context, Result};
use clap::Args;

use ghrole_core::{AwsSettings, RepoName, StackName};

/// AWS account selection shared by commands that talk to AWS.
#[derive(Args, Debug, Clone)]
pub struct AwsArgs {
    /// AWS region (defaults to the SDK's region chain, then us-east-1).
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Named AWS profile to take credentials from.
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,
}

impl From<AwsArgs> for AwsSettings {
    fn from(args: AwsArgs) -> Self {
        AwsSettings {
            region: args.region,
            profile: args.profile,
        }
    }
}

/// Validate `--repo`.
pub fn parse_repo(raw: &str) -> Result<RepoName> {
    RepoName::parse(raw).context(
        "--repo must be the GitHub repository that will be authorized to deploy to AWS",
    )
}

/// `--stack` if given, else the name derived from the repository.
pub fn stack_name(explicit: Option<&str>, repo: Option<&RepoName>) -> Result<StackName> {
    match (explicit, repo) {
        (Some(raw), _) => Ok(StackName::parse(raw)?),
        (None, Some(repo)) => Ok(repo.default_stack_name()),
        (None, None) => anyhow::bail!("provide --repo or --stack"),
    }
}

/// Run `future` to completion on a single-threaded runtime.
pub fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    Ok(runtime.block_on(future))
}
