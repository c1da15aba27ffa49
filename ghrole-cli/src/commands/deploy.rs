//! `ghrole deploy`: create or update the role stack and print the role ARN.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use ghrole_core::{
    AwsSettings, DeployError, Parameters, Presence, ReconcileOutcome, RepoName, StackName,
    Template, WaitPolicy,
};
use ghrole_stack::aws::{load_sdk_config, region_of, CloudFormationApi, StsIdentity};
use ghrole_stack::{pipeline, DeployReport, DeployRequest, IdentityLookup, PollingWaiter};

use super::{block_on, parse_repo, stack_name, AwsArgs};
use crate::prompt;

/// Arguments for `ghrole deploy`.
#[derive(Args, Debug)]
pub struct DeployArgs {
    /// GitHub repository allowed to assume the role, e.g. my-org/my-repo.
    #[arg(long)]
    pub repo: String,

    /// Stack name override (default: github-deploy-<normalized repo>).
    #[arg(long)]
    pub stack: Option<String>,

    #[command(flatten)]
    pub aws: AwsArgs,

    /// Template to submit instead of the one shipped with ghrole.
    #[arg(long, value_name = "PATH")]
    pub template: Option<PathBuf>,

    /// ARN of the account's existing token.actions.githubusercontent.com
    /// OIDC provider. Required for every repository after the first one
    /// deployed into an account, since the provider can only exist once.
    #[arg(long, value_name = "ARN")]
    pub oidc_provider_arn: Option<String>,

    /// Skip the confirmation prompt.
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Give up waiting for the stack after this many seconds.
    #[arg(long, value_name = "SECS", default_value_t = WaitPolicy::DEFAULT_MAX_WAIT.as_secs())]
    pub wait_timeout: u64,

    /// Print a JSON report on stdout instead of the workflow snippet.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct DeployJson<'a> {
    repository: &'a str,
    stack: &'a str,
    account: &'a str,
    region: &'a str,
    presence: Presence,
    #[serde(flatten)]
    outcome: ReconcileOutcome,
    role_arn: &'a str,
}

impl DeployArgs {
    pub fn run(self) -> Result<()> {
        let repo = parse_repo(&self.repo)?;
        let stack = stack_name(self.stack.as_deref(), Some(&repo))?;
        let template = Template::resolve(self.template.as_deref())
            .context("failed to load the stack template")?;
        let policy = WaitPolicy::default().with_max_wait(Duration::from_secs(self.wait_timeout));
        let settings = AwsSettings::from(self.aws.clone());

        block_on(self.deploy(repo, stack, template, policy, settings))?
    }

    async fn deploy(
        &self,
        repo: RepoName,
        stack: StackName,
        template: Template,
        policy: WaitPolicy,
        settings: AwsSettings,
    ) -> Result<()> {
        let config = load_sdk_config(&settings).await;
        let region = region_of(&config);
        tracing::debug!(
            region = %region,
            profile = settings.profile_label(),
            template = %template.origin().display(),
            "loaded AWS configuration"
        );

        let account = StsIdentity::new(&config)
            .account_id()
            .await
            .context("failed to look up the AWS account for the current credentials")?;

        self.say(&format!(
            "The {} GitHub repository will be authorized to access AWS account {} in {}.\n\
             This will be done by deploying an IAM role using CloudFormation (stack name: \"{}\") \
             using the {} profile.\n",
            repo.to_string().bold(),
            account.bold(),
            region.bold(),
            stack,
            settings.profile_label(),
        ));
        if !template.is_builtin() {
            self.say(&format!("Template: {}\n", template.origin().display()));
        }
        if let Some(arn) = self.oidc_provider_arn.as_deref() {
            self.say(&format!("Existing GitHub OIDC provider: {arn}\n"));
        }

        if !self.yes && !prompt::confirm("Do you want to continue?")? {
            self.say("Aborted");
            return Ok(());
        }

        let api = CloudFormationApi::new(&config);
        let waiter = PollingWaiter::new(&api, policy);
        let request = DeployRequest::new(stack.clone(), template, self.parameters(&repo));

        eprintln!("{} Deploying AWS role", "›".cyan().bold());
        let result = tokio::select! {
            result = pipeline::deploy(&api, &waiter, &request) => result,
            Ok(()) = tokio::signal::ctrl_c() => {
                anyhow::bail!(
                    "interrupted while deploying stack {stack}; the stack operation continues \
                     in AWS, re-run the same command to pick it up"
                );
            }
        };

        let report = match result {
            Ok(report) => report,
            Err(err) => {
                report_failure(&err);
                return Err(err).with_context(|| format!("deployment of stack {stack} failed"));
            }
        };

        match report.outcome {
            ReconcileOutcome::NoChanges => {
                eprintln!("{} Role already up to date", "✓".green().bold())
            }
            ReconcileOutcome::Applied(_) => eprintln!("{} Role deployed", "✓".green().bold()),
        }

        if self.json {
            print_json(&repo, &account, &region, &report)?;
        } else {
            print_snippet(&report.output_value, &region);
        }
        Ok(())
    }

    fn parameters(&self, repo: &RepoName) -> Parameters {
        let params = Parameters::for_repository(repo);
        match self.oidc_provider_arn.as_deref() {
            Some(arn) => params.with_oidc_provider(arn),
            None => params,
        }
    }

    /// Human-facing text: stdout normally, stderr when stdout carries JSON.
    fn say(&self, message: &str) {
        if self.json {
            eprintln!("{message}");
        } else {
            println!("{message}");
        }
    }
}

fn report_failure(err: &DeployError) {
    match err {
        DeployError::OutputNotFound { .. } => eprintln!(
            "{} Stack deployed, but the role ARN could not be read",
            "✗".red().bold()
        ),
        _ => eprintln!("{} Deployment failed", "✗".red().bold()),
    }
}

fn print_json(repo: &RepoName, account: &str, region: &str, report: &DeployReport) -> Result<()> {
    let payload = DeployJson {
        repository: &repo.0,
        stack: report.stack.as_str(),
        account,
        region,
        presence: report.presence,
        outcome: report.outcome,
        role_arn: &report.output_value,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to render deploy report JSON")?
    );
    Ok(())
}

fn print_snippet(role_arn: &str, region: &str) {
    println!();
    println!("Role ARN: {}", role_arn.bold());
    println!();
    println!("{}", workflow_snippet(role_arn, region));
}

/// GitHub Actions lines that assume the deployed role.
fn workflow_snippet(role_arn: &str, region: &str) -> String {
    format!(
        "You can now add these lines to your GitHub Actions file (for example .github/workflows/deploy.yml):

# ...
permissions:
    id-token: write # This is required for requesting the JWT
    contents: read  # This is required for actions/checkout
jobs:
    deploy:
        steps:
            # ...
            -   name: Configure AWS credentials
                uses: aws-actions/configure-aws-credentials@v4
                with:
                    role-to-assume: {role_arn}
                    role-session-name: github-deploy
                    aws-region: {region}"
    )
}
