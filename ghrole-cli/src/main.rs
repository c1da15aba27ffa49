//! ghrole: authorize a GitHub repository to deploy to AWS.
//!
//! # Usage
//!
//! ```text
//! ghrole deploy --repo <owner/repo> [--stack <name>] [--region <r>] [--profile <p>]
//!               [--template <path>] [--oidc-provider-arn <arn>] [--yes]
//!               [--wait-timeout <secs>] [--json]
//! ghrole status (--repo <owner/repo> | --stack <name>) [--region <r>] [--profile <p>] [--json]
//! ghrole template [--template <path>]
//! ```

mod commands;
mod logging;
mod prompt;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{deploy::DeployArgs, status::StatusArgs, template::TemplateArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "ghrole",
    version,
    about = "Deploy an IAM role that a GitHub repository can assume from GitHub Actions",
    long_about = None,
)]
struct Cli {
    /// Log remote calls and every status poll.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create or update the role stack and print the role ARN.
    Deploy(DeployArgs),

    /// Show the current state and outputs of the role stack.
    Status(StatusArgs),

    /// Print the template that `deploy` would submit.
    Template(TemplateArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    match cli.command {
        Commands::Deploy(args) => args.run(),
        Commands::Status(args) => args.run(),
        Commands::Template(args) => args.run(),
    }
}
