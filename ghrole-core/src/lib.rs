//! ghrole core library: domain types, error taxonomy, template, settings.
//!
//! - [`types`]: newtypes and domain structs
//! - [`error`]: [`DeployError`], [`RemoteError`], [`TemplateError`], [`InputError`]
//! - [`classify`]: the two remote errors that are recovered locally
//! - [`template`]: template lookup and validation
//! - [`settings`]: region/profile and wait policy

pub mod classify;
pub mod error;
pub mod settings;
pub mod template;
pub mod types;

pub use error::{DeployError, InputError, RemoteError, TemplateError};
pub use settings::{AwsSettings, WaitPolicy};
pub use template::Template;
pub use types::{
    Capability, OperationKind, Parameters, Presence, ReconcileOutcome, RepoName, StackDescription,
    StackName, StackOutputs, StackState, StackStatus, OIDC_PROVIDER_PARAMETER, REPO_PARAMETER,
    ROLE_OUTPUT_KEY,
};
