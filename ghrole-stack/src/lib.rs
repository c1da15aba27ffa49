//! # ghrole-stack
//!
//! Stack reconciliation against a remote API.
//!
//! Call [`pipeline::deploy`] to resolve, reconcile and read back the role ARN
//! in one go, or use [`resolver::resolve`], [`reconciler::reconcile`] and
//! [`outputs::extract_output`] individually. The remote system is reached
//! only through the traits in [`api`]; [`aws`] implements them.

pub mod api;
pub mod aws;
pub mod outputs;
pub mod pipeline;
pub mod reconciler;
pub mod resolver;
pub mod waiter;

pub use api::{IdentityLookup, StackApi, StackRequest, StackWaiter};
pub use pipeline::{deploy, DeployReport, DeployRequest, StackSnapshot};
pub use waiter::PollingWaiter;
