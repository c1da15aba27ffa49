//! Does the stack exist?

use ghrole_core::{classify, DeployError, Presence, StackName};

use crate::api::StackApi;

/// Classify `name` as [`Presence::Exists`] or [`Presence::Absent`].
///
/// Only the remote "does not exist" validation error maps to `Absent`. Every
/// other failure (permissions, throttling, malformed name, transport) is
/// returned unchanged inside [`DeployError::Remote`]; nothing is retried.
pub async fn resolve<A>(api: &A, name: &StackName) -> Result<Presence, DeployError>
where
    A: StackApi + ?Sized,
{
    match api.describe_stack(name).await {
        Ok(description) => {
            tracing::debug!(stack = %name, status = %description.status, "stack exists");
            Ok(Presence::Exists)
        }
        Err(err) if classify::is_stack_missing(&err) => {
            tracing::debug!(stack = %name, "stack does not exist yet");
            Ok(Presence::Absent)
        }
        Err(err) => Err(DeployError::remote(name, "DescribeStacks", err)),
    }
}
