//! Read a named output back after convergence.

use ghrole_core::{DeployError, StackName};

use crate::api::StackApi;

/// Re-read `name` and return the value of output `key`.
///
/// This is a fresh read, independent of the one the resolver made. A stack
/// that reports no outputs, or none named `key`, yields
/// [`DeployError::OutputNotFound`].
pub async fn extract_output<A>(api: &A, name: &StackName, key: &str) -> Result<String, DeployError>
where
    A: StackApi + ?Sized,
{
    let description = api
        .describe_stack(name)
        .await
        .map_err(|err| DeployError::remote(name, "DescribeStacks", err))?;

    description
        .outputs
        .as_ref()
        .and_then(|outputs| outputs.get(key))
        .map(str::to_owned)
        .ok_or_else(|| DeployError::OutputNotFound {
            stack: name.clone(),
            key: key.to_owned(),
        })
}
