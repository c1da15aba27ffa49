//! Shared deploy entrypoint: resolve → reconcile → extract the role ARN.

use ghrole_core::{
    classify, DeployError, Parameters, Presence, ReconcileOutcome, StackDescription, StackName,
    Template, ROLE_OUTPUT_KEY,
};

use crate::api::{StackApi, StackRequest, StackWaiter};
use crate::{outputs, reconciler, resolver};

/// Everything one deploy run needs.
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub stack: StackName,
    pub template: Template,
    pub parameters: Parameters,
    /// Output to read back once the stack is stable.
    pub output_key: String,
}

impl DeployRequest {
    /// A request that reads back the role ARN.
    pub fn new(stack: StackName, template: Template, parameters: Parameters) -> Self {
        Self {
            stack,
            template,
            parameters,
            output_key: ROLE_OUTPUT_KEY.to_owned(),
        }
    }
}

/// What a successful deploy did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployReport {
    pub stack: StackName,
    /// What the resolver found before submitting.
    pub presence: Presence,
    pub outcome: ReconcileOutcome,
    /// Value of `output_key`.
    pub output_value: String,
}

/// Run a full deploy.
pub async fn deploy<A, W>(
    api: &A,
    waiter: &W,
    request: &DeployRequest,
) -> Result<DeployReport, DeployError>
where
    A: StackApi + ?Sized,
    W: StackWaiter + ?Sized,
{
    let presence = resolver::resolve(api, &request.stack).await?;
    let stack_request = StackRequest::new(
        request.stack.clone(),
        request.template.body(),
        request.parameters.clone(),
    );
    let outcome = reconciler::apply(api, waiter, presence, &stack_request).await?;

    tracing::info!(stack = %request.stack, key = %request.output_key, "reading stack output");
    let output_value = outputs::extract_output(api, &request.stack, &request.output_key).await?;

    Ok(DeployReport {
        stack: request.stack.clone(),
        presence,
        outcome,
        output_value,
    })
}

/// Read-only view of a stack, for `ghrole status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackSnapshot {
    Absent,
    Present(StackDescription),
}

/// Describe `name` without mutating anything.
pub async fn inspect<A>(api: &A, name: &StackName) -> Result<StackSnapshot, DeployError>
where
    A: StackApi + ?Sized,
{
    match api.describe_stack(name).await {
        Ok(description) => Ok(StackSnapshot::Present(description)),
        Err(err) if classify::is_stack_missing(&err) => Ok(StackSnapshot::Absent),
        Err(err) => Err(DeployError::remote(name, "DescribeStacks", err)),
    }
}
