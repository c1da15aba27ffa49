//! Create-or-update, then wait.
//!
//! ```text
//! Absent  -> CreateStack -> wait (create)
//! Exists  -> UpdateStack -> wait (update)
//!            "No updates are to be performed" -> NoChanges, no wait
//! ```

use ghrole_core::{
    classify, DeployError, Parameters, Presence, ReconcileOutcome, StackName, Template,
};

use crate::api::{StackApi, StackRequest, StackWaiter};
use crate::resolver;

/// Converge `name` to `template` + `parameters`.
///
/// Resolves the stack first, then delegates to [`apply`].
pub async fn reconcile<A, W>(
    api: &A,
    waiter: &W,
    name: &StackName,
    template: &Template,
    parameters: &Parameters,
) -> Result<ReconcileOutcome, DeployError>
where
    A: StackApi + ?Sized,
    W: StackWaiter + ?Sized,
{
    let presence = resolver::resolve(api, name).await?;
    let request = StackRequest::new(name.clone(), template.body(), parameters.clone());
    apply(api, waiter, presence, &request).await
}

/// Submit the mutation matching `presence` and wait for it.
pub async fn apply<A, W>(
    api: &A,
    waiter: &W,
    presence: Presence,
    request: &StackRequest,
) -> Result<ReconcileOutcome, DeployError>
where
    A: StackApi + ?Sized,
    W: StackWaiter + ?Sized,
{
    let operation = presence.operation();
    let name = &request.name;

    tracing::info!(
        stack = %name,
        operation = %operation,
        parameters = request.parameters.len(),
        "submitting stack operation"
    );
    match api.submit(operation, request).await {
        Ok(()) => {}
        Err(err) if classify::is_no_op_update(&err) => {
            tracing::info!(stack = %name, "stack is already up to date");
            return Ok(ReconcileOutcome::NoChanges);
        }
        Err(err) => return Err(DeployError::remote(name, operation.api_operation(), err)),
    }

    waiter.wait(name, operation).await?;
    tracing::info!(stack = %name, operation = %operation, "stack operation complete");
    Ok(ReconcileOutcome::Applied(operation))
}
