//! Poll a stack until its operation reaches a terminal state.

use async_trait::async_trait;
use tokio::time::{sleep, Instant};

use ghrole_core::{
    classify, DeployError, OperationKind, StackDescription, StackName, StackStatus, WaitPolicy,
};

use crate::api::{StackApi, StackWaiter};

/// A [`StackWaiter`] that re-reads the stack every `policy.delay` until it
/// reports the operation's success status, a terminal failure status, or
/// `policy.max_wait` has elapsed.
///
/// The future holds no state besides the clock, so dropping it (for example
/// from a `tokio::select!` against Ctrl-C) abandons the wait safely; the
/// remote operation keeps running and a later run picks the stack up again.
#[derive(Debug)]
pub struct PollingWaiter<'a, A: ?Sized> {
    api: &'a A,
    policy: WaitPolicy,
}

impl<'a, A: StackApi + ?Sized> PollingWaiter<'a, A> {
    pub fn new(api: &'a A, policy: WaitPolicy) -> Self {
        Self { api, policy }
    }
}

#[async_trait]
impl<A: StackApi + ?Sized> StackWaiter for PollingWaiter<'_, A> {
    async fn wait(&self, name: &StackName, operation: OperationKind) -> Result<(), DeployError> {
        let started = Instant::now();
        let mut polls = 0u32;

        loop {
            polls += 1;
            match self.api.describe_stack(name).await {
                Ok(description) => {
                    let StackDescription {
                        status,
                        status_reason,
                        ..
                    } = description;
                    if status.as_str() == operation.success_status() {
                        tracing::debug!(stack = %name, polls, "wait complete");
                        return Ok(());
                    }
                    if operation.failure_statuses().contains(&status.as_str()) {
                        return Err(DeployError::WaitFailed {
                            stack: name.clone(),
                            operation,
                            status,
                            reason: status_reason,
                        });
                    }
                    tracing::debug!(stack = %name, status = %status, polls, "still waiting");
                }
                // Deleted out from under us (or rolled back and cleaned up).
                Err(err) if classify::is_stack_missing(&err) => {
                    return Err(DeployError::WaitFailed {
                        stack: name.clone(),
                        operation,
                        status: StackStatus::from("DELETE_COMPLETE"),
                        reason: Some(err.message),
                    });
                }
                Err(err) => return Err(DeployError::remote(name, "DescribeStacks", err)),
            }

            let waited = started.elapsed();
            let remaining = self.policy.max_wait.saturating_sub(waited);
            if remaining.is_zero() {
                return Err(DeployError::WaitTimeout {
                    stack: name.clone(),
                    operation,
                    waited,
                });
            }
            sleep(self.policy.delay.min(remaining)).await;
        }
    }
}
