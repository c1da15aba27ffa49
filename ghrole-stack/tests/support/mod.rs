//! Scripted remote + counting waiter shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use ghrole_core::{
    DeployError, OperationKind, RemoteError, StackDescription, StackName, StackOutputs,
    StackStatus,
};
use ghrole_stack::{StackApi, StackRequest, StackWaiter};

pub const MISSING_MESSAGE: &str = "Stack with id github-deploy-acme-widgets does not exist";
pub const NO_UPDATES_MESSAGE: &str = "No updates are to be performed.";
pub const ROLE_ARN: &str = "arn:aws:iam::123456789012:role/github-deploy";

pub fn missing() -> RemoteError {
    RemoteError::new("ValidationError", MISSING_MESSAGE)
}

pub fn no_updates() -> RemoteError {
    RemoteError::new("ValidationError", NO_UPDATES_MESSAGE)
}

pub fn described(status: &str, outputs: Option<&[(&str, &str)]>) -> StackDescription {
    StackDescription {
        name: StackName::from("github-deploy-acme-widgets"),
        status: StackStatus::from(status),
        status_reason: None,
        outputs: outputs.map(|o| o.iter().copied().collect::<StackOutputs>()),
    }
}

/// A stub remote. Describe results are consumed in order; the last one
/// repeats. Every submission is recorded.
pub struct FakeStackApi {
    describes: Mutex<VecDeque<Result<StackDescription, RemoteError>>>,
    submit_result: Mutex<Option<RemoteError>>,
    pub submissions: Mutex<Vec<(OperationKind, StackRequest)>>,
    pub describe_calls: Mutex<u32>,
}

impl FakeStackApi {
    pub fn new(describes: Vec<Result<StackDescription, RemoteError>>) -> Self {
        Self {
            describes: Mutex::new(describes.into()),
            submit_result: Mutex::new(None),
            submissions: Mutex::new(Vec::new()),
            describe_calls: Mutex::new(0),
        }
    }

    /// Make the next submission fail with `err`.
    pub fn failing_submit(self, err: RemoteError) -> Self {
        *self.submit_result.lock().unwrap() = Some(err);
        self
    }

    pub fn submissions(&self) -> Vec<(OperationKind, StackRequest)> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn describe_calls(&self) -> u32 {
        *self.describe_calls.lock().unwrap()
    }
}

#[async_trait]
impl StackApi for FakeStackApi {
    async fn describe_stack(&self, _name: &StackName) -> Result<StackDescription, RemoteError> {
        *self.describe_calls.lock().unwrap() += 1;
        let mut describes = self.describes.lock().unwrap();
        if describes.len() > 1 {
            describes.pop_front().expect("non-empty")
        } else {
            describes.front().cloned().expect("at least one scripted describe")
        }
    }

    async fn submit(
        &self,
        operation: OperationKind,
        request: &StackRequest,
    ) -> Result<(), RemoteError> {
        self.submissions
            .lock()
            .unwrap()
            .push((operation, request.clone()));
        match self.submit_result.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Records every wait and returns instantly.
#[derive(Default)]
pub struct CountingWaiter {
    pub waits: Mutex<Vec<(StackName, OperationKind)>>,
    fail_with: Mutex<Option<StackStatus>>,
}

impl CountingWaiter {
    /// A waiter whose wait ends in `status`.
    pub fn failing(status: &str) -> Self {
        Self {
            waits: Mutex::new(Vec::new()),
            fail_with: Mutex::new(Some(StackStatus::from(status))),
        }
    }

    pub fn waits(&self) -> Vec<(StackName, OperationKind)> {
        self.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl StackWaiter for CountingWaiter {
    async fn wait(&self, name: &StackName, operation: OperationKind) -> Result<(), DeployError> {
        self.waits.lock().unwrap().push((name.clone(), operation));
        match self.fail_with.lock().unwrap().clone() {
            Some(status) => Err(DeployError::WaitFailed {
                stack: name.clone(),
                operation,
                status,
                reason: None,
            }),
            None => Ok(()),
        }
    }
}
