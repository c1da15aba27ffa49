//! Seams to the remote system.
//!
//! The resolver, reconciler and output extraction only talk to these traits.
//! [`crate::aws`] implements them against CloudFormation and STS; tests use
//! scripted fakes.

use async_trait::async_trait;

use ghrole_core::{
    Capability, DeployError, OperationKind, Parameters, RemoteError, StackDescription, StackName,
};

/// A complete desired-state declaration for one stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackRequest {
    pub name: StackName,
    /// Submitted verbatim.
    pub template_body: String,
    pub parameters: Parameters,
    pub capabilities: Vec<Capability>,
}

impl StackRequest {
    /// Build a request that acknowledges named IAM resources.
    pub fn new(name: StackName, template_body: impl Into<String>, parameters: Parameters) -> Self {
        Self {
            name,
            template_body: template_body.into(),
            parameters,
            capabilities: vec![Capability::NamedIam],
        }
    }
}

/// Read and mutate stacks by name.
#[async_trait]
pub trait StackApi: Send + Sync {
    /// Read the current description of `name`.
    ///
    /// A missing stack is reported as an error, exactly as the remote API does;
    /// use [`ghrole_core::classify::is_stack_missing`] to recognise it.
    async fn describe_stack(&self, name: &StackName) -> Result<StackDescription, RemoteError>;

    /// Submit a create or update. Returns once the remote side accepted it.
    async fn submit(
        &self,
        operation: OperationKind,
        request: &StackRequest,
    ) -> Result<(), RemoteError>;
}

/// Block until a submitted operation reaches a terminal state.
#[async_trait]
pub trait StackWaiter: Send + Sync {
    async fn wait(&self, name: &StackName, operation: OperationKind) -> Result<(), DeployError>;
}

/// Who the ambient credentials belong to.
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    async fn account_id(&self) -> Result<String, RemoteError>;
}
