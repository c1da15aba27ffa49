//! Error types for ghrole-core.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::types::{OperationKind, StackName, StackStatus};

/// A failure reported by the remote API, kept exactly as received.
///
/// `category` is the remote error code (e.g. `ValidationError`,
/// `AccessDenied`, `Throttling`); transport failures that never reached the
/// service use a local category such as `DispatchFailure`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{category}: {message}")]
pub struct RemoteError {
    pub category: String,
    pub message: String,
}

impl RemoteError {
    pub fn new(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            message: message.into(),
        }
    }
}

/// Invalid operator input, rejected before any remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("repository name is empty")]
    EmptyRepo,

    #[error("'{repo}' is not a full repository name; expected owner/repo, for example my-org/my-repo")]
    RepoMissingSlash { repo: String },

    #[error("stack name is empty")]
    EmptyStackName,
}

/// Errors loading or validating a template document.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read template at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Not valid YAML; includes line context from serde_yaml.
    #[error("failed to parse template at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("template at {path} is not a YAML mapping")]
    NotAMapping { path: PathBuf },

    #[error("template at {path} declares no Resources")]
    MissingResources { path: PathBuf },
}

/// Everything that can stop a deployment.
///
/// `Remote`, `WaitFailed` and `WaitTimeout` are all unexpected remote
/// failures (see [`DeployError::is_unexpected_remote`]). `OutputNotFound` is
/// reported separately: the stack converged but the template no longer
/// exposes what the caller expects.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("{operation} failed for stack {stack}: {source}")]
    Remote {
        stack: StackName,
        operation: &'static str,
        #[source]
        source: RemoteError,
    },

    /// `reason` is the remote `StackStatusReason` from the last read, when
    /// there was one.
    #[error(
        "stack {stack} did not {operation}: it ended in {status}{}",
        .reason.as_deref().map(|r| format!(" ({r})")).unwrap_or_default()
    )]
    WaitFailed {
        stack: StackName,
        operation: OperationKind,
        status: StackStatus,
        reason: Option<String>,
    },

    #[error("timed out after {waited:?} waiting for stack {stack} to {operation}")]
    WaitTimeout {
        stack: StackName,
        operation: OperationKind,
        waited: Duration,
    },

    #[error(
        "could not find output '{key}' in the outputs of stack {stack}; did the deployment fail silently?"
    )]
    OutputNotFound { stack: StackName, key: String },
}

impl DeployError {
    /// Convenience constructor for [`DeployError::Remote`].
    pub fn remote(stack: &StackName, operation: &'static str, source: RemoteError) -> Self {
        DeployError::Remote {
            stack: stack.clone(),
            operation,
            source,
        }
    }

    /// `true` for any failure that originated on the remote side.
    pub fn is_unexpected_remote(&self) -> bool {
        matches!(
            self,
            DeployError::Remote { .. }
                | DeployError::WaitFailed { .. }
                | DeployError::WaitTimeout { .. }
        )
    }

    /// The untouched remote error, when there is one.
    pub fn remote_source(&self) -> Option<&RemoteError> {
        match self {
            DeployError::Remote { source, .. } => Some(source),
            _ => None,
        }
    }
}
