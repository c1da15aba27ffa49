//! Domain types for stack reconciliation.
//!
//! A stack is never persisted locally: [`StackName`] is only a handle that is
//! looked up remotely on every run, and [`StackDescription`] is a snapshot of
//! whatever the remote side returned for that lookup.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Template parameter carrying the `owner/repo` identifier.
pub const REPO_PARAMETER: &str = "FullRepoName";

/// Template parameter naming an existing GitHub OIDC provider. Left unset,
/// the stack creates the provider itself; an account holds at most one.
pub const OIDC_PROVIDER_PARAMETER: &str = "ExistingOIDCProviderArn";

/// Stack output exposing the ARN of the deployed role.
pub const ROLE_OUTPUT_KEY: &str = "Role";

/// Prefix of every derived stack name.
pub const STACK_NAME_PREFIX: &str = "github-deploy-";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A full GitHub repository name, e.g. `acme/widgets`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoName(pub String);

impl RepoName {
    /// Validate a repository name. It must be non-empty and contain a `/`.
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(InputError::EmptyRepo);
        }
        if !raw.contains('/') {
            return Err(InputError::RepoMissingSlash {
                repo: raw.to_owned(),
            });
        }
        Ok(Self(raw.to_owned()))
    }

    /// `github-deploy-<repo>` with every non-alphanumeric character replaced
    /// by `-`, lowercased. `acme/Widgets.rs` → `github-deploy-acme-widgets-rs`.
    pub fn default_stack_name(&self) -> StackName {
        let normalized: String = self
            .0
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '-'
                }
            })
            .collect();
        StackName(format!("{STACK_NAME_PREFIX}{normalized}"))
    }
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Name of the remote stack (the deployment unit).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StackName(pub String);

impl StackName {
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(InputError::EmptyStackName);
        }
        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StackName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for StackName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Named template parameters. Keys are unique; iteration order is stable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Parameters(BTreeMap<String, String>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// The parameter set the bundled template expects for `repo`.
    pub fn for_repository(repo: &RepoName) -> Self {
        let mut params = Self::new();
        params.insert(REPO_PARAMETER, repo.0.clone());
        params
    }

    /// Reuse the account's existing GitHub OIDC provider instead of creating
    /// one in the stack.
    pub fn with_oidc_provider(mut self, arn: impl Into<String>) -> Self {
        self.insert(OIDC_PROVIDER_PARAMETER, arn);
        self
    }

    /// Insert or replace a parameter value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Whether the stack currently exists remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Exists,
    Absent,
}

impl Presence {
    /// The mutation that converges a stack in this state.
    pub fn operation(self) -> OperationKind {
        match self {
            Presence::Absent => OperationKind::Create,
            Presence::Exists => OperationKind::Update,
        }
    }
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Presence::Exists => write!(f, "exists"),
            Presence::Absent => write!(f, "absent"),
        }
    }
}

/// The kind of mutation submitted, which also selects the waiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Create,
    Update,
}

impl OperationKind {
    /// Name of the remote API call that submits this operation.
    pub fn api_operation(self) -> &'static str {
        match self {
            OperationKind::Create => "CreateStack",
            OperationKind::Update => "UpdateStack",
        }
    }

    /// Status the waiter treats as success.
    pub fn success_status(self) -> &'static str {
        match self {
            OperationKind::Create => "CREATE_COMPLETE",
            OperationKind::Update => "UPDATE_COMPLETE",
        }
    }

    /// Statuses the waiter treats as terminal failure.
    pub fn failure_statuses(self) -> &'static [&'static str] {
        match self {
            OperationKind::Create => &[
                "CREATE_FAILED",
                "DELETE_COMPLETE",
                "DELETE_FAILED",
                "ROLLBACK_FAILED",
                "ROLLBACK_COMPLETE",
            ],
            OperationKind::Update => &[
                "UPDATE_FAILED",
                "UPDATE_ROLLBACK_FAILED",
                "UPDATE_ROLLBACK_COMPLETE",
            ],
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Create => write!(f, "create"),
            OperationKind::Update => write!(f, "update"),
        }
    }
}

/// Capabilities acknowledged on submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Required to create IAM resources with custom names.
    NamedIam,
}

impl Capability {
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::NamedIam => "CAPABILITY_NAMED_IAM",
        }
    }
}

/// Coarse lifecycle state of an existing stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackState {
    Stable,
    Updating,
    Failed,
}

impl fmt::Display for StackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackState::Stable => write!(f, "stable"),
            StackState::Updating => write!(f, "updating"),
            StackState::Failed => write!(f, "failed"),
        }
    }
}

/// Raw remote status string, e.g. `UPDATE_COMPLETE_CLEANUP_IN_PROGRESS`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StackStatus(pub String);

impl StackStatus {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_in_progress(&self) -> bool {
        self.0.ends_with("_IN_PROGRESS")
    }

    pub fn state(&self) -> StackState {
        if self.is_in_progress() {
            StackState::Updating
        } else if self.0.ends_with("_FAILED") || self.0.contains("ROLLBACK") {
            StackState::Failed
        } else {
            StackState::Stable
        }
    }
}

impl fmt::Display for StackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for StackStatus {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Result of a reconciliation that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "operation")]
pub enum ReconcileOutcome {
    /// A mutation was submitted and the stack converged.
    Applied(OperationKind),
    /// The remote side reported there was nothing to update.
    NoChanges,
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// Output values exposed by a stack, in the order the remote returned them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StackOutputs(pub Vec<(String, String)>);

impl StackOutputs {
    /// Exact, case-sensitive lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StackOutputs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// What a read-by-name returns for an existing stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackDescription {
    pub name: StackName,
    pub status: StackStatus,
    /// Why the stack is in `status`, as reported by the remote side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_reason: Option<String>,
    /// `None` when the remote response carried no outputs at all.
    pub outputs: Option<StackOutputs>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
