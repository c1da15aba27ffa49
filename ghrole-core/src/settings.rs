//! Explicit configuration threaded into client construction and waiting.

use std::time::Duration;

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// AWS account/region selection. Never read from the environment by the
/// reconciliation code itself; the CLI fills it in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwsSettings {
    pub region: Option<String>,
    pub profile: Option<String>,
}

impl AwsSettings {
    pub fn effective_region(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }

    /// Profile name for display.
    pub fn profile_label(&self) -> &str {
        self.profile.as_deref().unwrap_or("default")
    }
}

/// How the waiter polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Pause between two status reads.
    pub delay: Duration,
    /// Give up once this much time has passed since submission.
    pub max_wait: Duration,
}

impl WaitPolicy {
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(5);
    pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(60 * 60);

    pub fn with_max_wait(self, max_wait: Duration) -> Self {
        Self { max_wait, ..self }
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            delay: Self::DEFAULT_DELAY,
            max_wait: Self::DEFAULT_MAX_WAIT,
        }
    }
}
