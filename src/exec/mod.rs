pub mod engine;
pub mod escalation;
pub mod launcher;
pub mod packages;

pub use engine::{ExecutionEngine, ExecutionEnv};
pub use escalation::{ESCALATION_BINARY, ElevatedCommand, quote_argument};
pub use launcher::{LaunchSpec, ProcessLauncher, RawOutput, SystemLauncher};
pub use packages::{PackageManager, PackageName};

use crate::error::PolicyViolation;
use serde::{Deserialize, Serialize};

/// Outcome of one gateway operation, returned even when nothing ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    #[serde(rename = "output")]
    pub stdout: String,
    #[serde(rename = "error")]
    pub stderr: String,
    #[serde(rename = "exitCode")]
    pub exit_code: i32,
}

impl ExecutionResult {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: 0,
        }
    }

    pub fn failure(stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code: 1,
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

impl From<PolicyViolation> for ExecutionResult {
    fn from(violation: PolicyViolation) -> Self {
        tracing::warn!("blocked by security policy: {violation}");
        Self::failure(violation.to_string())
    }
}
