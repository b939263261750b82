use serde::{Deserialize, Serialize};

/// Whether a command runs as the app user or through the escalation shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    Standard,
    Elevated,
}

/// What an allowlisted program may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capability {
    pub unprivileged: bool,
    pub privileged: bool,
}

impl Capability {
    pub const FULL: Self = Self {
        unprivileged: true,
        privileged: true,
    };

    pub const UNPRIVILEGED_ONLY: Self = Self {
        unprivileged: true,
        privileged: false,
    };

    pub fn permits(self, privilege: Privilege) -> bool {
        match privilege {
            Privilege::Standard => self.unprivileged,
            Privilege::Elevated => self.privileged,
        }
    }
}

/// Behavior of relative path resolution when canonicalization fails
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PathResolveMode {
    /// Fall back to the raw `cwd/path` concatenation
    #[default]
    Lenient,
    /// Canonicalize the parent instead; refuse the path if that fails too
    Strict,
}
