use crate::error::PolicyViolation;
use crate::security::{Privilege, ValidatedCommand};

/// Privilege escalation program; always invoked as `su -c <inner>`.
pub const ESCALATION_BINARY: &str = "su";

/// Wrap `arg` in single quotes so a POSIX shell reads it back as one literal
/// word. Embedded `'` becomes `'\''` (close, escaped quote, reopen).
pub fn quote_argument(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', r"'\''"))
}

/// The inner command string handed to the escalation shell.
///
/// This is a syntax-safety mechanism only. Every constructor takes input that
/// has already passed policy: a [`ValidatedCommand`] checked for elevated use,
/// or strings the gateway generates itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElevatedCommand {
    inner: String,
    program: String,
}

impl ElevatedCommand {
    /// Command tokens verbatim, then each argument single-quoted.
    pub fn from_validated(command: &ValidatedCommand) -> Result<Self, PolicyViolation> {
        if command.privilege() != Privilege::Elevated {
            return Err(PolicyViolation::ElevatedCommandNotAllowed);
        }

        let mut inner = command.command_tokens().join(" ");
        for arg in command.args() {
            inner.push(' ');
            inner.push_str(&quote_argument(arg));
        }

        Ok(Self {
            inner,
            program: command.program().to_string(),
        })
    }

    /// Build from gateway-generated parts that are not argv-quoted.
    pub(crate) fn from_trusted_parts(program: &str, rest: &[&str]) -> Self {
        let mut inner = program.to_string();
        for part in rest {
            inner.push(' ');
            inner.push_str(part);
        }
        Self {
            inner,
            program: program.to_string(),
        }
    }

    pub fn inner(&self) -> &str {
        &self.inner
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Exactly three tokens for the outer launcher.
    pub fn argv(&self) -> [&str; 3] {
        [ESCALATION_BINARY, "-c", &self.inner]
    }
}
