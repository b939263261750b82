use super::SecurityPolicy;
use super::types::Privilege;
use crate::error::PolicyViolation;

/// Characters that let a string escape its syntactic role in a shell.
pub const DANGEROUS_CHARACTERS: &[char] = &[
    ';', '&', '|', '`', '$', '<', '>', '(', ')', '{', '}', '[', ']', '\n', '\r',
];

pub fn contains_dangerous_characters(s: &str) -> bool {
    s.contains(DANGEROUS_CHARACTERS)
}

/// `false` if any argument contains a dangerous character.
pub fn are_arguments_safe<S: AsRef<str>>(args: &[S]) -> bool {
    !args
        .iter()
        .any(|arg| contains_dangerous_characters(arg.as_ref()))
}

/// A command that passed the allowlist and the dangerous-character check.
///
/// This is the only input the launcher and the escalation builder accept;
/// the single constructor is [`SecurityPolicy::validate_command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCommand {
    tokens: Vec<String>,
    args: Vec<String>,
    privilege: Privilege,
}

impl ValidatedCommand {
    /// The allowlisted program basename.
    pub fn program(&self) -> &str {
        &self.tokens[0]
    }

    /// Tokens of the command string itself, program first.
    pub fn command_tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Caller-supplied arguments, in order.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn privilege(&self) -> Privilege {
        self.privilege
    }

    /// Program followed by every argument, for argv-separated spawning.
    pub fn argv(&self) -> Vec<String> {
        self.tokens.iter().chain(&self.args).cloned().collect()
    }
}

impl SecurityPolicy {
    /// Check if a command string may run unprivileged.
    ///
    /// Fails when the string is empty, when its first whitespace-delimited
    /// token is not allowlisted, or when a dangerous character appears
    /// anywhere in it.
    pub fn is_command_allowed(&self, command: &str) -> bool {
        self.is_command_allowed_as(command, Privilege::Standard)
    }

    pub fn is_command_allowed_as(&self, command: &str, privilege: Privilege) -> bool {
        let Some(base_cmd) = command.split_whitespace().next() else {
            return false;
        };

        if !self.allowlist.permits(base_cmd, privilege) {
            return false;
        }

        !contains_dangerous_characters(command)
    }

    /// Run every check and produce the typed command downstream code needs.
    pub fn validate_command(
        &self,
        command: &str,
        args: &[String],
        privilege: Privilege,
    ) -> Result<ValidatedCommand, PolicyViolation> {
        if !self.is_command_allowed_as(command, privilege) {
            return Err(match privilege {
                Privilege::Standard => PolicyViolation::CommandNotAllowed,
                Privilege::Elevated => PolicyViolation::ElevatedCommandNotAllowed,
            });
        }

        if !are_arguments_safe(args) {
            return Err(PolicyViolation::UnsafeArguments);
        }

        Ok(ValidatedCommand {
            tokens: command.split_whitespace().map(String::from).collect(),
            args: args.to_vec(),
            privilege,
        })
    }
}
