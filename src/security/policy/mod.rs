mod command;
mod path;
mod types;

pub use command::{
    DANGEROUS_CHARACTERS, ValidatedCommand, are_arguments_safe, contains_dangerous_characters,
};
pub use path::reject_traversal;
pub use types::{Capability, PathResolveMode, Privilege};

use std::collections::{HashMap, HashSet};

/// Immutable registry of permitted program basenames and their capability.
#[derive(Debug, Clone)]
pub struct CommandAllowlist {
    entries: HashMap<String, Capability>,
}

impl CommandAllowlist {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: names
                .into_iter()
                .map(|name| (name.into(), Capability::FULL))
                .collect(),
        }
    }

    pub fn capability(&self, program: &str) -> Option<Capability> {
        self.entries.get(program).copied()
    }

    pub fn permits(&self, program: &str, privilege: Privilege) -> bool {
        self.capability(program)
            .is_some_and(|capability| capability.permits(privilege))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Narrow the built-in set. Names that are not present are ignored, so
    /// configuration can never add a program.
    fn restrict(&mut self, disabled: &[String], unprivileged_only: &[String]) {
        for name in disabled {
            self.entries.remove(name);
        }
        for name in unprivileged_only {
            if let Some(capability) = self.entries.get_mut(name) {
                *capability = Capability::UNPRIVILEGED_ONLY;
            }
        }
    }
}

impl Default for CommandAllowlist {
    fn default() -> Self {
        Self::from_names(crate::security::default_allowed_commands())
    }
}

/// Security policy enforced on every execution and filesystem mutation
#[derive(Debug, Clone)]
pub struct SecurityPolicy {
    pub allowlist: CommandAllowlist,
    pub package_managers: HashSet<String>,
    pub resolve_mode: PathResolveMode,
}

impl Default for SecurityPolicy {
    fn default() -> Self {
        Self {
            allowlist: CommandAllowlist::default(),
            package_managers: crate::security::default_package_managers()
                .into_iter()
                .collect(),
            resolve_mode: PathResolveMode::default(),
        }
    }
}

impl SecurityPolicy {
    /// Build from config sections
    pub fn from_config(
        allowlist_config: &crate::config::AllowlistConfig,
        paths_config: &crate::config::PathsConfig,
    ) -> Self {
        let mut policy = Self {
            resolve_mode: paths_config.resolve_mode,
            ..Self::default()
        };
        policy
            .allowlist
            .restrict(&allowlist_config.disabled, &allowlist_config.unprivileged_only);
        policy
    }

    pub fn is_package_manager_allowed(&self, manager: &str) -> bool {
        self.package_managers.contains(manager)
    }
}
