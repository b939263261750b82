use super::ExecutionResult;
use super::engine::ExecutionEngine;
use super::escalation::ElevatedCommand;
use crate::error::PolicyViolation;
use crate::security::SecurityPolicy;
use tracing::info;

/// A package name made only of ASCII letters, digits, `_` and `-`.
///
/// The install path relies on this check, not on argv quoting, to keep the
/// name inert inside the escalation shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageName(String);

impl PackageName {
    pub fn parse(name: &str) -> Result<Self, PolicyViolation> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid {
            Ok(Self(name.to_string()))
        } else {
            Err(PolicyViolation::InvalidPackageName)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum PackageManager {
    Pkg,
    AptGet,
    Pacman,
    Yum,
}

impl PackageManager {
    /// Map a logical source tag to a manager; unknown or absent tags use `pkg`.
    pub fn for_source(source: Option<&str>) -> Self {
        match source.unwrap_or("auto") {
            "apt" | "ubuntu" | "debian" => Self::AptGet,
            "pacman" | "arch" => Self::Pacman,
            "yum" | "rpm" => Self::Yum,
            _ => Self::Pkg,
        }
    }

    pub fn install_subcommand(self) -> &'static str {
        match self {
            Self::Pacman => "-S --noconfirm",
            Self::Pkg | Self::AptGet | Self::Yum => "install -y",
        }
    }

    /// `<manager> <install-subcommand> <name>` as one escalation-shell string.
    pub fn install_command(self, package: &PackageName) -> ElevatedCommand {
        ElevatedCommand::from_trusted_parts(
            self.as_ref(),
            &[self.install_subcommand(), package.as_str()],
        )
    }
}

impl ExecutionEngine {
    /// Install `package_name` through the escalation shell.
    ///
    /// Name and manager checks run before anything is spawned.
    pub async fn install_package(
        &self,
        policy: &SecurityPolicy,
        package_name: &str,
        source: Option<&str>,
    ) -> ExecutionResult {
        let package = match PackageName::parse(package_name) {
            Ok(package) => package,
            Err(violation) => return violation.into(),
        };

        let manager = PackageManager::for_source(source);
        if !policy.is_package_manager_allowed(manager.as_ref()) {
            return PolicyViolation::PackageManagerNotAllowed.into();
        }

        info!(%manager, package = package.as_str(), "installing package");
        let command = manager.install_command(&package);
        self.run_elevated(&command, "Package installation failed")
            .await
    }
}
