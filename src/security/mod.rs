pub mod defaults;
pub mod policy;
pub mod url_validation;

pub use defaults::{default_allowed_commands, default_package_managers};
pub use policy::{
    Capability, CommandAllowlist, DANGEROUS_CHARACTERS, PathResolveMode, Privilege,
    SecurityPolicy, ValidatedCommand, are_arguments_safe, contains_dangerous_characters,
    reject_traversal,
};
pub use url_validation::validate_download_url;
