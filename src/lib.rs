#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::unnecessary_literal_bound,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod config;
pub mod download;
pub mod error;
pub mod exec;
pub mod files;
pub mod gateway;
pub mod security;
pub mod session;

pub use config::Config;
pub use error::{GatewayError, Result};
pub use exec::ExecutionResult;
pub use gateway::{Gateway, Outcome, Request};
pub use session::ShellSession;
