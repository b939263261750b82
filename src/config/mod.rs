mod env_overrides;
mod loader;
pub mod schema;

pub use schema::{
    AllowlistConfig, Config, DownloadConfig, EnvironmentConfig, ExecutionConfig, PathsConfig,
};
