use crate::error::ConfigError;
use crate::security::PathResolveMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    /// App-private tree; `home/` under it seeds the initial session.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub execution: ExecutionConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub allowlist: AllowlistConfig,

    #[serde(default)]
    pub download: DownloadConfig,

    #[serde(default)]
    pub environment: EnvironmentConfig,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            data_dir: None,
            log_level: default_log_level(),
            execution: ExecutionConfig::default(),
            paths: PathsConfig::default(),
            allowlist: AllowlistConfig::default(),
            download: DownloadConfig::default(),
            environment: EnvironmentConfig::default(),
        }
    }
}

impl Config {
    /// `data_dir` if set, else `data/` next to the config file.
    pub fn resolved_data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => dir.clone(),
            None => self
                .config_path
                .parent()
                .map_or_else(|| PathBuf::from("data"), |p| p.join("data")),
        }
    }

    pub fn tracing_level(&self) -> Result<tracing::Level, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::Validation(format!("unknown log level '{}'", self.log_level)))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tracing_level()?;

        if self.download.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "download.timeout_secs must be greater than zero".into(),
            ));
        }
        if self.download.max_bytes == 0 {
            return Err(ConfigError::Validation(
                "download.max_bytes must be greater than zero".into(),
            ));
        }

        let user = &self.environment.user;
        if user.is_empty() || user.contains('/') || user.contains("..") {
            return Err(ConfigError::Validation(format!(
                "environment.user '{user}' is not a plain directory name"
            )));
        }
        Ok(())
    }
}

// ── Execution ─────────────────────────────────────────────────────

/// Values injected as `TERM` and `LANG` into unprivileged runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    #[serde(default = "default_term")]
    pub term: String,
    #[serde(default = "default_lang")]
    pub lang: String,
}

fn default_term() -> String {
    "xterm-256color".into()
}

fn default_lang() -> String {
    "en_US.UTF-8".into()
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            term: default_term(),
            lang: default_lang(),
        }
    }
}

// ── Paths ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default)]
    pub resolve_mode: PathResolveMode,
}

// ── Allowlist ─────────────────────────────────────────────────────

/// Narrowing-only adjustments to the built-in allowlist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllowlistConfig {
    /// Built-in entries to remove entirely.
    #[serde(default)]
    pub disabled: Vec<String>,
    /// Built-in entries that lose their privileged capability.
    #[serde(default)]
    pub unprivileged_only: Vec<String>,
}

// ── Download ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    #[serde(default = "default_download_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_download_max_bytes")]
    pub max_bytes: u64,
}

fn default_download_timeout_secs() -> u64 {
    30
}

fn default_download_max_bytes() -> u64 {
    512 * 1024 * 1024
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_download_timeout_secs(),
            max_bytes: default_download_max_bytes(),
        }
    }
}

// ── Environment setup ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Login name for the emulated `linux/home/<user>` tree.
    #[serde(default = "default_environment_user")]
    pub user: String,
}

fn default_environment_user() -> String {
    "user".into()
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            user: default_environment_user(),
        }
    }
}
