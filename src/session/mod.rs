pub mod environment;

pub use environment::{EnvironmentLayout, setup_environment};

use crate::error::SessionError;
use crate::security::SecurityPolicy;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Directories created under the home directory at startup.
const HOME_SUBDIRS: &[&str] = &["bin", "tmp", "downloads", ".config"];

/// Working directory and home directory of one shell session.
///
/// A session is a plain value: operations that move it return a new session
/// instead of mutating shared state, so concurrent requests each see the
/// directory they were handed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellSession {
    cwd: PathBuf,
    home: PathBuf,
}

impl ShellSession {
    /// A session whose cwd starts at `home`.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            cwd: home.clone(),
            home,
        }
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Create the app-private home tree under `data_dir` and start there.
    pub fn bootstrap(data_dir: &Path) -> std::io::Result<Self> {
        let home = data_dir.join("home");
        fs::create_dir_all(&home)?;
        for sub in HOME_SUBDIRS {
            fs::create_dir_all(home.join(sub))?;
        }
        Ok(Self::new(home))
    }

    /// Resolve `path` and return a session positioned in that directory.
    ///
    /// `..` is permitted here: moving the cwd does not touch the filesystem.
    pub fn change_directory(
        &self,
        policy: &SecurityPolicy,
        path: &str,
    ) -> Result<Self, SessionError> {
        let resolved = policy.resolve_path(self, Some(path))?;
        let display = resolved.display().to_string();

        let meta = match fs::metadata(&resolved) {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SessionError::NotFound(display));
            }
            Err(e) => return Err(e.into()),
        };
        if !meta.is_dir() {
            return Err(SessionError::NotADirectory(display));
        }

        let cwd = resolved.canonicalize()?;
        info!(cwd = %cwd.display(), "changed directory");
        Ok(self.clone().with_cwd(cwd))
    }
}
