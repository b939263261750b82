use super::Config;
use crate::security::PathResolveMode;
use std::path::PathBuf;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var("SHELLGATE_DATA_DIR")
            && !dir.is_empty()
        {
            self.data_dir = Some(PathBuf::from(dir));
        }

        if let Ok(mode) = std::env::var("SHELLGATE_PATH_MODE")
            && let Ok(mode) = mode.parse::<PathResolveMode>()
        {
            self.paths.resolve_mode = mode;
        }

        if let Ok(level) = std::env::var("SHELLGATE_LOG_LEVEL")
            && !level.is_empty()
        {
            self.log_level = level;
        }
    }
}
