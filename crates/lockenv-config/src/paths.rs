use std::path::PathBuf;

/// XDG app name for config lookups.
pub const APP_NAME: &str = "lockenv";

/// File name of the default config inside the config directory.
pub const DEFAULT_CONFIG_FILE: &str = "default.toml";

/// `~/.config/lockenv` (or the platform equivalent). `None` when no home
/// directory can be determined, e.g. in minimal containers.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// `~/.config/lockenv/default.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(DEFAULT_CONFIG_FILE))
}
