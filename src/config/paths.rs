use std::path::{Path, PathBuf};

const APP_DIR: &str = "baseball_depot";

fn app_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join(APP_DIR)
}

/// Returns the platform-specific path for the config file.
///
/// Uses the platform config directory (e.g. `~/.config` on Linux) and falls
/// back to the current directory when none is available.
pub fn get_config_path() -> String {
    app_dir()
        .join("config.toml")
        .to_string_lossy()
        .to_string()
}

/// Returns the platform-specific path for the log directory.
pub fn get_log_dir_path() -> String {
    app_dir().join("logs").to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_live_under_app_dir() {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();

        assert!(config_path.ends_with("config.toml"));
        assert!(config_path.contains(APP_DIR));
        assert!(log_dir.ends_with("logs"));
        assert!(log_dir.contains(APP_DIR));
    }
}
