use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "matho").map(|proj_dirs| proj_dirs.config_dir().join("config.json"))
    }

    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("matho");
            Some(state_dir.join("matho.log"))
        } else {
            ProjectDirs::from("", "", "matho")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("matho.log"))
        }
    }
}
