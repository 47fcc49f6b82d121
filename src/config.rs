// Runtime settings, read from environment variables with sane defaults
// so the CLI works out of the box against a local service.

use std::path::PathBuf;

/// Default origin of the story service.
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8000";

pub const SERVICE_URL_VAR: &str = "STORYLENS_SERVICE_URL";
pub const DOWNLOAD_DIR_VAR: &str = "STORYLENS_DOWNLOAD_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Origin of the story service, without a trailing slash.
    pub service_url: String,
    /// Directory where saved narrations are written.
    pub download_dir: PathBuf,
    /// Directory the file dialog opens in, when the platform has one.
    pub picker_dir: Option<PathBuf>,
}

impl Settings {
    /// Build settings from `STORYLENS_SERVICE_URL` and
    /// `STORYLENS_DOWNLOAD_DIR`, falling back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` but reads variables through `lookup`, which keeps
    /// tests away from the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let service_url = lookup(SERVICE_URL_VAR)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SERVICE_URL.into());
        let download_dir = lookup(DOWNLOAD_DIR_VAR)
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_download_dir);

        Settings {
            service_url: normalize_origin(&service_url),
            download_dir,
            picker_dir: dirs::picture_dir(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            service_url: DEFAULT_SERVICE_URL.into(),
            download_dir: default_download_dir(),
            picker_dir: dirs::picture_dir(),
        }
    }
}

fn default_download_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn normalize_origin(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
