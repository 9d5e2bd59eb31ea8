use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::link::DEFAULT_BASE_URL;

pub const DEFAULT_DURATION_SECS: u32 = 10;
pub const MAX_DURATION_SECS: u32 = 3600;

/// User preferences. Timer state is never stored here; a countdown only lives in its link.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Page that share links point at; the token is appended as the fragment
    pub base_url: String,
    pub default_duration_secs: u32,
    pub max_duration_secs: u32,
    /// Confetti on reveal
    pub celebrate: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_duration_secs: DEFAULT_DURATION_SECS,
            max_duration_secs: MAX_DURATION_SECS,
            celebrate: true,
        }
    }
}

impl Config {
    /// Pulls hand-edited values back into range
    pub fn sanitized(mut self) -> Self {
        self.max_duration_secs = self.max_duration_secs.max(1);
        self.default_duration_secs = self
            .default_duration_secs
            .clamp(1, self.max_duration_secs);
        self
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "tock") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("tock_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg.sanitized(),
                Err(err) => {
                    tracing::warn!("ignoring unreadable config {}: {err}", self.path.display())
                }
            },
            Err(err) => tracing::debug!("no config at {}: {err}", self.path.display()),
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
