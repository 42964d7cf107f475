use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::{klog_debug, Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Identity used for all board operations (owner/member matching).
    pub user: Option<String>,
    /// Override for where board data is stored.
    pub data_dir: Option<String>,
}

impl Config {
    pub fn kanso_dir() -> Result<PathBuf> {
        Ok(dirs::home_dir().ok_or(Error::NoHomeDir)?.join(".kanso"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::kanso_dir()?.join("kanso.toml"))
    }

    pub fn boards_path(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(expand_tilde(dir).join("boards.json")),
            None => Ok(Self::kanso_dir()?.join("boards.json")),
        }
    }

    pub fn effective_user(&self) -> &str {
        self.user.as_deref().unwrap_or("local@kanso")
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        klog_debug!("Config::load path={}", path.display());
        if !path.exists() {
            klog_debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(&fs::read_to_string(&path)?)?;
        klog_debug!(
            "Config loaded: user={:?}, data_dir={:?}",
            config.user,
            config.data_dir
        );
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let kanso_dir = Self::kanso_dir()?;
        klog_debug!("Config::save kanso_dir={}", kanso_dir.display());
        if !kanso_dir.exists() {
            fs::create_dir_all(&kanso_dir)?;
        }
        let path = Self::config_path()?;
        fs::write(&path, toml::to_string_pretty(self)?)?;
        klog_debug!("Config saved to {}", path.display());
        Ok(())
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        let kanso_dir = Self::kanso_dir()?;
        if !kanso_dir.exists() {
            klog_debug!("Creating kanso directory: {}", kanso_dir.display());
            fs::create_dir_all(&kanso_dir)?;
        }
        if let Some(parent) = self.boards_path()?.parent() {
            if !parent.exists() {
                klog_debug!("Creating data directory: {}", parent.display());
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
