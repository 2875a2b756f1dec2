//! Infrastructure implementation of the `ConfigStore` port.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::application::ports::ConfigStore;
use crate::domain::config::MitsConfig;
use crate::domain::error::ConfigError;

/// Environment variable overriding the config location.
pub const CONFIG_ENV: &str = "MITS_CONFIG";

/// Production implementation of `ConfigStore` that reads a YAML (or JSON) file.
#[derive(Debug, Clone, Default)]
pub struct YamlConfigStore {
    explicit: Option<PathBuf>,
}

impl YamlConfigStore {
    /// Store reading `path` if given, otherwise `$MITS_CONFIG` or
    /// `~/.mits/config.yaml`.
    #[must_use]
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { explicit: path }
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<MitsConfig> {
        let path = self.path()?;
        if !path.exists() {
            return Err(ConfigError::Missing(path.display().to_string()).into());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let config: MitsConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("cannot parse {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config {}", path.display()))?;
        tracing::debug!(path = %path.display(), tests = config.tests.len(), "loaded config");
        Ok(config)
    }

    fn path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.explicit {
            return Ok(path.clone());
        }
        if let Ok(val) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(val));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".mits").join("config.yaml"))
    }
}
