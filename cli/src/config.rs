// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, path::PathBuf, str::FromStr};

use calsync_core::{APP_NAME, SyncConfig};
use calsync_gcal::GoogleConfig;
use tokio::fs;

const CALSYNC_CONFIG_ENV: &str = "CALSYNC_CONFIG";

/// Configuration of the calsync application.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    /// Engine settings.
    pub sync: SyncConfig,

    /// Remote calendar settings.
    #[serde(default)]
    pub google: GoogleConfig,
}

impl FromStr for Config {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Self = toml::from_str(s)?;
        config.sync.validate()?;
        Ok(config)
    }
}

/// Loads the configuration from `path`, `$CALSYNC_CONFIG`, or the user config directory.
#[tracing::instrument]
pub async fn parse_config(path: Option<PathBuf>) -> Result<Config, Box<dyn Error>> {
    let path = match (path, std::env::var_os(CALSYNC_CONFIG_ENV)) {
        (Some(path), _) => path,
        (None, Some(env_path)) => PathBuf::from(env_path),
        (None, None) => {
            let config = get_config_dir()?.join(APP_NAME).join("config.toml");
            if !config.exists() {
                return Err(format!("No config found at: {}", config.display()).into());
            }
            config
        }
    };

    tracing::debug!(path = %path.display(), "reading configuration");
    fs::read_to_string(&path)
        .await
        .map_err(|e| format!("Failed to read config file at {}: {}", path.display(), e))?
        .parse()
}

fn get_config_dir() -> Result<PathBuf, Box<dyn Error>> {
    #[cfg(unix)]
    let config_dir = xdg::BaseDirectories::new().get_config_home();
    #[cfg(not(unix))]
    let config_dir = dirs::config_dir();
    config_dir.ok_or_else(|| "User-specific home directory not found".into())
}
