use anyhow::{Context as _, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::node::{Context, DEFAULT_FAVORITE_TAG};
use crate::SortMode;

const APP_NAME: &str = "sharelist";
const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Deserialize)]
pub struct Config {
    pub base_url: String,
    pub username: String,
    pub app_password: String,
    #[serde(default = "default_favorite_tag")]
    pub favorite_tag: String,
    /// Fail a listing when more records than this could not be read
    #[serde(default)]
    pub max_skipped_records: Option<usize>,
    #[serde(default)]
    pub sort: SortMode,
    #[serde(default)]
    pub debug: bool,
}

fn default_favorite_tag() -> String {
    DEFAULT_FAVORITE_TAG.to_string()
}

impl Config {
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(text).context("Failed to parse config")?;
        if config.base_url.trim().is_empty() {
            anyhow::bail!("base_url must not be empty");
        }
        if config.username.trim().is_empty() {
            anyhow::bail!("username must not be empty");
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&text)
    }

    /// Caller context for the configured user
    pub fn context(&self) -> Context {
        Context::new(&self.base_url, &self.username).with_favorite_tag(self.favorite_tag.clone())
    }
}

/// Preferred config location under the platform config dir
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILE))
}

/// Resolve the config file: `--config`, then the platform config dir,
/// then `./config.yaml`
pub fn get_config_path(cli_path: Option<String>) -> Result<PathBuf> {
    if let Some(path) = cli_path {
        let path = PathBuf::from(path);
        if !path.exists() {
            anyhow::bail!("Config file not found at {}", path.display());
        }
        return Ok(path);
    }

    let mut candidates = default_config_path()
        .into_iter()
        .chain(std::iter::once(PathBuf::from(CONFIG_FILE)));
    if let Some(found) = candidates.find(|p| p.exists()) {
        return Ok(found);
    }

    let preferred = default_config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| format!("<config dir>/{}/{}", APP_NAME, CONFIG_FILE));
    anyhow::bail!(
        "No config file found at {} or ./{}; pass --config <path>",
        preferred,
        CONFIG_FILE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_defaults() {
        let config = Config::from_yaml(
            "base_url: https://cloud.example\nusername: alice\napp_password: secret\n",
        )
        .unwrap();
        assert_eq!(config.favorite_tag, DEFAULT_FAVORITE_TAG);
        assert_eq!(config.max_skipped_records, None);
        assert_eq!(config.sort, SortMode::ServerOrder);
        assert!(!config.debug);
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_yaml(
            "base_url: https://cloud.example/\n\
             username: alice\n\
             app_password: secret\n\
             favorite_tag: starred\n\
             max_skipped_records: 2\n\
             sort: last-modified\n\
             debug: true\n",
        )
        .unwrap();
        assert_eq!(config.max_skipped_records, Some(2));
        assert_eq!(config.sort, SortMode::LastModified);

        let ctx = config.context();
        assert_eq!(ctx.current_user_id.as_deref(), Some("alice"));
        assert_eq!(ctx.dav_remote_url, "https://cloud.example/remote.php/dav");
        assert_eq!(ctx.favorite_tag, "starred");
    }

    #[test]
    fn test_missing_password_rejected() {
        assert!(Config::from_yaml("base_url: https://cloud.example\nusername: alice\n").is_err());
    }

    #[test]
    fn test_empty_username_rejected() {
        assert!(Config::from_yaml(
            "base_url: https://cloud.example\nusername: ''\napp_password: x\n"
        )
        .is_err());
    }

    #[test]
    fn test_missing_cli_path_is_error() {
        let err = get_config_path(Some("/nonexistent/sharelist.yaml".to_string())).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/sharelist.yaml"));
    }
}
