use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use crate::{
    error::{ClientError, Result},
    transport::Endpoints,
};

pub const DEFAULT_BASE_URL: &str = "https://fakestoreapi.com";
pub const DEFAULT_SETTINGS_FILE: &str = "storefront.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credit {
    pub name: String,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub credits: Vec<Credit>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            credits: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    base_url: Option<String>,
    #[serde(default)]
    credits: Vec<Credit>,
}

impl Settings {
    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(self.base_url.trim())
            .map_err(|e| ClientError::Validation(format!("invalid base url '{}': {e}", self.base_url)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ClientError::Validation(format!(
                "unsupported base url scheme '{other}'"
            ))),
        }
    }

    pub fn endpoints(&self) -> Result<Endpoints> {
        Endpoints::new(self.base_url()?)
    }
}

/// Defaults, then the TOML file at `path` (or `storefront.toml`), then the
/// process environment.
pub fn load_settings(path: Option<&Path>) -> Settings {
    load_settings_with_env(path, |key| std::env::var(key).ok())
}

pub fn load_settings_with_env(
    path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_SETTINGS_FILE));

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.base_url {
                    settings.base_url = v;
                }
                settings.credits = file_cfg.credits;
            }
            Err(err) => warn!(path = %path.display(), error = %err, "ignoring malformed settings file"),
        }
    }

    if let Some(v) = env("STOREFRONT_BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = env("APP__BASE_URL") {
        settings.base_url = v;
    }

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
