//! Mailer settings

use crate::Result;
use mailview_config::{ConfigError, ConfigManager, ConfigValidator, Validate};
use mailview_views::{ViewConfig, PLACEHOLDER_URL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Environment prefix read by [`MailerSettings::load`].
pub const ENV_PREFIX: &str = "MAILVIEW";

/// Settings for [`MailerBase::from_settings`](crate::MailerBase::from_settings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailerSettings {
    /// Root directory of view templates
    pub view_dir: PathBuf,

    /// Template file extension
    pub view_extension: String,

    /// Default layout
    pub master_name: Option<String>,

    /// HTML flag copied onto populated messages
    pub is_body_html: bool,

    /// Missing variables are errors
    pub strict_mode: bool,

    /// Reload templates from disk on each render
    pub dev_mode: bool,

    /// Enable the placeholder request globally
    pub test_mode: bool,

    /// Base URL of the placeholder request
    pub base_url: String,
}

impl Default for MailerSettings {
    fn default() -> Self {
        Self {
            view_dir: PathBuf::from("views"),
            view_extension: ".hbs".to_string(),
            master_name: None,
            is_body_html: true,
            strict_mode: false,
            dev_mode: false,
            test_mode: false,
            base_url: PLACEHOLDER_URL.to_string(),
        }
    }
}

impl MailerSettings {
    /// Load settings from an optional file, then `MAILVIEW_*` environment
    /// variables, which take precedence.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    /// Like [`load`](Self::load) with a custom environment prefix.
    pub fn load_with_prefix(path: Option<&Path>, prefix: &str) -> Result<Self> {
        let config = ConfigManager::with_prefix(prefix);
        if let Some(path) = path {
            config.load_file(path)?;
        }
        config.load_env()?;
        Self::from_config(&config)
    }

    /// Deserialize and validate settings from a populated [`ConfigManager`].
    pub fn from_config(config: &ConfigManager) -> Result<Self> {
        Ok(config.load_validated()?)
    }

    /// View engine configuration derived from these settings.
    ///
    /// HTML escaping follows `is_body_html`.
    pub fn view_config(&self) -> ViewConfig {
        ViewConfig::new(&self.view_dir)
            .with_extension(&self.view_extension)
            .with_strict_mode(self.strict_mode)
            .with_dev_mode(self.dev_mode)
            .with_escape_html(self.is_body_html)
    }

    /// Parsed base URL.
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.base_url)
            .map_err(|e| ConfigError::ValidationError(format!("base_url: {}", e)).into())
    }
}

impl Validate for MailerSettings {
    fn validate(&self) -> mailview_config::Result<()> {
        ConfigValidator::not_empty(&self.view_extension, "view_extension")?;
        ConfigValidator::is_url(&self.base_url, "base_url")?;
        Ok(())
    }
}
