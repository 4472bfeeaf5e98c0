//! Configuration for view engines

use std::path::PathBuf;

/// Configuration shared by the view engines
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Directory containing view files
    pub view_dir: PathBuf,

    /// View file extension (default: ".hbs")
    pub view_extension: String,

    /// Enable development mode (reload views from disk on every render)
    pub dev_mode: bool,

    /// Enable strict mode (error on missing variables)
    pub strict_mode: bool,

    /// Directory for partials (if different from view_dir)
    pub partials_dir: Option<PathBuf>,

    /// Enable HTML escaping (default: true)
    pub escape_html: bool,
}

impl ViewConfig {
    /// Create a new configuration with a view directory
    pub fn new(view_dir: impl Into<PathBuf>) -> Self {
        Self {
            view_dir: view_dir.into(),
            view_extension: ".hbs".to_string(),
            dev_mode: false,
            strict_mode: false,
            partials_dir: None,
            escape_html: true,
        }
    }

    /// Set view file extension
    pub fn with_extension(mut self, ext: impl Into<String>) -> Self {
        self.view_extension = ext.into();
        self
    }

    /// Enable development mode
    pub fn with_dev_mode(mut self, enable: bool) -> Self {
        self.dev_mode = enable;
        self
    }

    /// Enable strict mode
    pub fn with_strict_mode(mut self, enable: bool) -> Self {
        self.strict_mode = enable;
        self
    }

    /// Set partials directory
    pub fn with_partials_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.partials_dir = Some(dir.into());
        self
    }

    /// Enable/disable HTML escaping. Plain-text emails usually want it off.
    pub fn with_escape_html(mut self, enable: bool) -> Self {
        self.escape_html = enable;
        self
    }

    /// The extension with a leading dot, as matched against file names
    pub fn dotted_extension(&self) -> String {
        let ext = self.view_extension.trim_start_matches('.');
        format!(".{}", ext)
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self::new("views")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ViewConfig::new("emails")
            .with_extension(".html")
            .with_dev_mode(true)
            .with_strict_mode(true)
            .with_escape_html(false);

        assert_eq!(config.view_dir, PathBuf::from("emails"));
        assert_eq!(config.view_extension, ".html");
        assert!(config.dev_mode);
        assert!(config.strict_mode);
        assert!(!config.escape_html);
    }

    #[test]
    fn test_default_config() {
        let config = ViewConfig::default();

        assert_eq!(config.view_dir, PathBuf::from("views"));
        assert_eq!(config.view_extension, ".hbs");
        assert!(!config.dev_mode);
        assert!(!config.strict_mode);
        assert!(config.escape_html);
    }

    #[test]
    fn test_dotted_extension() {
        assert_eq!(ViewConfig::default().with_extension("hbs").dotted_extension(), ".hbs");
        assert_eq!(ViewConfig::default().with_extension(".txt.hbs").dotted_extension(), ".txt.hbs");
    }
}
