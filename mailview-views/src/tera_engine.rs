//! Tera view engine

use crate::engine::discover_views;
use crate::{Result, ViewConfig, ViewEngine, ViewError};
use parking_lot::RwLock;
use serde_json::Value;
use std::fs;
use std::sync::Arc;
use tera::Tera;
use tracing::debug;

/// Tera-based view engine.
///
/// Tera decides autoescaping by template name; since view keys carry no
/// extension, escaping is switched on for every view when
/// `escape_html` is set. Layouts write `{{ body | safe }}`.
#[derive(Clone)]
pub struct TeraEngine {
    tera: Arc<RwLock<Tera>>,
    // views added with `register_view`, re-added on every reload
    registered: Arc<RwLock<Vec<(String, String)>>>,
    config: ViewConfig,
    extension: String,
    loads_files: bool,
}

impl TeraEngine {
    /// Create an engine and load all views from the configured directory
    pub fn new(config: ViewConfig) -> Result<Self> {
        let mut engine = Self::in_memory(config);
        engine.loads_files = true;
        engine.load_views()?;
        Ok(engine)
    }

    /// Create an engine without loading anything from disk
    pub fn in_memory(config: ViewConfig) -> Self {
        let extension = config.dotted_extension();
        Self {
            tera: Arc::new(RwLock::new(Self::empty_tera(&config))),
            registered: Arc::new(RwLock::new(Vec::new())),
            config,
            extension,
            loads_files: false,
        }
    }

    fn empty_tera(config: &ViewConfig) -> Tera {
        let mut tera = Tera::default();
        if config.escape_html {
            tera.autoescape_on(vec![""]);
        } else {
            tera.autoescape_on(vec![]);
        }
        tera
    }

    /// Rebuild from disk; views deleted since the last load are dropped.
    fn load_views(&self) -> Result<()> {
        if !self.config.view_dir.exists() {
            return Err(ViewError::ConfigError(format!(
                "View directory not found: {}",
                self.config.view_dir.display()
            )));
        }

        let mut templates = Vec::new();
        for (key, path) in discover_views(&self.config.view_dir, &self.extension)? {
            templates.push((key, fs::read_to_string(&path)?));
        }

        debug!(
            dir = %self.config.view_dir.display(),
            count = templates.len(),
            "Loaded tera views"
        );

        templates.extend(self.registered.read().iter().cloned());

        // added together so views may extend or include each other
        let mut tera = Self::empty_tera(&self.config);
        tera.add_raw_templates(templates)?;
        *self.tera.write() = tera;
        Ok(())
    }

    /// Register a view from string
    pub fn register_view(&self, key: &str, template: &str) -> Result<()> {
        self.tera.write().add_raw_template(key, template)?;

        let mut registered = self.registered.write();
        registered.retain(|(k, _)| k != key);
        registered.push((key.to_string(), template.to_string()));
        Ok(())
    }
}

impl ViewEngine for TeraEngine {
    fn has_view(&self, key: &str) -> bool {
        self.tera.read().get_template_names().any(|name| name == key)
    }

    fn render_view(&self, key: &str, data: &Value) -> Result<String> {
        let context = tera::Context::from_value(data.clone())?;
        Ok(self.tera.read().render(key, &context)?)
    }

    fn view_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .tera
            .read()
            .get_template_names()
            .map(str::to_string)
            .collect();
        names.sort();
        names
    }

    fn extension(&self) -> &str {
        &self.extension
    }

    fn refresh(&self) -> Result<()> {
        if self.config.dev_mode && self.loads_files {
            self.load_views()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RequestContext, ViewContext, ViewData, ViewResult};
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_render_with_layout() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("shared")).unwrap();
        fs::write(temp_dir.path().join("Welcome.tera"), "<p>{{ name }}</p>").unwrap();
        fs::write(
            temp_dir.path().join("shared").join("_Layout.tera"),
            "<main>{{ body | safe }}</main>",
        )
        .unwrap();

        let engine = TeraEngine::new(ViewConfig::new(temp_dir.path()).with_extension(".tera")).unwrap();
        let ctx = ViewContext::for_controller(RequestContext::empty(), "UserMailer");

        let output = ViewResult::new("Welcome")
            .with_master(Some("_Layout"))
            .with_data(ViewData::new().with("name", "<Ada>").unwrap())
            .execute(&ctx, &engine)
            .unwrap();

        assert_eq!(output, "<main><p>&lt;Ada&gt;</p></main>");
    }

    #[test]
    fn test_unescaped_when_disabled() {
        let engine = TeraEngine::in_memory(ViewConfig::default().with_escape_html(false));
        engine.register_view("plain", "{{ v }}").unwrap();

        let output = engine.render_view("plain", &json!({"v": "<b>"})).unwrap();
        assert_eq!(output, "<b>");
    }

    #[test]
    fn test_render_error() {
        let engine = TeraEngine::in_memory(ViewConfig::default());
        engine.register_view("bad", "{{ missing }}").unwrap();

        assert!(matches!(
            engine.render_view("bad", &json!({})),
            Err(ViewError::RenderError(_))
        ));
    }

    #[test]
    fn test_dev_mode_refresh_drops_deleted_views() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("Old.tera"), "old").unwrap();
        let config = ViewConfig::new(temp_dir.path())
            .with_extension(".tera")
            .with_dev_mode(true);
        let engine = TeraEngine::new(config).unwrap();
        engine.register_view("inline", "inline").unwrap();

        fs::remove_file(temp_dir.path().join("Old.tera")).unwrap();
        fs::write(temp_dir.path().join("New.tera"), "new").unwrap();
        engine.refresh().unwrap();

        assert_eq!(engine.view_names(), vec!["New", "inline"]);
    }

    #[test]
    fn test_in_memory_dev_mode_renders_without_view_dir() {
        let config = ViewConfig::new("/definitely/not/here").with_dev_mode(true);
        let engine = TeraEngine::in_memory(config);
        engine.register_view("inline", "ok").unwrap();

        let ctx = ViewContext::for_controller(RequestContext::empty(), "UserMailer");
        assert_eq!(ViewResult::new("inline").execute(&ctx, &engine).unwrap(), "ok");
    }
}
