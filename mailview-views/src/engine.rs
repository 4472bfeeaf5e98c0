//! View engines

use crate::{config::ViewConfig, error::ViewError, helpers, Result};
use handlebars::Handlebars;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// A template engine that views are rendered through.
///
/// Keys are `/`-separated paths relative to the view directory, without the
/// file extension (`UserMailer/Welcome`).
pub trait ViewEngine: Send + Sync {
    /// Check if a view is registered under `key`
    fn has_view(&self, key: &str) -> bool;

    /// Render the view registered under `key`
    fn render_view(&self, key: &str, data: &Value) -> Result<String>;

    /// Keys of all registered views
    fn view_names(&self) -> Vec<String>;

    /// File extension of view files, used to normalize view names
    fn extension(&self) -> &str;

    /// Pick up changes on disk before a view is resolved.
    ///
    /// Called once per [`ViewResult::execute`](crate::ViewResult::execute).
    fn refresh(&self) -> Result<()> {
        Ok(())
    }
}

/// Find view files under `root`, returning `(key, path)` pairs.
pub(crate) fn discover_views(root: &Path, extension: &str) -> Result<Vec<(String, PathBuf)>> {
    let mut found = Vec::new();
    walk(root, root, extension, &mut found)?;
    found.sort();
    Ok(found)
}

fn walk(
    root: &Path,
    dir: &Path,
    extension: &str,
    found: &mut Vec<(String, PathBuf)>,
) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_dir() {
            walk(root, &path, extension, found)?;
            continue;
        }

        let relative = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .to_string_lossy()
            .replace('\\', "/");

        if let Some(key) = relative.strip_suffix(extension) {
            found.push((key.to_string(), path));
        }
    }
    Ok(())
}

/// Handlebars view engine
#[derive(Clone)]
pub struct HandlebarsEngine {
    handlebars: Arc<RwLock<Handlebars<'static>>>,
    // keys loaded from disk, replaced on reload; registered views are kept
    file_views: Arc<RwLock<HashSet<String>>>,
    config: ViewConfig,
    extension: String,
    loads_files: bool,
}

impl HandlebarsEngine {
    /// Create an engine and load all views from the configured directory
    pub fn new(config: ViewConfig) -> Result<Self> {
        let mut engine = Self::build(config);
        engine.loads_files = true;
        engine.load_views()?;
        Ok(engine)
    }

    /// Create an engine without loading anything from disk.
    ///
    /// Views are added with [`register_view`](Self::register_view).
    pub fn in_memory(config: ViewConfig) -> Self {
        Self::build(config)
    }

    fn build(config: ViewConfig) -> Self {
        let mut handlebars = Handlebars::new();

        handlebars.set_strict_mode(config.strict_mode);

        if !config.escape_html {
            handlebars.register_escape_fn(handlebars::no_escape);
        }

        helpers::register_builtin_helpers(&mut handlebars);

        let extension = config.dotted_extension();
        Self {
            handlebars: Arc::new(RwLock::new(handlebars)),
            file_views: Arc::new(RwLock::new(HashSet::new())),
            config,
            extension,
            loads_files: false,
        }
    }

    /// Load all views from the configured directory
    fn load_views(&self) -> Result<()> {
        if !self.config.view_dir.exists() {
            return Err(ViewError::ConfigError(format!(
                "View directory not found: {}",
                self.config.view_dir.display()
            )));
        }

        let views = discover_views(&self.config.view_dir, &self.extension)?;

        let mut handlebars = self.handlebars.write();
        let mut file_views = self.file_views.write();

        for (key, path) in &views {
            let content = fs::read_to_string(path)?;
            handlebars.register_template_string(key, content)?;
            file_views.insert(key.clone());
        }

        if let Some(ref partials_dir) = self.config.partials_dir
            && partials_dir.exists()
        {
            for (name, path) in discover_views(partials_dir, &self.extension)? {
                let content = fs::read_to_string(&path)?;
                handlebars.register_partial(&name, content)?;
            }
        }

        debug!(
            dir = %self.config.view_dir.display(),
            count = views.len(),
            "Loaded views"
        );

        Ok(())
    }

    /// Render a view with data
    pub fn render<T: serde::Serialize>(&self, key: &str, data: &T) -> Result<String> {
        self.handlebars
            .read()
            .render(key, data)
            .map_err(ViewError::from)
    }

    /// Render a template string (not from file)
    pub fn render_template<T: serde::Serialize>(&self, template_str: &str, data: &T) -> Result<String> {
        self.handlebars
            .read()
            .render_template(template_str, data)
            .map_err(ViewError::from)
    }

    /// Register a view from string
    pub fn register_view(&self, key: &str, template: &str) -> Result<()> {
        self.handlebars
            .write()
            .register_template_string(key, template)
            .map_err(ViewError::from)
    }

    /// Register a partial
    pub fn register_partial(&self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .write()
            .register_partial(name, template)
            .map_err(ViewError::from)
    }

    /// Register a custom helper
    pub fn register_helper<F>(&self, name: &str, helper: F)
    where
        F: handlebars::HelperDef + Send + Sync + 'static,
    {
        self.handlebars
            .write()
            .register_helper(name, Box::new(helper));
    }

    /// Unregister a view
    pub fn unregister_view(&self, key: &str) {
        self.handlebars.write().unregister_template(key);
        self.file_views.write().remove(key);
    }

    /// Reload the views loaded from disk
    pub fn reload_views(&self) -> Result<()> {
        {
            let mut handlebars = self.handlebars.write();
            let mut file_views = self.file_views.write();
            for key in file_views.drain() {
                handlebars.unregister_template(&key);
            }
        }
        self.load_views()
    }

    /// Get configuration
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }
}

impl ViewEngine for HandlebarsEngine {
    fn has_view(&self, key: &str) -> bool {
        self.handlebars.read().has_template(key)
    }

    fn render_view(&self, key: &str, data: &Value) -> Result<String> {
        self.render(key, data)
    }

    fn view_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .handlebars
            .read()
            .get_templates()
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    fn extension(&self) -> &str {
        &self.extension
    }

    // Engines built with `in_memory` have nothing on disk to reload.
    fn refresh(&self) -> Result<()> {
        if self.config.dev_mode && self.loads_files {
            self.reload_views()?;
        }
        Ok(())
    }
}
