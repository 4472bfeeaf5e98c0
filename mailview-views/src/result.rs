//! Rendering a view (and its layout) to a string

use crate::{Result, ViewContext, ViewData, ViewEngine, ViewLocator};
use serde_json::Value;
use tracing::debug;

/// Key under which a layout receives the rendered view.
pub const BODY_KEY: &str = "body";

/// A view to render, with optional layout, captured as a string.
///
/// The layout is rendered with the same data as the view plus `body`, so a
/// Handlebars layout writes `{{{body}}}` where the view goes.
#[derive(Debug, Clone, Default)]
pub struct ViewResult {
    pub view_name: String,
    pub master_name: Option<String>,
    pub view_data: ViewData,
}

impl ViewResult {
    pub fn new(view_name: impl Into<String>) -> Self {
        Self {
            view_name: view_name.into(),
            ..Self::default()
        }
    }

    /// Set the layout. `None` and empty names mean no layout.
    pub fn with_master(mut self, master_name: Option<impl Into<String>>) -> Self {
        self.master_name = master_name.map(Into::into);
        self
    }

    pub fn with_data(mut self, view_data: ViewData) -> Self {
        self.view_data = view_data;
        self
    }

    fn master(&self) -> Option<&str> {
        self.master_name
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }

    /// Resolve and render the view, then wrap it in the layout if one is set.
    ///
    /// The engine is refreshed once up front, so in development mode views
    /// added on disk since the last render are found.
    pub fn execute(&self, ctx: &ViewContext, engine: &dyn ViewEngine) -> Result<String> {
        engine.refresh()?;

        let locator = ViewLocator::new(engine.extension());
        let view_key = locator.locate(engine, ctx, &self.view_name)?;

        let mut data = ctx.template_data(&self.view_data);
        let body = engine.render_view(&view_key, &data)?;

        let Some(master) = self.master() else {
            debug!(view = %view_key, "Rendered view");
            return Ok(body);
        };

        let master_key = locator.locate(engine, ctx, master)?;
        if let Value::Object(ref mut map) = data {
            map.insert(BODY_KEY.to_string(), Value::String(body));
        }

        let output = engine.render_view(&master_key, &data)?;
        debug!(view = %view_key, master = %master_key, "Rendered view with layout");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HandlebarsEngine, RequestContext, ViewConfig, ViewError};
    use std::fs;
    use tempfile::TempDir;

    fn engine() -> HandlebarsEngine {
        let engine = HandlebarsEngine::in_memory(ViewConfig::default());
        engine
            .register_view("UserMailer/Welcome", "<p>Welcome {{name}}</p>")
            .unwrap();
        engine
            .register_view("shared/_Layout", "<html><body>{{{body}}}</body></html>")
            .unwrap();
        engine
            .register_view("UserMailer/_Layout", "[user]{{{body}}}[/user]")
            .unwrap();
        engine
            .register_view("shared/_Plain", "{{body}}")
            .unwrap();
        engine
    }

    fn ctx() -> ViewContext {
        ViewContext::for_controller(RequestContext::empty(), "UserMailer")
    }

    fn data() -> ViewData {
        ViewData::new().with("name", "Ada").unwrap()
    }

    #[test]
    fn test_execute_without_layout() {
        let output = ViewResult::new("Welcome")
            .with_data(data())
            .execute(&ctx(), &engine())
            .unwrap();
        assert_eq!(output, "<p>Welcome Ada</p>");
    }

    #[test]
    fn test_controller_layout_wins_over_shared() {
        let output = ViewResult::new("Welcome")
            .with_master(Some("_Layout"))
            .with_data(data())
            .execute(&ctx(), &engine())
            .unwrap();
        assert_eq!(output, "[user]<p>Welcome Ada</p>[/user]");
    }

    #[test]
    fn test_shared_layout_by_path() {
        let output = ViewResult::new("Welcome.hbs")
            .with_master(Some("shared/_Layout.hbs"))
            .with_data(data())
            .execute(&ctx(), &engine())
            .unwrap();
        assert_eq!(output, "<html><body><p>Welcome Ada</p></body></html>");
    }

    #[test]
    fn test_double_stash_layout_escapes_body() {
        let output = ViewResult::new("Welcome")
            .with_master(Some("_Plain"))
            .with_data(data())
            .execute(&ctx(), &engine())
            .unwrap();
        assert_eq!(output, "&lt;p&gt;Welcome Ada&lt;/p&gt;");
    }

    #[test]
    fn test_empty_master_means_no_layout() {
        let output = ViewResult::new("Welcome")
            .with_master(Some(""))
            .with_data(data())
            .execute(&ctx(), &engine())
            .unwrap();
        assert_eq!(output, "<p>Welcome Ada</p>");
    }

    #[test]
    fn test_missing_view() {
        let err = ViewResult::new("Goodbye")
            .execute(&ctx(), &engine())
            .unwrap_err();
        match err {
            ViewError::ViewNotFound { name, searched } => {
                assert_eq!(name, "Goodbye");
                assert_eq!(searched.len(), 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_layout() {
        let err = ViewResult::new("Welcome")
            .with_master(Some("_Missing"))
            .with_data(data())
            .execute(&ctx(), &engine())
            .unwrap_err();
        assert!(matches!(err, ViewError::ViewNotFound { .. }));
    }

    #[test]
    fn test_view_sees_request_context() {
        let engine = engine();
        engine
            .register_view("UserMailer/Link", "{{absolute_url \"/confirm\"}} from {{route.controller}}")
            .unwrap();
        let request = RequestContext::parse("GET", "https://example.com/signup").unwrap();
        let ctx = ViewContext::for_controller(request, "UserMailer");

        let output = ViewResult::new("Link").execute(&ctx, &engine).unwrap();
        assert_eq!(output, "https://example.com/confirm from UserMailer");
    }

    #[test]
    fn test_dev_mode_finds_views_added_after_start() {
        let temp_dir = TempDir::new().unwrap();
        let engine =
            HandlebarsEngine::new(ViewConfig::new(temp_dir.path()).with_dev_mode(true)).unwrap();
        let ctx = ctx();

        assert!(matches!(
            ViewResult::new("Fresh").execute(&ctx, &engine),
            Err(ViewError::ViewNotFound { .. })
        ));

        fs::create_dir(temp_dir.path().join("shared")).unwrap();
        fs::write(temp_dir.path().join("Fresh.hbs"), "fresh {{name}}").unwrap();
        fs::write(temp_dir.path().join("shared").join("_Wrap.hbs"), "[{{{body}}}]").unwrap();

        let output = ViewResult::new("Fresh")
            .with_master(Some("_Wrap"))
            .with_data(data())
            .execute(&ctx, &engine)
            .unwrap();
        assert_eq!(output, "[fresh Ada]");
    }
}
