//! Mailers that render their bodies through views.

use std::sync::Arc;

use mailview_views::{
    HandlebarsEngine, RequestContext, ViewContext, ViewData, ViewEngine, ViewResult,
};
use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing::debug;

use crate::test_mode::take_test_mode;
use crate::{Email, MailError, MailerSettings, Result};

/// Renders views into email bodies.
///
/// A mailer is named after its type; the name becomes the route
/// `controller`, so `Welcome` is looked up as `UserMailer/Welcome` before
/// `shared/Welcome`.
///
/// The request context is captured when the mailer is created: the current
/// request if one is entered, otherwise a placeholder when test mode is on.
/// Without either, rendering fails with [`MailError::MissingContext`] unless
/// a context is supplied through [`with_request`](Self::with_request).
/// Creating a mailer clears the test-mode flag.
pub struct MailerBase {
    name: String,
    engine: Arc<dyn ViewEngine>,
    master_name: Option<String>,
    is_body_html: bool,
    view_data: ViewData,
    request: Option<RequestContext>,
    view_context: OnceCell<ViewContext>,
}

impl MailerBase {
    /// Create a mailer with the given name.
    pub fn new(name: impl Into<String>, engine: Arc<dyn ViewEngine>) -> Self {
        Self::build(name.into(), engine, false, RequestContext::empty)
    }

    /// Create a mailer named after `M`.
    pub fn for_mailer<M: ?Sized>(engine: Arc<dyn ViewEngine>) -> Self {
        Self::new(mailer_name::<M>(), engine)
    }

    /// Create a mailer and its Handlebars engine from settings.
    ///
    /// With `settings.test_mode` set, a mailer created outside a request
    /// renders against a placeholder rooted at `settings.base_url`.
    pub fn from_settings(name: impl Into<String>, settings: &MailerSettings) -> Result<Self> {
        let base_url = settings.base_url()?;
        let engine = HandlebarsEngine::new(settings.view_config())?;

        let mut mailer = Self::build(name.into(), Arc::new(engine), settings.test_mode, || {
            RequestContext::detached(base_url)
        });
        mailer.master_name = settings.master_name.clone();
        mailer.is_body_html = settings.is_body_html;
        Ok(mailer)
    }

    // Consumes the global test-mode flag whether or not a request is current.
    fn build(
        name: String,
        engine: Arc<dyn ViewEngine>,
        test_mode: bool,
        placeholder: impl FnOnce() -> RequestContext,
    ) -> Self {
        let test_mode = take_test_mode() || test_mode;
        let request = RequestContext::current().or_else(|| test_mode.then(placeholder));

        debug!(
            mailer = %name,
            has_request = request.is_some(),
            test_mode,
            "Created mailer"
        );

        Self {
            name,
            engine,
            master_name: None,
            is_body_html: true,
            view_data: ViewData::new(),
            request,
            view_context: OnceCell::new(),
        }
    }

    /// Render against `request` instead of the captured context.
    pub fn with_request(mut self, request: RequestContext) -> Self {
        self.request = Some(request);
        self.view_context = OnceCell::new();
        self
    }

    /// Set the default layout.
    pub fn with_master(mut self, master_name: impl Into<String>) -> Self {
        self.master_name = Some(master_name.into());
        self
    }

    /// Set whether populated bodies are HTML.
    pub fn with_body_html(mut self, is_body_html: bool) -> Self {
        self.is_body_html = is_body_html;
        self
    }

    /// Mailer name, used as the route controller.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn master_name(&self) -> Option<&str> {
        self.master_name.as_deref()
    }

    pub fn set_master_name(&mut self, master_name: Option<String>) {
        self.master_name = master_name;
    }

    pub fn is_body_html(&self) -> bool {
        self.is_body_html
    }

    pub fn set_body_html(&mut self, is_body_html: bool) {
        self.is_body_html = is_body_html;
    }

    pub fn view_data(&self) -> &ViewData {
        &self.view_data
    }

    pub fn view_data_mut(&mut self) -> &mut ViewData {
        &mut self.view_data
    }

    /// Add a value to the view data.
    pub fn set<T: Serialize>(&mut self, key: impl Into<String>, value: T) -> Result<()> {
        Ok(self.view_data.set(key, value)?)
    }

    /// Request the views render against, if any.
    pub fn request(&self) -> Option<&RequestContext> {
        self.request.as_ref()
    }

    pub fn engine(&self) -> &Arc<dyn ViewEngine> {
        &self.engine
    }

    fn view_context(&self) -> Result<&ViewContext> {
        self.view_context.get_or_try_init(|| {
            let request = self
                .request
                .clone()
                .ok_or_else(|| MailError::MissingContext(self.name.clone()))?;
            Ok(ViewContext::for_controller(request, self.name.clone()))
        })
    }

    /// Render a view, wrapped in `master_name` or else the default layout.
    ///
    /// `Some("")` renders without a layout even when a default is set.
    pub fn email_body(&self, view_name: &str, master_name: Option<&str>) -> Result<String> {
        let ctx = self.view_context()?;
        let master = master_name.or(self.master_name.as_deref());

        let body = ViewResult::new(view_name)
            .with_master(master)
            .with_data(self.view_data.clone())
            .execute(ctx, self.engine.as_ref())?;

        debug!(
            mailer = %self.name,
            view = view_name,
            master = ?master,
            len = body.len(),
            "Rendered email body"
        );

        Ok(body)
    }

    /// Render a view into `mail_message`, setting its HTML flag.
    ///
    /// Fails with [`MailError::NullArgument`] when no message is given.
    /// Returns the rendered body.
    pub fn populate_body(
        &self,
        mail_message: Option<&mut Email>,
        view_name: &str,
        master_name: Option<&str>,
    ) -> Result<String> {
        let message = mail_message.ok_or(MailError::NullArgument("mail_message"))?;

        message.is_body_html = self.is_body_html;
        let body = self.email_body(view_name, master_name)?;
        message.body = Some(body.clone());

        Ok(body)
    }
}

impl std::fmt::Debug for MailerBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailerBase")
            .field("name", &self.name)
            .field("master_name", &self.master_name)
            .field("is_body_html", &self.is_body_html)
            .field("view_data", &self.view_data)
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}

/// Last path segment of a type name, without generic arguments.
fn mailer_name<M: ?Sized>() -> String {
    let full = std::any::type_name::<M>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

/// A user-defined mailer built on [`MailerBase`].
///
/// ```no_run
/// use std::sync::Arc;
/// use mailview_mail::{Email, Mailer, MailerBase, Result};
/// use mailview_views::{HandlebarsEngine, ViewConfig};
///
/// struct UserMailer {
///     base: MailerBase,
/// }
///
/// impl Mailer for UserMailer {
///     fn base(&self) -> &MailerBase {
///         &self.base
///     }
/// }
///
/// impl UserMailer {
///     fn welcome(&self, to: &str) -> Result<Email> {
///         let mut email = Email::new().to(to)?.subject("Welcome");
///         self.populate_body(Some(&mut email), "Welcome", None)?;
///         Ok(email)
///     }
/// }
///
/// # fn main() -> Result<()> {
/// let engine = Arc::new(HandlebarsEngine::new(ViewConfig::new("views"))?);
/// let mailer = UserMailer { base: MailerBase::for_mailer::<UserMailer>(engine) };
/// mailer.welcome("ada@example.com")?;
/// # Ok(())
/// # }
/// ```
pub trait Mailer {
    fn base(&self) -> &MailerBase;

    /// See [`MailerBase::email_body`].
    fn email_body(&self, view_name: &str, master_name: Option<&str>) -> Result<String> {
        self.base().email_body(view_name, master_name)
    }

    /// See [`MailerBase::populate_body`].
    fn populate_body(
        &self,
        mail_message: Option<&mut Email>,
        view_name: &str,
        master_name: Option<&str>,
    ) -> Result<String> {
        self.base().populate_body(mail_message, view_name, master_name)
    }
}

impl Mailer for MailerBase {
    fn base(&self) -> &MailerBase {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailview_views::{ViewConfig, ViewError};
    use crate::{is_test_mode_enabled, set_test_mode};
    use serial_test::{parallel, serial};

    struct UserMailer;

    fn engine() -> Arc<dyn ViewEngine> {
        let engine = HandlebarsEngine::in_memory(ViewConfig::default());
        engine
            .register_view("UserMailer/Welcome", "<p>Hi {{name}}</p>")
            .unwrap();
        engine
            .register_view("shared/_Layout", "<main>{{{body}}}</main>")
            .unwrap();
        engine
            .register_view("UserMailer/Link", "{{absolute_url \"/confirm\"}}")
            .unwrap();
        Arc::new(engine)
    }

    fn mailer() -> MailerBase {
        let mut mailer = MailerBase::for_mailer::<UserMailer>(engine())
            .with_request(RequestContext::empty());
        mailer.set("name", "Ada").unwrap();
        mailer
    }

    #[test]
    #[parallel]
    fn test_mailer_name_from_type() {
        assert_eq!(mailer_name::<UserMailer>(), "UserMailer");
        assert_eq!(mailer_name::<Vec<String>>(), "Vec");
    }

    #[test]
    #[parallel]
    fn test_email_body_without_layout() {
        assert_eq!(mailer().email_body("Welcome", None).unwrap(), "<p>Hi Ada</p>");
    }

    #[test]
    #[parallel]
    fn test_email_body_with_layout() {
        let body = mailer().email_body("Welcome", Some("_Layout")).unwrap();
        assert_eq!(body, "<main><p>Hi Ada</p></main>");
    }

    #[test]
    #[parallel]
    fn test_default_master_and_explicit_override() {
        let mailer = mailer().with_master("_Layout");
        assert_eq!(
            mailer.email_body("Welcome", None).unwrap(),
            "<main><p>Hi Ada</p></main>"
        );
        assert_eq!(mailer.email_body("Welcome", Some("")).unwrap(), "<p>Hi Ada</p>");
    }

    #[test]
    #[parallel]
    fn test_populate_body_sets_flag_and_body() {
        let mailer = mailer().with_body_html(false);
        let mut email = Email::new().body_html(true);

        let body = mailer
            .populate_body(Some(&mut email), "Welcome", None)
            .unwrap();

        assert_eq!(email.body.as_deref(), Some("<p>Hi Ada</p>"));
        assert_eq!(body, "<p>Hi Ada</p>");
        assert!(!email.is_body_html);
    }

    #[test]
    #[parallel]
    fn test_populate_body_rejects_missing_message() {
        let err = mailer().populate_body(None, "Welcome", None).unwrap_err();
        assert!(matches!(err, MailError::NullArgument("mail_message")));
        assert_eq!(err.to_string(), "mail_message cannot be null");
    }

    #[test]
    #[parallel]
    fn test_render_errors_pass_through() {
        let err = mailer().email_body("Missing", None).unwrap_err();
        assert!(matches!(err, MailError::View(ViewError::ViewNotFound { .. })));
    }

    #[test]
    #[serial]
    fn test_missing_context_without_test_mode() {
        set_test_mode(false);
        let mailer = MailerBase::for_mailer::<UserMailer>(engine());

        assert!(mailer.request().is_none());
        assert!(matches!(
            mailer.email_body("Welcome", None),
            Err(MailError::MissingContext(name)) if name == "UserMailer"
        ));
    }

    #[test]
    #[serial]
    fn test_test_mode_supplies_placeholder() {
        set_test_mode(true);
        let mailer = MailerBase::for_mailer::<UserMailer>(engine());

        assert!(mailer.request().is_some_and(RequestContext::is_placeholder));
        assert_eq!(mailer.email_body("Link", None).unwrap(), "http://localhost/confirm");
    }

    #[test]
    #[serial]
    fn test_test_mode_applies_to_next_mailer_only() {
        set_test_mode(true);
        let first = MailerBase::new("First", engine());
        assert!(!is_test_mode_enabled());
        let second = MailerBase::new("Second", engine());

        assert!(first.request().is_some());
        assert!(second.request().is_none());
        assert!(matches!(
            second.email_body("Welcome", None),
            Err(MailError::MissingContext(_))
        ));
    }

    #[test]
    #[serial]
    fn test_test_mode_cleared_inside_request() {
        set_test_mode(true);
        let request = RequestContext::parse("GET", "https://shop.example.com/").unwrap();

        let mailer = request.scope(|| MailerBase::for_mailer::<UserMailer>(engine()));

        assert!(!is_test_mode_enabled());
        assert!(mailer.request().is_some_and(|r| !r.is_placeholder()));
    }

    #[test]
    #[serial]
    fn test_current_request_is_captured() {
        set_test_mode(false);
        let request = RequestContext::parse("GET", "https://shop.example.com/orders").unwrap();

        let mailer = request.scope(|| MailerBase::for_mailer::<UserMailer>(engine()));

        assert_eq!(
            mailer.email_body("Link", None).unwrap(),
            "https://shop.example.com/confirm"
        );
    }

    #[test]
    #[parallel]
    fn test_mailer_trait_forwards() {
        struct Wrapper(MailerBase);
        impl Mailer for Wrapper {
            fn base(&self) -> &MailerBase {
                &self.0
            }
        }

        let wrapper = Wrapper(mailer());
        let mut email = Email::new();
        wrapper
            .populate_body(Some(&mut email), "Welcome", Some("_Layout"))
            .unwrap();
        assert_eq!(email.body.as_deref(), Some("<main><p>Hi Ada</p></main>"));
    }
}
