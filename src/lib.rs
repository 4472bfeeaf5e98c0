// mailview - render email bodies with the application's view templates
//
// A mailer resolves a named view, renders it (optionally inside a layout)
// through the view engine, and moves the output into an outgoing message.
// Outside an HTTP request, a placeholder or detached request context stands in.

// Re-export the mailer surface
pub use mailview_mail::*;

// Re-export the view engine
pub use mailview_views::{
    HandlebarsEngine, RequestContext, RequestGuard, RouteData, ViewConfig, ViewContext, ViewData,
    ViewEngine, ViewError, ViewLocator, ViewResult,
};

#[cfg(feature = "tera")]
pub use mailview_views::TeraEngine;

pub use mailview_config;
pub use mailview_views;

// Re-export optional crates
#[cfg(feature = "log")]
pub use mailview_log;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Address,
        Email,
        HandlebarsEngine,
        IntoAddress,
        MailError,
        Mailer,
        MailerBase,
        MailerSettings,
        RequestContext,
        ViewConfig,
        ViewData,
        ViewEngine,
        is_test_mode_enabled,
        set_test_mode,
    };
}
