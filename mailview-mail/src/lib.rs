//! # mailview mail
//!
//! Email bodies rendered through mailview views.
//!
//! ## Features
//!
//! - **Mailers**: render a named view (optionally inside a layout) to a string
//!   and move it into a message body
//! - **Request context**: views see the current request, a placeholder in test
//!   mode, or a detached context supplied by background jobs
//! - **Messages**: validated addresses and an `Email` type that converts to a
//!   `lettre::Message` for any transport
//! - **Settings**: layout, HTML flag and view options from files and
//!   `MAILVIEW_*` environment variables
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mailview_mail::{Email, MailerBase, MailerSettings};
//! use mailview_views::RequestContext;
//! use url::Url;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = MailerSettings::load(None)?;
//!
//!     // Outside a request, e.g. in a background job
//!     let mut mailer = MailerBase::from_settings("UserMailer", &settings)?
//!         .with_request(RequestContext::detached(Url::parse("https://example.com/")?));
//!     mailer.set("name", "Ada")?;
//!
//!     let mut email = Email::new()
//!         .from("noreply@example.com")?
//!         .to("ada@example.com")?
//!         .subject("Welcome!");
//!
//!     // views/UserMailer/Welcome.hbs inside views/shared/_Layout.hbs
//!     mailer.populate_body(Some(&mut email), "Welcome", Some("_Layout"))?;
//!
//!     let _message = email.to_lettre()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Test Mode
//!
//! ```rust
//! use std::sync::Arc;
//! use mailview_mail::{set_test_mode, MailerBase};
//! use mailview_views::{HandlebarsEngine, ViewConfig};
//!
//! let engine = HandlebarsEngine::in_memory(ViewConfig::default());
//! engine.register_view("Ping", "pong").unwrap();
//!
//! // applies to the next mailer created, then clears itself
//! set_test_mode(true);
//! let mailer = MailerBase::new("Ops", Arc::new(engine));
//!
//! assert_eq!(mailer.email_body("Ping", None).unwrap(), "pong");
//! ```

mod address;
mod email;
mod error;
mod mailer;
mod settings;
mod test_mode;

pub use address::{Address, IntoAddress};
pub use email::Email;
pub use error::{MailError, Result};
pub use mailer::{Mailer, MailerBase};
pub use settings::{MailerSettings, ENV_PREFIX};
pub use test_mode::{is_test_mode_enabled, set_test_mode};

/// Prelude for common imports.
///
/// ```
/// use mailview_mail::prelude::*;
/// ```
pub mod prelude {
    pub use crate::address::{Address, IntoAddress};
    pub use crate::email::Email;
    pub use crate::error::{MailError, Result};
    pub use crate::mailer::{Mailer, MailerBase};
    pub use crate::settings::MailerSettings;
    pub use crate::test_mode::{is_test_mode_enabled, set_test_mode};
}
