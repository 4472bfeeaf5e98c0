//! View rendering for mailview
//!
//! This crate is the rendering side of mailview: it resolves view names to
//! templates, renders them against caller-supplied data, and wraps the result
//! in a layout. Mailers build on it to produce email bodies.
//!
//! ## Features
//!
//! - Handlebars views loaded from a directory tree (Tera behind the `tera` feature)
//! - Controller-first view lookup with a `shared/` fallback
//! - Layouts that receive the rendered view as `body`
//! - Request context for absolute links, with a placeholder for background jobs
//! - Development mode that reloads views from disk before each render
//!
//! ## Example
//!
//! ```no_run
//! use mailview_views::{
//!     HandlebarsEngine, RequestContext, ViewConfig, ViewContext, ViewData, ViewResult,
//! };
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = HandlebarsEngine::new(ViewConfig::new("views"))?;
//! let ctx = ViewContext::for_controller(RequestContext::empty(), "UserMailer");
//!
//! // views/UserMailer/Welcome.hbs inside views/shared/_Layout.hbs
//! let html = ViewResult::new("Welcome")
//!     .with_master(Some("_Layout"))
//!     .with_data(ViewData::new().with("name", "Ada")?)
//!     .execute(&ctx, &engine)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Built-in Helpers
//!
//! Besides the helpers Handlebars ships (`eq`, `ne`, `lt`, `gt`, `and`, `or`,
//! `not`, `len`, ...):
//!
//! - **String**: `upper`, `lower`, `capitalize`
//! - **Utility**: `json`, `default`
//! - **Links**: `absolute_url`
//!
//! ## Layout Example
//!
//! ```handlebars
//! <html>
//!   <body>
//!     {{{body}}}
//!     <a href="{{absolute_url "/account/settings"}}">Email settings</a>
//!   </body>
//! </html>
//! ```

pub mod config;
pub mod context;
pub mod data;
pub mod engine;
pub mod error;
pub mod helpers;
pub mod locator;
pub mod result;

#[cfg(feature = "tera")]
pub mod tera_engine;

pub use config::ViewConfig;
pub use context::{RequestContext, RequestGuard, RouteData, ViewContext, PLACEHOLDER_URL};
pub use data::ViewData;
pub use engine::{HandlebarsEngine, ViewEngine};
pub use error::{Result, ViewError};
pub use locator::ViewLocator;
pub use result::{ViewResult, BODY_KEY};

#[cfg(feature = "tera")]
pub use tera_engine::TeraEngine;
