//! View name resolution

use crate::{Result, ViewContext, ViewEngine, ViewError};
use tracing::trace;

/// Folder searched after the controller folder.
pub const SHARED_FOLDER: &str = "shared";

/// Maps a view name to the template keys that may hold it.
///
/// For `Welcome` rendered by `UserMailer` the candidates are
/// `UserMailer/Welcome`, `shared/Welcome` and `Welcome`, tried in that order.
/// A name that already contains `/` is taken as an exact key.
#[derive(Debug, Clone)]
pub struct ViewLocator {
    extension: String,
}

impl ViewLocator {
    pub fn new(extension: impl Into<String>) -> Self {
        let extension = extension.into();
        let extension = format!(".{}", extension.trim_start_matches('.'));
        Self { extension }
    }

    /// Strip the file extension and any leading `/` or `~/`.
    pub fn normalize<'a>(&self, name: &'a str) -> &'a str {
        let name = name.trim();
        let name = name.strip_prefix("~/").unwrap_or(name).trim_start_matches('/');
        name.strip_suffix(self.extension.as_str()).unwrap_or(name)
    }

    /// Candidate template keys, most specific first.
    pub fn candidates(&self, ctx: &ViewContext, name: &str) -> Result<Vec<String>> {
        let name = self.normalize(name);
        if name.is_empty() {
            return Err(ViewError::InvalidViewName(name.to_string()));
        }

        if name.contains('/') {
            return Ok(vec![name.to_string()]);
        }

        let mut candidates = Vec::with_capacity(3);
        if let Some(controller) = ctx.controller().filter(|c| !c.is_empty()) {
            candidates.push(format!("{}/{}", controller, name));
        }
        candidates.push(format!("{}/{}", SHARED_FOLDER, name));
        candidates.push(name.to_string());
        Ok(candidates)
    }

    /// First candidate the engine knows about.
    pub fn locate(&self, engine: &dyn ViewEngine, ctx: &ViewContext, name: &str) -> Result<String> {
        let candidates = self.candidates(ctx, name)?;

        for candidate in &candidates {
            if engine.has_view(candidate) {
                trace!(view = name, key = %candidate, "Resolved view");
                return Ok(candidate.clone());
            }
        }

        Err(ViewError::ViewNotFound {
            name: name.to_string(),
            searched: candidates,
        })
    }
}
