//! Request and view contexts
//!
//! Views need to know which request they are rendered for: links in an email
//! point back at the host that served the request, and view lookup is keyed
//! by the controller (mailer) name. When there is no request, for example in
//! a background job, a placeholder [`RequestContext`] stands in.

use crate::{Result, ViewData};
use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::marker::PhantomData;
use tracing::debug;
use url::Url;
use uuid::Uuid;

/// URL of the placeholder request.
pub const PLACEHOLDER_URL: &str = "http://localhost/";

// Constant input; `test_empty_request_is_localhost` pins it.
static PLACEHOLDER: Lazy<Url> =
    Lazy::new(|| Url::parse(PLACEHOLDER_URL).expect("placeholder URL is valid"));

/// Template data keys owned by the view context.
pub const RESERVED_KEYS: [&str; 2] = ["request", "route"];

thread_local! {
    static CURRENT_REQUEST: RefCell<Option<RequestContext>> = const { RefCell::new(None) };
}

/// The parts of an HTTP request that views can see.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    method: String,
    url: Url,
    base_url: Url,
    headers: HashMap<String, String>,
    request_id: Uuid,
    placeholder: bool,
}

impl RequestContext {
    /// Context for a real request. The base URL is the request's origin.
    pub fn new(method: impl Into<String>, url: Url) -> Self {
        let mut base_url = url.clone();
        base_url.set_path("/");
        base_url.set_query(None);
        base_url.set_fragment(None);

        Self {
            method: method.into(),
            url,
            base_url,
            headers: HashMap::new(),
            request_id: Uuid::new_v4(),
            placeholder: false,
        }
    }

    /// Parse the request URL from a string.
    pub fn parse(method: impl Into<String>, url: &str) -> Result<Self> {
        Ok(Self::new(method, Url::parse(url)?))
    }

    /// Placeholder for rendering with no request: `GET http://localhost/`.
    pub fn empty() -> Self {
        Self::detached(PLACEHOLDER.clone())
    }

    /// Placeholder rooted at a known public URL, for out-of-request rendering
    /// that still needs working absolute links.
    pub fn detached(base_url: Url) -> Self {
        Self {
            method: "GET".to_string(),
            url: base_url.clone(),
            base_url,
            headers: HashMap::new(),
            request_id: Uuid::new_v4(),
            placeholder: true,
        }
    }

    /// Add a request header. Names are stored lowercase.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Whether this context was synthesized rather than taken from a request.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// The request entered on this thread, if any.
    pub fn current() -> Option<RequestContext> {
        CURRENT_REQUEST.with(|slot| slot.borrow().clone())
    }

    /// Make this the current request until the returned guard is dropped.
    ///
    /// Guards nest: dropping one restores whatever was current before it.
    pub fn enter(self) -> RequestGuard {
        debug!(
            request_id = %self.request_id,
            method = %self.method,
            path = %self.url.path(),
            "Entering request context"
        );
        let previous = CURRENT_REQUEST.with(|slot| slot.borrow_mut().replace(self));
        RequestGuard {
            previous,
            _not_send: PhantomData,
        }
    }

    /// Run `f` with this as the current request.
    pub fn scope<R>(self, f: impl FnOnce() -> R) -> R {
        let _guard = self.enter();
        f()
    }

    fn to_json(&self) -> Value {
        json!({
            "method": self.method,
            "url": self.url.as_str(),
            "base_url": self.base_url.as_str(),
            "host": self.host(),
            "path": self.path(),
            "request_id": self.request_id.to_string(),
        })
    }
}

/// Restores the previous current request on drop.
#[must_use = "the request context is left as soon as the guard is dropped"]
pub struct RequestGuard {
    previous: Option<RequestContext>,
    // tied to the thread whose slot it restores
    _not_send: PhantomData<*const ()>,
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT_REQUEST.with(|slot| *slot.borrow_mut() = previous);
    }
}

/// Route values of the view context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RouteData {
    values: BTreeMap<String, String>,
}

impl RouteData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route data naming the controller that owns the views.
    pub fn for_controller(name: impl Into<String>) -> Self {
        let mut route = Self::new();
        route.insert("controller", name);
        route
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn controller(&self) -> Option<&str> {
        self.get("controller")
    }
}

/// Everything the view engine needs besides the view data.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewContext {
    request: RequestContext,
    route: RouteData,
}

impl ViewContext {
    pub fn new(request: RequestContext, route: RouteData) -> Self {
        Self { request, route }
    }

    pub fn for_controller(request: RequestContext, controller: impl Into<String>) -> Self {
        Self::new(request, RouteData::for_controller(controller))
    }

    pub fn request(&self) -> &RequestContext {
        &self.request
    }

    pub fn route(&self) -> &RouteData {
        &self.route
    }

    pub fn controller(&self) -> Option<&str> {
        self.route.controller()
    }

    /// Build the engine input: the view data plus `request` and `route`.
    ///
    /// The context entries shadow view data entries of the same name.
    pub fn template_data(&self, view_data: &ViewData) -> Value {
        let mut data: Map<String, Value> = view_data.to_map();

        for key in RESERVED_KEYS {
            if data.contains_key(key) {
                debug!(key, "View data entry shadowed by view context");
            }
        }

        data.insert("request".to_string(), self.request.to_json());
        data.insert(
            "route".to_string(),
            serde_json::to_value(&self.route).unwrap_or(Value::Null),
        );

        Value::Object(data)
    }
}
