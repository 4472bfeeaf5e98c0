//! Built-in Handlebars helpers
//!
//! Handlebars already ships `eq`, `ne`, `lt`, `gt`, `lte`, `gte`, `and`, `or`,
//! `not` and `len`. The helpers here cover string formatting and links that
//! point back at the application that sent the email.

use handlebars::{
    handlebars_helper, Context, Handlebars, Helper, HelperResult, Output, RenderContext,
    RenderErrorReason,
};
use serde_json::Value;
use url::Url;

handlebars_helper!(upper_helper: |s: str| s.to_uppercase());
handlebars_helper!(lower_helper: |s: str| s.to_lowercase());
handlebars_helper!(capitalize_helper: |s: str| {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    }
});
handlebars_helper!(json_helper: |v: Json| v.to_string());
handlebars_helper!(default_helper: |v: Json, fallback: Json| {
    if v.is_null() { fallback.clone() } else { v.clone() }
});

/// Register all built-in helpers
pub fn register_builtin_helpers(handlebars: &mut Handlebars) {
    handlebars.register_helper("upper", Box::new(upper_helper));
    handlebars.register_helper("lower", Box::new(lower_helper));
    handlebars.register_helper("capitalize", Box::new(capitalize_helper));
    handlebars.register_helper("json", Box::new(json_helper));
    handlebars.register_helper("default", Box::new(default_helper));
    handlebars.register_helper("absolute_url", Box::new(absolute_url_helper));
}

/// Absolute link helper: {{absolute_url "/account/confirm"}}
///
/// Joins the path onto `request.base_url` of the render data. A leading `/`
/// is relative to the base, so a base of `https://example.com/app/` keeps its
/// `/app` prefix.
fn absolute_url_helper(
    h: &Helper,
    _: &Handlebars,
    ctx: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let path = h
        .param(0)
        .and_then(|p| p.value().as_str())
        .ok_or(RenderErrorReason::ParamNotFoundForIndex("absolute_url", 0))?;

    let url = join_base_url(ctx.data(), path)?;
    out.write(url.as_str())?;
    Ok(())
}

pub(crate) fn join_base_url(data: &Value, path: &str) -> Result<Url, RenderErrorReason> {
    let base = data
        .pointer("/request/base_url")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            RenderErrorReason::Other("absolute_url requires a request context".to_string())
        })?;

    let base = Url::parse(base).map_err(|e| RenderErrorReason::Other(e.to_string()))?;
    base.join(path.trim_start_matches('/'))
        .map_err(|e| RenderErrorReason::Other(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> Handlebars<'static> {
        let mut handlebars = Handlebars::new();
        register_builtin_helpers(&mut handlebars);
        handlebars
    }

    #[test]
    fn test_builtin_eq_still_available() {
        let mut handlebars = registry();
        handlebars
            .register_template_string("test", "{{#if (eq a b)}}equal{{else}}not equal{{/if}}")
            .unwrap();

        assert_eq!(handlebars.render("test", &json!({"a": 5, "b": 5})).unwrap(), "equal");
        assert_eq!(handlebars.render("test", &json!({"a": 5, "b": 10})).unwrap(), "not equal");
    }

    #[test]
    fn test_upper_helper() {
        let mut handlebars = registry();
        handlebars.register_template_string("test", "{{upper name}}").unwrap();

        let result = handlebars.render("test", &json!({"name": "hello"})).unwrap();
        assert_eq!(result, "HELLO");
    }

    #[test]
    fn test_capitalize_helper() {
        let mut handlebars = registry();
        handlebars.register_template_string("test", "{{capitalize name}}").unwrap();

        let result = handlebars.render("test", &json!({"name": "ada"})).unwrap();
        assert_eq!(result, "Ada");
    }

    #[test]
    fn test_default_helper() {
        let mut handlebars = registry();
        handlebars
            .register_template_string("test", "Hi {{default nickname \"friend\"}}")
            .unwrap();

        let result = handlebars.render("test", &json!({"nickname": null})).unwrap();
        assert_eq!(result, "Hi friend");

        let result = handlebars.render("test", &json!({"nickname": "Bo"})).unwrap();
        assert_eq!(result, "Hi Bo");
    }

    #[test]
    fn test_absolute_url_helper() {
        let mut handlebars = registry();
        handlebars
            .register_template_string("test", "{{absolute_url \"/confirm?token=abc\"}}")
            .unwrap();

        let data = json!({"request": {"base_url": "https://example.com/app/"}});
        let result = handlebars.render("test", &data).unwrap();
        assert_eq!(result, "https://example.com/app/confirm?token=abc");
    }

    #[test]
    fn test_absolute_url_without_request_fails() {
        let mut handlebars = registry();
        handlebars
            .register_template_string("test", "{{absolute_url \"/confirm\"}}")
            .unwrap();

        assert!(handlebars.render("test", &json!({})).is_err());
    }
}
