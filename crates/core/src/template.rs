//! Placeholder substitution for app template bodies.
//!
//! Template bodies contain `{{dotted.path}}` markers that are replaced with
//! values looked up in a JSON configuration object. This is textual
//! substitution only: no conditionals, no loops, and nothing in the template
//! or the values is ever evaluated. Substituted output is never re-scanned,
//! so values containing `{{` cannot inject further markers.
//!
//! Markers that cannot be resolved (missing key, non-object mid-path, null
//! value, or text inside the braces that is not a valid dotted path) are left
//! in the output as their original literal text. The preview surface relies
//! on this: an unbound marker stays visible to the administrator instead of
//! silently disappearing.

use serde_json::Value;

/// Render a template body against a configuration-values object.
///
/// Pure and deterministic: neither input is mutated, and the same inputs
/// always produce the same output. A template without markers is returned
/// unchanged. Runs in a single pass over the input, fast enough to call on
/// every editor keystroke.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use steward_core::template::render;
///
/// let values = json!({ "title": "Hi", "body": { "text": "World" } });
/// let out = render("<h1>{{title}}</h1><p>{{ body.text }}</p>", &values);
/// assert_eq!(out, "<h1>Hi</h1><p>World</p>");
/// ```
pub fn render(template: &str, values: &Value) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        let Some(close) = rest[open + 2..].find("}}") else {
            // Unbalanced braces: everything remaining is literal text.
            break;
        };

        let inner = &rest[open + 2..open + 2 + close];
        let marker = &rest[open..open + 2 + close + 2];

        out.push_str(&rest[..open]);

        let path = inner.trim();
        match lookup(path, values) {
            Some(value) if !value.is_null() => out.push_str(&stringify(value)),
            _ => out.push_str(marker),
        }

        rest = &rest[open + 2 + close + 2..];
    }

    out.push_str(rest);
    out
}

/// Collect the distinct unresolvable marker paths in a template.
///
/// Used by the preview endpoint to tell the caller which configuration
/// fields are still unbound. Invalid path text (e.g. `{{1+1}}`) is not
/// reported, matching [`render`]'s treatment of it as plain literal text.
pub fn unresolved_paths(template: &str, values: &Value) -> Vec<String> {
    let mut paths = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        let Some(close) = rest[open + 2..].find("}}") else {
            break;
        };
        let path = rest[open + 2..open + 2 + close].trim();
        if is_valid_path(path)
            && !matches!(lookup(path, values), Some(v) if !v.is_null())
            && !paths.iter().any(|p| p == path)
        {
            paths.push(path.to_string());
        }
        rest = &rest[open + 2 + close + 2..];
    }

    paths
}

/// Resolve a dotted path against a values object, or `None` if any segment
/// is missing, the path is syntactically invalid, or a non-object value is
/// reached mid-path.
fn lookup<'a>(path: &str, values: &'a Value) -> Option<&'a Value> {
    if !is_valid_path(path) {
        return None;
    }
    let mut current = values;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// A valid path is one or more `.`-separated segments, each non-empty and
/// consisting of ASCII alphanumerics, `_`, or `-`. Anything else inside the
/// braces (including `{{ }}` and expression-looking text like `{{1+1}}`) is
/// not a marker.
fn is_valid_path(path: &str) -> bool {
    !path.is_empty()
        && path.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        })
}

/// Convert a resolved value to its substitution text.
///
/// Strings are inserted verbatim (no surrounding quotes); numbers and
/// booleans use their natural display form; objects and arrays are
/// serialized as compact JSON.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
