//! Templates
//!
//! A [`Template`] wraps a render function that turns a JSON data object into
//! markup. Rendered text has its front-matter regions (`--- ... ---` blocks
//! that contain no angle brackets) removed before it is parsed into a
//! fragment.
//!
//! ```ignore
//! let template = Template::new(Interpolate::new("<p>{{user.name}}</p>"));
//! let fragment = template.to_fragment(&mut doc, &json!({"user": {"name": "Ada"}}))?;
//! ```

use std::sync::OnceLock;

use html_escape::encode_text;
use morph_core::NodeId;
use regex::{Captures, Regex};
use serde_json::Value;

use crate::document::Document;
use crate::error::Result;
use crate::markup;

/// Something that renders data into markup text
pub trait Render {
    fn render(&self, data: &Value) -> String;
}

impl<F> Render for F
where
    F: Fn(&Value) -> String,
{
    fn render(&self, data: &Value) -> String {
        self(data)
    }
}

fn front_matter() -> &'static Regex {
    static FRONT_MATTER: OnceLock<Regex> = OnceLock::new();
    FRONT_MATTER.get_or_init(|| Regex::new(r"(?i)(---[^><]+---)").expect("Invalid regex pattern"))
}

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{\{\s*([\w.]+)\s*\}\}\}|\{\{\s*([\w.]+)\s*\}\}")
            .expect("Invalid regex pattern")
    })
}

/// Minimal mustache-style renderer.
///
/// `{{path}}` inserts the html-escaped value at a dotted path, `{{{path}}}`
/// inserts it raw. Missing and null values render as nothing.
#[derive(Clone, Debug)]
pub struct Interpolate {
    source: String,
}

impl Interpolate {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Render for Interpolate {
    fn render(&self, data: &Value) -> String {
        placeholder()
            .replace_all(&self.source, |caps: &Captures| {
                if let Some(raw) = caps.get(1) {
                    value_text(lookup(data, raw.as_str()))
                } else {
                    let path = caps.get(2).map_or("", |m| m.as_str());
                    encode_text(&value_text(lookup(data, path))).into_owned()
                }
            })
            .into_owned()
    }
}

fn lookup<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    if path == "this" || path == "." {
        return Some(data);
    }
    path.split('.').try_fold(data, |value, key| match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| value_text(Some(item)))
            .collect::<Vec<_>>()
            .join(","),
        Some(other) => other.to_string(),
    }
}

/// A render function plus the text and fragment conversions built on it
pub struct Template {
    render: Box<dyn Render>,
}

impl Template {
    pub fn new(render: impl Render + 'static) -> Self {
        Self {
            render: Box::new(render),
        }
    }

    /// Render `data` and strip front-matter regions
    pub fn to_text(&self, data: &Value) -> String {
        strip_front_matter(&self.render.render(data))
    }

    /// Render `data` into a detached fragment of `doc`
    pub fn to_fragment(&self, doc: &mut Document, data: &Value) -> Result<NodeId> {
        markup::parse_fragment(doc, &self.to_text(data))
    }
}

impl std::fmt::Debug for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template").finish_non_exhaustive()
    }
}

/// Remove every `---...---` region that contains no `<` or `>`
pub fn strip_front_matter(text: &str) -> String {
    front_matter().replace_all(text, "").into_owned()
}
