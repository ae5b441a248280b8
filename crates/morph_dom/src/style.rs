//! Inline styles
//!
//! An element's `style` attribute, kept as an ordered property map so
//! `css_text` round-trips in declaration order.

use indexmap::IndexMap;

/// Inline style declarations of one element
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlineStyle {
    properties: IndexMap<String, String>,
}

impl InlineStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a declaration list such as `width: 10px; opacity: 0`
    pub fn parse(css_text: &str) -> Self {
        let mut style = Self::new();
        style.set_css_text(css_text);
        style
    }

    /// Replace every declaration with the ones in `css_text`.
    /// Malformed declarations are skipped.
    pub fn set_css_text(&mut self, css_text: &str) {
        self.properties.clear();
        for declaration in css_text.split(';') {
            let Some((name, value)) = declaration.split_once(':') else {
                continue;
            };
            let name = name.trim();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                continue;
            }
            self.properties
                .insert(name.to_ascii_lowercase(), value.to_string());
        }
    }

    /// Serialize as `name: value;` pairs separated by a space
    pub fn css_text(&self) -> String {
        self.properties
            .iter()
            .map(|(name, value)| format!("{}: {};", name, value))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.properties.insert(name.to_ascii_lowercase(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.properties.shift_remove(name)
    }

    /// Drop every declaration (`style.cssText = ''`)
    pub fn clear(&mut self) {
        self.properties.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_text_round_trip_keeps_order() {
        let style = InlineStyle::parse("width: 10px; Height:20px;; bogus; transform-origin: 50% 50% ;");
        assert_eq!(style.get("height"), Some("20px"));
        assert_eq!(
            style.css_text(),
            "width: 10px; height: 20px; transform-origin: 50% 50%;"
        );
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut style = InlineStyle::parse("transform: none; opacity: 0");
        style.set("transform", "scale(2, 2)");
        assert_eq!(style.css_text(), "transform: scale(2, 2); opacity: 0;");
        style.clear();
        assert!(style.is_empty());
    }
}
