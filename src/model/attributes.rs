//! Attribute maps and typed attribute values
//!
//! An [`AttributeMap`] keeps its entries in insertion order, which is also the
//! order they are emitted in. Setting an existing name replaces the value in
//! place. Values are typed so the serializer knows which DOT form to use:
//! bare identifier, numeral, quoted string, HTML-like `<...>` label or a
//! pre-escaped record label.

use std::fmt::Write;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::LineageError;
use crate::model::identifier::{escape_quoted, is_bare_identifier, quote};

/// A single attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Plain string: bare when it is a valid identifier, quoted otherwise
    Text(String),
    /// Must be a valid identifier; always emitted bare
    Identifier(String),
    /// Always emitted as a quoted string
    Quoted(String),
    Integer(i64),
    /// Must be finite
    Float(f64),
    Bool(bool),
    /// HTML-like label body, emitted between `<` and `>`
    Html(String),
    Record(RecordLabel),
}

impl AttributeValue {
    pub fn text(value: impl Into<String>) -> Self {
        AttributeValue::Text(value.into())
    }

    pub fn identifier(value: impl Into<String>) -> Self {
        AttributeValue::Identifier(value.into())
    }

    pub fn quoted(value: impl Into<String>) -> Self {
        AttributeValue::Quoted(value.into())
    }

    pub fn html(value: impl Into<String>) -> Self {
        AttributeValue::Html(value.into())
    }

    /// Check that the value can be written in DOT. `name` is only used for
    /// the error message.
    pub fn validate(&self, name: &str) -> Result<(), LineageError> {
        match self {
            AttributeValue::Text(text) | AttributeValue::Quoted(text) => reject_nul(name, text),
            AttributeValue::Identifier(text) => {
                if is_bare_identifier(text) {
                    Ok(())
                } else {
                    Err(LineageError::invalid_value(
                        name,
                        format!("'{}' is not a bare identifier", text.replace('\0', "\\0")),
                    ))
                }
            }
            AttributeValue::Integer(_) | AttributeValue::Bool(_) => Ok(()),
            AttributeValue::Float(value) => {
                if value.is_finite() {
                    Ok(())
                } else {
                    Err(LineageError::invalid_value(
                        name,
                        format!("{value} is not a finite number"),
                    ))
                }
            }
            AttributeValue::Html(body) => {
                reject_nul(name, body)?;
                check_balanced_angles(name, body)
            }
            AttributeValue::Record(label) => label.validate(name),
        }
    }

    /// Render the value in its DOT form after validating it.
    pub fn to_dot(&self, name: &str) -> Result<String, LineageError> {
        self.validate(name)?;
        let rendered = match self {
            AttributeValue::Text(text) => {
                if is_bare_identifier(text) {
                    text.clone()
                } else {
                    quote(text)
                }
            }
            AttributeValue::Identifier(text) => text.clone(),
            AttributeValue::Quoted(text) => quote(text),
            AttributeValue::Integer(value) => value.to_string(),
            AttributeValue::Float(value) => value.to_string(),
            AttributeValue::Bool(value) => value.to_string(),
            AttributeValue::Html(body) => format!("<{body}>"),
            // Record escapes are applied once, by the label itself
            AttributeValue::Record(label) => format!("\"{}\"", label.render()),
        };
        Ok(rendered)
    }
}

fn reject_nul(name: &str, text: &str) -> Result<(), LineageError> {
    if text.contains('\0') {
        Err(LineageError::invalid_value(name, "value contains a NUL byte"))
    } else {
        Ok(())
    }
}

fn check_balanced_angles(name: &str, body: &str) -> Result<(), LineageError> {
    let mut depth: usize = 0;
    for c in body.chars() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    LineageError::invalid_value(name, "HTML label closes an unopened '<'")
                })?;
            }
            _ => {}
        }
    }
    if depth == 0 {
        Ok(())
    } else {
        Err(LineageError::invalid_value(
            name,
            "HTML label has an unterminated '<'",
        ))
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Integer(i64::from(value))
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<RecordLabel> for AttributeValue {
    fn from(value: RecordLabel) -> Self {
        AttributeValue::Record(value)
    }
}

/// One field of a record-shaped node label.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordField {
    Text { port: Option<String>, text: String },
    Group(Vec<RecordField>),
}

/// Structured label for `shape=record` nodes.
///
/// Fields are separated by `|`, groups flip the layout direction and are
/// wrapped in `{}`. Fields with a port can be targeted by edge ports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordLabel {
    fields: Vec<RecordField>,
}

impl RecordLabel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, text: impl Into<String>) -> Self {
        self.fields.push(RecordField::Text {
            port: None,
            text: text.into(),
        });
        self
    }

    pub fn with_port_field(mut self, port: impl Into<String>, text: impl Into<String>) -> Self {
        self.fields.push(RecordField::Text {
            port: Some(port.into()),
            text: text.into(),
        });
        self
    }

    pub fn with_group(mut self, group: RecordLabel) -> Self {
        self.fields.push(RecordField::Group(group.fields));
        self
    }

    pub fn fields(&self) -> &[RecordField] {
        &self.fields
    }

    fn validate(&self, name: &str) -> Result<(), LineageError> {
        let mut pending: Vec<&RecordField> = self.fields.iter().collect();
        while let Some(field) = pending.pop() {
            match field {
                RecordField::Text { port, text } => {
                    reject_nul(name, text)?;
                    if let Some(port) = port {
                        reject_nul(name, port)?;
                    }
                }
                RecordField::Group(children) => pending.extend(children.iter()),
            }
        }
        Ok(())
    }

    /// Render the label body with record and string escapes applied; the
    /// caller only adds the surrounding quotes.
    fn render(&self) -> String {
        let mut out = String::new();
        render_fields(&self.fields, &mut out);
        out
    }
}

fn render_fields(fields: &[RecordField], out: &mut String) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push('|');
        }
        match field {
            RecordField::Text { port, text } => {
                if let Some(port) = port {
                    out.push('<');
                    out.push_str(&escape_record(port));
                    out.push_str("> ");
                }
                out.push_str(&escape_record(text));
            }
            RecordField::Group(children) => {
                out.push('{');
                render_fields(children, out);
                out.push('}');
            }
        }
    }
}

fn escape_record(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '{' | '}' | '|' | '<' | '>' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push_str(&escape_quoted(c.encode_utf8(&mut [0; 4]))),
        }
    }
    escaped
}

/// Ordered attribute storage attached to graphs, clusters, nodes and edges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeMap {
    entries: Vec<(String, AttributeValue)>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`. An existing entry keeps its position.
    pub fn set(
        &mut self,
        name: &str,
        value: impl Into<AttributeValue>,
    ) -> Result<&mut Self, LineageError> {
        if !is_bare_identifier(name) {
            return Err(LineageError::InvalidAttributeName {
                name: name.to_string(),
            });
        }
        let value = value.into();
        value.validate(name)?;

        match self.entries.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name.to_string(), value)),
        }
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Copy every entry of `other` into this map, in `other`'s order.
    pub fn merge(&mut self, other: &AttributeMap) -> Result<&mut Self, LineageError> {
        for (name, value) in other.iter() {
            self.set(name, value.clone())?;
        }
        Ok(self)
    }

    /// Look `name` up here first, then in each map of `ancestors` in order.
    /// The first map defining it wins.
    pub fn resolve<'a>(
        &'a self,
        name: &str,
        ancestors: impl IntoIterator<Item = &'a AttributeMap>,
    ) -> Option<&'a AttributeValue> {
        self.get(name)
            .or_else(|| ancestors.into_iter().find_map(|map| map.get(name)))
    }

    /// Render the map as a DOT attribute list (`[a=b, c=d]`), or `None` when
    /// the map is empty.
    pub fn to_dot_list(&self) -> Result<Option<String>, LineageError> {
        if self.entries.is_empty() {
            return Ok(None);
        }
        let mut out = String::from("[");
        for (i, (name, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            write!(out, "{}={}", name, value.to_dot(name)?)?;
        }
        out.push(']');
        Ok(Some(out))
    }
}

/// Attribute value as it appears in fact and style files.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Html { html: String },
}

impl From<StyleValue> for AttributeValue {
    fn from(value: StyleValue) -> Self {
        match value {
            StyleValue::Bool(value) => AttributeValue::Bool(value),
            StyleValue::Integer(value) => AttributeValue::Integer(value),
            StyleValue::Float(value) => AttributeValue::Float(value),
            StyleValue::Text(value) => AttributeValue::Text(value),
            StyleValue::Html { html } => AttributeValue::Html(html),
        }
    }
}

/// Attribute table as deserialized from a file, in document order.
pub type StyleMap = IndexMap<String, StyleValue>;

/// Convert a deserialized style table into an [`AttributeMap`].
pub fn style_to_attributes(style: &StyleMap) -> Result<AttributeMap, LineageError> {
    let mut map = AttributeMap::new();
    for (name, value) in style {
        map.set(name, AttributeValue::from(value.clone()))?;
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_preserves_insertion_order() {
        let mut map = AttributeMap::new();
        map.set("color", "red").unwrap();
        map.set("shape", "box").unwrap();
        map.set("color", "blue").unwrap();

        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["color", "shape"]);
        assert_eq!(map.get("color"), Some(&AttributeValue::text("blue")));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_get_missing_is_none() {
        let map = AttributeMap::new();
        assert!(map.get("label").is_none());
        assert!(!map.contains("label"));
        assert!(map.is_empty());
    }

    #[test]
    fn test_invalid_attribute_names() {
        let mut map = AttributeMap::new();
        for name in ["", "bad-name", "1st", "has space"] {
            assert!(matches!(
                map.set(name, "x"),
                Err(LineageError::InvalidAttributeName { .. })
            ));
        }
        assert!(map.is_empty());
    }

    #[test]
    fn test_text_quoting() {
        let value = AttributeValue::text("He said \"hi\"\n");
        assert_eq!(value.to_dot("label").unwrap(), "\"He said \\\"hi\\\"\\n\"");

        let value = AttributeValue::text("simple_id_123");
        assert_eq!(value.to_dot("label").unwrap(), "simple_id_123");

        let value = AttributeValue::text("123");
        assert_eq!(value.to_dot("label").unwrap(), "\"123\"");

        let value = AttributeValue::text("node");
        assert_eq!(value.to_dot("label").unwrap(), "\"node\"");
    }

    #[test]
    fn test_scalar_values() {
        assert_eq!(AttributeValue::from(42).to_dot("x").unwrap(), "42");
        assert_eq!(AttributeValue::from(-3i64).to_dot("x").unwrap(), "-3");
        assert_eq!(AttributeValue::from(0.5).to_dot("x").unwrap(), "0.5");
        assert_eq!(AttributeValue::from(2.0).to_dot("x").unwrap(), "2");
        assert_eq!(AttributeValue::from(true).to_dot("x").unwrap(), "true");
        assert_eq!(
            AttributeValue::quoted("box").to_dot("shape").unwrap(),
            "\"box\""
        );
    }

    #[test]
    fn test_invalid_values() {
        let mut map = AttributeMap::new();
        assert!(matches!(
            map.set("label", "nul\0byte"),
            Err(LineageError::InvalidAttributeValue { .. })
        ));
        assert!(map.set("width", f64::NAN).is_err());
        assert!(map.set("shape", AttributeValue::identifier("not an id")).is_err());
        assert!(map.set("label", AttributeValue::html("<b>open")).is_err());
        assert!(map.set("label", AttributeValue::html("close>")).is_err());
        assert!(map.is_empty());
    }

    #[test]
    fn test_html_label_is_not_quoted() {
        let value = AttributeValue::html("<b>\"Bold\" & more</b>");
        assert_eq!(
            value.to_dot("label").unwrap(),
            "<<b>\"Bold\" & more</b>>"
        );
    }

    #[test]
    fn test_record_label_escaped_once() {
        let label = RecordLabel::new()
            .with_port_field("f0", "left")
            .with_group(RecordLabel::new().with_field("a|b").with_field("say \"x\""))
            .with_field("back\\slash");

        let rendered = AttributeValue::from(label).to_dot("label").unwrap();
        assert_eq!(
            rendered,
            r#""<f0> left|{a\|b|say \"x\"}|back\\slash""#
        );
    }

    #[test]
    fn test_record_label_rejects_nul() {
        let label = RecordLabel::new().with_group(RecordLabel::new().with_field("bad\0"));
        assert!(AttributeValue::from(label).validate("label").is_err());
    }

    #[test]
    fn test_resolve_walks_ancestors() {
        let mut own = AttributeMap::new();
        own.set("color", "blue").unwrap();
        let mut parent = AttributeMap::new();
        parent.set("color", "red").unwrap();
        parent.set("shape", "box").unwrap();
        let mut root = AttributeMap::new();
        root.set("fontname", "Arial").unwrap();

        let chain = [&parent, &root];
        assert_eq!(
            own.resolve("color", chain),
            Some(&AttributeValue::text("blue"))
        );
        assert_eq!(
            own.resolve("shape", chain),
            Some(&AttributeValue::text("box"))
        );
        assert_eq!(
            own.resolve("fontname", chain),
            Some(&AttributeValue::text("Arial"))
        );
        assert!(own.resolve("penwidth", chain).is_none());
    }

    #[test]
    fn test_to_dot_list() {
        let mut map = AttributeMap::new();
        assert_eq!(map.to_dot_list().unwrap(), None);

        map.set("label", "Timer").unwrap();
        map.set("fontsize", 10).unwrap();
        map.set("tooltip", "a b").unwrap();
        assert_eq!(
            map.to_dot_list().unwrap().as_deref(),
            Some("[label=Timer, fontsize=10, tooltip=\"a b\"]")
        );
    }

    #[test]
    fn test_style_values_from_json() {
        let style: StyleMap = serde_json::from_str(
            r#"{"penwidth": 2, "filled": true, "color": "red", "width": 1.5,
                "label": {"html": "<i>x</i>"}}"#,
        )
        .unwrap();

        let map = style_to_attributes(&style).unwrap();
        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["penwidth", "filled", "color", "width", "label"]);
        assert_eq!(map.get("penwidth"), Some(&AttributeValue::Integer(2)));
        assert_eq!(map.get("width"), Some(&AttributeValue::Float(1.5)));
        assert_eq!(
            map.get("label"),
            Some(&AttributeValue::html("<i>x</i>"))
        );
    }

    #[test]
    fn test_style_values_from_toml_keep_document_order() {
        let style: StyleMap =
            toml::from_str("shape = \"box\"\ncolor = \"red\"\narrowhead = \"empty\"\n").unwrap();

        let map = style_to_attributes(&style).unwrap();
        assert_eq!(
            map.to_dot_list().unwrap().as_deref(),
            Some("[shape=box, color=red, arrowhead=empty]")
        );
    }
}
