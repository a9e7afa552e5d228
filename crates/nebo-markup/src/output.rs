//! Serializers for styled-text trees.
//!
//! - [`Component::to_ansi`]: terminal output through `console` styles, used
//!   for server console logging
//! - [`Component::to_json`]: the nested text-component JSON chat clients
//!   consume

use console::Style as ConsoleStyle;
use serde_json::{json, Map, Value};

use crate::component::{Component, Span, Style};

impl Component {
    /// Renders the tree with ANSI escape codes.
    ///
    /// Colors are mapped to the 256-color palette. Styling is forced on so
    /// the output does not depend on whether stdout is a terminal.
    pub fn to_ansi(&self) -> String {
        self.spans()
            .iter()
            .map(|span| console_style(&span.style).apply_to(&span.text).to_string())
            .collect()
    }

    /// Serializes the tree as a text component.
    ///
    /// The root is an empty text node whose `extra` holds one object per
    /// flattened span, so gradients arrive as per-character colors.
    pub fn to_json(&self) -> Value {
        let extra: Vec<Value> = self.spans().iter().map(span_json).collect();
        let mut root = Map::new();
        root.insert("text".into(), Value::String(String::new()));
        if !extra.is_empty() {
            root.insert("extra".into(), Value::Array(extra));
        }
        Value::Object(root)
    }
}

fn console_style(style: &Style) -> ConsoleStyle {
    let mut out = ConsoleStyle::new().force_styling(true);
    if let Some(color) = style.color {
        out = out.fg(color.to_console());
    }
    if style.bold == Some(true) {
        out = out.bold();
    }
    if style.italic == Some(true) {
        out = out.italic();
    }
    if style.underlined == Some(true) {
        out = out.underlined();
    }
    if style.strikethrough == Some(true) {
        out = out.strikethrough();
    }
    if style.obfuscated == Some(true) {
        out = out.blink();
    }
    out
}

fn span_json(span: &Span) -> Value {
    let style = &span.style;
    let mut obj = Map::new();
    obj.insert("text".into(), Value::String(span.text.clone()));

    if let Some(color) = style.color {
        obj.insert("color".into(), Value::String(color.serialized()));
    }
    for (key, value) in [
        ("bold", style.bold),
        ("italic", style.italic),
        ("underlined", style.underlined),
        ("strikethrough", style.strikethrough),
        ("obfuscated", style.obfuscated),
    ] {
        if let Some(value) = value {
            obj.insert(key.into(), Value::Bool(value));
        }
    }
    if let Some(click) = &style.click {
        obj.insert("clickEvent".into(), json!(click));
    }
    if let Some(hover) = &style.hover {
        obj.insert(
            "hoverEvent".into(),
            json!({ "action": "show_text", "contents": hover.to_json() }),
        );
    }
    if let Some(insertion) = &style.insertion {
        obj.insert("insertion".into(), Value::String(insertion.clone()));
    }
    if let Some(font) = &style.font {
        obj.insert("font".into(), Value::String(font.clone()));
    }
    Value::Object(obj)
}
