//! The styled-text tree produced by the parser.
//!
//! A [`Component`] is a node with optional text content, a [`Style`], and
//! child components. Styles inherit down the tree: a child only overrides the
//! properties it sets. Text always precedes children in reading order.
//!
//! Gradient and rainbow tags are kept on the tree as a [`Fill`] and only
//! turned into per-character colors when the tree is flattened with
//! [`Component::spans`]. That keeps placeholder substitution inside a
//! gradient working, since substituted text is colored at flatten time.

use serde::Serialize;

use crate::color::{Rgb, TextColor};

/// Text decorations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decoration {
    Bold,
    Italic,
    Underlined,
    Strikethrough,
    Obfuscated,
}

impl Decoration {
    pub const ALL: [Decoration; 5] = [
        Decoration::Bold,
        Decoration::Italic,
        Decoration::Underlined,
        Decoration::Strikethrough,
        Decoration::Obfuscated,
    ];

    /// Canonical tag name, also the JSON key.
    pub fn name(self) -> &'static str {
        match self {
            Decoration::Bold => "bold",
            Decoration::Italic => "italic",
            Decoration::Underlined => "underlined",
            Decoration::Strikethrough => "strikethrough",
            Decoration::Obfuscated => "obfuscated",
        }
    }

    /// Looks up a decoration by tag name or short alias.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bold" | "b" => Some(Decoration::Bold),
            "italic" | "i" | "em" => Some(Decoration::Italic),
            "underlined" | "u" => Some(Decoration::Underlined),
            "strikethrough" | "st" => Some(Decoration::Strikethrough),
            "obfuscated" | "obf" => Some(Decoration::Obfuscated),
            _ => None,
        }
    }
}

/// Action performed when a player clicks the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickAction {
    OpenUrl,
    RunCommand,
    SuggestCommand,
    CopyToClipboard,
    ChangePage,
}

impl ClickAction {
    pub fn name(self) -> &'static str {
        match self {
            ClickAction::OpenUrl => "open_url",
            ClickAction::RunCommand => "run_command",
            ClickAction::SuggestCommand => "suggest_command",
            ClickAction::CopyToClipboard => "copy_to_clipboard",
            ClickAction::ChangePage => "change_page",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "open_url" => Some(ClickAction::OpenUrl),
            "run_command" => Some(ClickAction::RunCommand),
            "suggest_command" => Some(ClickAction::SuggestCommand),
            "copy_to_clipboard" => Some(ClickAction::CopyToClipboard),
            "change_page" => Some(ClickAction::ChangePage),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ClickEvent {
    pub action: ClickAction,
    pub value: String,
}

/// Per-character coloring spread over all text below a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    /// Evenly spaced color stops, at least two.
    Gradient(Vec<TextColor>),
    /// Hue sweep. `phase` shifts the starting hue in whole characters.
    Rainbow { phase: u32, reversed: bool },
}

impl Fill {
    /// Color of character `index` out of `len` characters.
    pub fn color_at(&self, index: usize, len: usize) -> TextColor {
        match self {
            Fill::Gradient(stops) => {
                if stops.len() < 2 || len < 2 {
                    return stops.first().copied().unwrap_or(TextColor::Rgb(Rgb::new(255, 255, 255)));
                }
                let position = index as f32 / (len - 1) as f32;
                let segments = (stops.len() - 1) as f32;
                let scaled = position * segments;
                let segment = (scaled.floor() as usize).min(stops.len() - 2);
                let local = scaled - segment as f32;
                TextColor::Rgb(stops[segment].rgb().lerp(stops[segment + 1].rgb(), local))
            }
            Fill::Rainbow { phase, reversed } => {
                let len = len.max(1);
                let step = if *reversed { len - 1 - index.min(len - 1) } else { index };
                let hue = ((step + *phase as usize) % len) as f32 / len as f32;
                TextColor::Rgb(Rgb::from_hsv(hue, 1.0, 1.0))
            }
        }
    }
}

/// Style attached to a component. `None` means "inherit from the parent".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Style {
    pub color: Option<TextColor>,
    pub fill: Option<Fill>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underlined: Option<bool>,
    pub strikethrough: Option<bool>,
    pub obfuscated: Option<bool>,
    pub click: Option<ClickEvent>,
    pub hover: Option<Box<Component>>,
    pub insertion: Option<String>,
    pub font: Option<String>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color(mut self, color: impl Into<TextColor>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn decorated(mut self, decoration: Decoration, enabled: bool) -> Self {
        self.set_decoration(decoration, enabled);
        self
    }

    pub fn decoration(&self, decoration: Decoration) -> Option<bool> {
        match decoration {
            Decoration::Bold => self.bold,
            Decoration::Italic => self.italic,
            Decoration::Underlined => self.underlined,
            Decoration::Strikethrough => self.strikethrough,
            Decoration::Obfuscated => self.obfuscated,
        }
    }

    pub fn set_decoration(&mut self, decoration: Decoration, enabled: bool) {
        let slot = match decoration {
            Decoration::Bold => &mut self.bold,
            Decoration::Italic => &mut self.italic,
            Decoration::Underlined => &mut self.underlined,
            Decoration::Strikethrough => &mut self.strikethrough,
            Decoration::Obfuscated => &mut self.obfuscated,
        };
        *slot = Some(enabled);
    }

    /// True when the decoration is explicitly enabled.
    pub fn has(&self, decoration: Decoration) -> bool {
        self.decoration(decoration) == Some(true)
    }

    /// Whether this style carries click, hover or insertion behavior.
    pub fn is_interactive(&self) -> bool {
        self.click.is_some() || self.hover.is_some() || self.insertion.is_some()
    }

    /// Returns `self` with every unset property taken from `parent`.
    ///
    /// The fill is not inherited; fills are tracked separately while
    /// flattening so they can span several text nodes.
    pub fn inherit(&self, parent: &Style) -> Style {
        Style {
            color: self.color.or(parent.color),
            fill: None,
            bold: self.bold.or(parent.bold),
            italic: self.italic.or(parent.italic),
            underlined: self.underlined.or(parent.underlined),
            strikethrough: self.strikethrough.or(parent.strikethrough),
            obfuscated: self.obfuscated.or(parent.obfuscated),
            click: self.click.clone().or_else(|| parent.click.clone()),
            hover: self.hover.clone().or_else(|| parent.hover.clone()),
            insertion: self.insertion.clone().or_else(|| parent.insertion.clone()),
            font: self.font.clone().or_else(|| parent.font.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Style::default()
    }
}

/// A run of text with its fully resolved style.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

/// A node in the styled-text tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Component {
    text: String,
    style: Style,
    children: Vec<Component>,
}

impl Component {
    /// An empty component: no text, no style, no children.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A plain text leaf.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn append(mut self, child: Component) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: Component) {
        self.children.push(child);
    }

    pub(crate) fn pop_child(&mut self) -> Option<Component> {
        self.children.pop()
    }

    pub fn content(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    pub fn children(&self) -> &[Component] {
        &self.children
    }

    /// True when the node has no text anywhere below it.
    pub fn is_blank(&self) -> bool {
        self.text.is_empty() && self.children.iter().all(Component::is_blank)
    }

    /// Concatenated text content with all styling dropped.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in &self.children {
            child.collect_text(out);
        }
    }

    fn char_count(&self) -> usize {
        self.text.chars().count() + self.children.iter().map(Component::char_count).sum::<usize>()
    }

    /// Whether any node in the tree is clickable, hoverable or carries an
    /// insertion.
    pub fn is_interactive(&self) -> bool {
        self.style.is_interactive() || self.children.iter().any(Component::is_interactive)
    }

    /// Replaces every literal occurrence of `needle` with `replacement`.
    pub fn replace_literal(&self, needle: &str, replacement: &Component) -> Component {
        self.replace_literals(&[(needle, replacement)])
    }

    /// Replaces every literal occurrence of each needle with a copy of its
    /// replacement component.
    ///
    /// All needles are matched in a single pass and replacement content is
    /// never scanned again, so a replacement containing another needle is
    /// left untouched. A needle split across two nodes is not matched.
    /// Hover text is part of the tree and is substituted too.
    pub fn replace_literals(&self, replacements: &[(&str, &Component)]) -> Component {
        let mut children = Vec::with_capacity(self.children.len());
        let head = split_literals(&self.text, replacements, &mut children);
        children.extend(self.children.iter().map(|c| c.replace_literals(replacements)));

        let mut style = self.style.clone();
        if let Some(hover) = &self.style.hover {
            style.hover = Some(Box::new(hover.replace_literals(replacements)));
        }
        Component {
            text: head,
            style,
            children,
        }
    }

    /// Flattens the tree into runs of text with resolved styles.
    ///
    /// Adjacent runs with identical styles are merged. Fills become
    /// per-character colors; an explicit color set below a fill wins over it.
    pub fn spans(&self) -> Vec<Span> {
        let mut flattener = Flattener::default();
        flattener.walk(self, &Style::default());
        flattener.spans
    }
}

impl From<&str> for Component {
    fn from(text: &str) -> Self {
        Component::text(text)
    }
}

impl From<String> for Component {
    fn from(text: String) -> Self {
        Component::text(text)
    }
}

/// Splits `text` at the earliest needle match, pushing replacements and the
/// text between them onto `out`. Returns the text before the first match.
fn split_literals(text: &str, replacements: &[(&str, &Component)], out: &mut Vec<Component>) -> String {
    let mut head: Option<String> = None;
    let mut rest = text;

    loop {
        let found = replacements
            .iter()
            .filter(|(needle, _)| !needle.is_empty())
            .filter_map(|(needle, with)| rest.find(needle).map(|pos| (pos, *needle, *with)))
            .min_by_key(|(pos, _, _)| *pos);

        let Some((pos, needle, with)) = found else {
            break;
        };

        let before = &rest[..pos];
        match head {
            None => head = Some(before.to_string()),
            Some(_) if !before.is_empty() => out.push(Component::text(before)),
            Some(_) => {}
        }
        out.push(with.clone());
        rest = &rest[pos + needle.len()..];
    }

    match head {
        None => rest.to_string(),
        Some(head) => {
            if !rest.is_empty() {
                out.push(Component::text(rest));
            }
            head
        }
    }
}

struct FillCursor {
    fill: Fill,
    len: usize,
    index: usize,
}

#[derive(Default)]
struct Flattener {
    spans: Vec<Span>,
    fills: Vec<FillCursor>,
}

impl Flattener {
    fn walk(&mut self, node: &Component, parent: &Style) {
        let mut resolved = node.style.inherit(parent);
        let pushed_fill = if let Some(fill) = &node.style.fill {
            // The fill replaces colors inherited from above, but not colors
            // set on this node or below it.
            resolved.color = node.style.color;
            self.fills.push(FillCursor {
                fill: fill.clone(),
                len: node.char_count(),
                index: 0,
            });
            true
        } else {
            false
        };

        self.emit(&node.text, &resolved);
        for child in &node.children {
            self.walk(child, &resolved);
        }

        if pushed_fill {
            let done = self.fills.pop().map(|c| c.index).unwrap_or(0);
            // Keep the enclosing fill in step with the characters just emitted.
            if let Some(outer) = self.fills.last_mut() {
                outer.index += done;
            }
        }
    }

    fn emit(&mut self, text: &str, style: &Style) {
        if text.is_empty() {
            return;
        }
        let Some(cursor) = self.fills.last_mut() else {
            self.push(text, style.clone());
            return;
        };
        if style.color.is_some() {
            cursor.index += text.chars().count();
            self.push(text, style.clone());
            return;
        }
        let colors: Vec<TextColor> = text
            .chars()
            .map(|_| {
                let color = cursor.fill.color_at(cursor.index, cursor.len);
                cursor.index += 1;
                color
            })
            .collect();
        for (ch, color) in text.chars().zip(colors) {
            let mut colored = style.clone();
            colored.color = Some(color);
            let mut buf = [0u8; 4];
            self.push(ch.encode_utf8(&mut buf), colored);
        }
    }

    fn push(&mut self, text: &str, style: Style) {
        if let Some(last) = self.spans.last_mut() {
            if last.style == style {
                last.text.push_str(text);
                return;
            }
        }
        self.spans.push(Span {
            text: text.to_string(),
            style,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::NamedColor;

    fn red() -> Style {
        Style::new().color(NamedColor::Red)
    }

    mod tree {
        use super::*;

        #[test]
        fn plain_text_concatenates_in_order() {
            let tree = Component::text("a")
                .append(Component::text("b").append(Component::text("c")))
                .append(Component::text("d"));
            assert_eq!(tree.plain_text(), "abcd");
        }

        #[test]
        fn empty_is_blank() {
            assert!(Component::empty().is_blank());
            assert!(Component::empty().append(Component::empty()).is_blank());
            assert!(!Component::text("x").is_blank());
        }

        #[test]
        fn interactive_detected_in_children() {
            let mut hover = Style::new();
            hover.hover = Some(Box::new(Component::text("tip")));
            let tree = Component::text("a").append(Component::text("b").with_style(hover));
            assert!(tree.is_interactive());
            assert!(!Component::text("a").with_style(red()).is_interactive());
        }
    }

    mod replace {
        use super::*;

        #[test]
        fn replaces_single_needle() {
            let tree = Component::text("hi {name}!");
            let name = Component::text("Ann");
            let out = tree.replace_literal("{name}", &name);
            assert_eq!(out.plain_text(), "hi Ann!");
        }

        #[test]
        fn replaces_repeated_needles() {
            let tree = Component::text("{x}-{x}");
            let x = Component::text("7");
            assert_eq!(tree.replace_literals(&[("{x}", &x)]).plain_text(), "7-7");
        }

        #[test]
        fn replacement_content_is_not_rescanned() {
            let tree = Component::text("{a} {b}");
            let a = Component::text("{b}");
            let b = Component::text("B");
            let out = tree.replace_literals(&[("{a}", &a), ("{b}", &b)]);
            assert_eq!(out.plain_text(), "{b} B");
        }

        #[test]
        fn replacement_inherits_node_style() {
            let tree = Component::empty().append(Component::text("{n}").with_style(red()));
            let out = tree.replace_literals(&[("{n}", &Component::text("Ann"))]);
            let spans = out.spans();
            assert_eq!(spans.len(), 1);
            assert_eq!(spans[0].text, "Ann");
            assert_eq!(spans[0].style.color, Some(TextColor::Named(NamedColor::Red)));
        }

        #[test]
        fn text_without_needles_unchanged() {
            let tree = Component::text("nothing here").with_style(red());
            assert_eq!(tree.replace_literals(&[("{n}", &Component::text("x"))]), tree);
        }

        #[test]
        fn replaces_inside_hover() {
            let mut style = Style::new();
            style.hover = Some(Box::new(Component::text("Reply to {n}")));
            let tree = Component::text("{n}").with_style(style);

            let out = tree.replace_literal("{n}", &Component::text("Ann"));
            assert_eq!(out.plain_text(), "Ann");
            let hover = out.style().hover.as_ref().unwrap();
            assert_eq!(hover.plain_text(), "Reply to Ann");
        }
    }

    mod flatten {
        use super::*;

        #[test]
        fn merges_equal_styles() {
            let tree = Component::text("a")
                .with_style(red())
                .append(Component::text("b"))
                .append(Component::text("c").with_style(red()));
            let spans = tree.spans();
            assert_eq!(spans.len(), 1);
            assert_eq!(spans[0].text, "abc");
        }

        #[test]
        fn child_overrides_parent() {
            let tree = Component::empty()
                .with_style(red().decorated(Decoration::Bold, true))
                .append(Component::text("x").with_style(Style::new().decorated(Decoration::Bold, false)));
            let spans = tree.spans();
            assert_eq!(spans[0].style.bold, Some(false));
            assert_eq!(spans[0].style.color, Some(TextColor::Named(NamedColor::Red)));
        }

        #[test]
        fn gradient_spreads_over_children() {
            let mut style = Style::new();
            style.fill = Some(Fill::Gradient(vec![
                TextColor::Rgb(Rgb::new(0, 0, 0)),
                TextColor::Rgb(Rgb::new(255, 255, 255)),
            ]));
            let tree = Component::text("ab").with_style(style).append(Component::text("c"));
            let spans = tree.spans();
            assert_eq!(spans.len(), 3);
            assert_eq!(spans[0].style.color, Some(TextColor::Rgb(Rgb::new(0, 0, 0))));
            assert_eq!(spans[2].style.color, Some(TextColor::Rgb(Rgb::new(255, 255, 255))));
        }

        #[test]
        fn explicit_color_inside_fill_wins() {
            let mut style = Style::new();
            style.fill = Some(Fill::Rainbow {
                phase: 0,
                reversed: false,
            });
            let tree = Component::text("ab")
                .with_style(style)
                .append(Component::text("cd").with_style(red()));
            let spans = tree.spans();
            let last = spans.last().unwrap();
            assert_eq!(last.text, "cd");
            assert_eq!(last.style.color, Some(TextColor::Named(NamedColor::Red)));
        }

        #[test]
        fn fill_overrides_inherited_color() {
            let mut fill = Style::new();
            fill.fill = Some(Fill::Gradient(vec![
                TextColor::Rgb(Rgb::new(10, 10, 10)),
                TextColor::Rgb(Rgb::new(20, 20, 20)),
            ]));
            let tree = Component::empty()
                .with_style(red())
                .append(Component::text("xy").with_style(fill));
            let spans = tree.spans();
            assert_eq!(spans[0].style.color, Some(TextColor::Rgb(Rgb::new(10, 10, 10))));
        }
    }

    mod fills {
        use super::*;

        #[test]
        fn gradient_three_stops_hits_middle() {
            let fill = Fill::Gradient(vec![
                TextColor::Rgb(Rgb::new(0, 0, 0)),
                TextColor::Rgb(Rgb::new(100, 100, 100)),
                TextColor::Rgb(Rgb::new(200, 200, 200)),
            ]);
            assert_eq!(fill.color_at(2, 5), TextColor::Rgb(Rgb::new(100, 100, 100)));
            assert_eq!(fill.color_at(4, 5), TextColor::Rgb(Rgb::new(200, 200, 200)));
        }

        #[test]
        fn gradient_single_char_uses_first_stop() {
            let fill = Fill::Gradient(vec![
                TextColor::Named(NamedColor::Red),
                TextColor::Named(NamedColor::Blue),
            ]);
            assert_eq!(fill.color_at(0, 1), TextColor::Named(NamedColor::Red));
        }

        #[test]
        fn rainbow_starts_red() {
            let fill = Fill::Rainbow {
                phase: 0,
                reversed: false,
            };
            assert_eq!(fill.color_at(0, 6), TextColor::Rgb(Rgb::new(255, 0, 0)));
        }
    }
}
