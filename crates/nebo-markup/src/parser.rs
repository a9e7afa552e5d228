//! Markup parser in two fixed configurations.
//!
//! [`MarkupParser::trusted`] resolves the whole tag vocabulary, including
//! click, hover and insertion tags. It is meant for text written by server
//! administrators. [`MarkupParser::restricted`] resolves styling tags only
//! (color, decoration, gradient, rainbow, reset) and is the parser for
//! anything a player typed.
//!
//! Both configurations share one grammar. A tag the configuration does not
//! allow is kept as literal text, exactly like an unknown tag, so parsing
//! never fails.
//!
//! # Example
//!
//! ```rust
//! use nebo_markup::MarkupParser;
//!
//! let styled = MarkupParser::trusted().parse("<click:run_command:/spawn>Home</click>");
//! assert!(styled.is_interactive());
//!
//! let restricted = MarkupParser::restricted().parse("<click:run_command:/op me>Home</click>");
//! assert!(!restricted.is_interactive());
//! assert_eq!(restricted.plain_text(), "<click:run_command:/op me>Home</click>");
//! ```
//!
//! # Nesting Rules
//!
//! - An open tag without a matching close tag applies to the end of input.
//! - A close tag closes the innermost open tag it matches, and every tag
//!   opened inside it.
//! - A close tag that matches nothing open is literal text.
//! - `<reset>` closes everything that is open.

use crate::component::{Component, Style};
use crate::tags::{generic_close_key, Tag, TagCategory};
use crate::tokenizer::{Token, Tokenizer};

/// Which parser configuration to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseMode {
    /// Full vocabulary. Administrator-authored text only.
    Trusted,
    /// Styling vocabulary. Player-authored text.
    Restricted,
}

/// A parser bound to one tag allowlist.
#[derive(Debug)]
pub struct MarkupParser {
    mode: ParseMode,
    allowed: &'static [TagCategory],
}

static TRUSTED: MarkupParser = MarkupParser {
    mode: ParseMode::Trusted,
    allowed: TagCategory::ALL,
};

static RESTRICTED: MarkupParser = MarkupParser {
    mode: ParseMode::Restricted,
    allowed: TagCategory::STYLING,
};

impl MarkupParser {
    /// The full-vocabulary parser.
    pub fn trusted() -> &'static MarkupParser {
        &TRUSTED
    }

    /// The styling-only parser for untrusted input.
    pub fn restricted() -> &'static MarkupParser {
        &RESTRICTED
    }

    pub fn for_mode(mode: ParseMode) -> &'static MarkupParser {
        match mode {
            ParseMode::Trusted => Self::trusted(),
            ParseMode::Restricted => Self::restricted(),
        }
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    pub fn allows(&self, category: TagCategory) -> bool {
        self.allowed.contains(&category)
    }

    /// Parses `input` into a styled-text tree.
    pub fn parse(&self, input: &str) -> Component {
        let mut stack = vec![Frame::root()];

        for token in Tokenizer::new(input) {
            match token {
                Token::Text(text) => push_text(&mut stack, &text),
                Token::Open(tag) => match Tag::resolve(&tag).filter(|t| self.allows(t.category())) {
                    None => push_text(&mut stack, tag.raw),
                    Some(Tag::Reset) => collapse(&mut stack, 1),
                    Some(Tag::Newline) => push_text(&mut stack, "\n"),
                    Some(resolved) => {
                        let key = resolved.close_key();
                        let style = self.style_for(resolved);
                        stack.push(Frame {
                            name: tag.name,
                            key,
                            node: Component::empty().with_style(style),
                        });
                    }
                },
                Token::Close(tag) => {
                    let generic = generic_close_key(&tag.name);
                    let matched = stack
                        .iter()
                        .rposition(|frame| frame.closed_by(&tag.name, generic));
                    match matched {
                        Some(depth) if depth > 0 => collapse(&mut stack, depth),
                        _ => push_text(&mut stack, tag.raw),
                    }
                }
            }
        }

        collapse(&mut stack, 1);
        stack.pop().map(|frame| frame.node).unwrap_or_default()
    }

    /// Parses optional input; absent input is an empty tree.
    pub fn parse_opt(&self, input: Option<&str>) -> Component {
        input.map(|text| self.parse(text)).unwrap_or_default()
    }

    fn style_for(&self, tag: Tag) -> Style {
        let mut style = Style::new();
        match tag {
            Tag::Color(color) => style.color = Some(color),
            Tag::Decoration(decoration, enabled) => style.set_decoration(decoration, enabled),
            Tag::Fill(fill) => style.fill = Some(fill),
            Tag::Click(click) => style.click = Some(click),
            Tag::Hover(markup) => style.hover = Some(Box::new(self.parse(&markup))),
            Tag::Insertion(text) => style.insertion = Some(text),
            Tag::Font(font) => style.font = Some(font),
            Tag::Reset | Tag::Newline => {}
        }
        style
    }
}

struct Frame {
    /// Tag name as written (lowercased).
    name: String,
    /// Generic close key, empty for the root.
    key: &'static str,
    node: Component,
}

impl Frame {
    fn root() -> Self {
        Frame {
            name: String::new(),
            key: "",
            node: Component::empty(),
        }
    }

    fn closed_by(&self, name: &str, generic: Option<&'static str>) -> bool {
        !self.key.is_empty() && (self.name == name || generic == Some(self.key))
    }
}

/// Pops frames until `keep` remain, attaching each to its parent.
fn collapse(stack: &mut Vec<Frame>, keep: usize) {
    while stack.len() > keep.max(1) {
        let Some(frame) = stack.pop() else {
            break;
        };
        if let Some(parent) = stack.last_mut() {
            parent.node.push(frame.node);
        }
    }
}

fn push_text(stack: &mut [Frame], text: &str) {
    if text.is_empty() {
        return;
    }
    let Some(frame) = stack.last_mut() else {
        return;
    };
    if let Some(last) = frame.node.children().last() {
        if last.style().is_empty() && last.children().is_empty() {
            let merged = format!("{}{}", last.content(), text);
            frame.node.pop_child();
            frame.node.push(Component::text(merged));
            return;
        }
    }
    frame.node.push(Component::text(text));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{NamedColor, TextColor};
    use crate::component::Decoration;

    fn trusted(input: &str) -> Component {
        MarkupParser::trusted().parse(input)
    }

    fn restricted(input: &str) -> Component {
        MarkupParser::restricted().parse(input)
    }

    mod structure {
        use super::*;

        #[test]
        fn plain_text_unchanged() {
            assert_eq!(trusted("hello world").plain_text(), "hello world");
        }

        #[test]
        fn empty_input() {
            assert!(trusted("").is_blank());
            assert!(MarkupParser::restricted().parse_opt(None).is_blank());
        }

        #[test]
        fn tags_removed_from_text() {
            assert_eq!(trusted("<red>a</red><bold>b</bold>").plain_text(), "ab");
        }

        #[test]
        fn unclosed_tag_runs_to_end() {
            let spans = trusted("a<red>b").spans();
            assert_eq!(spans.len(), 2);
            assert_eq!(spans[1].text, "b");
            assert_eq!(spans[1].style.color, Some(TextColor::Named(NamedColor::Red)));
        }

        #[test]
        fn orphan_close_is_literal() {
            assert_eq!(trusted("hello</red>").plain_text(), "hello</red>");
        }

        #[test]
        fn outer_close_closes_inner() {
            let spans = trusted("<bold><red>a</bold>b").spans();
            assert_eq!(spans[0].text, "a");
            assert!(spans[0].style.has(Decoration::Bold));
            assert_eq!(spans[1].text, "b");
            assert_eq!(spans[1].style.color, None);
            assert_eq!(spans[1].style.bold, None);
        }

        #[test]
        fn generic_close_names() {
            let spans = trusted("<c:red>a</color>b").spans();
            assert_eq!(spans[1].text, "b");
            assert_eq!(spans[1].style.color, None);

            let spans = trusted("<b>a</bold>b").spans();
            assert_eq!(spans[1].style.bold, None);
        }

        #[test]
        fn specific_color_close_needs_same_name() {
            assert_eq!(trusted("<blue>a</red>").plain_text(), "a</red>");
        }

        #[test]
        fn reset_closes_everything() {
            let spans = trusted("<red><bold>a<reset>b").spans();
            assert_eq!(spans[1].text, "b");
            assert!(spans[1].style.is_empty());
        }

        #[test]
        fn unknown_tag_is_literal() {
            assert_eq!(trusted("<sparkle>hi</sparkle>").plain_text(), "<sparkle>hi</sparkle>");
        }

        #[test]
        fn newline_tag() {
            assert_eq!(trusted("a<br>b").plain_text(), "a\nb");
            assert_eq!(restricted("a<br>b").plain_text(), "a<br>b");
        }

        #[test]
        fn escaped_tag_is_text() {
            let tree = trusted("\\<red>x");
            assert_eq!(tree.plain_text(), "<red>x");
            assert_eq!(tree.spans()[0].style.color, None);
        }
    }

    mod trusted_mode {
        use super::*;

        #[test]
        fn click_resolves() {
            let spans = trusted("<click:suggest_command:'/msg Ann '>reply</click>").spans();
            let click = spans[0].style.click.as_ref().unwrap();
            assert_eq!(click.value, "/msg Ann ");
        }

        #[test]
        fn hover_is_parsed_markup() {
            let spans = trusted("<hover:show_text:'<red>tip'>x</hover>").spans();
            let hover = spans[0].style.hover.as_ref().unwrap();
            assert_eq!(hover.plain_text(), "tip");
            assert_eq!(
                hover.spans()[0].style.color,
                Some(TextColor::Named(NamedColor::Red))
            );
        }

        #[test]
        fn insertion_and_font() {
            let spans = trusted("<insert:hello><font:uniform>x").spans();
            assert_eq!(spans[0].style.insertion.as_deref(), Some("hello"));
            assert_eq!(spans[0].style.font.as_deref(), Some("uniform"));
        }
    }

    mod restricted_mode {
        use super::*;

        #[test]
        fn styling_allowed() {
            let spans = restricted("<red>a</red><gradient:red:blue>bc</gradient><rainbow>d").spans();
            assert_eq!(spans[0].style.color, Some(TextColor::Named(NamedColor::Red)));
            assert!(spans.iter().skip(1).all(|s| s.style.color.is_some()));
        }

        #[test]
        fn interactive_tags_literal() {
            for input in [
                "<click:open_url:'https://evil.example'>x</click>",
                "<hover:show_text:'boo'>x</hover>",
                "<insert:/op me>x</insert>",
            ] {
                let tree = restricted(input);
                assert!(!tree.is_interactive(), "{} produced interactive node", input);
                assert_eq!(tree.plain_text(), input);
            }
        }

        #[test]
        fn font_not_allowed() {
            assert_eq!(restricted("<font:alt>x").plain_text(), "<font:alt>x");
        }

        #[test]
        fn allowlist_queries() {
            let parser = MarkupParser::restricted();
            assert_eq!(parser.mode(), ParseMode::Restricted);
            assert!(parser.allows(TagCategory::Gradient));
            assert!(!parser.allows(TagCategory::Click));
            assert!(MarkupParser::for_mode(ParseMode::Trusted).allows(TagCategory::Hover));
        }
    }
}
