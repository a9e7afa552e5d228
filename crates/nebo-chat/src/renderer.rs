//! The render pipeline.
//!
//! One render turns (display name, raw message, permissions) into a styled
//! tree:
//!
//! 1. Resolve the template against one registry snapshot.
//! 2. Parse the message with the restricted parser. With legacy mixing on,
//!    legacy codes and gradient macros are canonicalized first; with it off,
//!    `&c` stays literal text.
//! 3. Run the optional placeholder hook over the raw template text, then
//!    canonicalize it and parse it with the trusted parser.
//! 4. Swap `{display_name}` for a plain text node and `{message}` for the
//!    parsed message, in one pass over the template tree.
//!
//! Substituted content is never parsed again. A player typing
//! `{display_name}` or `<click:...>` gets exactly that text back.

use std::fmt;
use std::sync::Arc;

use nebo_markup::{canonicalize, Component, MarkupParser};

use crate::format::{FormatTemplate, DISPLAY_NAME_PLACEHOLDER, MESSAGE_PLACEHOLDER};
use crate::permission::Permissions;
use crate::registry::{FormatRegistry, FormatSnapshot};

/// Third-party placeholder substitution over the raw template text.
///
/// Runs before markup parsing. The host plugs in whatever `%token%` style
/// expansion it has; without one, template text is used as is.
pub trait PlaceholderExpander: Send + Sync {
    fn expand(&self, display_name: &str, template: &str) -> String;
}

impl<F> PlaceholderExpander for F
where
    F: Fn(&str, &str) -> String + Send + Sync,
{
    fn expand(&self, display_name: &str, template: &str) -> String {
        self(display_name, template)
    }
}

/// Display name used when the console sends a message.
pub const CONSOLE_NAME: &str = "Console";

/// Renders chat messages against a [`FormatRegistry`].
#[derive(Clone)]
pub struct TemplateRenderer {
    registry: Arc<FormatRegistry>,
    placeholders: Option<Arc<dyn PlaceholderExpander>>,
}

impl TemplateRenderer {
    pub fn new(registry: Arc<FormatRegistry>) -> Self {
        Self {
            registry,
            placeholders: None,
        }
    }

    pub fn with_placeholders(mut self, expander: Arc<dyn PlaceholderExpander>) -> Self {
        self.placeholders = Some(expander);
        self
    }

    pub fn registry(&self) -> &Arc<FormatRegistry> {
        &self.registry
    }

    /// Renders one message.
    ///
    /// An absent message renders as an empty `{message}`.
    pub fn render(
        &self,
        display_name: &str,
        raw_message: Option<&str>,
        perms: &dyn Permissions,
        legacy_mixing: bool,
    ) -> Component {
        let snapshot = self.registry.snapshot();
        render_snapshot(
            &snapshot,
            self.placeholders.as_deref(),
            Some(display_name),
            raw_message,
            perms,
            legacy_mixing,
        )
    }

    /// Renders a message sent by the console.
    ///
    /// The display name is [`CONSOLE_NAME`] and the placeholder hook is
    /// skipped, since there is no player to expand placeholders for.
    pub fn render_console(
        &self,
        raw_message: Option<&str>,
        perms: &dyn Permissions,
        legacy_mixing: bool,
    ) -> Component {
        let snapshot = self.registry.snapshot();
        render_snapshot(&snapshot, None, None, raw_message, perms, legacy_mixing)
    }

    /// Substitutes an already-parsed message into `template`.
    pub fn render_template(
        &self,
        template: &FormatTemplate,
        display_name: &str,
        message: &Component,
    ) -> Component {
        fill_template(template, self.placeholders.as_deref(), display_name, message)
    }
}

impl fmt::Debug for TemplateRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateRenderer")
            .field("registry", &self.registry)
            .field("placeholders", &self.placeholders.is_some())
            .finish()
    }
}

/// Runs the whole pipeline against one template snapshot.
///
/// A `display_name` of `None` renders as the console, which skips the hook.
pub(crate) fn render_snapshot(
    snapshot: &FormatSnapshot,
    placeholders: Option<&dyn PlaceholderExpander>,
    display_name: Option<&str>,
    raw_message: Option<&str>,
    perms: &dyn Permissions,
    legacy_mixing: bool,
) -> Component {
    let template = snapshot.resolve(perms);
    let message = parse_message(raw_message, legacy_mixing);
    match display_name {
        Some(name) => fill_template(&template, placeholders, name, &message),
        None => substitute(template.text(), CONSOLE_NAME, &message),
    }
}

fn fill_template(
    template: &FormatTemplate,
    placeholders: Option<&dyn PlaceholderExpander>,
    display_name: &str,
    message: &Component,
) -> Component {
    match placeholders {
        Some(expander) => substitute(
            &expander.expand(display_name, template.text()),
            display_name,
            message,
        ),
        None => substitute(template.text(), display_name, message),
    }
}

/// Parses trusted template text and fills in both placeholders.
fn substitute(template_text: &str, display_name: &str, message: &Component) -> Component {
    let tree = MarkupParser::trusted().parse(&canonicalize(template_text));
    let name = Component::text(display_name);
    tree.replace_literals(&[
        (DISPLAY_NAME_PLACEHOLDER, &name),
        (MESSAGE_PLACEHOLDER, message),
    ])
}

/// Canonical markup of a player's message body, as the restricted parser
/// will see it.
pub fn message_markup(raw: &str, legacy_mixing: bool) -> String {
    if legacy_mixing {
        canonicalize(raw)
    } else {
        raw.to_string()
    }
}

/// Parses a player's message body. Player text is always restricted.
pub fn parse_message(raw: Option<&str>, legacy_mixing: bool) -> Component {
    let parser = MarkupParser::restricted();
    match raw {
        None => Component::empty(),
        Some(raw) => parser.parse(&message_markup(raw, legacy_mixing)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebo_markup::{NamedColor, TextColor};

    fn renderer(templates: Vec<FormatTemplate>) -> TemplateRenderer {
        TemplateRenderer::new(Arc::new(FormatRegistry::new(templates)))
    }

    fn simple() -> TemplateRenderer {
        renderer(vec![FormatTemplate::new(
            "default",
            "<gray>{display_name}</gray>: {message}",
        )])
    }

    fn nobody(_: &str) -> bool {
        false
    }

    mod pipeline {
        use super::*;

        #[test]
        fn legacy_mixing_on() {
            let out = simple().render("Ann", Some("&cHi"), &nobody, true);
            assert_eq!(out.plain_text(), "Ann: Hi");
            let spans = out.spans();
            let hi = spans.iter().find(|s| s.text == "Hi").unwrap();
            assert_eq!(hi.style.color, Some(TextColor::Named(NamedColor::Red)));
            let ann = spans.iter().find(|s| s.text == "Ann").unwrap();
            assert_eq!(ann.style.color, Some(TextColor::Named(NamedColor::Gray)));
        }

        #[test]
        fn legacy_mixing_off_keeps_codes_literal() {
            let out = simple().render("Ann", Some("&cHi <pride>x"), &nobody, false);
            assert_eq!(out.plain_text(), "Ann: &cHi <pride>x");
        }

        #[test]
        fn absent_message_is_empty() {
            let out = simple().render("Ann", None, &nobody, true);
            assert_eq!(out.plain_text(), "Ann: ");
        }

        #[test]
        fn message_tags_restricted() {
            let out = simple().render("Ann", Some("<click:run_command:/op Ann>free op"), &nobody, true);
            assert!(!out.is_interactive());
            assert_eq!(out.plain_text(), "Ann: <click:run_command:/op Ann>free op");
        }

        #[test]
        fn template_tags_trusted() {
            let renderer = renderer(vec![FormatTemplate::new(
                "default",
                "<click:suggest_command:'/msg {display_name} '>{display_name}</click>: {message}",
            )]);
            let out = renderer.render("Ann", Some("hi"), &nobody, false);
            assert!(out.is_interactive());
            assert_eq!(out.plain_text(), "Ann: hi");
        }

        #[test]
        fn template_macros_expanded() {
            let renderer = renderer(vec![FormatTemplate::new(
                "default",
                "<pride>{display_name}</pride> {message}",
            )]);
            let out = renderer.render("Ann", Some("x"), &nobody, false);
            assert_eq!(out.plain_text(), "Ann x");
            assert!(out.spans()[0].style.color.is_some());
        }

        #[test]
        fn placeholders_in_message_not_expanded() {
            let out = simple().render("Ann", Some("{display_name} {message}"), &nobody, true);
            assert_eq!(out.plain_text(), "Ann: {display_name} {message}");
        }

        #[test]
        fn display_name_is_plain_text() {
            let out = simple().render("<red>Ann", Some("x"), &nobody, true);
            assert_eq!(out.plain_text(), "<red>Ann: x");
        }

        #[test]
        fn other_braces_pass_through() {
            let renderer = renderer(vec![FormatTemplate::new("default", "{world} {message}")]);
            assert_eq!(renderer.render("Ann", Some("x"), &nobody, false).plain_text(), "{world} x");
        }

        #[test]
        fn display_name_filled_inside_hover() {
            let renderer = renderer(vec![FormatTemplate::new(
                "default",
                "<hover:show_text:'Message {display_name}'>{display_name}</hover>: {message}",
            )]);
            let out = renderer.render("Ann", Some("hi"), &nobody, false);
            assert_eq!(out.plain_text(), "Ann: hi");
            let spans = out.spans();
            let hover = spans[0].style.hover.as_ref().unwrap();
            assert_eq!(hover.plain_text(), "Message Ann");
        }
    }

    mod markup {
        use super::*;

        #[test]
        fn legacy_codes_become_tags_when_mixing() {
            assert_eq!(message_markup("&cHi &lthere", true), "<red>Hi <bold>there");
            assert_eq!(message_markup("&cHi", false), "&cHi");
        }

        #[test]
        fn parse_message_reads_the_same_markup() {
            let raw = "&c<pride:bi>x</pride>";
            let direct = MarkupParser::restricted().parse(&message_markup(raw, true));
            assert_eq!(parse_message(Some(raw), true), direct);
        }
    }

    mod placeholder_hook {
        use super::*;

        #[test]
        fn hook_runs_on_template_only() {
            let expander = |name: &str, template: &str| template.replace("%player%", name);
            let renderer = renderer(vec![FormatTemplate::new("default", "%player% > {message}")])
                .with_placeholders(Arc::new(expander));
            let out = renderer.render("Ann", Some("%player%"), &nobody, false);
            assert_eq!(out.plain_text(), "Ann > %player%");
        }

        #[test]
        fn console_skips_hook() {
            let expander = |_: &str, template: &str| template.replace("%player%", "someone");
            let renderer = renderer(vec![FormatTemplate::new("default", "%player% {display_name}: {message}")])
                .with_placeholders(Arc::new(expander));
            let out = renderer.render_console(Some("hi"), &nobody, false);
            assert_eq!(out.plain_text(), "%player% Console: hi");
        }

        #[test]
        fn hook_output_is_trusted_markup() {
            let expander = |_: &str, template: &str| template.replace("%rank%", "<gold>[VIP]</gold>");
            let renderer = renderer(vec![FormatTemplate::new("default", "%rank% {message}")])
                .with_placeholders(Arc::new(expander));
            let out = renderer.render("Ann", Some("x"), &nobody, false);
            assert_eq!(out.plain_text(), "[VIP] x");
            assert_eq!(
                out.spans()[0].style.color,
                Some(TextColor::Named(NamedColor::Gold))
            );
        }
    }
}
