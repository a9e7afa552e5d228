//! Tag vocabulary: which names exist, what they do, and which category
//! each belongs to for allowlisting.

use crate::color::{NamedColor, Rgb, TextColor};
use crate::component::{ClickAction, ClickEvent, Decoration, Fill};
use crate::tokenizer::TagToken;

/// Allowlist unit. A parser configuration lists the categories it resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagCategory {
    /// Named colors, `<#rrggbb>`, `<color:...>`.
    Color,
    /// Bold, italic, underlined, strikethrough, obfuscated.
    Decoration,
    Gradient,
    Rainbow,
    Reset,
    /// `<click:action:value>`
    Click,
    /// `<hover:show_text:'...'>`
    Hover,
    /// `<insert:text>`
    Insertion,
    /// `<newline>` / `<br>`
    Newline,
    /// `<font:key>`
    Font,
}

impl TagCategory {
    /// Categories that change only how text looks.
    pub const STYLING: &'static [TagCategory] = &[
        TagCategory::Color,
        TagCategory::Decoration,
        TagCategory::Gradient,
        TagCategory::Rainbow,
        TagCategory::Reset,
    ];

    /// Every category.
    pub const ALL: &'static [TagCategory] = &[
        TagCategory::Color,
        TagCategory::Decoration,
        TagCategory::Gradient,
        TagCategory::Rainbow,
        TagCategory::Reset,
        TagCategory::Click,
        TagCategory::Hover,
        TagCategory::Insertion,
        TagCategory::Newline,
        TagCategory::Font,
    ];

    /// Whether tags of this category make text clickable or hoverable.
    pub fn is_interactive(self) -> bool {
        matches!(
            self,
            TagCategory::Click | TagCategory::Hover | TagCategory::Insertion
        )
    }
}

/// A resolved tag.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Tag {
    Color(TextColor),
    Decoration(Decoration, bool),
    Fill(Fill),
    Reset,
    Click(ClickEvent),
    /// Raw hover markup, parsed by the caller with the same parser.
    Hover(String),
    Insertion(String),
    Font(String),
    Newline,
}

impl Tag {
    /// Resolves a tag token. `None` for unknown names and bad arguments.
    pub fn resolve(token: &TagToken<'_>) -> Option<Tag> {
        let name = token.name.as_str();
        let args = token.args.as_slice();

        if let Some(decoration) = Decoration::from_name(name) {
            let enabled = match (token.negated, args) {
                (negated, []) => !negated,
                (false, [value]) if value.eq_ignore_ascii_case("true") => true,
                (false, [value]) if value.eq_ignore_ascii_case("false") => false,
                _ => return None,
            };
            return Some(Tag::Decoration(decoration, enabled));
        }

        if token.negated {
            return None;
        }

        if name.starts_with('#') || NamedColor::from_name(name).is_some() {
            return match args {
                [] => TextColor::parse(name).ok().map(Tag::Color),
                _ => None,
            };
        }

        match (name, args) {
            ("color" | "colour" | "c", [value]) => TextColor::parse(value).ok().map(Tag::Color),
            ("gradient", []) => Some(Tag::Fill(Fill::Gradient(vec![
                TextColor::Rgb(Rgb::new(255, 255, 255)),
                TextColor::Rgb(Rgb::new(0, 0, 0)),
            ]))),
            ("gradient", [_]) => None,
            ("gradient", stops) => stops
                .iter()
                .map(|s| TextColor::parse(s))
                .collect::<Result<Vec<_>, _>>()
                .ok()
                .map(|stops| Tag::Fill(Fill::Gradient(stops))),
            ("rainbow", []) => Some(Tag::Fill(Fill::Rainbow {
                phase: 0,
                reversed: false,
            })),
            ("rainbow", [arg]) => {
                let (reversed, phase) = match arg.strip_prefix('!') {
                    Some(rest) => (true, rest),
                    None => (false, arg.as_str()),
                };
                let phase = if phase.is_empty() {
                    0
                } else {
                    phase.parse().ok()?
                };
                Some(Tag::Fill(Fill::Rainbow { phase, reversed }))
            }
            ("reset", []) => Some(Tag::Reset),
            ("click", [action, value]) => ClickAction::from_name(&action.to_ascii_lowercase())
                .map(|action| {
                    Tag::Click(ClickEvent {
                        action,
                        value: value.clone(),
                    })
                }),
            ("hover", [action, text]) if action.eq_ignore_ascii_case("show_text") => {
                Some(Tag::Hover(text.clone()))
            }
            ("insert" | "insertion", [text]) => Some(Tag::Insertion(text.clone())),
            ("font", [key]) if !key.is_empty() => Some(Tag::Font(key.clone())),
            ("newline" | "br", []) => Some(Tag::Newline),
            _ => None,
        }
    }

    pub fn category(&self) -> TagCategory {
        match self {
            Tag::Color(_) => TagCategory::Color,
            Tag::Decoration(..) => TagCategory::Decoration,
            Tag::Fill(Fill::Gradient(_)) => TagCategory::Gradient,
            Tag::Fill(Fill::Rainbow { .. }) => TagCategory::Rainbow,
            Tag::Reset => TagCategory::Reset,
            Tag::Click(_) => TagCategory::Click,
            Tag::Hover(_) => TagCategory::Hover,
            Tag::Insertion(_) => TagCategory::Insertion,
            Tag::Newline => TagCategory::Newline,
            Tag::Font(_) => TagCategory::Font,
        }
    }

    /// Name shared by every spelling of this tag, used to match closing tags
    /// written with a generic name (`</color>` closing `<c:red>`).
    pub fn close_key(&self) -> &'static str {
        match self {
            Tag::Color(_) => "color",
            Tag::Decoration(decoration, _) => decoration.name(),
            Tag::Fill(Fill::Gradient(_)) => "gradient",
            Tag::Fill(Fill::Rainbow { .. }) => "rainbow",
            Tag::Reset => "reset",
            Tag::Click(_) => "click",
            Tag::Hover(_) => "hover",
            Tag::Insertion(_) => "insertion",
            Tag::Newline => "newline",
            Tag::Font(_) => "font",
        }
    }
}

/// Maps a closing tag name onto the close key it may match generically.
///
/// Specific color names (`</red>`) only close a tag opened with the same
/// name, so they have no generic key.
pub(crate) fn generic_close_key(name: &str) -> Option<&'static str> {
    if let Some(decoration) = Decoration::from_name(name) {
        return Some(decoration.name());
    }
    match name {
        "color" | "colour" | "c" => Some("color"),
        "gradient" => Some("gradient"),
        "rainbow" => Some("rainbow"),
        "click" => Some("click"),
        "hover" => Some("hover"),
        "insert" | "insertion" => Some("insertion"),
        "font" => Some("font"),
        _ => None,
    }
}
