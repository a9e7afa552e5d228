//! Tag-based chat markup.
//!
//! This crate turns markup like `<red>Hello <bold>world</bold></red>` into a
//! styled-text tree ([`Component`]) that can be flattened into spans,
//! rendered for a terminal, or serialized as text-component JSON.
//!
//! # Two Parsers
//!
//! Markup comes from two places with very different trust levels:
//!
//! - [`MarkupParser::trusted`]: administrator-written format templates. Every
//!   tag resolves, including `<click>`, `<hover>` and `<insert>`.
//! - [`MarkupParser::restricted`]: anything a player typed. Only styling tags
//!   resolve (colors, decorations, gradients, rainbow, reset). Everything else
//!   stays in the output as literal text, so a player can never make a message
//!   run a command or open a link.
//!
//! ```rust
//! use nebo_markup::MarkupParser;
//!
//! let msg = MarkupParser::restricted().parse("<gradient:red:blue>hi</gradient> <click:open_url:x>y");
//! assert_eq!(msg.plain_text(), "hi <click:open_url:x>y");
//! assert!(!msg.is_interactive());
//! ```
//!
//! # Tag Syntax
//!
//! | Tag | Effect |
//! |-----|--------|
//! | `<red>`, `<dark_aqua>`, `<#ff6b35>`, `<color:gold>` | text color |
//! | `<bold>` `<b>`, `<italic>` `<i>` `<em>`, `<underlined>` `<u>`, `<strikethrough>` `<st>`, `<obfuscated>` `<obf>` | decoration |
//! | `<!italic>`, `<italic:false>` | explicitly off |
//! | `<gradient:red:#00ff00:blue>` | per-character gradient |
//! | `<rainbow>`, `<rainbow:!2>` | hue sweep, `!` reverses, number shifts phase |
//! | `<reset>` | closes every open tag |
//! | `<click:run_command:/spawn>` | click action (trusted) |
//! | `<hover:show_text:'<red>tip'>` | hover text, itself markup (trusted) |
//! | `<insert:text>` | shift-click insertion (trusted) |
//! | `<newline>` `<br>`, `<font:key>` | structure (trusted) |
//!
//! Arguments containing `:` or `>` can be quoted with `'` or `"`. `\<`
//! writes a literal `<`.
//!
//! # Preprocessing
//!
//! Two text-to-text passes run before parsing where needed:
//!
//! - [`translate_legacy_codes`]: `&c` becomes `<red>`, `&#rrggbb` becomes
//!   `<#rrggbb>`
//! - [`expand_gradient_macros`]: `<pride:trans>` becomes a `<gradient>` in
//!   the flag's colors
//!
//! [`canonicalize`] runs both.
//!
//! # Placeholders
//!
//! [`Component::replace_literals`] swaps literal text like `{message}` for
//! an already-parsed component in a single pass. Substituted content is never
//! parsed again, which is what keeps a trusted template from lending its
//! privileges to the text spliced into it.

mod color;
mod component;
mod legacy;
mod macros;
mod output;
mod parser;
mod tags;
mod tokenizer;

pub use color::{NamedColor, Rgb, TextColor};
pub use component::{ClickAction, ClickEvent, Component, Decoration, Fill, Span, Style};
pub use legacy::{legacy_tag, translate_legacy_codes, LEGACY_CODES};
pub use macros::{
    canonicalize, expand_gradient_macros, gradient_macro, GradientMacro, DEFAULT_MACRO,
    GRADIENT_MACROS, MACRO_TAG,
};
pub use parser::{MarkupParser, ParseMode};
pub use tags::TagCategory;
