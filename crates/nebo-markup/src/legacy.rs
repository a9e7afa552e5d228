//! Translation of `&`-prefixed legacy color codes into markup tags.
//!
//! Players have typed `&c` for red for a very long time. When legacy mixing
//! is on, those codes are rewritten into the tag syntax before parsing, so
//! the parser only ever sees one syntax.
//!
//! ```rust
//! use nebo_markup::translate_legacy_codes;
//!
//! assert_eq!(translate_legacy_codes("&cHello &lWorld"), "<red>Hello <bold>World");
//! assert_eq!(translate_legacy_codes("&#FF6B35x"), "<#FF6B35>x");
//! assert_eq!(translate_legacy_codes("fish & chips"), "fish & chips");
//! ```

/// The closed set of single-character legacy codes and their tags.
pub const LEGACY_CODES: &[(char, &str)] = &[
    ('0', "<black>"),
    ('1', "<dark_blue>"),
    ('2', "<dark_green>"),
    ('3', "<dark_aqua>"),
    ('4', "<dark_red>"),
    ('5', "<dark_purple>"),
    ('6', "<gold>"),
    ('7', "<gray>"),
    ('8', "<dark_gray>"),
    ('9', "<blue>"),
    ('a', "<green>"),
    ('b', "<aqua>"),
    ('c', "<red>"),
    ('d', "<light_purple>"),
    ('e', "<yellow>"),
    ('f', "<white>"),
    ('l', "<bold>"),
    ('o', "<italic>"),
    ('n', "<underlined>"),
    ('m', "<strikethrough>"),
    ('k', "<obfuscated>"),
    ('r', "<reset>"),
];

/// Tag for a single legacy code character. Codes are lowercase only.
pub fn legacy_tag(code: char) -> Option<&'static str> {
    LEGACY_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, tag)| *tag)
}

/// Rewrites legacy codes in `text` into markup tags.
///
/// `&#RRGGBB` (hex digits in either case) becomes `<#RRGGBB>`, and each of
/// the codes in [`LEGACY_CODES`] becomes its tag. Any other `&` sequence is
/// left alone. The text is scanned once, so the output of one replacement is
/// never read as the start of another.
pub fn translate_legacy_codes(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 2);
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];

        if let Some(hex) = hex_color(after) {
            out.push_str("<#");
            out.push_str(hex);
            out.push('>');
            rest = &after[1 + hex.len()..];
            continue;
        }

        match after.chars().next().and_then(|c| legacy_tag(c).map(|tag| (c, tag))) {
            Some((code, tag)) => {
                out.push_str(tag);
                rest = &after[code.len_utf8()..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Matches `#` plus six hex digits at the start of `s`, returning the digits.
fn hex_color(s: &str) -> Option<&str> {
    let digits = s.strip_prefix('#')?.get(..6)?;
    digits
        .bytes()
        .all(|b| b.is_ascii_hexdigit())
        .then_some(digits)
}
