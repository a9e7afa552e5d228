//! Named gradient macros.
//!
//! `<pride>` and `<pride:FLAG>` are shorthands for multi-stop gradients in
//! the colors of a pride flag. They are expanded into plain `<gradient>`
//! tags before parsing, so the parser has no notion of macros.
//!
//! ```rust
//! use nebo_markup::expand_gradient_macros;
//!
//! assert_eq!(
//!     expand_gradient_macros("<pride:bi>hi</pride>"),
//!     "<gradient:#d60270:#9b4f96:#0038a8>hi</gradient>"
//! );
//! ```
//!
//! Unknown flag names and close tags without a matching expanded open tag
//! are left as they are. Expansion is idempotent.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::legacy::translate_legacy_codes;

/// Tag name that introduces a gradient macro.
pub const MACRO_TAG: &str = "pride";

/// Flag used by a bare `<pride>`.
pub const DEFAULT_MACRO: &str = "pride";

/// A named list of gradient stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradientMacro {
    pub name: &'static str,
    pub stops: &'static [&'static str],
}

impl GradientMacro {
    /// The `<gradient:...>` open tag this macro expands to.
    pub fn open_tag(&self) -> String {
        format!("<gradient:{}>", self.stops.join(":"))
    }
}

/// Every known flag.
pub const GRADIENT_MACROS: &[GradientMacro] = &[
    GradientMacro {
        name: "pride",
        stops: &["#e50000", "#ff8d00", "#ffee00", "#028121", "#004cff", "#770088"],
    },
    GradientMacro {
        name: "progress",
        stops: &[
            "#ffffff", "#ffafc7", "#73d7ee", "#613915", "#000000", "#e50000", "#ff8d00",
            "#ffee00", "#028121", "#004cff", "#770088",
        ],
    },
    GradientMacro {
        name: "trans",
        stops: &["#5bcffb", "#f5abb9", "#ffffff", "#f5abb9", "#5bcffb"],
    },
    GradientMacro {
        name: "bi",
        stops: &["#d60270", "#9b4f96", "#0038a8"],
    },
    GradientMacro {
        name: "pan",
        stops: &["#ff1c8d", "#ffd700", "#1ab3ff"],
    },
    GradientMacro {
        name: "nb",
        stops: &["#fcf431", "#fcfcfc", "#9d59d2", "#282828"],
    },
    GradientMacro {
        name: "lesbian",
        stops: &["#d62800", "#ff9b56", "#ffffff", "#d462a6", "#a40062"],
    },
    GradientMacro {
        name: "ace",
        stops: &["#000000", "#a4a4a4", "#ffffff", "#810081"],
    },
    GradientMacro {
        name: "agender",
        stops: &[
            "#000000", "#bababa", "#ffffff", "#baf484", "#ffffff", "#bababa", "#000000",
        ],
    },
    GradientMacro {
        name: "demisexual",
        stops: &["#000000", "#ffffff", "#6e0071", "#d3d3d3"],
    },
    GradientMacro {
        name: "genderqueer",
        stops: &["#b57fdd", "#ffffff", "#49821e"],
    },
    GradientMacro {
        name: "genderfluid",
        stops: &["#fe76a2", "#ffffff", "#bf12d7", "#000000", "#303cbe"],
    },
    GradientMacro {
        name: "intersex",
        stops: &["#ffd800", "#7902aa", "#ffd800"],
    },
    GradientMacro {
        name: "aro",
        stops: &["#3ba740", "#a8d47a", "#ffffff", "#ababab", "#000000"],
    },
    GradientMacro {
        name: "baker",
        stops: &[
            "#cd66ff", "#ff6599", "#fe0000", "#fe9900", "#ffff01", "#009900", "#0099cb",
            "#350099", "#990099",
        ],
    },
    GradientMacro {
        name: "philly",
        stops: &[
            "#000000", "#784f17", "#fe0000", "#fd8c00", "#ffe500", "#119f0b", "#0644b3",
            "#c22edc",
        ],
    },
    GradientMacro {
        name: "queer",
        stops: &[
            "#000000", "#9ad9eb", "#00a3e8", "#b5e51d", "#ffffff", "#ffc90d", "#fc6667",
            "#feaec9", "#000000",
        ],
    },
    GradientMacro {
        name: "gay",
        stops: &[
            "#078e70", "#26ceaa", "#98e8c1", "#ffffff", "#7bade2", "#5049cc", "#3d1a78",
        ],
    },
    GradientMacro {
        name: "bigender",
        stops: &[
            "#c479a0", "#eca6cb", "#d5c7e8", "#ffffff", "#d5c7e8", "#9ac7e8", "#6c83cf",
        ],
    },
    GradientMacro {
        name: "demigender",
        stops: &[
            "#7f7f7f", "#c3c3c3", "#fbff74", "#ffffff", "#fbff74", "#c3c3c3", "#7f7f7f",
        ],
    },
];

static BY_NAME: Lazy<HashMap<&'static str, &'static GradientMacro>> =
    Lazy::new(|| GRADIENT_MACROS.iter().map(|m| (m.name, m)).collect());

/// Looks up a flag by name, ignoring ASCII case.
pub fn gradient_macro(name: &str) -> Option<&'static GradientMacro> {
    BY_NAME.get(name.to_ascii_lowercase().as_str()).copied()
}

/// Expands `<pride>`, `<pride:FLAG>` and their close tags into gradients.
///
/// A close tag (`</pride>` or `</pride:FLAG>`) only becomes `</gradient>`
/// while an expanded open tag is pending; otherwise it stays literal.
pub fn expand_gradient_macros(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut open = 0usize;

    while let Some(lt) = rest.find('<') {
        out.push_str(&rest[..lt]);
        let candidate = &rest[lt..];

        match macro_tag(candidate) {
            Some(MacroTag::Open { len, flag }) => match gradient_macro(flag) {
                Some(found) => {
                    out.push_str(&found.open_tag());
                    open += 1;
                    rest = &candidate[len..];
                }
                None => {
                    out.push_str(&candidate[..len]);
                    rest = &candidate[len..];
                }
            },
            Some(MacroTag::Close { len }) => {
                if open > 0 {
                    out.push_str("</gradient>");
                    open -= 1;
                } else {
                    out.push_str(&candidate[..len]);
                }
                rest = &candidate[len..];
            }
            None => {
                out.push('<');
                rest = &candidate[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Legacy codes first, then macros: the form every trusted template and
/// mixed-mode message is reduced to before parsing.
pub fn canonicalize(text: &str) -> String {
    expand_gradient_macros(&translate_legacy_codes(text))
}

enum MacroTag<'a> {
    Open { len: usize, flag: &'a str },
    Close { len: usize },
}

/// Recognizes a macro tag at the start of `s` (which begins with `<`).
fn macro_tag(s: &str) -> Option<MacroTag<'_>> {
    let end = s.find('>')?;
    let inner = &s[1..end];
    if inner.contains('<') {
        return None;
    }
    let len = end + 1;

    let (closing, inner) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, inner),
    };
    let (name, arg) = match inner.split_once(':') {
        Some((name, arg)) => (name, Some(arg)),
        None => (inner, None),
    };
    if !name.eq_ignore_ascii_case(MACRO_TAG) {
        return None;
    }

    if closing {
        return Some(MacroTag::Close { len });
    }
    let flag = match arg {
        None => DEFAULT_MACRO,
        Some(flag) => flag.trim(),
    };
    Some(MacroTag::Open { len, flag })
}
