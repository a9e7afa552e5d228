//! Color values for chat markup.
//!
//! Supports the formats accepted inside color and gradient tags:
//!
//! - Named colors: the 16 chat colors (`red`, `dark_aqua`, `gold`, ...)
//! - `grey` / `dark_grey` as aliases of `gray` / `dark_gray`
//! - RGB hex: `#ff6b35` (6 digits, either case)
//!
//! # Example
//!
//! ```rust
//! use nebo_markup::{NamedColor, Rgb, TextColor};
//!
//! assert_eq!(TextColor::parse("gold"), Ok(TextColor::Named(NamedColor::Gold)));
//! assert_eq!(TextColor::parse("#FF6B35"), Ok(TextColor::Rgb(Rgb::new(255, 107, 53))));
//! assert!(TextColor::parse("mauve").is_err());
//! ```

use std::fmt;

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation between two colors, `t` clamped to `0.0..=1.0`.
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Converts an HSV triple (all components in `0.0..=1.0`) to RGB.
    pub fn from_hsv(h: f32, s: f32, v: f32) -> Rgb {
        let h = h.rem_euclid(1.0) * 6.0;
        let sector = h.floor();
        let f = h - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));
        let (r, g, b) = match sector as u8 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        let to_u8 = |c: f32| (c * 255.0).round() as u8;
        Rgb::new(to_u8(r), to_u8(g), to_u8(b))
    }

    /// Closest index in the xterm 256-color palette.
    ///
    /// ```rust
    /// use nebo_markup::Rgb;
    ///
    /// // Pure green maps to ANSI 46
    /// assert_eq!(Rgb::new(0, 255, 0).to_ansi256(), 46);
    /// ```
    pub fn to_ansi256(self) -> u8 {
        let Rgb { r, g, b } = self;
        if r == g && g == b {
            if r < 8 {
                16
            } else if r > 248 {
                231
            } else {
                232 + ((r as u16 - 8) * 24 / 247) as u8
            }
        } else {
            let red = (r as u16 * 5 / 255) as u8;
            let green = (g as u16 * 5 / 255) as u8;
            let blue = (b as u16 * 5 / 255) as u8;
            16 + 36 * red + 6 * green + blue
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// The 16 named chat colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedColor {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
}

impl NamedColor {
    /// All named colors, in legacy code order (`0`-`9`, `a`-`f`).
    pub const ALL: [NamedColor; 16] = [
        NamedColor::Black,
        NamedColor::DarkBlue,
        NamedColor::DarkGreen,
        NamedColor::DarkAqua,
        NamedColor::DarkRed,
        NamedColor::DarkPurple,
        NamedColor::Gold,
        NamedColor::Gray,
        NamedColor::DarkGray,
        NamedColor::Blue,
        NamedColor::Green,
        NamedColor::Aqua,
        NamedColor::Red,
        NamedColor::LightPurple,
        NamedColor::Yellow,
        NamedColor::White,
    ];

    /// Canonical tag name.
    pub fn name(self) -> &'static str {
        match self {
            NamedColor::Black => "black",
            NamedColor::DarkBlue => "dark_blue",
            NamedColor::DarkGreen => "dark_green",
            NamedColor::DarkAqua => "dark_aqua",
            NamedColor::DarkRed => "dark_red",
            NamedColor::DarkPurple => "dark_purple",
            NamedColor::Gold => "gold",
            NamedColor::Gray => "gray",
            NamedColor::DarkGray => "dark_gray",
            NamedColor::Blue => "blue",
            NamedColor::Green => "green",
            NamedColor::Aqua => "aqua",
            NamedColor::Red => "red",
            NamedColor::LightPurple => "light_purple",
            NamedColor::Yellow => "yellow",
            NamedColor::White => "white",
        }
    }

    /// Looks up a color by tag name. Case-insensitive, accepts `grey` spellings.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        let name = match name.as_str() {
            "grey" => "gray",
            "dark_grey" => "dark_gray",
            other => other,
        };
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// RGB value used by chat clients for this color.
    pub fn rgb(self) -> Rgb {
        match self {
            NamedColor::Black => Rgb::new(0x00, 0x00, 0x00),
            NamedColor::DarkBlue => Rgb::new(0x00, 0x00, 0xaa),
            NamedColor::DarkGreen => Rgb::new(0x00, 0xaa, 0x00),
            NamedColor::DarkAqua => Rgb::new(0x00, 0xaa, 0xaa),
            NamedColor::DarkRed => Rgb::new(0xaa, 0x00, 0x00),
            NamedColor::DarkPurple => Rgb::new(0xaa, 0x00, 0xaa),
            NamedColor::Gold => Rgb::new(0xff, 0xaa, 0x00),
            NamedColor::Gray => Rgb::new(0xaa, 0xaa, 0xaa),
            NamedColor::DarkGray => Rgb::new(0x55, 0x55, 0x55),
            NamedColor::Blue => Rgb::new(0x55, 0x55, 0xff),
            NamedColor::Green => Rgb::new(0x55, 0xff, 0x55),
            NamedColor::Aqua => Rgb::new(0x55, 0xff, 0xff),
            NamedColor::Red => Rgb::new(0xff, 0x55, 0x55),
            NamedColor::LightPurple => Rgb::new(0xff, 0x55, 0xff),
            NamedColor::Yellow => Rgb::new(0xff, 0xff, 0x55),
            NamedColor::White => Rgb::new(0xff, 0xff, 0xff),
        }
    }

    /// 256-color palette index for terminal preview. The dark half maps onto
    /// the basic ANSI colors, the bright half onto indices 8-15.
    pub fn ansi256(self) -> u8 {
        match self {
            NamedColor::Black => 0,
            NamedColor::DarkRed => 1,
            NamedColor::DarkGreen => 2,
            NamedColor::Gold => 3,
            NamedColor::DarkBlue => 4,
            NamedColor::DarkPurple => 5,
            NamedColor::DarkAqua => 6,
            NamedColor::Gray => 7,
            NamedColor::DarkGray => 8,
            NamedColor::Red => 9,
            NamedColor::Green => 10,
            NamedColor::Yellow => 11,
            NamedColor::Blue => 12,
            NamedColor::LightPurple => 13,
            NamedColor::Aqua => 14,
            NamedColor::White => 15,
        }
    }
}

/// A color attached to styled text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextColor {
    Named(NamedColor),
    Rgb(Rgb),
}

impl TextColor {
    /// Parses a color from tag argument syntax.
    ///
    /// Supports:
    /// - Named colors: `red`, `dark_aqua`, `grey`, ...
    /// - Hex codes: `#ff6b35`
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();

        if let Some(hex) = s.strip_prefix('#') {
            return Self::parse_hex(hex);
        }

        NamedColor::from_name(s)
            .map(TextColor::Named)
            .ok_or_else(|| format!("Unknown color name: {}", s))
    }

    /// Parses a hex color code (without the # prefix).
    fn parse_hex(hex: &str) -> Result<Self, String> {
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(format!("Invalid hex color: #{} (must be 6 digits)", hex));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| format!("Invalid hex: {}", hex))
        };
        Ok(TextColor::Rgb(Rgb::new(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
        )))
    }

    pub fn rgb(self) -> Rgb {
        match self {
            TextColor::Named(named) => named.rgb(),
            TextColor::Rgb(rgb) => rgb,
        }
    }

    /// Color as written in text-component JSON: the name for named colors,
    /// `#rrggbb` otherwise.
    pub fn serialized(self) -> String {
        match self {
            TextColor::Named(named) => named.name().to_string(),
            TextColor::Rgb(rgb) => rgb.to_string(),
        }
    }

    pub(crate) fn to_console(self) -> console::Color {
        match self {
            TextColor::Named(named) => console::Color::Color256(named.ansi256()),
            TextColor::Rgb(rgb) => console::Color::Color256(rgb.to_ansi256()),
        }
    }
}

impl From<NamedColor> for TextColor {
    fn from(color: NamedColor) -> Self {
        TextColor::Named(color)
    }
}

impl From<Rgb> for TextColor {
    fn from(rgb: Rgb) -> Self {
        TextColor::Rgb(rgb)
    }
}
