#![forbid(unsafe_code)]

//! Color tokens and their application to surfaces.
//!
//! A token is either one of the twelve named accents or an explicit hex
//! color (`#abc` or `#a1b2c3`, any case). Named tokens map to a style class;
//! hex tokens are expressed through three custom properties that fully
//! describe the element's on, off, and glow appearance.
//!
//! # Invariants
//!
//! 1. Applying a tint always clears every named class and all three derived
//!    properties first, so repeated preset swaps never leave residue.
//! 2. An absent token clears and applies nothing.
//! 3. Unrecognised strings never become tokens; callers see `None`.

use std::fmt;

use crate::surface::Surface;

/// Custom property holding the lit color.
pub const PROP_ON: &str = "--pixel-on";
/// Custom property holding the unlit color.
pub const PROP_OFF: &str = "--pixel-off";
/// Custom property holding the glow color.
pub const PROP_GLOW: &str = "--pixel-glow";

/// Share of the source color kept when darkening toward black for the off state.
pub const OFF_MIX_PERCENT: u8 = 25;
/// Share of the source color kept when fading toward transparent for the glow.
pub const GLOW_MIX_PERCENT: u8 = 60;

// ---------------------------------------------------------------------------
// Numeric colors
// ---------------------------------------------------------------------------

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Create an RGB color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Keep `percent`% of this color and fill the rest with black.
    #[must_use]
    pub fn toward_black(self, percent: u8) -> Self {
        let keep = u16::from(percent.min(100));
        let scale = |c: u8| ((u16::from(c) * keep + 50) / 100) as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }
}

/// RGB color with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    /// Color channels, not premultiplied.
    pub rgb: Rgb,
    /// Opacity, 0 transparent to 255 opaque.
    pub alpha: u8,
}

impl Rgba {
    /// `rgb` at `percent`% opacity.
    #[must_use]
    pub fn faded(rgb: Rgb, percent: u8) -> Self {
        Self {
            rgb,
            alpha: ((255 * u16::from(percent.min(100)) + 50) / 100) as u8,
        }
    }

    /// Source-over composite onto an opaque background.
    #[must_use]
    pub fn over(self, background: Rgb) -> Rgb {
        let a = u16::from(self.alpha);
        let mix = |fg: u8, bg: u8| {
            ((u16::from(fg) * a + u16::from(bg) * (255 - a) + 127) / 255) as u8
        };
        Rgb::new(
            mix(self.rgb.r, background.r),
            mix(self.rgb.g, background.g),
            mix(self.rgb.b, background.b),
        )
    }
}

// ---------------------------------------------------------------------------
// Named tokens
// ---------------------------------------------------------------------------

/// One of the pre-declared accent styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedColor {
    Cyan,
    Magenta,
    Yellow,
    Green,
    Orange,
    Blue,
    Red,
    Purple,
    White,
    Teal,
    Pink,
    Lime,
}

impl NamedColor {
    /// Every named token, in declaration order.
    pub const ALL: [NamedColor; 12] = [
        Self::Cyan,
        Self::Magenta,
        Self::Yellow,
        Self::Green,
        Self::Orange,
        Self::Blue,
        Self::Red,
        Self::Purple,
        Self::White,
        Self::Teal,
        Self::Pink,
        Self::Lime,
    ];

    /// Token spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cyan => "cyan",
            Self::Magenta => "magenta",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Orange => "orange",
            Self::Blue => "blue",
            Self::Red => "red",
            Self::Purple => "purple",
            Self::White => "white",
            Self::Teal => "teal",
            Self::Pink => "pink",
            Self::Lime => "lime",
        }
    }

    /// Look up a token by its exact spelling.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    /// Class applied to a container tinted with this color.
    #[must_use]
    pub const fn container_class(self) -> &'static str {
        match self {
            Self::Cyan => "pixel-grid--cyan",
            Self::Magenta => "pixel-grid--magenta",
            Self::Yellow => "pixel-grid--yellow",
            Self::Green => "pixel-grid--green",
            Self::Orange => "pixel-grid--orange",
            Self::Blue => "pixel-grid--blue",
            Self::Red => "pixel-grid--red",
            Self::Purple => "pixel-grid--purple",
            Self::White => "pixel-grid--white",
            Self::Teal => "pixel-grid--teal",
            Self::Pink => "pixel-grid--pink",
            Self::Lime => "pixel-grid--lime",
        }
    }

    /// Class applied to a single cell tinted with this color.
    #[must_use]
    pub const fn cell_class(self) -> &'static str {
        match self {
            Self::Cyan => "pixel-grid__cell--cyan",
            Self::Magenta => "pixel-grid__cell--magenta",
            Self::Yellow => "pixel-grid__cell--yellow",
            Self::Green => "pixel-grid__cell--green",
            Self::Orange => "pixel-grid__cell--orange",
            Self::Blue => "pixel-grid__cell--blue",
            Self::Red => "pixel-grid__cell--red",
            Self::Purple => "pixel-grid__cell--purple",
            Self::White => "pixel-grid__cell--white",
            Self::Teal => "pixel-grid__cell--teal",
            Self::Pink => "pixel-grid__cell--pink",
            Self::Lime => "pixel-grid__cell--lime",
        }
    }

    /// Palette value for hosts that paint pixels rather than classes.
    #[must_use]
    pub const fn rgb(self) -> Rgb {
        match self {
            Self::Cyan => Rgb::new(0, 229, 255),
            Self::Magenta => Rgb::new(255, 0, 200),
            Self::Yellow => Rgb::new(255, 221, 0),
            Self::Green => Rgb::new(0, 230, 118),
            Self::Orange => Rgb::new(255, 145, 0),
            Self::Blue => Rgb::new(41, 121, 255),
            Self::Red => Rgb::new(255, 23, 68),
            Self::Purple => Rgb::new(170, 0, 255),
            Self::White => Rgb::new(255, 255, 255),
            Self::Teal => Rgb::new(29, 233, 182),
            Self::Pink => Rgb::new(255, 64, 129),
            Self::Lime => Rgb::new(198, 255, 0),
        }
    }
}

impl fmt::Display for NamedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Hex tokens
// ---------------------------------------------------------------------------

/// An explicit `#rgb` / `#rrggbb` color, kept with its original spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HexColor {
    text: Box<str>,
    rgb: Rgb,
}

/// The three custom-property values derived from a hex color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedProperties {
    /// Value for [`PROP_ON`].
    pub on: String,
    /// Value for [`PROP_OFF`].
    pub off: String,
    /// Value for [`PROP_GLOW`].
    pub glow: String,
}

impl HexColor {
    /// Parse `#abc` or `#a1b2c3` (case-insensitive). Anything else is `None`.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('#')?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        let rgb = match digits.len() {
            3 => {
                let d = digits.as_bytes();
                let expand = |b: u8| {
                    let pair = [b, b];
                    std::str::from_utf8(&pair).ok().and_then(channel)
                };
                Rgb::new(expand(d[0])?, expand(d[1])?, expand(d[2])?)
            }
            6 => Rgb::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            ),
            _ => return None,
        };
        Some(Self {
            text: text.into(),
            rgb,
        })
    }

    /// The color exactly as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Numeric value.
    #[must_use]
    pub const fn rgb(&self) -> Rgb {
        self.rgb
    }

    /// Unlit color: the value blended toward black.
    #[must_use]
    pub fn off_rgb(&self) -> Rgb {
        self.rgb.toward_black(OFF_MIX_PERCENT)
    }

    /// Glow color: the value blended toward transparent.
    #[must_use]
    pub fn glow_rgba(&self) -> Rgba {
        Rgba::faded(self.rgb, GLOW_MIX_PERCENT)
    }

    /// Property values for [`PROP_ON`], [`PROP_OFF`], and [`PROP_GLOW`].
    #[must_use]
    pub fn derived(&self) -> DerivedProperties {
        DerivedProperties {
            on: self.text.to_string(),
            off: format!("color-mix(in oklch, {} {OFF_MIX_PERCENT}%, black)", self.text),
            glow: format!(
                "color-mix(in oklch, {} {GLOW_MIX_PERCENT}%, transparent)",
                self.text
            ),
        }
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// A resolved color token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColorToken {
    Named(NamedColor),
    Hex(HexColor),
}

impl ColorToken {
    /// Resolve a token string. Unknown names and malformed hex yield `None`.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        if text.starts_with('#') {
            return HexColor::parse(text).map(Self::Hex);
        }
        NamedColor::from_name(text).map(Self::Named)
    }

    /// Lit color as RGB.
    #[must_use]
    pub fn on_rgb(&self) -> Rgb {
        match self {
            Self::Named(named) => named.rgb(),
            Self::Hex(hex) => hex.rgb(),
        }
    }

    /// Unlit color as RGB.
    #[must_use]
    pub fn off_rgb(&self) -> Rgb {
        match self {
            Self::Named(named) => named.rgb().toward_black(OFF_MIX_PERCENT),
            Self::Hex(hex) => hex.off_rgb(),
        }
    }

    /// Glow color: the lit color blended toward transparent.
    #[must_use]
    pub fn glow_rgba(&self) -> Rgba {
        match self {
            Self::Named(named) => Rgba::faded(named.rgb(), GLOW_MIX_PERCENT),
            Self::Hex(hex) => hex.glow_rgba(),
        }
    }
}

impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(named) => named.fmt(f),
            Self::Hex(hex) => hex.fmt(f),
        }
    }
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

/// Which class family a tint uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TintScope {
    /// Instance-level accent on the container.
    Container,
    /// Per-cell override.
    Cell,
}

impl TintScope {
    fn class(self, color: NamedColor) -> &'static str {
        match self {
            Self::Container => color.container_class(),
            Self::Cell => color.cell_class(),
        }
    }
}

/// Remove every named class of `scope` and the three derived properties.
pub fn clear_tint<S: Surface>(surface: &mut S, node: &S::Node, scope: TintScope) {
    for color in NamedColor::ALL {
        surface.remove_class(node, scope.class(color));
    }
    surface.remove_property(node, PROP_ON);
    surface.remove_property(node, PROP_OFF);
    surface.remove_property(node, PROP_GLOW);
}

/// Clear any previous tint on `node`, then apply `token` if there is one.
pub fn apply_tint<S: Surface>(
    surface: &mut S,
    node: &S::Node,
    scope: TintScope,
    token: Option<&ColorToken>,
) {
    clear_tint(surface, node, scope);
    match token {
        None => {}
        Some(ColorToken::Named(color)) => surface.add_class(node, scope.class(*color)),
        Some(ColorToken::Hex(hex)) => {
            let derived = hex.derived();
            surface.set_property(node, PROP_ON, &derived.on);
            surface.set_property(node, PROP_OFF, &derived.off);
            surface.set_property(node, PROP_GLOW, &derived.glow);
        }
    }
}
