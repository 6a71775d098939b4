#![forbid(unsafe_code)]

//! Declarative initialization from marked containers.
//!
//! A marker is a container plus the attributes a host found on it. Any
//! container carrying [`ENABLE_ATTRIBUTE`] becomes a grid; the optional
//! [`ANIMATION_ATTRIBUTE`] and [`BLOOM_ATTRIBUTE`] choose the preset and
//! glow.
//!
//! | Attribute | Missing | Empty | Otherwise |
//! |-----------|---------|-------|-----------|
//! | `data-pixel-grid-animation` | `wave-lr` | `wave-lr` | preset name |
//! | `data-pixel-grid-bloom` | no glow | default glow | leading number, no glow if none |

use std::collections::BTreeMap;

use pixelgrid_core::{Bloom, CreateOptions};

/// Marks a container for initialization.
pub const ENABLE_ATTRIBUTE: &str = "data-pixel-grid";
/// Preset name.
pub const ANIMATION_ATTRIBUTE: &str = "data-pixel-grid-animation";
/// Glow request.
pub const BLOOM_ATTRIBUTE: &str = "data-pixel-grid-bloom";

/// A container and its attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker<S> {
    surface: S,
    attributes: BTreeMap<String, String>,
}

impl<S> Marker<S> {
    /// A container with no attributes.
    #[must_use]
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            attributes: BTreeMap::new(),
        }
    }

    /// A container carrying the enable attribute.
    #[must_use]
    pub fn enabled(surface: S) -> Self {
        Self::new(surface).with_attribute(ENABLE_ATTRIBUTE, "")
    }

    /// Add or replace an attribute (builder pattern).
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Attribute value, if present.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Whether the container asks to become a grid.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.attributes.contains_key(ENABLE_ATTRIBUTE)
    }

    /// Creation options described by the attributes. Always autoplays.
    #[must_use]
    pub fn options(&self) -> CreateOptions {
        let animation = self
            .attribute(ANIMATION_ATTRIBUTE)
            .filter(|name| !name.is_empty())
            .unwrap_or(pixelgrid_core::DEFAULT_PRESET);
        CreateOptions::new()
            .animation(animation)
            .bloom(parse_bloom_attribute(self.attribute(BLOOM_ATTRIBUTE)))
    }

    /// The container.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Give up the container.
    #[must_use]
    pub fn into_surface(self) -> S {
        self.surface
    }
}

/// Something that can find marked containers.
pub trait MarkerSource<S> {
    /// Take every enabled marker, in document order.
    fn discover(&mut self) -> Vec<Marker<S>>;
}

impl<S> MarkerSource<S> for Vec<Marker<S>> {
    /// Drain enabled markers, leaving the others in place.
    fn discover(&mut self) -> Vec<Marker<S>> {
        let (found, rest): (Vec<_>, Vec<_>) =
            std::mem::take(self).into_iter().partition(Marker::is_enabled);
        *self = rest;
        found
    }
}

// ---------------------------------------------------------------------------
// Attribute parsing
// ---------------------------------------------------------------------------

/// Interpret a bloom attribute value.
#[must_use]
pub fn parse_bloom_attribute(value: Option<&str>) -> Bloom {
    match value {
        None => Bloom::Off,
        Some("") => Bloom::Default,
        Some(text) => leading_number(text).map_or(Bloom::Off, Bloom::Amount),
    }
}

/// Parse the longest numeric prefix of `text`, ignoring leading whitespace.
///
/// `"4px"` reads as 4, `".5"` as 0.5, `"1e1x"` as 10. No digits means `None`.
fn leading_number(text: &str) -> Option<f32> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let rest = &text[end..];
    if rest.starts_with("Infinity") {
        return text[..end + "Infinity".len()].parse::<f32>().ok();
    }

    let digits = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };
    let int_digits = digits(end);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits(end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = digits(exp);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }
    text[..end].parse::<f32>().ok()
}
