#![forbid(unsafe_code)]

//! Options accepted when creating an instance.
//!
//! ```ignore
//! use pixelgrid_core::{Bloom, CreateOptions};
//!
//! let opts = CreateOptions::new()
//!     .animation("cross")
//!     .bloom(Bloom::Amount(4.0))
//!     .autoplay(false);
//! ```
//!
//! With the `serde` feature the same options deserialize from
//! `{ "animation": "cross", "autoplay": false, "bloom": 4 }`, where
//! `animation` may also be an inline preset object and `bloom` a boolean.

use std::sync::Arc;

use crate::catalog::DEFAULT_PRESET;
use crate::glow::DEFAULT_GLOW_AMOUNT;
use crate::preset::Preset;

// ---------------------------------------------------------------------------
// AnimationSpec
// ---------------------------------------------------------------------------

/// A preset chosen by catalog name, or supplied directly.
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationSpec {
    /// Catalog name; unknown names fall back to the default preset.
    Named(String),
    /// Caller-defined preset, used as-is.
    Preset(Arc<Preset>),
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::Named(DEFAULT_PRESET.to_string())
    }
}

impl From<&str> for AnimationSpec {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for AnimationSpec {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<Preset> for AnimationSpec {
    fn from(preset: Preset) -> Self {
        Self::Preset(Arc::new(preset))
    }
}

impl From<Arc<Preset>> for AnimationSpec {
    fn from(preset: Arc<Preset>) -> Self {
        Self::Preset(preset)
    }
}

// ---------------------------------------------------------------------------
// Bloom
// ---------------------------------------------------------------------------

/// Requested glow state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Bloom {
    /// No glow.
    #[default]
    Off,
    /// Glow at [`DEFAULT_GLOW_AMOUNT`].
    Default,
    /// Glow at a specific blur radius.
    Amount(f32),
}

impl Bloom {
    /// Effective intensity, or `None` when this request disables glow.
    ///
    /// Zero, negative, and non-finite amounts disable glow.
    #[must_use]
    pub fn amount(self) -> Option<f32> {
        match self {
            Self::Off => None,
            Self::Default => Some(DEFAULT_GLOW_AMOUNT),
            Self::Amount(amount) if amount.is_finite() && amount > 0.0 => Some(amount),
            Self::Amount(_) => None,
        }
    }

    /// Whether this request enables glow.
    #[must_use]
    pub fn is_enabled(self) -> bool {
        self.amount().is_some()
    }
}

impl From<bool> for Bloom {
    fn from(enabled: bool) -> Self {
        if enabled { Self::Default } else { Self::Off }
    }
}

impl From<f32> for Bloom {
    fn from(amount: f32) -> Self {
        Self::Amount(amount)
    }
}

// ---------------------------------------------------------------------------
// CreateOptions
// ---------------------------------------------------------------------------

/// Options for creating an instance.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateOptions {
    /// Initial preset. Defaults to `wave-lr`.
    pub animation: AnimationSpec,
    /// Start playing immediately. Defaults to `true`.
    pub autoplay: bool,
    /// Initial glow. Defaults to off.
    pub bloom: Bloom,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            animation: AnimationSpec::default(),
            autoplay: true,
            bloom: Bloom::Off,
        }
    }
}

impl CreateOptions {
    /// Defaults: `wave-lr`, autoplay, no glow.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial preset (builder pattern).
    #[must_use]
    pub fn animation(mut self, animation: impl Into<AnimationSpec>) -> Self {
        self.animation = animation.into();
        self
    }

    /// Set autoplay (builder pattern).
    #[must_use]
    pub fn autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    /// Set the initial glow (builder pattern).
    #[must_use]
    pub fn bloom(mut self, bloom: impl Into<Bloom>) -> Self {
        self.bloom = bloom.into();
        self
    }
}

// ---------------------------------------------------------------------------
// Serde
// ---------------------------------------------------------------------------

#[cfg(feature = "serde")]
mod serde_impl {
    use super::{AnimationSpec, Bloom, CreateOptions, Preset};
    use serde::{Deserialize, Deserializer};
    use std::sync::Arc;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum AnimationRepr {
        Named(String),
        Preset(Preset),
    }

    impl<'de> Deserialize<'de> for AnimationSpec {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            Ok(match AnimationRepr::deserialize(deserializer)? {
                AnimationRepr::Named(name) => Self::Named(name),
                AnimationRepr::Preset(preset) => Self::Preset(Arc::new(preset)),
            })
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BloomRepr {
        Flag(bool),
        Amount(f32),
    }

    impl<'de> Deserialize<'de> for Bloom {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            Ok(match BloomRepr::deserialize(deserializer)? {
                BloomRepr::Flag(flag) => Self::from(flag),
                BloomRepr::Amount(amount) => Self::Amount(amount),
            })
        }
    }

    #[derive(Deserialize)]
    #[serde(default)]
    struct OptionsRepr {
        animation: AnimationSpec,
        autoplay: bool,
        bloom: Bloom,
    }

    impl Default for OptionsRepr {
        fn default() -> Self {
            let defaults = CreateOptions::default();
            Self {
                animation: defaults.animation,
                autoplay: defaults.autoplay,
                bloom: defaults.bloom,
            }
        }
    }

    impl<'de> Deserialize<'de> for CreateOptions {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let repr = OptionsRepr::deserialize(deserializer)?;
            Ok(Self {
                animation: repr.animation,
                autoplay: repr.autoplay,
                bloom: repr.bloom,
            })
        }
    }
}
