#![forbid(unsafe_code)]

//! Choreography presets.
//!
//! A [`Preset`] lists, for each of the nine cells, how long after a phase
//! starts that cell toggles, plus a uniform `duration` the grid holds after
//! the last toggle. Optional per-cell colors and an optional container
//! accent tint the grid.
//!
//! # Timing
//!
//! ```text
//! hold_time = max(delays) + duration        // fade-in phase length
//! end_time  = hold_time + CYCLE_GAP         // fade-out phase length
//! ```
//!
//! # Failure Modes
//!
//! Validation happens once, when a preset is built. A preset that exists is
//! always playable:
//! - empty name: [`PresetError::EmptyName`]
//! - delay list not exactly nine long: [`PresetError::DelayCount`]
//! - more than nine color entries: [`PresetError::ColorCount`]
//!
//! Unrecognised color strings are not errors; those cells stay untinted.

use std::fmt;
use std::time::Duration;

use crate::color::ColorToken;

/// Number of cells in a grid.
pub const CELL_COUNT: usize = 9;

/// Pause between the end of a fade-out and the next fade-in.
pub const CYCLE_GAP: Duration = Duration::from_millis(50);

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Rejection reasons for a preset definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresetError {
    /// The preset has no name.
    EmptyName,
    /// `delays` did not have exactly nine entries.
    DelayCount { found: usize },
    /// `colors` had more than nine entries.
    ColorCount { found: usize },
    /// A catalog already holds a preset with this name.
    DuplicateName(String),
}

impl fmt::Display for PresetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "preset name must not be empty"),
            Self::DelayCount { found } => {
                write!(f, "preset needs exactly {CELL_COUNT} delays, found {found}")
            }
            Self::ColorCount { found } => {
                write!(f, "preset allows at most {CELL_COUNT} colors, found {found}")
            }
            Self::DuplicateName(name) => write!(f, "preset {name:?} is already registered"),
        }
    }
}

impl std::error::Error for PresetError {}

// ---------------------------------------------------------------------------
// Preset
// ---------------------------------------------------------------------------

/// An immutable, named choreography.
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    name: String,
    delays: [Duration; CELL_COUNT],
    duration: Duration,
    colors: [Option<ColorToken>; CELL_COUNT],
    accent: Option<ColorToken>,
}

impl Preset {
    /// Start building a preset.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> PresetBuilder {
        PresetBuilder::new(name)
    }

    /// Build an untinted preset from millisecond timings.
    pub fn new(
        name: impl Into<String>,
        delays_ms: &[u64],
        duration_ms: u64,
    ) -> Result<Self, PresetError> {
        Self::builder(name)
            .delays(delays_ms.iter().copied())
            .duration_ms(duration_ms)
            .build()
    }

    /// Assemble from parts whose shape is already guaranteed by the types.
    pub(crate) fn from_parts(
        name: String,
        delays: [Duration; CELL_COUNT],
        duration: Duration,
        colors: [Option<ColorToken>; CELL_COUNT],
        accent: Option<ColorToken>,
    ) -> Self {
        Self {
            name,
            delays,
            duration,
            colors,
            accent,
        }
    }

    /// Unique name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Per-cell toggle offsets, index-aligned with the grid.
    #[must_use]
    pub fn delays(&self) -> &[Duration; CELL_COUNT] {
        &self.delays
    }

    /// Offset for cell `index`. Out-of-range indices read as zero.
    #[must_use]
    pub fn delay(&self, index: usize) -> Duration {
        self.delays.get(index).copied().unwrap_or(Duration::ZERO)
    }

    /// Hold time after the last toggle of a phase.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Per-cell tints; `None` means default appearance.
    #[must_use]
    pub fn colors(&self) -> &[Option<ColorToken>; CELL_COUNT] {
        &self.colors
    }

    /// Tint for cell `index`.
    #[must_use]
    pub fn cell_color(&self, index: usize) -> Option<&ColorToken> {
        self.colors.get(index).and_then(Option::as_ref)
    }

    /// Instance-level accent applied to the container.
    #[must_use]
    pub fn accent(&self) -> Option<&ColorToken> {
        self.accent.as_ref()
    }

    /// Whether any cell carries its own tint.
    #[must_use]
    pub fn is_multicolor(&self) -> bool {
        self.colors.iter().any(Option::is_some)
    }

    /// Latest cell offset.
    #[must_use]
    pub fn max_delay(&self) -> Duration {
        self.delays.iter().copied().max().unwrap_or(Duration::ZERO)
    }

    /// Length of the fade-in phase: `max(delays) + duration`.
    #[must_use]
    pub fn hold_time(&self) -> Duration {
        self.max_delay().saturating_add(self.duration)
    }

    /// Length of the fade-out phase: `hold_time + CYCLE_GAP`.
    #[must_use]
    pub fn end_time(&self) -> Duration {
        self.hold_time().saturating_add(CYCLE_GAP)
    }

    /// One full on/off cycle.
    #[must_use]
    pub fn cycle_time(&self) -> Duration {
        self.hold_time().saturating_add(self.end_time())
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Validating builder for [`Preset`].
#[derive(Debug, Clone, Default)]
pub struct PresetBuilder {
    name: String,
    delays: Vec<Duration>,
    duration: Duration,
    colors: Vec<Option<String>>,
    accent: Option<String>,
}

impl PresetBuilder {
    /// Builder for a preset called `name` with no delays yet.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Per-cell offsets in milliseconds.
    #[must_use]
    pub fn delays(mut self, delays_ms: impl IntoIterator<Item = u64>) -> Self {
        self.delays = delays_ms.into_iter().map(Duration::from_millis).collect();
        self
    }

    /// Hold time in milliseconds.
    #[must_use]
    pub fn duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration = Duration::from_millis(duration_ms);
        self
    }

    /// Sparse per-cell tints. `None` and empty strings leave a cell untinted.
    #[must_use]
    pub fn colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        self.colors = colors.into_iter().map(|c| c.map(Into::into)).collect();
        self
    }

    /// Container accent tint.
    #[must_use]
    pub fn accent(mut self, color: impl Into<String>) -> Self {
        self.accent = Some(color.into());
        self
    }

    /// Validate and produce the preset.
    pub fn build(self) -> Result<Preset, PresetError> {
        if self.name.trim().is_empty() {
            return Err(PresetError::EmptyName);
        }
        let delays: [Duration; CELL_COUNT] = self
            .delays
            .as_slice()
            .try_into()
            .map_err(|_| PresetError::DelayCount {
                found: self.delays.len(),
            })?;
        if self.colors.len() > CELL_COUNT {
            return Err(PresetError::ColorCount {
                found: self.colors.len(),
            });
        }
        let mut colors: [Option<ColorToken>; CELL_COUNT] = Default::default();
        for (slot, raw) in colors.iter_mut().zip(&self.colors) {
            *slot = raw.as_deref().and_then(ColorToken::parse);
        }
        let accent = self.accent.as_deref().and_then(ColorToken::parse);
        Ok(Preset::from_parts(
            self.name,
            delays,
            self.duration,
            colors,
            accent,
        ))
    }
}

// ---------------------------------------------------------------------------
// Serde
// ---------------------------------------------------------------------------

#[cfg(feature = "serde")]
pub(crate) use serde_impl::PresetDef;

#[cfg(feature = "serde")]
mod serde_impl {
    use super::{Preset, PresetBuilder, PresetError};
    use serde::Deserialize;

    /// Wire shape of a preset: `{ name, delays, duration, colors?, color? }`.
    #[derive(Deserialize)]
    pub(crate) struct PresetDef {
        name: String,
        delays: Vec<u64>,
        duration: u64,
        #[serde(default)]
        colors: Vec<Option<String>>,
        #[serde(default)]
        color: Option<String>,
    }

    impl TryFrom<PresetDef> for Preset {
        type Error = PresetError;

        fn try_from(def: PresetDef) -> Result<Self, Self::Error> {
            let mut builder = PresetBuilder::new(def.name)
                .delays(def.delays)
                .duration_ms(def.duration)
                .colors(def.colors);
            if let Some(color) = def.color {
                builder = builder.accent(color);
            }
            builder.build()
        }
    }

    impl<'de> Deserialize<'de> for Preset {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let def = PresetDef::deserialize(deserializer)?;
            Preset::try_from(def).map_err(serde::de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::NamedColor;

    const WAVE: [u64; 9] = [0, 120, 240, 0, 120, 240, 0, 120, 240];

    #[test]
    fn hold_and_end_time_follow_the_slowest_cell() {
        let preset = Preset::new("wave", &WAVE, 200).unwrap();
        assert_eq!(preset.max_delay(), Duration::from_millis(240));
        assert_eq!(preset.hold_time(), Duration::from_millis(440));
        assert_eq!(preset.end_time(), Duration::from_millis(490));
        assert_eq!(preset.cycle_time(), Duration::from_millis(930));
    }

    #[test]
    fn zero_duration_and_repeated_delays_are_fine() {
        let preset = Preset::new("flat", &[0; 9], 0).unwrap();
        assert_eq!(preset.hold_time(), Duration::ZERO);
        assert_eq!(preset.end_time(), CYCLE_GAP);
    }

    #[test]
    fn wrong_delay_count_is_rejected() {
        assert_eq!(
            Preset::new("short", &[0; 8], 100),
            Err(PresetError::DelayCount { found: 8 })
        );
        assert_eq!(
            Preset::new("long", &[0; 10], 100),
            Err(PresetError::DelayCount { found: 10 })
        );
    }

    #[test]
    fn blank_name_is_rejected() {
        assert_eq!(Preset::new("  ", &WAVE, 100), Err(PresetError::EmptyName));
    }

    #[test]
    fn too_many_colors_are_rejected() {
        let err = Preset::builder("rainbow")
            .delays(WAVE)
            .colors(std::iter::repeat_n(Some("red"), 10))
            .build();
        assert_eq!(err, Err(PresetError::ColorCount { found: 10 }));
    }

    #[test]
    fn sparse_colors_leave_trailing_cells_untinted() {
        let preset = Preset::builder("partial")
            .delays(WAVE)
            .duration_ms(100)
            .colors([Some("red"), None, Some(""), Some("nope"), Some("#0f0")])
            .build()
            .unwrap();
        assert_eq!(
            preset.cell_color(0),
            Some(&ColorToken::Named(NamedColor::Red))
        );
        assert_eq!(preset.cell_color(1), None);
        assert_eq!(preset.cell_color(2), None);
        assert_eq!(preset.cell_color(3), None);
        assert!(matches!(preset.cell_color(4), Some(ColorToken::Hex(_))));
        for i in 5..CELL_COUNT {
            assert_eq!(preset.cell_color(i), None);
        }
        assert!(preset.is_multicolor());
    }

    #[test]
    fn error_messages_name_the_problem() {
        let msg = PresetError::DelayCount { found: 3 }.to_string();
        assert!(msg.contains("exactly 9"), "{msg}");
        let msg = PresetError::DuplicateName("cross".into()).to_string();
        assert!(msg.contains("\"cross\""), "{msg}");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_and_validates() {
        let preset: Preset = serde_json::from_str(
            r##"{"name":"mine","delays":[0,1,2,3,4,5,6,7,8],"duration":10,"colors":["red",null],"color":"#abc"}"##,
        )
        .unwrap();
        assert_eq!(preset.name(), "mine");
        assert_eq!(preset.hold_time(), Duration::from_millis(18));
        assert!(matches!(preset.accent(), Some(ColorToken::Hex(_))));

        let bad = serde_json::from_str::<Preset>(r#"{"name":"x","delays":[0],"duration":1}"#);
        assert!(bad.is_err());
    }
}
