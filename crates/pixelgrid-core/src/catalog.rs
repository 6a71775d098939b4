#![forbid(unsafe_code)]

//! Preset catalog.
//!
//! The built-in catalog is assembled once per process from a static table
//! and shared read-only afterwards ([`Catalog::builtin`]). Custom catalogs can
//! be built up with [`Catalog::register`] before being handed to an engine;
//! once shared behind an `Arc` nothing can mutate them.
//!
//! # Invariants
//!
//! 1. Names are unique; registration order is preserved by [`Catalog::names`].
//! 2. [`Catalog::lookup`] never fails: unknown or absent names resolve to the
//!    catalog's `wave-lr`, or to the built-in `wave-lr` if the catalog has none.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::color::ColorToken;
use crate::options::AnimationSpec;
use crate::preset::{CELL_COUNT, Preset, PresetError};
#[cfg(feature = "serde")]
use crate::preset::PresetDef;

/// Name of the fallback preset.
pub const DEFAULT_PRESET: &str = "wave-lr";

// ---------------------------------------------------------------------------
// Built-in table
// ---------------------------------------------------------------------------

struct BuiltinPreset {
    name: &'static str,
    delays: [u64; CELL_COUNT],
    duration: u64,
    colors: Option<[&'static str; CELL_COUNT]>,
}

const fn plain(name: &'static str, delays: [u64; CELL_COUNT], duration: u64) -> BuiltinPreset {
    BuiltinPreset {
        name,
        delays,
        duration,
        colors: None,
    }
}

const fn tinted(
    name: &'static str,
    delays: [u64; CELL_COUNT],
    duration: u64,
    colors: [&'static str; CELL_COUNT],
) -> BuiltinPreset {
    BuiltinPreset {
        name,
        delays,
        duration,
        colors: Some(colors),
    }
}

#[rustfmt::skip]
const BUILTIN: [BuiltinPreset; 24] = [
    plain("wave-lr",       [0, 120, 240, 0, 120, 240, 0, 120, 240],    200),
    plain("wave-rl",       [240, 120, 0, 240, 120, 0, 240, 120, 0],    200),
    plain("wave-tb",       [0, 0, 0, 120, 120, 120, 240, 240, 240],    200),
    plain("wave-bt",       [240, 240, 240, 120, 120, 120, 0, 0, 0],    200),
    plain("spiral-cw",     [0, 80, 160, 560, 640, 240, 480, 400, 320], 180),
    plain("corners-first", [0, 200, 0, 200, 400, 200, 0, 200, 0],      200),
    plain("center-out",    [240, 120, 240, 120, 0, 120, 240, 120, 240], 200),
    plain("diagonal-tl",   [0, 100, 200, 100, 200, 300, 200, 300, 400], 180),
    plain("snake",         [0, 80, 160, 400, 320, 240, 480, 560, 640], 160),
    plain("cross",         [300, 0, 300, 0, 0, 0, 300, 0, 300],        250),
    plain("checkerboard",  [0, 250, 0, 250, 0, 250, 0, 250, 0],        220),
    plain("rain",          [0, 180, 60, 120, 300, 240, 360, 80, 420],  170),
    plain("pinwheel",      [0, 160, 480, 320, 640, 160, 480, 320, 0],  150),
    plain("orbit",         [0, 80, 160, 480, 640, 240, 400, 320, 560], 120),
    plain("converge",      [0, 160, 80, 240, 320, 240, 80, 160, 0],    260),
    plain("zigzag",        [0, 160, 320, 400, 240, 80, 480, 560, 640], 140),
    // Multi-color
    tinted("aurora",     [0, 100, 200, 100, 200, 300, 200, 300, 400], 220,
           ["cyan", "cyan", "teal", "teal", "blue", "blue", "purple", "purple", "magenta"]),
    tinted("ember",      [0, 80, 160, 560, 640, 240, 480, 400, 320],  180,
           ["yellow", "orange", "orange", "orange", "red", "red", "red", "magenta", "magenta"]),
    tinted("prism",      [0, 80, 160, 240, 320, 400, 480, 560, 640],  160,
           ["red", "orange", "yellow", "green", "cyan", "blue", "purple", "magenta", "pink"]),
    tinted("neon-cross", [300, 0, 300, 0, 0, 0, 300, 0, 300],         250,
           ["magenta", "cyan", "magenta", "cyan", "white", "cyan", "magenta", "cyan", "magenta"]),
    tinted("tide",       [0, 0, 0, 120, 120, 120, 240, 240, 240],     200,
           ["teal", "cyan", "teal", "blue", "teal", "blue", "purple", "blue", "purple"]),
    tinted("sunset",     [240, 240, 240, 120, 120, 120, 0, 0, 0],     200,
           ["purple", "blue", "purple", "magenta", "red", "magenta", "orange", "yellow", "orange"]),
    tinted("toxic",      [0, 200, 0, 200, 400, 200, 0, 200, 0],       200,
           ["lime", "green", "lime", "green", "yellow", "green", "lime", "green", "lime"]),
    tinted("frost",      [240, 120, 240, 120, 0, 120, 240, 120, 240], 200,
           ["blue", "cyan", "blue", "cyan", "white", "cyan", "blue", "cyan", "blue"]),
];

impl BuiltinPreset {
    fn to_preset(&self) -> Preset {
        let colors = match self.colors {
            Some(names) => names.map(ColorToken::parse),
            None => Default::default(),
        };
        Preset::from_parts(
            self.name.to_string(),
            self.delays.map(Duration::from_millis),
            Duration::from_millis(self.duration),
            colors,
            None,
        )
    }
}

static BUILTIN_CATALOG: OnceLock<Arc<Catalog>> = OnceLock::new();

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Ordered, name-indexed collection of presets.
#[derive(Debug, Clone)]
pub struct Catalog {
    presets: Vec<Arc<Preset>>,
    index: HashMap<String, usize>,
    fallback: Arc<Preset>,
}

impl Catalog {
    /// The process-wide built-in catalog.
    #[must_use]
    pub fn builtin() -> &'static Catalog {
        Self::shared()
    }

    /// Shared handle to the built-in catalog.
    #[must_use]
    pub fn shared() -> &'static Arc<Catalog> {
        BUILTIN_CATALOG.get_or_init(|| {
            let presets: Vec<Arc<Preset>> =
                BUILTIN.iter().map(|b| Arc::new(b.to_preset())).collect();
            let index = presets
                .iter()
                .enumerate()
                .map(|(i, p)| (p.name().to_string(), i))
                .collect();
            let fallback = Arc::clone(&presets[0]);
            Arc::new(Self {
                presets,
                index,
                fallback,
            })
        })
    }

    /// A catalog with no presets. Lookups fall back to the built-in `wave-lr`.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            presets: Vec::new(),
            index: HashMap::new(),
            fallback: Arc::clone(&Self::builtin().fallback),
        }
    }

    /// Add a preset. Names must be unique within the catalog.
    pub fn register(&mut self, preset: Preset) -> Result<Arc<Preset>, PresetError> {
        if self.index.contains_key(preset.name()) {
            return Err(PresetError::DuplicateName(preset.name().to_string()));
        }
        let preset = Arc::new(preset);
        self.index
            .insert(preset.name().to_string(), self.presets.len());
        self.presets.push(Arc::clone(&preset));
        crate::debug!(preset = preset.name(), "registered preset");
        Ok(preset)
    }

    /// Exact lookup; `None` for unknown names.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<Preset>> {
        self.index.get(name).map(|&i| &self.presets[i])
    }

    /// Lookup with fallback to the default preset.
    #[must_use]
    pub fn lookup(&self, name: Option<&str>) -> &Arc<Preset> {
        name.and_then(|n| self.get(n))
            .or_else(|| self.get(DEFAULT_PRESET))
            .unwrap_or(&self.fallback)
    }

    /// Resolve a name or an ad hoc preset.
    #[must_use]
    pub fn resolve(&self, spec: &AnimationSpec) -> Arc<Preset> {
        match spec {
            AnimationSpec::Named(name) => Arc::clone(self.lookup(Some(name))),
            AnimationSpec::Preset(preset) => Arc::clone(preset),
        }
    }

    /// The preset used for unknown names.
    #[must_use]
    pub fn default_preset(&self) -> &Arc<Preset> {
        self.lookup(None)
    }

    /// Names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.presets.iter().map(|p| p.name()).collect()
    }

    /// Presets in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Preset>> {
        self.presets.iter()
    }

    /// Number of presets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Whether the catalog has no presets of its own.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

// ---------------------------------------------------------------------------
// JSON loading
// ---------------------------------------------------------------------------

/// Failure while loading a catalog from JSON.
#[cfg(feature = "serde")]
#[derive(Debug)]
pub enum CatalogError {
    /// The document was not a JSON array of preset objects.
    Parse(serde_json::Error),
    /// Entry `index` failed validation.
    Preset { index: usize, error: PresetError },
}

#[cfg(feature = "serde")]
impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid catalog JSON: {err}"),
            Self::Preset { index, error } => write!(f, "catalog entry {index}: {error}"),
        }
    }
}

#[cfg(feature = "serde")]
impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Preset { error, .. } => Some(error),
        }
    }
}

#[cfg(feature = "serde")]
impl Catalog {
    /// Parse a JSON array of presets into a catalog of its own.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let mut catalog = Self::empty();
        catalog.extend_from_json(json)?;
        Ok(catalog)
    }

    /// Register every preset in a JSON array.
    ///
    /// All or nothing: on the first bad entry the catalog is left exactly as
    /// it was.
    pub fn extend_from_json(&mut self, json: &str) -> Result<usize, CatalogError> {
        let entries: Vec<serde_json::Value> =
            serde_json::from_str(json).map_err(CatalogError::Parse)?;
        let count = entries.len();
        let mut staged = self.clone();
        for (index, entry) in entries.into_iter().enumerate() {
            let def: PresetDef = serde_json::from_value(entry).map_err(|err| {
                crate::warn!(index, error = %err, "rejected catalog entry");
                CatalogError::Parse(err)
            })?;
            Preset::try_from(def)
                .and_then(|preset| staged.register(preset))
                .map_err(|error| {
                    crate::warn!(index, %error, "rejected catalog entry");
                    CatalogError::Preset { index, error }
                })?;
        }
        *self = staged;
        Ok(count)
    }
}
