#![forbid(unsafe_code)]

//! PixelGrid public facade crate.
//!
//! One namespaced entry point for hosts: the [`PixelGrid`] engine, creation
//! options, the built-in preset catalog, and a prelude.
//!
//! ```ignore
//! use std::time::Duration;
//! use pixelgrid::prelude::*;
//!
//! let mut grids: PixelGrid<MemorySurface> = PixelGrid::new();
//! let id = grids.create(MemorySurface::new(), CreateOptions::new().animation("cross").bloom(4.0_f32));
//! grids.advance(Duration::from_millis(300));
//! assert_eq!(grids.get_instance(id).map(|i| i.config().name()), Some("cross"));
//! grids.destroy_all();
//! ```

use std::fmt;
use std::sync::Arc;

// --- Core re-exports -------------------------------------------------------

pub use pixelgrid_core::{
    AnimationSpec, Bloom, CELL_COUNT, CYCLE_GAP, Catalog, CellMask, ColorToken, CreateOptions,
    DEFAULT_GLOW_AMOUNT, DEFAULT_PRESET, GlowFilter, GlowState, GlowStore, HexColor, InstanceId,
    MemorySurface, NamedColor, NodeId, Preset, PresetBuilder, PresetError, Rgb, Rgba, Surface,
};

#[cfg(feature = "serde")]
pub use pixelgrid_core::CatalogError;

// --- Runtime re-exports ----------------------------------------------------

pub use pixelgrid_runtime::{
    Clock, Engine, EngineConfig, Instance, InstanceMut, ManualClock, Marker, MarkerSource,
    MonotonicClock, Phase, Scheduler, TimerAction, TimerHandle, TimerQueue, TimerToken,
};

/// Engine on the built-in deterministic timer queue.
pub type PixelGrid<S> = Engine<S, TimerQueue>;

// --- Catalog access --------------------------------------------------------

/// The built-in preset catalog.
#[must_use]
pub fn catalog() -> &'static Catalog {
    Catalog::builtin()
}

/// Built-in preset names in registration order.
#[must_use]
pub fn animation_names() -> Vec<&'static str> {
    Catalog::builtin().names()
}

/// A built-in preset by name, without fallback.
#[must_use]
pub fn animation(name: &str) -> Option<&'static Arc<Preset>> {
    Catalog::builtin().get(name)
}

/// Load a custom catalog from a JSON file holding an array of presets.
#[cfg(feature = "serde")]
pub fn load_catalog(path: impl AsRef<std::path::Path>) -> Result<Catalog> {
    let json = std::fs::read_to_string(path)?;
    Ok(Catalog::from_json(&json)?)
}

// --- Errors ---------------------------------------------------------------

/// Top-level error type for PixelGrid hosts.
#[derive(Debug)]
pub enum Error {
    /// A preset failed validation.
    Preset(PresetError),
    /// A custom catalog could not be loaded.
    #[cfg(feature = "serde")]
    Catalog(CatalogError),
    /// I/O failure while reading configuration.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preset(err) => write!(f, "invalid preset: {err}"),
            #[cfg(feature = "serde")]
            Self::Catalog(err) => write!(f, "invalid catalog: {err}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Preset(err) => Some(err),
            #[cfg(feature = "serde")]
            Self::Catalog(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<PresetError> for Error {
    fn from(err: PresetError) -> Self {
        Self::Preset(err)
    }
}

#[cfg(feature = "serde")]
impl From<CatalogError> for Error {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Standard result type for PixelGrid APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        AnimationSpec, Bloom, Catalog, Clock, CreateOptions, EngineConfig, Error, InstanceId,
        Marker, MemorySurface, MonotonicClock, PixelGrid, Preset, Result, Surface,
    };

    pub use crate::{core, runtime};
}

pub use pixelgrid_core as core;
pub use pixelgrid_runtime as runtime;
