#![forbid(unsafe_code)]

//! Core: presets, the built-in catalog, color tokens, glow effects, and the
//! rendering-surface contract.
//!
//! Nothing in this crate knows about time. The choreography engine in
//! `pixelgrid-runtime` drives these pieces from its timer callbacks.

pub mod catalog;
pub mod cells;
pub mod color;
pub mod glow;
pub mod id;
pub mod logging;
pub mod motion;
pub mod options;
pub mod preset;
pub mod surface;

pub use catalog::{Catalog, DEFAULT_PRESET};
pub use cells::CellMask;
pub use color::{ColorToken, HexColor, NamedColor, Rgb, Rgba};
pub use glow::{DEFAULT_GLOW_AMOUNT, GlowFilter, GlowState, GlowStore};
pub use id::InstanceId;
pub use options::{AnimationSpec, Bloom, CreateOptions};
pub use preset::{CELL_COUNT, CYCLE_GAP, Preset, PresetBuilder, PresetError};
pub use surface::Surface;
pub use surface::memory::{MemorySurface, NodeId};

#[cfg(feature = "serde")]
pub use catalog::CatalogError;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, trace, warn};
