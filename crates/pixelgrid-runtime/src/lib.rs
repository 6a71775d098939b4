#![forbid(unsafe_code)]

//! Choreography engine for PixelGrid.
//!
//! The runtime turns presets into timed cell changes. It is single-threaded
//! and never blocks: all progress comes from timers the host delivers, either
//! by pumping the built-in [`TimerQueue`] or by calling
//! [`Engine::dispatch`] from its own scheduler.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use pixelgrid_core::{CreateOptions, MemorySurface};
//! use pixelgrid_runtime::{Engine, EngineConfig};
//!
//! let mut engine = Engine::with_config(EngineConfig::default());
//! let id = engine.create(MemorySurface::new(), CreateOptions::new().animation("cross"));
//! engine.advance(Duration::from_millis(100));
//! ```

pub mod clock;
pub mod engine;
pub mod instance;
pub mod markers;
pub mod timer;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use engine::{Engine, EngineConfig, InstanceMut};
pub use instance::{Instance, Phase};
pub use markers::{
    ANIMATION_ATTRIBUTE, BLOOM_ATTRIBUTE, ENABLE_ATTRIBUTE, Marker, MarkerSource,
    parse_bloom_attribute,
};
pub use timer::{Fired, Scheduler, TimerAction, TimerHandle, TimerQueue, TimerToken};
