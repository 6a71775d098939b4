#![forbid(unsafe_code)]

//! PixelGrid terminal demo.
//!
//! Hosts one grid on an in-memory surface, pumps it from a monotonic clock,
//! and paints the surface with crossterm.

pub mod app;
pub mod cli;
pub mod render;
pub mod screen;
