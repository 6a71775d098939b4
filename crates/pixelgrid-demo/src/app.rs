#![forbid(unsafe_code)]

//! Demo state: one grid hosted on an in-memory surface, plus the controls
//! that drive it.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pixelgrid::{
    Bloom, Catalog, Clock, CreateOptions, EngineConfig, Instance, InstanceId, MemorySurface,
    PixelGrid,
};

use crate::cli::Opts;

/// A user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NextPreset,
    PrevPreset,
    TogglePlay,
    ToggleBloom,
    Quit,
}

impl Command {
    /// Map a key press to a command.
    #[must_use]
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Self::Quit),
            KeyCode::Char('q') | KeyCode::Esc => Some(Self::Quit),
            KeyCode::Char('n') | KeyCode::Right => Some(Self::NextPreset),
            KeyCode::Char('p') | KeyCode::Left => Some(Self::PrevPreset),
            KeyCode::Char(' ') => Some(Self::TogglePlay),
            KeyCode::Char('b') => Some(Self::ToggleBloom),
            _ => None,
        }
    }
}

/// Whether the event loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// The running demo.
#[derive(Debug)]
pub struct DemoApp {
    grids: PixelGrid<MemorySurface>,
    id: InstanceId,
    names: Vec<String>,
    current: usize,
    /// Glow used when toggling it back on.
    glow_on: Bloom,
    exit_after: Option<Duration>,
}

impl DemoApp {
    /// Build the demo with one grid on `catalog`.
    #[must_use]
    pub fn new(opts: &Opts, catalog: Arc<Catalog>, config: EngineConfig) -> Self {
        let names: Vec<String> = catalog.names().into_iter().map(str::to_string).collect();
        let current = names
            .iter()
            .position(|name| *name == opts.animation)
            .unwrap_or(0);
        let mut grids = PixelGrid::with_config(config).with_catalog(catalog);
        let animation = names
            .get(current)
            .cloned()
            .unwrap_or_else(|| opts.animation.clone());
        let id = grids.create(
            MemorySurface::new(),
            CreateOptions::new().animation(animation).bloom(opts.bloom),
        );
        tracing::info!(instance_id = id.get(), presets = names.len(), "demo started");
        Self {
            grids,
            id,
            names,
            current,
            glow_on: if opts.bloom.is_enabled() { opts.bloom } else { Bloom::Default },
            exit_after: (opts.exit_after_ms > 0).then(|| Duration::from_millis(opts.exit_after_ms)),
        }
    }

    /// Fire every timer due by the clock's current reading.
    pub fn tick<C: Clock>(&mut self, clock: &C) -> Control {
        self.grids.pump(clock);
        match self.exit_after {
            Some(limit) if clock.now_mono() >= limit => Control::Quit,
            _ => Control::Continue,
        }
    }

    /// How long the event loop may sleep before the next timer is due.
    #[must_use]
    pub fn next_wake(&self) -> Option<Duration> {
        self.grids
            .timers()
            .next_deadline()
            .map(|deadline| deadline.saturating_sub(self.grids.now()))
    }

    /// Apply a user command.
    pub fn apply(&mut self, command: Command) -> Control {
        match command {
            Command::Quit => return Control::Quit,
            Command::NextPreset => self.select(1),
            Command::PrevPreset => self.select(self.names.len().saturating_sub(1)),
            Command::TogglePlay => {
                if let Some(mut grid) = self.grids.instance_mut(self.id) {
                    if grid.is_running() {
                        grid.stop();
                    } else {
                        grid.play();
                    }
                }
            }
            Command::ToggleBloom => {
                let glow_on = self.glow_on;
                if let Some(mut grid) = self.grids.instance_mut(self.id) {
                    if grid.bloom().is_enabled() {
                        grid.set_bloom(Bloom::Off);
                    } else {
                        grid.set_bloom(glow_on);
                    }
                }
            }
        }
        Control::Continue
    }

    fn select(&mut self, step: usize) {
        if self.names.is_empty() {
            return;
        }
        self.current = (self.current + step) % self.names.len();
        let name = self.names[self.current].clone();
        if let Some(mut grid) = self.grids.instance_mut(self.id) {
            grid.set_animation(name);
        }
    }

    /// The demo's grid.
    #[must_use]
    pub fn instance(&self) -> Option<&Instance<MemorySurface>> {
        self.grids.get_instance(self.id)
    }

    /// One-line summary for the status bar.
    #[must_use]
    pub fn status_line(&self) -> String {
        let Some(inst) = self.instance() else {
            return "no grid".to_string();
        };
        let state = if inst.is_running() { "playing" } else { "stopped" };
        let glow = if inst.bloom().is_enabled() {
            format!("glow {}", inst.bloom().amount())
        } else {
            "glow off".to_string()
        };
        format!(
            "{} ({}/{})  {state}  {glow}",
            inst.config().name(),
            self.current + 1,
            self.names.len().max(1),
        )
    }

    /// Tear the grid down.
    pub fn shutdown(&mut self) {
        let destroyed = self.grids.destroy_all();
        tracing::info!(count = destroyed.len(), "demo stopped");
    }
}
