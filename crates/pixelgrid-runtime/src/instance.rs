#![forbid(unsafe_code)]

//! Per-grid state machine.
//!
//! An [`Instance`] owns one container, the nine cells it created inside
//! it, the active preset, and every timer it has outstanding.
//!
//! # States
//!
//! ```text
//!            play()                     hold_time elapsed
//!   Idle ───────────▶ FadingIn ─────────────────────────▶ FadingOut
//!    ▲                   ▲                                    │
//!    │ stop()            └────────────────────────────────────┘
//!    │                          end_time elapsed
//!    └──── any state
//!
//!   Idle ──play() with reduced motion──▶ Steady (all lit, no timers)
//! ```
//!
//! # Invariants
//!
//! 1. Exactly nine cells exist while the instance is alive.
//! 2. Not running ⇒ no pending timers and no lit cells.
//! 3. Running and not `Steady` ⇒ at least one pending timer.
//! 4. A timer delivered after `stop()` changes nothing, whether or not the
//!    host managed to cancel it.
//! 5. Applying a preset's colors replaces every previous tint.
//! 6. Teardown removes the container class only if `build` added it; a
//!    class the host put there stays.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use pixelgrid_core::color::{TintScope, apply_tint};
use pixelgrid_core::glow::filter_reference;
use pixelgrid_core::surface::{CELL_CLASS, CONTAINER_CLASS, FILTER_PROPERTY, LIT_CLASS};
use pixelgrid_core::{
    Bloom, CELL_COUNT, CellMask, GlowState, GlowStore, InstanceId, Preset, Surface,
};
use smallvec::SmallVec;

use crate::timer::{Scheduler, TimerAction, TimerHandle, TimerToken};

/// Nine cell toggles plus one phase-completion timer.
const PENDING_INLINE: usize = CELL_COUNT + 1;

/// Where an instance is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Not running; all cells off.
    #[default]
    Idle,
    /// Cells are being switched on.
    FadingIn,
    /// Cells are being switched off.
    FadingOut,
    /// Reduced motion: all cells on, nothing scheduled.
    Steady,
}

/// One grid.
pub struct Instance<S: Surface> {
    id: InstanceId,
    container: S,
    /// Whether `build` added the container class (the host had not).
    marked_container: bool,
    cells: [S::Node; CELL_COUNT],
    preset: Arc<Preset>,
    running: bool,
    phase: Phase,
    /// Bumped on every stop so late deliveries from an earlier run are ignored.
    generation: u64,
    pending: SmallVec<[TimerHandle; PENDING_INLINE]>,
    lit: CellMask,
    glow: GlowState,
}

impl<S: Surface> fmt::Debug for Instance<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("id", &self.id)
            .field("preset", &self.preset.name())
            .field("running", &self.running)
            .field("phase", &self.phase)
            .field("pending", &self.pending.len())
            .field("lit", &self.lit)
            .field("glow", &self.glow)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Read access
// ---------------------------------------------------------------------------

impl<S: Surface> Instance<S> {
    /// Instance id.
    #[must_use]
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// The container this instance draws into.
    #[must_use]
    pub fn container(&self) -> &S {
        &self.container
    }

    /// Handles of the nine cells, in grid order.
    #[must_use]
    pub fn cells(&self) -> &[S::Node; CELL_COUNT] {
        &self.cells
    }

    /// The active preset.
    #[must_use]
    pub fn config(&self) -> &Arc<Preset> {
        &self.preset
    }

    /// Whether the instance is playing.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current cycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Which cells are lit.
    #[must_use]
    pub fn lit_cells(&self) -> CellMask {
        self.lit
    }

    /// Glow state.
    #[must_use]
    pub fn bloom(&self) -> GlowState {
        self.glow
    }

    /// Number of outstanding timers.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.pending.len()
    }

    /// Outstanding timer handles.
    #[must_use]
    pub fn pending(&self) -> &[TimerHandle] {
        &self.pending
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

impl<S: Surface> Instance<S> {
    /// Replace the container's content with nine fresh cells and tint them.
    pub(crate) fn build(id: InstanceId, mut container: S, preset: Arc<Preset>) -> Self {
        container.clear_children();
        let root = container.root();
        let marked_container = !container.has_class(&root, CONTAINER_CLASS);
        if marked_container {
            container.add_class(&root, CONTAINER_CLASS);
        }
        let cells = std::array::from_fn(|_| container.append_child(CELL_CLASS));
        let mut instance = Self {
            id,
            container,
            marked_container,
            cells,
            preset,
            running: false,
            phase: Phase::Idle,
            generation: 0,
            pending: SmallVec::new(),
            lit: CellMask::empty(),
            glow: GlowState::OFF,
        };
        instance.apply_colors();
        instance
    }

    /// Start cycling. Returns `false` if already running.
    pub(crate) fn play<T: Scheduler>(&mut self, timers: &mut T, reduced_motion: bool) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        if reduced_motion {
            for i in 0..CELL_COUNT {
                self.light(i);
            }
            self.phase = Phase::Steady;
            tracing::debug!(instance_id = self.id.get(), "playing with reduced motion");
            return true;
        }
        tracing::debug!(
            instance_id = self.id.get(),
            preset = self.preset.name(),
            "playing"
        );
        self.begin_fade_in(timers);
        true
    }

    /// Stop, cancel every outstanding timer, and switch all cells off.
    pub(crate) fn stop<T: Scheduler>(&mut self, timers: &mut T) {
        let cancelled = self.pending.len();
        self.running = false;
        self.phase = Phase::Idle;
        self.generation = self.generation.wrapping_add(1);
        for handle in self.pending.drain(..) {
            timers.cancel(handle);
        }
        for i in 0..CELL_COUNT {
            self.darken(i);
        }
        tracing::debug!(instance_id = self.id.get(), cancelled, "stopped");
    }

    /// Swap presets, restarting from the fade-in phase if it was playing.
    pub(crate) fn set_preset<T: Scheduler>(
        &mut self,
        timers: &mut T,
        preset: Arc<Preset>,
        reduced_motion: bool,
    ) {
        let was_running = self.running;
        self.stop(timers);
        tracing::debug!(
            instance_id = self.id.get(),
            from = self.preset.name(),
            to = preset.name(),
            "switching preset"
        );
        self.preset = preset;
        self.apply_colors();
        if was_running {
            self.play(timers, reduced_motion);
        }
    }

    /// Enable, re-create, or remove this instance's glow.
    pub(crate) fn set_bloom(&mut self, store: &mut GlowStore, bloom: Bloom) {
        let root = self.container.root();
        match bloom.amount() {
            Some(amount) => {
                store.create(self.id, amount);
                self.container
                    .set_property(&root, FILTER_PROPERTY, &filter_reference(self.id));
                self.glow = GlowState::on(amount);
            }
            None => {
                self.container.remove_property(&root, FILTER_PROPERTY);
                store.remove(self.id);
                self.glow = GlowState::OFF;
            }
        }
        tracing::debug!(
            instance_id = self.id.get(),
            enabled = self.glow.is_enabled(),
            amount = self.glow.amount(),
            "bloom updated"
        );
    }

    /// Stop, drop the glow, empty the container, and hand it back.
    pub(crate) fn teardown<T: Scheduler>(mut self, timers: &mut T, store: &mut GlowStore) -> S {
        self.stop(timers);
        let root = self.container.root();
        self.container.remove_property(&root, FILTER_PROPERTY);
        store.remove(self.id);
        apply_tint(&mut self.container, &root, TintScope::Container, None);
        if self.marked_container {
            self.container.remove_class(&root, CONTAINER_CLASS);
        }
        self.container.clear_children();
        tracing::debug!(instance_id = self.id.get(), "destroyed");
        self.container
    }

    /// Handle a delivered timer. Returns whether it changed anything.
    pub(crate) fn on_timer<T: Scheduler>(
        &mut self,
        timers: &mut T,
        handle: TimerHandle,
        token: TimerToken,
    ) -> bool {
        let Some(slot) = self.pending.iter().position(|&h| h == handle) else {
            tracing::trace!(instance_id = self.id.get(), ?handle, "dropping stale timer");
            return false;
        };
        self.pending.swap_remove(slot);
        if !self.running || token.generation != self.generation {
            return false;
        }
        tracing::trace!(instance_id = self.id.get(), action = ?token.action, "timer fired");
        match token.action {
            TimerAction::CellOn(i) => self.light(i),
            TimerAction::CellOff(i) => self.darken(i),
            TimerAction::FadeInComplete => self.begin_fade_out(timers),
            TimerAction::FadeOutComplete => self.begin_fade_in(timers),
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

impl<S: Surface> Instance<S> {
    fn begin_fade_in<T: Scheduler>(&mut self, timers: &mut T) {
        self.phase = Phase::FadingIn;
        let preset = Arc::clone(&self.preset);
        for (i, &delay) in preset.delays().iter().enumerate() {
            self.schedule(timers, delay, TimerAction::CellOn(i));
        }
        self.schedule(timers, preset.hold_time(), TimerAction::FadeInComplete);
    }

    fn begin_fade_out<T: Scheduler>(&mut self, timers: &mut T) {
        self.phase = Phase::FadingOut;
        let preset = Arc::clone(&self.preset);
        for (i, &delay) in preset.delays().iter().enumerate() {
            self.schedule(timers, delay, TimerAction::CellOff(i));
        }
        self.schedule(timers, preset.end_time(), TimerAction::FadeOutComplete);
    }

    fn schedule<T: Scheduler>(&mut self, timers: &mut T, delay: Duration, action: TimerAction) {
        let token = TimerToken {
            instance: self.id,
            generation: self.generation,
            action,
        };
        self.pending.push(timers.schedule(delay, token));
    }

    fn light(&mut self, index: usize) {
        if let Some(cell) = self.cells.get(index) {
            self.container.add_class(cell, LIT_CLASS);
            self.lit |= CellMask::cell(index);
        }
    }

    fn darken(&mut self, index: usize) {
        if let Some(cell) = self.cells.get(index) {
            self.container.remove_class(cell, LIT_CLASS);
            self.lit -= CellMask::cell(index);
        }
    }

    fn apply_colors(&mut self) {
        let root = self.container.root();
        apply_tint(
            &mut self.container,
            &root,
            TintScope::Container,
            self.preset.accent(),
        );
        for (i, cell) in self.cells.iter().enumerate() {
            apply_tint(
                &mut self.container,
                cell,
                TintScope::Cell,
                self.preset.cell_color(i),
            );
        }
    }
}
