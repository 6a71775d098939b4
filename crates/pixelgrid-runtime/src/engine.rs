#![forbid(unsafe_code)]

//! Instance registry and timer dispatch.
//!
//! The [`Engine`] is the single owner of everything that outlives one call:
//! the live instances keyed by id, the scheduler, the shared glow
//! definitions, and the preset catalog. Hosts either drive the built-in
//! [`TimerQueue`] with [`Engine::advance`] / [`Engine::pump`], or plug in
//! their own [`Scheduler`] and feed due timers back via
//! [`Engine::dispatch`].
//!
//! # Invariants
//!
//! 1. Ids are assigned in increasing order and never reused.
//! 2. A destroyed id is absent from the registry and owns no timers, no
//!    glow definition, and no cells.
//! 3. Dispatch for an unknown id, an unknown handle, or an instance that
//!    has stopped since scheduling is a no-op.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Operation on a destroyed id | `instance_mut` returns `None` |
//! | Unknown preset name | Falls back to `wave-lr` |
//! | Host clock behind queue time | Nothing fires; time never rewinds |

use std::collections::BTreeMap;
use std::collections::btree_map::{Entry, OccupiedEntry};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use pixelgrid_core::motion::prefers_reduced_motion;
use pixelgrid_core::{
    AnimationSpec, Bloom, Catalog, CreateOptions, GlowStore, InstanceId, Preset, Surface,
};

use crate::clock::Clock;
use crate::instance::Instance;
use crate::markers::MarkerSource;
use crate::timer::{Scheduler, TimerHandle, TimerQueue, TimerToken};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Engine-wide settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineConfig {
    /// Show every cell steadily instead of animating.
    pub reduced_motion: bool,
}

impl EngineConfig {
    /// Settings taken from the process environment.
    ///
    /// `reduced_motion` follows [`prefers_reduced_motion`], which is sampled
    /// once per process.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            reduced_motion: prefers_reduced_motion(),
        }
    }

    /// Set reduced motion (builder pattern).
    #[must_use]
    pub fn reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Registry of live grid instances.
pub struct Engine<S: Surface, T: Scheduler = TimerQueue> {
    instances: BTreeMap<InstanceId, Instance<S>>,
    last_id: u64,
    timers: T,
    glow: GlowStore,
    catalog: Arc<Catalog>,
    config: EngineConfig,
}

impl<S: Surface, T: Scheduler> fmt::Debug for Engine<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("instances", &self.instances.len())
            .field("last_id", &self.last_id)
            .field("glow_filters", &self.glow.len())
            .field("presets", &self.catalog.len())
            .field("config", &self.config)
            .finish()
    }
}

impl<S: Surface> Engine<S> {
    /// Engine on the built-in queue with settings from the environment.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::from_env())
    }

    /// Engine on the built-in queue with explicit settings.
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_scheduler(config, TimerQueue::new())
    }

    /// Current time on the built-in queue.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// Advance time by `dt`, firing everything that comes due.
    ///
    /// Returns how many timers changed an instance.
    pub fn advance(&mut self, dt: Duration) -> usize {
        let target = self.timers.now().saturating_add(dt);
        self.advance_to(target)
    }

    /// Advance time to `target`, firing everything due at or before it.
    ///
    /// Timers scheduled by a firing timer are relative to that timer's
    /// deadline, so a large step behaves the same as many small ones.
    pub fn advance_to(&mut self, target: Duration) -> usize {
        let mut applied = 0;
        while let Some(fired) = self.timers.pop_due(target) {
            if self.dispatch(fired.handle, fired.token) {
                applied += 1;
            }
        }
        self.timers.settle(target);
        applied
    }

    /// Advance to the clock's current reading.
    pub fn pump<C: Clock + ?Sized>(&mut self, clock: &C) -> usize {
        self.advance_to(clock.now_mono())
    }
}

impl<S: Surface> Default for Engine<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Surface, T: Scheduler> Engine<S, T> {
    /// Engine on a host scheduler, using the built-in catalog.
    pub fn with_scheduler(config: EngineConfig, timers: T) -> Self {
        Self {
            instances: BTreeMap::new(),
            last_id: 0,
            timers,
            glow: GlowStore::new(),
            catalog: Arc::clone(Catalog::shared()),
            config,
        }
    }

    /// Replace the preset catalog (builder pattern).
    ///
    /// Existing instances keep the presets they already resolved.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<Catalog>) -> Self {
        self.catalog = catalog;
        self
    }

    // -- Instances ----------------------------------------------------------

    /// Build a grid inside `container`, replacing whatever it held.
    pub fn create(&mut self, container: S, options: CreateOptions) -> InstanceId {
        self.last_id += 1;
        let id = InstanceId::new(self.last_id);
        let preset = self.catalog.resolve(&options.animation);
        tracing::debug!(
            instance_id = id.get(),
            preset = preset.name(),
            autoplay = options.autoplay,
            "creating instance"
        );
        self.instances
            .insert(id, Instance::build(id, container, preset));

        if let Some(mut handle) = self.instance_mut(id) {
            if options.bloom.is_enabled() {
                handle.set_bloom(options.bloom);
            }
            if options.autoplay {
                handle.play();
            }
        }
        id
    }

    /// Create an instance for every enabled marker `source` yields.
    ///
    /// Returns the new ids in discovery order.
    pub fn init_all<M: MarkerSource<S> + ?Sized>(&mut self, source: &mut M) -> Vec<InstanceId> {
        let markers = source.discover();
        tracing::debug!(count = markers.len(), "initializing marked containers");
        markers
            .into_iter()
            .map(|marker| {
                let options = marker.options();
                self.create(marker.into_surface(), options)
            })
            .collect()
    }

    /// Look up a live instance.
    #[must_use]
    pub fn get_instance(&self, id: InstanceId) -> Option<&Instance<S>> {
        self.instances.get(&id)
    }

    /// Mutable handle to a live instance.
    pub fn instance_mut(&mut self, id: InstanceId) -> Option<InstanceMut<'_, S, T>> {
        let Entry::Occupied(entry) = self.instances.entry(id) else {
            return None;
        };
        Some(InstanceMut {
            entry,
            timers: &mut self.timers,
            glow: &mut self.glow,
            catalog: &self.catalog,
            reduced_motion: self.config.reduced_motion,
        })
    }

    /// Destroy one instance and return its emptied container.
    pub fn destroy(&mut self, id: InstanceId) -> Option<S> {
        self.instance_mut(id).map(InstanceMut::destroy)
    }

    /// Destroy every instance, in id order.
    pub fn destroy_all(&mut self) -> Vec<(InstanceId, S)> {
        let ids: Vec<InstanceId> = self.instances.keys().copied().collect();
        ids.into_iter()
            .filter_map(|id| self.destroy(id).map(|container| (id, container)))
            .collect()
    }

    /// Ids of live instances, ascending.
    pub fn ids(&self) -> impl Iterator<Item = InstanceId> + '_ {
        self.instances.keys().copied()
    }

    /// Live instances, ascending by id.
    pub fn instances(&self) -> impl Iterator<Item = &Instance<S>> {
        self.instances.values()
    }

    /// Number of live instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether no instance is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    // -- Timers -------------------------------------------------------------

    /// Deliver a due timer. Returns whether it changed an instance.
    pub fn dispatch(&mut self, handle: TimerHandle, token: TimerToken) -> bool {
        let Some(instance) = self.instances.get_mut(&token.instance) else {
            tracing::trace!(
                instance_id = token.instance.get(),
                ?handle,
                "timer for destroyed instance"
            );
            return false;
        };
        instance.on_timer(&mut self.timers, handle, token)
    }

    /// The scheduler.
    #[must_use]
    pub fn timers(&self) -> &T {
        &self.timers
    }

    // -- Shared state -------------------------------------------------------

    /// Shared glow definitions.
    #[must_use]
    pub fn glow(&self) -> &GlowStore {
        &self.glow
    }

    /// The preset catalog.
    #[must_use]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Engine settings.
    #[must_use]
    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Catalog names in registration order.
    #[must_use]
    pub fn animation_names(&self) -> Vec<&str> {
        self.catalog.names()
    }

    /// Look up a preset by name, without fallback.
    #[must_use]
    pub fn animation(&self, name: &str) -> Option<&Arc<Preset>> {
        self.catalog.get(name)
    }
}

// ---------------------------------------------------------------------------
// InstanceMut
// ---------------------------------------------------------------------------

/// Mutable access to one live instance.
///
/// Reads go through `Deref<Target = Instance<S>>`.
pub struct InstanceMut<'a, S: Surface, T: Scheduler> {
    entry: OccupiedEntry<'a, InstanceId, Instance<S>>,
    timers: &'a mut T,
    glow: &'a mut GlowStore,
    catalog: &'a Catalog,
    reduced_motion: bool,
}

impl<S: Surface, T: Scheduler> InstanceMut<'_, S, T> {
    /// Start cycling. Returns `false` if it was already running.
    pub fn play(&mut self) -> bool {
        let reduced = self.reduced_motion;
        self.entry.get_mut().play(self.timers, reduced)
    }

    /// Stop cycling and switch every cell off.
    pub fn stop(&mut self) {
        self.entry.get_mut().stop(self.timers);
    }

    /// Switch presets. Unknown names fall back to `wave-lr`.
    ///
    /// A running instance restarts from the fade-in phase.
    pub fn set_animation(&mut self, animation: impl Into<AnimationSpec>) {
        let preset = self.catalog.resolve(&animation.into());
        let reduced = self.reduced_motion;
        self.entry
            .get_mut()
            .set_preset(self.timers, preset, reduced);
    }

    /// Enable, re-create, or remove the glow.
    pub fn set_bloom(&mut self, bloom: impl Into<Bloom>) {
        self.entry.get_mut().set_bloom(self.glow, bloom.into());
    }

    /// Tear the instance down and return its emptied container.
    pub fn destroy(self) -> S {
        let instance = self.entry.remove();
        instance.teardown(self.timers, self.glow)
    }
}

impl<S: Surface, T: Scheduler> Deref for InstanceMut<'_, S, T> {
    type Target = Instance<S>;

    fn deref(&self) -> &Self::Target {
        self.entry.get()
    }
}

impl<S: Surface, T: Scheduler> fmt::Debug for InstanceMut<'_, S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("InstanceMut").field(self.entry.get()).finish()
    }
}
