#![forbid(unsafe_code)]

//! Glow post-effect.
//!
//! Each instance may own one glow filter, keyed by its id. The filters live
//! in a single shared definitions block that is created the first time any
//! instance asks for glow and then kept for the life of the store.
//!
//! A filter brightens the source, blurs the brightened copy by the glow
//! amount, and screen-blends the blur back over the source.
//!
//! # Invariants
//!
//! 1. At most one filter per instance id; creating again replaces it.
//! 2. Removing a filter that does not exist is a no-op.
//! 3. The definitions block is never created by a removal.

use std::collections::BTreeMap;

use crate::id::InstanceId;

/// Blur radius used when glow is enabled without an explicit amount.
pub const DEFAULT_GLOW_AMOUNT: f32 = 4.0;

/// Color matrix that doubles each channel and pulls it down by half.
pub const BRIGHTEN_MATRIX: &str = "2 0 0 0 -0.5 0 2 0 0 -0.5 0 0 2 0 -0.5 0 0 0 1 0";

/// Filter region, relative to the filtered element's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterRegion {
    /// Left offset.
    pub x: &'static str,
    /// Top offset.
    pub y: &'static str,
    pub width: &'static str,
    pub height: &'static str,
}

/// The region every glow filter uses: three times the element, centered.
pub const GLOW_REGION: FilterRegion = FilterRegion {
    x: "-100%",
    y: "-100%",
    width: "300%",
    height: "300%",
};

/// One processing stage of a glow filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterStage {
    /// Brighten `SourceGraphic` into `bright`.
    ColorMatrix { values: &'static str },
    /// Blur `bright` into `glow`.
    GaussianBlur { std_deviation: f32 },
    /// Screen-blend `glow` under `SourceGraphic`.
    Blend { mode: &'static str },
}

/// Key under which an instance's filter is stored.
#[must_use]
pub fn filter_key(id: InstanceId) -> String {
    format!("pg-bloom-{id}")
}

/// Value the container's filter property takes while glow is on.
#[must_use]
pub fn filter_reference(id: InstanceId) -> String {
    format!("url(#{})", filter_key(id))
}

// ---------------------------------------------------------------------------
// GlowFilter
// ---------------------------------------------------------------------------

/// A per-instance glow filter.
#[derive(Debug, Clone, PartialEq)]
pub struct GlowFilter {
    owner: InstanceId,
    key: String,
    amount: f32,
}

impl GlowFilter {
    fn new(owner: InstanceId, amount: f32) -> Self {
        Self {
            owner,
            key: filter_key(owner),
            amount,
        }
    }

    /// Instance this filter belongs to.
    #[must_use]
    pub fn owner(&self) -> InstanceId {
        self.owner
    }

    /// Unique key, `pg-bloom-<id>`.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Blur radius.
    #[must_use]
    pub fn amount(&self) -> f32 {
        self.amount
    }

    /// Region the filter renders into.
    #[must_use]
    pub fn region(&self) -> FilterRegion {
        GLOW_REGION
    }

    /// Stages in application order.
    #[must_use]
    pub fn stages(&self) -> [FilterStage; 3] {
        [
            FilterStage::ColorMatrix {
                values: BRIGHTEN_MATRIX,
            },
            FilterStage::GaussianBlur {
                std_deviation: self.amount,
            },
            FilterStage::Blend { mode: "screen" },
        ]
    }
}

// ---------------------------------------------------------------------------
// GlowState
// ---------------------------------------------------------------------------

/// An instance's view of its own glow.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlowState {
    enabled: bool,
    amount: f32,
}

impl GlowState {
    /// Glow off, amount zero.
    pub const OFF: Self = Self {
        enabled: false,
        amount: 0.0,
    };

    /// Glow on at `amount`.
    #[must_use]
    pub const fn on(amount: f32) -> Self {
        Self {
            enabled: true,
            amount,
        }
    }

    /// Whether a glow filter is attached.
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        self.enabled
    }

    /// Blur strength; zero when off.
    #[must_use]
    pub const fn amount(self) -> f32 {
        self.amount
    }
}

// ---------------------------------------------------------------------------
// GlowStore
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct GlowDefs {
    filters: BTreeMap<InstanceId, GlowFilter>,
}

/// Lazily created container of per-instance glow filters.
#[derive(Debug, Default)]
pub struct GlowStore {
    defs: Option<GlowDefs>,
}

impl GlowStore {
    /// A store whose definitions block has not been created yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { defs: None }
    }

    /// Whether the shared definitions block exists.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.defs.is_some()
    }

    fn ensure_defs(&mut self) -> &mut GlowDefs {
        self.defs.get_or_insert_with(|| {
            crate::debug!("created glow definitions");
            GlowDefs::default()
        })
    }

    /// Create (or replace) the filter for `owner`.
    pub fn create(&mut self, owner: InstanceId, amount: f32) -> &GlowFilter {
        self.remove(owner);
        let defs = self.ensure_defs();
        crate::debug!(instance_id = owner.get(), amount, "created glow filter");
        defs.filters
            .entry(owner)
            .or_insert_with(|| GlowFilter::new(owner, amount))
    }

    /// Remove `owner`'s filter. Returns whether one existed.
    pub fn remove(&mut self, owner: InstanceId) -> bool {
        let Some(defs) = self.defs.as_mut() else {
            return false;
        };
        let removed = defs.filters.remove(&owner).is_some();
        if removed {
            crate::debug!(instance_id = owner.get(), "removed glow filter");
        }
        removed
    }

    /// The filter owned by `owner`, if any.
    #[must_use]
    pub fn get(&self, owner: InstanceId) -> Option<&GlowFilter> {
        self.defs.as_ref()?.filters.get(&owner)
    }

    /// Whether any filter references `owner`.
    #[must_use]
    pub fn references(&self, owner: InstanceId) -> bool {
        self.get(owner).is_some()
    }

    /// Number of live filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.defs.as_ref().map_or(0, |defs| defs.filters.len())
    }

    /// Whether there are no live filters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live filters in id order.
    pub fn iter(&self) -> impl Iterator<Item = &GlowFilter> {
        self.defs
            .iter()
            .flat_map(|defs| defs.filters.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: InstanceId = InstanceId::new(1);
    const B: InstanceId = InstanceId::new(2);

    #[test]
    fn store_is_lazy() {
        let mut store = GlowStore::new();
        assert!(!store.remove(A));
        assert!(!store.is_initialized());
        store.create(A, 3.0);
        assert!(store.is_initialized());
    }

    #[test]
    fn create_replaces_instead_of_duplicating() {
        let mut store = GlowStore::new();
        store.create(A, 3.0);
        store.create(A, 6.0);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(A).map(GlowFilter::amount), Some(6.0));
    }

    #[test]
    fn filters_are_independent_per_instance() {
        let mut store = GlowStore::new();
        store.create(A, 1.0);
        store.create(B, 2.0);
        assert!(store.remove(A));
        assert!(!store.references(A));
        assert!(store.references(B));
        assert!(store.is_initialized());
    }

    #[test]
    fn filter_shape() {
        let mut store = GlowStore::new();
        let filter = store.create(InstanceId::new(7), 4.0);
        assert_eq!(filter.key(), "pg-bloom-7");
        assert_eq!(filter.region(), GLOW_REGION);
        assert_eq!(
            filter.stages()[1],
            FilterStage::GaussianBlur { std_deviation: 4.0 }
        );
        assert_eq!(filter_reference(InstanceId::new(7)), "url(#pg-bloom-7)");
    }
}
