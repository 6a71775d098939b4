#![forbid(unsafe_code)]

//! Rendering-surface contract.
//!
//! The engine never draws. It drives a host-owned container through this
//! trait: clearing and appending children, toggling style classes, and
//! setting string-valued custom properties. How the host turns that into
//! pixels (DOM, terminal cells, a canvas) is its own business.
//!
//! [`memory::MemorySurface`] is a complete in-process implementation used by
//! tests and by hosts that render from a snapshot.

pub mod memory;

use std::fmt;

/// Class carried by every container while it hosts a grid.
pub const CONTAINER_CLASS: &str = "pixel-grid";
/// Class carried by every cell the engine creates.
pub const CELL_CLASS: &str = "pixel-grid__cell";
/// Class marking a cell as lit.
pub const LIT_CLASS: &str = "is-on";
/// Container property pointing at the instance's glow filter.
pub const FILTER_PROPERTY: &str = "filter";

/// A container element plus the children it manages.
pub trait Surface {
    /// Handle to the container or one of its children.
    type Node: Clone + fmt::Debug;

    /// The container itself.
    fn root(&self) -> Self::Node;

    /// Remove every child of the container.
    fn clear_children(&mut self);

    /// Create a child carrying `class` and append it to the container.
    fn append_child(&mut self, class: &str) -> Self::Node;

    /// Add a style class. Adding a present class is a no-op.
    fn add_class(&mut self, node: &Self::Node, class: &str);

    /// Remove a style class. Removing an absent class is a no-op.
    fn remove_class(&mut self, node: &Self::Node, class: &str);

    /// Whether `node` carries `class`.
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    /// Set a custom property.
    fn set_property(&mut self, node: &Self::Node, name: &str, value: &str);

    /// Remove a custom property. Removing an absent property is a no-op.
    fn remove_property(&mut self, node: &Self::Node, name: &str);

    /// Read a custom property.
    fn property(&self, node: &Self::Node, name: &str) -> Option<String>;
}
