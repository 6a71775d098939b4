#![forbid(unsafe_code)]

//! In-memory [`Surface`] implementation.
//!
//! Node 0 is the container. Children are stored in append order and are
//! discarded by [`Surface::clear_children`]; handles to cleared children
//! must not be used afterwards.

use std::collections::{BTreeMap, BTreeSet};

use super::{CELL_CLASS, LIT_CLASS, Surface};

/// Handle into a [`MemorySurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position in the surface's node table.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct NodeState {
    classes: BTreeSet<String>,
    properties: BTreeMap<String, String>,
}

/// A container with its children, styles, and properties held in memory.
///
/// Two surfaces compare equal when every node carries the same classes and
/// properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySurface {
    /// `nodes[0]` is the container; the rest are its children in order.
    nodes: Vec<NodeState>,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    /// An empty container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeState::default()],
        }
    }

    /// Children of the container, in append order.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        (1..self.nodes.len()).map(NodeId)
    }

    /// Number of children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// The `index`-th child, if present.
    #[must_use]
    pub fn child(&self, index: usize) -> Option<NodeId> {
        let id = index + 1;
        (id < self.nodes.len()).then_some(NodeId(id))
    }

    /// Classes on `node`, sorted.
    pub fn classes(&self, node: &NodeId) -> impl Iterator<Item = &str> + '_ {
        self.nodes
            .get(node.0)
            .into_iter()
            .flat_map(|state| state.classes.iter().map(String::as_str))
    }

    /// Number of children carrying the engine's cell class.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.children()
            .filter(|child| self.has_class(child, CELL_CLASS))
            .count()
    }

    /// Whether the `index`-th child is lit.
    #[must_use]
    pub fn is_lit(&self, index: usize) -> bool {
        self.child(index)
            .is_some_and(|child| self.has_class(&child, LIT_CLASS))
    }

    /// Number of lit children.
    #[must_use]
    pub fn lit_count(&self) -> usize {
        self.children()
            .filter(|child| self.has_class(child, LIT_CLASS))
            .count()
    }
}

impl Surface for MemorySurface {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn clear_children(&mut self) {
        self.nodes.truncate(1);
    }

    fn append_child(&mut self, class: &str) -> NodeId {
        let mut state = NodeState::default();
        state.classes.insert(class.to_string());
        self.nodes.push(state);
        NodeId(self.nodes.len() - 1)
    }

    fn add_class(&mut self, node: &NodeId, class: &str) {
        if let Some(state) = self.nodes.get_mut(node.0) {
            state.classes.insert(class.to_string());
        }
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) {
        if let Some(state) = self.nodes.get_mut(node.0) {
            state.classes.remove(class);
        }
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.nodes
            .get(node.0)
            .is_some_and(|state| state.classes.contains(class))
    }

    fn set_property(&mut self, node: &NodeId, name: &str, value: &str) {
        if let Some(state) = self.nodes.get_mut(node.0) {
            state.properties.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_property(&mut self, node: &NodeId, name: &str) {
        if let Some(state) = self.nodes.get_mut(node.0) {
            state.properties.remove(name);
        }
    }

    fn property(&self, node: &NodeId, name: &str) -> Option<String> {
        self.nodes
            .get(node.0)
            .and_then(|state| state.properties.get(name).cloned())
    }
}
