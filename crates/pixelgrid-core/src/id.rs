#![forbid(unsafe_code)]

//! Instance identifiers.

use std::fmt;

/// Identity of one grid instance.
///
/// Ids are handed out by the engine in increasing order starting at 1 and
/// are never reused within an engine, even after the instance is destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(u64);

impl InstanceId {
    /// Wrap a raw id.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw numeric id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for InstanceId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}
