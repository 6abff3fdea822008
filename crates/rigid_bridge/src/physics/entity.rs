//! Entity identifier

use std::fmt;

/// Caller-assigned identifier correlating a physics object with an external entity
///
/// Ids round-trip through the native engine as 64-bit integers. The value `0`
/// is reserved as the "no entity" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    /// Sentinel meaning "no entity" (e.g. a ray that hit nothing)
    pub const NONE: Self = Self(0);

    /// Create an id from its raw value
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw id value
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Whether this is the sentinel
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
