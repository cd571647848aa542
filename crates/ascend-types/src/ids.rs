//! Type-safe identifier wrapper around [`Uuid`].
//!
//! Click effects are identified by UUID v7 values. The leading 48 bits are
//! a millisecond timestamp and the remainder is a counter plus random bits,
//! so two effects spawned in the same millisecond still get distinct ids
//! and ids sort in spawn order.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Unique identifier for a transient click effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EffectId(pub Uuid);

impl EffectId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for EffectId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for EffectId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl core::str::FromStr for EffectId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for EffectId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<EffectId> for Uuid {
    fn from(id: EffectId) -> Self {
        id.0
    }
}
