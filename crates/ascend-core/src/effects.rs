//! Transient click markers.
//!
//! Every click spawns a [`ClickEffect`] at the pointer position. The
//! presentation layer animates it and reports completion, at which point
//! the effect is expired. Completion signals may arrive late, twice, or
//! not at all, so [`ClickEffectQueue::expire`] is idempotent and
//! [`ClickEffectQueue::evict_expired`] drops anything older than the
//! configured maximum age.

use core::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use ascend_types::{ClickEffect, EffectId};

/// Live click effects in spawn order.
#[derive(Debug, Clone)]
pub struct ClickEffectQueue {
    effects: Vec<ClickEffect>,
    max_age: TimeDelta,
}

impl ClickEffectQueue {
    /// An empty queue evicting effects older than `max_age`.
    pub fn new(max_age: Duration) -> Self {
        Self {
            effects: Vec::new(),
            max_age: TimeDelta::from_std(max_age).unwrap_or(TimeDelta::MAX),
        }
    }

    /// Spawn an effect at `(x, y)` for a click worth `amount`.
    pub fn spawn(&mut self, x: f64, y: f64, amount: u64, now: DateTime<Utc>) -> EffectId {
        let id = EffectId::new();
        self.effects.push(ClickEffect {
            id,
            x,
            y,
            amount,
            spawned_at: now,
        });
        id
    }

    /// Remove the effect with `id`. Returns `false` if it was already gone.
    pub fn expire(&mut self, id: EffectId) -> bool {
        let before = self.effects.len();
        self.effects.retain(|effect| effect.id != id);
        self.effects.len() != before
    }

    /// Drop effects that have outlived the maximum age. Returns how many
    /// were dropped.
    pub fn evict_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.effects.len();
        let max_age = self.max_age;
        self.effects
            .retain(|effect| now.signed_duration_since(effect.spawned_at) < max_age);
        before.saturating_sub(self.effects.len())
    }

    /// Live effects, oldest first.
    pub fn active(&self) -> &[ClickEffect] {
        &self.effects
    }

    /// Number of live effects.
    pub const fn len(&self) -> usize {
        self.effects.len()
    }

    /// Whether no effects are live.
    pub const fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
