//! Rank tiers and hysteresis-based rank resolution.
//!
//! The rank table is an ordered list of tiers with strictly increasing
//! thresholds, starting at 0. The current rank is never looked up directly
//! from the score. Instead [`resolve`] moves it by at most one step per
//! evaluation:
//!
//! - score at or above the next tier's threshold: promote one step
//! - score below the current tier's threshold: demote one step
//! - otherwise: unchanged
//!
//! [`settle`] repeats that step until the index is stable, which is how the
//! engine re-evaluates after every score change.

use ascend_types::RankTier;

/// The reference tier set: (name, threshold).
pub const STANDARD_TIERS: [(&str, u64); 10] = [
    ("Bronze", 0),
    ("Silver", 5_000),
    ("Gold", 25_000),
    ("Platinum", 100_000),
    ("Diamond", 1_000_000),
    ("Epic", 2_000_000),
    ("Legendary", 10_000_000),
    ("Master", 50_000_000),
    ("GrandMaster", 100_000_000),
    ("Lord", 1_000_000_000),
];

/// Errors raised by rank table construction and rank resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RankError {
    /// The table has no tiers.
    #[error("rank table must contain at least one tier")]
    Empty,

    /// The first tier does not start at score 0.
    #[error("first rank tier must have threshold 0, got {threshold}")]
    FirstThresholdNotZero {
        /// The offending threshold.
        threshold: u64,
    },

    /// A tier's threshold is not above its predecessor's.
    #[error(
        "rank thresholds must strictly increase: tier {index} has {threshold}, previous tier has {previous}"
    )]
    NotStrictlyIncreasing {
        /// Index of the offending tier.
        index: usize,
        /// Threshold of the tier before it.
        previous: u64,
        /// The offending threshold.
        threshold: u64,
    },

    /// A rank index outside `[0, len - 1]` was supplied.
    #[error("rank index {index} out of range for a table of {len} tiers")]
    IndexOutOfRange {
        /// The supplied index.
        index: usize,
        /// Number of tiers in the table.
        len: usize,
    },
}

// ---------------------------------------------------------------------------
// RankTable
// ---------------------------------------------------------------------------

/// Immutable, validated list of rank tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankTable {
    tiers: Vec<RankTier>,
}

impl RankTable {
    /// Validate and build a rank table.
    ///
    /// # Errors
    ///
    /// Returns [`RankError::Empty`] for an empty list,
    /// [`RankError::FirstThresholdNotZero`] if the first tier does not start
    /// at 0, and [`RankError::NotStrictlyIncreasing`] if any threshold is not
    /// strictly greater than the one before it.
    pub fn new(tiers: Vec<RankTier>) -> Result<Self, RankError> {
        let first = tiers.first().ok_or(RankError::Empty)?;
        if first.threshold != 0 {
            return Err(RankError::FirstThresholdNotZero {
                threshold: first.threshold,
            });
        }

        let pairs = tiers.iter().zip(tiers.iter().skip(1));
        for (offset, (previous, tier)) in pairs.enumerate() {
            if tier.threshold <= previous.threshold {
                return Err(RankError::NotStrictlyIncreasing {
                    index: offset.saturating_add(1),
                    previous: previous.threshold,
                    threshold: tier.threshold,
                });
            }
        }

        Ok(Self { tiers })
    }

    /// The reference table from [`STANDARD_TIERS`].
    pub fn standard() -> Self {
        Self {
            tiers: STANDARD_TIERS
                .iter()
                .map(|&(name, threshold)| RankTier::new(name, threshold))
                .collect(),
        }
    }

    /// Return the tier at `index`, if any.
    pub fn tier_at(&self, index: usize) -> Option<&RankTier> {
        self.tiers.get(index)
    }

    /// Number of tiers.
    pub const fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Always `false`: a validated table has at least one tier.
    pub const fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Index of the highest tier.
    pub const fn top_index(&self) -> usize {
        self.tiers.len().saturating_sub(1)
    }

    /// All tiers in ascending order.
    pub fn tiers(&self) -> &[RankTier] {
        &self.tiers
    }

    /// Threshold of the tier at `index` and of the tier above it (`None` at
    /// the top).
    fn bounds(&self, index: usize) -> Result<(u64, Option<u64>), RankError> {
        let current = self
            .tier_at(index)
            .ok_or(RankError::IndexOutOfRange {
                index,
                len: self.len(),
            })?
            .threshold;
        let next = index
            .checked_add(1)
            .and_then(|i| self.tier_at(i))
            .map(|tier| tier.threshold);
        Ok((current, next))
    }
}

impl Default for RankTable {
    fn default() -> Self {
        Self::standard()
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Outcome of a rank evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankChange {
    /// The rank did not move.
    Unchanged,
    /// The rank went up.
    Promoted {
        /// Index before the evaluation.
        from: usize,
        /// Index after the evaluation.
        to: usize,
    },
    /// The rank went down.
    Demoted {
        /// Index before the evaluation.
        from: usize,
        /// Index after the evaluation.
        to: usize,
    },
}

impl RankChange {
    const fn between(from: usize, to: usize) -> Self {
        if to > from {
            Self::Promoted { from, to }
        } else if to < from {
            Self::Demoted { from, to }
        } else {
            Self::Unchanged
        }
    }
}

/// Single-step rank evaluation.
///
/// Moves at most one tier regardless of how far the score is past a
/// boundary. Callers that can jump several tiers at once should use
/// [`settle`].
///
/// # Errors
///
/// Returns [`RankError::IndexOutOfRange`] if `current` is not a valid index.
pub fn resolve(score: u64, current: usize, table: &RankTable) -> Result<usize, RankError> {
    let (floor, next) = table.bounds(current)?;
    match next {
        Some(next) if score >= next => Ok(current.saturating_add(1)),
        _ if score < floor && current > 0 => Ok(current.saturating_sub(1)),
        _ => Ok(current),
    }
}

/// Apply [`resolve`] until the index stops moving.
///
/// Each step moves in the same direction, so this terminates within
/// `table.len()` steps.
///
/// # Errors
///
/// Returns [`RankError::IndexOutOfRange`] if `current` is not a valid index.
pub fn settle(score: u64, current: usize, table: &RankTable) -> Result<usize, RankError> {
    let mut index = current;
    for _ in 0..table.len() {
        let next = resolve(score, index, table)?;
        if next == index {
            break;
        }
        index = next;
    }
    Ok(index)
}

/// Progress from the current tier toward the next, as a percentage.
///
/// Computed as `(score - current) / (next - current) * 100`, capped at 100.
/// The top tier always reports 100.
///
/// # Errors
///
/// Returns [`RankError::IndexOutOfRange`] if `index` is not a valid index.
#[allow(clippy::cast_precision_loss)]
pub fn progress_percent(score: u64, index: usize, table: &RankTable) -> Result<f64, RankError> {
    let (floor, next) = table.bounds(index)?;
    let Some(next) = next else {
        return Ok(100.0);
    };

    let span = next.saturating_sub(floor);
    if span == 0 {
        return Ok(100.0);
    }
    let gained = score.saturating_sub(floor);
    let percent = gained as f64 / span as f64 * 100.0;
    Ok(percent.min(100.0))
}

// ---------------------------------------------------------------------------
// RankResolver
// ---------------------------------------------------------------------------

/// Owns the current rank index and re-evaluates it on score changes.
///
/// The index is derived state: it can only be moved by evaluating a score
/// against a table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RankResolver {
    index: usize,
}

impl RankResolver {
    /// A resolver at the bottom tier.
    pub const fn new() -> Self {
        Self { index: 0 }
    }

    /// A resolver positioned for `score`, settled from the bottom tier.
    ///
    /// # Errors
    ///
    /// Returns [`RankError::IndexOutOfRange`] if the table is empty.
    pub fn for_score(score: u64, table: &RankTable) -> Result<Self, RankError> {
        Ok(Self {
            index: settle(score, 0, table)?,
        })
    }

    /// Current rank index.
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Settle the rank against `score` and report what moved.
    ///
    /// # Errors
    ///
    /// Returns [`RankError::IndexOutOfRange`] if the held index does not fit
    /// `table`.
    pub fn evaluate(&mut self, score: u64, table: &RankTable) -> Result<RankChange, RankError> {
        let from = self.index;
        self.index = settle(score, from, table)?;
        Ok(RankChange::between(from, self.index))
    }

    /// Progress toward the next tier for `score`.
    ///
    /// # Errors
    ///
    /// Returns [`RankError::IndexOutOfRange`] if the held index does not fit
    /// `table`.
    pub fn progress_percent(&self, score: u64, table: &RankTable) -> Result<f64, RankError> {
        progress_percent(score, self.index, table)
    }
}
