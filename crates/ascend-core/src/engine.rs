//! The progression engine: one owner for score, rank, timers, and effects.
//!
//! Three inputs drive it:
//!
//! 1. **Interaction** -- a click credits the per-click increment, re-settles
//!    the rank, and spawns a click effect at the pointer position.
//! 2. **Yield tick** -- credits the per-tick passive yield and re-settles
//!    the rank.
//! 3. **Clock tick** -- recomputes the three event countdowns. It never
//!    touches score or rank.
//!
//! Effect completion signals and the stale-effect sweep only touch the
//! effect queue. After any of these, [`ProgressionEngine::snapshot`] gives
//! the presentation layer a fresh read-only view.
//!
//! Every method takes `now` explicitly; the engine never reads the wall
//! clock itself.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use ascend_types::{EffectId, ProgressSnapshot};

use crate::config::EngineParams;
use crate::effects::ClickEffectQueue;
use crate::format::format_yield;
use crate::ledger::ScoreLedger;
use crate::rank::{RankChange, RankError, RankResolver, RankTable};
use crate::timer::{EventTimers, TimerClock};
use crate::yield_rate::YieldAccumulator;

/// Errors raised by the engine. All of them indicate a broken invariant
/// rather than bad input.
#[derive(Debug, thiserror::Error)]
pub enum ProgressionError {
    /// Rank resolution failed.
    #[error("rank error: {source}")]
    Rank {
        /// The underlying rank error.
        #[from]
        source: RankError,
    },
}

/// Result of handling one click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickOutcome {
    /// The effect spawned for this click.
    pub effect: EffectId,
    /// Score after the click.
    pub score: u64,
    /// How the rank moved.
    pub rank: RankChange,
}

/// Authoritative progression state.
#[derive(Debug, Clone)]
pub struct ProgressionEngine {
    click_increment: u64,
    ranks: RankTable,
    clock: TimerClock,
    accumulator: YieldAccumulator,
    ledger: ScoreLedger,
    resolver: RankResolver,
    effects: ClickEffectQueue,
    timers: EventTimers,
}

impl ProgressionEngine {
    /// Build an engine from validated parameters.
    ///
    /// The rank is settled against the starting score and the countdowns
    /// are computed once from `now`.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressionError::Rank`] if the rank table is empty.
    pub fn new(params: EngineParams, now: DateTime<Utc>) -> Result<Self, ProgressionError> {
        let resolver = RankResolver::for_score(params.starting_score, &params.ranks)?;
        let timers = params.clock.refresh(now);

        info!(
            starting_score = params.starting_score,
            rank_index = resolver.index(),
            click_increment = params.click_increment,
            hourly_yield = params.hourly_yield,
            "Progression engine initialized"
        );

        Ok(Self {
            click_increment: params.click_increment,
            accumulator: YieldAccumulator::new(params.hourly_yield, params.schedule.yield_tick),
            ledger: ScoreLedger::with_score(params.starting_score),
            effects: ClickEffectQueue::new(params.effect_max_age),
            clock: params.clock,
            ranks: params.ranks,
            resolver,
            timers,
        })
    }

    /// Handle a click at an absolute pointer position.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressionError::Rank`] if the held rank index no longer
    /// fits the table.
    pub fn on_interaction(
        &mut self,
        x: f64,
        y: f64,
        now: DateTime<Utc>,
    ) -> Result<ClickOutcome, ProgressionError> {
        let score = self.ledger.apply_click(self.click_increment);
        let rank = self.reevaluate(score)?;
        let effect = self.effects.spawn(x, y, self.click_increment, now);
        debug!(score, %effect, "Click applied");
        Ok(ClickOutcome {
            effect,
            score,
            rank,
        })
    }

    /// Drop the effect whose animation finished. Unknown or already
    /// expired ids are ignored.
    pub fn on_effect_animation_complete(&mut self, id: EffectId) -> bool {
        self.effects.expire(id)
    }

    /// Credit one tick of passive yield.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressionError::Rank`] if the held rank index no longer
    /// fits the table.
    pub fn on_yield_tick(&mut self) -> Result<RankChange, ProgressionError> {
        let score = self.ledger.apply_yield(self.accumulator.per_tick());
        self.reevaluate(score)
    }

    /// Recompute the event countdowns from `now`.
    pub fn on_clock_tick(&mut self, now: DateTime<Utc>) -> EventTimers {
        self.timers = self.clock.refresh(now);
        self.timers
    }

    /// Evict click effects that outlived their maximum age.
    pub fn sweep_effects(&mut self, now: DateTime<Utc>) -> usize {
        self.effects.evict_expired(now)
    }

    /// Read-only view of the current state.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressionError::Rank`] if the held rank index no longer
    /// fits the table.
    pub fn snapshot(&self) -> Result<ProgressSnapshot, ProgressionError> {
        let score = self.ledger.score();
        let rank_index = self.resolver.index();
        let rank_name = self
            .ranks
            .tier_at(rank_index)
            .ok_or(RankError::IndexOutOfRange {
                index: rank_index,
                len: self.ranks.len(),
            })?
            .name
            .clone();

        Ok(ProgressSnapshot {
            score,
            rank_index,
            rank_count: self.ranks.len(),
            rank_name,
            rank_progress_percent: self.resolver.progress_percent(score, &self.ranks)?,
            profit_per_hour: self.accumulator.hourly_rate(),
            profit_per_hour_label: format_yield(self.accumulator.hourly_rate()),
            bonus_timer: self.timers.bonus.to_string(),
            challenge_timer: self.timers.challenge.to_string(),
            combo_timer: self.timers.combo.to_string(),
            active_effects: self.effects.active().to_vec(),
        })
    }

    /// Current score.
    pub const fn score(&self) -> u64 {
        self.ledger.score()
    }

    /// Current rank index.
    pub const fn rank_index(&self) -> usize {
        self.resolver.index()
    }

    /// Most recently computed countdowns.
    pub const fn timers(&self) -> EventTimers {
        self.timers
    }

    /// The score ledger.
    pub const fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    /// The rank table.
    pub const fn ranks(&self) -> &RankTable {
        &self.ranks
    }

    /// Points credited per yield tick.
    pub const fn yield_per_tick(&self) -> u64 {
        self.accumulator.per_tick()
    }

    fn reevaluate(&mut self, score: u64) -> Result<RankChange, ProgressionError> {
        let change = self.resolver.evaluate(score, &self.ranks)?;
        match change {
            RankChange::Promoted { from, to } | RankChange::Demoted { from, to } => {
                info!(
                    score,
                    from,
                    to,
                    rank = self.ranks.tier_at(to).map_or("", |tier| tier.name.as_str()),
                    "Rank changed"
                );
            }
            RankChange::Unchanged => {}
        }
        Ok(change)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 23, 30, 0).unwrap()
    }

    fn engine_at(score: u64) -> ProgressionEngine {
        let params = EngineParams {
            starting_score: score,
            ..EngineParams::default()
        };
        ProgressionEngine::new(params, now()).unwrap()
    }

    #[test]
    fn starts_settled_with_timers() {
        let engine = engine_at(22_749_365);
        assert_eq!(engine.rank_index(), 6);
        let snap = engine.snapshot().unwrap();
        assert_eq!(snap.rank_name, "Legendary");
        assert_eq!(snap.rank_count, 10);
        assert_eq!(snap.bonus_timer, "00:30");
        assert_eq!(snap.challenge_timer, "19:30");
        assert_eq!(snap.combo_timer, "12:30");
        assert!((snap.rank_progress_percent - 31.873_412_5).abs() < 1e-9);
    }

    #[test]
    fn click_credits_increment_and_spawns_effect() {
        let mut engine = engine_at(0);
        let outcome = engine.on_interaction(120.0, 340.0, now()).unwrap();
        assert_eq!(outcome.score, 11);
        assert_eq!(outcome.rank, RankChange::Unchanged);

        let snap = engine.snapshot().unwrap();
        assert_eq!(snap.active_effects.len(), 1);
        let effect = snap.active_effects.first().unwrap();
        assert_eq!(effect.id, outcome.effect);
        assert_eq!(effect.amount, 11);
        assert!((effect.x - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn click_across_boundary_promotes_one_tier() {
        let mut engine = engine_at(4_990);
        let outcome = engine.on_interaction(0.0, 0.0, now()).unwrap();
        assert_eq!(outcome.score, 5_001);
        assert_eq!(outcome.rank, RankChange::Promoted { from: 0, to: 1 });
        assert_eq!(engine.snapshot().unwrap().rank_name, "Silver");
    }

    #[test]
    fn yield_tick_credits_per_tick_amount() {
        let mut engine = engine_at(0);
        assert_eq!(engine.yield_per_tick(), 35);
        for _ in 0..3600 {
            engine.on_yield_tick().unwrap();
        }
        assert_eq!(engine.score(), 126_000);
        assert_eq!(engine.rank_index(), 3);
        assert_eq!(engine.ledger().yielded_total(), 126_000);
    }

    #[test]
    fn clock_tick_leaves_score_alone() {
        let mut engine = engine_at(500);
        let later = Utc.with_ymd_and_hms(2024, 1, 2, 18, 0, 0).unwrap();
        let timers = engine.on_clock_tick(later);
        assert_eq!(timers.challenge.to_string(), "01:00");
        assert_eq!(engine.score(), 500);
        assert_eq!(engine.snapshot().unwrap().challenge_timer, "01:00");
    }

    #[test]
    fn completion_signal_is_idempotent() {
        let mut engine = engine_at(0);
        let first = engine.on_interaction(1.0, 1.0, now()).unwrap().effect;
        let second = engine.on_interaction(2.0, 2.0, now()).unwrap().effect;
        assert!(engine.on_effect_animation_complete(second));
        assert!(!engine.on_effect_animation_complete(second));
        let remaining: Vec<EffectId> = engine
            .snapshot()
            .unwrap()
            .active_effects
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(remaining, vec![first]);
    }

    #[test]
    fn sweep_drops_effects_without_completion() {
        let mut engine = engine_at(0);
        engine.on_interaction(1.0, 1.0, now()).unwrap();
        let much_later = Utc.with_ymd_and_hms(2024, 1, 1, 23, 31, 0).unwrap();
        assert_eq!(engine.sweep_effects(much_later), 1);
        assert!(engine.snapshot().unwrap().active_effects.is_empty());
        // Score is unaffected by effect bookkeeping.
        assert_eq!(engine.score(), 11);
    }

    #[test]
    fn profit_label_in_snapshot() {
        let snap = engine_at(0).snapshot().unwrap();
        assert_eq!(snap.profit_per_hour, 126_420);
        assert_eq!(snap.profit_per_hour_label, "+126.42K");
    }

    #[test]
    fn top_tier_reports_full_progress() {
        let snap = engine_at(2_000_000_000).snapshot().unwrap();
        assert_eq!(snap.rank_name, "Lord");
        assert!((snap.rank_progress_percent - 100.0).abs() < f64::EPSILON);
    }
}
