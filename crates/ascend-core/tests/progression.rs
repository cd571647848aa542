//! End-to-end tests driving the engine the way the presentation layer does:
//! forward interactions and completion signals, apply ticks, read snapshots.

#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use ascend_core::config::{EngineParams, ProgressionConfig};
use ascend_core::engine::ProgressionEngine;
use ascend_core::rank::{self, RankChange, RankTable};
use ascend_core::timer::{ResetHour, TimerClock};
use ascend_core::yield_rate;
use chrono::{DateTime, TimeZone, Utc};
use core::time::Duration;

fn instant(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, h, m, s).unwrap()
}

fn engine_from_yaml(yaml: &str, now: DateTime<Utc>) -> ProgressionEngine {
    let params = ProgressionConfig::parse(yaml).unwrap().validate().unwrap();
    ProgressionEngine::new(params, now).unwrap()
}

#[test]
fn reference_session_snapshot() {
    let engine = engine_from_yaml("scoring:\n  starting_score: 22749365\n", instant(23, 30, 0));
    let snap = engine.snapshot().unwrap();

    assert_eq!(snap.score, 22_749_365);
    assert_eq!(snap.rank_index, 6);
    assert_eq!(snap.rank_name, "Legendary");
    assert!((snap.rank_progress_percent - 31.87).abs() < 0.01);
    assert_eq!(snap.bonus_timer, "00:30");
    assert_eq!(snap.profit_per_hour_label, "+126.42K");
}

#[test]
fn clicks_and_ticks_interleave_to_the_same_score() {
    let now = instant(8, 0, 0);
    let mut a = ProgressionEngine::new(EngineParams::default(), now).unwrap();
    let mut b = ProgressionEngine::new(EngineParams::default(), now).unwrap();

    for _ in 0..10 {
        a.on_interaction(0.0, 0.0, now).unwrap();
        a.on_yield_tick().unwrap();
    }
    for _ in 0..10 {
        b.on_yield_tick().unwrap();
    }
    for _ in 0..10 {
        b.on_interaction(0.0, 0.0, now).unwrap();
    }

    assert_eq!(a.score(), b.score());
    assert_eq!(a.score(), 10 * 11 + 10 * 35);
    assert_eq!(a.rank_index(), b.rank_index());
}

#[test]
fn rank_climbs_one_boundary_at_a_time_through_clicks() {
    let mut engine = engine_from_yaml("scoring:\n  starting_score: 4999\n", instant(8, 0, 0));
    assert_eq!(engine.rank_index(), 0);

    let outcome = engine.on_interaction(5.0, 5.0, instant(8, 0, 1)).unwrap();
    assert_eq!(outcome.score, 5_010);
    assert_eq!(outcome.rank, RankChange::Promoted { from: 0, to: 1 });

    let outcome = engine.on_interaction(5.0, 5.0, instant(8, 0, 2)).unwrap();
    assert_eq!(outcome.rank, RankChange::Unchanged);
}

#[test]
fn large_click_increment_settles_across_tiers() {
    let mut engine = engine_from_yaml("scoring:\n  click_increment: 1000000\n", instant(8, 0, 0));
    let outcome = engine.on_interaction(0.0, 0.0, instant(8, 0, 0)).unwrap();
    assert_eq!(outcome.rank, RankChange::Promoted { from: 0, to: 4 });
    assert_eq!(engine.snapshot().unwrap().rank_name, "Diamond");
}

#[test]
fn single_step_resolution_is_still_available() {
    let table = RankTable::standard();
    assert_eq!(rank::resolve(1_000_000, 0, &table).unwrap(), 1);
    assert_eq!(rank::settle(1_000_000, 0, &table).unwrap(), 4);
}

#[test]
fn custom_reset_hours_drive_the_timers() {
    let yaml = "timers:\n  bonus_reset_hour: 6\n  challenge_reset_hour: 6\n  combo_reset_hour: 7\n";
    let mut engine = engine_from_yaml(yaml, instant(5, 0, 0));
    let snap = engine.snapshot().unwrap();
    assert_eq!(snap.bonus_timer, "01:00");
    assert_eq!(snap.challenge_timer, "01:00");
    assert_eq!(snap.combo_timer, "02:00");

    engine.on_clock_tick(instant(6, 0, 0));
    let snap = engine.snapshot().unwrap();
    assert_eq!(snap.bonus_timer, "24:00");
    assert_eq!(snap.combo_timer, "01:00");
}

#[test]
fn timer_examples() {
    let midnight = ResetHour::new(0).unwrap();
    let evening = ResetHour::new(19).unwrap();
    assert_eq!(
        TimerClock::remaining(midnight, instant(23, 30, 0)).to_string(),
        "00:30"
    );
    assert_eq!(
        TimerClock::remaining(evening, instant(19, 0, 0)).to_string(),
        "24:00"
    );
}

#[test]
fn yield_accrual_over_an_hour() {
    let per_tick = yield_rate::per_tick(126_420, Duration::from_secs(1));
    assert_eq!(per_tick, 35);
    assert_eq!(per_tick * 3600, 126_000);
}

#[test]
fn effects_expire_out_of_order_and_by_age() {
    let mut engine = engine_from_yaml("effects:\n  max_age_ms: 1000\n", instant(8, 0, 0));
    let first = engine.on_interaction(1.0, 1.0, instant(8, 0, 0)).unwrap().effect;
    let second = engine.on_interaction(2.0, 2.0, instant(8, 0, 0)).unwrap().effect;
    let third = engine.on_interaction(3.0, 3.0, instant(8, 0, 1)).unwrap().effect;

    assert!(engine.on_effect_animation_complete(second));
    assert!(!engine.on_effect_animation_complete(second));

    // Only `first` is a full second old at 08:00:01.
    assert_eq!(engine.sweep_effects(instant(8, 0, 1)), 1);
    let ids: Vec<_> = engine
        .snapshot()
        .unwrap()
        .active_effects
        .iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec![third]);
    assert!(!engine.on_effect_animation_complete(first));
}

#[test]
fn snapshot_serializes_for_the_presentation_layer() {
    let mut engine = ProgressionEngine::new(EngineParams::default(), instant(8, 0, 0)).unwrap();
    engine.on_interaction(12.5, 40.0, instant(8, 0, 0)).unwrap();
    let json = serde_json::to_value(engine.snapshot().unwrap()).unwrap();

    assert_eq!(json["score"], 11);
    assert_eq!(json["rank_name"], "Bronze");
    assert_eq!(json["combo_timer"], "04:00");
    assert_eq!(json["active_effects"][0]["amount"], 11);
    assert_eq!(json["active_effects"][0]["x"], 12.5);
}
