//! Shared type definitions for the Ascend progression engine.
//!
//! These are the values the engine hands across its boundary to the
//! presentation layer. Types flow downstream to `TypeScript` via `ts-rs`
//! so the front end renders exactly what the engine produced.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for click effect identifiers
//! - [`structs`] -- Rank tiers, click effects, countdowns, and the
//!   read-only progress snapshot

pub mod ids;
pub mod structs;

pub use ids::EffectId;
pub use structs::{ClickEffect, Countdown, ProgressSnapshot, RankTier};
