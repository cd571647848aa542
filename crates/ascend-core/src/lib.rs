//! Progression and timing engine for the Ascend idle clicker.
//!
//! This crate turns clicks and elapsed time into a monotonically growing
//! score, derives a rank from that score, and computes countdowns to the
//! daily events. Rendering lives elsewhere: the presentation layer forwards
//! interaction events in and reads [`ProgressSnapshot`]s out.
//!
//! # Modules
//!
//! - [`rank`] -- Rank table validation, single-step resolution, settling,
//!   and progress toward the next tier.
//! - [`timer`] -- Countdowns to fixed daily UTC reset hours.
//! - [`yield_rate`] -- Passive per-tick yield from an hourly rate.
//! - [`ledger`] -- The non-decreasing score counter.
//! - [`effects`] -- Transient click markers with idempotent expiry.
//! - [`format`] -- Compact yield labels.
//! - [`engine`] -- [`ProgressionEngine`], composing all of the above.
//! - [`config`] -- Configuration loading from `ascend-config.yaml`.
//! - [`runner`] -- Periodic trigger tasks on the tokio runtime.
//!
//! [`ProgressSnapshot`]: ascend_types::ProgressSnapshot
//! [`ProgressionEngine`]: engine::ProgressionEngine

pub mod config;
pub mod effects;
pub mod engine;
pub mod format;
pub mod ledger;
pub mod rank;
pub mod runner;
pub mod timer;
pub mod yield_rate;
