//! Configuration loading and validation.
//!
//! The canonical configuration lives in `ascend-config.yaml`. Every field
//! has a named default, so an empty file (or no file) yields the reference
//! game: 11 points per click, 126,420 points per hour, reward / cipher /
//! combo resets at 00:00, 19:00 and 12:00 UTC, a one second yield tick and
//! a one minute timer refresh.
//!
//! [`ProgressionConfig`] mirrors the YAML. [`ProgressionConfig::validate`]
//! turns it into [`EngineParams`], rejecting anything the engine cannot run
//! with.

use core::time::Duration;
use std::path::Path;

use ascend_types::RankTier;
use serde::Deserialize;

use crate::rank::{RankError, RankTable, STANDARD_TIERS};
use crate::timer::{ResetHour, TimerClock};

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A reset hour outside `0..=23`.
    #[error("invalid reset hour for {timer}: {hour} (expected 0-23)")]
    InvalidResetHour {
        /// Which timer was misconfigured.
        timer: &'static str,
        /// The configured value.
        hour: u32,
    },

    /// A period of zero milliseconds.
    #[error("{field} must be greater than zero")]
    InvalidPeriod {
        /// Which period was misconfigured.
        field: &'static str,
    },

    /// The rank table failed validation.
    #[error("invalid rank table: {source}")]
    Ranks {
        /// The underlying rank error.
        #[from]
        source: RankError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration, mirroring `ascend-config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProgressionConfig {
    /// Click and passive yield amounts.
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Daily event reset hours.
    #[serde(default)]
    pub timers: TimersConfig,

    /// Periodic trigger intervals.
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Click effect lifetime.
    #[serde(default)]
    pub effects: EffectsConfig,

    /// Rank tiers in ascending threshold order.
    #[serde(default = "default_ranks")]
    pub ranks: Vec<RankTier>,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            timers: TimersConfig::default(),
            schedule: ScheduleConfig::default(),
            effects: EffectsConfig::default(),
            ranks: default_ranks(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ProgressionConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }

    /// Check every value and build the engine parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidResetHour`],
    /// [`ConfigError::InvalidPeriod`], or [`ConfigError::Ranks`] for the
    /// first invalid value found.
    pub fn validate(&self) -> Result<EngineParams, ConfigError> {
        let hour = |timer: &'static str, hour: u32| {
            ResetHour::new(hour).ok_or(ConfigError::InvalidResetHour { timer, hour })
        };
        let period = |field: &'static str, ms: u64| {
            if ms == 0 {
                Err(ConfigError::InvalidPeriod { field })
            } else {
                Ok(Duration::from_millis(ms))
            }
        };

        let clock = TimerClock::new(
            hour("bonus", self.timers.bonus_reset_hour)?,
            hour("challenge", self.timers.challenge_reset_hour)?,
            hour("combo", self.timers.combo_reset_hour)?,
        );

        let schedule = Schedule {
            yield_tick: period("schedule.yield_tick_ms", self.schedule.yield_tick_ms)?,
            clock_refresh: period("schedule.clock_refresh_ms", self.schedule.clock_refresh_ms)?,
            effect_sweep: period("schedule.effect_sweep_ms", self.schedule.effect_sweep_ms)?,
        };

        Ok(EngineParams {
            click_increment: self.scoring.click_increment,
            hourly_yield: self.scoring.hourly_yield,
            starting_score: self.scoring.starting_score,
            effect_max_age: period("effects.max_age_ms", self.effects.max_age_ms)?,
            schedule,
            clock,
            ranks: RankTable::new(self.ranks.clone())?,
        })
    }
}

/// Scoring configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScoringConfig {
    /// Points credited per click.
    #[serde(default = "default_click_increment")]
    pub click_increment: u64,

    /// Passive points per hour.
    #[serde(default = "default_hourly_yield")]
    pub hourly_yield: u64,

    /// Score at the start of a session.
    #[serde(default)]
    pub starting_score: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            click_increment: default_click_increment(),
            hourly_yield: default_hourly_yield(),
            starting_score: 0,
        }
    }
}

/// Daily event reset hours, in UTC.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimersConfig {
    /// Daily reward reset hour.
    #[serde(default)]
    pub bonus_reset_hour: u32,

    /// Daily cipher reset hour.
    #[serde(default = "default_challenge_reset_hour")]
    pub challenge_reset_hour: u32,

    /// Daily combo reset hour.
    #[serde(default = "default_combo_reset_hour")]
    pub combo_reset_hour: u32,
}

impl Default for TimersConfig {
    fn default() -> Self {
        Self {
            bonus_reset_hour: 0,
            challenge_reset_hour: default_challenge_reset_hour(),
            combo_reset_hour: default_combo_reset_hour(),
        }
    }
}

/// Periodic trigger intervals in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScheduleConfig {
    /// Passive yield tick.
    #[serde(default = "default_yield_tick_ms")]
    pub yield_tick_ms: u64,

    /// Countdown refresh.
    #[serde(default = "default_clock_refresh_ms")]
    pub clock_refresh_ms: u64,

    /// Stale click effect sweep.
    #[serde(default = "default_effect_sweep_ms")]
    pub effect_sweep_ms: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            yield_tick_ms: default_yield_tick_ms(),
            clock_refresh_ms: default_clock_refresh_ms(),
            effect_sweep_ms: default_effect_sweep_ms(),
        }
    }
}

/// Click effect configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EffectsConfig {
    /// Effects older than this are evicted even without a completion signal.
    #[serde(default = "default_effect_max_age_ms")]
    pub max_age_ms: u64,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            max_age_ms: default_effect_max_age_ms(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes
    /// precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Validated parameters
// ---------------------------------------------------------------------------

/// Periodic trigger intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    /// Passive yield tick.
    pub yield_tick: Duration,
    /// Countdown refresh.
    pub clock_refresh: Duration,
    /// Stale click effect sweep.
    pub effect_sweep: Duration,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            yield_tick: Duration::from_millis(default_yield_tick_ms()),
            clock_refresh: Duration::from_millis(default_clock_refresh_ms()),
            effect_sweep: Duration::from_millis(default_effect_sweep_ms()),
        }
    }
}

/// Validated parameters the engine is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineParams {
    /// Points credited per click.
    pub click_increment: u64,
    /// Passive points per hour.
    pub hourly_yield: u64,
    /// Score at the start of a session.
    pub starting_score: u64,
    /// Maximum lifetime of a click effect.
    pub effect_max_age: Duration,
    /// Periodic trigger intervals.
    pub schedule: Schedule,
    /// Daily event reset anchors.
    pub clock: TimerClock,
    /// Rank tiers.
    pub ranks: RankTable,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            click_increment: default_click_increment(),
            hourly_yield: default_hourly_yield(),
            starting_score: 0,
            effect_max_age: Duration::from_millis(default_effect_max_age_ms()),
            schedule: Schedule::default(),
            clock: TimerClock::standard(),
            ranks: RankTable::standard(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_click_increment() -> u64 {
    11
}

const fn default_hourly_yield() -> u64 {
    126_420
}

const fn default_challenge_reset_hour() -> u32 {
    19
}

const fn default_combo_reset_hour() -> u32 {
    12
}

const fn default_yield_tick_ms() -> u64 {
    1_000
}

const fn default_clock_refresh_ms() -> u64 {
    60_000
}

const fn default_effect_sweep_ms() -> u64 {
    1_000
}

const fn default_effect_max_age_ms() -> u64 {
    5_000
}

fn default_ranks() -> Vec<RankTier> {
    STANDARD_TIERS
        .iter()
        .map(|&(name, threshold)| RankTier::new(name, threshold))
        .collect()
}

fn default_log_level() -> String {
    "info".to_owned()
}
