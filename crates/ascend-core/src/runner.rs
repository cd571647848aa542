//! Periodic triggers driving the engine.
//!
//! Each trigger is an independent task on the runtime: a yield tick, a
//! countdown refresh, and a stale-effect sweep. A trigger takes the engine
//! lock once per firing, so every increment plus its rank re-evaluation is
//! a single critical section, and clicks forwarded by the host interleave
//! with ticks only between whole updates.
//!
//! Stopping a trigger (via [`TriggerHandle::stop`] or by dropping the
//! handle) ends only that task. The others keep running.

use core::time::Duration;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::config::Schedule;
use crate::engine::{ProgressionEngine, ProgressionError};

/// Engine shared between the host and the trigger tasks.
pub type SharedEngine = Arc<Mutex<ProgressionEngine>>;

/// Wrap an engine for sharing with triggers.
pub fn shared(engine: ProgressionEngine) -> SharedEngine {
    Arc::new(Mutex::new(engine))
}

/// Errors that can occur while stopping a trigger.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The trigger task panicked or was aborted.
    #[error("trigger {name} did not shut down cleanly: {source}")]
    Join {
        /// Which trigger.
        name: &'static str,
        /// The underlying join error.
        source: tokio::task::JoinError,
    },

    /// The trigger stopped because the engine reported an error.
    #[error("trigger {name} failed: {source}")]
    Engine {
        /// Which trigger.
        name: &'static str,
        /// The underlying engine error.
        source: ProgressionError,
    },
}

/// Handle to one running trigger.
#[derive(Debug)]
pub struct TriggerHandle {
    name: &'static str,
    stop: oneshot::Sender<()>,
    task: JoinHandle<Result<u64, ProgressionError>>,
}

impl TriggerHandle {
    /// Trigger name, for logging.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the task has already ended.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Signal the trigger to stop and wait for it. Returns how many times
    /// it fired.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Join`] if the task panicked, or
    /// [`RunnerError::Engine`] if it had already stopped on an engine error.
    pub async fn stop(self) -> Result<u64, RunnerError> {
        let name = self.name;
        // The task may have already exited on an error; the join below
        // reports that.
        let _ = self.stop.send(());
        let fired = self
            .task
            .await
            .map_err(|source| RunnerError::Join { name, source })?
            .map_err(|source| RunnerError::Engine { name, source })?;
        info!(trigger = name, fired, "Trigger stopped");
        Ok(fired)
    }
}

/// Run `on_tick` against the engine every `period` until stopped.
///
/// The first firing happens one full period after spawning. Periods below
/// one millisecond are raised to one millisecond.
fn spawn_periodic<F>(
    name: &'static str,
    engine: SharedEngine,
    period: Duration,
    mut on_tick: F,
) -> TriggerHandle
where
    F: FnMut(&mut ProgressionEngine) -> Result<(), ProgressionError> + Send + 'static,
{
    let period = period.max(Duration::from_millis(1));
    let (stop, mut stop_rx) = oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        interval.tick().await;

        let mut fired: u64 = 0;
        loop {
            tokio::select! {
                biased;
                _ = &mut stop_rx => break,
                _ = interval.tick() => {
                    let mut guard = engine.lock().await;
                    if let Err(e) = on_tick(&mut *guard) {
                        error!(trigger = name, fired, error = %e, "Trigger stopped on engine error");
                        return Err(e);
                    }
                    fired = fired.saturating_add(1);
                }
            }
        }
        Ok::<u64, ProgressionError>(fired)
    });

    info!(trigger = name, period_ms = period.as_millis(), "Trigger started");
    TriggerHandle { name, stop, task }
}

/// Credit passive yield every `period`.
pub fn spawn_yield_trigger(engine: SharedEngine, period: Duration) -> TriggerHandle {
    spawn_periodic("yield", engine, period, |engine| {
        engine.on_yield_tick()?;
        debug!(score = engine.score(), "Yield tick");
        Ok(())
    })
}

/// Recompute event countdowns every `period`.
pub fn spawn_clock_trigger(engine: SharedEngine, period: Duration) -> TriggerHandle {
    spawn_periodic("clock", engine, period, |engine| {
        let timers = engine.on_clock_tick(Utc::now());
        debug!(
            bonus = %timers.bonus,
            challenge = %timers.challenge,
            combo = %timers.combo,
            "Timers refreshed"
        );
        Ok(())
    })
}

/// Evict stale click effects every `period`.
pub fn spawn_effect_sweeper(engine: SharedEngine, period: Duration) -> TriggerHandle {
    spawn_periodic("effect-sweep", engine, period, |engine| {
        let evicted = engine.sweep_effects(Utc::now());
        if evicted > 0 {
            warn!(evicted, "Evicted click effects with no completion signal");
        }
        Ok(())
    })
}

/// Fire counts reported by [`Triggers::shutdown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TriggerCounts {
    /// Yield ticks applied.
    pub yield_ticks: u64,
    /// Countdown refreshes.
    pub clock_refreshes: u64,
    /// Effect sweeps.
    pub effect_sweeps: u64,
}

/// The full set of periodic triggers for one engine.
#[derive(Debug)]
pub struct Triggers {
    yield_tick: TriggerHandle,
    clock_refresh: TriggerHandle,
    effect_sweep: TriggerHandle,
}

impl Triggers {
    /// Start all triggers on the current runtime.
    pub fn start(engine: &SharedEngine, schedule: &Schedule) -> Self {
        Self {
            yield_tick: spawn_yield_trigger(Arc::clone(engine), schedule.yield_tick),
            clock_refresh: spawn_clock_trigger(Arc::clone(engine), schedule.clock_refresh),
            effect_sweep: spawn_effect_sweeper(Arc::clone(engine), schedule.effect_sweep),
        }
    }

    /// Stop every trigger and report how often each fired.
    ///
    /// All triggers are stopped even if an earlier one reports an error;
    /// the first error is returned.
    ///
    /// # Errors
    ///
    /// Returns the first [`RunnerError`] encountered.
    pub async fn shutdown(self) -> Result<TriggerCounts, RunnerError> {
        let yield_ticks = self.yield_tick.stop().await;
        let clock_refreshes = self.clock_refresh.stop().await;
        let effect_sweeps = self.effect_sweep.stop().await;
        Ok(TriggerCounts {
            yield_ticks: yield_ticks?,
            clock_refreshes: clock_refreshes?,
            effect_sweeps: effect_sweeps?,
        })
    }
}
