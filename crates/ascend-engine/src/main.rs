//! Headless host for the Ascend progression engine.
//!
//! Stands in for the presentation layer: it forwards interaction events to
//! the engine and prints a JSON [`ProgressSnapshot`] after every change.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `ascend-config.yaml` (or `$ASCEND_CONFIG`)
//! 2. Initialize structured logging (tracing) to stderr
//! 3. Validate configuration into engine parameters
//! 4. Build the engine and start the yield, clock, and sweep triggers
//! 5. Read commands from stdin until `quit`, EOF, or Ctrl-C
//! 6. Stop every trigger and log the totals
//!
//! [`ProgressSnapshot`]: ascend_types::ProgressSnapshot

mod error;
mod input;

use std::path::PathBuf;

use ascend_core::config::ProgressionConfig;
use ascend_core::engine::ProgressionEngine;
use ascend_core::runner::{self, SharedEngine, Triggers};
use chrono::Utc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::input::{parse_command, Command};

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "ascend-config.yaml";

/// Application entry point for the engine host.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the engine reports a broken
/// invariant, or stdin/stdout fail.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration.
    let (config, config_source) = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(source = %config_source, "ascend-engine starting");

    // 3. Validate.
    let params = config.validate()?;
    info!(
        click_increment = params.click_increment,
        hourly_yield = params.hourly_yield,
        rank_tiers = params.ranks.len(),
        yield_tick_ms = params.schedule.yield_tick.as_millis(),
        clock_refresh_ms = params.schedule.clock_refresh.as_millis(),
        "Configuration loaded"
    );

    // 4. Build the engine and start the triggers.
    let schedule = params.schedule;
    let engine = runner::shared(ProgressionEngine::new(params, Utc::now())?);
    let triggers = Triggers::start(&engine, &schedule);

    let mut stdout = tokio::io::stdout();
    emit_snapshot(&engine, &mut stdout).await?;

    // 5. Interaction loop.
    let stdin = BufReader::new(tokio::io::stdin());
    let loop_result = run_interaction_loop(&engine, stdin, &mut stdout, interrupted()).await;

    // 6. Shut down, even if the loop failed.
    let counts = triggers.shutdown().await?;
    let ledger = *engine.lock().await.ledger();
    info!(
        yield_ticks = counts.yield_ticks,
        clock_refreshes = counts.clock_refreshes,
        effect_sweeps = counts.effect_sweeps,
        clicks = ledger.clicks(),
        clicked_total = ledger.clicked_total(),
        yielded_total = ledger.yielded_total(),
        final_score = ledger.score(),
        "ascend-engine shutdown complete"
    );

    loop_result
}

/// Resolves on Ctrl-C. If the signal handler cannot be installed, never
/// resolves and input EOF or `quit` ends the session instead.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Interrupt handler unavailable");
        std::future::pending::<()>().await;
    }
}

/// Forward commands from `input` to the engine until `quit`, EOF, or
/// `shutdown` resolves.
///
/// `shutdown` is polled across the whole session, so a signal arriving
/// while a command is being handled still ends the loop.
async fn run_interaction_loop<R, W>(
    engine: &SharedEngine,
    input: R,
    output: &mut W,
    shutdown: impl Future<Output = ()>,
) -> Result<(), EngineError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    tokio::pin!(shutdown);

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            () = &mut shutdown => {
                info!("Interrupt received");
                return Ok(());
            }
        };
        let Some(line) = line else {
            info!("Input closed");
            return Ok(());
        };

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let command = match parse_command(trimmed) {
            Ok(command) => command,
            Err(e) => {
                warn!(error = %e, line = trimmed, "Ignoring malformed command");
                continue;
            }
        };

        match command {
            Command::Click { x, y } => {
                let outcome = engine.lock().await.on_interaction(x, y, Utc::now())?;
                info!(score = outcome.score, effect = %outcome.effect, "Interaction");
            }
            Command::AnimationComplete(id) => {
                if !engine.lock().await.on_effect_animation_complete(id) {
                    info!(effect = %id, "Completion for unknown or expired effect");
                }
            }
            Command::Snapshot => {}
            Command::Quit => return Ok(()),
        }

        emit_snapshot(engine, output).await?;
    }
}

/// Write the current snapshot as one JSON line.
async fn emit_snapshot<W>(engine: &SharedEngine, output: &mut W) -> Result<(), EngineError>
where
    W: AsyncWrite + Unpin,
{
    let snapshot = engine.lock().await.snapshot()?;
    let mut line = serde_json::to_string(&snapshot)?;
    line.push('\n');
    output.write_all(line.as_bytes()).await?;
    output.flush().await?;
    Ok(())
}

/// Load configuration from `$ASCEND_CONFIG` or `ascend-config.yaml`.
///
/// A missing file means defaults. Returns the config and a description of
/// where it came from.
fn load_config() -> Result<(ProgressionConfig, String), EngineError> {
    let path = std::env::var_os("ASCEND_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if path.exists() {
        let config = ProgressionConfig::from_file(&path)?;
        Ok((config, path.display().to_string()))
    } else {
        Ok((ProgressionConfig::default(), "defaults".to_owned()))
    }
}
