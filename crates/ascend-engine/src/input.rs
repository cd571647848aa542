//! Line-oriented interaction feed.
//!
//! The host reads one command per line from stdin:
//!
//! | Line | Meaning |
//! |------|---------|
//! | `click <x> <y>` | Pointer interaction at absolute position `(x, y)` |
//! | `done <effect-id>` | The effect's animation finished |
//! | `snapshot` | Emit the current snapshot without changing anything |
//! | `quit` | Stop the triggers and exit |
//!
//! Blank lines and lines starting with `#` are ignored by the caller.

use ascend_types::EffectId;

/// A parsed interaction command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Pointer interaction at an absolute position.
    Click {
        /// Absolute X position.
        x: f64,
        /// Absolute Y position.
        y: f64,
    },
    /// Completion signal for a click effect animation.
    AnimationComplete(EffectId),
    /// Request a snapshot.
    Snapshot,
    /// Shut down.
    Quit,
}

/// Reasons a command line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// Nothing but whitespace.
    #[error("empty command")]
    Empty,

    /// The first word is not a known command.
    #[error("unknown command: {0}")]
    Unknown(String),

    /// A required argument is missing.
    #[error("{command}: missing {argument}")]
    MissingArgument {
        /// The command being parsed.
        command: &'static str,
        /// The missing argument's name.
        argument: &'static str,
    },

    /// A coordinate is not a finite number.
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// An effect id is not a UUID.
    #[error("invalid effect id: {0}")]
    InvalidEffectId(String),

    /// Extra words after a complete command.
    #[error("unexpected trailing input: {0}")]
    TrailingInput(String),
}

/// Parse one input line.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let command = match words.next().ok_or(CommandError::Empty)? {
        "click" => {
            let x = coordinate(words.next(), "x")?;
            let y = coordinate(words.next(), "y")?;
            Command::Click { x, y }
        }
        "done" => {
            let raw = words.next().ok_or(CommandError::MissingArgument {
                command: "done",
                argument: "effect id",
            })?;
            let id = raw
                .parse::<EffectId>()
                .map_err(|_err| CommandError::InvalidEffectId(raw.to_owned()))?;
            Command::AnimationComplete(id)
        }
        "snapshot" => Command::Snapshot,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_owned())),
    };

    let rest: Vec<&str> = words.collect();
    if !rest.is_empty() {
        return Err(CommandError::TrailingInput(rest.join(" ")));
    }
    Ok(command)
}

fn coordinate(word: Option<&str>, argument: &'static str) -> Result<f64, CommandError> {
    let raw = word.ok_or(CommandError::MissingArgument {
        command: "click",
        argument,
    })?;
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CommandError::InvalidCoordinate(raw.to_owned())),
    }
}
