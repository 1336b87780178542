//! Line-oriented operator console on stdin.
//!
//! Each non-empty line is one JSON command in the same tagged form the
//! operator types serialize to, e.g. `{"command":"pause"}` or
//! `{"command":"set_tick_interval_ms","value":50}`. Loop commands apply at
//! once; restaurant commands are queued for the next tick.

use std::io::BufRead;
use std::sync::Arc;

use bistro_core::operator::{LoopCommand, OperatorCommand, OperatorState};
use serde::Deserialize;
use tokio::runtime::Handle;
use tracing::{debug, warn};

/// One parsed console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ConsoleLine {
    /// Steers the tick loop.
    Loop(LoopCommand),
    /// Changes the restaurant.
    Restaurant(OperatorCommand),
}

/// Parse a single console line.
///
/// # Errors
///
/// Returns an error if the line is not a known command.
pub fn parse_line(line: &str) -> Result<ConsoleLine, serde_json::Error> {
    serde_json::from_str(line.trim())
}

/// Start the stdin reader on its own thread. It ends when stdin closes.
///
/// A detached OS thread keeps a blocked read from holding up runtime
/// shutdown when the last service day ends.
pub fn spawn_console(operator: Arc<OperatorState>) {
    let runtime = Handle::current();
    let spawned = std::thread::Builder::new()
        .name("operator-console".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!(error = %e, "console read failed");
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_line(&line) {
                    Ok(ConsoleLine::Loop(command)) => operator.control(command),
                    Ok(ConsoleLine::Restaurant(command)) => {
                        debug!(?command, "Queued operator command");
                        runtime.block_on(operator.submit(command));
                    }
                    Err(e) => {
                        warn!(error = %e, line = %line.trim(), "unrecognized console command");
                    }
                }
            }
        });
    if let Err(e) = spawned {
        warn!(error = %e, "failed to start operator console");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn loop_commands_parse_first() {
        assert_eq!(
            parse_line(r#"{"command":"pause"}"#).unwrap(),
            ConsoleLine::Loop(LoopCommand::Pause)
        );
        assert_eq!(
            parse_line("  {\"command\":\"set_tick_interval_ms\",\"value\":50}\n").unwrap(),
            ConsoleLine::Loop(LoopCommand::SetTickIntervalMs(50))
        );
    }

    #[test]
    fn restaurant_commands_fall_through() {
        let json = serde_json::to_string(&OperatorCommand::ForceClose).unwrap();
        assert_eq!(
            parse_line(&json).unwrap(),
            ConsoleLine::Restaurant(OperatorCommand::ForceClose)
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_line("pause").is_err());
        assert!(parse_line(r#"{"command":"dance"}"#).is_err());
    }
}
