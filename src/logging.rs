//! Logging bootstrap.
//!
//! # Responsibility
//! - Start the stderr logger exactly once per process.
//! - Keep library diagnostics as stable `event=... key=value` lines.
//!
//! # Invariants
//! - Logging init is idempotent for the same level.
//! - Re-initialization with a different level is rejected.
//! - Initialization never panics.
//! - `RUST_LOG`, when set, takes precedence over the requested level.

use flexi_logger::{Logger, LoggerHandle};
use log::debug;
use once_cell::sync::OnceCell;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    _logger: LoggerHandle,
}

/// Initializes logging to stderr at `level`.
///
/// # Errors
/// - Returns an error when `level` is unsupported.
/// - Returns an error when logging is already active at another level.
/// - Returns an error when logger backend setup fails.
pub fn init_logging(level: &str) -> Result<(), String> {
    let normalized = normalize_level(level)?;

    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState, String> {
        let logger = Logger::try_with_env_or_str(normalized)
            .map_err(|err| format!("invalid log level `{normalized}`: {err}"))?
            .log_to_stderr()
            .format(flexi_logger::default_format)
            .start()
            .map_err(|err| format!("failed to start logger: {err}"))?;

        debug!(
            "event=logging_init module=logging status=ok level={} version={}",
            normalized,
            env!("CARGO_PKG_VERSION")
        );

        Ok(LoggingState {
            level: normalized,
            _logger: logger,
        })
    })?;

    if state.level != normalized {
        return Err(format!(
            "logging already initialized with level `{}`; refusing to switch to `{}`",
            state.level, normalized
        ));
    }

    Ok(())
}

/// Active log level, or `None` before [`init_logging`].
pub fn logging_status() -> Option<&'static str> {
    LOGGING_STATE.get().map(|state| state.level)
}

fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::{init_logging, logging_status, normalize_level};

    #[test]
    fn normalize_level_accepts_known_values() {
        assert_eq!(normalize_level("INFO").unwrap(), "info");
        assert_eq!(normalize_level(" warning ").unwrap(), "warn");
    }

    #[test]
    fn normalize_level_rejects_unknown() {
        let error = normalize_level("loud").unwrap_err();
        assert!(error.contains("unsupported"));
    }

    #[test]
    fn init_logging_is_idempotent_and_rejects_conflicts() {
        init_logging("info").expect("first init should succeed");
        init_logging("INFO").expect("same level should be idempotent");

        let error = init_logging("debug").expect_err("level conflict should fail");
        assert!(error.contains("refusing to switch"));

        assert_eq!(logging_status(), Some("info"));
    }
}
