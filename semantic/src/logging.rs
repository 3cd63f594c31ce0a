//! Logging setup for the analyzer and the CLI
//!
//! The analyzer logs through the `log` facade; binaries and tests pick a
//! backend here (`env_logger`).
//!
//! - `warn!` - unknown package imports and other suspicious input
//! - `debug!` - scope enter/leave, package imports, scope dumps
//! - `trace!` - every symbol insertion and lookup
//!
//! ```bash
//! RUST_LOG=debug sable check program.json
//! RUST_LOG=semantic::scopes=trace sable check program.json
//! ```

use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logging at `Warn`. Later calls are no-ops, as is any call
/// after another logger was installed.
pub fn init() {
    init_with_level(LevelFilter::Warn);
}

/// Initialize logging at `level`. Later calls are no-ops.
pub fn init_with_level(level: LevelFilter) {
    INIT.call_once(|| {
        Builder::new()
            .filter_level(level)
            .format(|buf, record| {
                writeln!(
                    buf,
                    "[{:5}] {}:{} - {}",
                    record.level(),
                    record.file().unwrap_or("unknown"),
                    record.line().unwrap_or(0),
                    record.args()
                )
            })
            .try_init()
            .ok();
    });
}

/// Initialize from `RUST_LOG` when it is set, else fall back to [`init`].
pub fn init_from_env_or_default() {
    if std::env::var_os("RUST_LOG").is_some() {
        init_from_env();
    } else {
        init();
    }
}

/// Initialize from `RUST_LOG`, defaulting to `warn`.
pub fn init_from_env() {
    INIT.call_once(|| {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
            .try_init()
            .ok();
    });
}

/// Test-friendly logger; safe to call from every test.
pub fn init_test() {
    let _ = env_logger::builder()
        .filter_level(LevelFilter::Warn)
        .is_test(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_is_idempotent() {
        init_test();
        init_test();
        log::debug!("not shown at warn level");
    }

    #[test]
    fn test_default_init_completes_once() {
        init_from_env_or_default();
        assert!(INIT.is_completed());
        // later calls neither panic nor replace the logger
        init_with_level(LevelFilter::Trace);
        init_from_env();
    }
}
