//! Lightweight logging backend emitting JSON lines on stderr.
//!
//! Stdout is reserved for the greeting itself, so every record goes to
//! stderr as one object: `{"ts":..,"level":..,"mod":..,"msg":..}`.

use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{LevelFilter, Log, Metadata, Record};
use serde_json::json;

/// Level used when `TINYTORCH_LOG_LEVEL` is unset or unparsable.
pub const DEFAULT_LEVEL: LevelFilter = LevelFilter::Warn;

struct JsonLogger {
    level: LevelFilter,
}

impl Log for JsonLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = render(record);
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn render(record: &Record) -> serde_json::Value {
    json!({
        "ts": now_ms(),
        "level": record.level().as_str(),
        "mod": record.target(),
        "msg": record.args().to_string(),
    })
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

/// Parse a level name (`warn`) or the numeric form (`2`) used by older setups.
pub fn parse_level(raw: &str) -> Option<LevelFilter> {
    let raw = raw.trim();
    match raw.parse::<u8>() {
        Ok(0) => Some(LevelFilter::Off),
        Ok(1) => Some(LevelFilter::Error),
        Ok(2) => Some(LevelFilter::Warn),
        Ok(3) => Some(LevelFilter::Info),
        Ok(4) => Some(LevelFilter::Debug),
        Ok(5) => Some(LevelFilter::Trace),
        Ok(_) => None,
        Err(_) => raw.parse().ok(),
    }
}

/// Level requested through `TINYTORCH_LOG_LEVEL`.
pub fn level_from_env() -> LevelFilter {
    std::env::var("TINYTORCH_LOG_LEVEL")
        .ok()
        .and_then(|raw| parse_level(&raw))
        .unwrap_or(DEFAULT_LEVEL)
}

/// Install the JSON logger as the global `log` backend.
///
/// Calling this twice is harmless; the first logger stays installed.
pub fn init(level: LevelFilter) {
    if log::set_boxed_logger(Box::new(JsonLogger { level })).is_ok() {
        log::set_max_level(level);
    }
}
