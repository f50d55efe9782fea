//! Logging backend
//!
//! All modules log through the `log` facade. This module wires the facade to
//! flexi_logger with the formats the host supports:
//!
//! - `text`: `YYYY-MM-DD HH:mm:ss.fff INF message`
//! - `ext`:  text plus the emitting module as a path (`plugin/resolver.rs:42`)
//! - `json`: one compact JSON object per line

use flexi_logger::{DeferredNow, FileSpec, Logger, LoggerHandle};
use std::sync::{Mutex, OnceLock};

static LOGGER_HANDLE: OnceLock<Mutex<LoggerHandle>> = OnceLock::new();

/// Log output format selected by configuration or the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Extended,
    Json,
}

impl LogFormat {
    /// Parse a format name, falling back to `Text` for unknown values
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(str::to_ascii_lowercase).as_deref() {
            Some("json") => LogFormat::Json,
            Some("ext") | Some("extended") => LogFormat::Extended,
            _ => LogFormat::Text,
        }
    }
}

/// Start the global logger.
///
/// Level, format, color and file destination are fixed once the logger has
/// started. Can only succeed once per process; later calls return the
/// flexi_logger error.
pub fn init_logging(
    log_level: Option<&str>,
    log_format: Option<&str>,
    log_file: Option<&str>,
    color_enabled: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut logger = Logger::try_with_str(log_level.unwrap_or("info"))?;

    logger = match (LogFormat::from_name(log_format), color_enabled) {
        (LogFormat::Json, _) => logger.format(json_format),
        (LogFormat::Extended, true) => logger.format(extended_color_format),
        (LogFormat::Extended, false) => logger.format(extended_format),
        (LogFormat::Text, true) => logger.format(text_color_format),
        (LogFormat::Text, false) => logger.format(text_format),
    };

    if let Some(file_path) = log_file {
        let file_spec = FileSpec::try_from(std::path::Path::new(file_path))?;
        logger = logger.log_to_file(file_spec);
    }

    let handle = logger.start()?;
    let _ = LOGGER_HANDLE.set(Mutex::new(handle));
    Ok(())
}

/// Flush buffered log output, if the logger has been started
pub fn flush_logging() {
    if let Some(handle) = LOGGER_HANDLE.get() {
        handle
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .flush();
    }
}

/// Map a verbosity delta (`-v` count minus `-q` count) onto a level name
pub fn level_for_verbosity(base: &str, verbosity: i8) -> &'static str {
    const LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];
    let base_index = LEVELS
        .iter()
        .position(|l| l.eq_ignore_ascii_case(base))
        .unwrap_or(3) as i16;
    let index = (base_index + verbosity as i16).clamp(0, LEVELS.len() as i16 - 1);
    LEVELS[index as usize]
}

fn level_abbr(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "ERR",
        log::Level::Warn => "WRN",
        log::Level::Info => "INF",
        log::Level::Debug => "DBG",
        log::Level::Trace => "TRC",
    }
}

fn level_colored(level: log::Level) -> colored::ColoredString {
    use colored::Colorize;

    match level {
        log::Level::Error => "ERR".red().bold(),
        log::Level::Warn => "WRN".yellow(),
        log::Level::Info => "INF".green(),
        log::Level::Debug => "DBG".blue(),
        log::Level::Trace => "TRC".magenta(),
    }
}

fn text_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} {} {}",
        now.format("%Y-%m-%d %H:%M:%S%.3f"),
        level_abbr(record.level()),
        record.args()
    )
}

fn text_color_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    use colored::Colorize;

    write!(
        w,
        "{} {} {}",
        now.format("%Y-%m-%d %H:%M:%S%.3f").to_string().dimmed(),
        level_colored(record.level()),
        record.args()
    )
}

fn extended_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} {} {} ({})",
        now.format("%Y-%m-%d %H:%M:%S%.3f"),
        level_abbr(record.level()),
        record.args(),
        format_target_as_path(record.target(), record.line())
    )
}

fn extended_color_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    use colored::Colorize;

    write!(
        w,
        "{} {} {} ({})",
        now.format("%Y-%m-%d %H:%M:%S%.3f").to_string().dimmed(),
        level_colored(record.level()),
        record.args(),
        format_target_as_path(record.target(), record.line()).dimmed()
    )
}

fn json_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    let json_obj = serde_json::json!({
        "timestamp": now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        "level": level_abbr(record.level()),
        "message": record.args().to_string(),
        "target": format_target_as_path(record.target(), record.line()),
    });

    match serde_json::to_string(&json_obj) {
        Ok(line) => w.write_all(line.as_bytes()),
        Err(_) => w.write_all(b"{\"error\":\"Failed to serialize log message\"}"),
    }
}

// plughost::plugin::resolver -> plugin/resolver.rs:42
fn format_target_as_path(target: &str, line: Option<u32>) -> String {
    let path_like = match target.strip_prefix("plughost::") {
        Some(local) => local.replace("::", "/") + ".rs",
        None => target.replace("::", "/"),
    };

    match line {
        Some(line_num) => format!("{}:{}", path_like, line_num),
        None => path_like,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn render(
        formatter: fn(&mut dyn std::io::Write, &mut DeferredNow, &log::Record) -> std::io::Result<()>,
        target: &str,
    ) -> String {
        let mut buffer = Vec::new();
        let mut now = DeferredNow::new();
        let record = log::Record::builder()
            .level(log::Level::Info)
            .target(target)
            .line(Some(42))
            .args(format_args!("Loading plugin Core"))
            .build();
        formatter(&mut buffer, &mut now, &record).expect("format succeeds");
        String::from_utf8(buffer).expect("utf-8 output")
    }

    #[test]
    fn test_text_format_has_level_and_message() {
        let output = render(text_format, "plughost::plugin::resolver");
        assert!(output.contains("INF Loading plugin Core"), "got: {}", output);
        assert!(!output.contains("resolver.rs"));
    }

    #[test]
    fn test_extended_format_includes_target_path() {
        let output = render(extended_format, "plughost::plugin::resolver");
        assert!(output.ends_with("(plugin/resolver.rs:42)"), "got: {}", output);
    }

    #[test]
    fn test_json_format_is_single_object() {
        let output = render(json_format, "plughost::host::driver");
        let value: serde_json::Value = serde_json::from_str(&output).expect("valid json");
        assert_eq!(value["level"], "INF");
        assert_eq!(value["message"], "Loading plugin Core");
        assert_eq!(value["target"], "host/driver.rs:42");
        assert!(!output.contains('\n'));
    }

    #[test]
    fn test_foreign_target_keeps_crate_prefix() {
        assert_eq!(format_target_as_path("tokio::runtime", None), "tokio/runtime");
    }

    #[test]
    fn test_log_format_from_name() {
        assert_eq!(LogFormat::from_name(Some("JSON")), LogFormat::Json);
        assert_eq!(LogFormat::from_name(Some("ext")), LogFormat::Extended);
        assert_eq!(LogFormat::from_name(Some("bogus")), LogFormat::Text);
        assert_eq!(LogFormat::from_name(None), LogFormat::Text);
    }

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for_verbosity("info", 0), "info");
        assert_eq!(level_for_verbosity("info", 1), "debug");
        assert_eq!(level_for_verbosity("info", 5), "trace");
        assert_eq!(level_for_verbosity("info", -2), "error");
        assert_eq!(level_for_verbosity("warn", -9), "off");
        assert_eq!(level_for_verbosity("nonsense", 0), "info");
    }

    #[test]
    #[serial]
    fn test_init_logging_writes_json_to_file_once() {
        let temp = tempfile::tempdir().unwrap();
        let log_path = temp.path().join("plughost.log");
        let log_file = log_path.to_string_lossy().to_string();

        init_logging(Some("info"), Some("json"), Some(&log_file), false).unwrap();
        log::info!("logger started for test");
        log::debug!("below the configured level");
        flush_logging();

        let contents = std::fs::read_to_string(&log_path).unwrap();
        let line = contents
            .lines()
            .find(|l| l.contains("logger started for test"))
            .expect("message logged to file");
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["level"], "INF");
        assert!(!contents.contains("below the configured level"));

        assert!(init_logging(Some("debug"), None, None, false).is_err());
    }
}
