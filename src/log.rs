//! The module responsible for configuring the program logger.
//!
//! Messages at `warn` level and above are written to stderr and other messages to stdout. When an
//! output folder is given, messages are also written to log files in that folder.
use anyhow::{Result, bail};
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{LevelFilter, Record};
use std::env;
use std::fmt::{Arguments, Display};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::OnceLock;

/// The default log level for the program.
///
/// Used as a fallback if the user hasn't specified something else with the `FUELCOST_LOG_LEVEL`
/// environment variable or the settings file.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// The file name for the log file containing messages about the ordinary operation of fuelcost
const LOG_INFO_FILE_NAME: &str = "fuelcost_info.log";

/// The file name for the log file containing warnings and error messages
const LOG_ERROR_FILE_NAME: &str = "fuelcost_error.log";

/// Used to indicate whether the logger has already been initialised
static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// Whether the program logger has been initialised
pub fn is_logger_initialised() -> bool {
    LOGGER_INIT.get().is_some()
}

/// Parse a log level from a string, ignoring case
fn parse_log_level(s: &str) -> Result<LevelFilter> {
    let level = match s.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => bail!("Unknown log level: {s}"),
    };

    Ok(level)
}

/// Initialise the program logger using the `fern` logging library with colourised output.
///
/// The user can specify their preferred logging level via the settings file (defaults to `info`
/// if not present) or with the `FUELCOST_LOG_LEVEL` environment variable. If both are provided,
/// the environment variable takes precedence.
///
/// Calling this function more than once has no effect.
///
/// # Arguments
///
/// * `log_level_from_settings`: The log level specified in the program settings
/// * `log_file_path`: The folder to save log files to, if any
pub fn init(log_level_from_settings: &str, log_file_path: Option<&Path>) -> Result<()> {
    if is_logger_initialised() {
        return Ok(());
    }

    // Environment variable takes precedence over the settings file
    let log_level = env::var("FUELCOST_LOG_LEVEL")
        .unwrap_or_else(|_| log_level_from_settings.to_string());
    let log_level = parse_log_level(&log_level)?;

    // Set up colours for log levels
    let colours = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);

    // Only colourise output when writing to a terminal
    let stdout_colours = std::io::stdout().is_terminal().then_some(colours);
    let stderr_colours = std::io::stderr().is_terminal().then_some(colours);

    let mut dispatch = Dispatch::new()
        .chain(
            Dispatch::new()
                .level(log_level)
                .filter(|metadata| metadata.level() > log::Level::Warn)
                .format(move |out, message, record| {
                    format_message(out, message, record, stdout_colours);
                })
                .chain(std::io::stdout()),
        )
        .chain(
            Dispatch::new()
                .level(log_level.min(LevelFilter::Warn))
                .format(move |out, message, record| {
                    format_message(out, message, record, stderr_colours);
                })
                .chain(std::io::stderr()),
        );

    if let Some(log_file_path) = log_file_path {
        dispatch = dispatch
            .chain(
                Dispatch::new()
                    .level(log_level)
                    .filter(|metadata| metadata.level() > log::Level::Warn)
                    .format(|out, message, record| format_message(out, message, record, None))
                    .chain(fern::log_file(log_file_path.join(LOG_INFO_FILE_NAME))?),
            )
            .chain(
                Dispatch::new()
                    .level(log_level.min(LevelFilter::Warn))
                    .format(|out, message, record| format_message(out, message, record, None))
                    .chain(fern::log_file(log_file_path.join(LOG_ERROR_FILE_NAME))?),
            );
    }

    dispatch.apply()?;
    let _ = LOGGER_INIT.set(());

    Ok(())
}

/// Write a timestamped log message, with the level in colour if `colours` is given
fn format_message(
    out: FormatCallback,
    message: &Arguments,
    record: &Record,
    colours: Option<ColoredLevelConfig>,
) {
    match colours {
        Some(colours) => write_log(out, colours.color(record.level()), record.target(), message),
        None => write_log(out, record.level(), record.target(), message),
    }
}

fn write_log(out: FormatCallback, level: impl Display, target: &str, message: &Arguments) {
    let timestamp = Local::now().format("%H:%M:%S");
    out.finish(format_args!("[{timestamp} {level} {target}] {message}"));
}
