//! Pluggable log sink for host applications.
//!
//! The engine logs recovered failures (storage trouble, malformed blobs,
//! panicking listeners) through the [`log`] crate facade. Hosts that want to
//! see those messages implement [`Logger`] and install it once with
//! [`set_logger`]; hosts that do not care simply never call it, and messages
//! fall through to stderr.

use std::sync::{Arc, OnceLock};

/// A sink receiving engine log messages.
///
/// # Examples
///
/// ```rust
/// use mockbase_core::logger::{LogLevel, Logger};
///
/// struct PrintLogger;
///
/// impl Logger for PrintLogger {
///     fn log(&self, level: LogLevel, message: String) {
///         println!("[{level:?}] {message}");
///     }
/// }
/// ```
pub trait Logger: Sync + Send {
    /// Records one message at the given severity.
    fn log(&self, level: LogLevel, message: String);
}

/// Severity levels forwarded to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Very low priority, extremely detailed messages.
    Trace,
    /// Debugging information.
    Debug,
    /// Progress of the engine.
    Info,
    /// Potentially harmful situations (recovered failures land here).
    Warn,
    /// Errors the engine recovered from but could not hide.
    Error,
}

/// Bridges the `log` crate to the user-provided sink.
struct ForeignLogger;

impl log::Log for ForeignLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        // Debug/trace chatter from other crates is not ours to forward.
        let from_mockbase = record
            .module_path()
            .is_some_and(|module_path| module_path.starts_with("mockbase"));
        let debug_or_trace = record.level() == log::Level::Debug
            || record.level() == log::Level::Trace;
        if debug_or_trace && !from_mockbase {
            return;
        }

        if let Some(sink) = SINK.get() {
            sink.log(log_level(record.level()), format!("{}", record.args()));
        } else {
            eprintln!("{}: {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

const fn log_level(level: log::Level) -> LogLevel {
    match level {
        log::Level::Error => LogLevel::Error,
        log::Level::Warn => LogLevel::Warn,
        log::Level::Info => LogLevel::Info,
        log::Level::Debug => LogLevel::Debug,
        log::Level::Trace => LogLevel::Trace,
    }
}

static SINK: OnceLock<Arc<dyn Logger>> = OnceLock::new();

/// Installs the global log sink. Call at most once, before engine use.
///
/// A second call is ignored with a note on stdout; the first sink stays
/// installed.
pub fn set_logger(logger: Arc<dyn Logger>) {
    if SINK.set(logger).is_err() {
        println!("mockbase logger already set");
    }

    if let Err(err) = init_logger() {
        eprintln!("failed to set mockbase logger: {err}");
    }
}

fn init_logger() -> Result<(), log::SetLoggerError> {
    static LOGGER: ForeignLogger = ForeignLogger;
    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct CollectingLogger {
        messages: Mutex<Vec<(LogLevel, String)>>,
    }

    impl Logger for CollectingLogger {
        fn log(&self, level: LogLevel, message: String) {
            self.messages.lock().unwrap().push((level, message));
        }
    }

    #[test]
    fn installed_sink_receives_warnings() {
        let collector = Arc::new(CollectingLogger {
            messages: Mutex::new(Vec::new()),
        });
        set_logger(collector.clone());

        log::warn!("mockbase logger probe");

        let messages = collector.messages.lock().unwrap();
        assert!(messages
            .iter()
            .any(|(level, message)| *level == LogLevel::Warn
                && message.contains("logger probe")));
    }
}
