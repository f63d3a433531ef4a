//! Named loggers with a process-wide level and pluggable handlers.
//!
//! Each subsystem owns one [`Logger`] (for example `@folio/store`). Messages
//! go to the logger's handler, which by default prints
//! `[<timestamp>]  <name>: <message>` to stdout, or to stderr for warnings
//! and errors. An optional user handler sees every message at or above its
//! own threshold, which is how applications forward records elsewhere.
//! Records that pass the logger's level are also emitted on the `log` facade
//! with the logger name as target.

use chrono::{SecondsFormat, Utc};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, LazyLock, Mutex, RwLock, Weak};

static GLOBAL_LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);
static INSTANCES: LazyLock<Mutex<Vec<Weak<LoggerInner>>>> =
    LazyLock::new(|| Mutex::new(Vec::new()));

type SharedLogHandler = Arc<dyn Fn(&Logger, LogLevel, &str) + Send + Sync + 'static>;

#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

struct LoggerInner {
    name: String,
    log_level: AtomicU8,
    log_handler: RwLock<SharedLogHandler>,
    user_log_handler: RwLock<Option<SharedLogHandler>>,
}

impl Logger {
    pub fn new(name: impl Into<String>) -> Self {
        let inner = Arc::new(LoggerInner {
            name: name.into(),
            log_level: AtomicU8::new(GLOBAL_LOG_LEVEL.load(Ordering::SeqCst)),
            log_handler: RwLock::new(Arc::new(default_log_handler) as SharedLogHandler),
            user_log_handler: RwLock::new(None),
        });
        if let Ok(mut instances) = INSTANCES.lock() {
            instances.push(Arc::downgrade(&inner));
        }
        Self { inner }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn log_level(&self) -> LogLevel {
        LogLevel::from_u8(self.inner.log_level.load(Ordering::SeqCst))
    }

    pub fn set_log_level(&self, level: LogLevel) {
        self.inner.log_level.store(level as u8, Ordering::SeqCst);
    }

    /// Replaces the handler that formats and prints messages.
    pub fn set_log_handler<F>(&self, handler: F)
    where
        F: Fn(&Logger, LogLevel, &str) + Send + Sync + 'static,
    {
        if let Ok(mut slot) = self.inner.log_handler.write() {
            *slot = Arc::new(handler);
        }
    }

    pub fn reset_log_handler(&self) {
        self.set_log_handler(default_log_handler);
    }

    fn set_user_log_handler(&self, handler: Option<SharedLogHandler>) {
        if let Ok(mut slot) = self.inner.user_log_handler.write() {
            *slot = handler;
        }
    }

    pub fn has_user_log_handler(&self) -> bool {
        self.inner
            .user_log_handler
            .read()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }

    pub fn debug(&self, message: impl AsRef<str>) {
        self.dispatch(LogLevel::Debug, message.as_ref());
    }

    pub fn log(&self, message: impl AsRef<str>) {
        self.dispatch(LogLevel::Verbose, message.as_ref());
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.dispatch(LogLevel::Info, message.as_ref());
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        self.dispatch(LogLevel::Warn, message.as_ref());
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.dispatch(LogLevel::Error, message.as_ref());
    }

    fn dispatch(&self, level: LogLevel, message: &str) {
        let user_handler = self
            .inner
            .user_log_handler
            .read()
            .ok()
            .and_then(|slot| slot.clone());
        if let Some(handler) = user_handler {
            handler(self, level, message);
        }
        let handler = self.inner.log_handler.read().ok().map(|slot| slot.clone());
        if let Some(handler) = handler {
            handler(self, level, message);
        }
        if level >= self.log_level() {
            forward_to_log_facade(self.name(), level, message);
        }
    }
}

/// Mirrors a record onto the `log` facade, targeted at the logger's name.
fn forward_to_log_facade(target: &str, level: LogLevel, message: &str) {
    let level = match level {
        LogLevel::Debug => log::Level::Debug,
        LogLevel::Verbose => log::Level::Trace,
        LogLevel::Info => log::Level::Info,
        LogLevel::Warn => log::Level::Warn,
        LogLevel::Error => log::Level::Error,
        LogLevel::Silent => return,
    };
    log::log!(target: target, level, "{message}");
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name())
            .field("level", &self.log_level())
            .finish()
    }
}

fn default_log_handler(logger: &Logger, level: LogLevel, message: &str) {
    if level < logger.log_level() || level == LogLevel::Silent {
        return;
    }

    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let line = format!("[{now}]  {}: {message}", logger.name());
    match level {
        LogLevel::Warn | LogLevel::Error => eprintln!("{line}"),
        _ => println!("{line}"),
    }
}

fn with_instances<F>(mut f: F)
where
    F: FnMut(Logger),
{
    let Ok(mut instances) = INSTANCES.lock() else {
        return;
    };
    instances.retain(|weak| match weak.upgrade() {
        Some(inner) => {
            f(Logger { inner });
            true
        }
        None => false,
    });
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LogLevel {
    Debug = 0,
    Verbose = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Silent = 5,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Verbose => "verbose",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Silent => "silent",
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Debug,
            1 => LogLevel::Verbose,
            2 => LogLevel::Info,
            3 => LogLevel::Warn,
            4 => LogLevel::Error,
            _ => LogLevel::Silent,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

impl FromStr for LogLevel {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "verbose" => Ok(LogLevel::Verbose),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "silent" => Ok(LogLevel::Silent),
            other => Err(LogError::InvalidLogLevel(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    InvalidLogLevel(String),
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogError::InvalidLogLevel(level) => write!(f, "Invalid log level \"{level}\""),
        }
    }
}

impl std::error::Error for LogError {}

/// A record handed to a user log handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    pub logger: String,
}

pub type LogCallback = Arc<dyn Fn(LogRecord) + Send + Sync + 'static>;

/// Sets the level of every live logger and of loggers created afterwards.
pub fn set_log_level(level: LogLevel) {
    GLOBAL_LOG_LEVEL.store(level as u8, Ordering::SeqCst);
    with_instances(|logger| logger.set_log_level(level));
}

/// Parses `level` (`"debug"`, `"warn"`, ...) and applies it globally.
pub fn set_log_level_str(level: &str) -> Result<(), LogError> {
    set_log_level(level.parse()?);
    Ok(())
}

/// Installs or clears a callback on every live logger.
///
/// With `threshold` unset the callback follows each logger's own level.
pub fn set_user_log_handler(callback: Option<LogCallback>, threshold: Option<LogLevel>) {
    with_instances(|logger| {
        let handler = callback.clone().map(|callback| {
            Arc::new(move |instance: &Logger, level: LogLevel, message: &str| {
                if level < threshold.unwrap_or_else(|| instance.log_level()) {
                    return;
                }
                callback(LogRecord {
                    level,
                    message: message.to_string(),
                    logger: instance.name().to_string(),
                });
            }) as SharedLogHandler
        });
        logger.set_user_log_handler(handler);
    });
}
