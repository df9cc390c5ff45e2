// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;

/// Read a boolean preference from the environment, falling back to `default`
fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileProcessorPreferences {
    /// Reject files whose extension is not in `allowed_extensions`
    pub require_known_extension: bool,

    /// Extensions accepted when `require_known_extension` is set (no leading dot)
    pub allowed_extensions: Vec<String>,

    /// Whether to log file metadata when a source is opened
    pub enable_performance_logging: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_known_extension: env_flag(env_vars::REQUIRE_KNOWN_EXTENSION, false),
            allowed_extensions: env::var(env_vars::ALLOWED_EXTENSIONS)
                .ok()
                .map(|v| parse_extension_list(&v))
                .unwrap_or_else(|| {
                    ["ini", "cfg", "conf"].iter().map(|s| s.to_string()).collect()
                }),
            enable_performance_logging: env_flag(env_vars::ENABLE_PERFORMANCE_LOGGING, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexicalPreferences {
    /// Whether to collect per-kind token metrics
    pub collect_detailed_metrics: bool,

    /// Whether each lexical Error token is reported as a warning event
    pub log_lexical_errors: bool,

    /// Whether to log a summary event when EndOfStream is reached
    pub log_completion_summary: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            collect_detailed_metrics: env_flag(env_vars::LEXICAL_DETAILED_METRICS, true),
            log_lexical_errors: env_flag(env_vars::LEXICAL_LOG_ERRORS, true),
            log_completion_summary: env_flag(env_vars::LEXICAL_LOG_SUMMARY, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging (user preference)
    pub use_structured_logging: bool,

    /// User preferred minimum log level
    pub min_log_level: LogLevel,

    /// Whether to include file context in log messages
    pub include_file_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_flag(env_vars::LOGGING_USE_STRUCTURED, false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Warning),
            include_file_context: env_flag(env_vars::LOGGING_INCLUDE_FILE_CONTEXT, true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Convert to events::LogLevel for compatibility
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

/// Split a comma separated extension list, dropping leading dots and blanks
fn parse_extension_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub file_processor: FileProcessorPreferences,
    pub lexical: LexicalPreferences,
    pub logging: LoggingPreferences,
}

/// Environment variable names for configuration
pub mod env_vars {
    // File Processor
    pub const REQUIRE_KNOWN_EXTENSION: &str = "MODCFG_REQUIRE_KNOWN_EXTENSION";
    pub const ALLOWED_EXTENSIONS: &str = "MODCFG_ALLOWED_EXTENSIONS";
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "MODCFG_ENABLE_PERFORMANCE_LOGGING";

    // Lexical
    pub const LEXICAL_DETAILED_METRICS: &str = "MODCFG_LEXICAL_DETAILED_METRICS";
    pub const LEXICAL_LOG_ERRORS: &str = "MODCFG_LEXICAL_LOG_ERRORS";
    pub const LEXICAL_LOG_SUMMARY: &str = "MODCFG_LEXICAL_LOG_SUMMARY";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "MODCFG_LOGGING_USE_STRUCTURED";
    pub const LOGGING_MIN_LEVEL: &str = "MODCFG_LOGGING_MIN_LEVEL";
    pub const LOGGING_INCLUDE_FILE_CONTEXT: &str = "MODCFG_LOGGING_INCLUDE_FILE_CONTEXT";
}
