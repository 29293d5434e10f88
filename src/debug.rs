//! Debug logging backend
//!
//! The library logs through the `log` facade. This module provides the
//! stderr backend the binary installs. Debug output is switched on with the
//! `CAMPAIGN_FLOW_DEBUG` environment variable (its value may name a level,
//! e.g. `trace`); otherwise only warnings and errors are shown.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Environment variable enabling debug output
pub const DEBUG_ENV: &str = "CAMPAIGN_FLOW_DEBUG";

/// Debug log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Every traversal step
    Trace,
    /// Development debugging information
    Debug,
    /// Important state changes
    Info,
    /// Recovered problems
    Warn,
    /// Error situations
    Error,
}

impl LogLevel {
    fn from_env_value(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Self::Trace,
            "info" => Self::Info,
            "warn" => Self::Warn,
            "error" => Self::Error,
            _ => Self::Debug,
        }
    }

    pub fn to_filter(self) -> log::LevelFilter {
        match self {
            Self::Trace => log::LevelFilter::Trace,
            Self::Debug => log::LevelFilter::Debug,
            Self::Info => log::LevelFilter::Info,
            Self::Warn => log::LevelFilter::Warn,
            Self::Error => log::LevelFilter::Error,
        }
    }
}

/// Debug log category, derived from the module a record comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DebugCategory {
    /// Tokenizing and segmenting
    Parser,
    /// Tree building and edits
    Tree,
    /// Flow state replay
    Flow,
    /// Validation rules
    Validation,
    /// Campaign analysis
    Analysis,
    /// Anything else, including the CLI
    Other,
}

impl DebugCategory {
    pub const ALL: [DebugCategory; 6] = [
        Self::Parser,
        Self::Tree,
        Self::Flow,
        Self::Validation,
        Self::Analysis,
        Self::Other,
    ];

    pub fn from_target(target: &str) -> Self {
        let module = target
            .strip_prefix("campaign_flow::")
            .and_then(|rest| rest.split("::").next())
            .unwrap_or("");
        match module {
            "parser" => Self::Parser,
            "tree" => Self::Tree,
            "flow" => Self::Flow,
            "validation" => Self::Validation,
            "analysis" => Self::Analysis,
            _ => Self::Other,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Enable debug logging
    pub enabled: bool,
    /// Minimum log level while enabled
    pub level: LogLevel,
    /// Enabled categories
    pub categories: BTreeSet<DebugCategory>,
}

impl Default for DebugConfig {
    fn default() -> Self {
        let env = std::env::var(DEBUG_ENV).ok();
        Self {
            enabled: env.is_some(),
            level: env
                .as_deref()
                .map_or(LogLevel::Debug, LogLevel::from_env_value),
            categories: DebugCategory::ALL.into_iter().collect(),
        }
    }
}

impl DebugConfig {
    /// Effective maximum level: the configured one when enabled, warnings otherwise
    pub fn max_level(&self) -> log::LevelFilter {
        if self.enabled {
            self.level.to_filter()
        } else {
            log::LevelFilter::Warn
        }
    }
}

/// `log` backend writing to stderr
pub struct StderrLogger {
    max_level: log::LevelFilter,
    categories: BTreeSet<DebugCategory>,
}

impl StderrLogger {
    pub fn new(config: &DebugConfig) -> Self {
        Self {
            max_level: config.max_level(),
            categories: config.categories.clone(),
        }
    }
}

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        if metadata.level() > self.max_level {
            return false;
        }
        // warnings and errors ignore category filtering
        metadata.level() <= log::Level::Warn
            || self
                .categories
                .contains(&DebugCategory::from_target(metadata.target()))
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let category = format!("{:?}", DebugCategory::from_target(record.target()));
        eprintln!("[{}] {:10} {}", record.level(), category, record.args());
    }

    fn flush(&self) {}
}

/// Install the stderr backend as the global logger.
pub fn init(config: &DebugConfig) -> Result<(), log::SetLoggerError> {
    log::set_boxed_logger(Box::new(StderrLogger::new(config)))?;
    log::set_max_level(config.max_level());
    Ok(())
}
