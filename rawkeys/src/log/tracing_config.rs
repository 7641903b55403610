// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use tracing_core::LevelFilter;

/// Default log file, in the current directory.
pub const DEFAULT_LOG_FILE_PATH: &str = "rawkeys.log";

/// Where log output goes, and how much of it.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub writer_config: WriterConfig,
    pub level_filter: LevelFilter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriterConfig {
    None,
    Display(DisplayPreference),
    File(String /* log file path */),
    DisplayAndFile(DisplayPreference, String /* log file path */),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPreference {
    Stdout,
    Stderr,
}

impl TracingConfig {
    #[must_use]
    pub fn new_file(path: Option<String>, level_filter: LevelFilter) -> Self {
        Self {
            writer_config: WriterConfig::File(
                path.unwrap_or_else(|| DEFAULT_LOG_FILE_PATH.to_string()),
            ),
            level_filter,
        }
    }

    #[must_use]
    pub fn new_display(preferred_display: DisplayPreference, level_filter: LevelFilter) -> Self {
        Self {
            writer_config: WriterConfig::Display(preferred_display),
            level_filter,
        }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self {
            writer_config: WriterConfig::None,
            level_filter: LevelFilter::OFF,
        }
    }

    #[must_use]
    pub fn get_writer_config(&self) -> WriterConfig { self.writer_config.clone() }

    #[must_use]
    pub fn get_level_filter(&self) -> LevelFilter { self.level_filter }
}
