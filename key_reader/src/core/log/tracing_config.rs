// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use tracing_core::LevelFilter;

pub const DEFAULT_LOG_FILE_NAME: &str = "log.txt";

/// Highest accepted `--debug-level`.
pub const MAX_DEBUG_LEVEL: u8 = 10;

/// Configure the tracing logging. Logs only ever go to a file: the terminal is this
/// program's output surface.
///
/// Fields:
/// - `writer_config`: [`WriterConfig`] to choose where to write the logs.
/// - `level_filter`: [`LevelFilter`], [`LevelFilter::OFF`] disables logging.
#[derive(Debug, Clone, PartialEq)]
pub struct TracingConfig {
    pub writer_config: WriterConfig,
    pub level_filter: LevelFilter,
}

/// - `File`: the file path to use for the log file. Eg: `/tmp/key_reader.log` or
///   `log.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriterConfig {
    None,
    File(String /* tracing_log_file_path */),
}

impl TracingConfig {
    #[must_use]
    pub fn new_file(filename: Option<String>, level_filter: LevelFilter) -> Self {
        Self {
            writer_config: WriterConfig::File(
                filename.unwrap_or_else(|| DEFAULT_LOG_FILE_NAME.to_string()),
            ),
            level_filter,
        }
    }

    #[must_use]
    pub fn get_writer_config(&self) -> WriterConfig { self.writer_config.clone() }

    #[must_use]
    pub fn get_level_filter(&self) -> LevelFilter { self.level_filter }
}

/// Map the numeric `--debug-level` (`0..=10`) to a [`LevelFilter`]:
///
/// | level | filter  |
/// | :---- | :------ |
/// | 0     | `OFF`   |
/// | 1     | `ERROR` |
/// | 2     | `WARN`  |
/// | 3     | `INFO`  |
/// | 4     | `DEBUG` |
/// | 5+    | `TRACE` |
#[must_use]
pub fn level_filter_from_debug_level(debug_level: u8) -> LevelFilter {
    match debug_level {
        0 => LevelFilter::OFF,
        1 => LevelFilter::ERROR,
        2 => LevelFilter::WARN,
        3 => LevelFilter::INFO,
        4 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}
