// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::SessionMode;
use crate::{DEFAULT_ESCAPE_DELAY_MS, DEFAULT_LOG_FILE_NAME, ESCAPE_DELAY_RANGE_MS,
            MAX_DEBUG_LEVEL, TracingConfig, level_filter_from_debug_level};
use clap::{Args, Parser};
use std::time::Duration;
use tracing_core::LevelFilter;

/// More info: <https://docs.rs/clap/latest/clap/_derive/_tutorial/chapter_2/index.html>
#[derive(Debug, Parser)]
#[command(bin_name = "key_reader")]
#[command(
    about = "Shows the hex code, symbolic name, and timing of every key you press, and suggests a `bind` command for it"
)]
#[command(version)]
#[command(next_line_help = true)]
#[command(arg_required_else_help(false))]
/// More info: <https://docs.rs/clap/latest/clap/struct.Command.html#method.help_template>
#[command(
    help_template = "{about}\nVersion: {bin} {version}\n\nUSAGE:\n  key_reader [\x1b[34moptions\x1b[0m]\n\n[options]\n{options}"
)]
pub struct CLIArg {
    #[command(flatten)]
    pub global_options: GlobalOption,
}

#[derive(Debug, Args)]
pub struct GlobalOption {
    #[arg(
        long,
        short = 'c',
        help = "Keep reading keys until you type `exit` or `quit`, or press the interrupt or EOF key twice in a row"
    )]
    pub continuous: bool,

    #[arg(
        long,
        short = 'd',
        default_value_t = 0,
        value_parser = clap::value_parser!(u8).range(0..=i64::from(MAX_DEBUG_LEVEL)),
        help = "Log verbosity, 0 (off) to 10; 1 is errors only, 5 and above is everything"
    )]
    pub debug_level: u8,

    #[arg(
        long,
        short = 'l',
        default_value = DEFAULT_LOG_FILE_NAME,
        help = "File to write the log to, when logging is enabled with `--debug-level`"
    )]
    pub log_file: String,

    #[arg(
        long,
        short = 'e',
        default_value_t = DEFAULT_ESCAPE_DELAY_MS,
        value_parser = clap::value_parser!(u64).range(ESCAPE_DELAY_RANGE_MS),
        help = "Milliseconds of silence that end a burst of input (10 to 5000)"
    )]
    pub escape_delay_ms: u64,
}

/// Validated settings for one run of the key reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyReaderConfig {
    pub mode: SessionMode,
    pub level_filter: LevelFilter,
    pub log_file: String,
    pub escape_delay: Duration,
}

impl Default for KeyReaderConfig {
    fn default() -> Self {
        Self {
            mode: SessionMode::SingleShot,
            level_filter: LevelFilter::OFF,
            log_file: DEFAULT_LOG_FILE_NAME.to_string(),
            escape_delay: Duration::from_millis(DEFAULT_ESCAPE_DELAY_MS),
        }
    }
}

impl From<CLIArg> for KeyReaderConfig {
    fn from(cli_arg: CLIArg) -> Self {
        let GlobalOption {
            continuous,
            debug_level,
            log_file,
            escape_delay_ms,
        } = cli_arg.global_options;

        Self {
            mode: if continuous {
                SessionMode::Continuous
            } else {
                SessionMode::SingleShot
            },
            level_filter: level_filter_from_debug_level(debug_level),
            log_file,
            escape_delay: Duration::from_millis(escape_delay_ms),
        }
    }
}

impl From<&KeyReaderConfig> for TracingConfig {
    fn from(config: &KeyReaderConfig) -> Self {
        TracingConfig::new_file(Some(config.log_file.clone()), config.level_filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WriterConfig;
    use clap::error::ErrorKind;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn parse(args: &[&str]) -> Result<KeyReaderConfig, clap::Error> {
        CLIArg::try_parse_from(std::iter::once("key_reader").chain(args.iter().copied()))
            .map(KeyReaderConfig::from)
    }

    #[test]
    fn test_defaults() {
        assert_eq!(parse(&[]).unwrap(), KeyReaderConfig::default());
    }

    #[test]
    fn test_all_flags() {
        let config = parse(&["-c", "-d", "4", "-l", "keys.log", "-e", "120"]).unwrap();
        assert_eq!(config, KeyReaderConfig {
            mode: SessionMode::Continuous,
            level_filter: LevelFilter::DEBUG,
            log_file: "keys.log".to_string(),
            escape_delay: Duration::from_millis(120),
        });
    }

    #[test]
    fn test_long_flags() {
        let config = parse(&[
            "--continuous",
            "--debug-level=10",
            "--log-file=/tmp/k.txt",
            "--escape-delay-ms=5000",
        ])
        .unwrap();
        assert_eq!(config.mode, SessionMode::Continuous);
        assert_eq!(config.level_filter, LevelFilter::TRACE);
        assert_eq!(config.log_file, "/tmp/k.txt");
        assert_eq!(config.escape_delay, Duration::from_secs(5));
    }

    #[test_case(&["-d", "11"]; "debug level too high")]
    #[test_case(&["-d", "-1"]; "debug level negative")]
    #[test_case(&["-e", "9"]; "escape delay too short")]
    #[test_case(&["-e", "5001"]; "escape delay too long")]
    #[test_case(&["-e", "abc"]; "escape delay not a number")]
    fn test_out_of_range_values_are_rejected(args: &[&str]) {
        assert!(parse(args).is_err());
    }

    #[test]
    fn test_positional_arguments_are_rejected() {
        let error = parse(&["extra"]).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_tracing_config_from_key_reader_config() {
        let config = parse(&["-d", "2", "-l", "k.txt"]).unwrap();
        let tracing_config = TracingConfig::from(&config);
        assert_eq!(tracing_config.get_level_filter(), LevelFilter::WARN);
        assert_eq!(
            tracing_config.get_writer_config(),
            WriterConfig::File("k.txt".to_string())
        );
    }
}
