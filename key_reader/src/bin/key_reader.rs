// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use clap::Parser;
use r3bl_key_reader::{CLIArg, CommonResult, ISSUES_URL, KeyReaderConfig, TracingConfig,
                      run_app, setup_default_miette_global_report_handler,
                      try_initialize_logging_global};

fn main() -> CommonResult<()> {
    // Invalid flags or positional arguments print the usage and exit with status 2.
    let cli_arg = CLIArg::parse();
    let config = KeyReaderConfig::from(cli_arg);

    setup_default_miette_global_report_handler(ISSUES_URL);

    // Logging is best effort: a log file that can't be created doesn't stop the program.
    try_initialize_logging_global(TracingConfig::from(&config)).ok();
    // % is Display, ? is Debug.
    tracing::debug!(message = "Start logging...", config = ?config);

    let outcome = run_app(&config)?;

    tracing::debug!(message = "Stop logging...", outcome = ?outcome);
    Ok(())
}
