// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Background information on miette's architecture:
//! - Miette allows customization how the report is [`Report`](https://docs.rs/miette/latest/miette/struct.Report.html)
//!   displayed to terminal output (stdout, stderr), when the global hook is activated,
//!   due to a program "erroring out", when the top-level miette handler in
//!   `main() -> miette::Result<_>` is activated. This hook is only activated at the time
//!   that the error is displayed to terminal output, not when it is registered, it is
//!   lazy. So it is possible to detect the terminal width just before the output is
//!   generated.
//! - Using the [`MietteHandlerOpts`
//!   struct](https://docs.rs/miette/latest/miette/struct.MietteHandlerOpts.html) you can
//!   configure the default `MietteHandler`.

use miette::MietteHandlerOpts;
use rustix::termios;
use tracing::debug;

const DEFAULT_TERMINAL_WIDTH: usize = 80;

/// Columns of the terminal attached to stderr, or [`DEFAULT_TERMINAL_WIDTH`] when stderr
/// isn't a terminal.
#[must_use]
pub fn get_terminal_width() -> usize {
    termios::tcgetwinsize(std::io::stderr())
        .ok()
        .map(|winsize| usize::from(winsize.ws_col))
        .filter(|cols| *cols > 0)
        .unwrap_or(DEFAULT_TERMINAL_WIDTH)
}

/// The [`miette::ErrorHook`] is lazily evaluated.
///
/// The terminal width will be calculated just at the time of the global error handler
/// being used. So if an error never occurs, then the terminal width will never be
/// calculated.
pub fn setup_default_miette_global_report_handler(issues_url: &'static str) {
    miette::set_hook(Box::new(move |_report| {
        let terminal_width = {
            let it = get_terminal_width();
            debug!("miette::set_hook -> terminal_width: {}", it);
            it
        };
        Box::new(
            MietteHandlerOpts::new()
                .width(terminal_width)
                .wrap_lines(true)
                .terminal_links(false)
                .unicode(true)
                .context_lines(3)
                .tab_width(4)
                .break_words(true)
                .with_cause_chain()
                .footer(issues_url.to_string())
                .build(),
        )
    }))
    .ok();
}
