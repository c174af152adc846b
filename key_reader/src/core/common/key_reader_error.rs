// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Fatal errors surfaced before (or around) the key reading session. Decoding and
//! formatting have no error cases; everything here is an OS boundary failure.
//!
//! For more information on error types, see:
//! 1. [Article](https://developerlife.com/2024/06/10/rust-miette-error-handling/)
//! 2. [Video](https://youtu.be/TmLF7vI8lKk)

/// Type alias to make it easy to work with [`miette::Result`] in this crate.
pub type CommonResult<T> = miette::Result<T>;

/// Errors that stop the program. Each variant has a [diagnostic code] and help text so
/// that the global [`miette`] report handler can render something actionable.
///
/// [diagnostic code]: miette::Diagnostic::code
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum KeyReaderError {
    #[error("Stdin must be attached to a tty")]
    #[diagnostic(
        code(r3bl_key_reader::stdin_not_a_tty),
        help("Run this program directly in an interactive terminal, without pipes or redirects")
    )]
    StdinNotATty,

    #[error("Failed to {action} terminal attributes")]
    #[diagnostic(code(r3bl_key_reader::terminal_attributes))]
    TerminalAttributes {
        /// Eg: `"read"`, `"set"`, `"restore"`.
        action: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to set up polling on stdin")]
    #[diagnostic(
        code(r3bl_key_reader::poll_setup),
        help("This usually means the system ran out of file descriptors")
    )]
    PollSetup(#[source] std::io::Error),

    #[error("Failed to write to the terminal")]
    #[diagnostic(code(r3bl_key_reader::io))]
    Io(#[from] std::io::Error),
}

impl KeyReaderError {
    #[must_use]
    pub fn terminal_attributes(action: &'static str, source: impl Into<std::io::Error>) -> Self {
        KeyReaderError::TerminalAttributes {
            action,
            source: source.into(),
        }
    }
}
