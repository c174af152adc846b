// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # r3bl_key_reader
//!
//! Interactive terminal key diagnostic. Press keys and see exactly what the terminal
//! sends for each one:
//!
//! ```text
//! $ key_reader
//! Press a key
//!
//!               hex:   1B  char: \c[  (or \e)
//! (  0.062 ms)  hex:   5B  char: [
//! (  0.031 ms)  hex:   41  char: A
//! bind \e\[A 'do something'
//! ```
//!
//! - Diagnostics (the prompt, one line per character, warnings) go to stderr.
//! - Ready to paste `bind` commands go to stdout. When the trailing bytes match a key
//!   capability from the terminfo database (or the built-in xterm table), a
//!   `bind -k <name>` line comes first.
//! - Without `--continuous` the program stops at the first pause after some input.
//!   With it, type `exit` or `quit`, or press the interrupt or EOF key twice in a row.
//!
//! The terminal is put in a key reader mode (like raw mode, but output processing
//! stays on) and restored exactly once on every way out, see [`TerminalModeGuard`].
//!
//! Logging is off by default. Pass `--debug-level` to write a log file, see
//! [`try_initialize_logging_global`].

// Enforce strict error handling in production library code only.
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach modules.
pub mod core;
pub mod key_reader;

// Re-export.
pub use crate::core::*;
pub use key_reader::*;
