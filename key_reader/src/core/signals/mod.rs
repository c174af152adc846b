// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Process-wide, async-signal-safe shutdown state.
//!
//! ```text
//!   signal ─▶ handler ─┬─ write notice to stderr (one write(2), no allocation)
//!                      ├─ SIGHUP | SIGTERM | SIGABRT | SIGSEGV ─▶ KEEP_RUNNING = false
//!                      ├─ SIGINT ─▶ INTERRUPT_LATCHED = true
//!                      └─ chain to the handler saved when ours was installed
//!
//!   session loop ─▶ reads KEEP_RUNNING once per iteration
//!                ─▶ test-and-clears INTERRUPT_LATCHED before each read
//! ```
//!
//! The only code that runs in signal context is [`handle_signal`], the notice formatting
//! it calls, and the call to the previous handler. All of it stays on the stack and only
//! touches atomics.

mod signal_handler;

pub use signal_handler::*;
