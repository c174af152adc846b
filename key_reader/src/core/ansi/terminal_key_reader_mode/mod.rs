// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Terminal mode used while reading keys.
//!
//! This is close to raw mode, with two differences that matter for a key diagnostic
//! tool:
//!
//! | Flag                | Raw mode | Key reader mode | Effect                              |
//! | :------------------ | :------- | :-------------- | :---------------------------------- |
//! | `ICANON`, `ECHO`    | off      | off             | bytes arrive one at a time, silently |
//! | `ISIG`              | off      | off             | `ctrl-c` arrives as `0x03`           |
//! | `ICRNL`, `INLCR`    | off      | off             | `\cM` and `\cJ` stay distinct        |
//! | `IXON`              | off      | off             | `ctrl-s`, `ctrl-q` arrive as bytes   |
//! | `OPOST`             | off      | **on**          | `\n` in our output still returns     |
//!
//! The original terminal state (attributes and foreground process group) is saved the
//! first time the mode is enabled, and written back by [`restore_terminal_mode`]. Use
//! [`TerminalModeGuard`] so that this happens on every exit path.

mod mode_core;
mod mode_unix;

pub use mode_core::*;
pub use mode_unix::*;
