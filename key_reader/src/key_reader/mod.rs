// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The key reader itself: render characters, time them, recognize named keys, decide
//! when to exit, and suggest `bind` commands.

// Attach.
mod bind_command;
mod char_to_symbol;
mod clap_config;
mod elapsed_time;
mod exit_detector;
mod launcher;
mod sequence_matcher;
mod session_loop;

// Re-export.
pub use bind_command::*;
pub use char_to_symbol::*;
pub use clap_config::*;
pub use elapsed_time::*;
pub use exit_detector::*;
pub use launcher::*;
pub use sequence_matcher::*;
pub use session_loop::*;
