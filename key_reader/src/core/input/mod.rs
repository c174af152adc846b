// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Timed character input: raw bytes from the terminal, decoded into [`CharEvent`]s.

mod char_event;
mod stdin_char_source;
mod utf8_decoder;

pub use char_event::*;
pub use stdin_char_source::*;
pub use utf8_decoder::*;
