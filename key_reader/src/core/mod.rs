// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! OS boundaries (terminal mode, input, signals, terminfo) and the ambient plumbing
//! (errors, logging) that the key reader is built on.

pub mod ansi;
pub mod common;
pub mod input;
pub mod log;
pub mod signals;
pub mod terminfo;

pub use ansi::*;
pub use common::*;
pub use input::*;
pub use log::*;
pub use signals::*;
pub use terminfo::*;
