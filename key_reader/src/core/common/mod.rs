// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

mod common_enums;
mod key_reader_error;
mod miette_setup_global_report_handler;
mod sizes;
mod sliding_window;

pub use common_enums::*;
pub use key_reader_error::*;
pub use miette_setup_global_report_handler::*;
pub use sizes::*;
pub use sliding_window::*;
