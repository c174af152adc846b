// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! File based logging using [`tracing`]. See [`try_initialize_logging_global`].

pub mod rolling_file_appender_impl;
pub mod tracing_config;
pub mod tracing_init;

pub use tracing_config::*;
pub use tracing_init::*;
