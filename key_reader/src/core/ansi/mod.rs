// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

mod terminal_key_reader_mode;

pub use terminal_key_reader_mode::*;
