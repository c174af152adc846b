// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Key names from the terminfo database, so that a raw sequence like `ESC O A` can be
//! reported as `up`.

mod capability_table;
mod key_capabilities;
mod terminfo_db;

pub use capability_table::*;
pub use key_capabilities::*;
pub use terminfo_db::*;
