// Copyright (c) 2023-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// What the session loop does after handling one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Continuation {
    /// Read the next event.
    #[default]
    Continue,

    /// The session has terminated; leave the loop.
    Stop,
}
