// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Time between key presses.
//!
//! ```text
//!               hex:   61  char: a           <- first key, no previous time
//! (  0.081 ms)  hex:   62  char: b           <- same burst
//!
//! (350.120 ms)  hex:   63  char: c           <- >= 200 ms: blank line first
//!
//!               hex:   64  char: d           <- >= 1 s: not meaningful
//! ```

use crate::InlineString;
use std::{fmt::Write as _,
          time::{Duration, Instant}};

/// A gap at least this long starts a new burst (separated by a blank line).
pub const BURST_GAP: Duration = Duration::from_millis(200);

/// A gap at least this long isn't printed.
pub const STALE_GAP: Duration = Duration::from_secs(1);

/// Printed instead of a stale time, same width as `(DDD.DDD ms)  `.
pub const STALE_PLACEHOLDER: &str = "              ";

/// Source of "now". Only differences between two readings are meaningful.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// [`Clock`] backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration { self.origin.elapsed() }
}

/// Remembers when the previous character arrived.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElapsedTimeTracker {
    /// `None` until the first character: treated as stale.
    previous: Option<Duration>,
}

impl ElapsedTimeTracker {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Format the time since the previous character and remember `now` as the new
    /// previous time.
    pub fn record(&mut self, now: Duration, first_char_seen: bool) -> InlineString {
        let delta = self.previous.map(|previous| now.saturating_sub(previous));
        self.previous = Some(now);
        format_elapsed_time(delta, first_char_seen)
    }
}

/// `delta` of `None` means there is no previous character.
#[must_use]
pub fn format_elapsed_time(delta: Option<Duration>, first_char_seen: bool) -> InlineString {
    let mut acc = InlineString::new();
    let is_new_burst = delta.is_none_or(|it| it >= BURST_GAP);
    let is_stale = delta.is_none_or(|it| it >= STALE_GAP);

    if is_new_burst && first_char_seen {
        acc.push('\n');
    }

    match delta {
        Some(delta) if !is_stale => {
            let micros = delta.as_micros();
            // Writing to an `InlineString` can't fail.
            let _unused = write!(acc, "({:3}.{:03} ms)  ", micros / 1_000, micros % 1_000);
        }
        _ => acc.push_str(STALE_PLACEHOLDER),
    }

    acc
}
