// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A fixed-size, always-full ring of the most recently seen raw bytes, stored on the
//! stack.
//!
//! Unlike a general ring buffer, this window is never empty: it starts out filled with
//! zero bytes, and every [`SlidingWindow::push`] evicts the oldest byte. This is the
//! shape needed to match trailing byte sequences (exit words, terminfo key sequences)
//! as soon as their closing byte arrives.
//!
//! ```text
//! N = 4, after pushing b'e', b'x', b'i', b't':
//!
//!  index (oldest first):  0     1     2     3
//!                       ┌─────┬─────┬─────┬─────┐
//!                       │ 'e' │ 'x' │ 'i' │ 't' │
//!                       └─────┴─────┴─────┴─────┘
//!                                            ▲ newest
//! ```

use smallvec::SmallVec;

/// Narrow a decoded character to a single byte: ASCII maps to itself, anything else
/// maps to `0`.
#[must_use]
pub fn narrow_cast(ch: char) -> u8 {
    match u8::try_from(u32::from(ch)) {
        Ok(byte) if byte.is_ascii() => byte,
        _ => 0,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlidingWindow<const N: usize> {
    internal_storage: [u8; N],
    /// Slot that holds the oldest byte, which is also where the next byte is written.
    head: usize,
}

impl<const N: usize> Default for SlidingWindow<N> {
    fn default() -> Self { Self::new() }
}

impl<const N: usize> SlidingWindow<N> {
    #[must_use]
    pub const fn new() -> Self {
        SlidingWindow {
            internal_storage: [0; N],
            head: 0,
        }
    }

    /// Insert the newest byte, evicting the oldest one.
    pub fn push(&mut self, value: u8) {
        self.internal_storage[self.head] = value;
        self.head = (self.head + 1) % N;
    }

    /// Same as [`Self::push`] after applying [`narrow_cast`].
    pub fn push_char(&mut self, ch: char) { self.push(narrow_cast(ch)); }

    /// The window is always full.
    #[must_use]
    pub const fn len(&self) -> usize { N }

    #[must_use]
    pub const fn is_empty(&self) -> bool { N == 0 }

    /// Index `0` is the oldest byte, index `N - 1` is the newest.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<u8> {
        if index >= N {
            return None;
        }
        Some(self.internal_storage[(self.head + index) % N])
    }

    /// Copy of the window contents, oldest first.
    #[must_use]
    pub fn to_array(&self) -> [u8; N] {
        let mut acc = [0; N];
        for (index, slot) in acc.iter_mut().enumerate() {
            *slot = self.internal_storage[(self.head + index) % N];
        }
        acc
    }

    /// The trailing `len` bytes (oldest first). `len` is clamped to `N`.
    #[must_use]
    pub fn suffix(&self, len: usize) -> SmallVec<[u8; N]> {
        let len = len.min(N);
        let ordered = self.to_array();
        SmallVec::from_slice(&ordered[N - len..])
    }

    #[must_use]
    pub fn ends_with(&self, pattern: &[u8]) -> bool {
        pattern.len() <= N && self.suffix(pattern.len()).as_slice() == pattern
    }
}
