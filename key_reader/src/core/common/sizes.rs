// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Stack allocation sizes. Smaller is better: every key press produces a handful of
//! short strings, and none of them should need the heap in the common case.

use smallstr::SmallString;
use smallvec::SmallVec;

/// Fits every character notation (`\e`, `\c@`, `\u00E9`, `\U01F600`) and the
/// longest terminfo key name.
pub const DEFAULT_STRING_STORAGE_SIZE: usize = 16;

/// Stack allocated string storage for small strings. When this gets larger than
/// [`DEFAULT_STRING_STORAGE_SIZE`], it will be [`smallvec::SmallVec::spilled`] on the
/// heap.
pub type InlineString = SmallString<[u8; DEFAULT_STRING_STORAGE_SIZE]>;

/// Stack allocated list, that can [`smallvec::SmallVec::spilled`] into the heap if it
/// gets larger than [`INLINE_VEC_SIZE`].
pub type InlineVec<T> = SmallVec<[T; INLINE_VEC_SIZE]>;
pub const INLINE_VEC_SIZE: usize = 8;

/// Characters of one key press (escape sequences are rarely longer than this).
pub type CharAccumulator = SmallVec<[char; CHAR_ACCUMULATOR_SIZE]>;
pub const CHAR_ACCUMULATOR_SIZE: usize = 16;
