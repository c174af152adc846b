// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// One unit of input handed to the session loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharEvent {
    /// A decoded character. Bytes that aren't valid UTF-8 show up as private use
    /// characters, see [`super::encode_invalid_byte`].
    Char(char),
    /// Nothing arrived within the escape delay.
    Timeout,
    /// The input stream is closed.
    Eof,
}

impl CharEvent {
    #[must_use]
    pub fn get_char(&self) -> Option<char> {
        match self {
            CharEvent::Char(ch) => Some(*ch),
            CharEvent::Timeout | CharEvent::Eof => None,
        }
    }
}
