// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Incremental UTF-8 decoding of raw terminal input.
//!
//! A multi-byte character can be split across two reads, so the trailing bytes of an
//! incomplete sequence are held back until the next read completes them. Bytes that can
//! never be part of a valid sequence are mapped one by one into a private use range so
//! that every byte the terminal sends is still reported.
//!
//! ```text
//! read 1: [ 61  C3 ]      -> 'a'       (C3 held back)
//! read 2: [ A9  FF ]      -> 'é', U+F6FF
//! ```

use smallvec::SmallVec;
use std::collections::VecDeque;

/// Start of the private use range that undecodable bytes are mapped into.
pub const INVALID_BYTE_BASE: u32 = 0xF600;

/// Map a byte that isn't valid UTF-8 (in its position) to `U+F600 + byte`.
#[must_use]
pub fn encode_invalid_byte(byte: u8) -> char {
    char::from_u32(INVALID_BYTE_BASE + u32::from(byte)).unwrap_or(char::REPLACEMENT_CHARACTER)
}

#[derive(Debug, Default)]
pub struct Utf8Decoder {
    /// Start of a multi-byte sequence whose remaining bytes haven't arrived yet. At most
    /// 3 bytes.
    incomplete_tail: SmallVec<[u8; 4]>,
}

impl Utf8Decoder {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn has_incomplete_tail(&self) -> bool { !self.incomplete_tail.is_empty() }

    /// Decode `bytes` (prefixed by any held back tail) and append the characters to
    /// `output`.
    pub fn decode(&mut self, bytes: &[u8], output: &mut VecDeque<char>) {
        if self.incomplete_tail.is_empty() {
            self.decode_buffer(bytes, output);
        } else {
            let mut joined: Vec<u8> = Vec::with_capacity(self.incomplete_tail.len() + bytes.len());
            joined.extend_from_slice(&self.incomplete_tail);
            joined.extend_from_slice(bytes);
            self.incomplete_tail.clear();
            self.decode_buffer(&joined, output);
        }
    }

    /// Give up on the held back tail (no more bytes are coming soon), emitting each of
    /// its bytes as an invalid byte.
    pub fn flush(&mut self, output: &mut VecDeque<char>) {
        output.extend(self.incomplete_tail.drain(..).map(encode_invalid_byte));
    }

    fn decode_buffer(&mut self, bytes: &[u8], output: &mut VecDeque<char>) {
        let mut remaining = bytes;
        loop {
            match std::str::from_utf8(remaining) {
                Ok(text) => {
                    output.extend(text.chars());
                    return;
                }
                Err(error) => {
                    let (valid, rest) = remaining.split_at(error.valid_up_to());
                    if let Ok(text) = std::str::from_utf8(valid) {
                        output.extend(text.chars());
                    }
                    match error.error_len() {
                        Some(invalid_len) => {
                            let (invalid, after) = rest.split_at(invalid_len);
                            output.extend(invalid.iter().copied().map(encode_invalid_byte));
                            remaining = after;
                        }
                        // Unexpected end of input: the sequence may still be completed.
                        None => {
                            self.incomplete_tail.extend_from_slice(rest);
                            return;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn decode_all(decoder: &mut Utf8Decoder, bytes: &[u8]) -> Vec<char> {
        let mut output = VecDeque::new();
        decoder.decode(bytes, &mut output);
        output.into_iter().collect()
    }

    #[test]
    fn test_ascii_and_escape_sequences() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decode_all(&mut decoder, b"a\x1b[A\x03"), vec![
            'a', '\x1b', '[', 'A', '\x03'
        ]);
        assert!(!decoder.has_incomplete_tail());
    }

    #[test]
    fn test_multibyte_split_across_reads() {
        let mut decoder = Utf8Decoder::new();
        let bytes = "é😀".as_bytes();

        assert_eq!(decode_all(&mut decoder, &bytes[..1]), Vec::<char>::new());
        assert!(decoder.has_incomplete_tail());
        assert_eq!(decode_all(&mut decoder, &bytes[1..4]), vec!['é']);
        assert_eq!(decode_all(&mut decoder, &bytes[4..]), vec!['😀']);
        assert!(!decoder.has_incomplete_tail());
    }

    #[test]
    fn test_invalid_bytes_map_to_private_use() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decode_all(&mut decoder, b"a\xffb\x80"), vec![
            'a',
            '\u{F6FF}',
            'b',
            '\u{F680}'
        ]);
    }

    #[test]
    fn test_flush_incomplete_tail() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decode_all(&mut decoder, b"x\xe2\x82"), vec!['x']);

        let mut output = VecDeque::new();
        decoder.flush(&mut output);
        assert_eq!(output.into_iter().collect::<Vec<_>>(), vec![
            '\u{F6E2}', '\u{F682}'
        ]);
        assert!(!decoder.has_incomplete_tail());

        // Nothing left to flush.
        let mut output = VecDeque::new();
        decoder.flush(&mut output);
        assert!(output.is_empty());
    }

    #[test]
    fn test_encode_invalid_byte() {
        assert_eq!(encode_invalid_byte(0x00), '\u{F600}');
        assert_eq!(encode_invalid_byte(0xFF), '\u{F6FF}');
    }
}
