// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CapabilityLookup, SlidingWindow};

/// Longest key sequence that can be recognized.
pub const SEQUENCE_WINDOW_SIZE: usize = 8;

/// Recognizes key capability sequences as soon as their last byte arrives.
#[derive(Debug, Clone, Default)]
pub struct SequenceMatcher {
    recent: SlidingWindow<SEQUENCE_WINDOW_SIZE>,
}

impl SequenceMatcher {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Push `ch` and look up the trailing bytes, longest suffix first.
    pub fn match_char<'a, L: CapabilityLookup + ?Sized>(
        &mut self,
        ch: char,
        capabilities: &'a L,
    ) -> Option<&'a str> {
        self.recent.push_char(ch);
        (1..=SEQUENCE_WINDOW_SIZE)
            .rev()
            .find_map(|len| capabilities.name_for(&self.recent.suffix(len)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CapabilitySource, CapabilityTable};
    use pretty_assertions::assert_eq;

    fn feed<'a>(
        matcher: &mut SequenceMatcher,
        table: &'a CapabilityTable,
        input: &str,
    ) -> Vec<Option<&'a str>> {
        input
            .chars()
            .map(|ch| matcher.match_char(ch, table))
            .collect()
    }

    #[test]
    fn test_match_on_closing_byte() {
        let table = CapabilityTable::builtin_xterm();
        let mut matcher = SequenceMatcher::new();
        assert_eq!(feed(&mut matcher, &table, "\x1bOA"), vec![None, None, Some("up")]);
    }

    #[test]
    fn test_longest_match_wins() {
        let table = CapabilityTable::from_pairs(
            [(&b"A"[..], "short"), (&b"\x1b[1;5A"[..], "long")],
            CapabilitySource::BuiltinXterm,
        );
        let mut matcher = SequenceMatcher::new();
        let results = feed(&mut matcher, &table, "\x1b[1;5A");
        assert_eq!(results.last(), Some(&Some("long")));

        // Without the prefix only the short one matches.
        assert_eq!(matcher.match_char('A', &table), Some("short"));
    }

    #[test]
    fn test_full_window_match() {
        let table = CapabilityTable::from_pairs(
            [(&b"\x1b[15;10~"[..], "f5-meta-ctrl-shift")],
            CapabilitySource::BuiltinXterm,
        );
        let mut matcher = SequenceMatcher::new();
        let results = feed(&mut matcher, &table, "xyz\x1b[15;10~");
        assert_eq!(results.last(), Some(&Some("f5-meta-ctrl-shift")));
    }

    #[test]
    fn test_non_ascii_breaks_sequences() {
        let table = CapabilityTable::builtin_xterm();
        let mut matcher = SequenceMatcher::new();
        assert_eq!(feed(&mut matcher, &table, "\x1bOéA"), vec![None::<&str>; 4]);
    }
}
