// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Decide when the user wants to quit: a doubled interrupt or EOF character, or the
//! words `exit` or `quit`.
//!
//! The doubled press check looks at slot `2` of the 4 byte window *after* the new byte
//! has been pushed, which holds the byte received right before this one:
//!
//! ```text
//! after 2nd ctrl-c:   [ 'a', 'b', 0x03, 0x03 ]  slot 2 == 0x03 -> exit
//! after ctrl-c, 'x':  [ 'b', 0x03, 'x', 0x03 ]  slot 2 == 'x'  -> warn again
//! ```

use crate::{SlidingWindow, TerminalSpecialChars, narrow_cast};

pub const EXIT_WORDS: [&[u8; 4]; 2] = [b"exit", b"quit"];

/// Slot holding the byte received just before the newest one.
const PREVIOUS_BYTE_SLOT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCheck {
    Continue,
    /// A special character was pressed once. Holds the letter to show in
    /// `Press [ctrl-<letter>] again to exit`.
    Warn { ctrl_letter: char },
    Exit,
}

#[derive(Debug, Clone)]
pub struct ExitDetector {
    recent: SlidingWindow<4>,
    special_chars: TerminalSpecialChars,
}

impl ExitDetector {
    #[must_use]
    pub fn new(special_chars: TerminalSpecialChars) -> Self {
        Self {
            recent: SlidingWindow::new(),
            special_chars,
        }
    }

    pub fn check(&mut self, ch: char) -> ExitCheck {
        let byte = narrow_cast(ch);
        self.recent.push(byte);

        // `0` means the special character is disabled in the terminal settings.
        for special in [self.special_chars.interrupt, self.special_chars.eof] {
            if special != 0 && byte == special {
                return if self.recent.get(PREVIOUS_BYTE_SLOT) == Some(special) {
                    ExitCheck::Exit
                } else {
                    ExitCheck::Warn {
                        ctrl_letter: TerminalSpecialChars::ctrl_letter(special),
                    }
                };
            }
        }

        if EXIT_WORDS.iter().any(|word| self.recent.ends_with(*word)) {
            ExitCheck::Exit
        } else {
            ExitCheck::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn feed(detector: &mut ExitDetector, input: &str) -> Vec<ExitCheck> {
        input.chars().map(|ch| detector.check(ch)).collect()
    }

    fn detector() -> ExitDetector { ExitDetector::new(TerminalSpecialChars::default()) }

    #[test]
    fn test_exit_word() {
        let mut detector = detector();
        let results = feed(&mut detector, "exit");
        assert_eq!(results, vec![
            ExitCheck::Continue,
            ExitCheck::Continue,
            ExitCheck::Continue,
            ExitCheck::Exit
        ]);
    }

    #[test]
    fn test_exit_word_then_more() {
        let mut detector = detector();
        let results = feed(&mut detector, "exite");
        assert_eq!(results.last(), Some(&ExitCheck::Continue));
    }

    #[test]
    fn test_quit_word_after_other_input() {
        let mut detector = detector();
        let results = feed(&mut detector, "hello quit");
        assert_eq!(results.last(), Some(&ExitCheck::Exit));
        assert!(results[..results.len() - 1]
            .iter()
            .all(|it| *it == ExitCheck::Continue));
    }

    #[test]
    fn test_double_interrupt() {
        let mut detector = detector();
        assert_eq!(detector.check('\x03'), ExitCheck::Warn { ctrl_letter: 'C' });
        assert_eq!(detector.check('\x03'), ExitCheck::Exit);
    }

    #[test]
    fn test_double_eof() {
        let mut detector = detector();
        assert_eq!(feed(&mut detector, "ab\x04\x04"), vec![
            ExitCheck::Continue,
            ExitCheck::Continue,
            ExitCheck::Warn { ctrl_letter: 'D' },
            ExitCheck::Exit
        ]);
    }

    #[test]
    fn test_interrupt_separated_by_other_key_warns_again() {
        let mut detector = detector();
        assert_eq!(feed(&mut detector, "\x03x\x03"), vec![
            ExitCheck::Warn { ctrl_letter: 'C' },
            ExitCheck::Continue,
            ExitCheck::Warn { ctrl_letter: 'C' }
        ]);
    }

    #[test]
    fn test_interrupt_then_eof_is_not_a_double_press() {
        let mut detector = detector();
        assert_eq!(feed(&mut detector, "\x03\x04"), vec![
            ExitCheck::Warn { ctrl_letter: 'C' },
            ExitCheck::Warn { ctrl_letter: 'D' }
        ]);
    }

    #[test]
    fn test_custom_special_chars() {
        let mut detector = ExitDetector::new(TerminalSpecialChars {
            interrupt: 0x07,
            eof: 0x1a,
        });
        assert_eq!(detector.check('\x03'), ExitCheck::Continue);
        assert_eq!(detector.check('\x1a'), ExitCheck::Warn { ctrl_letter: 'Z' });
        assert_eq!(detector.check('\x1a'), ExitCheck::Exit);
    }

    #[test]
    fn test_disabled_special_char_is_ignored() {
        let mut detector = ExitDetector::new(TerminalSpecialChars {
            interrupt: 0,
            eof: 0x04,
        });
        // Non-ASCII narrows to 0, which must not count as an interrupt.
        assert_eq!(feed(&mut detector, "éé"), vec![
            ExitCheck::Continue,
            ExitCheck::Continue
        ]);
    }
}
