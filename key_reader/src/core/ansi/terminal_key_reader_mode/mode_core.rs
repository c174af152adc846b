// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Platform dispatch and RAII guard for the key reader terminal mode.

use crate::KeyReaderError;

/// The terminal's configured interrupt (`VINTR`) and end-of-file (`VEOF`) characters.
/// Double pressing either one ends the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSpecialChars {
    pub interrupt: u8,
    pub eof: u8,
}

impl Default for TerminalSpecialChars {
    /// `ctrl-c` and `ctrl-d`.
    fn default() -> Self {
        Self {
            interrupt: 0x03,
            eof: 0x04,
        }
    }
}

impl TerminalSpecialChars {
    /// The letter that names a control byte in `ctrl-<letter>` form, eg: `0x03` to `C`.
    #[must_use]
    pub fn ctrl_letter(byte: u8) -> char { char::from(byte.wrapping_add(0x40)) }
}

/// Seam between the session and the OS terminal, so that the session can be driven in
/// tests without a tty.
pub trait TerminalModeControl {
    /// # Errors
    ///
    /// Returns an error if the terminal attributes can't be read or written.
    fn enable(&mut self) -> Result<TerminalSpecialChars, KeyReaderError>;

    /// # Errors
    ///
    /// Returns an error if the saved terminal attributes can't be written back.
    fn restore(&mut self) -> Result<(), KeyReaderError>;
}

/// The real controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnixTerminalMode;

impl TerminalModeControl for UnixTerminalMode {
    fn enable(&mut self) -> Result<TerminalSpecialChars, KeyReaderError> {
        super::enable_key_reader_mode()
    }

    fn restore(&mut self) -> Result<(), KeyReaderError> { super::restore_terminal_mode() }
}

/// RAII guard: enables the key reader mode on construction and restores the original
/// mode exactly once, either via [`TerminalModeGuard::restore`] or on drop (including
/// during unwinding).
///
/// # Example
///
/// ```no_run
/// use r3bl_key_reader::{TerminalModeGuard, UnixTerminalMode};
///
/// # fn main() -> Result<(), r3bl_key_reader::KeyReaderError> {
/// let guard = TerminalModeGuard::new(UnixTerminalMode)?;
/// let special_chars = guard.special_chars();
/// // Read keys...
/// // Original mode comes back when `guard` goes out of scope.
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TerminalModeGuard<C: TerminalModeControl> {
    control: C,
    special_chars: TerminalSpecialChars,
    restored: bool,
}

impl<C: TerminalModeControl> TerminalModeGuard<C> {
    /// # Errors
    ///
    /// Returns an error if the key reader mode can't be enabled. Nothing needs to be
    /// restored in that case.
    pub fn new(mut control: C) -> Result<Self, KeyReaderError> {
        let special_chars = control.enable()?;
        Ok(Self {
            control,
            special_chars,
            restored: false,
        })
    }

    #[must_use]
    pub fn special_chars(&self) -> TerminalSpecialChars { self.special_chars }

    /// Restore now, reporting errors. Subsequent calls and the eventual drop are no-ops.
    ///
    /// # Errors
    ///
    /// Returns an error if the original mode can't be written back.
    pub fn restore(&mut self) -> Result<(), KeyReaderError> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        self.control.restore()
    }
}

impl<C: TerminalModeControl> Drop for TerminalModeGuard<C> {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            tracing::error!(message = "terminal mode: failed to restore on drop", error = ?e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::{cell::Cell, rc::Rc};
    use test_case::test_case;

    #[derive(Debug, Default, Clone)]
    struct CountingTerminal {
        enabled: Rc<Cell<usize>>,
        restored: Rc<Cell<usize>>,
    }

    impl TerminalModeControl for CountingTerminal {
        fn enable(&mut self) -> Result<TerminalSpecialChars, KeyReaderError> {
            self.enabled.set(self.enabled.get() + 1);
            Ok(TerminalSpecialChars {
                interrupt: 0x03,
                eof: 0x1a,
            })
        }

        fn restore(&mut self) -> Result<(), KeyReaderError> {
            self.restored.set(self.restored.get() + 1);
            Ok(())
        }
    }

    #[test]
    fn test_guard_restores_on_drop() {
        let terminal = CountingTerminal::default();
        {
            let guard = TerminalModeGuard::new(terminal.clone()).unwrap();
            assert_eq!(guard.special_chars().eof, 0x1a);
            assert_eq!(terminal.enabled.get(), 1);
            assert_eq!(terminal.restored.get(), 0);
        }
        assert_eq!(terminal.restored.get(), 1);
    }

    #[test]
    fn test_guard_restores_exactly_once() {
        let terminal = CountingTerminal::default();
        {
            let mut guard = TerminalModeGuard::new(terminal.clone()).unwrap();
            guard.restore().unwrap();
            guard.restore().unwrap();
        }
        assert_eq!(terminal.restored.get(), 1);
    }

    #[test]
    fn test_failed_enable_does_not_restore() {
        struct Broken(Rc<Cell<usize>>);
        impl TerminalModeControl for Broken {
            fn enable(&mut self) -> Result<TerminalSpecialChars, KeyReaderError> {
                Err(KeyReaderError::StdinNotATty)
            }
            fn restore(&mut self) -> Result<(), KeyReaderError> {
                self.0.set(self.0.get() + 1);
                Ok(())
            }
        }

        let restored = Rc::new(Cell::new(0));
        let result = TerminalModeGuard::new(Broken(restored.clone()));
        assert!(result.is_err());
        assert_eq!(restored.get(), 0);
    }

    #[test_case(0x03, 'C')]
    #[test_case(0x04, 'D')]
    #[test_case(0x1a, 'Z')]
    #[test_case(0x00, '@')]
    fn test_ctrl_letter(byte: u8, expected: char) {
        assert_eq!(TerminalSpecialChars::ctrl_letter(byte), expected);
    }
}
