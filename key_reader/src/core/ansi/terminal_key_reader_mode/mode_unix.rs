// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Unix/Linux/macOS implementation of the key reader terminal mode using rustix's safe
//! termios API.

use super::TerminalSpecialChars;
use crate::KeyReaderError;
use rustix::{fd::{AsFd, BorrowedFd},
             process::Pid,
             termios::{self, InputModes, LocalModes, OptionalActions, SpecialCodeIndex,
                       Termios}};
use std::{fs::File,
          io,
          sync::{LazyLock, Mutex}};

/// Everything needed to put the terminal back the way it was found.
#[derive(Debug)]
struct SavedTerminalState {
    termios: Termios,
    /// `None` if the foreground process group could not be queried.
    foreground_process_group: Option<Pid>,
}

/// Stores the original terminal settings to restore later.
static ORIGINAL_STATE: LazyLock<Mutex<Option<SavedTerminalState>>> =
    LazyLock::new(|| Mutex::new(None));

/// Represents either stdin or `/dev/tty` for terminal operations.
///
/// This enum allows us to handle both cases where stdin is a tty (normal terminal usage)
/// and where stdin is redirected, requiring us to use `/dev/tty`.
enum TerminalFd {
    Stdin(io::Stdin),
    DevTty(File),
}

impl AsFd for TerminalFd {
    fn as_fd(&self) -> BorrowedFd<'_> {
        match self {
            TerminalFd::Stdin(stdin) => stdin.as_fd(),
            TerminalFd::DevTty(file) => file.as_fd(),
        }
    }
}

/// Checks if stdin is a tty and uses it if so; otherwise opens `/dev/tty`.
fn get_terminal_fd() -> io::Result<TerminalFd> {
    let stdin = io::stdin();
    if termios::isatty(&stdin) {
        Ok(TerminalFd::Stdin(stdin))
    } else {
        let file = File::options().read(true).write(true).open("/dev/tty")?;
        Ok(TerminalFd::DevTty(file))
    }
}

#[must_use]
pub fn stdin_is_a_tty() -> bool { termios::isatty(io::stdin()) }

/// Apply the key reader flags to `termios`:
/// - No canonical (line buffered) input, no echo.
/// - No signal generation, so `ctrl-c`, `ctrl-z`, `ctrl-\` arrive as bytes.
/// - No `CR` to `NL` translation (or vice versa), so `\cM` and `\cJ` are distinct.
/// - No `XON/XOFF` flow control, so `ctrl-s` and `ctrl-q` arrive as bytes.
/// - `VMIN=1`, `VTIME=0` for byte-by-byte reads.
///
/// Output post processing is left alone so that `\n` written by this program still
/// returns the carriage.
pub fn apply_key_reader_flags(termios: &mut Termios) {
    termios.local_modes.remove(
        LocalModes::ICANON | LocalModes::ECHO | LocalModes::ISIG | LocalModes::IEXTEN,
    );
    termios.input_modes.remove(
        InputModes::ICRNL | InputModes::INLCR | InputModes::IGNCR | InputModes::IXON,
    );
    termios.special_codes[SpecialCodeIndex::VMIN] = 1;
    termios.special_codes[SpecialCodeIndex::VTIME] = 0;
}

/// Read the configured interrupt and EOF characters.
#[must_use]
pub fn read_special_chars(termios: &Termios) -> TerminalSpecialChars {
    TerminalSpecialChars {
        interrupt: termios.special_codes[SpecialCodeIndex::VINTR],
        eof: termios.special_codes[SpecialCodeIndex::VEOF],
    }
}

/// Enable the key reader mode on the controlling terminal.
///
/// 1. Get the controlling terminal (stdin if it's a tty, otherwise `/dev/tty`).
/// 2. Save the original terminal settings and foreground process group (only the first
///    time, so calling this twice doesn't lose the real original).
/// 3. Apply [`apply_key_reader_flags`].
///
/// # Errors
///
/// Returns [`KeyReaderError::TerminalAttributes`] if the terminal can't be opened, or
/// its attributes can't be read or set.
pub fn enable_key_reader_mode() -> Result<TerminalSpecialChars, KeyReaderError> {
    let fd =
        get_terminal_fd().map_err(|e| KeyReaderError::terminal_attributes("open", e))?;

    let mut termios =
        termios::tcgetattr(&fd).map_err(|e| KeyReaderError::terminal_attributes("read", e))?;

    let special_chars = read_special_chars(&termios);

    // Save original settings.
    {
        let mut original = ORIGINAL_STATE.lock().map_err(|_| {
            KeyReaderError::terminal_attributes(
                "save",
                io::Error::other("terminal settings lock poisoned"),
            )
        })?;

        if original.is_none() {
            *original = Some(SavedTerminalState {
                termios: termios.clone(),
                foreground_process_group: termios::tcgetpgrp(&fd).ok(),
            });
        }
    }

    apply_key_reader_flags(&mut termios);

    termios::tcsetattr(&fd, OptionalActions::Now, &termios)
        .map_err(|e| KeyReaderError::terminal_attributes("set", e))?;

    tracing::debug!(
        message = "terminal mode: enabled key reader mode",
        special_chars = ?special_chars
    );

    Ok(special_chars)
}

/// Restore the terminal settings and foreground process group saved by
/// [`enable_key_reader_mode`]. No-op if the mode was never enabled.
///
/// # Errors
///
/// Returns [`KeyReaderError::TerminalAttributes`] if the terminal can't be opened or
/// its attributes can't be set.
pub fn restore_terminal_mode() -> Result<(), KeyReaderError> {
    let original = ORIGINAL_STATE.lock().map_err(|_| {
        KeyReaderError::terminal_attributes(
            "restore",
            io::Error::other("terminal settings lock poisoned"),
        )
    })?;

    let Some(ref saved) = *original else {
        return Ok(());
    };

    let fd =
        get_terminal_fd().map_err(|e| KeyReaderError::terminal_attributes("open", e))?;

    termios::tcsetattr(&fd, OptionalActions::Now, &saved.termios)
        .map_err(|e| KeyReaderError::terminal_attributes("restore", e))?;

    // Only hand the terminal back if someone else grabbed it in the meantime.
    if let Some(pgrp) = saved.foreground_process_group {
        if termios::tcgetpgrp(&fd).ok() != Some(pgrp) {
            if let Err(e) = termios::tcsetpgrp(&fd, pgrp) {
                tracing::warn!(
                    message = "terminal mode: could not restore foreground process group",
                    error = ?e
                );
            }
        }
    }

    tracing::debug!(message = "terminal mode: restored original mode");

    Ok(())
}
