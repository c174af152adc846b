// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{Clock, KeyReaderConfig, KeyReaderSession, MonotonicClock, SessionInputs, SessionMode,
            SessionOutcome, SessionStreams};
use crate::{CapabilityLookup, CapabilityTable, CharSource, CommonResult, KEEP_RUNNING,
            KeyReaderError, StdinCharSource, TerminalModeControl, TerminalModeGuard,
            UnixTerminalMode, install_signal_handlers, stdin_is_a_tty};
use std::{io::{self, Write},
          sync::atomic::AtomicBool};

pub const ISSUES_URL: &str = "https://github.com/r3bl-org/r3bl-open-core/issues/new";

/// Run the key reader on the controlling terminal: stdin for input, stdout for `bind`
/// commands, stderr for everything else.
///
/// # Errors
///
/// Returns an error if stdin isn't a tty, the terminal mode can't be changed, or
/// terminal I/O fails.
pub fn run_app(config: &KeyReaderConfig) -> CommonResult<SessionOutcome> {
    if !stdin_is_a_tty() {
        return Err(KeyReaderError::StdinNotATty.into());
    }

    let capabilities = CapabilityTable::load_from_env();
    tracing::debug!(
        message = "launcher: key capabilities loaded",
        source = ?capabilities.source(),
        count = capabilities.len()
    );

    // Dropped (previous handlers restored) after the terminal mode is restored.
    let signal_handlers = install_signal_handlers();
    tracing::debug!(
        message = "launcher: signal handlers installed",
        count = signal_handlers.len()
    );

    let mut source = StdinCharSource::try_new_stdin(config.escape_delay)?;
    let clock = MonotonicClock::default();
    let mut streams = SessionStreams {
        out: io::stdout().lock(),
        err: io::stderr().lock(),
    };

    run_in_terminal(
        UnixTerminalMode,
        config.mode,
        SessionInputs {
            source: &mut source,
            clock: &clock,
            capabilities: &capabilities,
        },
        &mut streams,
        &KEEP_RUNNING,
    )
}

/// Switch `terminal` to key reader mode, run one session, and restore the original mode
/// exactly once, whether or not the session succeeded.
///
/// # Errors
///
/// Returns the first of: failure to enable the mode, failure of the session, failure to
/// restore the mode.
pub fn run_in_terminal<T, S, C, L, O, E>(
    terminal: T,
    mode: SessionMode,
    inputs: SessionInputs<'_, S, C, L>,
    streams: &mut SessionStreams<O, E>,
    keep_running: &AtomicBool,
) -> CommonResult<SessionOutcome>
where
    T: TerminalModeControl,
    S: CharSource,
    C: Clock,
    L: CapabilityLookup + ?Sized,
    O: Write,
    E: Write,
{
    let mut guard = TerminalModeGuard::new(terminal)?;
    let special_chars = guard.special_chars();
    tracing::debug!(message = "launcher: key reader mode enabled", special_chars = ?special_chars);

    let mut session = KeyReaderSession::new(mode, special_chars);
    let session_result = session.run(inputs, streams, keep_running);
    let restore_result = guard.restore();

    let outcome = session_result.map_err(KeyReaderError::Io)?;
    restore_result?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::{super::session_loop::scripted_input::*, *};
    use crate::{CharEvent, TerminalSpecialChars};
    use pretty_assertions::assert_eq;
    use std::{cell::Cell, rc::Rc};

    #[derive(Debug, Default, Clone)]
    struct CountingTerminal {
        enabled: Rc<Cell<usize>>,
        restored: Rc<Cell<usize>>,
        fail_enable: bool,
    }

    impl TerminalModeControl for CountingTerminal {
        fn enable(&mut self) -> Result<TerminalSpecialChars, KeyReaderError> {
            if self.fail_enable {
                return Err(KeyReaderError::terminal_attributes(
                    "read",
                    io::Error::from(io::ErrorKind::NotConnected),
                ));
            }
            self.enabled.set(self.enabled.get() + 1);
            Ok(TerminalSpecialChars {
                interrupt: 0x07,
                eof: 0x04,
            })
        }

        fn restore(&mut self) -> Result<(), KeyReaderError> {
            self.restored.set(self.restored.get() + 1);
            Ok(())
        }
    }

    #[derive(Debug)]
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
        fn flush(&mut self) -> io::Result<()> { Ok(()) }
    }

    fn run_with<O: Write, E: Write>(
        terminal: CountingTerminal,
        steps: Vec<Step>,
        streams: &mut SessionStreams<O, E>,
    ) -> CommonResult<SessionOutcome> {
        let keep_running = AtomicBool::new(true);
        let clock = ScriptedClock::default();
        let mut source = ScriptedCharSource::new(steps, clock.clone(), &keep_running);
        run_in_terminal(
            terminal,
            SessionMode::Continuous,
            SessionInputs {
                source: &mut source,
                clock: &clock,
                capabilities: &CapabilityTable::builtin_xterm(),
            },
            streams,
            &keep_running,
        )
    }

    #[test]
    fn test_terminal_special_chars_drive_the_session() {
        let terminal = CountingTerminal::default();
        let mut streams = SessionStreams {
            out: Vec::new(),
            err: Vec::new(),
        };
        let steps = vec![
            Step::Event(ms(0), CharEvent::Char('\x07')),
            Step::Event(ms(1), CharEvent::Char('\x07')),
        ];

        let outcome = run_with(terminal.clone(), steps, &mut streams).unwrap();
        assert_eq!(outcome, SessionOutcome::ExitRequested);
        assert_eq!(terminal.enabled.get(), 1);
        assert_eq!(terminal.restored.get(), 1);

        let err = String::from_utf8(streams.err).unwrap();
        assert!(err.contains("or press [ctrl-G] or [ctrl-D] twice in a row.\n"));
        assert!(err.contains("Press [ctrl-G] again to exit\n"));
    }

    #[test]
    fn test_cancelled_session_restores_once() {
        let terminal = CountingTerminal::default();
        let mut streams = SessionStreams {
            out: Vec::new(),
            err: Vec::new(),
        };
        let steps = vec![Step::ClearKeepRunning];

        let outcome = run_with(terminal.clone(), steps, &mut streams).unwrap();
        assert_eq!(outcome, SessionOutcome::Cancelled);
        assert_eq!(terminal.restored.get(), 1);
    }

    #[test]
    fn test_failed_session_still_restores_once() {
        let terminal = CountingTerminal::default();
        let mut streams = SessionStreams {
            out: Vec::new(),
            err: ClosedPipe,
        };

        let result = run_with(terminal.clone(), vec![], &mut streams);
        assert!(result.is_err());
        assert_eq!(terminal.restored.get(), 1);
    }

    #[test]
    fn test_enable_failure_skips_session_and_restore() {
        let terminal = CountingTerminal {
            fail_enable: true,
            ..Default::default()
        };
        let mut streams = SessionStreams {
            out: Vec::new(),
            err: Vec::new(),
        };

        let result = run_with(terminal.clone(), chars_at(ms(0), "a"), &mut streams);
        assert!(result.is_err());
        assert_eq!(terminal.restored.get(), 0);
        assert!(streams.err.is_empty());
    }

    #[test]
    fn test_run_app_requires_a_tty() {
        if stdin_is_a_tty() {
            return;
        }
        let report = run_app(&KeyReaderConfig::default()).unwrap_err();
        assert!(matches!(
            report.downcast_ref::<KeyReaderError>(),
            Some(KeyReaderError::StdinNotATty)
        ));
    }
}
