// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The key reading state machine.
//!
//! ```text
//! AwaitingFirstEvent ──run()──▶ Running ──┬─ exit word / double press ─▶ Terminated(ExitRequested)
//!                                ▲   │    ├─ pause after input (single-shot) ─▶ Terminated(InputPaused)
//!                                └───┘    └─ keep running cleared ─▶ Terminated(Cancelled)
//!                          char or pause
//! ```
//!
//! Output goes to two streams:
//! - `err` (diagnostics): prompt, help text, elapsed time, one line per character,
//!   warnings, farewell.
//! - `out` (primary): `bind` command suggestions.

use super::{BindCommandAccumulator, Clock, ElapsedTimeTracker, ExitCheck, ExitDetector,
            SequenceMatcher, SymbolForm, char_to_symbol, format_key_name_bind_command};
use crate::{CapabilityLookup, CharEvent, CharSource, Continuation, TerminalSpecialChars};
use std::{io::{self, Write},
          sync::atomic::{AtomicBool, Ordering}};

pub const PROMPT: &str = "Press a key\n\n";
pub const FAREWELL: &str = "\nExiting at your request.\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionMode {
    /// Stop at the first pause after some input.
    #[default]
    SingleShot,
    /// Keep going until an exit word, a double press, or a terminating signal.
    Continuous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Exit word or doubled interrupt / EOF character.
    ExitRequested,
    /// Input paused after the first burst (single-shot mode).
    InputPaused,
    /// The keep running flag was cleared (terminating signal).
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingFirstEvent,
    Running,
    Terminated(SessionOutcome),
}

/// Where the session gets its input from.
#[derive(Debug)]
pub struct SessionInputs<'a, S, C, L: ?Sized> {
    pub source: &'a mut S,
    pub clock: &'a C,
    pub capabilities: &'a L,
}

/// `out` gets the `bind` commands, `err` gets everything else.
#[derive(Debug)]
pub struct SessionStreams<O: Write, E: Write> {
    pub out: O,
    pub err: E,
}

#[must_use]
pub fn format_continuous_mode_help(special_chars: TerminalSpecialChars) -> String {
    format!(
        "\nTo terminate this program type \"exit\" or \"quit\" in this window,\n\
         or press [ctrl-{}] or [ctrl-{}] twice in a row.\n\n",
        TerminalSpecialChars::ctrl_letter(special_chars.interrupt),
        TerminalSpecialChars::ctrl_letter(special_chars.eof),
    )
}

/// One run of the key reader. Not reusable: [`Self::run`] ends in
/// [`SessionState::Terminated`].
#[derive(Debug, Clone)]
pub struct KeyReaderSession {
    mode: SessionMode,
    special_chars: TerminalSpecialChars,
    state: SessionState,
    first_char_seen: bool,
    elapsed_time: ElapsedTimeTracker,
    bind_command: BindCommandAccumulator,
    sequence_matcher: SequenceMatcher,
    exit_detector: ExitDetector,
}

impl KeyReaderSession {
    #[must_use]
    pub fn new(mode: SessionMode, special_chars: TerminalSpecialChars) -> Self {
        Self {
            mode,
            special_chars,
            state: SessionState::AwaitingFirstEvent,
            first_char_seen: false,
            elapsed_time: ElapsedTimeTracker::new(),
            bind_command: BindCommandAccumulator::new(),
            sequence_matcher: SequenceMatcher::new(),
            exit_detector: ExitDetector::new(special_chars),
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState { self.state }

    /// Read and report events until the session terminates. Pending `bind` characters
    /// are flushed on every way out, including errors.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub fn run<S, C, L, O, E>(
        &mut self,
        inputs: SessionInputs<'_, S, C, L>,
        streams: &mut SessionStreams<O, E>,
        keep_running: &AtomicBool,
    ) -> io::Result<SessionOutcome>
    where
        S: CharSource,
        C: Clock,
        L: CapabilityLookup + ?Sized,
        O: Write,
        E: Write,
    {
        let result = self.run_until_terminated(inputs, streams, keep_running);
        let flush_result = self.bind_command.flush(&mut streams.out);

        let outcome = result?;
        flush_result?;

        tracing::debug!(message = "session: terminated", outcome = ?outcome);
        Ok(outcome)
    }

    fn run_until_terminated<S, C, L, O, E>(
        &mut self,
        inputs: SessionInputs<'_, S, C, L>,
        streams: &mut SessionStreams<O, E>,
        keep_running: &AtomicBool,
    ) -> io::Result<SessionOutcome>
    where
        S: CharSource,
        C: Clock,
        L: CapabilityLookup + ?Sized,
        O: Write,
        E: Write,
    {
        let SessionInputs {
            source,
            clock,
            capabilities,
        } = inputs;

        if self.mode == SessionMode::Continuous {
            streams
                .err
                .write_all(format_continuous_mode_help(self.special_chars).as_bytes())?;
        }
        streams.err.write_all(PROMPT.as_bytes())?;
        self.state = SessionState::Running;

        loop {
            if !keep_running.load(Ordering::SeqCst) {
                self.state = SessionState::Terminated(SessionOutcome::Cancelled);
                break;
            }

            // A disabled interrupt character (0) has nothing to stand in for.
            let interrupted = source.take_interrupt();
            let event = if interrupted && self.special_chars.interrupt != 0 {
                tracing::debug!(message = "session: interrupt latched");
                CharEvent::Char(char::from(self.special_chars.interrupt))
            } else {
                if interrupted {
                    tracing::debug!(
                        message = "session: interrupt latched, interrupt char disabled"
                    );
                }
                source.read_char_timed()?
            };

            if self.process_event(event, clock, capabilities, streams)?
                == Continuation::Stop
            {
                break;
            }
        }

        match self.state {
            SessionState::Terminated(outcome) => Ok(outcome),
            SessionState::AwaitingFirstEvent | SessionState::Running => {
                Err(io::Error::other("session loop ended without terminating"))
            }
        }
    }

    /// Handle one event.
    ///
    /// # Errors
    ///
    /// Returns an error if writing output fails.
    pub fn process_event<C, L, O, E>(
        &mut self,
        event: CharEvent,
        clock: &C,
        capabilities: &L,
        streams: &mut SessionStreams<O, E>,
    ) -> io::Result<Continuation>
    where
        C: Clock,
        L: CapabilityLookup + ?Sized,
        O: Write,
        E: Write,
    {
        // Timeout or end of stream.
        let Some(ch) = event.get_char() else {
            self.bind_command.flush(&mut streams.out)?;
            if self.first_char_seen && self.mode == SessionMode::SingleShot {
                self.state = SessionState::Terminated(SessionOutcome::InputPaused);
                return Ok(Continuation::Stop);
            }
            return Ok(Continuation::Continue);
        };

        let elapsed = self.elapsed_time.record(clock.now(), self.first_char_seen);
        streams.err.write_all(elapsed.as_bytes())?;

        self.bind_command.push(ch);
        writeln!(
            streams.err,
            "hex: {:4X}  char: {}",
            u32::from(ch),
            char_to_symbol(ch, SymbolForm::Human)
        )?;

        if let Some(name) = self.sequence_matcher.match_char(ch, capabilities) {
            tracing::trace!(message = "session: key capability matched", name);
            streams
                .out
                .write_all(format_key_name_bind_command(name).as_bytes())?;
            self.bind_command.flush(&mut streams.out)?;
        }

        match self.exit_detector.check(ch) {
            ExitCheck::Continue => {}
            ExitCheck::Warn { ctrl_letter } => {
                writeln!(streams.err, "Press [ctrl-{ctrl_letter}] again to exit")?;
            }
            ExitCheck::Exit => {
                streams.err.write_all(FAREWELL.as_bytes())?;
                self.state = SessionState::Terminated(SessionOutcome::ExitRequested);
                return Ok(Continuation::Stop);
            }
        }

        self.first_char_seen = true;
        Ok(Continuation::Continue)
    }
}
