// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words EINTR

//! Blocking, timed reads of decoded characters from the terminal.
//!
//! The file descriptor is registered with a [`mio::Poll`], which is used only to wait
//! (with a timeout) for it to become readable. Bytes are then read directly from the
//! file descriptor with [`rustix::io::read`], bypassing [`std::io::Stdin`]'s internal
//! buffer, which would otherwise hide bytes from the poller.
//!
//! # EINTR Handling
//!
//! A signal arriving while blocked in [`mio::Poll::poll`] or [`rustix::io::read`]
//! interrupts the syscall. Both are retried, and the poll only waits for whatever is
//! left of the escape delay, so the caller sees at most one escape delay of latency
//! before it gets to check its keep running flag.
//!
//! # Hang-up
//!
//! Readiness is edge triggered. When the last bytes and the hang-up arrive together
//! there is only one edge, so once a read-closed (or error) event has been seen the
//! source stops waiting on the poller and reads until it gets EOF.

use super::{CharEvent, Utf8Decoder};
use crate::{KeyReaderError, take_interrupt_latch};
use mio::{Events, Interest, Poll, Token, unix::SourceFd};
use rustix::fd::{AsFd, AsRawFd};
use std::{collections::VecDeque,
          io::{self, ErrorKind},
          ops::RangeInclusive,
          time::{Duration, Instant}};

/// Read buffer size for terminal reads (`1_024` bytes).
pub const STDIN_READ_BUFFER_SIZE: usize = 1_024;

pub const DEFAULT_ESCAPE_DELAY_MS: u64 = 30;
pub const ESCAPE_DELAY_RANGE_MS: RangeInclusive<u64> = 10..=5_000;

const EVENTS_CAPACITY: usize = 4;
const INPUT_TOKEN: Token = Token(0);

/// The session loop's view of its input.
pub trait CharSource {
    /// Wait (at most one escape delay) for the next character.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying file descriptor can't be polled or read.
    fn read_char_timed(&mut self) -> io::Result<CharEvent>;

    /// Returns `true` (once) if an interrupt was requested asynchronously since the last
    /// call.
    fn take_interrupt(&mut self) -> bool;
}

/// [`CharSource`] backed by a pollable file descriptor.
#[allow(missing_debug_implementations)]
pub struct PollingCharSource<F: AsFd> {
    input: F,
    poll_handle: Poll,
    ready_events_buffer: Events,
    read_buffer: Box<[u8; STDIN_READ_BUFFER_SIZE]>,
    decoder: Utf8Decoder,
    decoded_chars: VecDeque<char>,
    escape_delay: Duration,
    read_closed: bool,
    eof_reached: bool,
}

/// The production [`CharSource`].
pub type StdinCharSource = PollingCharSource<io::Stdin>;

impl StdinCharSource {
    /// # Errors
    ///
    /// Returns [`KeyReaderError::PollSetup`] if stdin can't be registered with the
    /// poller.
    pub fn try_new_stdin(escape_delay: Duration) -> Result<Self, KeyReaderError> {
        Self::try_new(io::stdin(), escape_delay)
    }
}

impl<F: AsFd> PollingCharSource<F> {
    /// # Errors
    ///
    /// Returns [`KeyReaderError::PollSetup`] if the poller can't be created or `input`
    /// can't be registered with it.
    pub fn try_new(input: F, escape_delay: Duration) -> Result<Self, KeyReaderError> {
        let poll_handle = Poll::new().map_err(KeyReaderError::PollSetup)?;
        let raw_fd = input.as_fd().as_raw_fd();
        poll_handle
            .registry()
            .register(&mut SourceFd(&raw_fd), INPUT_TOKEN, Interest::READABLE)
            .map_err(KeyReaderError::PollSetup)?;

        tracing::debug!(
            message = "char source: registered input with mio::Poll",
            fd = raw_fd,
            escape_delay = ?escape_delay
        );

        Ok(Self {
            input,
            poll_handle,
            ready_events_buffer: Events::with_capacity(EVENTS_CAPACITY),
            read_buffer: Box::new([0; STDIN_READ_BUFFER_SIZE]),
            decoder: Utf8Decoder::new(),
            decoded_chars: VecDeque::new(),
            escape_delay,
            read_closed: false,
            eof_reached: false,
        })
    }

    /// Block until the input is readable or `escape_delay` elapses. Returns `false` on
    /// timeout. Records a hang-up in `read_closed`.
    fn wait_until_readable(&mut self) -> io::Result<bool> {
        let deadline = Instant::now() + self.escape_delay;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self
                .poll_handle
                .poll(&mut self.ready_events_buffer, Some(remaining))
            {
                Ok(()) => {
                    let mut readable = false;
                    for event in self
                        .ready_events_buffer
                        .iter()
                        .filter(|event| event.token() == INPUT_TOKEN)
                    {
                        readable = true;
                        if event.is_read_closed() || event.is_error() {
                            self.read_closed = true;
                        }
                    }
                    if self.read_closed {
                        tracing::debug!(message = "char source: input hung up");
                    }
                    return Ok(readable);
                }
                // EINTR - retry (see module docs: EINTR Handling).
                Err(ref e) if e.kind() == ErrorKind::Interrupted => {
                    if remaining.is_zero() {
                        return Ok(false);
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Read whatever is available and decode it. Returns `false` on EOF.
    fn consume_input(&mut self) -> io::Result<bool> {
        loop {
            match rustix::io::read(&self.input, &mut self.read_buffer[..]) {
                Ok(0) => {
                    tracing::debug!(message = "char source: EOF (0 bytes)");
                    return Ok(false);
                }
                Ok(n) => {
                    tracing::trace!(message = "char source: read bytes", bytes_read = n);
                    self.decoder
                        .decode(&self.read_buffer[..n], &mut self.decoded_chars);
                    // A full buffer means more bytes are likely waiting. Readiness is
                    // edge triggered, so re-arm it to get notified about them.
                    if n == STDIN_READ_BUFFER_SIZE {
                        let raw_fd = self.input.as_fd().as_raw_fd();
                        self.poll_handle.registry().reregister(
                            &mut SourceFd(&raw_fd),
                            INPUT_TOKEN,
                            Interest::READABLE,
                        )?;
                    }
                    return Ok(true);
                }
                Err(e) => {
                    let e = io::Error::from(e);
                    match e.kind() {
                        // EINTR - retry (see module docs: EINTR Handling).
                        ErrorKind::Interrupted => {}
                        // Spurious wakeup.
                        ErrorKind::WouldBlock => return Ok(true),
                        _ => return Err(e),
                    }
                }
            }
        }
    }
}

impl<F: AsFd> CharSource for PollingCharSource<F> {
    fn read_char_timed(&mut self) -> io::Result<CharEvent> {
        loop {
            if let Some(ch) = self.decoded_chars.pop_front() {
                return Ok(CharEvent::Char(ch));
            }

            // A closed stream is always "readable"; don't spin on it.
            if self.eof_reached {
                std::thread::sleep(self.escape_delay);
                return Ok(CharEvent::Eof);
            }

            // After a hang-up no further edge is coming, read straight through to EOF.
            if !self.read_closed && !self.wait_until_readable()? {
                // Give up on a partial UTF-8 sequence once input pauses.
                if self.decoder.has_incomplete_tail() {
                    tracing::trace!(message = "char source: flushing partial UTF-8 sequence");
                }
                self.decoder.flush(&mut self.decoded_chars);
                return Ok(self
                    .decoded_chars
                    .pop_front()
                    .map_or(CharEvent::Timeout, CharEvent::Char));
            }

            if !self.consume_input()? {
                self.eof_reached = true;
                self.decoder.flush(&mut self.decoded_chars);
                if let Some(ch) = self.decoded_chars.pop_front() {
                    return Ok(CharEvent::Char(ch));
                }
                return Ok(CharEvent::Eof);
            }
        }
    }

    fn take_interrupt(&mut self) -> bool { take_interrupt_latch() }
}
