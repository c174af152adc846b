// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::InlineVec;
use signal_hook::{consts::{SIGABRT, SIGHUP, SIGINT, SIGKILL, SIGSEGV, SIGSTOP, SIGTERM},
                  low_level};
use std::{cell::UnsafeCell,
          ffi::{c_int, c_void},
          fmt::{self, Write as _},
          io,
          mem::{self, MaybeUninit},
          ops::Range,
          ptr,
          sync::atomic::{AtomicBool, AtomicU8, Ordering}};

/// Cleared by a terminating signal. The session loop checks it once per iteration.
pub static KEEP_RUNNING: AtomicBool = AtomicBool::new(true);

/// Set by `SIGINT`, cleared by [`take_interrupt_latch`].
static INTERRUPT_LATCHED: AtomicBool = AtomicBool::new(false);

/// Every classic (non real-time) signal number.
pub const CLASSIC_SIGNAL_RANGE: Range<c_int> = 1..32;

/// Receiving one of these ends the session.
pub const TERMINATING_SIGNALS: [c_int; 4] = [SIGHUP, SIGTERM, SIGABRT, SIGSEGV];

/// One slot per classic signal number, indexed by the signal number.
const PREVIOUS_ACTION_SLOTS: usize = 32;

/// Fits `signal #NN (SIGXXXXXX) received\n` with room to spare.
const NOTICE_BUFFER_SIZE: usize = 64;

#[must_use]
pub fn is_terminating_signal(signo: c_int) -> bool { TERMINATING_SIGNALS.contains(&signo) }

/// Returns `true` (once) if `SIGINT` was received since the last call.
pub fn take_interrupt_latch() -> bool { INTERRUPT_LATCHED.swap(false, Ordering::SeqCst) }

/// Fixed capacity text buffer that lives on the stack, usable from a signal handler.
#[derive(Debug)]
pub struct SignalNoticeBuffer {
    bytes: [u8; NOTICE_BUFFER_SIZE],
    len: usize,
}

impl Default for SignalNoticeBuffer {
    fn default() -> Self {
        Self {
            bytes: [0; NOTICE_BUFFER_SIZE],
            len: 0,
        }
    }
}

impl SignalNoticeBuffer {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] { &self.bytes[..self.len] }
}

impl fmt::Write for SignalNoticeBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.len + s.len();
        let Some(dest) = self.bytes.get_mut(self.len..end) else {
            return Err(fmt::Error);
        };
        dest.copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

/// Format `signal #N (NAME) received\n` without allocating.
pub fn format_signal_notice(signo: c_int, buffer: &mut SignalNoticeBuffer) -> fmt::Result {
    let name = low_level::signal_name(signo).unwrap_or("unknown");
    writeln!(buffer, "signal #{signo} ({name}) received")
}

/// The body of the handler. Must remain async-signal-safe: no allocation, no locks, no
/// buffered I/O.
pub fn handle_signal(signo: c_int, keep_running: &AtomicBool, interrupt_latched: &AtomicBool) {
    let mut notice = SignalNoticeBuffer::default();
    if format_signal_notice(signo, &mut notice).is_ok() {
        // Unbuffered, a single write(2).
        let _unused = rustix::io::write(io::stderr(), notice.as_bytes());
    }

    if is_terminating_signal(signo) {
        keep_running.store(false, Ordering::SeqCst);
    } else if signo == SIGINT {
        interrupt_latched.store(true, Ordering::SeqCst);
    }
}

/// Slot states. A slot moves `EMPTY -> CLAIMED -> INSTALLED` on install, and back to
/// `EMPTY` when the handler is removed.
const SLOT_EMPTY: u8 = 0;
const SLOT_CLAIMED: u8 = 1;
const SLOT_INSTALLED: u8 = 2;

/// The disposition a signal had before our handler replaced it.
struct PreviousAction {
    state: AtomicU8,
    action: UnsafeCell<MaybeUninit<libc::sigaction>>,
}

// SAFETY: `action` is only written by the thread that moved `state` from `SLOT_EMPTY` to
// `SLOT_CLAIMED`, and only read after observing `SLOT_INSTALLED` (Release / Acquire).
unsafe impl Sync for PreviousAction {}

impl PreviousAction {
    const fn new() -> Self {
        Self {
            state: AtomicU8::new(SLOT_EMPTY),
            action: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    /// The saved action, if our handler is installed for this slot.
    fn get(&self) -> Option<libc::sigaction> {
        if self.state.load(Ordering::Acquire) != SLOT_INSTALLED {
            return None;
        }
        // SAFETY: `SLOT_INSTALLED` is only stored after `action` was initialized.
        Some(unsafe { (*self.action.get()).assume_init() })
    }
}

static PREVIOUS_ACTIONS: [PreviousAction; PREVIOUS_ACTION_SLOTS] =
    [const { PreviousAction::new() }; PREVIOUS_ACTION_SLOTS];

fn previous_action_slot(signo: c_int) -> Option<&'static PreviousAction> {
    usize::try_from(signo)
        .ok()
        .and_then(|index| PREVIOUS_ACTIONS.get(index))
}

/// Entry point installed with `sigaction(2)`. Reports the signal and updates the shared
/// flags first, then hands the signal to whatever handler was installed before ours.
extern "C" fn dispatch_signal(signo: c_int, info: *mut libc::siginfo_t, context: *mut c_void) {
    handle_signal(signo, &KEEP_RUNNING, &INTERRUPT_LATCHED);
    chain_to_previous(signo, info, context);
}

/// Calls the handler saved at install time. The default action and ignore are not
/// invoked.
fn chain_to_previous(signo: c_int, info: *mut libc::siginfo_t, context: *mut c_void) {
    let Some(previous) = previous_action_slot(signo).and_then(PreviousAction::get) else {
        return;
    };

    let handler = previous.sa_sigaction;
    if handler == libc::SIG_DFL || handler == libc::SIG_IGN {
        return;
    }

    if previous.sa_flags & libc::SA_SIGINFO != 0 {
        // SAFETY: with `SA_SIGINFO` set the kernel stores a three argument handler.
        let handler: extern "C" fn(c_int, *mut libc::siginfo_t, *mut c_void) =
            unsafe { mem::transmute(handler) };
        handler(signo, info, context);
    } else {
        // SAFETY: without `SA_SIGINFO` the kernel stores a one argument handler.
        let handler: extern "C" fn(c_int) = unsafe { mem::transmute(handler) };
        handler(signo);
    }
}

fn dispatch_action() -> libc::sigaction {
    let handler: extern "C" fn(c_int, *mut libc::siginfo_t, *mut c_void) = dispatch_signal;
    // SAFETY: `sigaction` is plain old data, all zeroes is a valid (empty) value.
    let mut action: libc::sigaction = unsafe { mem::zeroed() };
    action.sa_sigaction = handler as libc::sighandler_t;
    action.sa_flags = libc::SA_SIGINFO;
    // SAFETY: `sa_mask` is a valid, owned `sigset_t`.
    unsafe { libc::sigemptyset(&raw mut action.sa_mask) };
    action
}

/// Save the current disposition of `signo` and replace it with [`dispatch_signal`].
fn install_one(signo: c_int, ours: &libc::sigaction) -> io::Result<()> {
    let slot = previous_action_slot(signo)
        .ok_or_else(|| io::Error::from_raw_os_error(libc::EINVAL))?;

    if slot
        .state
        .compare_exchange(SLOT_EMPTY, SLOT_CLAIMED, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        return Err(io::Error::from(io::ErrorKind::AlreadyExists));
    }

    let mut previous = MaybeUninit::<libc::sigaction>::uninit();
    // SAFETY: a null new action only queries; `previous` is valid for writes.
    if unsafe { libc::sigaction(signo, ptr::null(), previous.as_mut_ptr()) } != 0 {
        let error = io::Error::last_os_error();
        slot.state.store(SLOT_EMPTY, Ordering::Release);
        return Err(error);
    }

    // SAFETY: this thread owns the slot while it is `SLOT_CLAIMED`.
    unsafe { *slot.action.get() = previous };
    slot.state.store(SLOT_INSTALLED, Ordering::Release);

    // SAFETY: `ours` points at a fully initialized action whose handler is
    // async-signal-safe.
    if unsafe { libc::sigaction(signo, ours, ptr::null_mut()) } != 0 {
        let error = io::Error::last_os_error();
        slot.state.store(SLOT_EMPTY, Ordering::Release);
        return Err(error);
    }

    Ok(())
}

/// Put back the disposition saved by [`install_one`].
fn uninstall_one(signo: c_int) {
    let Some(slot) = previous_action_slot(signo) else {
        return;
    };
    let Some(previous) = slot.get() else {
        return;
    };

    // SAFETY: `previous` was returned by the kernel for this signal.
    if unsafe { libc::sigaction(signo, &raw const previous, ptr::null_mut()) } != 0 {
        tracing::warn!(
            message = "signals: could not restore previous handler",
            signo,
            error = ?io::Error::last_os_error()
        );
    }
    slot.state.store(SLOT_EMPTY, Ordering::Release);
}

/// Record of the handlers this process installed. Dropping it puts back the handlers
/// that were there before.
///
/// The previous disposition of each signal is saved once, when our handler is
/// installed. After reporting the signal and updating [`KEEP_RUNNING`], the handler
/// calls that previous handler (unless it was the default action or ignore).
#[derive(Debug, Default)]
pub struct InstalledSignalHandlers {
    installed: InlineVec<c_int>,
}

impl InstalledSignalHandlers {
    #[must_use]
    pub fn len(&self) -> usize { self.installed.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.installed.is_empty() }

    #[must_use]
    pub fn contains(&self, signo: c_int) -> bool { self.installed.contains(&signo) }
}

impl Drop for InstalledSignalHandlers {
    fn drop(&mut self) {
        for signo in self.installed.drain(..) {
            uninstall_one(signo);
        }
    }
}

/// Install the handler for every catchable signal in [`CLASSIC_SIGNAL_RANGE`].
/// `SIGKILL` and `SIGSTOP` can't be caught and are skipped. Signals the OS refuses are
/// logged and skipped.
#[must_use]
pub fn install_signal_handlers() -> InstalledSignalHandlers {
    install_signal_handlers_for(
        CLASSIC_SIGNAL_RANGE.filter(|signo| *signo != SIGKILL && *signo != SIGSTOP),
    )
}

/// Install the handler for the given signals only. A signal that already has our handler
/// installed is skipped.
#[must_use]
pub fn install_signal_handlers_for(
    signals: impl IntoIterator<Item = c_int>,
) -> InstalledSignalHandlers {
    let ours = dispatch_action();
    let mut acc = InstalledSignalHandlers::default();

    for signo in signals {
        match install_one(signo, &ours) {
            Ok(()) => acc.installed.push(signo),
            Err(error) => {
                tracing::warn!(
                    message = "signals: could not install handler",
                    signo,
                    name = low_level::signal_name(signo),
                    error = ?error
                );
            }
        }
    }

    tracing::debug!(
        message = "signals: installed handlers",
        count = acc.len()
    );

    acc
}
