//! Signal dispositions.
use std::{io, mem::MaybeUninit};

use libc::c_int;

use crate::cutils::cerr;

pub(crate) type SignalNumber = c_int;

pub(crate) mod consts {
    pub(crate) use libc::{SIGINT, SIGKILL};
}

/// What the process does when a signal arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Disposition {
    Default,
    Ignore,
}

impl Disposition {
    fn handler(self) -> libc::sighandler_t {
        match self {
            Disposition::Default => libc::SIG_DFL,
            Disposition::Ignore => libc::SIG_IGN,
        }
    }
}

/// The action a signal had before [`set_disposition`] replaced it.
pub(crate) struct SavedAction {
    signal: SignalNumber,
    raw: libc::sigaction,
}

impl SavedAction {
    /// Put the saved action back in place.
    pub(crate) fn restore(self) -> io::Result<()> {
        // SAFETY: `raw` was filled in by `sigaction` itself.
        cerr(unsafe { libc::sigaction(self.signal, &self.raw, std::ptr::null_mut()) }).map(|_| ())
    }
}

/// Change the disposition of `signal`, returning the action it replaced.
pub(crate) fn set_disposition(
    signal: SignalNumber,
    disposition: Disposition,
) -> io::Result<SavedAction> {
    // SAFETY: all-zeroes is a valid `sigaction`: no flags and an empty mask. The struct layout
    // differs between platforms, so it cannot be built as a literal.
    let mut action: libc::sigaction = unsafe { std::mem::zeroed() };
    action.sa_sigaction = disposition.handler();

    let mut previous = MaybeUninit::<libc::sigaction>::zeroed();
    // SAFETY: both pointers are valid for the duration of the call.
    cerr(unsafe { libc::sigaction(signal, &action, previous.as_mut_ptr()) })?;

    Ok(SavedAction {
        signal,
        // SAFETY: `sigaction` succeeded, so it wrote the previous action.
        raw: unsafe { previous.assume_init() },
    })
}

/// The current disposition of `signal`, or `None` if a handler function is installed.
#[cfg(test)]
pub(crate) fn disposition(signal: SignalNumber) -> io::Result<Option<Disposition>> {
    let mut current = MaybeUninit::<libc::sigaction>::zeroed();
    // SAFETY: a null `act` only queries the action.
    cerr(unsafe { libc::sigaction(signal, std::ptr::null(), current.as_mut_ptr()) })?;
    // SAFETY: `sigaction` succeeded, so it wrote the current action.
    let current = unsafe { current.assume_init() };

    Ok(match current.sa_sigaction {
        libc::SIG_DFL => Some(Disposition::Default),
        libc::SIG_IGN => Some(Disposition::Ignore),
        _ => None,
    })
}
