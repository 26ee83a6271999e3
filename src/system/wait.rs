use std::io;

use libc::{c_int, WEXITSTATUS, WIFEXITED, WIFSIGNALED, WNOHANG, WTERMSIG};

use crate::cutils::cerr;

use super::{interface::ProcessId, signal::SignalNumber};

/// Whether [`ProcessId::reap`] may block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WaitMode {
    /// Sleep until a matching child finishes.
    Block,
    /// Return [`WaitError::NothingFinished`] instead of sleeping.
    Poll,
}

#[derive(Debug)]
pub(crate) enum WaitError {
    /// A matching child exists but is still running; only returned by [`WaitMode::Poll`].
    NothingFinished,
    /// `waitpid` failed, e.g. with `ECHILD` when there is nothing to wait for.
    Io(io::Error),
}

/// What `waitpid` reported about a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChildState {
    Exited(c_int),
    Signaled(SignalNumber),
    /// Any other state change; the raw status is kept for diagnostics.
    Other(c_int),
}

impl ChildState {
    fn from_raw(status: c_int) -> Self {
        if WIFEXITED(status) {
            ChildState::Exited(WEXITSTATUS(status))
        } else if WIFSIGNALED(status) {
            ChildState::Signaled(WTERMSIG(status))
        } else {
            ChildState::Other(status)
        }
    }
}

impl ProcessId {
    /// Collect a finished child: this one, or any child for [`ProcessId::ANY_CHILD`].
    ///
    /// Returns the pid that was actually reaped alongside its state.
    pub(crate) fn reap(self, mode: WaitMode) -> Result<(ProcessId, ChildState), WaitError> {
        let flags = match mode {
            WaitMode::Block => 0,
            WaitMode::Poll => WNOHANG,
        };
        let mut status: c_int = 0;

        // SAFETY: `status` is a valid place for `waitpid` to write to.
        let pid = cerr(unsafe { libc::waitpid(self.get(), &mut status, flags) })
            .map_err(WaitError::Io)?;

        if pid == 0 {
            return Err(WaitError::NothingFinished);
        }

        Ok((ProcessId::new(pid), ChildState::from_raw(status)))
    }
}
