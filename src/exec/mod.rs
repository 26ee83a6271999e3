//! Child process lifecycle: launching, tracking, signalling and reaping.
//!
//! The shell owns a [`BackgroundRegistry`] and a [`StatusTracker`] and passes them by reference
//! to [`launch`], [`sweep_background`] and [`terminate_all_background`]. Nothing in this module
//! keeps global state other than the process' signal dispositions, which are managed through a
//! [`SignalController`].
#![deny(unsafe_code)]

mod io_util;
mod launcher;
mod reaper;
mod registry;
mod signal_controller;
mod status;

use std::fmt;

use libc::c_int;

use crate::{
    common::Error,
    system::{wait::ChildState, ProcessId},
};

pub use launcher::launch;
pub use reaper::{sweep_background, terminate_all_background, wait_foreground};
pub use registry::BackgroundRegistry;
pub use signal_controller::SignalController;
pub use status::StatusTracker;

/// How a child process finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// The child called `exit` with this code.
    ExitedNormally(c_int),
    /// The child was terminated by this signal.
    Terminated(c_int),
}

impl ExitStatus {
    /// Classify what `waitpid` reported, or `None` if the child has not finished.
    pub(crate) fn from_child_state(state: ChildState) -> Option<Self> {
        match state {
            ChildState::Exited(code) => Some(ExitStatus::ExitedNormally(code)),
            ChildState::Signaled(signal) => Some(ExitStatus::Terminated(signal)),
            ChildState::Other(_) => None,
        }
    }
}

impl Default for ExitStatus {
    fn default() -> Self {
        ExitStatus::ExitedNormally(0)
    }
}

/// Formats the status the way the `status` built-in reports it.
impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitStatus::ExitedNormally(code) => write!(f, "exit value {code}"),
            ExitStatus::Terminated(signal) => write!(f, "terminated by signal {signal}"),
        }
    }
}

/// The result of handing a command to [`launch`].
#[derive(Debug)]
pub enum LaunchOutcome {
    /// A foreground child ran to completion.
    ForegroundResult { pid: ProcessId, status: ExitStatus },
    /// A background child was started and registered.
    BackgroundStarted(ProcessId),
    /// No child could be run; the shell is unaffected.
    LaunchFailed(Error),
}

impl LaunchOutcome {
    /// The line the shell should print for this outcome, if any.
    ///
    /// Failures are reported through the logger instead.
    pub fn report(&self) -> Option<String> {
        match self {
            LaunchOutcome::BackgroundStarted(pid) => Some(format!("background pid is {pid}")),
            LaunchOutcome::ForegroundResult {
                pid,
                status: ExitStatus::Terminated(signal),
            } => Some(format!("pid {pid} is done: terminated by signal {signal}")),
            LaunchOutcome::ForegroundResult { .. } | LaunchOutcome::LaunchFailed(_) => None,
        }
    }
}

/// A finished child observed by [`sweep_background`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundEvent {
    pub pid: ProcessId,
    pub status: ExitStatus,
}

impl fmt::Display for BackgroundEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pid = self.pid;
        match self.status {
            ExitStatus::ExitedNormally(code) => {
                write!(f, "background pid {pid} exited with code {code}")
            }
            ExitStatus::Terminated(signal) => {
                write!(f, "background pid {pid} is done: terminated by sig {signal}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use pretty_assertions::assert_eq;

    use super::{BackgroundEvent, ExitStatus, LaunchOutcome};
    use crate::{
        common::Error,
        system::{wait::ChildState, ProcessId},
    };

    #[test]
    fn background_event_lines() {
        let exited = BackgroundEvent {
            pid: ProcessId::new(4923),
            status: ExitStatus::ExitedNormally(0),
        };
        assert_eq!(exited.to_string(), "background pid 4923 exited with code 0");

        let killed = BackgroundEvent {
            pid: ProcessId::new(4941),
            status: ExitStatus::Terminated(15),
        };
        assert_eq!(
            killed.to_string(),
            "background pid 4941 is done: terminated by sig 15"
        );
    }

    #[test]
    fn launch_outcome_reports() {
        let started = LaunchOutcome::BackgroundStarted(ProcessId::new(4923));
        assert_eq!(started.report().as_deref(), Some("background pid is 4923"));

        let interrupted = LaunchOutcome::ForegroundResult {
            pid: ProcessId::new(4950),
            status: ExitStatus::Terminated(2),
        };
        assert_eq!(
            interrupted.report().as_deref(),
            Some("pid 4950 is done: terminated by signal 2")
        );

        let failed = LaunchOutcome::ForegroundResult {
            pid: ProcessId::new(4951),
            status: ExitStatus::ExitedNormally(1),
        };
        assert_eq!(failed.report(), None);

        let no_fork = LaunchOutcome::LaunchFailed(Error::Fork(io::Error::from_raw_os_error(
            libc::EAGAIN,
        )));
        assert_eq!(no_fork.report(), None);
    }

    #[test]
    fn only_finished_children_have_a_status() {
        assert_eq!(
            ExitStatus::from_child_state(ChildState::Exited(3)),
            Some(ExitStatus::ExitedNormally(3))
        );
        assert_eq!(
            ExitStatus::from_child_state(ChildState::Signaled(15)),
            Some(ExitStatus::Terminated(15))
        );
        // a stopped child, as `waitpid` encodes it
        assert_eq!(ExitStatus::from_child_state(ChildState::Other(0x137f)), None);
    }

    #[test]
    fn exit_code_and_signal_are_distinct() {
        assert_ne!(ExitStatus::ExitedNormally(4), ExitStatus::Terminated(4));
        assert_eq!(ExitStatus::ExitedNormally(4).to_string(), "exit value 4");
        assert_eq!(
            ExitStatus::Terminated(4).to_string(),
            "terminated by signal 4"
        );
        assert_eq!(ExitStatus::default(), ExitStatus::ExitedNormally(0));
    }
}
