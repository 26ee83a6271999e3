use super::ExitStatus;

/// Remembers how the most recent foreground command finished.
///
/// Only [`super::wait_foreground`] writes to it, so background completions never show up here.
#[derive(Debug, Default)]
pub struct StatusTracker {
    last: ExitStatus,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The status of the last foreground command, `exit value 0` if none has run yet.
    pub fn last_foreground_status(&self) -> ExitStatus {
        self.last
    }

    pub(super) fn record(&mut self, status: ExitStatus) {
        self.last = status;
    }
}
