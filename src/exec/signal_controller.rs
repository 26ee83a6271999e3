use std::io;

use crate::{
    log::{dev_debug, dev_warn},
    system::signal::{consts::SIGINT, set_disposition, Disposition, SavedAction},
};

/// Keeps the interrupt signal away from the shell and its background children.
///
/// While a controller is shielding, the shell ignores `SIGINT`. Children inherit that
/// disposition across `fork`; foreground children undo it with
/// [`SignalController::release_in_child`] right before `exec`, so `^C` only reaches the command
/// the shell is waiting for. Dropping the controller restores the disposition the process had
/// before the first [`SignalController::shield`].
#[derive(Default)]
pub struct SignalController {
    original: Option<SavedAction>,
}

impl SignalController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignore `SIGINT` in the shell. Must be called before each blocking read of input.
    pub fn shield(&mut self) -> io::Result<()> {
        let previous = set_disposition(SIGINT, Disposition::Ignore)?;
        // later calls only see our own `Ignore`
        if self.original.is_none() {
            self.original = Some(previous);
        }
        Ok(())
    }

    /// Reset `SIGINT` to its default action in a freshly forked foreground child.
    ///
    /// This must only run in the child, between `fork` and `exec`.
    pub(super) fn release_in_child() -> io::Result<()> {
        set_disposition(SIGINT, Disposition::Default)?;
        dev_debug!("restored default SIGINT action in pid {}", std::process::id());
        Ok(())
    }
}

impl Drop for SignalController {
    fn drop(&mut self) {
        if let Some(original) = self.original.take() {
            if let Err(err) = original.restore() {
                dev_warn!("cannot restore the original SIGINT action: {err}");
            }
        }
    }
}

// Tests touching the process-wide SIGINT disposition live in `launcher.rs`, in a single test, so
// they cannot race with each other.
