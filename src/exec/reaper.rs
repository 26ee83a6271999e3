use crate::{
    common::Error,
    log::{dev_info, dev_warn},
    system::{
        kill,
        signal::consts::SIGKILL,
        wait::{WaitError, WaitMode},
        ProcessId,
    },
};

use super::{io_util::was_interrupted, BackgroundEvent, BackgroundRegistry, ExitStatus, StatusTracker};

/// Block until the foreground child `pid` finishes and record how it did.
pub fn wait_foreground(pid: ProcessId, tracker: &mut StatusTracker) -> Result<ExitStatus, Error> {
    let status = loop {
        match pid.reap(WaitMode::Block) {
            Err(WaitError::Io(err)) if was_interrupted(&err) => {}
            Err(WaitError::Io(err)) => {
                dev_warn!("cannot wait for foreground pid {pid}: {err}");
                return Err(Error::Wait(pid, err));
            }
            // only possible when polling
            Err(WaitError::NothingFinished) => {}
            Ok((_, state)) => match ExitStatus::from_child_state(state) {
                Some(status) => break status,
                None => dev_info!("foreground pid {pid} changed state: {state:?}"),
            },
        }
    };

    dev_info!("foreground pid {pid} finished: {status:?}");
    tracker.record(status);

    Ok(status)
}

/// Reap every child that has finished since the last sweep, without blocking.
///
/// This waits for *any* child of the shell, not only the ones in `registry`; finished children
/// that are tracked are removed from it. The sweep stops at the first check that reports no
/// finished child, including the case where the shell has no children at all.
pub fn sweep_background(registry: &mut BackgroundRegistry) -> Vec<BackgroundEvent> {
    let mut events = Vec::new();

    loop {
        let (pid, state) = match ProcessId::ANY_CHILD.reap(WaitMode::Poll) {
            Ok(found) => found,
            Err(WaitError::NothingFinished) => break,
            Err(WaitError::Io(err)) if was_interrupted(&err) => continue,
            // `ECHILD`: there is nothing left to reap
            Err(WaitError::Io(_)) => break,
        };

        let Some(status) = ExitStatus::from_child_state(state) else {
            continue;
        };

        if !registry.remove(pid) {
            dev_warn!("reaped pid {pid} which was not running in the background");
        }

        dev_info!("background pid {pid} finished: {status:?}");
        events.push(BackgroundEvent { pid, status });
    }

    events
}

/// Kill every tracked background child and stop tracking them.
///
/// This is best effort: children of those processes are not touched, and pids that already
/// exited are skipped silently. Returns how many processes were signalled.
pub fn terminate_all_background(registry: &mut BackgroundRegistry) -> usize {
    let mut killed = 0;

    for pid in registry.drain() {
        match kill(pid, SIGKILL) {
            Ok(()) => killed += 1,
            Err(err) => dev_warn!("cannot kill background pid {pid}: {err}"),
        }
    }

    killed
}
