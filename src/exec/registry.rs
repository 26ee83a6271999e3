use crate::{log::dev_warn, system::ProcessId};

/// The background children that have been started but not yet reaped, in launch order.
#[derive(Debug, Default)]
pub struct BackgroundRegistry {
    pids: Vec<ProcessId>,
}

impl BackgroundRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a freshly forked background child.
    ///
    /// A process ID is only reused by the kernel after the previous owner was reaped, so a pid
    /// that is already tracked points at a bookkeeping bug and is not added twice.
    pub fn add(&mut self, pid: ProcessId) {
        if self.contains(pid) {
            dev_warn!("background pid {pid} is already tracked");
            return;
        }

        self.pids.push(pid);
    }

    /// Stop tracking `pid`, keeping the remaining pids in launch order.
    ///
    /// Returns `false` if `pid` was not tracked.
    pub fn remove(&mut self, pid: ProcessId) -> bool {
        match self.pids.iter().position(|&tracked| tracked == pid) {
            Some(index) => {
                self.pids.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, pid: ProcessId) -> bool {
        self.pids.contains(&pid)
    }

    pub fn snapshot(&self) -> Vec<ProcessId> {
        self.pids.clone()
    }

    pub fn len(&self) -> usize {
        self.pids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pids.is_empty()
    }

    /// Forget every tracked pid, handing them to the caller.
    pub(super) fn drain(&mut self) -> Vec<ProcessId> {
        std::mem::take(&mut self.pids)
    }
}
