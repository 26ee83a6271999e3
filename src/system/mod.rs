//! Safe wrappers around the handful of process-management syscalls the shell needs.
use std::{
    ffi::{CStr, CString},
    io,
    os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd},
    path::Path,
};

use crate::cutils::{cerr, path_to_cstring};

pub use interface::ProcessId;
use signal::SignalNumber;

pub mod interface;

pub(crate) mod signal;

pub(crate) mod wait;

pub(crate) fn _exit(status: libc::c_int) -> ! {
    // SAFETY: `_exit` skips atexit handlers and stdio flushing, which is what a forked child wants.
    unsafe { libc::_exit(status) }
}

pub(crate) enum ForkResult {
    Parent(ProcessId),
    Child,
}

/// Create a new process.
///
/// The child of a multithreaded process may deadlock if it takes a lock another thread held at
/// the time of the fork. The shell itself is single-threaded; callers that fork from a test
/// harness must only take locks in the child on paths that end in [`_exit`].
pub(crate) fn fork() -> io::Result<ForkResult> {
    // SAFETY: `fork` has no preconditions; the caveat above concerns the child's later calls.
    let pid = cerr(unsafe { libc::fork() })?;
    if pid == 0 {
        Ok(ForkResult::Child)
    } else {
        Ok(ForkResult::Parent(ProcessId::new(pid)))
    }
}

/// Send a signal to a process with the specified ID.
pub(crate) fn kill(pid: ProcessId, signal: SignalNumber) -> io::Result<()> {
    // SAFETY: This function cannot cause UB even if `pid` is not a valid process ID or if
    // `signal` is not a valid signal code.
    cerr(unsafe { libc::kill(pid.get(), signal) }).map(|_| ())
}

/// Open `path` with the raw `open(2)` flags; `mode` only matters when a file is created.
///
/// Takes an already converted path so that nothing is allocated in a freshly forked child.
pub(crate) fn open(path: &CStr, flags: libc::c_int, mode: libc::mode_t) -> io::Result<OwnedFd> {
    // SAFETY: `path` is NUL-terminated; the mode is passed as the promoted variadic type.
    let fd = cerr(unsafe { libc::open(path.as_ptr(), flags, mode as libc::c_uint) })?;
    // SAFETY: `open` just returned this descriptor, nothing else owns it.
    Ok(unsafe { OwnedFd::from_raw_fd(fd) })
}

/// Make `target` refer to the same open file description as `fd`.
pub(crate) fn dup2<F: AsRawFd>(fd: &F, target: RawFd) -> io::Result<()> {
    // SAFETY: `dup2` only manipulates the descriptor table; an invalid descriptor is reported as
    // `EBADF`.
    cerr(unsafe { libc::dup2(fd.as_raw_fd(), target) }).map(|_| ())
}

/// Change the working directory of the current process.
pub fn chdir<P: AsRef<Path>>(path: P) -> io::Result<()> {
    let path = path_to_cstring(path.as_ref())?;
    // SAFETY: `path` is NUL-terminated.
    cerr(unsafe { libc::chdir(path.as_ptr()) }).map(|_| ())
}

/// Replace the current process image, searching `PATH` for `program` if it has no slash.
///
/// This only returns if the replacement failed.
pub(crate) fn execvp(program: &CStr, argv: &Argv) -> io::Error {
    // SAFETY: `program` is NUL-terminated and `argv` is a NULL-terminated array of pointers into
    // strings owned by `argv` itself.
    unsafe { libc::execvp(program.as_ptr(), argv.pointers.as_ptr()) };
    io::Error::last_os_error()
}

/// An argument vector in the shape `execvp` expects, built before forking.
pub(crate) struct Argv {
    // `pointers` borrows from the heap buffers of `_strings`, which never move.
    _strings: Vec<CString>,
    pointers: Vec<*const libc::c_char>,
}

impl Argv {
    pub(crate) fn new(strings: Vec<CString>) -> Self {
        let pointers = strings
            .iter()
            .map(|arg| arg.as_ptr())
            .chain(std::iter::once(std::ptr::null()))
            .collect();

        Self {
            _strings: strings,
            pointers,
        }
    }
}
