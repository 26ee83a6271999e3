use std::{
    ffi::{CString, OsStr},
    os::{
        fd::{AsRawFd, RawFd},
        unix::ffi::OsStrExt,
    },
    path::Path,
};

use libc::{O_CLOEXEC, O_CREAT, O_RDONLY, O_TRUNC, O_WRONLY, STDIN_FILENO, STDOUT_FILENO};

use crate::{
    common::{ChildFailure, CommandSpec, Error, InputError},
    log::{dev_info, dev_warn, user_error, user_warn},
    system::{_exit, dup2, execvp, fork, open, Argv, ForkResult},
};

use super::{
    reaper::wait_foreground, BackgroundRegistry, LaunchOutcome, SignalController, StatusTracker,
};

/// Mode for files created by an output redirection, before the umask is applied.
const OUTPUT_FILE_MODE: libc::mode_t = 0o644;

/// Run `spec` as a child process.
///
/// Foreground commands block until the child finishes and update `tracker`; background commands
/// are added to `registry` and return immediately. Every failure after the fork is confined to
/// the child, which reports it and exits with the code given by [`ChildFailure::exit_code`].
pub fn launch(
    spec: &CommandSpec,
    registry: &mut BackgroundRegistry,
    tracker: &mut StatusTracker,
) -> LaunchOutcome {
    // Everything the child needs before `exec` is allocated here, in the parent.
    let image = match ProgramImage::new(spec) {
        Ok(image) => image,
        Err(err) => return LaunchOutcome::LaunchFailed(err.into()),
    };

    let pid = match fork() {
        Ok(ForkResult::Parent(pid)) => pid,
        Ok(ForkResult::Child) => exec_child(spec, &image),
        Err(err) => {
            dev_warn!("unable to fork {}: {err}", spec.program().to_string_lossy());
            return LaunchOutcome::LaunchFailed(Error::Fork(err));
        }
    };

    dev_info!("started `{spec}` with pid {pid}");

    if spec.is_background() {
        registry.add(pid);
        return LaunchOutcome::BackgroundStarted(pid);
    }

    match wait_foreground(pid, tracker) {
        Ok(status) => LaunchOutcome::ForegroundResult { pid, status },
        Err(err) => LaunchOutcome::LaunchFailed(err),
    }
}

/// The C strings handed to `open` and `execvp` in the child.
struct ProgramImage {
    program: CString,
    argv: Argv,
    input: Option<CString>,
    output: Option<CString>,
}

impl ProgramImage {
    fn new(spec: &CommandSpec) -> Result<Self, InputError> {
        let to_c = |word: &OsStr| CString::new(word.as_bytes()).map_err(|_| InputError::NulByte);
        let path_to_c = |path: Option<&Path>| path.map(|path| to_c(path.as_os_str())).transpose();

        Ok(Self {
            program: to_c(spec.program())?,
            argv: Argv::new(
                spec.arguments()
                    .iter()
                    .map(|arg| to_c(arg.as_os_str()))
                    .collect::<Result<_, _>>()?,
            ),
            input: path_to_c(spec.effective_input())?,
            output: path_to_c(spec.effective_output())?,
        })
    }
}

/// The child half of [`launch`]; never returns.
///
/// The happy path only makes syscalls. The logger, which allocates and locks, is reached only
/// right before `_exit`.
fn exec_child(spec: &CommandSpec, image: &ProgramImage) -> ! {
    if let Some(path) = &image.input {
        if let Err(failure) = redirect(path, O_RDONLY, STDIN_FILENO) {
            _exit(failure.exit_code());
        }
    }

    if let Some(path) = &image.output {
        if let Err(failure) = redirect(path, O_WRONLY | O_CREAT | O_TRUNC, STDOUT_FILENO) {
            _exit(failure.exit_code());
        }
    }

    if !spec.is_background() {
        if let Err(err) = SignalController::release_in_child() {
            user_warn!("cannot restore the interrupt signal: {err}");
        }
    }

    let err = execvp(&image.program, &image.argv);
    user_error!("{}: {err}", spec.program().to_string_lossy());
    _exit(ChildFailure::Exec.exit_code())
}

/// Open `path` and bind it to the standard stream `target`.
fn redirect(path: &CString, flags: libc::c_int, target: RawFd) -> Result<(), ChildFailure> {
    // the descriptor is closed on return and never leaks into the new image
    let file = open(path, flags | O_CLOEXEC, OUTPUT_FILE_MODE).map_err(|err| {
        user_error!("{}: {err}", path.to_string_lossy());
        ChildFailure::Open
    })?;

    bind(&file, target)
}

/// Make `target` refer to `file`; `dup2` clears close-on-exec on the new descriptor.
fn bind(file: &impl AsRawFd, target: RawFd) -> Result<(), ChildFailure> {
    dup2(file, target).map_err(|err| {
        user_error!("dup2: {err}");
        ChildFailure::Bind
    })
}
