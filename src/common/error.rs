use std::{fmt, io, path::PathBuf};

use crate::system::ProcessId;

#[derive(Debug)]
pub enum Error {
    /// The shell could not fork a child for a command.
    Fork(io::Error),
    /// Blocking on a foreground child failed.
    Wait(ProcessId, io::Error),
    ChDir(PathBuf, io::Error),
    HomeNotSet,
    Input(InputError),
    Options(String),
    /// Reading commands or writing the shell's own output failed.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Fork(e) => write!(f, "fork: {e}"),
            Error::Wait(pid, e) => write!(f, "cannot wait for pid {pid}: {e}"),
            Error::ChDir(path, e) => write!(f, "cd: {}: {e}", path.display()),
            Error::HomeNotSet => f.write_str("cd: HOME not set"),
            Error::Input(e) => write!(f, "{e}"),
            Error::Options(e) => write!(f, "{e}"),
            Error::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<InputError> for Error {
    fn from(err: InputError) -> Self {
        Error::Input(err)
    }
}

/// Which standard stream a redirection operator rebinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    Input,
    Output,
}

impl fmt::Display for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Redirect::Input => f.write_str("<"),
            Redirect::Output => f.write_str(">"),
        }
    }
}

/// Reasons a command line is rejected before anything is launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    LineTooLong { limit: usize },
    TooManyArguments { limit: usize },
    MissingRedirectTarget(Redirect),
    DuplicateRedirect(Redirect),
    EmptyProgram,
    NulByte,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::LineTooLong { limit } => {
                write!(f, "line too long (at most {limit} characters)")
            }
            InputError::TooManyArguments { limit } => {
                write!(f, "too many arguments (at most {limit})")
            }
            InputError::MissingRedirectTarget(op) => {
                write!(f, "syntax error: expected a file name after '{op}'")
            }
            InputError::DuplicateRedirect(op) => {
                write!(f, "syntax error: '{op}' given more than once")
            }
            InputError::EmptyProgram => f.write_str("syntax error: missing command name"),
            InputError::NulByte => f.write_str("input contains a nul byte"),
        }
    }
}

/// Ways a forked child can fail before its program image is replaced.
///
/// These never travel back to the shell as values: the child reports them on standard error and
/// terminates with [`ChildFailure::exit_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildFailure {
    /// A redirection target could not be opened.
    Open,
    /// An opened redirection target could not be bound to the standard stream.
    Bind,
    /// The program image could not be replaced.
    Exec,
}

impl ChildFailure {
    pub const fn exit_code(self) -> libc::c_int {
        match self {
            ChildFailure::Open | ChildFailure::Exec => 1,
            ChildFailure::Bind => 2,
        }
    }
}
