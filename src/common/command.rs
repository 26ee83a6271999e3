use std::{
    ffi::{OsStr, OsString},
    fmt::Display,
    path::{Path, PathBuf},
};

use super::InputError;

/// The device an unredirected background command reads from and writes to.
pub const NULL_DEVICE: &str = "/dev/null";

/// A fully parsed command line, ready to be handed to the launcher.
///
/// The first argument is always the program name. Words are kept as raw bytes, exactly as they
/// were typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    arguments: Vec<OsString>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    background: bool,
}

impl CommandSpec {
    pub fn new(program: impl Into<OsString>) -> Result<Self, InputError> {
        let program = program.into();
        if program.is_empty() {
            return Err(InputError::EmptyProgram);
        }

        Ok(Self {
            arguments: vec![program],
            input: None,
            output: None,
            background: false,
        })
    }

    pub fn arg(mut self, argument: impl Into<OsString>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    pub fn args<I, S>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.arguments.extend(arguments.into_iter().map(Into::into));
        self
    }

    /// Read standard input from `path` instead of inheriting it.
    pub fn stdin_from(mut self, path: impl Into<PathBuf>) -> Self {
        self.input = Some(path.into());
        self
    }

    /// Write standard output to `path` instead of inheriting it.
    pub fn stdout_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    pub fn background(mut self, background: bool) -> Self {
        self.background = background;
        self
    }

    pub fn program(&self) -> &OsStr {
        &self.arguments[0]
    }

    pub fn arguments(&self) -> &[OsString] {
        &self.arguments
    }

    pub fn input(&self) -> Option<&Path> {
        self.input.as_deref()
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn is_background(&self) -> bool {
        self.background
    }

    /// The path the child binds to standard input, if any.
    ///
    /// Background commands without an explicit redirect read from [`NULL_DEVICE`] so they never
    /// compete with the shell for the terminal.
    pub fn effective_input(&self) -> Option<&Path> {
        self.input().or_else(|| self.null_if_background())
    }

    /// The path the child binds to standard output, if any.
    pub fn effective_output(&self) -> Option<&Path> {
        self.output().or_else(|| self.null_if_background())
    }

    fn null_if_background(&self) -> Option<&Path> {
        self.background.then(|| Path::new(NULL_DEVICE))
    }
}

impl Display for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let words: Vec<_> = self.arguments.iter().map(|arg| arg.to_string_lossy()).collect();
        write!(f, "{}", words.join(" "))?;
        if let Some(input) = &self.input {
            write!(f, " < {}", input.display())?;
        }
        if let Some(output) = &self.output {
            write!(f, " > {}", output.display())?;
        }
        if self.background {
            f.write_str(" &")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::{ffi::OsStr, path::Path};

    use pretty_assertions::assert_eq;

    use super::{CommandSpec, NULL_DEVICE};
    use crate::common::InputError;

    #[test]
    fn program_is_argument_zero() {
        let spec = CommandSpec::new("ls").unwrap().args(["-l", "/tmp"]);
        assert_eq!(spec.program(), "ls");
        assert_eq!(spec.arguments(), ["ls", "-l", "/tmp"]);
    }

    #[test]
    fn arguments_keep_their_bytes() {
        use std::os::unix::ffi::OsStrExt;

        let spec = CommandSpec::new("touch")
            .unwrap()
            .arg(OsStr::from_bytes(b"caf\xe9"));
        assert_eq!(spec.arguments()[1].as_bytes(), b"caf\xe9");
        assert_eq!(spec.to_string(), "touch caf\u{fffd}");
    }

    #[test]
    fn empty_program_is_rejected() {
        assert_eq!(CommandSpec::new("").unwrap_err(), InputError::EmptyProgram);
    }

    #[test]
    fn foreground_has_no_default_redirects() {
        let spec = CommandSpec::new("cat").unwrap();
        assert_eq!(spec.effective_input(), None);
        assert_eq!(spec.effective_output(), None);
    }

    #[test]
    fn background_defaults_to_null_device() {
        let spec = CommandSpec::new("sleep")
            .unwrap()
            .arg("5")
            .background(true);
        assert_eq!(spec.effective_input(), Some(Path::new(NULL_DEVICE)));
        assert_eq!(spec.effective_output(), Some(Path::new(NULL_DEVICE)));
    }

    #[test]
    fn explicit_redirects_win_over_null_device() {
        let spec = CommandSpec::new("sort")
            .unwrap()
            .stdin_from("in.txt")
            .background(true);
        assert_eq!(spec.effective_input(), Some(Path::new("in.txt")));
        assert_eq!(spec.effective_output(), Some(Path::new(NULL_DEVICE)));

        let spec = CommandSpec::new("ls")
            .unwrap()
            .stdout_to("out.txt")
            .background(true);
        assert_eq!(spec.effective_input(), Some(Path::new(NULL_DEVICE)));
        assert_eq!(spec.effective_output(), Some(Path::new("out.txt")));
    }

    #[test]
    fn display_round_trips_the_command_line() {
        let spec = CommandSpec::new("wc")
            .unwrap()
            .arg("-l")
            .stdin_from("junk")
            .stdout_to("junk2")
            .background(true);
        assert_eq!(spec.to_string(), "wc -l < junk > junk2 &");
    }
}
