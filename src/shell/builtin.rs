use std::{
    ffi::{OsStr, OsString},
    io::Write,
    os::unix::ffi::OsStrExt,
    path::PathBuf,
};

use crate::{common::Error, system::chdir};

pub(crate) const CD_USAGE: &str = "smallsh: cd: usage: cd [directory]";

/// Commands the shell runs itself instead of forking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Builtin {
    Cd,
    Status,
    Exit,
}

impl Builtin {
    pub(crate) fn lookup(program: &OsStr) -> Option<Self> {
        match program.as_bytes() {
            b"cd" => Some(Builtin::Cd),
            b"status" => Some(Builtin::Status),
            b"exit" => Some(Builtin::Exit),
            _ => None,
        }
    }
}

/// `cd [directory]`; without a directory, go to `home`.
pub(crate) fn cd(
    arguments: &[OsString],
    home: Option<OsString>,
    output: &mut impl Write,
) -> Result<(), Error> {
    let target = match arguments {
        [] => PathBuf::from(home.ok_or(Error::HomeNotSet)?),
        [directory] => PathBuf::from(directory),
        _ => {
            writeln!(output, "{CD_USAGE}")?;
            return Ok(());
        }
    };

    chdir(&target).map_err(|err| Error::ChDir(target, err))
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use super::{cd, Builtin, CD_USAGE};
    use crate::common::Error;

    #[test]
    fn lookup() {
        assert_eq!(Builtin::lookup(OsStr::new("cd")), Some(Builtin::Cd));
        assert_eq!(Builtin::lookup(OsStr::new("status")), Some(Builtin::Status));
        assert_eq!(Builtin::lookup(OsStr::new("exit")), Some(Builtin::Exit));
        assert_eq!(Builtin::lookup(OsStr::new("exit2")), None);
        assert_eq!(Builtin::lookup(OsStr::new("ls")), None);
    }

    // These never succeed in changing directory, so they cannot disturb tests that run
    // concurrently in the same process.
    #[test]
    fn usage_on_too_many_arguments() {
        let mut output = Vec::new();
        cd(&["a".into(), "b".into()], None, &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), format!("{CD_USAGE}\n"));
    }

    #[test]
    fn missing_home() {
        let mut output = Vec::new();
        assert!(matches!(
            cd(&[], None, &mut output),
            Err(Error::HomeNotSet)
        ));
    }

    #[test]
    fn missing_directory() {
        let mut output = Vec::new();
        let err = cd(&["/smallsh/not/here".into()], None, &mut output).unwrap_err();
        let Error::ChDir(path, err) = err else {
            panic!("expected a chdir error, got {err:?}");
        };
        assert_eq!(path.to_str(), Some("/smallsh/not/here"));
        assert_eq!(err.raw_os_error(), Some(libc::ENOENT));

        let err = cd(&[], Some("/smallsh/no/home".into()), &mut output).unwrap_err();
        assert!(matches!(err, Error::ChDir(..)));
        assert!(output.is_empty());
    }
}
