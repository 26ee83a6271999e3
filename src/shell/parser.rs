//! Splits one line of input into a [`CommandSpec`].
//!
//! The grammar is deliberately small: words separated by blanks, `< file` and `> file` at most
//! once each, and a trailing `&` for background execution. There is no quoting.
use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

use crate::common::{CommandSpec, InputError, Redirect};

/// Longest accepted line, not counting the line terminator.
pub const MAX_LINE_LEN: usize = 2048;
/// Most words a command may have, including the program name.
pub const MAX_ARGS: usize = 512;

#[derive(Debug, PartialEq, Eq)]
pub enum Line {
    Blank,
    Comment,
    Command(CommandSpec),
}

/// Split one line of input, given as the raw bytes that were read.
pub fn parse_line(line: impl AsRef<[u8]>) -> Result<Line, InputError> {
    let line = line.as_ref();
    let line = line
        .strip_suffix(b"\n")
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .unwrap_or(line);

    if line.len() > MAX_LINE_LEN {
        return Err(InputError::LineTooLong {
            limit: MAX_LINE_LEN,
        });
    }
    if line.contains(&b'\0') {
        return Err(InputError::NulByte);
    }

    let mut words: Vec<&[u8]> = line
        .split(|&byte| byte == b' ' || byte == b'\t')
        .filter(|word| !word.is_empty())
        .collect();

    match words.first() {
        None => return Ok(Line::Blank),
        Some(first) if first.starts_with(b"#") => return Ok(Line::Comment),
        Some(_) => {}
    }

    // everything from a word starting with `#` onwards is a comment
    if let Some(comment) = words.iter().skip(1).position(|w| w.starts_with(b"#")) {
        words.truncate(comment + 1);
    }

    let background = words.len() > 1 && words.last() == Some(&&b"&"[..]);
    if background {
        words.pop();
    }

    let mut words = words.into_iter().map(OsStr::from_bytes);
    let program = match words.next() {
        Some(word) if is_redirect(word).is_some() => return Err(InputError::EmptyProgram),
        Some(program) => program,
        None => return Err(InputError::EmptyProgram),
    };

    let mut spec = CommandSpec::new(program)?.background(background);
    let mut count = 1;

    while let Some(word) = words.next() {
        let Some(redirect) = is_redirect(word) else {
            count += 1;
            if count > MAX_ARGS {
                return Err(InputError::TooManyArguments { limit: MAX_ARGS });
            }
            spec = spec.arg(word);
            continue;
        };

        let target = words
            .next()
            .ok_or(InputError::MissingRedirectTarget(redirect))?;

        spec = match redirect {
            Redirect::Input if spec.input().is_some() => {
                return Err(InputError::DuplicateRedirect(redirect))
            }
            Redirect::Output if spec.output().is_some() => {
                return Err(InputError::DuplicateRedirect(redirect))
            }
            Redirect::Input => spec.stdin_from(target),
            Redirect::Output => spec.stdout_to(target),
        };
    }

    Ok(Line::Command(spec))
}

fn is_redirect(word: &OsStr) -> Option<Redirect> {
    match word.as_bytes() {
        b"<" => Some(Redirect::Input),
        b">" => Some(Redirect::Output),
        _ => None,
    }
}
