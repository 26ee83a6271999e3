use std::io;

/// Return `true` if the IO error is an interruption.
pub(super) fn was_interrupted(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock
    )
}
