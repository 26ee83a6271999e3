// Output for `--help`, `--version` and usage errors. Unlike `println!`, these never panic when
// the stream is closed, e.g. `smallsh --help | true`.
macro_rules! println_ignore_io_error {
    ($($tt:tt)*) => {{
        use std::io::Write;
        let _ = writeln!(std::io::stdout().lock(), $($tt)*);
    }}
}

macro_rules! eprintln_ignore_io_error {
    ($($tt:tt)*) => {{
        use std::io::Write;
        let _ = writeln!(std::io::stderr().lock(), $($tt)*);
    }}
}
