//! The interactive layer: reads lines, runs built-ins and hands everything else to [`crate::exec`].
use std::{
    io::{self, BufRead, Read, Write},
    process,
};

use crate::{
    common::Error,
    exec::{
        launch, sweep_background, terminate_all_background, BackgroundRegistry, ExitStatus,
        LaunchOutcome, SignalController, StatusTracker,
    },
    log::{dev_info, user_error, user_warn, ShellLogger},
};

use self::{
    builtin::Builtin,
    help::{long_help_message, USAGE_MSG},
    parser::{parse_line, Line, MAX_LINE_LEN},
};

pub use cli::{ShellAction, ShellOptions};

mod builtin;
mod cli;
mod help;
pub mod parser;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Whether the shell should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Shell {
    options: ShellOptions,
    registry: BackgroundRegistry,
    tracker: StatusTracker,
    signals: SignalController,
}

impl Shell {
    pub fn new(options: ShellOptions) -> Self {
        Self {
            options,
            registry: BackgroundRegistry::new(),
            tracker: StatusTracker::new(),
            signals: SignalController::new(),
        }
    }

    /// Read and run commands until `exit` or end of input.
    ///
    /// Each cycle first ignores interrupts, then reports background commands that finished,
    /// and only then prompts for the next line. However the loop ends, including on an error
    /// reading `input` or writing `output`, every tracked background command is killed.
    pub fn run(&mut self, input: impl BufRead, output: impl Write) -> Result<(), Error> {
        let result = self.run_cycles(input, output);
        if result.is_err() {
            self.exit();
        }
        result
    }

    fn run_cycles(&mut self, mut input: impl BufRead, mut output: impl Write) -> Result<(), Error> {
        let mut buffer = Vec::new();

        loop {
            if let Err(err) = self.signals.shield() {
                user_warn!("cannot ignore interrupts: {err}");
            }

            for event in sweep_background(&mut self.registry) {
                writeln!(output, "{event}")?;
            }

            write!(output, "{}", self.options.effective_prompt())?;
            output.flush()?;

            buffer.clear();
            if read_line(&mut input, &mut buffer)? == 0 {
                self.exit();
                return Ok(());
            }

            if self.execute(&buffer, &mut output)? == Flow::Exit {
                return Ok(());
            }
        }
    }

    /// Run a single line of input.
    ///
    /// Problems with the command itself are reported and do not end the shell; an error is only
    /// returned if `output` cannot be written.
    pub fn execute(&mut self, line: &[u8], output: &mut impl Write) -> Result<Flow, Error> {
        let spec = match parse_line(line) {
            Ok(Line::Command(spec)) => spec,
            Ok(Line::Blank | Line::Comment) => return Ok(Flow::Continue),
            Err(err) => {
                user_error!("{err}");
                return Ok(Flow::Continue);
            }
        };

        match Builtin::lookup(spec.program()) {
            Some(Builtin::Exit) => {
                self.exit();
                return Ok(Flow::Exit);
            }
            Some(Builtin::Status) => {
                writeln!(output, "{}", self.tracker.last_foreground_status())?;
            }
            Some(Builtin::Cd) => {
                let home = std::env::var_os("HOME");
                match builtin::cd(&spec.arguments()[1..], home, output) {
                    Err(Error::Io(err)) => return Err(err.into()),
                    Err(err) => user_error!("{err}"),
                    Ok(()) => {}
                }
            }
            None => {
                // the child inherits our buffered output otherwise
                output.flush()?;

                let outcome = launch(&spec, &mut self.registry, &mut self.tracker);
                if let Some(report) = outcome.report() {
                    writeln!(output, "{report}")?;
                }
                if let LaunchOutcome::LaunchFailed(err) = outcome {
                    user_error!("{err}");
                }
            }
        }

        output.flush()?;
        Ok(Flow::Continue)
    }

    pub fn last_foreground_status(&self) -> ExitStatus {
        self.tracker.last_foreground_status()
    }

    pub fn background(&self) -> &BackgroundRegistry {
        &self.registry
    }

    fn exit(&mut self) {
        let killed = terminate_all_background(&mut self.registry);
        dev_info!("exiting, killed {killed} background processes");
    }
}

/// Read one line into `buffer`, returning how many bytes were consumed; `0` means end of input.
///
/// At most `MAX_LINE_LEN` bytes plus a line terminator are kept. The rest of a longer line is
/// consumed and dropped, and the truncated line is still too long for [`parse_line`] to accept.
fn read_line(input: &mut impl BufRead, buffer: &mut Vec<u8>) -> io::Result<usize> {
    let limit = MAX_LINE_LEN as u64 + 2;
    let read = input.by_ref().take(limit).read_until(b'\n', buffer)?;

    if read as u64 == limit && buffer.last() != Some(&b'\n') {
        return Ok(read + discard_line(input)?);
    }

    Ok(read)
}

/// Skip input up to and including the next newline.
fn discard_line(input: &mut impl BufRead) -> io::Result<usize> {
    let mut discarded = 0;

    loop {
        let (used, done) = match input.fill_buf() {
            Ok([]) => return Ok(discarded),
            Ok(available) => match available.iter().position(|&byte| byte == b'\n') {
                Some(newline) => (newline + 1, true),
                None => (available.len(), false),
            },
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };

        input.consume(used);
        discarded += used;
        if done {
            return Ok(discarded);
        }
    }
}

pub fn main() {
    ShellLogger::new("smallsh: ").into_global_logger();

    let options = match ShellOptions::from_env().map_err(Error::Options) {
        Ok(options) => options,
        Err(error) => {
            eprintln_ignore_io_error!("smallsh: {error}\n{USAGE_MSG}");
            process::exit(1);
        }
    };

    match options.action {
        ShellAction::Help => {
            println_ignore_io_error!("{}", long_help_message());
            process::exit(0);
        }
        ShellAction::Version => {
            println_ignore_io_error!("smallsh {VERSION}");
            process::exit(0);
        }
        ShellAction::Run => {}
    }

    let mut shell = Shell::new(options);
    let stdin = io::stdin();
    match shell.run(stdin.lock(), io::stdout()) {
        Ok(()) => process::exit(0),
        Err(error) => {
            user_error!("{error}");
            process::exit(1);
        }
    }
}
