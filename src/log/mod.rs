//! Logging for the shell.
//!
//! Diagnostics meant for the person at the prompt go to the `smallsh::user` target and end up on
//! standard error. Tracing of the process lifecycle goes to `smallsh::dev` and is only compiled in
//! with the `dev` feature.
use self::simple_logger::SimpleLogger;

mod simple_logger;

pub(crate) const USER_TARGET: &str = "smallsh::user";
pub(crate) const DEV_TARGET: &str = "smallsh::dev";

macro_rules! user_error {
    ($($arg:tt)+) => (::log::error!(target: $crate::log::USER_TARGET, $($arg)+));
}

macro_rules! user_warn {
    ($($arg:tt)+) => (::log::warn!(target: $crate::log::USER_TARGET, $($arg)+));
}

// Each record is tagged with the line that produced it.
macro_rules! dev_log {
    ($level:ident, $($arg:tt)+) => {
        if std::cfg!(feature = "dev") {
            ::log::log!(
                target: $crate::log::DEV_TARGET,
                ::log::Level::$level,
                "{}: {}",
                std::panic::Location::caller(),
                format_args!($($arg)+)
            );
        }
    };
}

macro_rules! dev_warn {
    ($($arg:tt)+) => ($crate::log::dev_log!(Warn, $($arg)+));
}

macro_rules! dev_info {
    ($($arg:tt)+) => ($crate::log::dev_log!(Info, $($arg)+));
}

macro_rules! dev_debug {
    ($($arg:tt)+) => ($crate::log::dev_log!(Debug, $($arg)+));
}

pub(crate) use dev_debug;
pub(crate) use dev_info;
pub(crate) use dev_log;
pub(crate) use dev_warn;
pub(crate) use user_error;
pub(crate) use user_warn;

/// Sends each record to every sink registered for its target.
#[derive(Default)]
pub struct ShellLogger {
    sinks: Vec<(&'static str, Box<dyn log::Log>)>,
}

impl ShellLogger {
    pub fn new(prefix: &'static str) -> Self {
        let mut logger = Self::default();
        logger.route(USER_TARGET, SimpleLogger::to_stderr(prefix));

        #[cfg(feature = "dev")]
        {
            let path = option_env!("SMALLSH_DEV_LOGS")
                .map(std::path::PathBuf::from)
                .unwrap_or_else(|| {
                    std::env::temp_dir().join(format!("smallsh-dev-{}.log", std::process::id()))
                });
            match SimpleLogger::to_file(path, "") {
                Ok(file_logger) => logger.route(DEV_TARGET, file_logger),
                Err(err) => eprintln_ignore_io_error!("{prefix}cannot open dev log: {err}"),
            }
        }

        logger
    }

    /// Install this logger as the global `log` backend.
    ///
    /// Does nothing if a logger was already installed, which only happens when the library is
    /// driven from a test harness.
    pub fn into_global_logger(self) {
        if log::set_boxed_logger(Box::new(self)).is_ok() {
            log::set_max_level(log::LevelFilter::Trace);
        }
    }

    /// Send records for `target` and its submodules (`target::...`) to `sink`.
    fn route(&mut self, target: &'static str, sink: impl log::Log + 'static) {
        self.sinks.push((target, Box::new(sink)));
    }

    fn sinks_for<'a>(&'a self, target: &'a str) -> impl Iterator<Item = &'a dyn log::Log> + 'a {
        self.sinks
            .iter()
            .filter(move |(prefix, _)| {
                target
                    .strip_prefix(prefix)
                    .map_or(false, |rest| rest.is_empty() || rest.starts_with("::"))
            })
            .map(|(_, sink)| &**sink)
    }
}

impl log::Log for ShellLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
            && self.sinks_for(metadata.target()).any(|sink| sink.enabled(metadata))
    }

    fn log(&self, record: &log::Record) {
        for sink in self.sinks_for(record.target()) {
            sink.log(record);
        }
    }

    fn flush(&self) {
        for (_, sink) in &self.sinks {
            sink.flush();
        }
    }
}
