use std::{io::Write, sync::Mutex};

#[cfg(feature = "dev")]
use std::{fs::File, path::Path};

/// Writes every record it is given as one prefixed line.
pub(super) struct SimpleLogger<W> {
    target: Mutex<W>,
    prefix: &'static str,
}

impl<W: Write + Send> log::Log for SimpleLogger<W> {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        if let Ok(mut target) = self.target.lock() {
            let _ = writeln!(target, "{}{}", self.prefix, record.args());
        }
    }

    fn flush(&self) {
        if let Ok(mut target) = self.target.lock() {
            let _ = target.flush();
        }
    }
}

impl SimpleLogger<std::io::Stderr> {
    pub(super) fn to_stderr(prefix: &'static str) -> Self {
        Self {
            target: Mutex::new(std::io::stderr()),
            prefix,
        }
    }
}

#[cfg(feature = "dev")]
impl SimpleLogger<File> {
    pub(super) fn to_file(path: impl AsRef<Path>, prefix: &'static str) -> std::io::Result<Self> {
        let file = std::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)?;
        Ok(Self {
            target: Mutex::new(file),
            prefix,
        })
    }
}
