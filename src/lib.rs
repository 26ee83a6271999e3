//! A small line-oriented shell.
//!
//! The interesting part of this crate is [`exec`], which forks, redirects, execs, tracks and
//! reaps child processes. Everything in [`shell`] is the thin interactive layer around it.
#[macro_use]
mod macros;
pub mod common;
pub(crate) mod cutils;
pub(crate) mod log;
pub mod exec;
pub mod shell;
pub mod system;

pub use shell::main;
