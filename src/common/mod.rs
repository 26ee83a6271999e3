#![forbid(unsafe_code)]
pub use command::{CommandSpec, NULL_DEVICE};
pub use error::{ChildFailure, Error, InputError, Redirect};

pub mod command;
pub mod error;
