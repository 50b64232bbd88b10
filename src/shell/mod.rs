//! Line-oriented shell that drives a [`Namespace`](crate::namespace::Namespace).

mod command;
mod shell;

pub use command::{CURRENT_DIR, Command, CommandParseError};
pub use shell::{Output, Shell, ShellError};
