#![allow(clippy::enum_variant_names)]

//! In-memory hierarchical namespace with a small POSIX-like shell on top.
//!
//! The core is [`namespace::Namespace`]: a tree of directories and files
//! addressed by `/`-separated paths, absolute or relative to a cursor.
//! [`shell::Shell`] parses command lines and renders results, and
//! [`config::ShellConfig`] holds its optional YAML settings.

pub mod config;
pub mod namespace;
pub mod shell;
