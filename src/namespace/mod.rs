//! In-memory hierarchical namespace.
//!
//! This module provides a tree of named nodes, where nodes can be either
//! directories (holding an ordered set of children) or files (holding an
//! append-only text buffer), together with a cursor and a path resolver
//! shared by every operation.

mod arena;
mod error;
mod namespace;
mod node;
mod resolver;

pub use error::{ErrorKind, Missing, NamespaceError};
pub use namespace::Namespace;
pub use node::{Node, NodeId, NodeKind};

/// Path segment separator.
pub const SEPARATOR: char = '/';
/// Segment denoting the parent directory.
pub const PARENT: &str = "..";
