//! Read-only path resolution shared by every namespace operation.

use tracing::debug;

use super::arena::Arena;
use super::error::{
    InvalidPathSnafu, Missing, NamespaceError, NotADirectorySnafu, NotAFileSnafu, NotFoundSnafu,
};
use super::node::NodeId;
use super::{PARENT, SEPARATOR};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Segment<'a> {
    Parent,
    Name(&'a str),
}

/// A path split into segments. Empty segments and `.` are dropped, so a
/// trailing or doubled separator changes nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct SplitPath<'a> {
    pub absolute: bool,
    pub segments: Vec<Segment<'a>>,
}

impl<'a> SplitPath<'a> {
    pub fn parse(path: &'a str) -> Self {
        let segments = path
            .split(SEPARATOR)
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .map(|segment| match segment {
                PARENT => Segment::Parent,
                name => Segment::Name(name),
            })
            .collect();

        SplitPath {
            absolute: path.starts_with(SEPARATOR),
            segments,
        }
    }
}

/// What the calling operation expects to find. Decides the wording of a
/// missing segment and the error for walking through a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Lookup {
    Entry,
    Directory,
    File,
}

impl Lookup {
    fn missing(self) -> Missing {
        match self {
            Lookup::Entry => Missing::Entry,
            Lookup::Directory => Missing::Directory,
            Lookup::File => Missing::File,
        }
    }

    fn through_file(self, path: &str) -> NamespaceError {
        match self {
            Lookup::Entry => NotFoundSnafu {
                what: Missing::Entry,
                path,
            }
            .build(),
            Lookup::Directory => NotADirectorySnafu { path }.build(),
            Lookup::File => NotAFileSnafu { path }.build(),
        }
    }
}

/// Walks `path` from the root (absolute) or from `cursor` (relative) and
/// returns the node it lands on, whatever its kind.
pub(super) fn resolve(
    arena: &Arena,
    root: NodeId,
    cursor: NodeId,
    path: &str,
    lookup: Lookup,
) -> Result<NodeId, NamespaceError> {
    let split = SplitPath::parse(path);
    let mut current = if split.absolute { root } else { cursor };

    for segment in split.segments {
        let node = &arena[current];
        current = match segment {
            Segment::Parent => match node.parent() {
                Some(parent) => parent,
                None => {
                    debug!("Resolution of '{}' climbs above the root", path);
                    return InvalidPathSnafu { path }.fail();
                }
            },
            Segment::Name(_) if node.is_file() => {
                debug!("Resolution of '{}' walks through file {}", path, node.full_path());
                return Err(lookup.through_file(path));
            }
            Segment::Name(name) => match node.child(name) {
                Some(child) => child,
                None => {
                    debug!("Resolution of '{}' misses '{}' under {}", path, name, node.full_path());
                    return NotFoundSnafu {
                        what: lookup.missing(),
                        path,
                    }
                    .fail();
                }
            },
        };
    }

    Ok(current)
}

/// A name usable as a single new segment.
pub(super) fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != PARENT && !name.contains(SEPARATOR)
}
