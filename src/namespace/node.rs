use std::collections::BTreeMap;

use derive_more::Display;

use super::SEPARATOR;

/// Stable handle of a node inside a [`Namespace`](super::Namespace).
///
/// Handles are only meaningful for the namespace that issued them, and a
/// handle of a removed node may be reused by a later allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("#{_0}")]
pub struct NodeId(pub(super) usize);

/// What a node is, together with the data only that kind of node carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Directory {
        children: BTreeMap<String, NodeId>,
    },
    File {
        content: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    name: String,
    full_path: String,
    parent: Option<NodeId>,
    kind: NodeKind,
}

impl Node {
    pub(super) fn root() -> Self {
        Node {
            name: SEPARATOR.to_string(),
            full_path: SEPARATOR.to_string(),
            parent: None,
            kind: NodeKind::Directory {
                children: BTreeMap::new(),
            },
        }
    }

    pub(super) fn directory(name: &str, parent: NodeId, parent_path: &str) -> Self {
        Node {
            name: name.to_string(),
            full_path: format!("{parent_path}{name}{SEPARATOR}"),
            parent: Some(parent),
            kind: NodeKind::Directory {
                children: BTreeMap::new(),
            },
        }
    }

    pub(super) fn file(name: &str, parent: NodeId, parent_path: &str) -> Self {
        Node {
            name: name.to_string(),
            full_path: format!("{parent_path}{name}"),
            parent: Some(parent),
            kind: NodeKind::File {
                content: String::new(),
            },
        }
    }

    /// The single segment naming this node inside its parent.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute path from the root. Directories end with the separator.
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File { .. })
    }

    /// Children ordered by name, or `None` for a file.
    pub fn children(&self) -> Option<&BTreeMap<String, NodeId>> {
        match &self.kind {
            NodeKind::Directory { children } => Some(children),
            NodeKind::File { .. } => None,
        }
    }

    pub fn child(&self, name: &str) -> Option<NodeId> {
        self.children().and_then(|children| children.get(name).copied())
    }

    /// File content, or `None` for a directory.
    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::File { content } => Some(content),
            NodeKind::Directory { .. } => None,
        }
    }

    pub(super) fn children_mut(&mut self) -> Option<&mut BTreeMap<String, NodeId>> {
        match &mut self.kind {
            NodeKind::Directory { children } => Some(children),
            NodeKind::File { .. } => None,
        }
    }

    pub(super) fn content_mut(&mut self) -> Option<&mut String> {
        match &mut self.kind {
            NodeKind::File { content } => Some(content),
            NodeKind::Directory { .. } => None,
        }
    }

    /// Renames a file in place, keeping `full_path` in step with the new name.
    pub(super) fn rename_file(&mut self, name: &str, parent_path: &str) {
        self.name = name.to_string();
        self.full_path = format!("{parent_path}{name}");
    }
}
