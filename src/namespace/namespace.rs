use std::collections::{BTreeMap, VecDeque};

use snafu::OptionExt;
use tracing::debug;

use super::arena::Arena;
use super::error::{
    AlreadyExistsSnafu, InvalidPathSnafu, Missing, NamespaceError, NotADirectorySnafu,
    NotAFileSnafu, NotFoundSnafu,
};
use super::node::{Node, NodeId};
use super::resolver::{self, Lookup, Segment, SplitPath};
use super::PARENT;

/// An independent in-memory namespace: the node tree plus the cursor
/// (current working directory) that relative paths resolve against.
///
/// Read operations borrow `&self`; mutations and `cd` borrow `&mut self`.
/// To share one namespace between threads, wrap it in a `RwLock`.
///
/// ### Invariants
///
/// 1. The root is a directory at `/` with no parent.
/// 2. Every other node is listed in its parent's children under its own name.
/// 3. A node's full path is its parent's full path plus its name, plus a
///    trailing separator for directories.
/// 4. The cursor is always a live directory.
#[derive(Debug, Clone)]
pub struct Namespace {
    arena: Arena,
    root: NodeId,
    cursor: NodeId,
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new()
    }
}

impl Namespace {
    /// Creates a namespace holding only the root, with the cursor at the root.
    pub fn new() -> Self {
        let mut arena = Arena::default();
        let root = arena.insert(Node::root());
        Self {
            arena,
            root,
            cursor: root,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn cursor(&self) -> NodeId {
        self.cursor
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id)
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// A namespace is never empty: the root always exists.
    pub fn is_empty(&self) -> bool {
        false
    }

    fn resolve(&self, path: &str, lookup: Lookup) -> Result<NodeId, NamespaceError> {
        resolver::resolve(&self.arena, self.root, self.cursor, path, lookup)
    }

    /// Changes the cursor.
    ///
    /// The bare parent token (`..` or `../`) moves up one level and is a
    /// no-op at the root. Any other path resolves strictly and must land on
    /// a directory.
    pub fn cd(&mut self, path: &str) -> Result<(), NamespaceError> {
        if path == PARENT || path == "../" {
            if let Some(parent) = self.arena[self.cursor].parent() {
                self.cursor = parent;
            }
            return Ok(());
        }

        let target = self.resolve(path, Lookup::Directory)?;
        if !self.arena[target].is_dir() {
            return NotADirectorySnafu { path }.fail();
        }
        self.cursor = target;
        Ok(())
    }

    /// Full path of the cursor.
    pub fn pwd(&self) -> &str {
        self.arena[self.cursor].full_path()
    }

    /// Lists the children of the directory at `path`, ordered by name. A path
    /// naming a file yields just that file's name.
    pub fn ls(&self, path: &str) -> Result<Vec<String>, NamespaceError> {
        let target = &self.arena[self.resolve(path, Lookup::Entry)?];
        Ok(match target.children() {
            Some(children) => children.keys().cloned().collect(),
            None => vec![target.name().to_string()],
        })
    }

    /// Full paths of every node below the cursor named exactly `name`, in
    /// breadth-first order.
    pub fn find(&self, name: &str) -> Vec<String> {
        let mut found = Vec::new();
        let mut queue = VecDeque::from([self.cursor]);

        while let Some(current) = queue.pop_front() {
            let Some(children) = self.arena[current].children() else {
                continue;
            };
            if let Some(&hit) = children.get(name) {
                found.push(self.arena[hit].full_path().to_string());
            }
            queue.extend(children.values().copied());
        }

        found
    }

    pub fn cat(&self, path: &str) -> Result<&str, NamespaceError> {
        let target = &self.arena[self.resolve(path, Lookup::File)?];
        match target.content() {
            Some(content) => Ok(content),
            None => NotAFileSnafu { path }.fail(),
        }
    }

    /// Creates every missing directory along `path`.
    ///
    /// Existing directories are walked through. The call fails with
    /// `AlreadyExists` only when nothing new was created anywhere on the
    /// path. On failure every directory created by this call is removed
    /// again.
    pub fn mkdir(&mut self, path: &str) -> Result<(), NamespaceError> {
        let split = SplitPath::parse(path);
        let mut current = if split.absolute { self.root } else { self.cursor };
        let mut created = Vec::new();

        for segment in split.segments {
            let step = match segment {
                Segment::Parent => self.arena[current]
                    .parent()
                    .ok_or_else(|| InvalidPathSnafu { path }.build()),
                Segment::Name(name) => match self.arena[current].child(name) {
                    Some(existing) if self.arena[existing].is_dir() => Ok(existing),
                    Some(_) => Err(InvalidPathSnafu { path }.build()),
                    None => {
                        let node = Node::directory(name, current, self.arena[current].full_path());
                        match self.attach(current, node) {
                            Some(id) => {
                                debug!("Created directory {}", self.arena[id].full_path());
                                created.push(id);
                                Ok(id)
                            }
                            None => Err(NotADirectorySnafu { path }.build()),
                        }
                    }
                },
            };

            match step {
                Ok(next) => current = next,
                Err(error) => {
                    self.roll_back(created);
                    return Err(error);
                }
            }
        }

        if created.is_empty() {
            return AlreadyExistsSnafu { path }.fail();
        }
        Ok(())
    }

    /// Removes the cursor's child `name` together with everything below it.
    pub fn rm(&mut self, name: &str) -> Result<(), NamespaceError> {
        let Some(target) = self.detach(self.cursor, name) else {
            return NotFoundSnafu {
                what: Missing::Entry,
                path: name,
            }
            .fail();
        };
        let released = self.arena.release_subtree(target);
        debug!("Removed '{}' ({} node(s)) from {}", name, released, self.pwd());
        Ok(())
    }

    /// Creates an empty file named `name` under the cursor.
    pub fn touch(&mut self, name: &str) -> Result<(), NamespaceError> {
        if !resolver::is_valid_name(name) {
            return InvalidPathSnafu { path: name }.fail();
        }
        if self.arena[self.cursor].child(name).is_some() {
            return AlreadyExistsSnafu { path: name }.fail();
        }

        let cursor = self.cursor;
        let node = Node::file(name, cursor, self.pwd());
        let id = self
            .attach(cursor, node)
            .context(NotADirectorySnafu { path: self.pwd() })?;
        debug!("Created file {}", self.arena[id].full_path());
        Ok(())
    }

    /// Appends `content` to the file at `path`.
    pub fn write(&mut self, path: &str, content: &str) -> Result<(), NamespaceError> {
        let target = self.resolve(path, Lookup::File)?;
        let node = &mut self.arena[target];
        let Some(buffer) = node.content_mut() else {
            return NotAFileSnafu { path }.fail();
        };
        buffer.push_str(content);
        debug!("Appended {} byte(s) to {}", content.len(), node.full_path());
        Ok(())
    }

    /// Renames the cursor's file `from` to `to`, replacing whatever `to`
    /// named before.
    pub fn mv(&mut self, from: &str, to: &str) -> Result<(), NamespaceError> {
        let cursor = self.cursor;
        let Some(source) = self.arena[cursor].child(from) else {
            return NotFoundSnafu {
                what: Missing::File,
                path: from,
            }
            .fail();
        };
        if from == to {
            return Ok(());
        }
        if !self.arena[source].is_file() {
            return NotAFileSnafu { path: from }.fail();
        }
        if !resolver::is_valid_name(to) {
            return InvalidPathSnafu { path: to }.fail();
        }

        if let Some(replaced) = self.detach(cursor, to) {
            let released = self.arena.release_subtree(replaced);
            debug!("Overwrote '{}' ({} node(s)) in {}", to, released, self.pwd());
        }
        self.detach(cursor, from);

        let parent_path = self.pwd().to_string();
        self.arena[source].rename_file(to, &parent_path);
        self.children_of(cursor)
            .context(NotADirectorySnafu { path: parent_path.as_str() })?
            .insert(to.to_string(), source);
        debug!("Moved '{}' to {}", from, self.arena[source].full_path());
        Ok(())
    }

    fn children_of(&mut self, dir: NodeId) -> Option<&mut BTreeMap<String, NodeId>> {
        self.arena[dir].children_mut()
    }

    /// Inserts `node` under `parent`. Returns `None`, leaving the arena
    /// untouched, when `parent` is a file.
    fn attach(&mut self, parent: NodeId, node: Node) -> Option<NodeId> {
        if !self.arena[parent].is_dir() {
            return None;
        }
        let name = node.name().to_string();
        let id = self.arena.insert(node);
        self.children_of(parent)?.insert(name, id);
        Some(id)
    }

    fn detach(&mut self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.arena[parent].children_mut()?.remove(name)
    }

    /// Undoes directories created by a failed `mkdir`. Anything below a
    /// created directory was created later, so undoing in reverse order
    /// always removes a leaf.
    fn roll_back(&mut self, created: Vec<NodeId>) {
        for id in created.into_iter().rev() {
            let node = &self.arena[id];
            if let Some(parent) = node.parent() {
                let name = node.name().to_string();
                self.detach(parent, &name);
            }
            self.arena.release_subtree(id);
        }
    }
}
