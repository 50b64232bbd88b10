use std::ops::{Index, IndexMut};

use tracing::debug;

use super::node::{Node, NodeId};

/// Slot storage owning every node of a namespace.
///
/// Nodes refer to each other only through [`NodeId`]. Released slots are
/// recycled by later allocations.
#[derive(Debug, Clone, Default)]
pub(super) struct Arena {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    live: usize,
}

impl Arena {
    pub fn insert(&mut self, node: Node) -> NodeId {
        self.live += 1;
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                NodeId(index)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// Releases `id` and everything below it. The caller detaches `id` from
    /// its parent. Returns the number of released nodes.
    pub fn release_subtree(&mut self, id: NodeId) -> usize {
        let mut pending = vec![id];
        let mut released = 0;

        while let Some(current) = pending.pop() {
            let Some(node) = self.slots.get_mut(current.0).and_then(Option::take) else {
                continue;
            };
            if let Some(children) = node.children() {
                pending.extend(children.values().copied());
            }
            self.free.push(current.0);
            released += 1;
        }

        self.live -= released;
        debug!("Released {} node(s) starting at {}", released, id);
        released
    }

    pub fn len(&self) -> usize {
        self.live
    }
}

/// Indexing with a stale handle is a bug in the namespace itself and panics,
/// the same way indexing a `Vec` out of bounds does.
impl Index<NodeId> for Arena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        match self.get(id) {
            Some(node) => node,
            None => panic!("stale node handle {id}"),
        }
    }
}

impl IndexMut<NodeId> for Arena {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        match self.slots.get_mut(id.0).and_then(Option::as_mut) {
            Some(node) => node,
            None => panic!("stale node handle {id}"),
        }
    }
}
