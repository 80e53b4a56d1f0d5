//! In-memory authoritative registry of workspace nodes.
//!
//! Single source of truth for reads. Mutations go through the commit
//! primitives (`replace`, `upsert`, `remove`) and take effect before the
//! calling operation returns, so any subsequent read in the same cooperative
//! turn observes them. A parent -> children index is maintained incrementally
//! alongside the mapping so recursive operations never scan the full tree.

use crate::node::FileNode;
use crate::types::FileId;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

#[derive(Default)]
struct RegistryState {
    files: HashMap<FileId, FileNode>,
    children: HashMap<FileId, HashSet<FileId>>,
}

impl RegistryState {
    fn link(&mut self, id: FileId, parent: Option<FileId>) {
        if let Some(parent) = parent {
            self.children.entry(parent).or_default().insert(id);
        }
    }

    fn unlink(&mut self, id: FileId, parent: Option<FileId>) {
        if let Some(parent) = parent {
            if let Some(set) = self.children.get_mut(&parent) {
                set.remove(&id);
                if set.is_empty() {
                    self.children.remove(&parent);
                }
            }
        }
    }
}

/// The id -> node mapping plus its derived indices.
///
/// Only the action surface writes here; a registry mutation is a single
/// synchronous step and is atomic with respect to other cooperative tasks.
#[derive(Default)]
pub struct FileRegistry {
    state: RwLock<RegistryState>,
    filtered: RwLock<Vec<FileNode>>,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a node by id.
    pub fn get(&self, id: &FileId) -> Option<FileNode> {
        self.state.read().files.get(id).cloned()
    }

    pub fn contains(&self, id: &FileId) -> bool {
        self.state.read().files.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.state.read().files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().files.is_empty()
    }

    /// Clone the full mapping, e.g. for export or search indexing.
    pub fn snapshot(&self) -> HashMap<FileId, FileNode> {
        self.state.read().files.clone()
    }

    /// Atomically swap in a whole new mapping, rebuilding the children index.
    pub fn replace(&self, mapping: HashMap<FileId, FileNode>) {
        let mut children: HashMap<FileId, HashSet<FileId>> = HashMap::new();
        for node in mapping.values() {
            if let Some(parent) = node.parent {
                children.entry(parent).or_default().insert(node.id);
            }
        }
        let mut state = self.state.write();
        state.files = mapping;
        state.children = children;
    }

    /// Insert or update exactly one entry, keeping the children index in step
    /// when the node's parent changed.
    pub fn upsert(&self, node: FileNode) {
        let mut state = self.state.write();
        let previous_parent = state.files.get(&node.id).and_then(|n| n.parent);
        if previous_parent != node.parent {
            state.unlink(node.id, previous_parent);
            state.link(node.id, node.parent);
        } else if !state.files.contains_key(&node.id) {
            state.link(node.id, node.parent);
        }
        state.files.insert(node.id, node);
    }

    /// Remove exactly one entry, returning it if present.
    pub fn remove(&self, id: &FileId) -> Option<FileNode> {
        let mut state = self.state.write();
        let node = state.files.remove(id)?;
        state.unlink(node.id, node.parent);
        state.children.remove(id);
        Some(node)
    }

    /// Direct children of a directory, in name order for deterministic
    /// traversal.
    pub fn children_of(&self, id: &FileId) -> Vec<FileNode> {
        let state = self.state.read();
        let mut nodes: Vec<FileNode> = match state.children.get(id) {
            Some(ids) => ids
                .iter()
                .filter_map(|child| state.files.get(child).cloned())
                .collect(),
            None => Vec::new(),
        };
        nodes.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        nodes
    }

    /// Replace the filtered-results projection produced by search.
    pub fn set_filtered(&self, nodes: Vec<FileNode>) {
        *self.filtered.write() = nodes;
    }

    /// The current filtered-results projection.
    pub fn filtered(&self) -> Vec<FileNode> {
        self.filtered.read().clone()
    }
}
