//! Durable store boundary.
//!
//! The registry is written first; these operations mirror it into a local
//! transactional store, one atomic write per logical operation, across three
//! partitions: file nodes, open-file references, active-file references. The
//! store is written to, never read from, except at startup.

pub mod persistence;

use crate::error::StorageError;
use crate::node::FileNode;
use crate::types::FileId;

/// Field-level patch applied to a stored node by id.
#[derive(Debug, Clone)]
pub enum NodePatch {
    Name(String),
    Contents(String),
    Parent(Option<FileId>),
}

/// A single durable write, mirroring one registry mutation.
#[derive(Debug, Clone)]
pub enum WriteOp {
    Add(FileNode),
    Modify { id: FileId, patch: NodePatch },
    Delete(FileId),
    BulkPut(Vec<FileNode>),
}

impl WriteOp {
    /// Stable label for log lines and the write reporter.
    pub fn label(&self) -> &'static str {
        match self {
            WriteOp::Add(_) => "add",
            WriteOp::Modify { .. } => "modify",
            WriteOp::Delete(_) => "delete",
            WriteOp::BulkPut(_) => "bulk-put",
        }
    }
}

/// Contents of the three durable partitions, read at startup.
#[derive(Debug, Clone, Default)]
pub struct DurableSnapshot {
    pub files: Vec<FileNode>,
    pub open_files: Vec<FileId>,
    pub active_files: Vec<FileId>,
}

/// Durable store interface
pub trait DurableStore: Send + Sync {
    /// Insert a new node record.
    fn add_node(&self, node: &FileNode) -> Result<(), StorageError>;

    /// Patch an existing record by id. Patching an absent id is a no-op,
    /// matching the registry's silent-skip policy.
    fn modify_node(&self, id: &FileId, patch: &NodePatch) -> Result<(), StorageError>;

    /// Delete a record by id.
    fn delete_node(&self, id: &FileId) -> Result<(), StorageError>;

    /// Write a batch of full records atomically.
    fn bulk_put(&self, nodes: &[FileNode]) -> Result<(), StorageError>;

    /// Overwrite the open-file reference partition.
    fn replace_open_files(&self, ids: &[FileId]) -> Result<(), StorageError>;

    /// Overwrite the active-file reference partition.
    fn replace_active_files(&self, ids: &[FileId]) -> Result<(), StorageError>;

    /// Read all three partitions for startup reconciliation.
    fn load_all(&self) -> Result<DurableSnapshot, StorageError>;

    /// Dispatch a [`WriteOp`] to the matching operation.
    fn apply(&self, op: &WriteOp) -> Result<(), StorageError> {
        match op {
            WriteOp::Add(node) => self.add_node(node),
            WriteOp::Modify { id, patch } => self.modify_node(id, patch),
            WriteOp::Delete(id) => self.delete_node(id),
            WriteOp::BulkPut(nodes) => self.bulk_put(nodes),
        }
    }
}
