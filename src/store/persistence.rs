//! Sled-backed durable store.
//!
//! Three trees back the three partitions. Node records are bincode-encoded
//! and keyed by the id's raw 16 bytes; the editor partitions each hold one
//! ordered reference list, so replacing them is a single atomic write.

use super::{DurableSnapshot, DurableStore, NodePatch};
use crate::error::StorageError;
use crate::node::FileNode;
use crate::types::FileId;
use sled::transaction::{ConflictableTransactionError, TransactionError};
use sled::{Db, Tree};
use std::path::Path;

const FILES_TREE: &str = "files";
const OPEN_FILES_TREE: &str = "open-files";
const ACTIVE_FILES_TREE: &str = "active-files";

/// Key under which an editor partition stores its reference list.
const REFS_KEY: &[u8] = b"refs";

/// Durable store over a local sled database.
pub struct SledFileStore {
    db: Db,
    files: Tree,
    open_files: Tree,
    active_files: Tree,
}

impl SledFileStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    /// Wrap an already-opened database.
    pub fn from_db(db: Db) -> Result<Self, StorageError> {
        let files = db.open_tree(FILES_TREE)?;
        let open_files = db.open_tree(OPEN_FILES_TREE)?;
        let active_files = db.open_tree(ACTIVE_FILES_TREE)?;
        Ok(Self {
            db,
            files,
            open_files,
            active_files,
        })
    }

    /// Force buffered writes to disk. Sled flushes in the background on its
    /// own cadence; tests and shutdown paths call this to make persistence
    /// observable immediately.
    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }

    fn write_refs(tree: &Tree, ids: &[FileId]) -> Result<(), StorageError> {
        let encoded =
            bincode::serialize(ids).map_err(|e| StorageError::EncodeError(e.to_string()))?;
        tree.insert(REFS_KEY, encoded)?;
        Ok(())
    }

    fn read_refs(tree: &Tree) -> Result<Vec<FileId>, StorageError> {
        match tree.get(REFS_KEY)? {
            Some(raw) => {
                bincode::deserialize(&raw).map_err(|e| StorageError::DecodeError(e.to_string()))
            }
            None => Ok(Vec::new()),
        }
    }
}

fn encode_node(node: &FileNode) -> Result<Vec<u8>, StorageError> {
    bincode::serialize(node).map_err(|e| StorageError::EncodeError(e.to_string()))
}

fn decode_node(raw: &[u8]) -> Result<FileNode, StorageError> {
    bincode::deserialize(raw).map_err(|e| StorageError::DecodeError(e.to_string()))
}

impl DurableStore for SledFileStore {
    fn add_node(&self, node: &FileNode) -> Result<(), StorageError> {
        self.files
            .insert(node.id.as_bytes().as_slice(), encode_node(node)?)?;
        Ok(())
    }

    fn modify_node(&self, id: &FileId, patch: &NodePatch) -> Result<(), StorageError> {
        let key = id.as_bytes().to_vec();
        self.files
            .transaction(|tree| {
                let raw = match tree.get(&key)? {
                    Some(raw) => raw,
                    // Absent id: nothing to patch.
                    None => return Ok(()),
                };
                let mut node =
                    decode_node(&raw).map_err(ConflictableTransactionError::Abort)?;
                match patch {
                    NodePatch::Name(name) => node.name = name.clone(),
                    NodePatch::Contents(contents) => node.contents = contents.clone(),
                    NodePatch::Parent(parent) => node.parent = *parent,
                }
                let encoded =
                    encode_node(&node).map_err(ConflictableTransactionError::Abort)?;
                tree.insert(key.as_slice(), encoded)?;
                Ok(())
            })
            .map_err(|err| match err {
                TransactionError::Abort(inner) => inner,
                TransactionError::Storage(e) => StorageError::DatabaseError(e),
            })
    }

    fn delete_node(&self, id: &FileId) -> Result<(), StorageError> {
        self.files.remove(id.as_bytes().as_slice())?;
        Ok(())
    }

    fn bulk_put(&self, nodes: &[FileNode]) -> Result<(), StorageError> {
        let mut batch = sled::Batch::default();
        for node in nodes {
            batch.insert(node.id.as_bytes().to_vec(), encode_node(node)?);
        }
        self.files.apply_batch(batch)?;
        Ok(())
    }

    fn replace_open_files(&self, ids: &[FileId]) -> Result<(), StorageError> {
        Self::write_refs(&self.open_files, ids)
    }

    fn replace_active_files(&self, ids: &[FileId]) -> Result<(), StorageError> {
        Self::write_refs(&self.active_files, ids)
    }

    fn load_all(&self) -> Result<DurableSnapshot, StorageError> {
        let mut files = Vec::new();
        for entry in self.files.iter() {
            let (_, raw) = entry?;
            files.push(decode_node(&raw)?);
        }
        let open_files = Self::read_refs(&self.open_files)?;
        let active_files = Self::read_refs(&self.active_files)?;
        Ok(DurableSnapshot {
            files,
            open_files,
            active_files,
        })
    }
}
