//! Shared doubles for the integration suites.

use async_trait::async_trait;
use std::sync::Mutex;
use workpad::bridge::{EditorBridge, PanelBridge};
use workpad::error::{StorageError, WorkpadError};
use workpad::node::FileNode;
use workpad::store::{DurableSnapshot, DurableStore, NodePatch};
use workpad::types::FileId;

/// One observed durable write.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub label: &'static str,
    pub id: Option<FileId>,
}

/// Store that accepts every write and records the order it saw them in.
#[derive(Default)]
pub struct RecordingStore {
    pub ops: Mutex<Vec<Recorded>>,
}

impl RecordingStore {
    pub fn deletes(&self) -> Vec<FileId> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter(|op| op.label == "delete")
            .filter_map(|op| op.id)
            .collect()
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.ops.lock().unwrap().iter().map(|op| op.label).collect()
    }

    fn record(&self, label: &'static str, id: Option<FileId>) {
        self.ops.lock().unwrap().push(Recorded { label, id });
    }
}

impl DurableStore for RecordingStore {
    fn add_node(&self, node: &FileNode) -> Result<(), StorageError> {
        self.record("add", Some(node.id));
        Ok(())
    }

    fn modify_node(&self, id: &FileId, _patch: &NodePatch) -> Result<(), StorageError> {
        self.record("modify", Some(*id));
        Ok(())
    }

    fn delete_node(&self, id: &FileId) -> Result<(), StorageError> {
        self.record("delete", Some(*id));
        Ok(())
    }

    fn bulk_put(&self, _nodes: &[FileNode]) -> Result<(), StorageError> {
        self.record("bulk-put", None);
        Ok(())
    }

    fn replace_open_files(&self, _ids: &[FileId]) -> Result<(), StorageError> {
        self.record("open-files", None);
        Ok(())
    }

    fn replace_active_files(&self, _ids: &[FileId]) -> Result<(), StorageError> {
        self.record("active-files", None);
        Ok(())
    }

    fn load_all(&self) -> Result<DurableSnapshot, StorageError> {
        Ok(DurableSnapshot::default())
    }
}

/// Store that refuses every operation.
#[derive(Default)]
pub struct FailingStore;

impl FailingStore {
    fn refuse(&self) -> StorageError {
        StorageError::TransactionError("store unavailable".to_string())
    }
}

impl DurableStore for FailingStore {
    fn add_node(&self, _: &FileNode) -> Result<(), StorageError> {
        Err(self.refuse())
    }

    fn modify_node(&self, _: &FileId, _: &NodePatch) -> Result<(), StorageError> {
        Err(self.refuse())
    }

    fn delete_node(&self, _: &FileId) -> Result<(), StorageError> {
        Err(self.refuse())
    }

    fn bulk_put(&self, _: &[FileNode]) -> Result<(), StorageError> {
        Err(self.refuse())
    }

    fn replace_open_files(&self, _: &[FileId]) -> Result<(), StorageError> {
        Err(self.refuse())
    }

    fn replace_active_files(&self, _: &[FileId]) -> Result<(), StorageError> {
        Err(self.refuse())
    }

    fn load_all(&self) -> Result<DurableSnapshot, StorageError> {
        Err(self.refuse())
    }
}

/// Editor bridge that records what the store hands it.
#[derive(Default)]
pub struct RecordingEditorBridge {
    pub reopened: Mutex<Vec<(Vec<FileId>, Vec<FileId>)>>,
    pub closed: Mutex<Vec<FileId>>,
}

#[async_trait]
impl EditorBridge for RecordingEditorBridge {
    async fn re_open_files(&self, open: &[FileId], active: &[FileId]) -> Result<(), WorkpadError> {
        self.reopened
            .lock()
            .unwrap()
            .push((open.to_vec(), active.to_vec()));
        Ok(())
    }

    async fn close_file_from_all_editors(&self, id: FileId) -> Result<(), WorkpadError> {
        self.closed.lock().unwrap().push(id);
        Ok(())
    }
}

/// Panel bridge that always fails to surface the explorer.
#[derive(Default)]
pub struct FailingPanelBridge;

impl PanelBridge for FailingPanelBridge {
    fn show_explorer_panel(&self) -> Result<(), WorkpadError> {
        Err(WorkpadError::BridgeError("no explorer panel".to_string()))
    }
}
