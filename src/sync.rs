//! Registry-first write coordination.
//!
//! Every mutation applies to the registry synchronously, then its durable
//! mirror write is emitted here. Outcomes never flow back: a failed write is
//! recorded by the [`WriteReporter`] and the registry is not rolled back, so
//! the live session's state wins over guaranteed persistence.

use crate::store::{DurableStore, WriteOp};
use parking_lot::Mutex;
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error};

/// Sink for absorbed failures.
///
/// All write paths and collaborator dispatches funnel their outcomes through
/// here. Counters and the last recorded error stay readable alongside the
/// log output.
#[derive(Debug, Default)]
pub struct WriteReporter {
    attempted: AtomicU64,
    failed: AtomicU64,
    last_error: Mutex<Option<String>>,
}

impl WriteReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self, op: &str) {
        self.attempted.fetch_add(1, Ordering::Relaxed);
        debug!(op, "durable write settled");
    }

    pub fn record_failure(&self, op: &str, err: &dyn Display) {
        self.attempted.fetch_add(1, Ordering::Relaxed);
        self.failed.fetch_add(1, Ordering::Relaxed);
        error!(op, error = %err, "durable write failed");
        *self.last_error.lock() = Some(format!("{op}: {err}"));
    }

    /// A collaborator call failed; the primary operation carries on.
    pub fn record_dispatch_failure(&self, collaborator: &str, err: &dyn Display) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        error!(collaborator, error = %err, "collaborator dispatch failed");
        *self.last_error.lock() = Some(format!("{collaborator}: {err}"));
    }

    pub fn attempted(&self) -> u64 {
        self.attempted.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }
}

/// Hands registry-applied mutations to the durable store.
pub struct Coordinator {
    store: Arc<dyn DurableStore>,
    reporter: Arc<WriteReporter>,
}

impl Coordinator {
    pub fn new(store: Arc<dyn DurableStore>, reporter: Arc<WriteReporter>) -> Self {
        Self { store, reporter }
    }

    pub fn reporter(&self) -> &Arc<WriteReporter> {
        &self.reporter
    }

    /// Emit without waiting: the caller returns before the write settles.
    /// Requires a tokio runtime context.
    pub fn emit(&self, op: WriteOp) {
        let store = Arc::clone(&self.store);
        let reporter = Arc::clone(&self.reporter);
        tokio::spawn(async move {
            settle(store, reporter, op).await;
        });
    }

    /// Emit and wait for the write attempt to settle. The outcome is still
    /// absorbed; deletion paths use this so a subtree is durably attempted in
    /// post-order.
    pub async fn emit_awaited(&self, op: WriteOp) {
        settle(Arc::clone(&self.store), Arc::clone(&self.reporter), op).await;
    }
}

async fn settle(store: Arc<dyn DurableStore>, reporter: Arc<WriteReporter>, op: WriteOp) {
    let label = op.label();
    match tokio::task::spawn_blocking(move || store.apply(&op)).await {
        Ok(Ok(())) => reporter.record_success(label),
        Ok(Err(err)) => reporter.record_failure(label, &err),
        Err(err) => reporter.record_failure(label, &err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::node::{FileKind, FileNode, NodeDraft};
    use crate::store::{DurableSnapshot, NodePatch};
    use crate::types::FileId;

    /// Store that refuses every write.
    struct FailingStore;

    impl DurableStore for FailingStore {
        fn add_node(&self, _: &FileNode) -> Result<(), StorageError> {
            Err(StorageError::TransactionError("down".to_string()))
        }
        fn modify_node(&self, _: &FileId, _: &NodePatch) -> Result<(), StorageError> {
            Err(StorageError::TransactionError("down".to_string()))
        }
        fn delete_node(&self, _: &FileId) -> Result<(), StorageError> {
            Err(StorageError::TransactionError("down".to_string()))
        }
        fn bulk_put(&self, _: &[FileNode]) -> Result<(), StorageError> {
            Err(StorageError::TransactionError("down".to_string()))
        }
        fn replace_open_files(&self, _: &[FileId]) -> Result<(), StorageError> {
            Err(StorageError::TransactionError("down".to_string()))
        }
        fn replace_active_files(&self, _: &[FileId]) -> Result<(), StorageError> {
            Err(StorageError::TransactionError("down".to_string()))
        }
        fn load_all(&self) -> Result<DurableSnapshot, StorageError> {
            Err(StorageError::TransactionError("down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_failures_are_absorbed_and_counted() {
        let reporter = Arc::new(WriteReporter::new());
        let coordinator = Coordinator::new(Arc::new(FailingStore), Arc::clone(&reporter));

        let node = FileNode::from_draft(NodeDraft::default(), FileKind::File);
        coordinator.emit_awaited(WriteOp::Add(node)).await;

        assert_eq!(reporter.attempted(), 1);
        assert_eq!(reporter.failures(), 1);
        let last = reporter.last_error().unwrap();
        assert!(last.starts_with("add:"));
    }

    #[test]
    fn test_dispatch_failures_share_the_channel() {
        let reporter = WriteReporter::new();
        reporter.record_dispatch_failure("panels", &"no explorer");
        assert_eq!(reporter.failures(), 1);
        assert_eq!(reporter.attempted(), 0);
    }
}
