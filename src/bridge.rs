//! Collaborator seams for the editor and the UI shell.
//!
//! The store drives these at well-defined points: startup reconciliation
//! hands the editor its two partitions, deletion closes files everywhere
//! first, and the create operations surface the explorer panel. Failures are
//! reported and absorbed; they never abort the primary operation.

use crate::error::WorkpadError;
use crate::types::FileId;
use async_trait::async_trait;

/// Editor-side collaborator. Owns open/active file bookkeeping, including
/// what the two editor partitions mean.
#[async_trait]
pub trait EditorBridge: Send + Sync {
    /// Re-open files after startup reconciliation, from the open-file and
    /// active-file partitions.
    async fn re_open_files(&self, open: &[FileId], active: &[FileId]) -> Result<(), WorkpadError>;

    /// Close a file in every editor view before it is removed.
    async fn close_file_from_all_editors(&self, id: FileId) -> Result<(), WorkpadError>;
}

/// UI shell collaborator.
pub trait PanelBridge: Send + Sync {
    /// Bring the explorer panel into view.
    fn show_explorer_panel(&self) -> Result<(), WorkpadError>;
}

/// Inert editor bridge for headless use and tests.
#[derive(Debug, Default)]
pub struct NullEditorBridge;

#[async_trait]
impl EditorBridge for NullEditorBridge {
    async fn re_open_files(&self, _open: &[FileId], _active: &[FileId]) -> Result<(), WorkpadError> {
        Ok(())
    }

    async fn close_file_from_all_editors(&self, _id: FileId) -> Result<(), WorkpadError> {
        Ok(())
    }
}

/// Inert panel bridge for headless use and tests.
#[derive(Debug, Default)]
pub struct NullPanelBridge;

impl PanelBridge for NullPanelBridge {
    fn show_explorer_panel(&self) -> Result<(), WorkpadError> {
        Ok(())
    }
}
