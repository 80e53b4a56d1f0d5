//! Whole-tree export and restore.
//!
//! Export is a point-in-time snapshot of the registry keyed by id. Restore
//! rebuilds each incoming entry into a canonical node (serde defaults fill
//! anything a partial payload left out), then merges incoming-over-existing.

use crate::node::FileNode;
use crate::types::FileId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Snapshot of the registry, suitable for backup transport.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportPayload {
    pub files: HashMap<FileId, FileNode>,
}

impl ExportPayload {
    pub fn new(files: HashMap<FileId, FileNode>) -> Self {
        Self { files }
    }

    /// Serialize for transport.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse a payload produced by [`ExportPayload::to_json`] or by an older
    /// session; partial records are filled with their defaults.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

/// Re-key incoming entries by the id each node actually carries. A payload
/// whose map keys drifted from its records stays internally consistent after
/// this.
pub(crate) fn canonicalize(files: HashMap<FileId, FileNode>) -> HashMap<FileId, FileNode> {
    files
        .into_values()
        .map(|node| (node.id, node))
        .collect()
}

/// Merge incoming entries over the existing mapping; conflicting ids take the
/// incoming node, everything else is preserved.
pub(crate) fn merge(
    existing: HashMap<FileId, FileNode>,
    incoming: &HashMap<FileId, FileNode>,
) -> HashMap<FileId, FileNode> {
    let mut merged = existing;
    merged.extend(incoming.iter().map(|(id, node)| (*id, node.clone())));
    merged
}
