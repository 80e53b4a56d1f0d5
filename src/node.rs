//! Workspace tree node entity and construction rules.
//!
//! A node stores only its immediate parent id, so reparenting a directory
//! implicitly moves its whole subtree. `editable` is a transient rename flag
//! and never survives a reload.

use crate::types::FileId;
use serde::{Deserialize, Serialize};

/// Node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
    Directory,
}

fn default_name() -> String {
    "untitled".to_string()
}

/// A single node in the workspace tree.
///
/// The serde defaults make partial restore payloads deserialize into
/// canonical nodes: only `id` and `type` are required on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileNode {
    pub id: FileId,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    #[serde(default)]
    pub parent: Option<FileId>,
    #[serde(default)]
    pub contents: String,
    #[serde(default)]
    pub editable: bool,
}

/// Partial node details supplied by callers of the create operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeDraft {
    pub id: Option<FileId>,
    pub name: Option<String>,
    pub parent: Option<FileId>,
    pub contents: Option<String>,
    pub editable: Option<bool>,
}

impl FileNode {
    /// Build a canonical node from partial details. Missing fields take their
    /// defaults; the kind is always the one the operation asked for.
    pub fn from_draft(draft: NodeDraft, kind: FileKind) -> Self {
        Self {
            id: draft.id.unwrap_or_else(FileId::new),
            name: draft.name.unwrap_or_else(default_name),
            kind,
            parent: draft.parent,
            contents: draft.contents.unwrap_or_default(),
            editable: draft.editable.unwrap_or(false),
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, FileKind::Directory)
    }
}
