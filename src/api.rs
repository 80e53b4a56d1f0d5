//! Workspace action surface.
//!
//! Every mutation applies to the registry first, then its durable mirror
//! write is emitted through the coordinator. No durable failure ever reaches
//! a caller; operations on absent ids are silent no-ops. The only
//! caller-visible failure mode is silent non-persistence.

use crate::bridge::{EditorBridge, NullEditorBridge, NullPanelBridge, PanelBridge};
use crate::node::{FileKind, FileNode, NodeDraft};
use crate::registry::FileRegistry;
use crate::search::FuzzyIndex;
use crate::store::{DurableStore, NodePatch, WriteOp};
use crate::sync::{Coordinator, WriteReporter};
use crate::transfer::{self, ExportPayload};
use crate::types::FileId;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info};

/// The workspace file store facade.
///
/// Composes the registry, the durable store coordinator, and the editor/UI
/// collaborators. Operations that only emit fire-and-forget writes are
/// synchronous; deletion and startup reconciliation await their collaborator
/// and durable steps. All of them expect a tokio runtime context.
pub struct Workpad {
    registry: Arc<FileRegistry>,
    store: Arc<dyn DurableStore>,
    coordinator: Coordinator,
    editor: Arc<dyn EditorBridge>,
    panels: Arc<dyn PanelBridge>,
}

impl Workpad {
    /// Build a headless instance with inert collaborators.
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self::with_bridges(store, Arc::new(NullEditorBridge), Arc::new(NullPanelBridge))
    }

    /// Build an instance wired to real collaborators.
    pub fn with_bridges(
        store: Arc<dyn DurableStore>,
        editor: Arc<dyn EditorBridge>,
        panels: Arc<dyn PanelBridge>,
    ) -> Self {
        let reporter = Arc::new(WriteReporter::new());
        let coordinator = Coordinator::new(Arc::clone(&store), reporter);
        Self {
            registry: Arc::new(FileRegistry::new()),
            store,
            coordinator,
            editor,
            panels,
        }
    }

    /// The authoritative in-memory registry.
    pub fn registry(&self) -> &FileRegistry {
        &self.registry
    }

    /// The channel all absorbed failures are recorded on.
    pub fn reporter(&self) -> &Arc<WriteReporter> {
        self.coordinator.reporter()
    }

    /// Reconcile the registry from the durable store.
    ///
    /// Reads the three partitions, hands the editor its open/active file
    /// references, then replaces the registry wholesale with the file-node
    /// partition, forcing `editable` off: no rename survives a reload.
    /// Failure is logged and leaves the registry untouched.
    pub async fn load_files(&self) {
        let store = Arc::clone(&self.store);
        let snapshot = match tokio::task::spawn_blocking(move || store.load_all()).await {
            Ok(Ok(snapshot)) => snapshot,
            Ok(Err(err)) => {
                error!(error = %err, "failed to load durable state");
                return;
            }
            Err(err) => {
                error!(error = %err, "durable load task failed");
                return;
            }
        };

        if let Err(err) = self
            .editor
            .re_open_files(&snapshot.open_files, &snapshot.active_files)
            .await
        {
            self.reporter().record_dispatch_failure("editor", &err);
        }

        let mapping: HashMap<FileId, FileNode> = snapshot
            .files
            .into_iter()
            .map(|mut node| {
                node.editable = false;
                (node.id, node)
            })
            .collect();
        let count = mapping.len();
        self.registry.replace(mapping);
        info!(count, "loaded existing files");
    }

    /// Create a file node from optional partial details and return it.
    pub fn create_file(&self, details: Option<NodeDraft>) -> FileNode {
        self.create_node(details, FileKind::File)
    }

    /// Create a directory node from optional partial details and return it.
    pub fn create_directory(&self, details: Option<NodeDraft>) -> FileNode {
        self.create_node(details, FileKind::Directory)
    }

    fn create_node(&self, details: Option<NodeDraft>, kind: FileKind) -> FileNode {
        // Surface the explorer while nodes are being created.
        if let Err(err) = self.panels.show_explorer_panel() {
            self.reporter().record_dispatch_failure("panels", &err);
        }

        let node = FileNode::from_draft(details.unwrap_or_default(), kind);
        self.registry.upsert(node.clone());
        self.coordinator.emit(WriteOp::Add(node.clone()));
        debug!(id = %node.id.short(), name = %node.name, "created node");
        node
    }

    /// Reparent a node. Only the target's `parent` changes (and its rename
    /// flag is cleared); descendants follow through their immediate-parent
    /// links. The target parent is not validated and no cycle detection is
    /// performed; ids are trusted from the caller.
    pub fn move_file(&self, id: FileId, directory_id: Option<FileId>) {
        let Some(mut node) = self.registry.get(&id) else {
            return;
        };
        node.parent = directory_id;
        node.editable = false;
        self.registry.upsert(node);
        self.coordinator.emit(WriteOp::Modify {
            id,
            patch: NodePatch::Parent(directory_id),
        });
        debug!(id = %id.short(), "moved node");
    }

    /// Replace a file node's contents.
    pub fn update_file_contents(&self, id: FileId, contents: String) {
        let Some(mut node) = self.registry.get(&id) else {
            return;
        };
        node.contents = contents.clone();
        self.registry.upsert(node);
        self.coordinator.emit(WriteOp::Modify {
            id,
            patch: NodePatch::Contents(contents),
        });
    }

    /// Rename a node and clear its rename flag.
    pub fn rename_file(&self, id: FileId, name: String) {
        let Some(mut node) = self.registry.get(&id) else {
            return;
        };
        node.name = name.clone();
        node.editable = false;
        self.registry.upsert(node);
        self.coordinator.emit(WriteOp::Modify {
            id,
            patch: NodePatch::Name(name),
        });
    }

    /// Flag a node as being renamed. Registry-only: the flag is transient and
    /// never persisted.
    pub fn open_rename_mode(&self, id: FileId) {
        let Some(mut node) = self.registry.get(&id) else {
            return;
        };
        node.editable = true;
        self.registry.upsert(node);
    }

    /// Remove a single node: close it in every editor view, drop it from the
    /// registry, then await the durable delete attempt.
    pub async fn delete_file(&self, id: FileId) {
        if !self.registry.contains(&id) {
            return;
        }
        if let Err(err) = self.editor.close_file_from_all_editors(id).await {
            self.reporter().record_dispatch_failure("editor", &err);
        }
        self.registry.remove(&id);
        self.coordinator.emit_awaited(WriteOp::Delete(id)).await;
        debug!(id = %id.short(), "deleted node");
    }

    /// Remove a directory and everything under it, strictly post-order:
    /// every child subtree completes (registry removal plus durable attempt)
    /// before the next sibling starts, and the directory itself goes last.
    pub fn delete_directory(&self, id: FileId) -> BoxFuture<'_, ()> {
        async move {
            if !self.registry.contains(&id) {
                return;
            }
            for child in self.registry.children_of(&id) {
                if child.is_directory() {
                    self.delete_directory(child.id).await;
                } else {
                    self.delete_file(child.id).await;
                }
            }
            self.registry.remove(&id);
            self.coordinator.emit_awaited(WriteOp::Delete(id)).await;
            debug!(id = %id.short(), "deleted directory");
        }
        .boxed()
    }

    /// Run a fuzzy search over the current registry values and replace the
    /// filtered-results projection. The primary mapping is never touched; an
    /// empty query or no hits leaves an empty projection.
    pub fn search_files(&self, query: &str) {
        let index = FuzzyIndex::build(self.registry.snapshot().into_values().collect());
        self.registry.set_filtered(index.search(query));
    }

    /// Snapshot the full registry for transport.
    pub fn create_export_payload(&self) -> ExportPayload {
        ExportPayload::new(self.registry.snapshot())
    }

    /// Merge a payload back in: incoming entries overwrite same-id nodes,
    /// everything else is preserved. Only the incoming entries are bulk
    /// persisted. Returns whether the merge was committed.
    pub fn restore_files(&self, payload: ExportPayload) -> bool {
        let incoming = transfer::canonicalize(payload.files);
        let merged = transfer::merge(self.registry.snapshot(), &incoming);
        self.registry.replace(merged);

        let count = incoming.len();
        self.coordinator
            .emit(WriteOp::BulkPut(incoming.into_values().collect()));
        info!(count, "restored files into registry");
        true
    }
}
