//! Workpad: local-first workspace file tree store.
//!
//! Keeps an authoritative in-memory registry of file and directory nodes,
//! synchronized best-effort with a durable local store, and layers tree
//! operations, fuzzy search, and whole-tree import/export on top. Mutations
//! hit the registry first; durable writes follow fire-and-forget and their
//! failures are logged, never surfaced.

pub mod api;
pub mod bridge;
pub mod config;
pub mod error;
pub mod logging;
pub mod node;
pub mod registry;
pub mod search;
pub mod store;
pub mod sync;
pub mod transfer;
pub mod types;

pub use api::Workpad;
pub use node::{FileKind, FileNode, NodeDraft};
pub use store::persistence::SledFileStore;
pub use transfer::ExportPayload;
pub use types::FileId;
