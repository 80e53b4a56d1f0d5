//! Integration tests for the sled-backed durable store.

use tempfile::TempDir;
use workpad::node::{FileKind, FileNode, NodeDraft};
use workpad::store::{DurableStore, NodePatch};
use workpad::types::FileId;
use workpad::SledFileStore;

fn node(name: &str, parent: Option<FileId>) -> FileNode {
    FileNode::from_draft(
        NodeDraft {
            name: Some(name.to_string()),
            parent,
            contents: Some(format!("contents of {name}")),
            ..Default::default()
        },
        FileKind::File,
    )
}

#[test]
fn test_records_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store");
    let a = node("a.txt", None);
    let b = node("b.txt", None);

    {
        let store = SledFileStore::open(&path).unwrap();
        store.add_node(&a).unwrap();
        store.add_node(&b).unwrap();
        store.replace_open_files(&[a.id]).unwrap();
        store.replace_active_files(&[a.id]).unwrap();
        store.flush().unwrap();
    }

    let store = SledFileStore::open(&path).unwrap();
    let snapshot = store.load_all().unwrap();
    assert_eq!(snapshot.files.len(), 2);
    assert!(snapshot.files.contains(&a));
    assert!(snapshot.files.contains(&b));
    assert_eq!(snapshot.open_files, vec![a.id]);
    assert_eq!(snapshot.active_files, vec![a.id]);
}

#[test]
fn test_each_patch_variant_touches_one_field() {
    let dir = TempDir::new().unwrap();
    let store = SledFileStore::open(&dir.path().join("store")).unwrap();
    let parent = FileId::new();
    let original = node("a.txt", None);
    store.add_node(&original).unwrap();

    store
        .modify_node(&original.id, &NodePatch::Name("b.txt".to_string()))
        .unwrap();
    store
        .modify_node(&original.id, &NodePatch::Contents("updated".to_string()))
        .unwrap();
    store
        .modify_node(&original.id, &NodePatch::Parent(Some(parent)))
        .unwrap();

    let snapshot = store.load_all().unwrap();
    let stored = &snapshot.files[0];
    assert_eq!(stored.id, original.id);
    assert_eq!(stored.name, "b.txt");
    assert_eq!(stored.contents, "updated");
    assert_eq!(stored.parent, Some(parent));
    assert_eq!(stored.editable, original.editable);
}

#[test]
fn test_patching_absent_record_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let store = SledFileStore::open(&dir.path().join("store")).unwrap();
    let existing = node("a.txt", None);
    store.add_node(&existing).unwrap();

    store
        .modify_node(&FileId::new(), &NodePatch::Name("ghost".to_string()))
        .unwrap();

    assert_eq!(store.load_all().unwrap().files, vec![existing]);
}

#[test]
fn test_delete_removes_only_the_target() {
    let dir = TempDir::new().unwrap();
    let store = SledFileStore::open(&dir.path().join("store")).unwrap();
    let a = node("a.txt", None);
    let b = node("b.txt", None);
    store.add_node(&a).unwrap();
    store.add_node(&b).unwrap();

    store.delete_node(&a.id).unwrap();
    // Deleting an absent id stays quiet, like the registry side.
    store.delete_node(&a.id).unwrap();

    assert_eq!(store.load_all().unwrap().files, vec![b]);
}

#[test]
fn test_bulk_put_writes_every_record() {
    let dir = TempDir::new().unwrap();
    let store = SledFileStore::open(&dir.path().join("store")).unwrap();
    let nodes: Vec<FileNode> = (0..25).map(|i| node(&format!("f{i}.txt"), None)).collect();

    store.bulk_put(&nodes).unwrap();

    let snapshot = store.load_all().unwrap();
    assert_eq!(snapshot.files.len(), nodes.len());
    for n in &nodes {
        assert!(snapshot.files.contains(n));
    }
}

#[test]
fn test_replacing_editor_partitions_overwrites() {
    let dir = TempDir::new().unwrap();
    let store = SledFileStore::open(&dir.path().join("store")).unwrap();
    let first = vec![FileId::new(), FileId::new()];
    let second = vec![FileId::new()];

    store.replace_open_files(&first).unwrap();
    store.replace_open_files(&second).unwrap();

    assert_eq!(store.load_all().unwrap().open_files, second);
}

#[test]
fn test_empty_store_loads_empty_partitions() {
    let dir = TempDir::new().unwrap();
    let store = SledFileStore::open(&dir.path().join("store")).unwrap();

    let snapshot = store.load_all().unwrap();
    assert!(snapshot.files.is_empty());
    assert!(snapshot.open_files.is_empty());
    assert!(snapshot.active_files.is_empty());
}
