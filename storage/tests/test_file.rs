mod common;

use common::create_export_structure;
use std::path::PathBuf;
use storage::{temp_path, LocalStorage};

#[tokio::test]
async fn test_list_stems_filters_extension_and_sorts() {
    let temp_dir = create_export_structure();
    let storage = LocalStorage::new(temp_dir.path());

    let documents = storage.list_stems("Documents", "xml").await.unwrap();
    assert_eq!(documents, vec!["Invoice".to_string(), "Order".to_string()]);

    let catalogs = storage.list_stems("Catalogs", "xml").await.unwrap();
    assert_eq!(catalogs, vec!["Currency".to_string()]);
}

#[tokio::test]
async fn test_list_stems_missing_directory() {
    let temp_dir = create_export_structure();
    let storage = LocalStorage::new(temp_dir.path());

    let result = storage.list_stems("Enums", "xml").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_find_files_recursive() {
    let temp_dir = create_export_structure();
    let storage = LocalStorage::new(temp_dir.path());

    let mut rx = storage.find_files("Roles", "Rights.xml");
    let mut found = Vec::new();
    while let Some(path) = rx.recv().await {
        found.push(path);
    }
    found.sort();

    let expected: Vec<PathBuf> = vec![
        temp_dir.path().join("Roles/Admin/Ext/Rights.xml"),
        temp_dir.path().join("Roles/Clerk/Ext/Rights.xml"),
    ];
    assert_eq!(found, expected);
}

#[tokio::test]
async fn test_find_files_missing_root_yields_nothing() {
    let temp_dir = create_export_structure();
    let storage = LocalStorage::new(temp_dir.path().join("missing"));

    let mut rx = storage.find_files("Roles", "Rights.xml");
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn test_read_write_roundtrip() {
    let temp_dir = create_export_structure();
    let path = temp_dir.path().join("Roles/Admin/Ext/Rights.xml");

    LocalStorage::write_file(&path, b"<Rights>\n</Rights>\n").await.unwrap();
    let content = LocalStorage::read_file(&path).await.unwrap();
    assert_eq!(content, "<Rights>\n</Rights>\n");
}

#[tokio::test]
async fn test_write_leaves_no_temp_file() {
    let temp_dir = create_export_structure();
    let path = temp_dir.path().join("Roles/Clerk/Ext/Rights.xml");

    LocalStorage::write_file(&path, b"<Rights/>\n").await.unwrap();

    assert_eq!(temp_path(&path), temp_dir.path().join("Roles/Clerk/Ext/Rights.xml.tmp"));
    assert!(!temp_path(&path).exists());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "<Rights/>\n");
}

#[tokio::test]
async fn test_failed_write_keeps_previous_content() {
    let temp_dir = create_export_structure();
    let path = temp_dir.path().join("Roles/Admin/Ext/Rights.xml");
    let before = std::fs::read_to_string(&path).unwrap();

    // 临时文件位置被目录占用，写入必须失败
    std::fs::create_dir(temp_path(&path)).unwrap();

    let result = LocalStorage::write_file(&path, b"<Rights/>\n").await;
    assert!(result.is_err());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    assert!(temp_path(&path).is_dir());
}
