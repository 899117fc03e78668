use std::fs;
use std::sync::Arc;
use std::thread;

use apidoc_core::SpecStore;
use apidoc_core::error::LoadError;

#[test]
fn concurrent_loads_share_one_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("openapi.yaml");
    fs::write(&path, "openapi: 3.0.0\npaths:\n  /ping:\n    get:\n      operationId: ping\n").unwrap();

    let store = Arc::new(SpecStore::new());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            let path = path.clone();
            thread::spawn(move || store.load(&path).unwrap())
        })
        .collect();

    let docs: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for doc in &docs[1..] {
        assert!(Arc::ptr_eq(&docs[0], doc));
    }
    assert_eq!(docs[0]["paths"]["/ping"]["get"]["operationId"], "ping");
}

#[test]
fn failed_load_can_be_retried() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("late.json");
    let store = SpecStore::new();

    let err = store.load(&path).unwrap_err();
    assert!(matches!(err, LoadError::Read { .. }));
    assert!(store.get(&path.to_string_lossy()).is_none());

    fs::write(&path, r#"{"openapi": "3.0.0", "paths": {}}"#).unwrap();
    let doc = store.load(&path).unwrap();
    assert_eq!(doc["openapi"], "3.0.0");
}

#[test]
fn invalid_document_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{not json").unwrap();

    let err = SpecStore::new().load(&path).unwrap_err();
    assert!(matches!(err, LoadError::Parse { .. }));
    assert!(err.to_string().contains("broken.json"));
}
