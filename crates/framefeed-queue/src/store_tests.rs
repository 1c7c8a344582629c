use super::*;
use serde_json::json;
use tempfile::TempDir;

fn entries(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[tokio::test]
async fn test_memory_store_get_omits_absent_keys() {
    let store = MemoryKvStore::new();
    store.set(entries(&[("a", json!(1))])).await.unwrap();

    let values = store.get(&["a", "b"]).await.unwrap();
    assert_eq!(values.len(), 1);
    assert_eq!(values["a"], json!(1));
}

#[tokio::test]
async fn test_memory_store_set_replaces_whole_value() {
    let store = MemoryKvStore::new();
    store.set(entries(&[("q", json!([1, 2, 3]))])).await.unwrap();
    store.set(entries(&[("q", json!([3]))])).await.unwrap();

    let values = store.get(&["q"]).await.unwrap();
    assert_eq!(values["q"], json!([3]));
}

#[tokio::test]
async fn test_memory_store_remove() {
    let store = MemoryKvStore::new();
    store
        .set(entries(&[("a", json!(1)), ("b", json!(2))]))
        .await
        .unwrap();
    store.remove(&["a", "missing"]).await.unwrap();

    let values = store.get(&["a", "b"]).await.unwrap();
    assert!(!values.contains_key("a"));
    assert_eq!(values["b"], json!(2));
}

#[tokio::test]
async fn test_file_store_missing_file_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileKvStore::new(temp_dir.path().join("store.json")).await.unwrap();

    let values = store.get(&["anything"]).await.unwrap();
    assert!(values.is_empty());
}

#[tokio::test]
async fn test_file_store_persists_across_instances() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("store.json");

    let store = FileKvStore::new(&path).await.unwrap();
    store
        .set(entries(&[("k", json!({"x": "y"})), ("n", json!(7))]))
        .await
        .unwrap();
    drop(store);

    let reopened = FileKvStore::new(&path).await.unwrap();
    let values = reopened.get(&["k", "n"]).await.unwrap();
    assert_eq!(values["k"], json!({"x": "y"}));
    assert_eq!(values["n"], json!(7));
    assert!(!path.with_extension("json.tmp").exists());
}

#[tokio::test]
async fn test_file_store_remove() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileKvStore::new(temp_dir.path().join("store.json")).await.unwrap();
    store
        .set(entries(&[("a", json!(1)), ("b", json!(2))]))
        .await
        .unwrap();

    store.remove(&["a"]).await.unwrap();

    let raw = std::fs::read_to_string(store.path()).unwrap();
    let doc: Value = serde_json::from_str(&raw).unwrap();
    assert!(doc.get("a").is_none());
    assert_eq!(doc["b"], json!(2));
}

#[tokio::test]
async fn test_file_store_corrupt_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = FileKvStore::new(&path).await.unwrap();
    let err = store.get(&["a"]).await.unwrap_err();
    assert!(matches!(err, QueueError::Storage(_)));

    let err = store.set(entries(&[("a", json!(1))])).await.unwrap_err();
    assert!(matches!(err, QueueError::Storage(_)));
}

#[tokio::test]
async fn test_file_store_rejects_non_object_document() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.json");
    std::fs::write(&path, "[1, 2]").unwrap();

    let store = FileKvStore::new(&path).await.unwrap();
    assert!(matches!(store.get(&["a"]).await, Err(QueueError::Storage(_))));
}
