// Tests for the trusted-origin registrar: secret gating, duplicate
// rejection, and that successful adds reach the YAML file on disk.

use std::io::Write;

use tempfile::NamedTempFile;

use detoxic::trusted::{AddOutcome, TrustedOriginStore};

const SECRET: &str = "correct-horse-battery-staple";

fn store_with(initial: &[&str]) -> (NamedTempFile, TrustedOriginStore) {
    let mut file = NamedTempFile::new().unwrap();
    let urls: Vec<String> = initial.iter().map(|s| s.to_string()).collect();
    let yaml =
        serde_yaml::to_string(&std::collections::BTreeMap::from([("trusted_urls", urls)]))
            .unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file.flush().unwrap();

    let store = TrustedOriginStore::load(file.path(), SECRET).unwrap();
    (file, store)
}

/// Read the persisted list back out of the YAML file.
fn persisted_urls(file: &NamedTempFile) -> Vec<String> {
    let raw = std::fs::read_to_string(file.path()).unwrap();
    let value: serde_yaml::Value = serde_yaml::from_str(&raw).unwrap();
    serde_yaml::from_value(value["trusted_urls"].clone()).unwrap()
}

#[tokio::test]
async fn load_reads_existing_entries() {
    let (_file, store) = store_with(&["https://a.example", "https://b.example"]);
    assert_eq!(
        store.origins().await,
        vec!["https://a.example", "https://b.example"]
    );
}

#[tokio::test]
async fn missing_file_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = TrustedOriginStore::load(&dir.path().join("nope.yaml"), SECRET);
    assert!(result.is_err());
}

#[tokio::test]
async fn wrong_secret_is_rejected_without_mutation() {
    let (file, store) = store_with(&["https://a.example"]);

    let outcome = store.add("https://new.example", "wrong").await.unwrap();
    assert_eq!(outcome, AddOutcome::Unauthorized);

    // Neither memory nor disk changed.
    assert_eq!(store.origins().await, vec!["https://a.example"]);
    assert_eq!(persisted_urls(&file), vec!["https://a.example"]);
}

#[tokio::test]
async fn duplicate_url_is_rejected() {
    let (file, store) = store_with(&["https://a.example"]);

    let outcome = store.add("https://a.example", SECRET).await.unwrap();
    assert_eq!(
        outcome,
        AddOutcome::Duplicate(vec!["https://a.example".to_string()])
    );

    // Still exactly one entry.
    assert_eq!(persisted_urls(&file), vec!["https://a.example"]);
}

#[tokio::test]
async fn successful_add_updates_memory_and_disk() {
    let (file, store) = store_with(&["https://a.example"]);

    let outcome = store.add("https://new.example", SECRET).await.unwrap();
    assert_eq!(
        outcome,
        AddOutcome::Added(vec![
            "https://a.example".to_string(),
            "https://new.example".to_string(),
        ])
    );

    assert_eq!(
        store.origins().await,
        vec!["https://a.example", "https://new.example"]
    );
    assert_eq!(
        persisted_urls(&file),
        vec!["https://a.example", "https://new.example"]
    );
}

#[tokio::test]
async fn add_to_empty_list_works() {
    let (file, store) = store_with(&[]);

    let outcome = store.add("https://first.example", SECRET).await.unwrap();
    assert!(matches!(outcome, AddOutcome::Added(_)));
    assert_eq!(persisted_urls(&file), vec!["https://first.example"]);
}

#[tokio::test]
async fn concurrent_adds_of_same_url_keep_one_entry() {
    let (file, store) = store_with(&[]);
    let store = std::sync::Arc::new(store);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = std::sync::Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store.add("https://raced.example", SECRET).await.unwrap()
        }));
    }

    let mut added = 0;
    for handle in handles {
        if matches!(handle.await.unwrap(), AddOutcome::Added(_)) {
            added += 1;
        }
    }

    assert_eq!(added, 1, "exactly one add should win the race");
    assert_eq!(persisted_urls(&file), vec!["https://raced.example"]);
}
