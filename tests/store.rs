//! Integration tests for the document stores and configuration.

use grumble_scheduler::{Config, DocumentStore, JsonDirStore, MemoryStore, StoreError};
use serde_json::json;
use std::time::Duration;

#[test]
fn memory_store_round_trip_and_missing() {
    let store = MemoryStore::new();
    assert!(store.fetch("match_results", "42").unwrap().is_none());
    store.save("match_results", "42", &json!({ "winner": 1 })).unwrap();
    assert_eq!(store.fetch("match_results", "42").unwrap(), Some(json!({ "winner": 1 })));
}

#[test]
fn json_dir_store_writes_one_file_per_document() {
    let root = std::env::temp_dir().join(format!("grumble-store-{}", uuid::Uuid::new_v4()));
    let store = JsonDirStore::new(&root);

    assert!(store.fetch("matches", "master").unwrap().is_none());
    let document = json!({ "matches": [{ "id": 1, "team1Id": 1, "team2Id": 2 }] });
    store.save("matches", "master", &document).unwrap();
    assert!(root.join("matches").join("master.json").is_file());
    assert_eq!(store.fetch("matches", "master").unwrap(), Some(document));

    std::fs::write(root.join("matches").join("broken.json"), b"{ not json").unwrap();
    assert!(matches!(store.fetch("matches", "broken"), Err(StoreError::Json(_))));

    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn keys_cannot_escape_the_store() {
    let store = JsonDirStore::new(std::env::temp_dir().join("grumble-never-created"));
    for (collection, id) in [("..", "x"), ("matches", "../x"), ("", "x"), ("a\\b", "x")] {
        assert!(matches!(
            store.fetch(collection, id),
            Err(StoreError::InvalidKey(_))
        ));
    }
    assert!(matches!(
        MemoryStore::new().save("matches", "a/b", &json!({})),
        Err(StoreError::InvalidKey(_))
    ));
}

#[test]
fn config_defaults_and_overrides() {
    let config = Config::from_lookup(|_| None);
    assert_eq!(config, Config::default());
    assert_eq!(config.port, 8080);
    assert_eq!(config.stage_ttl, Duration::from_secs(12 * 3600));

    let config = Config::from_lookup(|key| match key {
        "HOST" => Some("127.0.0.1".to_string()),
        "PORT" => Some("9000".to_string()),
        "DATA_DIR" => Some("/srv/grumble".to_string()),
        "STAGE_TTL_HOURS" => Some("soon".to_string()),
        _ => None,
    });
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 9000);
    assert_eq!(config.data_dir, std::path::PathBuf::from("/srv/grumble"));
    assert_eq!(config.stage_ttl, Duration::from_secs(12 * 3600));

    let config = Config::from_lookup(|key| (key == "STAGE_TTL_HOURS").then(|| "48".into()));
    assert_eq!(config.stage_ttl, Duration::from_secs(48 * 3600));

    // Hours that overflow when converted to seconds fall back to the default.
    let config =
        Config::from_lookup(|key| (key == "STAGE_TTL_HOURS").then(|| "6000000000000000".into()));
    assert_eq!(config.stage_ttl, Duration::from_secs(12 * 3600));
}
