//! State file persistence

use std::fs;

use at_planner::{FileStore, Itinerary, Point, StoreError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn store(dir: &TempDir) -> FileStore {
    FileStore::open(dir.path().join("state.json"))
}

fn sample() -> Itinerary {
    Itinerary::from_parts(
        vec![Point::new("c", "Shrine", 35.2, 139.2)],
        vec![
            Point::new("a", "Station", 35.0, 139.0)
                .with_group("Show")
                .with_thumbnail("https://example.com/a.jpg")
                .with_episode("3"),
            Point::new("b", "Bridge", 35.1, 139.1).with_season("2"),
        ],
    )
}

#[test]
fn test_missing_file_loads_empty() {
    let dir = TempDir::new().unwrap();
    let itinerary = store(&dir).load().unwrap();
    assert!(itinerary.is_empty());
    assert!(!itinerary.is_hidden());
}

#[test]
fn test_saved_state_reloads_identically() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let itinerary = sample();
    assert!(store.save(&itinerary).unwrap());
    assert_eq!(store.load().unwrap(), itinerary);
}

#[test]
fn test_empty_itinerary_is_not_written() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    assert!(!store.save(&Itinerary::new()).unwrap());
    assert!(!store.path().exists());
}

#[test]
fn test_empty_write_keeps_previous_file() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    store.save(&sample()).unwrap();
    assert!(!store.save(&Itinerary::new()).unwrap());
    assert_eq!(store.load().unwrap().selection().len(), 2);
}

#[test]
fn test_file_layout() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    store.save(&sample()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
    assert_eq!(json["candidates"][0]["id"], "c");
    assert_eq!(json["selection"][0]["name"], "Station");
    assert_eq!(json["selection"][0]["group"], "Show");
    assert_eq!(json["selection"][1]["season"], "2");
    assert!(json["selection"][1].get("group").is_none());
    assert!(json.get("hidden").is_none());
}

#[test]
fn test_hidden_candidates_survive_reload() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let mut itinerary = Itinerary::from_parts(vec![Point::new("c", "Shrine", 35.2, 139.2)], vec![]);
    itinerary.hide_candidates();
    assert!(store.save(&itinerary).unwrap());

    let mut reloaded = store.load().unwrap();
    assert!(reloaded.candidates().is_empty());
    reloaded.unhide_candidates();
    assert_eq!(reloaded.candidates().len(), 1);
}

#[test]
fn test_hand_edited_overlap_is_repaired() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    fs::write(
        store.path(),
        r#"{
            "candidates": [
                {"id": "a", "name": "Station", "position": {"lat": 35.0, "lon": 139.0}},
                {"id": "b", "name": "Bridge", "position": {"lat": 35.1, "lon": 139.1}}
            ],
            "selection": [
                {"id": "a", "name": "Station", "position": {"lat": 35.0, "lon": 139.0}}
            ]
        }"#,
    )
    .unwrap();
    let itinerary = store.load().unwrap();
    assert_eq!(itinerary.candidates().len(), 1);
    assert_eq!(itinerary.candidates()[0].id().as_str(), "b");
}

#[test]
fn test_corrupt_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    fs::write(store.path(), "{ not json").unwrap();
    assert!(matches!(store.load(), Err(StoreError::JsonError { .. })));
}

#[test]
fn test_save_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path().join("nested/deeper/state.json"));
    assert!(store.save(&sample()).unwrap());
    assert!(store.path().exists());
    assert!(store.remove().unwrap());
    assert!(!store.remove().unwrap());
}
