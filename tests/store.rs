//! Integration tests for the JSON-file descriptor store.
//!
//! Each test works in its own temporary directory holding the backing file
//! and an asset root.

use std::sync::Arc;

use api_catalog::assets::AssetRoot;
use api_catalog::json_store::JsonFileStore;
use api_catalog::{
    ApiUpdate, DescriptorStore, ListFilter, ListOrder, NewApi, ResolvedSpec, SortDirection,
    SortField,
};
use tempfile::TempDir;

// ─── Helpers ────────────────────────────────────────────────────────

fn new_api(name: &str, team: &str, spec: &str) -> NewApi {
    NewApi {
        name: name.to_string(),
        team: team.to_string(),
        spec_location: spec.to_string(),
        description: None,
        docs: Vec::new(),
    }
}

fn store_in(tmp: &TempDir) -> JsonFileStore {
    JsonFileStore::new(
        tmp.path().join("data/apis.json"),
        AssetRoot::new(tmp.path().join("public")),
    )
}

fn names(apis: &[api_catalog::ApiDescriptor]) -> Vec<&str> {
    apis.iter().map(|a| a.name.as_str()).collect()
}

// ─── CRUD ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_then_get_returns_equal_record() {
    let tmp = TempDir::new().unwrap();
    let store = store_in(&tmp);

    let created = store
        .create(NewApi {
            description: Some("Pets and owners".into()),
            ..new_api("Petstore", "zoo", "/specs/petstore.json")
        })
        .await
        .unwrap();

    assert!(!created.id.is_empty());
    assert!(created.created_at.is_some());
    assert_eq!(created.created_at, created.updated_at);

    let fetched = store.get_by_id(&created.id).await.unwrap();
    assert_eq!(fetched, Some(created.clone()));

    // A fresh store over the same file sees the persisted record.
    let reopened = store_in(&tmp);
    assert_eq!(reopened.get_by_id(&created.id).await.unwrap(), Some(created));
}

#[tokio::test]
async fn test_create_assigns_distinct_ids() {
    let tmp = TempDir::new().unwrap();
    let store = store_in(&tmp);

    let a = store.create(new_api("A", "t", "a.json")).await.unwrap();
    let b = store.create(new_api("A", "t", "a.json")).await.unwrap();
    assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn test_get_unknown_id_is_none() {
    let tmp = TempDir::new().unwrap();
    let store = store_in(&tmp);
    assert_eq!(store.get_by_id("nope").await.unwrap(), None);
}

#[tokio::test]
async fn test_update_merges_fields_and_keeps_created_at() {
    let tmp = TempDir::new().unwrap();
    let store = store_in(&tmp);
    let created = store
        .create(new_api("Petstore", "zoo", "/specs/petstore.json"))
        .await
        .unwrap();

    let updated = store
        .update(
            &created.id,
            ApiUpdate {
                team: Some("farm".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Petstore");
    assert_eq!(updated.team, "farm");
    assert_eq!(updated.spec_location, "/specs/petstore.json");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    let fetched = store.get_by_id(&created.id).await.unwrap().unwrap();
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn test_update_unknown_id_is_none_and_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let store = store_in(&tmp);

    let result = store
        .update(
            "missing",
            ApiUpdate {
                name: Some("X".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(result.is_none());
    assert!(!store.path().exists());
}

#[tokio::test]
async fn test_delete_twice() {
    let tmp = TempDir::new().unwrap();
    let store = store_in(&tmp);
    let created = store.create(new_api("A", "t", "a.json")).await.unwrap();

    assert!(store.delete(&created.id).await.unwrap());
    assert!(!store.delete(&created.id).await.unwrap());
    assert_eq!(store.get_by_id(&created.id).await.unwrap(), None);

    let reopened = store_in(&tmp);
    assert!(reopened
        .list_all(&ListFilter::default(), ListOrder::default())
        .await
        .unwrap()
        .is_empty());
}

// ─── Listing ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_filters_and_sorts() {
    let tmp = TempDir::new().unwrap();
    let store = store_in(&tmp);
    store.create(new_api("Petstore", "zoo", "a")).await.unwrap();
    store.create(new_api("Billing", "finance", "b")).await.unwrap();
    store.create(new_api("pet adoption", "animals", "c")).await.unwrap();

    let all = store
        .list_all(&ListFilter::default(), ListOrder::default())
        .await
        .unwrap();
    assert_eq!(names(&all), vec!["Billing", "pet adoption", "Petstore"]);

    let pets = store
        .list_all(&ListFilter::name_contains("PET"), ListOrder::default())
        .await
        .unwrap();
    assert_eq!(names(&pets), vec!["pet adoption", "Petstore"]);

    let by_team_desc = store
        .list_all(
            &ListFilter::default(),
            ListOrder::new(SortField::Team, SortDirection::Desc),
        )
        .await
        .unwrap();
    assert_eq!(names(&by_team_desc), vec!["Petstore", "Billing", "pet adoption"]);

    let none = store
        .list_all(&ListFilter::name_contains("graphql"), ListOrder::default())
        .await
        .unwrap();
    assert!(none.is_empty());
}

// ─── Loading ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_file_is_read_once() {
    let tmp = TempDir::new().unwrap();
    let seeded = store_in(&tmp);
    let created = seeded.create(new_api("A", "t", "a.json")).await.unwrap();

    let store = store_in(&tmp);
    assert!(!store.is_loaded());
    assert!(store.get_by_id(&created.id).await.unwrap().is_some());
    assert!(store.is_loaded());

    // Removing the file after the first access changes nothing.
    std::fs::remove_file(store.path()).unwrap();
    assert!(store.get_by_id(&created.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_concurrent_first_access_loads_once() {
    let tmp = TempDir::new().unwrap();
    let seeded = store_in(&tmp);
    for i in 0..5 {
        seeded
            .create(new_api(&format!("api-{}", i), "t", "a.json"))
            .await
            .unwrap();
    }

    let store = Arc::new(store_in(&tmp));
    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .list_all(&ListFilter::default(), ListOrder::default())
                .await
                .unwrap()
                .len()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), 5);
    }
}

#[tokio::test]
async fn test_corrupt_file_boots_empty_then_recovers() {
    let tmp = TempDir::new().unwrap();
    let store = store_in(&tmp);
    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(store.path(), "{ not json").unwrap();

    let all = store
        .list_all(&ListFilter::default(), ListOrder::default())
        .await
        .unwrap();
    assert!(all.is_empty());
    // Not rewritten by a read.
    assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "{ not json");

    let created = store.create(new_api("A", "t", "a.json")).await.unwrap();
    let on_disk: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
    assert_eq!(on_disk[&created.id]["name"], "A");
    assert_eq!(on_disk[&created.id]["specLocation"], "a.json");
}

#[tokio::test]
async fn test_legacy_location_field_names_load() {
    let tmp = TempDir::new().unwrap();
    let store = store_in(&tmp);
    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(
        store.path(),
        r#"{
  "1": { "id": "1", "name": "Old", "team": "t", "openAPIUrl": "/specs/old.json" },
  "2": { "id": "2", "name": "Older", "team": "t", "documentationUrl": "older.yaml", "docs": [] }
}"#,
    )
    .unwrap();

    let old = store.get_by_id("1").await.unwrap().unwrap();
    assert_eq!(old.spec_location, "/specs/old.json");
    assert!(old.docs.is_empty());
    assert!(old.created_at.is_none());

    let older = store.get_by_id("2").await.unwrap().unwrap();
    assert_eq!(older.spec_location, "older.yaml");
}

#[tokio::test]
async fn test_file_key_wins_over_inner_id() {
    let tmp = TempDir::new().unwrap();
    let store = store_in(&tmp);
    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(
        store.path(),
        r#"{ "k1": { "id": "other", "name": "A", "team": "t", "specLocation": "a.json" } }"#,
    )
    .unwrap();

    let listed = store
        .list_all(&ListFilter::default(), ListOrder::default())
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    let id = listed[0].id.clone();
    assert_eq!(id, "k1");

    assert!(store.get_by_id(&id).await.unwrap().is_some());
    let updated = store
        .update(
            &id,
            ApiUpdate {
                team: Some("u".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.unwrap().team, "u");
    assert!(store.delete(&id).await.unwrap());
}

#[tokio::test]
async fn test_rejected_file_is_backed_up() {
    let tmp = TempDir::new().unwrap();
    let store = store_in(&tmp);
    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    // The second record lacks `team`, so the whole file is rejected.
    let original = r#"{
  "1": { "id": "1", "name": "A", "team": "t", "specLocation": "a.json" },
  "2": { "id": "2", "name": "B", "specLocation": "b.json" }
}"#;
    std::fs::write(store.path(), original).unwrap();

    assert!(store
        .list_all(&ListFilter::default(), ListOrder::default())
        .await
        .unwrap()
        .is_empty());
    store.create(new_api("C", "t", "c.json")).await.unwrap();

    let backup = tmp.path().join("data/apis.json.bak");
    assert_eq!(std::fs::read_to_string(backup).unwrap(), original);
}

// ─── Specification references ───────────────────────────────────────

#[tokio::test]
async fn test_specification_reference_policy() {
    let tmp = TempDir::new().unwrap();
    let public = tmp.path().join("public");
    std::fs::create_dir_all(public.join("specs")).unwrap();
    std::fs::write(public.join("specs/a.json"), "{\"openapi\":\"3.0.0\"}").unwrap();
    std::fs::write(public.join("b.yaml"), "openapi: 3.1.0").unwrap();

    let store = store_in(&tmp);
    let local = store.create(new_api("A", "t", "/specs/a.json")).await.unwrap();
    let bare = store.create(new_api("B", "t", "b.yaml")).await.unwrap();
    let remote = store
        .create(new_api("C", "t", "https://example.com/c.json"))
        .await
        .unwrap();
    let missing = store.create(new_api("D", "t", "/specs/gone.json")).await.unwrap();
    let escaping = store.create(new_api("E", "t", "/../secret")).await.unwrap();

    assert_eq!(
        store.get_specification_reference(&local.id).await,
        Some(ResolvedSpec::Content("{\"openapi\":\"3.0.0\"}".into()))
    );
    assert_eq!(
        store.get_specification_reference(&bare.id).await,
        Some(ResolvedSpec::Content("openapi: 3.1.0".into()))
    );
    assert_eq!(
        store.get_specification_reference(&remote.id).await,
        Some(ResolvedSpec::Remote("https://example.com/c.json".into()))
    );
    assert_eq!(store.get_specification_reference(&missing.id).await, None);
    assert_eq!(store.get_specification_reference(&escaping.id).await, None);
    assert_eq!(store.get_specification_reference("unknown").await, None);
}
