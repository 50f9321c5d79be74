use estate_desk::{
    Catalog, EstateError, FileStore, KeyValueStore, Listing, ListingStore, MemoryStore,
    VisitTracker,
};
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_end_to_end_with_file_store() {
    // Setup temporary data directory
    let temp_dir = TempDir::new().unwrap();
    let catalog = Catalog::sample();

    let store = ListingStore::new(FileStore::new(temp_dir.path()));
    store.add_from_catalog("user_1", &catalog, "prop1").await.unwrap();
    store.add_from_catalog("user_1", &catalog, "prop4").await.unwrap();
    store.add_from_catalog("user_1", &catalog, "prop3").await.unwrap();

    // A fresh store over the same directory sees the same collection
    let reopened = ListingStore::new(FileStore::new(temp_dir.path()));
    let ids: Vec<String> = reopened
        .list("user_1")
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.id)
        .collect();
    assert_eq!(ids, vec!["prop1", "prop4", "prop3"]);

    let histogram = reopened.price_histogram("user_1").await.unwrap();
    assert_eq!(histogram.counts(), [0, 1, 1, 1]);

    let remaining = reopened.remove("user_1", "prop4").await.unwrap();
    assert_eq!(remaining.len(), 2);
    assert!(remaining.iter().all(|l| l.id != "prop4"));

    // Verify the persisted file content
    let raw = std::fs::read_to_string(temp_dir.path().join("savedProperties_user_1")).unwrap();
    let persisted: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
    assert_eq!(persisted.len(), 2);
    assert_eq!(persisted[0]["id"], "prop1");
    assert_eq!(persisted[0]["price"], 4_500_000);
}

#[tokio::test]
async fn test_corrupt_file_reads_as_empty() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("savedProperties_user_1"),
        "[{\"id\": \"prop1\", \"title\": ",
    )
    .unwrap();

    let store = ListingStore::new(FileStore::new(temp_dir.path()));
    assert!(store.list("user_1").await.unwrap().is_empty());

    // Writing after a corrupt read replaces the bad value
    let listing = Listing::new("x1", "Cottage", "Cotswolds, UK", 650_000, "cottage.jpg");
    store.add("user_1", listing.clone()).await.unwrap();
    assert_eq!(store.list("user_1").await.unwrap(), vec![listing]);
}

#[tokio::test]
async fn test_invalid_utf8_file_reads_as_empty() {
    let temp_dir = TempDir::new().unwrap();
    // A valid listing whose title contains a lone 0xFF byte
    let bytes: &[u8] = b"[{\"id\":\"prop1\",\"title\":\"Villa \xFF\",\"location\":\"Malibu\",\"price\":4500000,\"image_ref\":\"villa.jpg\"}]";
    std::fs::write(temp_dir.path().join("savedProperties_user_1"), bytes).unwrap();

    let store = ListingStore::new(FileStore::new(temp_dir.path()));
    assert!(store.list("user_1").await.unwrap().is_empty());

    // The damaged file is replaced on the next save
    let listing = Listing::new("x1", "Cottage", "Cotswolds, UK", 650_000, "cottage.jpg");
    store.add("user_1", listing.clone()).await.unwrap();
    assert_eq!(store.list("user_1").await.unwrap(), vec![listing]);
}

#[tokio::test]
async fn test_read_failure_surfaces_as_persistence_error() {
    let temp_dir = TempDir::new().unwrap();
    let files = FileStore::new(temp_dir.path());
    std::fs::create_dir(files.path_for("savedProperties_user_1").unwrap()).unwrap();

    let store = ListingStore::new(files);
    let err = store.list("user_1").await.unwrap_err();
    assert!(matches!(err, EstateError::Persistence { ref key, .. } if key == "savedProperties_user_1"));
}

#[tokio::test]
async fn test_reads_legacy_browser_payload() {
    let storage = MemoryStore::new();
    let legacy = serde_json::json!([
        {
            "id": "prop2",
            "title": "Lakeside Retreat",
            "location": "Geneva, Switzerland",
            "price": "$3,200,000",
            "img": "https://example.com/lake.jpg"
        },
        {
            "id": "prop4",
            "title": "Modern City Loft",
            "location": "New York, USA",
            "price": "$1,950,000",
            "img": "https://example.com/loft.jpg"
        }
    ]);
    storage
        .insert("savedProperties_clerk_user", &legacy.to_string())
        .await;

    let store = ListingStore::new(storage);
    let listings = store.list("clerk_user").await.unwrap();

    assert_eq!(listings.len(), 2);
    assert_eq!(listings[0].price, 3_200_000);
    assert_eq!(listings[1].image_ref, "https://example.com/loft.jpg");

    let histogram = store.price_histogram("clerk_user").await.unwrap();
    assert_eq!(histogram.counts(), [0, 1, 0, 1]);
}

#[tokio::test]
async fn test_add_then_remove_round_trip() {
    let store = ListingStore::new(MemoryStore::new());
    let listing = Listing::new("prop5", "Desert Oasis", "Scottsdale, Arizona", 2_400_000, "oasis.jpg");

    store.add("u", listing.clone()).await.unwrap();
    store.add("u", listing.clone()).await.unwrap();
    let saved = store.list("u").await.unwrap();
    assert_eq!(saved.iter().filter(|l| l.id == "prop5").count(), 1);

    store.remove("u", "prop5").await.unwrap();
    assert!(store.list("u").await.unwrap().is_empty());

    // Removing again is a no-op
    assert!(store.remove("u", "prop5").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_persistence_failure_leaves_previous_state() {
    let storage = Arc::new(MemoryStore::new());
    let store = ListingStore::new(Arc::clone(&storage));
    let catalog = Catalog::sample();

    store.add_from_catalog("u", &catalog, "prop1").await.unwrap();

    storage.fail_writes("QuotaExceededError");
    let err = store
        .add_from_catalog("u", &catalog, "prop2")
        .await
        .unwrap_err();
    assert!(matches!(err, EstateError::Persistence { .. }));
    assert!(err.to_string().contains("QuotaExceededError"));

    let ids: Vec<String> = store.list("u").await.unwrap().into_iter().map(|l| l.id).collect();
    assert_eq!(ids, vec!["prop1"]);
}

#[tokio::test]
async fn test_namespace_and_visits_share_storage() {
    let storage = Arc::new(MemoryStore::new());
    let store = ListingStore::with_namespace(Arc::clone(&storage), "favorites");
    let tracker = VisitTracker::new(Arc::clone(&storage));

    store
        .add_from_catalog("u", &Catalog::sample(), "prop2")
        .await
        .unwrap();
    tracker.record_visit("u", chrono::Utc::now()).await.unwrap();

    assert!(storage.get("favorites_u").await.unwrap().is_some());
    assert!(storage.get("savedProperties_u").await.unwrap().is_none());
    assert!(storage.get("firstVisit_u").await.unwrap().is_some());
    assert!(storage.get("lastVisit_u").await.unwrap().is_some());
}

#[tokio::test]
async fn test_catalog_from_csv_file_drives_available() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("catalog.csv");
    std::fs::write(
        &csv_path,
        "id,title,location,price,image_ref\n\
         c1,Harbor House,\"Sydney, Australia\",\"$1,250,000\",harbor.jpg\n\
         c2,Mountain Cabin,\"Banff, Canada\",875000,cabin.jpg\n\
         c3,Palazzo,\"Florence, Italy\",\"$5,100,000\",palazzo.jpg\n",
    )
    .unwrap();

    let catalog = Catalog::from_csv_path(&csv_path).unwrap();
    let store = ListingStore::new(FileStore::new(temp_dir.path().join("data")));
    store.add_from_catalog("u", &catalog, "c3").await.unwrap();

    let available: Vec<String> = store
        .available("u", &catalog)
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.id)
        .collect();
    assert_eq!(available, vec!["c1", "c2"]);
}
