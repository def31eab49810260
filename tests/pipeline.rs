//! Pipeline and store integration tests against a scratch database, with a
//! canned source standing in for the upstream API.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};

use pokescout::error::ScoutError;
use pokescout::fetch::PokemonSource;
use pokescout::models::ExportFile;
use pokescout::pipeline::{fetch_and_store, fetch_many, FetchOutcome, ItemStatus};
use pokescout::store::Store;

fn sample_raw_pokemon() -> Value {
    json!({
        "name": "pikachu",
        "id": 25,
        "height": 4,
        "weight": 60,
        "base_experience": 112,
        "sprites": {
            "other": {
                "official-artwork": {"front_default": "https://example.com/pikachu.png"}
            },
            "front_default": "https://example.com/front.png"
        },
        "types": [{"slot": 1, "type": {"name": "electric"}}],
        "abilities": [
            {"is_hidden": false, "slot": 1, "ability": {"name": "static"}},
            {"is_hidden": true, "slot": 3, "ability": {"name": "lightning-rod"}}
        ],
        "stats": [
            {"base_stat": 35, "effort": 0, "stat": {"name": "hp"}},
            {"base_stat": 55, "effort": 0, "stat": {"name": "attack"}}
        ]
    })
}

fn raw_pokemon(name: &str, id: i64) -> Value {
    json!({
        "name": name,
        "id": id,
        "height": 7,
        "weight": 69,
        "base_experience": 64,
        "sprites": {"front_default": format!("https://example.com/{}.png", name)},
        "types": [{"slot": 1, "type": {"name": "grass"}}],
        "abilities": [{"is_hidden": false, "slot": 1, "ability": {"name": "overgrow"}}],
        "stats": [{"base_stat": 45, "effort": 0, "stat": {"name": "hp"}}]
    })
}

/// Canned source: payloads keyed by the requested (normalized) name, with a
/// call counter so tests can prove the short-circuit skipped the network.
struct StubSource {
    payloads: HashMap<String, Value>,
    calls: AtomicUsize,
}

impl StubSource {
    fn new(payloads: Vec<(&str, Value)>) -> Self {
        Self {
            payloads: payloads
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    fn empty() -> Self {
        Self::new(Vec::new())
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PokemonSource for StubSource {
    async fn get_pokemon(&self, name: &str) -> Option<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payloads.get(&name.trim().to_lowercase()).cloned()
    }

    async fn get_species(&self, _id: i64) -> Option<Value> {
        None
    }
}

async fn open_store(dir: &tempfile::TempDir) -> Store {
    let url = format!("sqlite://{}", dir.path().join("scout.db").display());
    let store = Store::connect(&url).await.expect("open scratch db");
    store.ensure_schema().await.expect("create schema");
    store
}

#[tokio::test]
async fn fetch_stores_then_skips() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir).await;
    let source = StubSource::new(vec![("pikachu", sample_raw_pokemon())]);

    let outcome = fetch_and_store(&store, &source, "pikachu").await.unwrap();
    let FetchOutcome::Stored(record) = outcome else {
        panic!("expected Stored, got {:?}", outcome);
    };
    assert_eq!(record.name, "Pikachu");
    assert_eq!(record.pokedex_number, 25);
    assert_eq!(source.calls(), 1);

    // second call short-circuits: no outbound request, nothing re-written,
    // and the record comes back unchanged regardless of input casing
    let outcome = fetch_and_store(&store, &source, "PIKACHU").await.unwrap();
    let FetchOutcome::AlreadyStored(existing) = outcome else {
        panic!("expected AlreadyStored, got {:?}", outcome);
    };
    assert_eq!(existing, record);
    assert_eq!(source.calls(), 1);
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn unknown_name_is_not_found_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir).await;
    let source = StubSource::empty();

    let outcome = fetch_and_store(&store, &source, "unknownmon").await.unwrap();
    assert_eq!(outcome, FetchOutcome::NotFound);
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn malformed_payload_is_an_error_with_no_partial_write() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir).await;
    let source = StubSource::new(vec![("missingno", json!([1, 2, 3]))]);

    let err = fetch_and_store(&store, &source, "missingno")
        .await
        .expect_err("non-object payload must fail");
    assert!(matches!(err, ScoutError::MalformedPayload));
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn batch_continues_past_a_persistence_failure() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir).await;
    // "raichu" resolves to a payload whose sanitized name is Pikachu, so its
    // insert trips the unique name constraint once Pikachu is stored
    let source = StubSource::new(vec![
        ("pikachu", sample_raw_pokemon()),
        ("raichu", sample_raw_pokemon()),
        ("bulbasaur", raw_pokemon("bulbasaur", 1)),
    ]);

    let outcome = fetch_and_store(&store, &source, "pikachu").await.unwrap();
    assert!(matches!(outcome, FetchOutcome::Stored(_)));

    let names = vec!["raichu".to_string(), "bulbasaur".to_string()];
    let report = fetch_many(&store, &source, &names).await;

    assert_eq!(report.total, 2);
    assert_eq!(report.stored, 1);
    assert!(matches!(report.items[0].1, ItemStatus::Failed(_)));
    assert_eq!(report.items[1].1, ItemStatus::Stored);

    // the failed item rolled back in full; the rest of the batch committed
    assert_eq!(store.count().await.unwrap(), 2);
    assert!(store.find_by_name("Raichu").await.unwrap().is_none());
    assert!(store.find_by_name("Bulbasaur").await.unwrap().is_some());
}

#[tokio::test]
async fn repeated_batches_are_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir).await;
    let source = StubSource::new(vec![
        ("pikachu", sample_raw_pokemon()),
        ("bulbasaur", raw_pokemon("bulbasaur", 1)),
    ]);
    let names = vec!["pikachu".to_string(), "bulbasaur".to_string()];

    let first = fetch_many(&store, &source, &names).await;
    assert_eq!(first.stored, 2);
    let snapshot = store.list_all().await.unwrap();

    let second = fetch_many(&store, &source, &names).await;
    assert_eq!(second.stored, 0);
    assert!(second
        .items
        .iter()
        .all(|(_, s)| *s == ItemStatus::AlreadyStored));
    assert_eq!(store.list_all().await.unwrap(), snapshot);
}

#[tokio::test]
async fn export_round_trips_field_for_field() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir).await;
    let source = StubSource::new(vec![
        ("pikachu", sample_raw_pokemon()),
        ("bulbasaur", raw_pokemon("bulbasaur", 1)),
    ]);
    let names = vec!["pikachu".to_string(), "bulbasaur".to_string()];
    fetch_many(&store, &source, &names).await;

    let path = dir.path().join("export.json");
    let written = store.export_to_file(&path).await.unwrap();
    assert_eq!(written, 2);

    let text = std::fs::read_to_string(&path).unwrap();
    let parsed: ExportFile = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed.count, 2);
    assert_eq!(parsed.pokemon, store.list_all().await.unwrap());
}

#[tokio::test]
async fn find_by_type_and_statistics_reflect_the_children() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir).await;
    let source = StubSource::new(vec![
        ("pikachu", sample_raw_pokemon()),
        ("bulbasaur", raw_pokemon("bulbasaur", 1)),
    ]);
    let names = vec!["pikachu".to_string(), "bulbasaur".to_string()];
    fetch_many(&store, &source, &names).await;

    let electric = store.find_by_type("Electric").await.unwrap();
    assert_eq!(electric.len(), 1);
    assert_eq!(electric[0].name, "Pikachu");
    assert!(store.find_by_type("Dragon").await.unwrap().is_empty());

    let stats = store.statistics().await.unwrap();
    assert_eq!(stats.total, 2);
    assert!(stats
        .type_counts
        .iter()
        .any(|tc| tc.type_name == "Electric" && tc.count == 1));
    assert!((stats.avg_height - 5.5).abs() < 1e-9);
}

#[tokio::test]
async fn reset_empties_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir).await;
    let source = StubSource::new(vec![("pikachu", sample_raw_pokemon())]);

    fetch_and_store(&store, &source, "pikachu").await.unwrap();
    assert_eq!(store.count().await.unwrap(), 1);

    store.reset().await.unwrap();
    assert_eq!(store.count().await.unwrap(), 0);
    assert!(store.find_by_type("Electric").await.unwrap().is_empty());
}
