use cbt_domain::{EmotionData, SessionData, SituationData, StepPayload, ThoughtData};
use cbt_persistence::{DraftConfig, DraftEnvelope, IdentityCrypto, InMemoryKeyValueStore, KeyValueStore, LoadError,
                      PersistenceError, PersistenceGateway, UnavailableCrypto, XChaChaCrypto};
use chrono::{TimeZone, Utc};
use serde_json::json;
use std::sync::Arc;

fn sample() -> SessionData {
  let mut data = SessionData::default();
  data.write(StepPayload::Situation(SituationData { situation: "Had a fight".into(), date: "2024-01-01".into() }));
  data.write(StepPayload::Emotions(EmotionData { anger: 8, shame: 3, ..Default::default() }));
  data.write(StepPayload::Thoughts(vec![ThoughtData { thought: "They never listen".into(), credibility: 70 }]));
  data.touch(Utc.with_ymd_and_hms(2024, 1, 1, 10, 30, 0).unwrap());
  data
}

fn gateway_with(store: Arc<InMemoryKeyValueStore>, key: &str) -> PersistenceGateway {
  PersistenceGateway::new(store, Arc::new(IdentityCrypto), DraftConfig::default().with_key(key))
}

#[test]
fn save_then_load_round_trips_through_a_v1_envelope() {
  let store = Arc::new(InMemoryKeyValueStore::new());
  let gateway = gateway_with(store.clone(), "roundtrip");
  let data = sample();
  assert!(gateway.save(&data));

  let raw = store.raw_text("roundtrip").expect("stored");
  let envelope: DraftEnvelope = serde_json::from_str(&raw).unwrap();
  assert_eq!(envelope.version, 1);
  assert!(envelope.encrypted);
  assert_eq!(envelope.last_modified, data.last_modified);

  let loaded = gateway.load().unwrap().expect("draft");
  assert_eq!(loaded.data, data);
  assert!(!loaded.needs_migration);
  assert_eq!(loaded.version, 1);
}

#[test]
fn absent_key_is_not_an_error() {
  let gateway = gateway_with(Arc::new(InMemoryKeyValueStore::new()), "nothing-here");
  assert_eq!(gateway.load().unwrap(), None);
  assert!(!gateway.has_draft());
  assert_eq!(gateway.draft_timestamp(), None);
}

#[test]
fn legacy_plaintext_is_loaded_and_flagged_for_migration() {
  let store = Arc::new(InMemoryKeyValueStore::new());
  let legacy = json!({
    "situation": {"situation": "Missed the bus", "date": "2023-11-02"},
    "thoughts": [{"thought": "I'm hopeless", "credibility": 90}],
    "lastModified": "2023-11-02T08:00:00Z"
  });
  store.set("legacy", legacy.to_string().as_bytes()).unwrap();
  let gateway = gateway_with(store.clone(), "legacy");

  assert!(gateway.has_draft());
  assert_eq!(gateway.draft_timestamp(), Some(Utc.with_ymd_and_hms(2023, 11, 2, 8, 0, 0).unwrap()));

  let loaded = gateway.load().unwrap().expect("draft");
  assert!(loaded.needs_migration);
  assert_eq!(loaded.version, 0);
  assert_eq!(loaded.data.thoughts[0].thought, "I'm hopeless");

  // the next save writes the encrypted envelope; the plaintext shape is gone
  let mut edited = loaded.data.clone();
  edited.touch(Utc::now());
  assert!(gateway.save(&edited));
  let raw: serde_json::Value = serde_json::from_str(&store.raw_text("legacy").unwrap()).unwrap();
  assert_eq!(raw["encrypted"], json!(true));
  assert_eq!(raw["version"], json!(1));
  assert!(raw.get("situation").is_none());
  assert!(!gateway.load().unwrap().unwrap().needs_migration);
}

#[test]
fn undecryptable_payload_yields_a_typed_error() {
  let store = Arc::new(InMemoryKeyValueStore::new());
  let config = DraftConfig::default().with_key("rotated");
  let writer = PersistenceGateway::new(store.clone(), Arc::new(XChaChaCrypto::from_secret("old")), config.clone());
  assert!(writer.save(&sample()));

  let reader = PersistenceGateway::new(store, Arc::new(XChaChaCrypto::from_secret("new")), config);
  assert!(reader.has_draft());
  assert!(matches!(reader.load(), Err(LoadError::Decrypt(_))));
}

#[test]
fn corrupt_bytes_and_future_versions_are_reported() {
  let store = Arc::new(InMemoryKeyValueStore::new());
  store.set("corrupt", b"{{{").unwrap();
  store.set("future",
           br#"{"version":7,"encrypted":true,"payload":"x","lastModified":"2024-01-01T00:00:00Z"}"#)
       .unwrap();
  assert!(matches!(gateway_with(store.clone(), "corrupt").load(), Err(LoadError::Corrupt(_))));
  assert_eq!(gateway_with(store, "future").load(), Err(LoadError::UnsupportedVersion(7)));
}

#[test]
fn has_draft_follows_save_and_clear() {
  let gateway = gateway_with(Arc::new(InMemoryKeyValueStore::new()), "lifecycle");
  assert!(!gateway.has_draft());
  assert!(gateway.save(&SessionData::default()));
  assert!(gateway.has_draft());
  gateway.clear();
  assert!(!gateway.has_draft());
  // idempotent
  gateway.clear();
  assert!(!gateway.has_draft());
}

#[test]
fn keys_are_isolated_namespaces() {
  let store = Arc::new(InMemoryKeyValueStore::new());
  let a = gateway_with(store.clone(), "user-a");
  let b = gateway_with(store.clone(), "user-b");
  assert!(a.save(&sample()));
  assert!(a.has_draft());
  assert!(!b.has_draft());
  assert_eq!(store.len(), 1);
}

struct BrokenStore;

impl KeyValueStore for BrokenStore {
  fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
    Err(PersistenceError::Storage("storage disabled".into()))
  }
  fn set(&self, _key: &str, _value: &[u8]) -> Result<(), PersistenceError> {
    Err(PersistenceError::Storage("quota exceeded".into()))
  }
  fn remove(&self, _key: &str) -> Result<(), PersistenceError> {
    Err(PersistenceError::Storage("storage disabled".into()))
  }
}

#[test]
fn storage_failures_are_swallowed_by_save_and_clear() {
  let gateway = PersistenceGateway::new(Arc::new(BrokenStore), Arc::new(IdentityCrypto), DraftConfig::default());
  assert!(!gateway.save(&sample()));
  gateway.clear();
  assert!(!gateway.has_draft());
  assert!(matches!(gateway.load(), Err(LoadError::Storage(_))));
}

#[test]
fn missing_key_material_fails_safely() {
  let store = Arc::new(InMemoryKeyValueStore::new());
  let gateway = PersistenceGateway::new(store.clone(), Arc::new(UnavailableCrypto), DraftConfig::default());
  assert!(!gateway.save(&sample()));
  assert!(store.is_empty());

  gateway_with(store.clone(), "cbt-flow-draft").save(&sample());
  assert!(matches!(gateway.load(), Err(LoadError::Decrypt(_))));
}
