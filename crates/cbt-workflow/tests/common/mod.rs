#![allow(dead_code)]
use async_trait::async_trait;
use cbt_domain::{EmotionData, SessionData, SituationData, StepId, StepPayload};
use cbt_persistence::{DraftConfig, IdentityCrypto, InMemoryKeyValueStore, KeyValueStore, PersistenceError,
                      PersistenceGateway};
use cbt_workflow::{DiaryFlow, RemoteSink};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

pub const KEY: &str = "test-draft";

pub fn situation(text: &str) -> StepPayload {
  StepPayload::Situation(SituationData { situation: text.into(), date: "2024-01-01".into() })
}

pub fn gateway(store: Arc<dyn KeyValueStore>) -> Arc<PersistenceGateway> {
  Arc::new(PersistenceGateway::new(store, Arc::new(IdentityCrypto), DraftConfig::default().with_key(KEY)))
}

/// Payload that fills `step` with something meaningful.
pub fn filled(step: StepId) -> StepPayload {
  match step {
    StepId::Situation => situation("Presentation went badly"),
    _ => StepPayload::FinalEmotions(EmotionData { joy: 4, ..Default::default() }),
  }
}

pub fn flow_with(store: Arc<InMemoryKeyValueStore>, remote: Arc<dyn RemoteSink>) -> DiaryFlow {
  DiaryFlow::new(gateway(store), remote)
}

/// Records every snapshot; can be switched to reject.
#[derive(Default)]
pub struct RecordingRemote {
  pub changes: Mutex<Vec<SessionData>>,
  pub completions: Mutex<Vec<SessionData>>,
  pub reject: AtomicBool,
  pub reject_complete: AtomicBool,
}

impl RecordingRemote {
  pub fn situations(&self) -> Vec<String> {
    self.changes
        .lock()
        .unwrap()
        .iter()
        .map(|d| d.situation.as_ref().map(|s| s.situation.clone()).unwrap_or_default())
        .collect()
  }
}

#[async_trait]
impl RemoteSink for RecordingRemote {
  async fn on_change(&self, data: &SessionData) -> anyhow::Result<()> {
    if self.reject.load(Ordering::SeqCst) {
      anyhow::bail!("remote unavailable");
    }
    self.changes.lock().unwrap().push(data.clone());
    Ok(())
  }

  async fn on_complete(&self, data: &SessionData) -> anyhow::Result<()> {
    if self.reject_complete.load(Ordering::SeqCst) {
      anyhow::bail!("archive unavailable");
    }
    self.completions.lock().unwrap().push(data.clone());
    Ok(())
  }
}

/// Holds the first on_change call until `release` is notified.
#[derive(Default)]
pub struct GatedRemote {
  pub calls: Mutex<Vec<SessionData>>,
  pub entered: Notify,
  pub release: Notify,
  count: AtomicUsize,
}

#[async_trait]
impl RemoteSink for GatedRemote {
  async fn on_change(&self, data: &SessionData) -> anyhow::Result<()> {
    self.calls.lock().unwrap().push(data.clone());
    if self.count.fetch_add(1, Ordering::SeqCst) == 0 {
      self.entered.notify_one();
      self.release.notified().await;
    }
    Ok(())
  }
}

/// Store whose reads take a while, to race hydration against the user.
pub struct SlowStore {
  pub inner: InMemoryKeyValueStore,
  pub delay: Duration,
}

impl KeyValueStore for SlowStore {
  fn get(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
    // read first, then stall: the caller sees the value as of the start of the read
    let value = self.inner.get(key);
    std::thread::sleep(self.delay);
    value
  }
  fn set(&self, key: &str, value: &[u8]) -> Result<(), PersistenceError> {
    self.inner.set(key, value)
  }
  fn remove(&self, key: &str) -> Result<(), PersistenceError> {
    self.inner.remove(key)
  }
}
