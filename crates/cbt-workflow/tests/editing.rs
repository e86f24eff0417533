mod common;

use cbt_domain::{EmotionData, StepId, StepPayload, STEP_ORDER};
use cbt_persistence::{DraftEnvelope, InMemoryKeyValueStore};
use cbt_workflow::{DiaryFlow, NoopRemote};
use common::{flow_with, gateway, situation, RecordingRemote, KEY};
use std::collections::BTreeSet;
use std::sync::Arc;

#[tokio::test]
async fn update_then_complete_situation() {
  let store = Arc::new(InMemoryKeyValueStore::new());
  let remote = Arc::new(RecordingRemote::default());
  let flow = flow_with(store.clone(), remote.clone());

  let state = flow.update_step(StepId::Situation, situation("Had a fight")).await.unwrap();
  assert_eq!(state.session_data.situation.as_ref().unwrap().situation, "Had a fight");
  assert_eq!(state.current_step, StepId::Situation);
  assert!(state.completed_steps.is_empty());

  let state = flow.complete_step(StepId::Situation, situation("Had a fight")).await.unwrap();
  assert_eq!(state.current_step, StepId::Emotions);
  assert_eq!(state.completed_steps, BTreeSet::from([StepId::Situation]));

  assert_eq!(remote.situations(), vec!["Had a fight", "Had a fight"]);
  let envelope: DraftEnvelope = serde_json::from_str(&store.raw_text(KEY).unwrap()).unwrap();
  assert!(envelope.encrypted);
  assert_eq!(envelope.last_modified, state.session_data.last_modified);
  assert!(!flow.is_saving().unwrap());
}

#[tokio::test]
async fn every_distinct_timestamp_is_saved_once() {
  let store = Arc::new(InMemoryKeyValueStore::new());
  let flow = flow_with(store.clone(), Arc::new(NoopRemote));
  let gw = gateway(store.clone());

  flow.update_step(StepId::Situation, situation("one")).await.unwrap();
  let first = gw.draft_timestamp().unwrap();
  flow.update_step(StepId::Situation, situation("two")).await.unwrap();
  let second = gw.draft_timestamp().unwrap();
  assert!(second > first);

  // navigation does not touch the timestamp and does not rewrite the draft
  let before = store.raw_text(KEY).unwrap();
  flow.go_next().unwrap();
  flow.go_previous().unwrap();
  assert_eq!(store.raw_text(KEY).unwrap(), before);
}

#[tokio::test]
async fn reset_clears_memory_and_storage() {
  let store = Arc::new(InMemoryKeyValueStore::new());
  let flow = flow_with(store.clone(), Arc::new(NoopRemote));
  flow.complete_step(StepId::Situation, situation("x")).await.unwrap();
  flow.complete_step(StepId::Emotions, StepPayload::Emotions(EmotionData { fear: 5, ..Default::default() }))
      .await
      .unwrap();
  assert!(gateway(store.clone()).has_draft());

  let state = flow.reset().unwrap();
  assert_eq!(state.current_step, StepId::Situation);
  assert!(state.completed_steps.is_empty());
  assert!(state.session_data.is_blank());
  assert!(store.raw_text(KEY).is_none());
  assert!(!gateway(store).has_draft());
}

#[tokio::test]
async fn finishing_the_flow_discards_the_draft() {
  let store = Arc::new(InMemoryKeyValueStore::new());
  let remote = Arc::new(RecordingRemote::default());
  let flow = flow_with(store.clone(), remote.clone());

  for step in STEP_ORDER {
    let payload = match step {
      StepId::Situation => situation("Presentation went badly"),
      _ => StepPayload::FinalEmotions(EmotionData { joy: 4, ..Default::default() }),
    };
    flow.complete_step(step, payload).await.unwrap();
  }

  let progress = flow.progress().unwrap();
  assert!(progress.is_complete);
  assert_eq!(progress.completed_count, 9);
  assert_eq!(progress.current_step_number, 10);
  assert!(store.raw_text(KEY).is_none());
  assert_eq!(remote.completions.lock().unwrap().len(), 1);

  // stepping back off the completion screen keeps the data in memory
  let state = flow.go_previous().unwrap();
  assert_eq!(state.current_step, StepId::FinalEmotions);
  assert_eq!(state.session_data.situation.unwrap().situation, "Presentation went badly");
}

#[tokio::test]
async fn jumping_to_complete_also_clears_the_draft() {
  let store = Arc::new(InMemoryKeyValueStore::new());
  let flow = flow_with(store.clone(), Arc::new(NoopRemote));
  flow.update_step(StepId::Situation, situation("draft")).await.unwrap();
  assert!(store.raw_text(KEY).is_some());
  flow.go_to_step(StepId::Complete).unwrap();
  assert!(store.raw_text(KEY).is_none());
  // no-op from the terminal state
  assert_eq!(flow.go_next().unwrap().current_step, StepId::Complete);
}

#[test]
fn navigation_is_synchronous_and_edits_can_be_blocked_on() {
  let store = Arc::new(InMemoryKeyValueStore::new());
  let flow = DiaryFlow::new(gateway(store), Arc::new(NoopRemote));
  assert_eq!(flow.go_previous().unwrap().current_step, StepId::Situation);
  assert_eq!(flow.go_to_step(StepId::SchemaModes).unwrap().current_step, StepId::SchemaModes);
  let state = tokio_test::block_on(flow.update_step(StepId::Thoughts, StepPayload::Thoughts(vec![]))).unwrap();
  // in-place edits never move the cursor
  assert_eq!(state.current_step, StepId::SchemaModes);
}
