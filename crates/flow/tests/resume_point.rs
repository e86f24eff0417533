use cbt_domain::{CoreBeliefData, EmotionData, SessionData, SituationData, StepId, StepPayload, STEP_ORDER};
use flow::compute_starting_step;
use std::collections::BTreeSet;

fn with(payloads: Vec<StepPayload>) -> SessionData {
  let mut data = SessionData::default();
  for p in payloads {
    data.write(p);
  }
  data
}

#[test]
fn empty_session_starts_at_the_beginning() {
  let point = compute_starting_step(&SessionData::default());
  assert_eq!(point.start_step, StepId::Situation);
  assert!(point.completed_steps.is_empty());
}

#[test]
fn only_the_contiguous_prefix_counts() {
  let data = with(vec![StepPayload::Situation(SituationData { situation: "Had a fight".into(),
                                                              date: "2024-01-01".into() }),
                       StepPayload::Emotions(EmotionData { anger: 7, ..Default::default() }),
                       StepPayload::CoreBelief(CoreBeliefData { belief: "I'm unlovable".into(),
                                                                credibility: 80 })]);
  let point = compute_starting_step(&data);
  assert_eq!(point.start_step, StepId::Thoughts);
  assert_eq!(point.completed_steps, BTreeSet::from([StepId::Situation, StepId::Emotions]));
  assert!(!point.completed_steps.contains(&StepId::CoreBelief));
}

#[test]
fn untouched_emotion_sliders_stop_the_scan() {
  let data = with(vec![StepPayload::Situation(SituationData { situation: "Late for work".into(),
                                                              date: String::new() }),
                       StepPayload::Emotions(EmotionData::default())]);
  let point = compute_starting_step(&data);
  assert_eq!(point.start_step, StepId::Emotions);
}

#[test]
fn fully_filled_draft_resumes_on_the_last_step() {
  let raw = serde_json::json!({
    "situation": {"situation": "s", "date": "d"},
    "emotions": {"fear": 1},
    "thoughts": [{"thought": "t", "credibility": 0}],
    "coreBelief": {"belief": "b", "credibility": 0},
    "challengeQuestions": [{"question": "q", "answer": ""}],
    "rationalThoughts": [{"thought": "r", "confidence": 0}],
    "schemaModes": [{"id": "m", "name": "m", "description": "", "selected": true}],
    "actionPlan": {"finalEmotions": {}, "newBehavior": "walk"},
    "finalEmotions": {"joy": 3}
  });
  let data: SessionData = serde_json::from_value(raw).unwrap();
  let point = compute_starting_step(&data);
  assert_eq!(point.start_step, StepId::FinalEmotions);
  assert_eq!(point.completed_steps.len(), STEP_ORDER.len());
}
