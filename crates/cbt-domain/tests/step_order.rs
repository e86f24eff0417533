use cbt_domain::{next, position, previous, StepId, STEP_ORDER, TOTAL_STEPS};

#[test]
fn next_walks_the_fixed_order_and_ends_in_complete() {
  let mut step = StepId::first();
  let mut visited = vec![step];
  while !step.is_complete() {
    step = next(step);
    visited.push(step);
  }
  assert_eq!(visited.len(), TOTAL_STEPS + 1);
  assert_eq!(&visited[..TOTAL_STEPS], &STEP_ORDER[..]);
  assert_eq!(next(StepId::FinalEmotions), StepId::Complete);
  assert_eq!(next(StepId::Complete), StepId::Complete);
}

#[test]
fn previous_handles_both_ends() {
  assert_eq!(previous(StepId::Situation), None);
  assert_eq!(previous(StepId::Emotions), Some(StepId::Situation));
  // stepping back off the completion screen lands on the last real step
  assert_eq!(previous(StepId::Complete), Some(StepId::FinalEmotions));
}

#[test]
fn positions_are_one_indexed() {
  assert_eq!(position(StepId::Situation), 1);
  assert_eq!(position(StepId::CoreBelief), 4);
  assert_eq!(position(StepId::FinalEmotions), 9);
  assert_eq!(position(StepId::Complete), 10);
}

#[test]
fn step_ids_round_trip_through_kebab_case() {
  for step in STEP_ORDER.iter().chain(std::iter::once(&StepId::Complete)) {
    let parsed: StepId = step.as_str().parse().unwrap();
    assert_eq!(parsed, *step);
    assert_eq!(serde_json::to_string(step).unwrap(), format!("\"{}\"", step.as_str()));
  }
  assert!("core_belief".parse::<StepId>().is_err());
}
