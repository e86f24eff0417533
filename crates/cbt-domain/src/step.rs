// step.rs
//
// Identificadores de paso del diario y aritmética de navegación sobre el
// orden fijo. No hay I/O ni estados de error: todas las funciones son
// totales.
use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identificador de un paso del diario, más el pseudo-estado terminal
/// `Complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepId {
  Situation,
  Emotions,
  Thoughts,
  CoreBelief,
  ChallengeQuestions,
  RationalThoughts,
  SchemaModes,
  Actions,
  FinalEmotions,
  Complete,
}

/// Orden canónico de los pasos reales (sin `Complete`).
pub const STEP_ORDER: [StepId; 9] = [StepId::Situation,
                                     StepId::Emotions,
                                     StepId::Thoughts,
                                     StepId::CoreBelief,
                                     StepId::ChallengeQuestions,
                                     StepId::RationalThoughts,
                                     StepId::SchemaModes,
                                     StepId::Actions,
                                     StepId::FinalEmotions];

pub const TOTAL_STEPS: usize = STEP_ORDER.len();

impl StepId {
  pub fn as_str(&self) -> &'static str {
    match self {
      StepId::Situation => "situation",
      StepId::Emotions => "emotions",
      StepId::Thoughts => "thoughts",
      StepId::CoreBelief => "core-belief",
      StepId::ChallengeQuestions => "challenge-questions",
      StepId::RationalThoughts => "rational-thoughts",
      StepId::SchemaModes => "schema-modes",
      StepId::Actions => "actions",
      StepId::FinalEmotions => "final-emotions",
      StepId::Complete => "complete",
    }
  }

  pub fn first() -> StepId {
    STEP_ORDER[0]
  }

  pub fn last() -> StepId {
    STEP_ORDER[TOTAL_STEPS - 1]
  }

  pub fn is_complete(&self) -> bool {
    matches!(self, StepId::Complete)
  }

  fn index(&self) -> Option<usize> {
    STEP_ORDER.iter().position(|s| s == self)
  }
}

impl fmt::Display for StepId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for StepId {
  type Err = DomainError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = s.trim().to_lowercase();
    STEP_ORDER.iter()
              .chain(std::iter::once(&StepId::Complete))
              .find(|step| step.as_str() == wanted)
              .copied()
              .ok_or(DomainError::UnknownStep(s.to_string()))
  }
}

/// Paso siguiente a `step`; `Complete` si `step` es el último (o ya es
/// `Complete`).
pub fn next(step: StepId) -> StepId {
  match step.index() {
    Some(i) if i + 1 < TOTAL_STEPS => STEP_ORDER[i + 1],
    _ => StepId::Complete,
  }
}

/// Paso anterior a `step`. `None` para el primer paso; desde `Complete`
/// devuelve el último paso real.
pub fn previous(step: StepId) -> Option<StepId> {
  match step.index() {
    Some(0) => None,
    Some(i) => Some(STEP_ORDER[i - 1]),
    None => Some(StepId::last()),
  }
}

/// Posición 1-indexada. `Complete` queda numerado uno después del último.
pub fn position(step: StepId) -> usize {
  step.index().map(|i| i + 1).unwrap_or(TOTAL_STEPS + 1)
}
