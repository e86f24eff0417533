// session_data.rs
use crate::content::MeaningfulContent;
use crate::payloads::{ActionPlanData, ChallengeData, CoreBeliefData, EmotionData, RationalThoughtData, SchemaModeData,
                      SituationData, StepPayload, ThoughtData};
use crate::StepId;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Marca temporal centinela "nunca persistido".
pub fn never_persisted() -> DateTime<Utc> {
  DateTime::<Utc>::UNIX_EPOCH
}

/// Borradores heredados escriben `"thoughts": null` para la lista vacía.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
  where D: Deserializer<'de>,
        T: Deserialize<'de>
{
  Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Agregado de la sesión: un slot opcional por paso más `last_modified`.
///
/// `thoughts` es una lista (vacía equivale a "sin escribir"); el resto de
/// slots son `None` hasta que se escriben. `last_modified` nunca decrece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
  #[serde(default)]
  pub situation: Option<SituationData>,
  #[serde(default)]
  pub emotions: Option<EmotionData>,
  #[serde(default, deserialize_with = "null_as_empty")]
  pub thoughts: Vec<ThoughtData>,
  #[serde(default)]
  pub core_belief: Option<CoreBeliefData>,
  #[serde(default)]
  pub challenge_questions: Option<Vec<ChallengeData>>,
  #[serde(default)]
  pub rational_thoughts: Option<Vec<RationalThoughtData>>,
  #[serde(default)]
  pub schema_modes: Option<Vec<SchemaModeData>>,
  #[serde(default)]
  pub action_plan: Option<ActionPlanData>,
  #[serde(default)]
  pub final_emotions: Option<EmotionData>,
  #[serde(default = "never_persisted")]
  pub last_modified: DateTime<Utc>,
}

impl Default for SessionData {
  fn default() -> Self {
    SessionData::empty(never_persisted())
  }
}

impl SessionData {
  /// Sesión vacía con el `last_modified` indicado.
  pub fn empty(last_modified: DateTime<Utc>) -> Self {
    SessionData { situation: None,
                  emotions: None,
                  thoughts: Vec::new(),
                  core_belief: None,
                  challenge_questions: None,
                  rational_thoughts: None,
                  schema_modes: None,
                  action_plan: None,
                  final_emotions: None,
                  last_modified }
  }

  /// Avanza `last_modified` de forma estrictamente creciente: toma `now`
  /// salvo que no supere el valor previo, en cuyo caso suma 1 ms.
  pub fn touch(&mut self, now: DateTime<Utc>) {
    let floor = self.last_modified + Duration::milliseconds(1);
    self.last_modified = if now >= floor { now } else { floor };
  }

  /// Sobrescribe el slot que corresponde a `payload` (reemplazo completo,
  /// sin merge profundo). No toca `last_modified`.
  pub fn write(&mut self, payload: StepPayload) {
    match payload {
      StepPayload::Situation(d) => self.situation = Some(d),
      StepPayload::Emotions(d) => self.emotions = Some(d),
      StepPayload::Thoughts(d) => self.thoughts = d,
      StepPayload::CoreBelief(d) => self.core_belief = Some(d),
      StepPayload::ChallengeQuestions(d) => self.challenge_questions = Some(d),
      StepPayload::RationalThoughts(d) => self.rational_thoughts = Some(d),
      StepPayload::SchemaModes(d) => self.schema_modes = Some(d),
      StepPayload::Actions(d) => self.action_plan = Some(d),
      StepPayload::FinalEmotions(d) => self.final_emotions = Some(d),
    }
  }

  /// Indica si el slot del paso tiene contenido significativo. `Complete`
  /// no tiene slot.
  pub fn slot_has_content(&self, step: StepId) -> bool {
    match step {
      StepId::Situation => self.situation.has_content(),
      StepId::Emotions => self.emotions.has_content(),
      StepId::Thoughts => self.thoughts.has_content(),
      StepId::CoreBelief => self.core_belief.has_content(),
      StepId::ChallengeQuestions => self.challenge_questions.has_content(),
      StepId::RationalThoughts => self.rational_thoughts.has_content(),
      StepId::SchemaModes => self.schema_modes.has_content(),
      StepId::Actions => self.action_plan.has_content(),
      StepId::FinalEmotions => self.final_emotions.has_content(),
      StepId::Complete => false,
    }
  }

  /// Verdadero si ningún slot tiene contenido.
  pub fn is_blank(&self) -> bool {
    !crate::STEP_ORDER.iter().any(|s| self.slot_has_content(*s))
  }

  /// Parche con todos los campos de esta sesión (incluido el timestamp).
  pub fn to_patch(&self) -> SessionDataPatch {
    SessionDataPatch { situation: self.situation.clone(),
                       emotions: self.emotions.clone(),
                       thoughts: Some(self.thoughts.clone()),
                       core_belief: self.core_belief.clone(),
                       challenge_questions: self.challenge_questions.clone(),
                       rational_thoughts: self.rational_thoughts.clone(),
                       schema_modes: self.schema_modes.clone(),
                       action_plan: self.action_plan.clone(),
                       final_emotions: self.final_emotions.clone(),
                       last_modified: Some(self.last_modified) }
  }

  /// Parche con los slots de `other` que tienen contenido allí y están
  /// vacíos aquí. No incluye `last_modified`: los slots propios no se tocan.
  pub fn missing_from(&self, other: &SessionData) -> SessionDataPatch {
    let take = |step: StepId| !self.slot_has_content(step) && other.slot_has_content(step);
    SessionDataPatch { situation: other.situation.clone().filter(|_| take(StepId::Situation)),
                       emotions: other.emotions.clone().filter(|_| take(StepId::Emotions)),
                       thoughts: Some(other.thoughts.clone()).filter(|_| take(StepId::Thoughts)),
                       core_belief: other.core_belief.clone().filter(|_| take(StepId::CoreBelief)),
                       challenge_questions: other.challenge_questions
                                                 .clone()
                                                 .filter(|_| take(StepId::ChallengeQuestions)),
                       rational_thoughts: other.rational_thoughts.clone().filter(|_| take(StepId::RationalThoughts)),
                       schema_modes: other.schema_modes.clone().filter(|_| take(StepId::SchemaModes)),
                       action_plan: other.action_plan.clone().filter(|_| take(StepId::Actions)),
                       final_emotions: other.final_emotions.clone().filter(|_| take(StepId::FinalEmotions)),
                       last_modified: None }
  }

  /// Reconciliación con datos externos: sólo se sobrescriben los campos
  /// presentes en el parche. Si el parche trae `last_modified` se adopta
  /// sin permitir que el valor retroceda.
  pub fn merge(&mut self, patch: SessionDataPatch) {
    if let Some(d) = patch.situation {
      self.situation = Some(d);
    }
    if let Some(d) = patch.emotions {
      self.emotions = Some(d);
    }
    if let Some(d) = patch.thoughts {
      self.thoughts = d;
    }
    if let Some(d) = patch.core_belief {
      self.core_belief = Some(d);
    }
    if let Some(d) = patch.challenge_questions {
      self.challenge_questions = Some(d);
    }
    if let Some(d) = patch.rational_thoughts {
      self.rational_thoughts = Some(d);
    }
    if let Some(d) = patch.schema_modes {
      self.schema_modes = Some(d);
    }
    if let Some(d) = patch.action_plan {
      self.action_plan = Some(d);
    }
    if let Some(d) = patch.final_emotions {
      self.final_emotions = Some(d);
    }
    if let Some(ts) = patch.last_modified {
      self.last_modified = self.last_modified.max(ts);
    }
  }
}

/// Subconjunto de `SessionData` suministrado desde fuera (borrador
/// hidratado, datos remotos). Los campos ausentes no se tocan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionDataPatch {
  pub situation: Option<SituationData>,
  pub emotions: Option<EmotionData>,
  pub thoughts: Option<Vec<ThoughtData>>,
  pub core_belief: Option<CoreBeliefData>,
  pub challenge_questions: Option<Vec<ChallengeData>>,
  pub rational_thoughts: Option<Vec<RationalThoughtData>>,
  pub schema_modes: Option<Vec<SchemaModeData>>,
  pub action_plan: Option<ActionPlanData>,
  pub final_emotions: Option<EmotionData>,
  pub last_modified: Option<DateTime<Utc>>,
}
