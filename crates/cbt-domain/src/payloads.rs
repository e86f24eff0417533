// payloads.rs
use crate::StepId;
use serde::{Deserialize, Serialize};

/// Descripción de la situación que disparó la entrada del diario.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SituationData {
  pub situation: String,
  pub date: String,
}

/// Intensidades emocionales en escala 0-10.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmotionData {
  pub fear: u8,
  pub anger: u8,
  pub sadness: u8,
  pub shame: u8,
  pub guilt: u8,
  pub joy: u8,
  pub anxiety: u8,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub other: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub other_intensity: Option<u8>,
}

impl EmotionData {
  pub fn ratings(&self) -> [u8; 7] {
    [self.fear, self.anger, self.sadness, self.shame, self.guilt, self.joy, self.anxiety]
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThoughtData {
  pub thought: String,
  pub credibility: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoreBeliefData {
  pub belief: String,
  pub credibility: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChallengeData {
  pub question: String,
  pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RationalThoughtData {
  pub thought: String,
  pub confidence: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaModeData {
  pub id: String,
  pub name: String,
  pub description: String,
  pub selected: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub intensity: Option<u8>,
}

/// Plan de acción: emociones re-evaluadas y conducta alternativa.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActionPlanData {
  pub final_emotions: EmotionData,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub new_behavior: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub alternative_response: Option<String>,
}

/// Contenido de un paso. La variante decide el slot que se escribe en
/// `SessionData`; no se valida contra el `StepId` de la acción.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", content = "data", rename_all = "kebab-case")]
pub enum StepPayload {
  Situation(SituationData),
  Emotions(EmotionData),
  Thoughts(Vec<ThoughtData>),
  CoreBelief(CoreBeliefData),
  ChallengeQuestions(Vec<ChallengeData>),
  RationalThoughts(Vec<RationalThoughtData>),
  SchemaModes(Vec<SchemaModeData>),
  Actions(ActionPlanData),
  FinalEmotions(EmotionData),
}

impl StepPayload {
  /// Paso al que pertenece el slot de este contenido.
  pub fn step(&self) -> StepId {
    match self {
      StepPayload::Situation(_) => StepId::Situation,
      StepPayload::Emotions(_) => StepId::Emotions,
      StepPayload::Thoughts(_) => StepId::Thoughts,
      StepPayload::CoreBelief(_) => StepId::CoreBelief,
      StepPayload::ChallengeQuestions(_) => StepId::ChallengeQuestions,
      StepPayload::RationalThoughts(_) => StepId::RationalThoughts,
      StepPayload::SchemaModes(_) => StepId::SchemaModes,
      StepPayload::Actions(_) => StepId::Actions,
      StepPayload::FinalEmotions(_) => StepId::FinalEmotions,
    }
  }
}
