// content.rs
//
// Predicado de "contenido significativo" usado para detectar el punto de
// reanudación de un borrador. Reglas por tipo de campo:
// - texto: no vacío tras `trim`
// - listas: al menos un elemento con contenido
// - `Option`: `Some` de un valor con contenido
// - números: siempre cuentan (un 0 es una valoración real)
// - bool: sólo `true`
// Las estructuras con contenido son las que tienen al menos un campo con
// contenido, salvo `EmotionData`: una pizarra con todo a 0 es lo que emite
// un formulario de sliders sin tocar y no cuenta.
use crate::payloads::{ActionPlanData, ChallengeData, CoreBeliefData, EmotionData, RationalThoughtData, SchemaModeData,
                      SituationData, ThoughtData};

pub trait MeaningfulContent {
  fn has_content(&self) -> bool;
}

impl MeaningfulContent for String {
  fn has_content(&self) -> bool {
    !self.trim().is_empty()
  }
}

impl MeaningfulContent for u8 {
  fn has_content(&self) -> bool {
    true
  }
}

impl MeaningfulContent for bool {
  fn has_content(&self) -> bool {
    *self
  }
}

impl<T: MeaningfulContent> MeaningfulContent for Option<T> {
  fn has_content(&self) -> bool {
    self.as_ref().is_some_and(|v| v.has_content())
  }
}

impl<T: MeaningfulContent> MeaningfulContent for Vec<T> {
  fn has_content(&self) -> bool {
    self.iter().any(|v| v.has_content())
  }
}

impl MeaningfulContent for SituationData {
  fn has_content(&self) -> bool {
    self.situation.has_content() || self.date.has_content()
  }
}

impl MeaningfulContent for EmotionData {
  fn has_content(&self) -> bool {
    self.ratings().iter().any(|r| *r > 0) || self.other.has_content()
  }
}

// En las estructuras con texto y valoración sólo el texto decide: la
// valoración siempre tiene un valor por defecto.
impl MeaningfulContent for ThoughtData {
  fn has_content(&self) -> bool {
    self.thought.has_content()
  }
}

impl MeaningfulContent for CoreBeliefData {
  fn has_content(&self) -> bool {
    self.belief.has_content()
  }
}

impl MeaningfulContent for ChallengeData {
  fn has_content(&self) -> bool {
    self.question.has_content() || self.answer.has_content()
  }
}

impl MeaningfulContent for RationalThoughtData {
  fn has_content(&self) -> bool {
    self.thought.has_content()
  }
}

impl MeaningfulContent for SchemaModeData {
  fn has_content(&self) -> bool {
    self.selected
  }
}

impl MeaningfulContent for ActionPlanData {
  fn has_content(&self) -> bool {
    self.final_emotions.has_content() || self.new_behavior.has_content() || self.alternative_response.has_content()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn zero_rating_counts_but_blank_emotions_do_not() {
    let blank = EmotionData::default();
    assert!(!blank.has_content());
    let rated = EmotionData { sadness: 3, ..Default::default() };
    assert!(rated.has_content());
    assert!(0u8.has_content());
  }

  #[test]
  fn whitespace_only_text_is_empty() {
    assert!(!"   ".to_string().has_content());
    assert!(!ThoughtData { thought: " ".into(), credibility: 0 }.has_content());
    assert!(ThoughtData { thought: "I always fail".into(), credibility: 0 }.has_content());
  }

  #[test]
  fn schema_modes_need_a_selection() {
    let modes = vec![SchemaModeData { id: "vulnerable-child".into(),
                                      name: "Vulnerable Child".into(),
                                      description: "feels lonely".into(),
                                      selected: false,
                                      intensity: None }];
    assert!(!modes.has_content());
    let mut selected = modes.clone();
    selected[0].selected = true;
    assert!(selected.has_content());
  }
}
