use cbt_domain::{EmotionData, SituationData, StepId, StepPayload, ThoughtData};
use flow::{compute_starting_step, reduce, FlowAction, FlowEngine, FlowState};
use chrono::Utc;

fn main() -> Result<(), flow::FlowError> {
    // Motor con estado compartido
    let engine = FlowEngine::new();
    let situation = SituationData { situation: "Discusión en el trabajo".into(), date: "2024-05-02".into() };
    engine.dispatch(FlowAction::UpdateStep { step: StepId::Situation,
                                             data: StepPayload::Situation(situation.clone()) })?;
    let state = engine.dispatch(FlowAction::CompleteStep { step: StepId::Situation,
                                                           data: StepPayload::Situation(situation) })?;
    println!("paso actual: {} / completados: {:?}", state.current_step, state.completed_steps);

    let state = engine.dispatch(FlowAction::CompleteStep { step: StepId::Emotions,
                                                           data: StepPayload::Emotions(EmotionData { anger: 7,
                                                                                                     ..Default::default() }) })?;
    let progress = engine.progress()?;
    println!("progreso: {}/{} ({}%)", progress.completed_count, progress.total_steps, progress.percentage());

    // Reductor puro: el reloj se pasa explícito
    let detached = reduce(FlowState::initial(),
                          FlowAction::UpdateStep { step: StepId::Thoughts,
                                                   data: StepPayload::Thoughts(vec![ThoughtData { thought: "Siempre me equivoco".into(),
                                                                                                  credibility: 70 }]) },
                          Utc::now());
    // Sin situación: el punto de reanudación es el primer paso
    println!("reanudar en: {}", compute_starting_step(&detached.session_data).start_step);

    // El borrador guardado de `state` se reanudaría tras el prefijo completo
    let point = compute_starting_step(&state.session_data);
    println!("reanudar borrador en: {} ({} pasos)", point.start_step, point.completed_steps.len());
    println!("{}", serde_json::to_string_pretty(&state).unwrap_or_default());
    Ok(())
}
