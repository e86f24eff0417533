// Archivo: reducer.rs
// Propósito: transiciones puras del flujo. Todo el I/O (persistencia,
// callbacks remotos) vive en la capa de orquestación.
use crate::action::FlowAction;
use crate::state::FlowState;
use cbt_domain::{next, previous, SessionData, StepPayload};
use chrono::{DateTime, Utc};

/// Aplica `action` sobre `state` y devuelve el nuevo estado.
///
/// `now` es el instante usado para avanzar `last_modified`; se inyecta para
/// mantener la función libre de efectos.
pub fn reduce(mut state: FlowState, action: FlowAction, now: DateTime<Utc>) -> FlowState {
    match action {
        FlowAction::GoToStep(target) => {
            state.current_step = target;
        }
        FlowAction::GoNext => {
            if !state.current_step.is_complete() {
                state.current_step = next(state.current_step);
            }
        }
        FlowAction::GoPrevious => {
            if let Some(prev) = previous(state.current_step) {
                state.current_step = prev;
            }
        }
        FlowAction::UpdateStep { step: _, data } => {
            write_slot(&mut state.session_data, data, now);
        }
        FlowAction::CompleteStep { step, data } => {
            write_slot(&mut state.session_data, data, now);
            if !step.is_complete() {
                state.completed_steps.insert(step);
            }
            state.current_step = next(step);
        }
        FlowAction::SyncData(patch) => {
            state.session_data.merge(patch);
        }
        FlowAction::Resume(point) => {
            state.current_step = point.start_step;
            state.completed_steps = point.completed_steps;
        }
        FlowAction::SetSaving(saving) => {
            state.is_saving = saving;
        }
        FlowAction::SetError(message) => {
            state.error = message;
        }
        FlowAction::Reset => {
            let mut fresh = SessionData::empty(state.session_data.last_modified);
            fresh.touch(now);
            state = FlowState::starting_with(fresh);
        }
    }
    state
}

fn write_slot(data: &mut SessionData, payload: StepPayload, now: DateTime<Utc>) {
    data.write(payload);
    data.touch(now);
}
