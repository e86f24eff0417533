// Archivo: progress.rs
use crate::state::FlowState;
use cbt_domain::{position, TOTAL_STEPS};
use serde::{Deserialize, Serialize};

/// Resumen de progreso para la capa de UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub current_step_number: usize,
    pub total_steps: usize,
    pub completed_count: usize,
    pub is_complete: bool,
}

impl Progress {
    pub fn of(state: &FlowState) -> Self {
        Progress { current_step_number: position(state.current_step),
                   total_steps: TOTAL_STEPS,
                   completed_count: state.completed_steps.len(),
                   is_complete: state.is_complete() }
    }

    /// Porcentaje de pasos completados (0-100).
    pub fn percentage(&self) -> u8 {
        if self.total_steps == 0 {
            return 0;
        }
        let pct = self.completed_count.min(self.total_steps) * 100 / self.total_steps;
        pct as u8
    }
}
