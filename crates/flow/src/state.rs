// Archivo: state.rs
use cbt_domain::{SessionData, StepId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Estado completo del flujo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowState {
    pub current_step: StepId,
    pub session_data: SessionData,
    pub completed_steps: BTreeSet<StepId>,
    pub is_saving: bool,
    pub error: Option<String>,
}

impl FlowState {
    /// Estado inicial: primer paso, sesión vacía con el centinela "nunca
    /// persistido".
    pub fn initial() -> Self {
        Self::starting_with(SessionData::default())
    }

    pub fn starting_with(session_data: SessionData) -> Self {
        FlowState { current_step: StepId::first(),
                    session_data,
                    completed_steps: BTreeSet::new(),
                    is_saving: false,
                    error: None }
    }

    pub fn is_complete(&self) -> bool {
        self.current_step.is_complete()
    }
}

impl Default for FlowState {
    fn default() -> Self {
        Self::initial()
    }
}
