// Archivo: action.rs
use crate::resume::StartingPoint;
use cbt_domain::{SessionDataPatch, StepId, StepPayload};

/// Acciones que acepta el reductor. Suma cerrada: `reduce` las trata con un
/// `match` exhaustivo.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowAction {
    /// Salto incondicional a cualquier paso (incluido `Complete`).
    GoToStep(StepId),
    GoNext,
    GoPrevious,
    /// Escritura en sitio (autosave): no mueve `current_step` ni marca el
    /// paso como completado.
    UpdateStep { step: StepId, data: StepPayload },
    /// Misma escritura que `UpdateStep`, marca `step` como completado y
    /// avanza a `next(step)`.
    CompleteStep { step: StepId, data: StepPayload },
    /// Reconciliación con datos externos llegados tras el montaje.
    SyncData(SessionDataPatch),
    /// Restaura la posición calculada al hidratar un borrador.
    Resume(StartingPoint),
    SetSaving(bool),
    SetError(Option<String>),
    Reset,
}

impl FlowAction {
    /// Acciones que modifican datos del usuario.
    pub fn is_mutation(&self) -> bool {
        matches!(self, FlowAction::UpdateStep { .. } | FlowAction::CompleteStep { .. })
    }
}
