// Archivo: resume.rs
// Propósito: calcular el punto de reanudación de un borrador hidratado.
use cbt_domain::{SessionData, StepId, STEP_ORDER};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Paso en el que se reanuda y pasos que cuentan como completados.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartingPoint {
    pub start_step: StepId,
    pub completed_steps: BTreeSet<StepId>,
}

/// Recorre los pasos en orden marcando como completado cada paso con
/// contenido significativo y se detiene en el primero que no lo tiene.
///
/// Sólo cuenta el prefijo contiguo: contenido suelto en un paso posterior
/// no se marca. Si todos los pasos tienen contenido, se reanuda en el
/// último paso real (no en `Complete`, que descartaría el borrador).
pub fn compute_starting_step(data: &SessionData) -> StartingPoint {
    let mut completed_steps = BTreeSet::new();
    for step in STEP_ORDER {
        if !data.slot_has_content(step) {
            return StartingPoint { start_step: step, completed_steps };
        }
        completed_steps.insert(step);
    }
    StartingPoint { start_step: StepId::last(), completed_steps }
}
