// Archivo: engine.rs
// Propósito: envolver el reductor puro en un estado compartido.
//
// Nota: El motor sólo serializa despachos; cada despacho corre completo
// antes del siguiente. La persistencia y los callbacks remotos quedan en
// la capa de orquestación (`cbt-workflow`).
use crate::action::FlowAction;
use crate::errors::{FlowError, Result};
use crate::progress::Progress;
use crate::reducer::reduce;
use crate::state::FlowState;
use chrono::Utc;
use std::sync::{Mutex, MutexGuard};

/// Motor del flujo: estado protegido por mutex y despacho síncrono.
///
/// Nota sobre concurrencia:
/// - El mutex nunca se mantiene a través de un `.await`; los llamadores
///   asíncronos obtienen una copia del estado tras cada despacho.
pub struct FlowEngine {
    state: Mutex<FlowState>,
}

impl FlowEngine {
    /// Crea el motor en el estado inicial.
    pub fn new() -> Self {
        Self::with_state(FlowState::initial())
    }

    /// Crea el motor a partir de un estado ya construido.
    pub fn with_state(state: FlowState) -> Self {
        Self { state: Mutex::new(state) }
    }

    fn lock(&self) -> Result<MutexGuard<'_, FlowState>> {
        self.state.lock().map_err(|e| FlowError::Poisoned(format!("mutex poisoned: {:?}", e)))
    }

    /// Aplica `action` con el reloj actual y devuelve una copia del estado
    /// resultante.
    pub fn dispatch(&self, action: FlowAction) -> Result<FlowState> {
        let mut guard = self.lock()?;
        let current = std::mem::take(&mut *guard);
        *guard = reduce(current, action, Utc::now());
        Ok(guard.clone())
    }

    /// Copia del estado actual.
    pub fn state(&self) -> Result<FlowState> {
        Ok(self.lock()?.clone())
    }

    pub fn progress(&self) -> Result<Progress> {
        Ok(Progress::of(&*self.lock()?))
    }
}

impl Default for FlowEngine {
    fn default() -> Self {
        Self::new()
    }
}
