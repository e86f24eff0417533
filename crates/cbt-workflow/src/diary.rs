// diary.rs
//
// Fachada del diario: la superficie pública que consume la capa de UI.
// Une `FlowEngine` (estado), `HydrationController` (arranque) y
// `ChangePropagator` (efectos posteriores a cada transición).
use crate::errors::{Result, WorkflowError};
use crate::hydration::{HydrationController, HydrationOutcome, HydrationStatus};
use crate::migration::MigrationState;
use crate::propagator::ChangePropagator;
use crate::remote::RemoteSink;
use cbt_domain::{never_persisted, SessionData, SessionDataPatch, StepId, StepPayload};
use cbt_persistence::{LoadedDraft, PersistenceGateway};
use chrono::{DateTime, Utc};
use flow::{compute_starting_step, FlowAction, FlowEngine, FlowState, Progress};
use log::{debug, warn};
use std::sync::{Arc, Mutex};

pub struct DiaryFlow {
  engine: FlowEngine,
  gateway: Arc<PersistenceGateway>,
  hydration: HydrationController,
  propagator: ChangePropagator,
  /// Último `last_modified` externo ya reconciliado con `SyncData`.
  last_synced: Mutex<Option<DateTime<Utc>>>,
}

impl DiaryFlow {
  /// Monta un flujo nuevo sobre `gateway`. La hidratación no empieza hasta
  /// llamar a `hydrate` (o se omite con `start_fresh`).
  pub fn new(gateway: Arc<PersistenceGateway>, remote: Arc<dyn RemoteSink>) -> Self {
    Self { engine: FlowEngine::new(),
           hydration: HydrationController::new(gateway.clone()),
           propagator: ChangePropagator::new(gateway.clone(), remote),
           gateway,
           last_synced: Mutex::new(None) }
  }

  // --- lectura -----------------------------------------------------------

  pub fn state(&self) -> Result<FlowState> {
    Ok(self.engine.state()?)
  }

  pub fn current_step(&self) -> Result<StepId> {
    Ok(self.engine.state()?.current_step)
  }

  pub fn session_data(&self) -> Result<SessionData> {
    Ok(self.engine.state()?.session_data)
  }

  pub fn progress(&self) -> Result<Progress> {
    Ok(self.engine.progress()?)
  }

  pub fn is_saving(&self) -> Result<bool> {
    Ok(self.engine.state()?.is_saving)
  }

  pub fn error(&self) -> Result<Option<String>> {
    Ok(self.engine.state()?.error)
  }

  pub fn hydration_error(&self) -> Option<String> {
    self.hydration.hydration_error()
  }

  pub fn is_hydrated(&self) -> bool {
    self.hydration.is_hydrated()
  }

  pub fn hydration_status(&self) -> HydrationStatus {
    self.hydration.status()
  }

  pub fn migration_state(&self) -> MigrationState {
    self.propagator.migration_state()
  }

  // --- hidratación -------------------------------------------------------

  /// Acción "empezar de cero": omite la lectura del borrador.
  pub fn start_fresh(&self) -> bool {
    self.hydration.skip()
  }

  /// Desmonta el flujo: una hidratación en curso ya no despachará.
  pub fn unmount(&self) {
    self.hydration.unmount();
  }

  /// Carga el borrador (una vez por montaje) y lo aplica al estado.
  ///
  /// Nunca devuelve el error de lectura: queda en `hydration_error` y la
  /// sesión sigue vacía.
  pub async fn hydrate(&self) -> Result<HydrationOutcome> {
    let loaded = match self.hydration.load_once().await {
      Some(loaded) => loaded,
      None => {
        return Ok(match self.hydration.status() {
          HydrationStatus::Hydrated { outcome } => outcome,
          _ => HydrationOutcome::Cancelled,
        })
      }
    };
    if !self.hydration.is_mounted() {
      debug!("flujo desmontado durante la hidratación; se descarta el resultado");
      self.hydration.finish(HydrationOutcome::Cancelled);
      return Ok(HydrationOutcome::Cancelled);
    }
    let outcome = match loaded {
      Ok(None) => HydrationOutcome::NoDraft,
      Ok(Some(draft)) => self.apply_draft(draft)?,
      Err(e) => {
        warn!("borrador ilegible: {}", e);
        HydrationOutcome::Failed { message: e.to_string() }
      }
    };
    self.hydration.finish(outcome.clone());
    Ok(outcome)
  }

  fn apply_draft(&self, draft: LoadedDraft) -> Result<HydrationOutcome> {
    let draft_ts = draft.data.last_modified;
    if !self.sync_gate(Some(draft_ts)) {
      return Ok(HydrationOutcome::Superseded);
    }
    let local = self.engine.state()?.session_data;
    let edited_first = local.last_modified > never_persisted() && local.last_modified > draft_ts;
    let patch = if edited_first {
      debug!("el usuario editó durante la hidratación; el borrador sólo rellena slots vacíos");
      local.missing_from(&draft.data)
    } else {
      draft.data.to_patch()
    };
    let synced = self.engine.dispatch(FlowAction::SyncData(patch))?;
    let point = compute_starting_step(&synced.session_data);
    let start_step = point.start_step;
    let resumed = self.engine.dispatch(FlowAction::Resume(point))?;
    if draft.needs_migration {
      self.propagator.mark_migration_pending();
    }
    if edited_first {
      // el autosave de la edición ya pisó el borrador: se reescribe fusionado
      self.propagator.persist_now(&resumed.session_data);
      return Ok(HydrationOutcome::Merged { start_step, needs_migration: draft.needs_migration });
    }
    self.propagator.mark_persisted(resumed.session_data.last_modified);
    Ok(HydrationOutcome::Applied { start_step, needs_migration: draft.needs_migration })
  }

  /// Reconciliación de datos externos que llegan tras el montaje. Se aplica
  /// como mucho una vez por `last_modified` entrante, y nunca si ese
  /// `last_modified` es anterior a la sesión local ya editada. Devuelve
  /// `true` si se despachó `SyncData`.
  pub fn sync_external(&self, patch: SessionDataPatch) -> Result<bool> {
    if let Some(incoming) = patch.last_modified {
      let local = self.engine.state()?.session_data.last_modified;
      if local > never_persisted() && incoming < local {
        warn!("sync externo descartado: {} es anterior a la sesión local ({})", incoming, local);
        return Ok(false);
      }
    }
    if !self.sync_gate(patch.last_modified) {
      debug!("sync externo ignorado: timestamp ya reconciliado");
      return Ok(false);
    }
    let state = self.engine.dispatch(FlowAction::SyncData(patch))?;
    self.propagator.settle(&state, false);
    Ok(true)
  }

  fn sync_gate(&self, incoming: Option<DateTime<Utc>>) -> bool {
    let mut seen = self.last_synced.lock().unwrap_or_else(|e| e.into_inner());
    match incoming {
      Some(ts) if *seen == Some(ts) => false,
      Some(ts) => {
        *seen = Some(ts);
        true
      }
      None => true,
    }
  }

  // --- navegación --------------------------------------------------------

  pub fn go_next(&self) -> Result<FlowState> {
    self.navigate(FlowAction::GoNext)
  }

  pub fn go_previous(&self) -> Result<FlowState> {
    self.navigate(FlowAction::GoPrevious)
  }

  pub fn go_to_step(&self, step: StepId) -> Result<FlowState> {
    self.navigate(FlowAction::GoToStep(step))
  }

  fn navigate(&self, action: FlowAction) -> Result<FlowState> {
    let state = self.engine.dispatch(action)?;
    self.propagator.settle(&state, false);
    Ok(state)
  }

  // --- edición -----------------------------------------------------------

  /// Autosave en sitio: escribe el slot sin avanzar ni marcar completado.
  pub async fn update_step(&self, step: StepId, data: StepPayload) -> Result<FlowState> {
    let state = self.engine.dispatch(FlowAction::UpdateStep { step, data })?;
    self.propagator.settle(&state, true);
    self.propagator.push_remote(&self.engine, state.session_data.clone()).await?;
    Ok(self.engine.state()?)
  }

  /// Escribe el slot, marca el paso como completado y avanza. Al llegar al
  /// estado terminal se elimina el borrador local y se notifica
  /// `on_complete`, también cuando `on_change` falló; si `on_complete`
  /// falla, el borrador se conserva.
  pub async fn complete_step(&self, step: StepId, data: StepPayload) -> Result<FlowState> {
    let state = self.engine.dispatch(FlowAction::CompleteStep { step, data })?;
    self.propagator.settle(&state, true);
    let pushed = self.propagator.push_remote(&self.engine, state.session_data.clone()).await;
    if !state.is_complete() {
      pushed?;
      return Ok(self.engine.state()?);
    }
    // la sesión final se entrega aunque `on_change` haya fallado
    let completed = self.propagator.push_complete(&self.engine, state.session_data.clone()).await;
    match (pushed, completed) {
      (Err(WorkflowError::Remote(change)), Err(WorkflowError::Remote(complete))) => {
        let message = format!("{}; {}", change, complete);
        self.engine.dispatch(FlowAction::SetError(Some(message.clone())))?;
        return Err(WorkflowError::Remote(message));
      }
      (Err(e), _) | (Ok(()), Err(e)) => return Err(e),
      (Ok(()), Ok(())) => {}
    }
    Ok(self.engine.state()?)
  }

  // --- reset / errores ---------------------------------------------------

  /// Vuelve al primer paso con una sesión vacía y elimina el borrador
  /// persistido.
  pub fn reset(&self) -> Result<FlowState> {
    let state = self.engine.dispatch(FlowAction::Reset)?;
    self.gateway.clear();
    self.propagator.reset(state.session_data.last_modified);
    *self.last_synced.lock().unwrap_or_else(|e| e.into_inner()) = None;
    Ok(state)
  }

  /// Salida del error de hidratación: descarta el borrador ilegible y
  /// reinicia limpio.
  pub fn discard_draft_and_restart(&self) -> Result<FlowState> {
    let state = self.reset()?;
    self.hydration.finish(HydrationOutcome::NoDraft);
    Ok(state)
  }

  pub fn clear_error(&self) -> Result<()> {
    self.engine.dispatch(FlowAction::SetError(None))?;
    Ok(())
  }
}
