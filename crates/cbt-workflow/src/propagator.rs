// propagator.rs
//
// Efectos posteriores a cada transición:
// - guardado local: un intento por cada valor distinto de `last_modified`,
//   desacoplado del guardado remoto;
// - guardado remoto: `on_change` con la instantánea completa. Con una
//   llamada en curso, las ediciones nuevas sólo reemplazan la instantánea
//   pendiente, de modo que la última edición es la que termina guardada;
// - estado terminal: se elimina el borrador local.
use crate::errors::{Result, WorkflowError};
use crate::migration::MigrationState;
use crate::remote::RemoteSink;
use cbt_domain::SessionData;
use cbt_persistence::PersistenceGateway;
use chrono::{DateTime, Utc};
use flow::{FlowAction, FlowEngine, FlowState};
use log::{info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct RemoteSlot {
  in_flight: bool,
  pending: Option<SessionData>,
}

pub struct ChangePropagator {
  gateway: Arc<PersistenceGateway>,
  remote: Arc<dyn RemoteSink>,
  /// Último `last_modified` para el que se intentó el guardado local.
  last_persisted: Mutex<Option<DateTime<Utc>>>,
  migration: Mutex<MigrationState>,
  remote_slot: Mutex<RemoteSlot>,
  /// `on_complete` falló: el borrador restaurado no se elimina hasta un
  /// reset o una confirmación posterior.
  completion_unconfirmed: AtomicBool,
}

impl ChangePropagator {
  pub fn new(gateway: Arc<PersistenceGateway>, remote: Arc<dyn RemoteSink>) -> Self {
    Self { gateway,
           remote,
           last_persisted: Mutex::new(None),
           migration: Mutex::new(MigrationState::NotMigrated),
           remote_slot: Mutex::new(RemoteSlot::default()),
           completion_unconfirmed: AtomicBool::new(false) }
  }

  pub fn migration_state(&self) -> MigrationState {
    *self.migration.lock().unwrap_or_else(|e| e.into_inner())
  }

  pub fn mark_migration_pending(&self) {
    *self.migration.lock().unwrap_or_else(|e| e.into_inner()) = MigrationState::Pending;
  }

  /// Registra `ts` como ya persistido (p. ej. el borrador recién hidratado)
  /// para que un montaje sin cambios no reescriba el almacén.
  pub fn mark_persisted(&self, ts: DateTime<Utc>) {
    *self.last_persisted.lock().unwrap_or_else(|e| e.into_inner()) = Some(ts);
  }

  /// Vuelve al estado de un flujo recién creado tras un reset.
  pub fn reset(&self, ts: DateTime<Utc>) {
    self.mark_persisted(ts);
    *self.migration.lock().unwrap_or_else(|e| e.into_inner()) = MigrationState::NotMigrated;
    self.remote_slot.lock().unwrap_or_else(|e| e.into_inner()).pending = None;
    self.completion_unconfirmed.store(false, Ordering::SeqCst);
  }

  pub fn completion_unconfirmed(&self) -> bool {
    self.completion_unconfirmed.load(Ordering::SeqCst)
  }

  /// Hook "on settle" tras cada transición. Con `mutation = true` y una
  /// migración pendiente, fuerza el guardado cifrado aunque el timestamp no
  /// haya cambiado. Devuelve `true` si se escribió el borrador.
  pub fn settle(&self, state: &FlowState, mutation: bool) -> bool {
    let ts = state.session_data.last_modified;
    if state.is_complete() {
      if self.completion_unconfirmed() {
        return false;
      }
      self.gateway.clear();
      self.mark_persisted(ts);
      return false;
    }
    let forced = mutation && self.migration_state().is_pending();
    {
      let last = self.last_persisted.lock().unwrap_or_else(|e| e.into_inner());
      if *last == Some(ts) && !forced {
        return false;
      }
    }
    self.persist_now(&state.session_data)
  }

  /// Escribe el borrador sin mirar el timestamp (p. ej. tras fusionar un
  /// borrador con ediciones locales que conservan su `last_modified`).
  /// Un guardado cifrado exitoso resuelve una migración pendiente.
  pub fn persist_now(&self, data: &SessionData) -> bool {
    self.mark_persisted(data.last_modified);
    let saved = self.gateway.save(data);
    if saved && self.migration_state().is_pending() {
      let mut migration = self.migration.lock().unwrap_or_else(|e| e.into_inner());
      *migration = migration.resolved();
      info!("borrador '{}' migrado al formato cifrado", self.gateway.storage_key());
    }
    saved
  }

  /// Envía `snapshot` al sink remoto con semántica "último gana".
  ///
  /// Si ya hay una llamada en curso, la instantánea queda pendiente y la
  /// llamada en curso la enviará al terminar; esta invocación devuelve
  /// `Ok(())` de inmediato. Un rechazo se guarda en `error` y se propaga,
  /// pero el estado local no se revierte.
  pub async fn push_remote(&self, engine: &FlowEngine, snapshot: SessionData) -> Result<()> {
    {
      let mut slot = self.remote_slot.lock().unwrap_or_else(|e| e.into_inner());
      if slot.in_flight {
        slot.pending = Some(snapshot);
        return Ok(());
      }
      slot.in_flight = true;
    }
    engine.dispatch(FlowAction::SetSaving(true))?;

    let mut current = snapshot;
    let outcome = loop {
      if let Err(e) = self.remote.on_change(&current).await {
        break Err(e);
      }
      let mut slot = self.remote_slot.lock().unwrap_or_else(|e| e.into_inner());
      match slot.pending.take() {
        Some(next) => current = next,
        None => {
          slot.in_flight = false;
          break Ok(());
        }
      }
    };

    match outcome {
      Ok(()) => {
        engine.dispatch(FlowAction::SetSaving(false))?;
        engine.dispatch(FlowAction::SetError(None))?;
        Ok(())
      }
      Err(e) => {
        {
          let mut slot = self.remote_slot.lock().unwrap_or_else(|e| e.into_inner());
          slot.in_flight = false;
          slot.pending = None;
        }
        let message = e.to_string();
        warn!("guardado remoto rechazado: {}", message);
        engine.dispatch(FlowAction::SetSaving(false))?;
        engine.dispatch(FlowAction::SetError(Some(message.clone())))?;
        Err(WorkflowError::Remote(message))
      }
    }
  }

  /// Notifica la sesión final. Si `on_complete` falla, el borrador local
  /// (ya eliminado al llegar al estado terminal) se vuelve a escribir para
  /// que la sesión terminada sobreviva a una recarga.
  pub async fn push_complete(&self, engine: &FlowEngine, data: SessionData) -> Result<()> {
    if let Err(e) = self.remote.on_complete(&data).await {
      let message = e.to_string();
      warn!("on_complete rechazado: {}; se conserva el borrador local", message);
      self.completion_unconfirmed.store(true, Ordering::SeqCst);
      self.persist_now(&data);
      engine.dispatch(FlowAction::SetError(Some(message.clone())))?;
      return Err(WorkflowError::Remote(message));
    }
    if self.completion_unconfirmed.swap(false, Ordering::SeqCst) {
      self.gateway.clear();
    }
    Ok(())
  }
}
