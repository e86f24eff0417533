// hydration.rs
//
// Secuencia de arranque: carga el borrador una sola vez por montaje y
// publica el resultado. La aplicación del borrador al reductor la hace
// `DiaryFlow`, que consulta `is_mounted` antes de despachar.
//
// Estados:
//   NotHydrated -> (skip) -> Hydrated(Skipped)
//   NotHydrated -> Loading -> Hydrated(NoDraft | Applied | Merged | Superseded | Failed | Cancelled)
use cbt_domain::StepId;
use cbt_persistence::{LoadError, LoadedDraft, PersistenceGateway};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Resultado final de la hidratación.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HydrationOutcome {
  /// El usuario eligió empezar de cero; no se leyó el almacén.
  Skipped,
  NoDraft,
  /// Borrador aplicado; la sesión se reanuda en `start_step`.
  Applied { start_step: StepId, needs_migration: bool },
  /// El usuario editó antes de que terminara la lectura: sus slots se
  /// conservan y el borrador sólo rellena los que seguían vacíos.
  Merged { start_step: StepId, needs_migration: bool },
  /// El mismo borrador ya se había reconciliado; no se volvió a aplicar.
  Superseded,
  /// Borrador ilegible. La sesión queda vacía.
  Failed { message: String },
  /// El flujo se desmontó antes de terminar; no se despachó nada.
  Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HydrationStatus {
  NotHydrated,
  Loading,
  Hydrated { outcome: HydrationOutcome },
}

pub struct HydrationController {
  gateway: Arc<PersistenceGateway>,
  status: Mutex<HydrationStatus>,
  mounted: AtomicBool,
}

impl HydrationController {
  pub fn new(gateway: Arc<PersistenceGateway>) -> Self {
    Self { gateway, status: Mutex::new(HydrationStatus::NotHydrated), mounted: AtomicBool::new(true) }
  }

  pub fn status(&self) -> HydrationStatus {
    self.status.lock().unwrap_or_else(|e| e.into_inner()).clone()
  }

  pub fn is_hydrated(&self) -> bool {
    matches!(self.status(), HydrationStatus::Hydrated { .. })
  }

  /// Mensaje de error de hidratación, si el borrador no se pudo leer.
  pub fn hydration_error(&self) -> Option<String> {
    match self.status() {
      HydrationStatus::Hydrated { outcome: HydrationOutcome::Failed { message } } => Some(message),
      _ => None,
    }
  }

  pub fn is_mounted(&self) -> bool {
    self.mounted.load(Ordering::SeqCst)
  }

  /// Marca el flujo como desmontado: una lectura en curso termina, pero su
  /// resultado ya no se despacha.
  pub fn unmount(&self) {
    self.mounted.store(false, Ordering::SeqCst);
  }

  /// Acción "empezar de cero": sólo tiene efecto antes de iniciar la carga.
  pub fn skip(&self) -> bool {
    let mut status = self.status.lock().unwrap_or_else(|e| e.into_inner());
    if *status != HydrationStatus::NotHydrated {
      return false;
    }
    *status = HydrationStatus::Hydrated { outcome: HydrationOutcome::Skipped };
    true
  }

  /// Lee el borrador fuera del hilo del llamador. Devuelve `None` si la
  /// carga ya se inició (o se omitió) en este montaje.
  pub async fn load_once(&self) -> Option<Result<Option<LoadedDraft>, LoadError>> {
    {
      let mut status = self.status.lock().unwrap_or_else(|e| e.into_inner());
      if *status != HydrationStatus::NotHydrated {
        return None;
      }
      *status = HydrationStatus::Loading;
    }
    let gateway = self.gateway.clone();
    let loaded = match tokio::task::spawn_blocking(move || gateway.load()).await {
      Ok(res) => res,
      Err(e) => Err(LoadError::Storage(e.to_string())),
    };
    Some(loaded)
  }

  pub fn finish(&self, outcome: HydrationOutcome) {
    debug!("hidratación terminada: {:?}", outcome);
    *self.status.lock().unwrap_or_else(|e| e.into_inner()) = HydrationStatus::Hydrated { outcome };
  }
}
