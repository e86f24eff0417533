use serde::{Deserialize, Serialize};

/// Estado de la migración en un solo sentido del borrador heredado en texto
/// plano al sobre cifrado.
///
/// - `NotMigrated`: no se cargó ningún borrador heredado.
/// - `Pending`: se hidrató un borrador heredado; la próxima mutación debe
///   forzar el re-guardado cifrado.
/// - `Migrated`: el sobre cifrado ya se escribió; el formato heredado no se
///   vuelve a escribir.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationState {
  #[default]
  NotMigrated,
  Pending,
  Migrated,
}

impl MigrationState {
  pub fn is_pending(&self) -> bool {
    matches!(self, MigrationState::Pending)
  }

  /// Transición tras un guardado cifrado exitoso.
  pub fn resolved(self) -> MigrationState {
    match self {
      MigrationState::Pending => MigrationState::Migrated,
      other => other,
    }
  }
}
