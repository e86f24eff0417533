// Archivo: errors.rs
// Propósito: definir los errores del motor de flujo y el alias Result<T>.
// El reductor en sí no falla; estos errores sólo aparecen al compartir el
// estado entre hilos.
use thiserror::Error;
/// Errores del motor de flujo.
///
/// - `Poisoned`: el mutex del estado quedó envenenado por un pánico previo.
/// - `Other`: cualquier otro error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
  /// Estado inaccesible (mutex envenenado).
  #[error("Estado inaccesible: {0}")]
  Poisoned(String),
  /// Otro tipo de error.
  #[error("Otro: {0}")]
  Other(String),
}
/// Alias de resultado usado por las APIs del crate.
pub type Result<T> = std::result::Result<T, FlowError>;
