use cbt_persistence::LoadError;
use thiserror::Error;

// Errores de la capa de orquestación.
//
// Todas las fuentes de error están en un borde de I/O: el reductor no
// falla. `Remote` es el error de guardado recuperable (el estado local se
// conserva); `Hydration` es el borrador ilegible.
#[derive(Error, Debug)]
pub enum WorkflowError {
  /// El callback remoto `on_change`/`on_complete` rechazó el guardado.
  #[error("Error al guardar: {0}")]
  Remote(String),

  /// El borrador almacenado no se pudo leer (clave rotada, corrupción).
  #[error("Error de hidratación: {0}")]
  Hydration(#[from] LoadError),

  /// Errores originados por el motor de flujo.
  #[error("Error de flujo: {0}")]
  Flow(#[from] flow::FlowError),

  /// Errores del dominio del diario.
  #[error("Error de dominio: {0}")]
  Domain(#[from] cbt_domain::DomainError),

  /// Errores de persistencia propagados (el guardado normal es best-effort
  /// y no llega aquí).
  #[error("Error de persistencia: {0}")]
  Persistence(#[from] cbt_persistence::PersistenceError),

  /// Error generico: captura otros tipos de errores no tipados.
  #[error("Otro error: {0}")]
  Other(String),
}

pub type Result<T> = std::result::Result<T, WorkflowError>;
