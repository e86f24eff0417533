// Archivo: errors.rs
// Propósito: errores de la capa de persistencia del borrador.
use thiserror::Error;

/// Errores de la primitiva de cifrado.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
  /// No hay material de clave disponible.
  #[error("Clave de cifrado no disponible")]
  KeyUnavailable,
  #[error("Error al cifrar: {0}")]
  Encrypt(String),
  /// Clave incorrecta/rotada o texto cifrado corrupto.
  #[error("Error al descifrar: {0}")]
  Decrypt(String),
  #[error("Codificación inválida: {0}")]
  Encoding(String),
}

/// Errores de escritura/acceso al almacenamiento.
#[derive(Error, Debug)]
pub enum PersistenceError {
  /// El backend del almacén falló (cuota, almacenamiento deshabilitado, I/O).
  #[error("Error de almacenamiento: {0}")]
  Storage(String),
  #[error("Error de cifrado: {0}")]
  Crypto(#[from] CryptoError),
  #[error("Error de serialización: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl From<std::io::Error> for PersistenceError {
  fn from(e: std::io::Error) -> Self {
    PersistenceError::Storage(e.to_string())
  }
}

/// Resultado tipado y recuperable de `PersistenceGateway::load`. El llamador
/// decide si ofrece "descartar y empezar de nuevo".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
  /// El payload cifrado no pudo descifrarse.
  #[error("No se pudo descifrar el borrador: {0}")]
  Decrypt(String),
  /// JSON mal formado o sobre irreconocible.
  #[error("Borrador corrupto: {0}")]
  Corrupt(String),
  /// Sobre escrito por una versión de formato más nueva.
  #[error("Versión de borrador no soportada: {0}")]
  UnsupportedVersion(u32),
  #[error("Error de almacenamiento: {0}")]
  Storage(String),
}

/// Alias de resultado usado por las APIs del crate.
pub type Result<T> = std::result::Result<T, PersistenceError>;
