// Archivo: store.rs
// Propósito: contrato del almacén clave-valor de bytes que usa el gateway.
use crate::errors::Result;

/// Almacén clave-valor de bytes (equivalente a un `localStorage`).
pub trait KeyValueStore: Send + Sync {
    /// Lee el valor de `key`. `Ok(None)` si la clave no existe.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Escribe `value` bajo `key`, sobrescribiendo cualquier valor previo.
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Elimina `key`. Eliminar una clave inexistente no es un error.
    fn remove(&self, key: &str) -> Result<()>;
}
