// Archivo: stubs.rs
// Propósito: almacén en memoria para pruebas y wiring rápido. No es
// durable.
use crate::errors::{PersistenceError, Result};
use crate::store::KeyValueStore;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

pub struct InMemoryKeyValueStore {
    /// Valores indexados por clave.
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryKeyValueStore {
    /// Crea un almacén vacío.
    pub fn new() -> Self {
        Self { entries: Mutex::new(HashMap::new()) }
    }

    /// Helper para mapear `Mutex::lock()` en un `Result` con
    /// `PersistenceError::Storage`.
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.entries.lock().map_err(|e| PersistenceError::Storage(format!("mutex poisoned: {:?}", e)))
    }

    /// Valor crudo como texto, útil para inspección en tests.
    pub fn raw_text(&self, key: &str) -> Option<String> {
        self.lock()
            .ok()
            .and_then(|m| m.get(key).map(|v| String::from_utf8_lossy(v).into_owned()))
    }

    pub fn len(&self) -> usize {
        self.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
