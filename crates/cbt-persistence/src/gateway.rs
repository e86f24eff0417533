// Archivo: gateway.rs
// Propósito: guardar/cargar el borrador del diario como sobre versionado y
// cifrado, con migración en un solo sentido desde el formato heredado.
//
// Política de errores:
// - `save` y `clear` son best-effort: capturan y registran cualquier fallo
//   (cifrado, cuota, almacenamiento deshabilitado) y nunca lo propagan.
// - `load` devuelve un `LoadError` tipado; nunca entra en pánico.
use crate::config::DraftConfig;
use crate::crypto::{cipher_from_config, ClientCrypto};
use crate::envelope::{DraftEnvelope, StoredDraft};
use crate::errors::{LoadError, PersistenceError, Result};
use crate::file_store::FileKeyValueStore;
use crate::store::KeyValueStore;
use cbt_domain::SessionData;
use chrono::{DateTime, Utc};
use log::{debug, error, warn};
use std::sync::Arc;

/// Borrador leído con éxito.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDraft {
    pub data: SessionData,
    /// El borrador estaba en el formato heredado en texto plano y debe
    /// re-escribirse cifrado en la próxima mutación.
    pub needs_migration: bool,
    /// Versión del formato leído (0 para el heredado).
    pub version: u32,
}

/// Gateway de persistencia del borrador.
pub struct PersistenceGateway {
    store: Arc<dyn KeyValueStore>,
    crypto: Arc<dyn ClientCrypto>,
    config: DraftConfig,
}

impl PersistenceGateway {
    pub fn new(store: Arc<dyn KeyValueStore>, crypto: Arc<dyn ClientCrypto>, config: DraftConfig) -> Self {
        Self { store, crypto, config }
    }

    pub fn config(&self) -> &DraftConfig {
        &self.config
    }

    pub fn storage_key(&self) -> &str {
        &self.config.storage_key
    }

    /// Guarda `data` como sobre cifrado de la versión actual, sobrescribiendo
    /// cualquier valor previo. Devuelve `true` si la escritura se completó;
    /// los fallos se registran y se devuelve `false`.
    pub fn save(&self, data: &SessionData) -> bool {
        match self.try_save(data) {
            Ok(()) => {
                debug!("borrador guardado en '{}' ({})", self.config.storage_key, data.last_modified);
                true
            }
            Err(PersistenceError::Crypto(e)) => {
                error!("no se pudo cifrar el borrador '{}': {}", self.config.storage_key, e);
                false
            }
            Err(e) => {
                warn!("no se pudo guardar el borrador '{}': {}", self.config.storage_key, e);
                false
            }
        }
    }

    /// Variante que propaga el error; `save` la envuelve.
    pub fn try_save(&self, data: &SessionData) -> Result<()> {
        let json = serde_json::to_string(data)?;
        let payload = self.crypto.encrypt(&json)?;
        let envelope = DraftEnvelope { version: self.config.format_version,
                                       encrypted: true,
                                       payload,
                                       last_modified: data.last_modified };
        let bytes = serde_json::to_vec(&envelope)?;
        self.store.set(&self.config.storage_key, &bytes)
    }

    /// Lee el borrador.
    ///
    /// - `Ok(None)`: no hay borrador (no es un error).
    /// - `Ok(Some(_))` con `needs_migration = true`: formato heredado.
    /// - `Err(LoadError::Decrypt)`: clave incorrecta/rotada o payload
    ///   corrupto; el llamador decide si ofrece descartar.
    pub fn load(&self) -> std::result::Result<Option<LoadedDraft>, LoadError> {
        let bytes = match self.store.get(&self.config.storage_key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Ok(None),
            Err(e) => {
                warn!("no se pudo leer el borrador '{}': {}", self.config.storage_key, e);
                return Err(LoadError::Storage(e.to_string()));
            }
        };
        match StoredDraft::parse(&bytes)? {
            StoredDraft::Encrypted(envelope) => {
                if envelope.version > self.config.format_version {
                    return Err(LoadError::UnsupportedVersion(envelope.version));
                }
                let plaintext = self.crypto
                                    .decrypt(&envelope.payload)
                                    .map_err(|e| LoadError::Decrypt(e.to_string()))?;
                let data: SessionData =
                    serde_json::from_str(&plaintext).map_err(|e| LoadError::Corrupt(e.to_string()))?;
                Ok(Some(LoadedDraft { data, needs_migration: false, version: envelope.version }))
            }
            StoredDraft::Legacy(obj) => {
                let data: SessionData =
                    serde_json::from_value(obj).map_err(|e| LoadError::Corrupt(e.to_string()))?;
                debug!("borrador heredado en '{}': pendiente de migración", self.config.storage_key);
                Ok(Some(LoadedDraft { data, needs_migration: true, version: 0 }))
            }
        }
    }

    /// Elimina el borrador. Idempotente; los fallos sólo se registran.
    pub fn clear(&self) {
        if let Err(e) = self.store.remove(&self.config.storage_key) {
            warn!("no se pudo eliminar el borrador '{}': {}", self.config.storage_key, e);
        }
    }

    /// Existencia del borrador sin descifrar.
    pub fn has_draft(&self) -> bool {
        self.peek().is_some_and(|d| d.has_content())
    }

    /// `lastModified` del borrador sin descifrar.
    pub fn draft_timestamp(&self) -> Option<DateTime<Utc>> {
        self.peek().and_then(|d| d.last_modified())
    }

    fn peek(&self) -> Option<StoredDraft> {
        let bytes = self.store.get(&self.config.storage_key).ok().flatten()?;
        StoredDraft::parse(&bytes).ok()
    }
}

/// Construye un gateway sobre disco a partir de las variables de entorno
/// (ver `DraftConfig::from_env`).
pub fn new_from_env() -> PersistenceGateway {
    let config = DraftConfig::from_env();
    let store: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::new(config.data_dir.clone()));
    let crypto = cipher_from_config(&config);
    PersistenceGateway::new(store, crypto, config)
}
