//! Persistencia local del borrador del diario.
//!
//! El borrador se guarda como un sobre versionado y cifrado (`DraftEnvelope`)
//! bajo una clave fija de un almacén clave-valor de bytes. La lectura migra
//! en un solo sentido desde el formato heredado en texto plano. La
//! implementación detallada está en `gateway.rs`.

mod config;
mod crypto;
mod envelope;
mod errors;
mod file_store;
mod gateway;
mod store;
mod stubs;

pub use config::{DraftConfig, CURRENT_FORMAT_VERSION, DEFAULT_STORAGE_KEY};
pub use crypto::{cipher_from_config, ClientCrypto, IdentityCrypto, UnavailableCrypto, XChaChaCrypto};
pub use envelope::{DraftEnvelope, StoredDraft};
pub use errors::{CryptoError, LoadError, PersistenceError, Result};
pub use file_store::FileKeyValueStore;
pub use gateway::{new_from_env, LoadedDraft, PersistenceGateway};
pub use store::KeyValueStore;
pub use stubs::InMemoryKeyValueStore;
