// Archivo: config.rs
use std::env;
use std::path::PathBuf;

pub const DEFAULT_STORAGE_KEY: &str = "cbt-flow-draft";
pub const CURRENT_FORMAT_VERSION: u32 = 1;

/// Configuración inyectable de la persistencia del borrador. Los tests usan
/// claves/directorios aislados en lugar de constantes globales.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftConfig {
    /// Clave fija bajo la que se guarda el borrador.
    pub storage_key: String,
    /// Versión que se escribe en los sobres nuevos.
    pub format_version: u32,
    /// Directorio del almacén en disco.
    pub data_dir: PathBuf,
    /// Secreto del que se deriva la clave de cifrado. `None` = sin clave.
    pub secret: Option<String>,
}

impl Default for DraftConfig {
    fn default() -> Self {
        DraftConfig { storage_key: DEFAULT_STORAGE_KEY.to_string(),
                      format_version: CURRENT_FORMAT_VERSION,
                      data_dir: PathBuf::from(".cbt-drafts"),
                      secret: None }
    }
}

impl DraftConfig {
    /// Carga `.env` (si existe) y lee `CBT_DRAFT_KEY`, `CBT_DRAFT_DIR` y
    /// `CBT_DRAFT_SECRET`. Las variables ausentes toman el valor por defecto.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = DraftConfig::default();
        DraftConfig { storage_key: env::var("CBT_DRAFT_KEY").ok()
                                                            .filter(|k| !k.trim().is_empty())
                                                            .unwrap_or(defaults.storage_key),
                      format_version: defaults.format_version,
                      data_dir: env::var("CBT_DRAFT_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
                      secret: env::var("CBT_DRAFT_SECRET").ok().filter(|s| !s.is_empty()) }
    }

    /// Copia de la configuración con otra clave (espacio de nombres aislado).
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }
}
