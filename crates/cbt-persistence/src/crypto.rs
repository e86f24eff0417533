// Archivo: crypto.rs
// Propósito: contrato de la primitiva de cifrado simétrico del borrador y
// sus implementaciones.
//
// El texto cifrado de `XChaChaCrypto` es `base64(nonce || ciphertext)` con
// un nonce aleatorio de 24 bytes por mensaje.
use crate::config::DraftConfig;
use crate::errors::CryptoError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chacha20poly1305::aead::Aead;
use chacha20poly1305::{Key, KeyInit, XChaCha20Poly1305, XNonce};
use rand::rngs::OsRng;
use rand::RngCore;
use std::sync::Arc;

const KEY_CONTEXT: &str = "cbt-flow 2024-01-01 draft encryption key";
const NONCE_LEN: usize = 24;

/// Cifrado simétrico de texto. Falla con un error tipado ante clave
/// incorrecta o entrada corrupta.
pub trait ClientCrypto: Send + Sync {
    fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError>;
    fn decrypt(&self, ciphertext: &str) -> Result<String, CryptoError>;
}

/// XChaCha20-Poly1305 con clave derivada de un secreto mediante BLAKE3.
pub struct XChaChaCrypto {
    key: [u8; 32],
}

impl XChaChaCrypto {
    /// Deriva la clave a partir de un secreto arbitrario.
    pub fn from_secret(secret: &str) -> Self {
        Self { key: blake3::derive_key(KEY_CONTEXT, secret.as_bytes()) }
    }

    pub fn from_key(key: [u8; 32]) -> Self {
        Self { key }
    }

    fn cipher(&self) -> XChaCha20Poly1305 {
        XChaCha20Poly1305::new(Key::from_slice(&self.key))
    }
}

impl ClientCrypto for XChaChaCrypto {
    fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);
        let sealed = self.cipher()
                         .encrypt(XNonce::from_slice(&nonce), plaintext.as_bytes())
                         .map_err(|e| CryptoError::Encrypt(e.to_string()))?;
        let mut out = Vec::with_capacity(NONCE_LEN + sealed.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&sealed);
        Ok(STANDARD.encode(out))
    }

    fn decrypt(&self, ciphertext: &str) -> Result<String, CryptoError> {
        let raw = STANDARD.decode(ciphertext.trim())
                          .map_err(|e| CryptoError::Encoding(e.to_string()))?;
        if raw.len() <= NONCE_LEN {
            return Err(CryptoError::Decrypt("texto cifrado truncado".to_string()));
        }
        let (nonce, sealed) = raw.split_at(NONCE_LEN);
        let opened = self.cipher()
                         .decrypt(XNonce::from_slice(nonce), sealed)
                         .map_err(|_| CryptoError::Decrypt("clave incorrecta o datos corruptos".to_string()))?;
        String::from_utf8(opened).map_err(|e| CryptoError::Encoding(e.to_string()))
    }
}

/// Cifrado identidad: devuelve la entrada tal cual. Sólo para pruebas.
pub struct IdentityCrypto;

impl ClientCrypto for IdentityCrypto {
    fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        Ok(plaintext.to_string())
    }

    fn decrypt(&self, ciphertext: &str) -> Result<String, CryptoError> {
        Ok(ciphertext.to_string())
    }
}

/// Se usa cuando no hay material de clave: toda operación falla con
/// `KeyUnavailable` en lugar de abortar.
pub struct UnavailableCrypto;

impl ClientCrypto for UnavailableCrypto {
    fn encrypt(&self, _plaintext: &str) -> Result<String, CryptoError> {
        Err(CryptoError::KeyUnavailable)
    }

    fn decrypt(&self, _ciphertext: &str) -> Result<String, CryptoError> {
        Err(CryptoError::KeyUnavailable)
    }
}

/// Construye la primitiva según la configuración.
pub fn cipher_from_config(config: &DraftConfig) -> Arc<dyn ClientCrypto> {
    match config.secret.as_deref() {
        Some(secret) => Arc::new(XChaChaCrypto::from_secret(secret)),
        None => Arc::new(UnavailableCrypto),
    }
}
