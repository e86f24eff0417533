// Archivo: envelope.rs
// Propósito: formatos persistidos del borrador.
//
// - Heredado (v0): el objeto `SessionData` serializado tal cual, sin campo
//   `encrypted`. Algunas versiones intermedias lo envolvían como
//   `{version, encrypted: false, rawData, lastModified}`.
// - Actual (v1): `{"version":1,"encrypted":true,"payload":"<cifrado>",
//   "lastModified":"<ISO8601>"}`.
use crate::errors::LoadError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Campos de `SessionData` que cuentan para `has_draft` en el formato
/// heredado.
const LEGACY_FIELDS: [&str; 9] = ["situation",
                                  "emotions",
                                  "thoughts",
                                  "coreBelief",
                                  "challengeQuestions",
                                  "rationalThoughts",
                                  "schemaModes",
                                  "actionPlan",
                                  "finalEmotions"];

/// Sobre versionado y cifrado.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftEnvelope {
    pub version: u32,
    pub encrypted: bool,
    pub payload: String,
    pub last_modified: DateTime<Utc>,
}

/// Valor leído del almacén, ya clasificado por forma.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredDraft {
    Encrypted(DraftEnvelope),
    /// Objeto de sesión en texto plano (ya desenvuelto de `rawData` si
    /// venía envuelto).
    Legacy(JsonValue),
}

impl StoredDraft {
    /// Clasifica los bytes crudos. Un valor que no es un objeto JSON es
    /// `Corrupt`.
    pub fn parse(bytes: &[u8]) -> Result<StoredDraft, LoadError> {
        let value: JsonValue = serde_json::from_slice(bytes).map_err(|e| LoadError::Corrupt(e.to_string()))?;
        if !value.is_object() {
            return Err(LoadError::Corrupt("el borrador no es un objeto JSON".to_string()));
        }
        if value.get("encrypted").and_then(JsonValue::as_bool) == Some(true) {
            let envelope: DraftEnvelope =
                serde_json::from_value(value).map_err(|e| LoadError::Corrupt(e.to_string()))?;
            return Ok(StoredDraft::Encrypted(envelope));
        }
        match value.get("rawData") {
            Some(raw) if raw.is_object() => Ok(StoredDraft::Legacy(raw.clone())),
            _ => Ok(StoredDraft::Legacy(value)),
        }
    }

    /// Comprobación barata de existencia: sobre cifrado con payload no
    /// vacío, o heredado con algún campo reconocido no vacío.
    pub fn has_content(&self) -> bool {
        match self {
            StoredDraft::Encrypted(env) => !env.payload.trim().is_empty(),
            StoredDraft::Legacy(obj) => {
                LEGACY_FIELDS.iter().any(|field| obj.get(*field).is_some_and(json_non_empty))
            }
        }
    }

    /// `lastModified` sin descifrar.
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        match self {
            StoredDraft::Encrypted(env) => Some(env.last_modified),
            StoredDraft::Legacy(obj) => obj.get("lastModified")
                                           .and_then(JsonValue::as_str)
                                           .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                                           .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

fn json_non_empty(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(_) => true,
        JsonValue::String(s) => !s.trim().is_empty(),
        JsonValue::Array(items) => !items.is_empty(),
        JsonValue::Object(map) => map.values().any(json_non_empty),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_both_shapes() {
        let v1 = br#"{"version":1,"encrypted":true,"payload":"abc","lastModified":"2024-01-01T00:00:00Z"}"#;
        assert!(matches!(StoredDraft::parse(v1).unwrap(), StoredDraft::Encrypted(_)));

        let legacy = br#"{"situation":{"situation":"x","date":""},"thoughts":[]}"#;
        assert!(matches!(StoredDraft::parse(legacy).unwrap(), StoredDraft::Legacy(_)));

        let wrapped = br#"{"version":0,"encrypted":false,"rawData":{"thoughts":[{"thought":"t"}]}}"#;
        match StoredDraft::parse(wrapped).unwrap() {
            StoredDraft::Legacy(obj) => assert_eq!(obj["thoughts"][0]["thought"], "t"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rejects_non_objects() {
        assert!(matches!(StoredDraft::parse(b"[1,2]"), Err(LoadError::Corrupt(_))));
        assert!(matches!(StoredDraft::parse(b"{not json"), Err(LoadError::Corrupt(_))));
        assert!(matches!(StoredDraft::parse(br#"{"encrypted":true}"#), Err(LoadError::Corrupt(_))));
    }

    #[test]
    fn legacy_emptiness_ignores_blank_fields() {
        let blank = StoredDraft::Legacy(json!({"situation": null, "thoughts": [], "coreBelief": {"belief": ""},
                                               "lastModified": "2024-01-01T00:00:00Z"}));
        assert!(!blank.has_content());
        let filled = StoredDraft::Legacy(json!({"thoughts": [{"thought": "x"}]}));
        assert!(filled.has_content());
    }
}
