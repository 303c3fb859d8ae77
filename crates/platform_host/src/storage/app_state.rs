//! Versioned state envelopes persisted through a [`KeyValueStore`].

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use super::kv::{load_json_with, save_json_with, KeyValueStore};

/// Version for [`AppStateEnvelope`] metadata serialization.
pub const APP_STATE_ENVELOPE_VERSION: u32 = 1;
/// Namespace used by the desktop session blob (windows, icons, theme, version).
pub const DESKTOP_STATE_NAMESPACE: &str = "system.desktop";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Versioned envelope for a persisted state payload.
pub struct AppStateEnvelope {
    /// Envelope schema version.
    pub envelope_version: u32,
    /// Namespace identifying the owning domain.
    pub namespace: String,
    /// Domain-defined schema version for the payload.
    pub schema_version: u32,
    /// Last update time in unix milliseconds.
    pub updated_at_unix_ms: u64,
    /// Serialized payload.
    pub payload: Value,
}

impl AppStateEnvelope {
    /// Creates a new envelope and stamps it with a monotonic timestamp.
    pub fn new(namespace: impl Into<String>, schema_version: u32, payload: Value) -> Self {
        Self {
            envelope_version: APP_STATE_ENVELOPE_VERSION,
            namespace: namespace.into(),
            schema_version,
            updated_at_unix_ms: crate::time::next_monotonic_timestamp_ms(),
            payload,
        }
    }
}

/// Builds a versioned [`AppStateEnvelope`] from a serializable payload.
///
/// # Errors
///
/// Returns an error when `payload` cannot be converted to JSON.
pub fn build_app_state_envelope<T: Serialize>(
    namespace: &str,
    schema_version: u32,
    payload: &T,
) -> Result<AppStateEnvelope, String> {
    let payload = serde_json::to_value(payload).map_err(|e| e.to_string())?;
    Ok(AppStateEnvelope::new(namespace, schema_version, payload))
}

/// Deserializes an envelope payload into a target type.
///
/// # Errors
///
/// Returns an error when deserialization fails.
pub fn migrate_envelope_payload<T: DeserializeOwned>(
    envelope: &AppStateEnvelope,
) -> Result<T, String> {
    serde_json::from_value(envelope.payload.clone()).map_err(|e| e.to_string())
}

/// Wraps `payload` in an envelope and writes it under `key`.
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub fn save_app_state_with<S: KeyValueStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    namespace: &str,
    schema_version: u32,
    payload: &T,
) -> Result<(), String> {
    let envelope = build_app_state_envelope(namespace, schema_version, payload)?;
    save_json_with(store, key, &envelope)
}

/// Loads an envelope from `key` and decodes its payload.
///
/// Envelopes whose namespace does not match are rejected. Payloads stamped with a different
/// schema version are passed to `migrate`, which may return `Ok(None)` to discard them.
///
/// # Errors
///
/// Returns an error when the store read, envelope decode, or migration fails.
pub fn load_app_state_with_migration<S, T, F>(
    store: &S,
    key: &str,
    namespace: &str,
    current_schema_version: u32,
    migrate: F,
) -> Result<Option<T>, String>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
    F: FnOnce(u32, &AppStateEnvelope) -> Result<Option<T>, String>,
{
    let Some(envelope) = load_json_with::<_, AppStateEnvelope>(store, key)? else {
        return Ok(None);
    };
    if envelope.namespace != namespace {
        return Err(format!(
            "namespace mismatch: expected {namespace} found {}",
            envelope.namespace
        ));
    }
    if envelope.schema_version == current_schema_version {
        return migrate_envelope_payload(&envelope).map(Some);
    }
    migrate(envelope.schema_version, &envelope)
}
