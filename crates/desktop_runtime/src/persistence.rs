//! Desktop session blob: open windows, icons, theme, and the last merged build version.
//!
//! The session lives under its own storage key, separate from the filesystem blob, wrapped in a
//! versioned [`platform_host::AppStateEnvelope`].

use leptos::logging;
use platform_host::{
    load_app_state_with_migration, migrate_envelope_payload, save_app_state_with,
    AppStateEnvelope, KeyValueStore, VersionDescriptor, DESKTOP_STATE_NAMESPACE,
};
use serde::{Deserialize, Serialize};

use crate::model::{DesktopIcon, DesktopTheme, WindowRecord, DESKTOP_SESSION_SCHEMA_VERSION};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DesktopSession {
    #[serde(default)]
    pub windows: Vec<WindowRecord>,
    #[serde(default)]
    pub icons: Vec<DesktopIcon>,
    #[serde(default)]
    pub theme: DesktopTheme,
    #[serde(default)]
    pub theme_set_manually: bool,
    /// Build version whose manifest was last seeded or merged.
    #[serde(default)]
    pub version: Option<VersionDescriptor>,
}

fn migrate_desktop_session(
    schema_version: u32,
    envelope: &AppStateEnvelope,
) -> Result<Option<DesktopSession>, String> {
    match schema_version {
        // Schema 0 predates the envelope fields but shares the payload shape.
        0 => migrate_envelope_payload(envelope).map(Some),
        _ => Ok(None),
    }
}

/// Loads the persisted session, or `None` when absent or unreadable.
pub fn load_session(store: &dyn KeyValueStore, key: &str) -> Option<DesktopSession> {
    match load_app_state_with_migration(
        store,
        key,
        DESKTOP_STATE_NAMESPACE,
        DESKTOP_SESSION_SCHEMA_VERSION,
        migrate_desktop_session,
    ) {
        Ok(session) => session,
        Err(err) => {
            logging::warn!("desktop session unreadable, starting fresh: {err}");
            None
        }
    }
}

/// Writes the session. Failures are logged and otherwise ignored.
pub fn save_session(store: &dyn KeyValueStore, key: &str, session: &DesktopSession) {
    if let Err(err) = save_app_state_with(
        store,
        key,
        DESKTOP_STATE_NAMESPACE,
        DESKTOP_SESSION_SCHEMA_VERSION,
        session,
    ) {
        logging::warn!("persist desktop session failed: {err}");
    }
}

#[cfg(test)]
mod tests {
    use platform_host::{build_app_state_envelope, MemoryKeyValueStore};
    use pretty_assertions::assert_eq;

    use super::*;

    const KEY: &str = "test.session";

    #[test]
    fn session_round_trips_through_store() {
        let store = MemoryKeyValueStore::default();
        let session = DesktopSession {
            theme_set_manually: true,
            version: Some(VersionDescriptor {
                sha: "abc".to_string(),
                build_at: "2024-01-01".to_string(),
            }),
            ..DesktopSession::default()
        };
        save_session(&store, KEY, &session);
        assert_eq!(load_session(&store, KEY), Some(session));
    }

    #[test]
    fn missing_and_corrupt_sessions_load_as_none() {
        let store = MemoryKeyValueStore::default();
        assert_eq!(load_session(&store, KEY), None);
        store.save_raw(KEY, "[1, 2").expect("save");
        assert_eq!(load_session(&store, KEY), None);
    }

    #[test]
    fn schema_zero_payload_is_migrated() {
        let store = MemoryKeyValueStore::default();
        let mut envelope = build_app_state_envelope(
            DESKTOP_STATE_NAMESPACE,
            0,
            &serde_json::json!({ "theme_set_manually": true }),
        )
        .expect("envelope");
        envelope.schema_version = 0;
        store
            .save_raw(KEY, &serde_json::to_string(&envelope).expect("json"))
            .expect("save");

        let session = load_session(&store, KEY).expect("migrated");
        assert!(session.theme_set_manually);
        assert!(session.windows.is_empty());
    }

    #[test]
    fn unknown_future_schema_is_discarded() {
        let store = MemoryKeyValueStore::default();
        save_app_state_with(
            &store,
            KEY,
            DESKTOP_STATE_NAMESPACE,
            DESKTOP_SESSION_SCHEMA_VERSION + 1,
            &DesktopSession::default(),
        )
        .expect("save");
        assert_eq!(load_session(&store, KEY), None);
    }
}
