//! Durable bootstrap state for the CLI
//!
//! The attribute store is persisted as a JSON file next to wherever the
//! operator runs stirrup from. It holds secrets (token, passwords), so
//! it is written with owner-only permissions on Unix.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Value, json};
use stirrup_core::state::{ATTR_PASSWORD, ATTR_TELEMETRY, ATTR_TOKEN_TTL, ATTR_TOKEN_UPDATE};
use stirrup_core::{AttributeStore, MemoryStore};

use crate::config::BootstrapConfig;

/// Load the store from `path`, or start empty if the file does not
/// exist yet.
pub fn load(path: &Path) -> Result<MemoryStore> {
    if !path.exists() {
        return Ok(MemoryStore::new());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading state file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing state file {}", path.display()))
}

/// Write the store to `path`.
pub fn save(path: &Path, store: &MemoryStore) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating state directory {}", parent.display()))?;
    }
    let raw = serde_json::to_string_pretty(store)?;
    fs::write(path, raw).with_context(|| format!("writing state file {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .with_context(|| format!("restricting permissions on {}", path.display()))?;
    }
    Ok(())
}

/// Copy the desired values from configuration into the store ahead of a
/// reconciliation run.
///
/// The password is only overridden when the configuration sets one: an
/// empty configured password means "generate on first bootstrap, then
/// keep whatever the server reported".
pub fn apply_desired(store: &mut MemoryStore, desired: &BootstrapConfig) {
    if !desired.password.is_empty() {
        store.set(ATTR_PASSWORD, Value::from(desired.password.as_str()));
    }
    store.set(ATTR_TOKEN_TTL, json!(desired.token_ttl));
    store.set(ATTR_TOKEN_UPDATE, json!(desired.token_update));
    store.set(ATTR_TELEMETRY, json!(desired.telemetry));
}

#[cfg(test)]
mod tests {
    use super::*;
    use stirrup_core::state::ATTR_TOKEN;

    #[test]
    fn missing_file_yields_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = load(&dir.path().join("state.json")).unwrap();
        assert_eq!(store.id(), None);
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut store = MemoryStore::new();
        store.set_id("user-abc");
        store.set(ATTR_TOKEN, json!("tok-1:secret"));
        save(&path, &store).unwrap();

        let restored = load(&path).unwrap();
        assert_eq!(restored.id(), Some("user-abc".to_string()));
        assert_eq!(restored.get(ATTR_TOKEN), Some(json!("tok-1:secret")));
    }

    #[cfg(unix)]
    #[test]
    fn state_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        save(&path, &MemoryStore::new()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn desired_password_does_not_clobber_generated_one() {
        let mut store = MemoryStore::new();
        store.set(ATTR_PASSWORD, json!("server-generated"));

        apply_desired(&mut store, &BootstrapConfig::default());
        assert_eq!(store.get(ATTR_PASSWORD), Some(json!("server-generated")));

        let desired = BootstrapConfig {
            password: "operator-chosen".into(),
            ..Default::default()
        };
        apply_desired(&mut store, &desired);
        assert_eq!(store.get(ATTR_PASSWORD), Some(json!("operator-chosen")));
    }
}
