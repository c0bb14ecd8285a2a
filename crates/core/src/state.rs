//! Typed view of the reconciled bootstrap state

use std::fmt;

use serde_json::Value;

use crate::store::AttributeStore;

pub const ATTR_CURRENT_PASSWORD: &str = "current_password";
pub const ATTR_PASSWORD: &str = "password";
pub const ATTR_TOKEN_TTL: &str = "token_ttl";
pub const ATTR_TOKEN: &str = "token";
pub const ATTR_TOKEN_ID: &str = "token_id";
pub const ATTR_TOKEN_UPDATE: &str = "token_update";
pub const ATTR_TELEMETRY: &str = "telemetry";
pub const ATTR_URL: &str = "url";
pub const ATTR_USER: &str = "user";

/// The reconciled entity: desired and observed bootstrap attributes.
///
/// Reconciler logic works on this struct only; the dynamic attribute
/// store is touched exclusively through [`load`](Self::load) and
/// [`persist`](Self::persist). An empty `id` means bootstrap has never
/// completed. Once it has, `token_id` and `token` refer to the same,
/// currently valid token.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BootstrapState {
    /// Last password known to work against the remote.
    pub current_password: String,
    /// Desired admin password; observed value after reconciliation.
    pub password: String,
    /// Desired token lifetime in minutes; 0 means no expiry.
    pub token_ttl: u64,
    /// Active session token.
    pub token: String,
    /// Remote identifier of the active token.
    pub token_id: String,
    /// Caller requests a forced token rotation on the next update.
    pub token_update: bool,
    /// Desired telemetry opt-in.
    pub telemetry: bool,
    /// Observed public URL of the server.
    pub url: String,
    /// Observed admin login name.
    pub user: String,
    /// Remote identifier of the admin user; empty until bootstrapped.
    pub id: String,
}

impl BootstrapState {
    /// Builds the typed state from whatever the store currently holds.
    /// Absent or mistyped attributes fall back to their defaults.
    pub fn load(store: &dyn AttributeStore) -> Self {
        Self {
            current_password: string_attr(store, ATTR_CURRENT_PASSWORD),
            password: string_attr(store, ATTR_PASSWORD),
            token_ttl: store
                .get(ATTR_TOKEN_TTL)
                .and_then(|v| v.as_u64())
                .unwrap_or(0),
            token: string_attr(store, ATTR_TOKEN),
            token_id: string_attr(store, ATTR_TOKEN_ID),
            token_update: bool_attr(store, ATTR_TOKEN_UPDATE),
            telemetry: bool_attr(store, ATTR_TELEMETRY),
            url: string_attr(store, ATTR_URL),
            user: string_attr(store, ATTR_USER),
            id: store.id().unwrap_or_default(),
        }
    }

    /// Writes every attribute back into the store.
    pub fn persist(&self, store: &mut dyn AttributeStore) {
        store.set(ATTR_CURRENT_PASSWORD, Value::from(self.current_password.as_str()));
        store.set(ATTR_PASSWORD, Value::from(self.password.as_str()));
        store.set(ATTR_TOKEN_TTL, Value::from(self.token_ttl));
        store.set(ATTR_TOKEN, Value::from(self.token.as_str()));
        store.set(ATTR_TOKEN_ID, Value::from(self.token_id.as_str()));
        store.set(ATTR_TOKEN_UPDATE, Value::from(self.token_update));
        store.set(ATTR_TELEMETRY, Value::from(self.telemetry));
        store.set(ATTR_URL, Value::from(self.url.as_str()));
        store.set(ATTR_USER, Value::from(self.user.as_str()));
        if self.id.is_empty() {
            store.clear_id();
        } else {
            store.set_id(&self.id);
        }
    }

    /// Whether bootstrap has completed at least once.
    pub fn bootstrapped(&self) -> bool {
        !self.id.is_empty()
    }
}

fn string_attr(store: &dyn AttributeStore, name: &str) -> String {
    store
        .get(name)
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

fn bool_attr(store: &dyn AttributeStore, name: &str) -> bool {
    store.get(name).and_then(|v| v.as_bool()).unwrap_or(false)
}

// Secrets stay out of logs and error chains.
impl fmt::Debug for BootstrapState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapState")
            .field("current_password", &redact(&self.current_password))
            .field("password", &redact(&self.password))
            .field("token_ttl", &self.token_ttl)
            .field("token", &redact(&self.token))
            .field("token_id", &self.token_id)
            .field("token_update", &self.token_update)
            .field("telemetry", &self.telemetry)
            .field("url", &self.url)
            .field("user", &self.user)
            .field("id", &self.id)
            .finish()
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() { "" } else { "[redacted]" }
}
