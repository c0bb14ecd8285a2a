//! The bootstrap reconciler
//!
//! Operations run as a forward-only sequence: establish a session, sync
//! the global settings, rotate credentials, read the settings back.
//! There are no internal retries and no compensating rollback; each
//! remote call is idempotent, so the caller recovers from a partial
//! failure by re-invoking the whole operation.

use std::sync::Arc;

use stirrup_core::{AttributeStore, BootstrapState, ManagementApi};
use tracing::{debug, info, warn};

use crate::error::{BootstrapError, Result};

/// Login name of the administrator account the server ships with.
pub const ADMIN_USERNAME: &str = "admin";
/// Global setting holding the externally reachable server URL.
pub const SETTING_SERVER_URL: &str = "server-url";
/// Global setting holding the telemetry opt decision.
pub const SETTING_TELEMETRY: &str = "telemetry-opt";

/// Factory password of the administrator account.
const DEFAULT_ADMIN_PASSWORD: &str = "admin";
/// Lifetime of the session login performed while bootstrapping, in
/// minutes. Long enough to outlive any reconciliation run.
const LOGIN_TTL_MINUTES: u64 = 60_000;
/// Description attached to rotated admin tokens.
const TOKEN_DESCRIPTION: &str = "stirrup bootstrap admin token";

const TELEMETRY_IN: &str = "in";
const TELEMETRY_OUT: &str = "out";

/// How an operation treats the admin token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TokenRotation {
    /// Mint a new token; there is no previous one to retire.
    Mint,
    /// Mint a new token, then retire the recorded previous one.
    Replace,
    /// Leave the token alone.
    Skip,
}

/// Reconciles a management server's bootstrap state.
///
/// All four operations load the typed state from the attribute store,
/// run against the remote API, and persist the state back, on failure
/// paths too, so progress already committed remotely (a minted token, a
/// rotated password) is never forgotten locally.
pub struct Bootstrap {
    api: Arc<dyn ManagementApi>,
}

impl Bootstrap {
    pub fn new(api: Arc<dyn ManagementApi>) -> Self {
        Self { api }
    }

    /// First-time bootstrap: authenticate, write both settings, always
    /// mint an admin token, set the admin password, read settings back.
    pub async fn create(&self, store: &mut dyn AttributeStore) -> Result<()> {
        self.ensure_bootstrap_mode()?;
        let mut state = BootstrapState::load(store);
        let outcome = self.converge(&mut state, TokenRotation::Mint).await;
        state.persist(store);
        outcome
    }

    /// Refresh the observed settings (`url`, `telemetry`) from the
    /// remote. Token and password state is left untouched.
    pub async fn read(&self, store: &mut dyn AttributeStore) -> Result<()> {
        self.ensure_bootstrap_mode()?;
        let mut state = BootstrapState::load(store);
        let outcome = match self.establish_session(&state).await {
            Ok(()) => self.read_settings(&mut state).await,
            Err(err) => Err(err),
        };
        state.persist(store);
        outcome
    }

    /// Converge to the desired state. The admin token is rotated only
    /// when the caller requested it via `token_update`; the password is
    /// rotated on every run.
    pub async fn update(&self, store: &mut dyn AttributeStore) -> Result<()> {
        self.ensure_bootstrap_mode()?;
        let mut state = BootstrapState::load(store);
        let rotation = if state.token_update {
            TokenRotation::Replace
        } else {
            TokenRotation::Skip
        };
        let outcome = self.converge(&mut state, rotation).await;
        state.persist(store);
        outcome
    }

    /// Forget the local bootstrap identity. Deliberately performs no
    /// remote call: there is no safe remote analog of un-bootstrapping,
    /// and the credentials this tool minted must stay valid.
    pub fn delete(&self, store: &mut dyn AttributeStore) -> Result<()> {
        store.clear_id();
        Ok(())
    }

    async fn converge(&self, state: &mut BootstrapState, rotation: TokenRotation) -> Result<()> {
        self.establish_session(state).await?;
        self.sync_settings(state).await?;
        match rotation {
            TokenRotation::Mint => self.rotate_token(state, false).await?,
            TokenRotation::Replace => self.rotate_token(state, true).await?,
            TokenRotation::Skip => {}
        }
        self.rotate_password(state).await?;
        // The session is already authenticated at this point; the final
        // read-back only repopulates the observed settings.
        self.read_settings(state).await
    }

    /// Obtains an authenticated session: the stored token first, then a
    /// password login as the well-known admin. The first path to succeed
    /// wins.
    async fn establish_session(&self, state: &BootstrapState) -> Result<()> {
        if !state.token.is_empty() {
            match self.api.authenticate(&state.token).await {
                Ok(()) => {
                    debug!("session established with stored token");
                    return Ok(());
                }
                Err(err) => {
                    debug!(error = %err, "stored token rejected, falling back to password login");
                }
            }
        }

        let password = if state.current_password.is_empty() {
            DEFAULT_ADMIN_PASSWORD
        } else {
            &state.current_password
        };
        let token = self
            .api
            .login(ADMIN_USERNAME, password, LOGIN_TTL_MINUTES)
            .await
            .map_err(|source| BootstrapError::Authentication {
                username: ADMIN_USERNAME.to_string(),
                source,
            })?;
        self.api
            .authenticate(&token)
            .await
            .map_err(|source| BootstrapError::Authentication {
                username: ADMIN_USERNAME.to_string(),
                source,
            })?;
        debug!(user = ADMIN_USERNAME, "session established with password login");
        Ok(())
    }

    /// Pushes the desired values of both global settings. Plain upserts,
    /// no read-before-write; a failure aborts without undoing the other
    /// write, since re-running converges anyway.
    async fn sync_settings(&self, state: &BootstrapState) -> Result<()> {
        let url = public_url(&self.api.server_url());
        self.api
            .upsert_setting(SETTING_SERVER_URL, &url)
            .await
            .map_err(|source| BootstrapError::SettingWrite {
                name: SETTING_SERVER_URL.to_string(),
                source,
            })?;

        let telemetry = if state.telemetry {
            TELEMETRY_IN
        } else {
            TELEMETRY_OUT
        };
        self.api
            .upsert_setting(SETTING_TELEMETRY, telemetry)
            .await
            .map_err(|source| BootstrapError::SettingWrite {
                name: SETTING_TELEMETRY.to_string(),
                source,
            })?;
        Ok(())
    }

    /// Mints a replacement admin token and re-points the session at it.
    /// The previous token is deleted only after the replacement is
    /// proven active; a failed deletion leaves it orphaned rather than
    /// aborting the run.
    async fn rotate_token(&self, state: &mut BootstrapState, retire_previous: bool) -> Result<()> {
        let created = self
            .api
            .create_token(ADMIN_USERNAME, TOKEN_DESCRIPTION, state.token_ttl)
            .await
            .map_err(BootstrapError::TokenCreation)?;

        let previous = std::mem::replace(&mut state.token_id, created.id.clone());
        state.token = created.token.clone();

        self.api
            .authenticate(&created.token)
            .await
            .map_err(BootstrapError::TokenActivation)?;
        info!(token_id = %created.id, "admin token rotated");

        if retire_previous && !previous.is_empty() {
            if let Err(source) = self.api.delete_token(&previous).await {
                let err = BootstrapError::TokenDeletion {
                    token_id: previous,
                    source,
                };
                warn!(error = %err, "previous admin token left orphaned");
            }
        }
        Ok(())
    }

    /// Sets the admin password to the desired value. The remote response
    /// is authoritative for the resulting password and the admin user's
    /// identity; both are written into observed state.
    async fn rotate_password(&self, state: &mut BootstrapState) -> Result<()> {
        let reset = self
            .api
            .set_password_by_username(ADMIN_USERNAME, &state.password)
            .await
            .map_err(BootstrapError::PasswordUpdate)?;

        state.password = reset.password.clone();
        state.current_password = reset.password;
        state.user = reset.user.username;
        state.id = reset.user.id;
        info!(user_id = %state.id, "admin password set");
        Ok(())
    }

    /// Repopulates observed `url` and `telemetry` from the remote
    /// settings store.
    async fn read_settings(&self, state: &mut BootstrapState) -> Result<()> {
        state.url = self
            .api
            .get_setting(SETTING_SERVER_URL)
            .await
            .map_err(|source| BootstrapError::SettingRead {
                name: SETTING_SERVER_URL.to_string(),
                source,
            })?;

        let telemetry = self
            .api
            .get_setting(SETTING_TELEMETRY)
            .await
            .map_err(|source| BootstrapError::SettingRead {
                name: SETTING_TELEMETRY.to_string(),
                source,
            })?;
        state.telemetry = telemetry == TELEMETRY_IN;
        Ok(())
    }

    fn ensure_bootstrap_mode(&self) -> Result<()> {
        if self.api.bootstrap_mode() {
            Ok(())
        } else {
            Err(BootstrapError::Mode)
        }
    }
}

/// Externally reachable URL for the `server-url` setting: the configured
/// base URL with any trailing `/v3` API segment stripped.
fn public_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    trimmed.strip_suffix("/v3").unwrap_or(trimmed).to_string()
}
