//! The remote-session contract the reconciler runs against
//!
//! One value of this trait carries both the collaborator operations and
//! the read-only connection facts (base URL, bootstrap mode), so every
//! reconciler operation receives its full context explicitly instead of
//! reaching into global state.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;

/// A token minted by the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedToken {
    /// Remote identifier of the token, used for later deletion.
    pub id: String,
    /// The bearer secret itself.
    pub token: String,
}

/// The administrator account as reported by the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: String,
    pub username: String,
}

/// Outcome of a password reset.
///
/// The remote response is the single source of truth for the resulting
/// password: when the requested password was empty, `password` carries
/// the value the server generated or kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordReset {
    pub password: String,
    pub user: AdminUser,
}

/// Operations the bootstrap reconciler needs from the management API,
/// plus the connection settings it was configured with.
///
/// The implementation owns the live session. `authenticate` mutates the
/// session's bearer credential in place; this is how the reconciler
/// re-authenticates as a token it has just minted. Callers are expected
/// to run at most one reconciliation against a given endpoint at a time.
#[async_trait]
pub trait ManagementApi: Send + Sync {
    /// Validate `token` against the remote API and, only on success,
    /// install it as the session's bearer credential. A failed
    /// validation leaves the previously installed credential untouched.
    async fn authenticate(&self, token: &str) -> ApiResult<()>;

    /// Username/password login. Returns a fresh token without installing
    /// it into the session.
    async fn login(&self, username: &str, password: &str, ttl_minutes: u64) -> ApiResult<String>;

    /// Create-or-update write of a global setting.
    async fn upsert_setting(&self, name: &str, value: &str) -> ApiResult<()>;

    /// Read a global setting's current value.
    async fn get_setting(&self, name: &str) -> ApiResult<String>;

    /// Mint a new API token for `username`. A `ttl_minutes` of 0 means
    /// the token never expires.
    async fn create_token(
        &self,
        username: &str,
        description: &str,
        ttl_minutes: u64,
    ) -> ApiResult<CreatedToken>;

    /// Delete a token by its remote identifier.
    async fn delete_token(&self, token_id: &str) -> ApiResult<()>;

    /// Set a user's password by login name. An empty `password` asks the
    /// remote to generate or keep one; the response carries the
    /// authoritative result either way.
    async fn set_password_by_username(
        &self,
        username: &str,
        password: &str,
    ) -> ApiResult<PasswordReset>;

    /// The configured base URL, verbatim.
    fn server_url(&self) -> String;

    /// Whether bootstrap operations are permitted against this endpoint.
    fn bootstrap_mode(&self) -> bool;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use mockall::mock;

    mock! {
        pub ManagementApi {}

        #[async_trait]
        impl ManagementApi for ManagementApi {
            async fn authenticate(&self, token: &str) -> ApiResult<()>;
            async fn login(&self, username: &str, password: &str, ttl_minutes: u64) -> ApiResult<String>;
            async fn upsert_setting(&self, name: &str, value: &str) -> ApiResult<()>;
            async fn get_setting(&self, name: &str) -> ApiResult<String>;
            async fn create_token(
                &self,
                username: &str,
                description: &str,
                ttl_minutes: u64,
            ) -> ApiResult<CreatedToken>;
            async fn delete_token(&self, token_id: &str) -> ApiResult<()>;
            async fn set_password_by_username(
                &self,
                username: &str,
                password: &str,
            ) -> ApiResult<PasswordReset>;
            fn server_url(&self) -> String;
            fn bootstrap_mode(&self) -> bool;
        }
    }
}
