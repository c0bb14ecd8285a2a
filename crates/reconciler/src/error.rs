use stirrup_core::ApiError;
use thiserror::Error;

/// Failures of a bootstrap reconciliation, naming the stage that failed.
///
/// Every variant except [`TokenDeletion`](BootstrapError::TokenDeletion)
/// terminates the running operation. Progress already committed to the
/// remote is left in place; re-invoking the operation converges it.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The endpoint is not running in bootstrap mode; no remote call was
    /// made.
    #[error("bootstrap operations require the server to run in bootstrap mode")]
    Mode,

    /// Both the token and the password login path failed.
    #[error("authenticating as {username}: {source}")]
    Authentication { username: String, source: ApiError },

    #[error("writing setting {name}: {source}")]
    SettingWrite { name: String, source: ApiError },

    #[error("reading setting {name}: {source}")]
    SettingRead { name: String, source: ApiError },

    #[error("creating admin token: {0}")]
    TokenCreation(ApiError),

    /// The freshly minted token could not be activated. The previous
    /// token was not deleted, so the next run can still authenticate.
    #[error("activating admin token: {0}")]
    TokenActivation(ApiError),

    /// The superseded token could not be deleted. Never aborts an
    /// operation; reported through logging and the token is left
    /// orphaned.
    #[error("deleting previous admin token {token_id}: {source}")]
    TokenDeletion { token_id: String, source: ApiError },

    #[error("updating admin password: {0}")]
    PasswordUpdate(ApiError),
}

pub type Result<T> = std::result::Result<T, BootstrapError>;
