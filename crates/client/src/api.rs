//! `ManagementApi` implementation over the wire client

use async_trait::async_trait;
use reqwest::Method;
use stirrup_core::{AdminUser, ApiError, ApiResult, CreatedToken, ManagementApi, PasswordReset};
use tracing::debug;

use crate::types::{
    LoginRequest, LoginResponse, SetPasswordRequest, SetPasswordResponse, Setting, TokenRequest,
    TokenResponse, UserCollection,
};
use crate::{ClientError, ManagementClient};

const LOGIN_DESCRIPTION: &str = "stirrup session";

/// Token lifetimes cross the trait boundary in minutes; the wire wants
/// milliseconds. 0 stays 0 (no expiry).
fn ttl_millis(ttl_minutes: u64) -> u64 {
    ttl_minutes.saturating_mul(60_000)
}

#[async_trait]
impl ManagementApi for ManagementClient {
    async fn authenticate(&self, token: &str) -> ApiResult<()> {
        // Probe the API root with the candidate token; only a successful
        // probe installs it as the session credential.
        let request = self.request_as(Method::GET, "/v3", token);
        self.execute_unit(request).await.map_err(ApiError::from)?;
        self.install_token(token).await;
        Ok(())
    }

    async fn login(&self, username: &str, password: &str, ttl_minutes: u64) -> ApiResult<String> {
        let request = self
            .request_anonymous(Method::POST, "/v3-public/localProviders/local?action=login")
            .json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
                ttl: ttl_millis(ttl_minutes),
                description: LOGIN_DESCRIPTION.to_string(),
            });
        let response: LoginResponse = self.execute(request).await.map_err(ApiError::from)?;
        Ok(response.token)
    }

    async fn upsert_setting(&self, name: &str, value: &str) -> ApiResult<()> {
        let setting = Setting {
            name: name.to_string(),
            value: value.to_string(),
        };

        let request = self
            .request(Method::PUT, &format!("/v3/settings/{name}"))
            .await
            .json(&setting);
        match self.execute_unit(request).await {
            Ok(()) => Ok(()),
            Err(ClientError::NotFound(_)) => {
                debug!(setting = name, "setting absent, creating");
                let request = self.request(Method::POST, "/v3/settings").await.json(&setting);
                self.execute_unit(request).await.map_err(ApiError::from)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn get_setting(&self, name: &str) -> ApiResult<String> {
        let request = self
            .request(Method::GET, &format!("/v3/settings/{name}"))
            .await;
        let setting: Setting = self.execute(request).await.map_err(ApiError::from)?;
        Ok(setting.value)
    }

    async fn create_token(
        &self,
        username: &str,
        description: &str,
        ttl_minutes: u64,
    ) -> ApiResult<CreatedToken> {
        debug!(user = username, ttl_minutes, "creating api token");
        let request = self
            .request(Method::POST, "/v3/tokens")
            .await
            .json(&TokenRequest {
                description: description.to_string(),
                ttl: ttl_millis(ttl_minutes),
            });
        let response: TokenResponse = self.execute(request).await.map_err(ApiError::from)?;
        Ok(CreatedToken {
            id: response.id,
            token: response.token,
        })
    }

    async fn delete_token(&self, token_id: &str) -> ApiResult<()> {
        let request = self
            .request(Method::DELETE, &format!("/v3/tokens/{token_id}"))
            .await;
        self.execute_unit(request).await.map_err(ApiError::from)
    }

    async fn set_password_by_username(
        &self,
        username: &str,
        password: &str,
    ) -> ApiResult<PasswordReset> {
        let request = self
            .request(Method::GET, &format!("/v3/users?username={username}"))
            .await;
        let users: UserCollection = self.execute(request).await.map_err(ApiError::from)?;
        let user = users
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NotFound(format!("user {username}")))?;

        let request = self
            .request(Method::POST, &format!("/v3/users/{}?action=setpassword", user.id))
            .await
            .json(&SetPasswordRequest {
                new_password: password.to_string(),
            });
        let reset: SetPasswordResponse = self.execute(request).await.map_err(ApiError::from)?;
        Ok(PasswordReset {
            password: reset.password,
            user: AdminUser {
                id: reset.user.id,
                username: reset.user.username,
            },
        })
    }

    fn server_url(&self) -> String {
        self.base_url().to_string()
    }

    fn bootstrap_mode(&self) -> bool {
        self.bootstrap_mode
    }
}
