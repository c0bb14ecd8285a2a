//! Wire types for the management API

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Token lifetime in milliseconds.
    pub ttl: u64,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Setting {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    pub description: String,
    /// Token lifetime in milliseconds; 0 means no expiry.
    pub ttl: u64,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub id: String,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct UserCollection {
    pub data: Vec<User>,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPasswordRequest {
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct SetPasswordResponse {
    /// The resulting password, generated server-side when the request
    /// left it empty.
    pub password: String,
    pub user: User,
}
