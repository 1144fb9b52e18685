//! Auth Endpoints
//!
//! Login, registration and profile check.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::{ApiClient, NewUser};
use crate::error::{ApiError, AuthError};
use crate::models::Identity;
use crate::session::LoginResponse;

#[derive(Serialize)]
pub struct Credentials<'a> {
    #[serde(rename = "telefono")]
    pub phone: &'a str,
    #[serde(rename = "contrasenia")]
    pub password: &'a str,
}

/// Log in and open a session; only administrators are let through
pub async fn login(api: &ApiClient, credentials: &Credentials<'_>) -> Result<Identity, AuthError> {
    let response: LoginResponse = api
        .send_json(Method::POST, "/auth/login", credentials)
        .await?;
    api.session().establish(response)
}

pub async fn register(api: &ApiClient, user: &NewUser<'_>) -> Result<(), ApiError> {
    api.send_body(Method::POST, "/auth/register", user).await
}

/// Server-side view of the current token; the payload is not interpreted
pub async fn profile(api: &ApiClient) -> Result<Value, ApiError> {
    api.get_json("/auth/profile").await
}
