//! Backend API Gateway
//!
//! Typed bindings to the backend REST endpoints, organized by resource.
//! Every request carries the session's bearer token when one is stored.

mod auth;
mod users;
mod containers;
mod routes;
mod collections;
mod collection_points;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::session::Session;

// Re-export all public items
pub use auth::*;
pub use users::*;
pub use containers::*;
pub use routes::*;
pub use collections::*;
pub use collection_points::*;

/// HTTP client bound to one backend and one session
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Session) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Join `path` onto the base URL with exactly one slash between them
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Prepare a request; the bearer header is attached when a token exists
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute(&self, method: Method, path: &str, builder: RequestBuilder) -> Result<Response, ApiError> {
        debug!(%method, path, "api request");
        let response = builder.send().await.map_err(|err| {
            warn!(%method, path, %err, "api request failed to send");
            ApiError::from(err)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_status(status.as_u16(), path, &body);
        warn!(%method, path, status = status.as_u16(), %err, "api request rejected");
        Err(err)
    }

    async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|err| {
            warn!(path, %err, "unexpected response body");
            ApiError::Decode(err.to_string())
        })
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .execute(Method::GET, path, self.request(Method::GET, path))
            .await?;
        Self::decode(path, response).await
    }

    pub(crate) async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(method.clone(), path).json(body);
        let response = self.execute(method, path, builder).await?;
        Self::decode(path, response).await
    }

    /// Send a body, check the status, discard the response
    pub(crate) async fn send_body<B>(&self, method: Method, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let builder = self.request(method.clone(), path).json(body);
        self.execute(method, path, builder).await.map(|_| ())
    }

    /// Send without a body, check the status, discard the response
    pub(crate) async fn send_empty(&self, method: Method, path: &str) -> Result<(), ApiError> {
        self.execute(method.clone(), path, self.request(method, path))
            .await
            .map(|_| ())
    }
}

/// Encode a free-form value (phone, QR code) as one path segment
pub(crate) fn segment(raw: &str) -> String {
    utf8_percent_encode(raw, NON_ALPHANUMERIC).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Identity, Role};
    use crate::session::LoginResponse;
    use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

    fn signed_in_session() -> Session {
        let session = Session::in_memory();
        session
            .establish(LoginResponse {
                token: Some("abc.def".to_string()),
                user: Identity {
                    id: 1,
                    name: "Admin".to_string(),
                    phone: "2220000000".to_string(),
                    role: Role::Administrator,
                },
            })
            .unwrap();
        session
    }

    #[test]
    fn test_url_joining() {
        let api = ApiClient::new("http://localhost:3000/", Session::in_memory());
        assert_eq!(api.url("/usuarios"), "http://localhost:3000/usuarios");
        assert_eq!(api.url("usuarios/3"), "http://localhost:3000/usuarios/3");

        let api = ApiClient::new("https://api.example.mx/v1", Session::in_memory());
        assert_eq!(api.url("/rutas"), "https://api.example.mx/v1/rutas");
    }

    #[test]
    fn test_request_without_token_has_no_authorization() {
        let api = ApiClient::new("http://localhost:3000/", Session::in_memory());
        let request = api.request(Method::GET, "/contenedores").build().unwrap();

        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.url().as_str(), "http://localhost:3000/contenedores");
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_request_carries_bearer_token() {
        let api = ApiClient::new("http://localhost:3000/", signed_in_session());
        let request = api
            .request(Method::PATCH, "/rutas/2")
            .json(&serde_json::json!({ "nombre_ruta": "Centro" }))
            .build()
            .unwrap();

        assert_eq!(request.headers().get(AUTHORIZATION).unwrap(), "Bearer abc.def");
        assert_eq!(request.headers().get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn test_logout_stops_sending_token() {
        let session = signed_in_session();
        let api = ApiClient::new("http://localhost:3000/", session.clone());
        session.logout();

        let request = api.request(Method::GET, "/usuarios").build().unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_segment_escapes_reserved_characters() {
        assert_eq!(segment("2221234567"), "2221234567");
        assert_eq!(segment("QR/01 A"), "QR%2F01%20A");
    }
}
