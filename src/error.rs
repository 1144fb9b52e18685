//! Error Types
//!
//! Failure taxonomy for backend calls and session handling.

use serde_json::Value;
use thiserror::Error;

/// Failure of a single backend call
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Request never produced a response
    #[error("network error: {0}")]
    Network(String),
    /// Missing, expired or rejected credential (401/403)
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found: {0}")]
    NotFound(String),
    /// Input rejected by the backend (400/409/422)
    #[error("validation failed ({status}): {message}")]
    Validation { status: u16, message: String },
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    /// Response body did not match the expected shape
    #[error("decode error: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a non-2xx response
    pub fn from_status(status: u16, path: &str, body: &str) -> Self {
        match status {
            401 | 403 => ApiError::Unauthorized,
            404 => ApiError::NotFound(path.to_string()),
            400 | 409 | 422 => ApiError::Validation {
                status,
                message: extract_message(body),
            },
            _ => ApiError::Server {
                status,
                message: extract_message(body),
            },
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// Text shown in the alert after a failed action
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => "No se pudo conectar con el servidor.".to_string(),
            ApiError::Unauthorized => "Tu sesión expiró. Inicia sesión nuevamente.".to_string(),
            ApiError::NotFound(_) => "El registro solicitado no existe.".to_string(),
            ApiError::Validation { message, .. } if !message.is_empty() => message.clone(),
            ApiError::Validation { .. } => "Los datos enviados no son válidos.".to_string(),
            ApiError::Server { status, .. } => format!("Error del servidor ({}).", status),
            ApiError::Decode(_) => "Respuesta inesperada del servidor.".to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Pull the human message out of an error body.
///
/// The backend answers `{"message": "..."}` or, for validation pipes,
/// `{"message": ["...", "..."]}`. Anything else is returned trimmed.
fn extract_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("message") {
            Some(Value::String(message)) => message.clone(),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("; "),
            _ => body.trim().to_string(),
        },
        _ => body.trim().to_string(),
    }
}

/// Failure to open a dashboard session
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthError {
    /// Credentials were valid but the account may not use the dashboard
    #[error("account is not an administrator")]
    NotAdministrator,
    #[error("login response carried no token")]
    MissingToken,
    #[error("could not persist identity snapshot: {0}")]
    Snapshot(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AuthError {
    /// Text shown under the login form
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::NotAdministrator => "No tienes permisos para acceder a esta sección.",
            _ => "Error al iniciar sesión. Por favor, verifica tus credenciales.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_statuses_map_to_unauthorized() {
        assert_eq!(ApiError::from_status(401, "/usuarios", ""), ApiError::Unauthorized);
        assert_eq!(ApiError::from_status(403, "/usuarios", "{}"), ApiError::Unauthorized);
        assert!(ApiError::from_status(401, "/rutas", "").is_unauthorized());
    }

    #[test]
    fn test_not_found_keeps_path() {
        assert_eq!(
            ApiError::from_status(404, "/contenedores/9", "{\"message\":\"Not Found\"}"),
            ApiError::NotFound("/contenedores/9".to_string())
        );
    }

    #[test]
    fn test_validation_message_array_is_joined() {
        let body = r#"{"statusCode":400,"message":["codigo_QR must be unique","ubicacion should not be empty"],"error":"Bad Request"}"#;
        assert_eq!(
            ApiError::from_status(400, "/contenedores", body),
            ApiError::Validation {
                status: 400,
                message: "codigo_QR must be unique; ubicacion should not be empty".to_string(),
            }
        );
    }

    #[test]
    fn test_conflict_with_string_message() {
        let err = ApiError::from_status(409, "/usuarios", r#"{"message":"telefono ya registrado"}"#);
        assert_eq!(err.to_string(), "validation failed (409): telefono ya registrado");
    }

    #[test]
    fn test_server_error_with_plain_body() {
        assert_eq!(
            ApiError::from_status(502, "/rutas", "  Bad Gateway \n"),
            ApiError::Server {
                status: 502,
                message: "Bad Gateway".to_string(),
            }
        );
    }

    #[test]
    fn test_api_error_user_message_prefers_backend_validation_text() {
        let err = ApiError::from_status(409, "/contenedores", r#"{"message":"El código QR ya existe"}"#);
        assert_eq!(err.user_message(), "El código QR ya existe");
        assert_eq!(
            ApiError::from_status(400, "/rutas", "").user_message(),
            "Los datos enviados no son válidos."
        );
        assert_eq!(ApiError::from_status(502, "/rutas", "").user_message(), "Error del servidor (502).");
    }

    #[test]
    fn test_auth_error_user_messages() {
        assert_eq!(
            AuthError::NotAdministrator.user_message(),
            "No tienes permisos para acceder a esta sección."
        );
        assert_eq!(
            AuthError::from(ApiError::Unauthorized).user_message(),
            "Error al iniciar sesión. Por favor, verifica tus credenciales."
        );
    }
}
