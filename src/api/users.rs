//! User Endpoints
//!
//! User CRUD, password handling and route assignment.

use reqwest::Method;
use serde::Serialize;

use super::{segment, ApiClient};
use crate::error::ApiError;
use crate::models::{CollectionEvent, Role, RouteSummary, User};

// ========================
// Argument Structs
// ========================

#[derive(Serialize)]
pub struct NewUser<'a> {
    #[serde(rename = "nombre")]
    pub name: &'a str,
    #[serde(rename = "telefono")]
    pub phone: &'a str,
    #[serde(rename = "contrasenia")]
    pub password: &'a str,
    #[serde(rename = "rol")]
    pub role: Role,
}

/// Partial update; `None` fields are left out of the body
#[derive(Serialize, Default)]
pub struct UserPatch<'a> {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<&'a str>,
    /// An unrecognised role is never sent, so the backend keeps its own value
    #[serde(rename = "rol", skip_serializing_if = "keeps_stored_role")]
    pub role: Option<Role>,
}

fn keeps_stored_role(role: &Option<Role>) -> bool {
    !role.is_some_and(|role| role.is_assignable())
}

#[derive(Serialize)]
pub struct PasswordChange<'a> {
    #[serde(rename = "contrasenia_actual", skip_serializing_if = "Option::is_none")]
    pub current: Option<&'a str>,
    #[serde(rename = "contrasenia_nueva")]
    pub new_password: &'a str,
}

// ========================
// Commands
// ========================

pub async fn list_users(api: &ApiClient) -> Result<Vec<User>, ApiError> {
    api.get_json("/usuarios").await
}

pub async fn get_user(api: &ApiClient, id: u32) -> Result<User, ApiError> {
    api.get_json(&format!("/usuarios/{}", id)).await
}

pub async fn create_user(api: &ApiClient, user: &NewUser<'_>) -> Result<User, ApiError> {
    api.send_json(Method::POST, "/usuarios", user).await
}

pub async fn update_user(api: &ApiClient, id: u32, patch: &UserPatch<'_>) -> Result<(), ApiError> {
    api.send_body(Method::PATCH, &format!("/usuarios/{}", id), patch).await
}

pub async fn delete_user(api: &ApiClient, id: u32) -> Result<(), ApiError> {
    api.send_empty(Method::DELETE, &format!("/usuarios/{}", id)).await
}

pub async fn change_password(api: &ApiClient, id: u32, change: &PasswordChange<'_>) -> Result<(), ApiError> {
    api.send_body(Method::POST, &format!("/usuarios/{}/change-password", id), change).await
}

/// Ask the backend to reset the password of the user with this phone
pub async fn restore_password(api: &ApiClient, phone: &str) -> Result<(), ApiError> {
    api.send_empty(Method::GET, &format!("/usuarios/{}/restore-password", segment(phone))).await
}

pub async fn assign_route(api: &ApiClient, user_id: u32, route_id: u32) -> Result<(), ApiError> {
    api.send_empty(Method::POST, &format!("/usuarios/{}/rutas/{}", user_id, route_id)).await
}

pub async fn unassign_route(api: &ApiClient, user_id: u32, route_id: u32) -> Result<(), ApiError> {
    api.send_empty(Method::DELETE, &format!("/usuarios/{}/rutas/{}", user_id, route_id)).await
}

pub async fn list_user_routes(api: &ApiClient, user_id: u32) -> Result<Vec<RouteSummary>, ApiError> {
    api.get_json(&format!("/usuarios/{}/rutas", user_id)).await
}

pub async fn list_user_collections(api: &ApiClient, user_id: u32) -> Result<Vec<CollectionEvent>, ApiError> {
    api.get_json(&format!("/usuarios/{}/recolecciones", user_id)).await
}

/// All users with their assigned routes filled in, sorted by id.
///
/// Route lookups run concurrently; one failing lookup fails the whole load.
pub async fn list_users_with_routes(api: &ApiClient) -> Result<Vec<User>, ApiError> {
    let users = list_users(api).await?;
    let lookups = users.iter().map(|user| list_user_routes(api, user.id));
    let routes = futures::future::try_join_all(lookups).await?;

    let mut users: Vec<User> = users
        .into_iter()
        .zip(routes)
        .map(|(user, routes)| User { routes, ..user })
        .collect();
    users.sort_by_key(|u| u.id);
    Ok(users)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_patch_skips_unset_fields() {
        let patch = UserPatch {
            name: Some("Ana"),
            role: Some(Role::Administrator),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({ "nombre": "Ana", "rol": "administrador" })
        );
    }

    #[test]
    fn test_user_patch_leaves_unrecognised_role_alone() {
        let patch = UserPatch {
            name: Some("Luis"),
            phone: Some("222"),
            role: Some(Role::Unknown),
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({ "nombre": "Luis", "telefono": "222" })
        );
    }

    #[test]
    fn test_new_user_wire_shape() {
        let user = NewUser {
            name: "Luis",
            phone: "2221112233",
            password: "secreta",
            role: Role::Collector,
        };
        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            json!({ "nombre": "Luis", "telefono": "2221112233", "contrasenia": "secreta", "rol": "recolector" })
        );
    }
}
