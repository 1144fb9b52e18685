//! Route Endpoints

use reqwest::Method;
use serde::Serialize;

use super::{segment, ApiClient};
use crate::error::ApiError;
use crate::models::Route;

#[derive(Serialize)]
pub struct RouteDraft<'a> {
    #[serde(rename = "nombre_ruta")]
    pub name: &'a str,
    #[serde(rename = "descripcion")]
    pub description: &'a str,
}

pub async fn list_routes(api: &ApiClient) -> Result<Vec<Route>, ApiError> {
    api.get_json("/rutas").await
}

pub async fn get_route(api: &ApiClient, id: u32) -> Result<Route, ApiError> {
    api.get_json(&format!("/rutas/{}", id)).await
}

pub async fn create_route(api: &ApiClient, draft: &RouteDraft<'_>) -> Result<Route, ApiError> {
    api.send_json(Method::POST, "/rutas", draft).await
}

/// Name and description are always sent together, as the form edits both
pub async fn update_route(api: &ApiClient, id: u32, draft: &RouteDraft<'_>) -> Result<(), ApiError> {
    api.send_body(Method::PATCH, &format!("/rutas/{}", id), draft).await
}

pub async fn delete_route(api: &ApiClient, id: u32) -> Result<(), ApiError> {
    api.send_empty(Method::DELETE, &format!("/rutas/{}", id)).await
}

/// Change the scheduled hour of a route (`HH:MM`)
pub async fn change_route_hour(api: &ApiClient, id: u32, hour: &str) -> Result<(), ApiError> {
    api.send_empty(Method::PATCH, &format!("/rutas/{}/cambiar_hora/{}", id, segment(hour))).await
}
