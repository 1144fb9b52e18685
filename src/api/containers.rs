//! Container Endpoints

use reqwest::Method;
use serde::Serialize;

use super::{segment, ApiClient};
use crate::error::ApiError;
use crate::models::Container;

// ========================
// Argument Structs
// ========================

#[derive(Serialize)]
pub struct ContainerDraft<'a> {
    #[serde(rename = "ubicacion")]
    pub location: &'a str,
    #[serde(rename = "lugar", skip_serializing_if = "Option::is_none")]
    pub place: Option<&'a str>,
    #[serde(rename = "codigo_QR")]
    pub qr_code: &'a str,
    #[serde(rename = "codigo_NFC")]
    pub nfc_code: &'a str,
}

#[derive(Serialize, Default)]
pub struct ContainerPatch<'a> {
    #[serde(rename = "ubicacion", skip_serializing_if = "Option::is_none")]
    pub location: Option<&'a str>,
    #[serde(rename = "lugar", skip_serializing_if = "Option::is_none")]
    pub place: Option<&'a str>,
    #[serde(rename = "codigo_QR", skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<&'a str>,
    #[serde(rename = "codigo_NFC", skip_serializing_if = "Option::is_none")]
    pub nfc_code: Option<&'a str>,
}

#[derive(Serialize)]
struct CollectionStateArgs {
    #[serde(rename = "estadoRecoleccion")]
    collected: bool,
}

// ========================
// Commands
// ========================

pub async fn list_containers(api: &ApiClient) -> Result<Vec<Container>, ApiError> {
    api.get_json("/contenedores").await
}

pub async fn get_container(api: &ApiClient, id: u32) -> Result<Container, ApiError> {
    api.get_json(&format!("/contenedores/{}", id)).await
}

/// Look a container up by its QR or NFC code
pub async fn get_container_by_code(api: &ApiClient, code: &str) -> Result<Container, ApiError> {
    api.get_json(&format!("/contenedores/{}/contenedor", segment(code))).await
}

pub async fn create_container(api: &ApiClient, draft: &ContainerDraft<'_>) -> Result<Container, ApiError> {
    api.send_json(Method::POST, "/contenedores", draft).await
}

pub async fn update_container(api: &ApiClient, id: u32, patch: &ContainerPatch<'_>) -> Result<(), ApiError> {
    api.send_body(Method::PATCH, &format!("/contenedores/{}", id), patch).await
}

pub async fn delete_container(api: &ApiClient, id: u32) -> Result<(), ApiError> {
    api.send_empty(Method::DELETE, &format!("/contenedores/{}", id)).await
}

pub async fn set_collection_state(api: &ApiClient, id: u32, collected: bool) -> Result<(), ApiError> {
    api.send_body(
        Method::PATCH,
        &format!("/contenedores/{}/estado-recoleccion", id),
        &CollectionStateArgs { collected },
    )
    .await
}
