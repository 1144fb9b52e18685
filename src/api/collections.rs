//! Collection Event Endpoints

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Serialize;

use super::ApiClient;
use crate::error::ApiError;
use crate::models::{CollectionEvent, CollectionMethod};

#[derive(Serialize)]
pub struct CollectionDraft {
    #[serde(rename = "fecha_recoleccion", skip_serializing_if = "Option::is_none")]
    pub collected_at: Option<DateTime<Utc>>,
    #[serde(rename = "metodo_recoleccion")]
    pub method: CollectionMethod,
    #[serde(rename = "usuario_ID")]
    pub collector_id: u32,
    #[serde(rename = "contenedor_ID")]
    pub container_id: u32,
}

#[derive(Serialize, Default)]
pub struct CollectionPatch {
    #[serde(rename = "fecha_recoleccion", skip_serializing_if = "Option::is_none")]
    pub collected_at: Option<DateTime<Utc>>,
    #[serde(rename = "metodo_recoleccion", skip_serializing_if = "Option::is_none")]
    pub method: Option<CollectionMethod>,
}

pub async fn list_collections(api: &ApiClient) -> Result<Vec<CollectionEvent>, ApiError> {
    api.get_json("/recolecciones").await
}

pub async fn get_collection(api: &ApiClient, id: u32) -> Result<CollectionEvent, ApiError> {
    api.get_json(&format!("/recolecciones/{}", id)).await
}

pub async fn create_collection(api: &ApiClient, draft: &CollectionDraft) -> Result<CollectionEvent, ApiError> {
    api.send_json(Method::POST, "/recolecciones", draft).await
}

pub async fn update_collection(api: &ApiClient, id: u32, patch: &CollectionPatch) -> Result<(), ApiError> {
    api.send_body(Method::PATCH, &format!("/recolecciones/{}", id), patch).await
}

pub async fn delete_collection(api: &ApiClient, id: u32) -> Result<(), ApiError> {
    api.send_empty(Method::DELETE, &format!("/recolecciones/{}", id)).await
}
