//! Collection Point Endpoints

use reqwest::Method;
use serde::Serialize;

use super::{list_containers, ApiClient};
use crate::error::ApiError;
use crate::models::{CollectionPoint, Container};
use crate::reconcile;

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct PointDraft {
    #[serde(rename = "ruta_ID")]
    pub route_id: u32,
    #[serde(rename = "contenedor_ID")]
    pub container_id: u32,
    #[serde(rename = "orden")]
    pub order: i32,
}

#[derive(Serialize, Default, Debug, Clone, Copy)]
pub struct PointPatch {
    #[serde(rename = "ruta_ID", skip_serializing_if = "Option::is_none")]
    pub route_id: Option<u32>,
    #[serde(rename = "contenedor_ID", skip_serializing_if = "Option::is_none")]
    pub container_id: Option<u32>,
    #[serde(rename = "orden", skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

pub async fn list_points(api: &ApiClient) -> Result<Vec<CollectionPoint>, ApiError> {
    api.get_json("/puntos-recoleccion").await
}

pub async fn get_point(api: &ApiClient, id: u32) -> Result<CollectionPoint, ApiError> {
    api.get_json(&format!("/puntos-recoleccion/{}", id)).await
}

pub async fn create_point(api: &ApiClient, draft: &PointDraft) -> Result<CollectionPoint, ApiError> {
    api.send_json(Method::POST, "/puntos-recoleccion", draft).await
}

pub async fn update_point(api: &ApiClient, id: u32, patch: &PointPatch) -> Result<(), ApiError> {
    api.send_body(Method::PATCH, &format!("/puntos-recoleccion/{}", id), patch).await
}

pub async fn delete_point(api: &ApiClient, id: u32) -> Result<(), ApiError> {
    api.send_empty(Method::DELETE, &format!("/puntos-recoleccion/{}", id)).await
}

/// Containers not yet placed on any route.
///
/// Both lists are fetched concurrently and then diffed.
pub async fn list_available_containers(api: &ApiClient) -> Result<Vec<Container>, ApiError> {
    let (containers, points) = futures::try_join!(list_containers(api), list_points(api))?;
    Ok(reconcile::available_containers(&containers, &points))
}

/// Persist new orders one point at a time; stops at the first failure
pub async fn apply_point_orders(api: &ApiClient, orders: &[(u32, i32)]) -> Result<(), ApiError> {
    for &(id, order) in orders {
        let patch = PointPatch {
            order: Some(order),
            ..Default::default()
        };
        update_point(api, id, &patch).await?;
    }
    Ok(())
}
