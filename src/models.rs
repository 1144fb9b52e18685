//! Frontend Models
//!
//! Data structures matching backend entities. The backend speaks Spanish JSON
//! keys; fields are renamed so the Rust side reads in English.

use std::convert::Infallible;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

// ========================
// Users
// ========================

/// Role of a backend user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Role {
    #[default]
    #[serde(rename = "recolector")]
    Collector,
    #[serde(rename = "administrador")]
    Administrator,
    /// Any role string this dashboard does not know about
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Selectable roles, in the order the forms list them
    pub const ASSIGNABLE: [Role; 2] = [Role::Collector, Role::Administrator];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Collector => "recolector",
            Role::Administrator => "administrador",
            Role::Unknown => "desconocido",
        }
    }

    /// Whether the backend accepts this role in a request body
    pub fn is_assignable(&self) -> bool {
        Role::ASSIGNABLE.contains(self)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Collector => "Recolector",
            Role::Administrator => "Administrador",
            Role::Unknown => "Desconocido",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Administrator)
    }
}

/// Wire or `<select>` value; anything unrecognised is `Unknown`
impl FromStr for Role {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "recolector" => Role::Collector,
            "administrador" => Role::Administrator,
            _ => Role::Unknown,
        })
    }
}

/// Snapshot of the authenticated user, persisted next to the token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "usuario_ID")]
    pub id: u32,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "telefono", default)]
    pub phone: String,
    #[serde(rename = "rol")]
    pub role: Role,
}

/// User data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "usuario_ID")]
    pub id: u32,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "telefono", default)]
    pub phone: String,
    #[serde(rename = "rol", default)]
    pub role: Role,
    /// Filled from `GET /usuarios/{id}/rutas`, not part of the list payload
    #[serde(rename = "rutas", default)]
    pub routes: Vec<RouteSummary>,
}

// ========================
// Routes
// ========================

/// Route reference as nested inside other entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    #[serde(rename = "ruta_ID")]
    pub id: u32,
    #[serde(rename = "nombre_ruta", default)]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
}

/// Route data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    #[serde(rename = "ruta_ID")]
    pub id: u32,
    #[serde(rename = "nombre_ruta")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "fecha_creacion", default, deserialize_with = "optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "puntosRecoleccion", default)]
    pub points: Vec<CollectionPoint>,
}

impl Route {
    pub fn summary(&self) -> RouteSummary {
        RouteSummary {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

// ========================
// Containers
// ========================

/// Collection point as seen from a container (back-reference)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ContainerPoint {
    #[serde(rename = "punto_ID", default)]
    pub id: Option<u32>,
    #[serde(rename = "orden", default)]
    pub order: Option<i32>,
    #[serde(rename = "ruta", default)]
    pub route: Option<RouteSummary>,
}

/// Container data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    #[serde(rename = "contenedor_ID")]
    pub id: u32,
    /// `"lat lng"`, see [`crate::geo::LatLng::parse`]
    #[serde(rename = "ubicacion", default)]
    pub location: String,
    #[serde(rename = "lugar", default)]
    pub place: Option<String>,
    #[serde(rename = "codigo_QR", default)]
    pub qr_code: String,
    #[serde(rename = "codigo_NFC", default)]
    pub nfc_code: String,
    #[serde(rename = "estadoRecoleccion", default)]
    pub collected: bool,
    #[serde(rename = "ultima_actualizacion", default, deserialize_with = "optional_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "puntoRecoleccion", default)]
    pub collection_point: Option<ContainerPoint>,
}

impl Container {
    /// Route this container is collected on, if any
    pub fn route(&self) -> Option<&RouteSummary> {
        self.collection_point.as_ref()?.route.as_ref()
    }

    pub fn route_id(&self) -> Option<u32> {
        self.route().map(|r| r.id)
    }

    /// No collection point, or a point without a route
    pub fn is_unassigned(&self) -> bool {
        self.route().is_none()
    }

    pub fn status_label(&self) -> &'static str {
        if self.collected { "Recolectado" } else { "Pendiente" }
    }
}

// ========================
// Collection Points
// ========================

/// Collection point data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionPoint {
    #[serde(rename = "punto_ID")]
    pub id: u32,
    #[serde(rename = "orden", default)]
    pub order: i32,
    #[serde(rename = "ruta", default)]
    pub route: Option<RouteSummary>,
    #[serde(rename = "contenedor", default)]
    pub container: Option<Container>,
}

impl CollectionPoint {
    pub fn container_id(&self) -> Option<u32> {
        self.container.as_ref().map(|c| c.id)
    }

    pub fn route_id(&self) -> Option<u32> {
        self.route.as_ref().map(|r| r.id)
    }
}

// ========================
// Collection Events
// ========================

/// Scan method used to register a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CollectionMethod {
    #[serde(rename = "QR")]
    Qr,
    #[serde(rename = "NFC")]
    Nfc,
    #[default]
    #[serde(other)]
    Other,
}

impl CollectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionMethod::Qr => "QR",
            CollectionMethod::Nfc => "NFC",
            CollectionMethod::Other => "?",
        }
    }
}

/// Collector reference nested in a collection event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CollectorRef {
    #[serde(rename = "usuario_ID", default)]
    pub id: Option<u32>,
    #[serde(rename = "nombre", default)]
    pub name: String,
}

/// Collection event data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionEvent {
    #[serde(rename = "recoleccion_ID")]
    pub id: u32,
    /// `None` when the backend sent no usable date; such events match no day
    #[serde(rename = "fecha_recoleccion", default, deserialize_with = "optional_timestamp")]
    pub collected_at: Option<DateTime<Utc>>,
    #[serde(rename = "metodo_recoleccion", default)]
    pub method: CollectionMethod,
    #[serde(rename = "usuario", default)]
    pub collector: Option<CollectorRef>,
    #[serde(rename = "contenedor", default)]
    pub container: Option<Container>,
}

impl CollectionEvent {
    pub fn container_id(&self) -> Option<u32> {
        self.container.as_ref().map(|c| c.id)
    }

    pub fn collector_name(&self) -> &str {
        self.collector.as_ref().map(|c| c.name.as_str()).unwrap_or("")
    }

    pub fn route(&self) -> Option<&RouteSummary> {
        self.container.as_ref()?.route()
    }
}

// ========================
// Timestamp decoding
// ========================

/// Naive layouts accepted when the backend omits the offset
const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse an RFC 3339 timestamp, or a naive one read as wall-clock time in `tz`
pub fn parse_timestamp_in<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    let naive = NAIVE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|at| at.with_timezone(&Utc))
}

/// [`parse_timestamp_in`] the browser's zone
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    parse_timestamp_in(raw, &Local)
}

/// Null, missing, non-string or unparseable values decode as `None`, so one
/// bad record does not fail the whole list
fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(raw)) => {
            let parsed = parse_timestamp(&raw);
            if parsed.is_none() {
                warn!(raw = %raw, "ignoring unparseable timestamp");
            }
            parsed
        }
        Some(other) => {
            warn!(value = %other, "ignoring non-string timestamp");
            None
        }
    };
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use serde_json::json;

    #[test]
    fn test_decode_container_with_route_backreference() {
        let container: Container = serde_json::from_value(json!({
            "contenedor_ID": 7,
            "ubicacion": "19.8 -97.3",
            "codigo_QR": "QR-7",
            "codigo_NFC": "NFC-7",
            "estadoRecoleccion": true,
            "ultima_actualizacion": "2024-05-01T14:00:00.000Z",
            "puntoRecoleccion": {
                "punto_ID": 3,
                "orden": 2,
                "ruta": { "ruta_ID": 4, "nombre_ruta": "Centro" }
            }
        }))
        .unwrap();

        assert_eq!(container.id, 7);
        assert_eq!(container.route_id(), Some(4));
        assert!(!container.is_unassigned());
        assert_eq!(container.status_label(), "Recolectado");
        assert_eq!(
            container.updated_at,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 14, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_container_point_without_route_is_unassigned() {
        let container: Container = serde_json::from_value(json!({
            "contenedor_ID": 1,
            "ubicacion": "19.8 -97.3",
            "puntoRecoleccion": { "punto_ID": 9, "ruta": null }
        }))
        .unwrap();

        assert!(container.is_unassigned());
        assert!(!container.collected);
        assert_eq!(container.updated_at, None);
    }

    #[test]
    fn test_decode_collection_event() {
        let event: CollectionEvent = serde_json::from_value(json!({
            "recoleccion_ID": 12,
            "fecha_recoleccion": "2024-05-01T08:30:00-06:00",
            "metodo_recoleccion": "NFC",
            "usuario": { "usuario_ID": 2, "nombre": "Ana" },
            "contenedor": {
                "contenedor_ID": 5,
                "ubicacion": "19.7 -97.2",
                "puntoRecoleccion": { "ruta": { "ruta_ID": 1, "nombre_ruta": "Norte", "descripcion": "Zona norte" } }
            }
        }))
        .unwrap();

        assert_eq!(event.method, CollectionMethod::Nfc);
        assert_eq!(event.collector_name(), "Ana");
        assert_eq!(event.container_id(), Some(5));
        assert_eq!(event.route().map(|r| r.name.as_str()), Some("Norte"));
        assert_eq!(event.collected_at, Some(Utc.with_ymd_and_hms(2024, 5, 1, 14, 30, 0).unwrap()));
    }

    #[test]
    fn test_unknown_role_and_method_decode() {
        let user: User = serde_json::from_value(json!({
            "usuario_ID": 3,
            "nombre": "Luis",
            "telefono": "2221112233",
            "rol": "supervisor"
        }))
        .unwrap();
        assert_eq!(user.role, Role::Unknown);
        assert!(user.routes.is_empty());

        let method: CollectionMethod = serde_json::from_value(json!("MANUAL")).unwrap();
        assert_eq!(method, CollectionMethod::Other);
    }

    #[test]
    fn test_parse_timestamp_without_offset_reads_as_local_wall_clock() {
        let central = FixedOffset::west_opt(6 * 3600).unwrap();
        assert_eq!(
            parse_timestamp_in("2024-05-01T02:00:00", &central),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp_in("2024-05-01 23:00", &Utc),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 23, 0, 0).unwrap())
        );
        // An explicit offset wins over the zone
        assert_eq!(
            parse_timestamp_in("2024-05-01T02:00:00Z", &central),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 2, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp_in("yesterday", &central), None);
    }

    #[test]
    fn test_bad_event_dates_do_not_fail_the_list() {
        let events: Vec<CollectionEvent> = serde_json::from_value(json!([
            { "recoleccion_ID": 1, "fecha_recoleccion": "2024-05-01T10:00:00Z", "metodo_recoleccion": "QR" },
            { "recoleccion_ID": 2, "fecha_recoleccion": null, "metodo_recoleccion": "QR" },
            { "recoleccion_ID": 3, "fecha_recoleccion": "no es fecha" },
            { "recoleccion_ID": 4, "fecha_recoleccion": 1714557600 },
            { "recoleccion_ID": 5 }
        ]))
        .unwrap();

        assert_eq!(events.len(), 5);
        assert_eq!(events[0].collected_at, Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()));
        assert!(events[1..].iter().all(|e| e.collected_at.is_none()));
        assert_eq!(events[2].method, CollectionMethod::Other);
    }

    #[test]
    fn test_role_from_select_value() {
        assert_eq!("administrador".parse::<Role>(), Ok(Role::Administrator));
        assert_eq!("recolector".parse::<Role>(), Ok(Role::Collector));
        assert_eq!("supervisor".parse::<Role>(), Ok(Role::Unknown));
        assert!(Role::Collector.is_assignable());
        assert!(!Role::Unknown.is_assignable());
    }

    #[test]
    fn test_route_points_default_to_empty() {
        let route: Route = serde_json::from_value(json!({
            "ruta_ID": 2,
            "nombre_ruta": "Sur",
            "descripcion": "Zona sur",
            "fecha_creacion": "2024-01-15T10:00:00Z"
        }))
        .unwrap();
        assert!(route.points.is_empty());
        assert_eq!(route.summary().name, "Sur");
    }
}
