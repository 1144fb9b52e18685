//! Runtime Configuration
//!
//! Defaults, overridden by build-time environment, overridden by a JSON
//! block embedded in `index.html`.

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::geo::{LatLng, DEFAULT_CENTER, DEFAULT_ZOOM};

/// Id of the `<script type="application/json">` element holding overrides
pub const CONFIG_ELEMENT_ID: &str = "waste-admin-config";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("api_base_url must start with http:// or https://, got {0:?}")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    /// Google Maps key; the map panel shows a notice when absent
    pub maps_api_key: Option<String>,
    pub map_center: LatLng,
    pub map_zoom: u8,
    /// How many collections the overview lists for the selected date
    pub recent_collections: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000/".to_string(),
            maps_api_key: None,
            map_center: DEFAULT_CENTER,
            map_zoom: DEFAULT_ZOOM,
            recent_collections: 10,
        }
    }
}

/// Partial config as written in the embedded JSON block
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigOverrides {
    api_base_url: Option<String>,
    maps_api_key: Option<String>,
    map_center: Option<LatLng>,
    map_zoom: Option<u8>,
    recent_collections: Option<usize>,
}

impl AppConfig {
    /// Resolve the full configuration for this page load
    pub fn load() -> Self {
        let mut config = Self::default().with_build_env();
        if let Some(raw) = embedded_config_json() {
            if let Err(err) = config.merge_json(&raw) {
                warn!(%err, "ignoring embedded config");
            }
        }
        info!(api = %config.api_base_url, maps = config.maps_api_key.is_some(), "config loaded");
        config
    }

    fn with_build_env(mut self) -> Self {
        if let Some(url) = option_env!("WASTE_API_URL") {
            self.api_base_url = url.to_string();
        }
        if let Some(key) = option_env!("WASTE_MAPS_KEY") {
            self.maps_api_key = Some(key.to_string());
        }
        self
    }

    /// Apply the fields present in `raw`; on error nothing is applied
    pub fn merge_json(&mut self, raw: &str) -> Result<(), ConfigError> {
        let overrides: ConfigOverrides = serde_json::from_str(raw)?;
        if let Some(url) = &overrides.api_base_url {
            validate_base_url(url)?;
        }

        if let Some(url) = overrides.api_base_url {
            self.api_base_url = url;
        }
        if let Some(key) = overrides.maps_api_key.filter(|k| !k.trim().is_empty()) {
            self.maps_api_key = Some(key);
        }
        if let Some(center) = overrides.map_center {
            self.map_center = center;
        }
        if let Some(zoom) = overrides.map_zoom {
            self.map_zoom = zoom;
        }
        if let Some(limit) = overrides.recent_collections {
            self.recent_collections = limit;
        }
        Ok(())
    }
}

fn validate_base_url(url: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidBaseUrl(url.to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
fn embedded_config_json() -> Option<String> {
    let document = web_sys::window()?.document()?;
    let text = document.get_element_by_id(CONFIG_ELEMENT_ID)?.text_content()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(not(target_arch = "wasm32"))]
fn embedded_config_json() -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:3000/");
        assert_eq!(config.map_zoom, 16);
        assert_eq!(config.recent_collections, 10);
        assert!(config.maps_api_key.is_none());
    }

    #[test]
    fn test_merge_json_overrides_present_fields_only() {
        let mut config = AppConfig::default();
        config
            .merge_json(r#"{"api_base_url":"https://api.example.mx/","map_center":{"lat":19.5,"lng":-96.9}}"#)
            .unwrap();

        assert_eq!(config.api_base_url, "https://api.example.mx/");
        assert_eq!(config.map_center, LatLng { lat: 19.5, lng: -96.9 });
        assert_eq!(config.map_zoom, 16);
        assert_eq!(config.recent_collections, 10);
    }

    #[test]
    fn test_merge_json_rejects_bad_base_url_without_partial_apply() {
        let mut config = AppConfig::default();
        let result = config.merge_json(r#"{"api_base_url":"localhost:3000","map_zoom":12}"#);

        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl(_))));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_merge_json_ignores_blank_maps_key() {
        let mut config = AppConfig::default();
        config.merge_json(r#"{"maps_api_key":"   "}"#).unwrap();
        assert!(config.maps_api_key.is_none());

        assert!(matches!(config.merge_json("{not json"), Err(ConfigError::Parse(_))));
    }
}
