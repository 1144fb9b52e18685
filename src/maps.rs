//! Google Maps Bindings
//!
//! Thin wasm-bindgen imports of the `google.maps` classes the dashboard
//! uses, a one-time script loader, and `MapCanvas`, which owns the markers
//! drawn on one map element.

use gloo_timers::future::TimeoutFuture;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::geo::{Bounds, LatLng, MarkerSpec};

const SCRIPT_ID: &str = "google-maps-script";
const POLL_INTERVAL_MS: u32 = 100;
const POLL_ATTEMPTS: u32 = 100;
/// `google.maps.SymbolPath.CIRCLE`
const SYMBOL_CIRCLE: u8 = 0;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["google", "maps"], js_name = "Map")]
    #[derive(Clone)]
    type GoogleMap;

    #[wasm_bindgen(constructor, js_namespace = ["google", "maps"], js_class = "Map")]
    fn new(element: &web_sys::HtmlElement, options: &JsValue) -> GoogleMap;

    #[wasm_bindgen(method, js_name = fitBounds)]
    fn fit_bounds(this: &GoogleMap, bounds: &JsValue);

    #[wasm_bindgen(method, js_name = setCenter)]
    fn set_center(this: &GoogleMap, center: &JsValue);

    #[wasm_bindgen(method, js_name = setZoom)]
    fn set_zoom(this: &GoogleMap, zoom: f64);

    #[wasm_bindgen(js_namespace = ["google", "maps"], js_name = "Marker")]
    #[derive(Clone)]
    type Marker;

    #[wasm_bindgen(constructor, js_namespace = ["google", "maps"], js_class = "Marker")]
    fn new(options: &JsValue) -> Marker;

    /// Pass `null` to detach the marker
    #[wasm_bindgen(method, js_name = setMap)]
    fn set_map(this: &Marker, map: &JsValue);

    #[wasm_bindgen(method, js_name = addListener)]
    fn add_listener(this: &Marker, event: &str, handler: &js_sys::Function) -> JsValue;

    #[wasm_bindgen(js_namespace = ["google", "maps"], js_name = "InfoWindow")]
    #[derive(Clone)]
    type InfoWindow;

    #[wasm_bindgen(constructor, js_namespace = ["google", "maps"], js_class = "InfoWindow")]
    fn new(options: &JsValue) -> InfoWindow;

    #[wasm_bindgen(method, js_name = setContent)]
    fn set_content(this: &InfoWindow, content: &str);

    #[wasm_bindgen(method)]
    fn open(this: &InfoWindow, map: &GoogleMap, anchor: &Marker);

    #[wasm_bindgen(method)]
    fn close(this: &InfoWindow);
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapsError {
    #[error("no browser document available")]
    NoDocument,
    #[error("Google Maps API key is not configured")]
    MissingKey,
    #[error("could not inject the Maps script: {0}")]
    Script(String),
    #[error("Google Maps did not load in time")]
    Timeout,
    #[error("map construction failed: {0}")]
    Options(String),
}

// ========================
// Script loading
// ========================

fn maps_ready() -> bool {
    let global = js_sys::global();
    let Ok(google) = js_sys::Reflect::get(&global, &JsValue::from_str("google")) else {
        return false;
    };
    if google.is_undefined() || google.is_null() {
        return false;
    }
    js_sys::Reflect::get(&google, &JsValue::from_str("maps"))
        .map(|maps| !maps.is_undefined() && !maps.is_null())
        .unwrap_or(false)
}

fn script_url(key: &str) -> String {
    format!(
        "https://maps.googleapis.com/maps/api/js?key={}",
        utf8_percent_encode(key, NON_ALPHANUMERIC)
    )
}

fn inject_script(key: &str) -> Result<(), MapsError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or(MapsError::NoDocument)?;
    if document.get_element_by_id(SCRIPT_ID).is_some() {
        return Ok(());
    }

    let script = document
        .create_element("script")
        .map_err(|err| MapsError::Script(format!("{:?}", err)))?
        .dyn_into::<web_sys::HtmlScriptElement>()
        .map_err(|_| MapsError::Script("not a script element".to_string()))?;
    script.set_id(SCRIPT_ID);
    script.set_src(&script_url(key));
    script.set_async(true);

    let head = document.head().ok_or(MapsError::NoDocument)?;
    head.append_child(&script)
        .map_err(|err| MapsError::Script(format!("{:?}", err)))?;
    info!("google maps script injected");
    Ok(())
}

/// Load the Maps script once and wait until `google.maps` is defined
pub async fn ensure_loaded(api_key: Option<&str>) -> Result<(), MapsError> {
    if maps_ready() {
        return Ok(());
    }
    let key = api_key
        .filter(|k| !k.trim().is_empty())
        .ok_or(MapsError::MissingKey)?;
    inject_script(key)?;

    for _ in 0..POLL_ATTEMPTS {
        TimeoutFuture::new(POLL_INTERVAL_MS).await;
        if maps_ready() {
            return Ok(());
        }
    }
    Err(MapsError::Timeout)
}

// ========================
// Option objects
// ========================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MapOptions {
    center: LatLng,
    zoom: u8,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CircleIcon<'a> {
    path: u8,
    scale: f64,
    fill_color: &'a str,
    fill_opacity: f64,
    stroke_color: &'a str,
    stroke_weight: f64,
}

#[derive(Serialize)]
struct MarkerOptions<'a> {
    position: LatLng,
    title: &'a str,
    icon: CircleIcon<'a>,
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, MapsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|err| MapsError::Options(err.to_string()))
}

// ========================
// Map canvas
// ========================

/// A map bound to one element, with the markers currently drawn on it
pub struct MapCanvas {
    map: GoogleMap,
    info: InfoWindow,
    markers: Vec<Marker>,
    center: LatLng,
    zoom: u8,
    /// Click handlers; must outlive their markers
    listeners: Vec<Closure<dyn FnMut()>>,
}

impl MapCanvas {
    pub fn mount(element: &web_sys::HtmlElement, center: LatLng, zoom: u8) -> Result<Self, MapsError> {
        let map = GoogleMap::new(element, &to_js(&MapOptions { center, zoom })?);
        let info = InfoWindow::new(&js_sys::Object::new());
        Ok(Self {
            map,
            info,
            markers: Vec::new(),
            center,
            zoom,
            listeners: Vec::new(),
        })
    }

    /// Replace the drawn markers and fit the view around them
    pub fn show(&mut self, specs: &[MarkerSpec]) -> Result<(), MapsError> {
        self.clear();

        for spec in specs {
            let options = MarkerOptions {
                position: spec.position,
                title: &spec.title,
                icon: CircleIcon {
                    path: SYMBOL_CIRCLE,
                    scale: 10.0,
                    fill_color: spec.fill_color,
                    fill_opacity: 1.0,
                    stroke_color: "#ffffff",
                    stroke_weight: 2.0,
                },
            };
            let marker = Marker::new(&to_js(&options)?);
            marker.set_map(self.map.as_ref());

            let (info, map, anchor, text) = (self.info.clone(), self.map.clone(), marker.clone(), spec.info.clone());
            let on_click = Closure::<dyn FnMut()>::new(move || {
                info.set_content(&text);
                info.open(&map, &anchor);
            });
            marker.add_listener("click", on_click.as_ref().unchecked_ref());

            self.markers.push(marker);
            self.listeners.push(on_click);
        }

        match Bounds::around(specs.iter().map(|s| s.position)) {
            Some(bounds) if specs.len() > 1 => self.map.fit_bounds(&to_js(&bounds)?),
            Some(bounds) => {
                self.map.set_center(&to_js(&bounds.center())?);
                self.map.set_zoom(f64::from(self.zoom));
            }
            None => {
                self.map.set_center(&to_js(&self.center)?);
                self.map.set_zoom(f64::from(self.zoom));
            }
        }
        debug!(markers = specs.len(), "map markers drawn");
        Ok(())
    }

    /// Detach every marker and close the info window
    pub fn clear(&mut self) {
        self.info.close();
        for marker in self.markers.drain(..) {
            marker.set_map(&JsValue::NULL);
        }
        self.listeners.clear();
    }
}

impl Drop for MapCanvas {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_url_escapes_key() {
        assert_eq!(
            script_url("abc-123"),
            "https://maps.googleapis.com/maps/api/js?key=abc%2D123"
        );
    }
}
