//! Containers Map Component
//!
//! Google map with one circle marker per container: green when collected,
//! red when pending. Markers are redrawn whenever the container list changes.

use leptos::html::Div;
use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::warn;

use crate::context::use_config;
use crate::geo::marker_specs;
use crate::maps::{self, MapCanvas};
use crate::models::Container;

#[derive(Clone, Debug, PartialEq)]
enum MapStatus {
    Loading,
    Ready,
    Unavailable(String),
}

#[component]
pub fn ContainersMap(#[prop(into)] containers: Signal<Vec<Container>>) -> impl IntoView {
    let config = use_config().get_value();
    let node = NodeRef::<Div>::new();
    let canvas = StoredValue::new_local(None::<MapCanvas>);
    let (status, set_status) = signal(MapStatus::Loading);

    // Load the script and build the map once the element is mounted
    let key = config.maps_api_key.clone();
    let (center, zoom) = (config.map_center, config.map_zoom);
    Effect::new(move |_| {
        let Some(element) = node.get() else { return };
        let key = key.clone();
        spawn_local(async move {
            let mounted = match maps::ensure_loaded(key.as_deref()).await {
                Ok(()) => MapCanvas::mount(&element, center, zoom),
                Err(err) => Err(err),
            };
            match mounted {
                Ok(map) => {
                    canvas.set_value(Some(map));
                    set_status.set(MapStatus::Ready);
                }
                Err(err) => {
                    warn!(%err, "map unavailable");
                    set_status.set(MapStatus::Unavailable(err.to_string()));
                }
            }
        });
    });

    Effect::new(move |_| {
        let list = containers.get();
        if status.get() != MapStatus::Ready {
            return;
        }
        let specs = marker_specs(&list);
        canvas.update_value(|map| {
            if let Some(map) = map {
                if let Err(err) = map.show(&specs) {
                    warn!(%err, "could not draw markers");
                }
            }
        });
    });

    view! {
        <div class="map-panel">
            <div class="map-canvas" node_ref=node></div>
            {move || match status.get() {
                MapStatus::Loading => Some(view! { <p class="map-notice">"Cargando mapa..."</p> }.into_any()),
                MapStatus::Unavailable(reason) => Some(view! {
                    <p class="map-notice">"Mapa no disponible: " {reason}</p>
                }.into_any()),
                MapStatus::Ready => None,
            }}
        </div>
    }
}
