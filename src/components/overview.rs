//! Overview Screen
//!
//! Stat cards, the date and route filters, the containers map and the most
//! recent collections of the selected day.

use chrono::Local;
use leptos::prelude::*;
use tracing::warn;

use crate::components::badges::MethodBadge;
use crate::components::ContainersMap;
use crate::context::use_config;
use crate::format::{format_optional_timestamp, input_date, parse_input_date, today_local};
use crate::reconcile::{dashboard_stats, filter_by_scope, recent_events, RouteScope};
use crate::store::{
    track_collections, track_containers, track_routes, track_users, use_app_store, AppStateStoreFields,
};

#[component]
fn StatCard(#[prop(into)] label: String, #[prop(into)] value: Signal<String>) -> impl IntoView {
    view! {
        <div class="stat-card">
            <span class="stat-value">{move || value.get()}</span>
            <span class="stat-label">{label}</span>
        </div>
    }
}

#[component]
pub fn Overview() -> impl IntoView {
    let store = use_app_store();
    let recent_limit = use_config().with_value(|c| c.recent_collections);

    track_containers(store);
    track_collections(store);
    track_routes(store);
    track_users(store, false);

    let date_value = RwSignal::new(input_date(today_local()));
    let scope = RwSignal::new(RouteScope::All);
    let selected_date = Memo::new(move |_| parse_input_date(&date_value.get()).unwrap_or_else(today_local));

    let stats = Memo::new(move |_| {
        let containers = store.containers().read();
        let events = store.collections().read();
        dashboard_stats(
            &containers,
            &events,
            store.routes().read().len(),
            store.users().read().len(),
            scope.get(),
            selected_date.get(),
            &Local,
        )
    });
    let scoped_containers = Signal::derive(move || filter_by_scope(&store.containers().read(), scope.get()));
    let recent = Memo::new(move |_| {
        recent_events(&store.collections().read(), selected_date.get(), &Local, recent_limit)
    });

    let on_scope_change = move |ev: web_sys::Event| {
        let raw = event_target_value(&ev);
        match raw.parse::<RouteScope>() {
            Ok(parsed) => scope.set(parsed),
            Err(err) => {
                warn!(%err, "falling back to all routes");
                scope.set(RouteScope::All);
            }
        }
    };

    view! {
        <div class="overview">
            <div class="overview-filters">
                <label class="form-field inline">
                    <span>"Fecha"</span>
                    <input
                        type="date"
                        prop:value=move || date_value.get()
                        on:change=move |ev| date_value.set(event_target_value(&ev))
                    />
                </label>
                <label class="form-field inline">
                    <span>"Ruta"</span>
                    <select on:change=on_scope_change prop:value=move || scope.get().as_value()>
                        <option value="all">"Todas las rutas"</option>
                        <option value="unassigned">"Sin ruta asignada"</option>
                        <For
                            each=move || store.routes().read().to_vec()
                            key=|route| route.id
                            children=move |route| view! {
                                <option value=route.id.to_string()>{route.name.clone()}</option>
                            }
                        />
                    </select>
                </label>
            </div>

            <div class="stat-grid">
                <StatCard
                    label="Contenedores recolectados"
                    value=Signal::derive(move || {
                        let s = stats.get();
                        format!("{}/{}", s.collected, s.scoped_total)
                    })
                />
                <StatCard label="Recolecciones" value=Signal::derive(move || stats.get().collections_on_date.to_string()) />
                <StatCard label="Contenedores Totales" value=Signal::derive(move || stats.get().total_containers.to_string()) />
                <StatCard label="Rutas" value=Signal::derive(move || stats.get().routes.to_string()) />
                <StatCard label="Usuarios" value=Signal::derive(move || stats.get().users.to_string()) />
            </div>

            <ContainersMap containers=scoped_containers />

            <section class="recent-collections">
                <h3>"Recolecciones recientes"</h3>
                <Show
                    when=move || !recent.get().is_empty()
                    fallback=|| view! { <p class="empty">"No hay recolecciones en esta fecha."</p> }
                >
                    <table class="data-table">
                        <thead>
                            <tr>
                                <th>"ID"</th>
                                <th>"Fecha"</th>
                                <th>"Contenedor"</th>
                                <th>"Ruta"</th>
                                <th>"Recolector"</th>
                                <th>"Método"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || recent.get()
                                key=|event| event.id
                                children=move |event| view! {
                                    <tr>
                                        <td>{event.id}</td>
                                        <td>{format_optional_timestamp(event.collected_at.as_ref(), &Local)}</td>
                                        <td>{event.container_id().map(|id| id.to_string()).unwrap_or_default()}</td>
                                        <td>{event.route().map(|r| r.name.clone()).unwrap_or_else(|| "Sin ruta".to_string())}</td>
                                        <td>{event.collector_name().to_string()}</td>
                                        <td><MethodBadge method=event.method /></td>
                                    </tr>
                                }
                            />
                        </tbody>
                    </table>
                </Show>
            </section>

            <ActivityLog />
        </div>
    }
}

/// Recent log lines captured by the in-app logger
#[component]
fn ActivityLog() -> impl IntoView {
    let (lines, set_lines) = signal(rolling_logger::recent_lines());

    view! {
        <details class="activity-log">
            <summary>"Registro de actividad"</summary>
            <button class="btn-secondary" on:click=move |_| set_lines.set(rolling_logger::recent_lines())>
                "Actualizar"
            </button>
            <pre>{move || lines.get().join("\n")}</pre>
        </details>
    }
}
