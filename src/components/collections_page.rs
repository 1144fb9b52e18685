//! Collections Screen
//!
//! Newest-first log of collection events with a details modal.

use chrono::Local;
use leptos::prelude::*;

use crate::api;
use crate::components::badges::{MethodBadge, StatusBadge};
use crate::components::modal::{Modal, PageHeader};
use crate::components::notify::{use_mutations, Feedback};
use crate::components::DeleteConfirmButton;
use crate::context::{use_api, Entity};
use crate::format::format_optional_timestamp;
use crate::models::CollectionEvent;
use crate::store::{track_collections, use_app_store, AppStateStoreFields};

const DELETED: Feedback = Feedback {
    touched: &[Entity::Collections, Entity::Containers],
    done: "Recolección eliminada exitosamente",
    failed: "Error al eliminar la recolección",
};

#[component]
pub fn CollectionsPage() -> impl IntoView {
    let store = use_app_store();
    let api = use_api();
    let mutations = use_mutations();
    track_collections(store);

    let details = RwSignal::new(None::<CollectionEvent>);

    view! {
        <div class="collections-page">
            <PageHeader title="Recolecciones" />
            <Show
                when=move || !store.collections().read().is_empty()
                fallback=|| view! { <p class="empty">"No hay recolecciones registradas."</p> }
            >
                <table class="data-table">
                    <thead>
                        <tr>
                            <th>"ID"</th>
                            <th>"Fecha"</th>
                            <th>"Método"</th>
                            <th>"Recolector"</th>
                            <th>"Contenedor"</th>
                            <th>"Ruta"</th>
                            <th>"Acciones"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || store.collections().read().to_vec()
                            key=|event| (event.id, event.collected_at)
                            children=move |event| {
                                let id = event.id;
                                let snapshot = event.clone();
                                view! {
                                    <tr>
                                        <td>{id}</td>
                                        <td>{format_optional_timestamp(event.collected_at.as_ref(), &Local)}</td>
                                        <td><MethodBadge method=event.method /></td>
                                        <td>{event.collector_name().to_string()}</td>
                                        <td>{event.container_id().map(|c| c.to_string()).unwrap_or_else(|| "-".to_string())}</td>
                                        <td>{event.route().map(|r| r.name.clone()).unwrap_or_else(|| "Sin ruta".to_string())}</td>
                                        <td class="actions">
                                            <button class="btn-secondary" on:click=move |_| details.set(Some(snapshot.clone()))>
                                                "Detalles"
                                            </button>
                                            <DeleteConfirmButton
                                                button_class="btn-delete"
                                                on_confirm=move |_| {
                                                    let api = api.get_value();
                                                    mutations.run(async move { api::delete_collection(&api, id).await }, &DELETED);
                                                }
                                            />
                                        </td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
            </Show>

            {move || details.get().map(|event| view! {
                <CollectionDetails event=event on_close=move |_| details.set(None) />
            })}
        </div>
    }
}

#[component]
fn CollectionDetails(event: CollectionEvent, #[prop(into)] on_close: Callback<()>) -> impl IntoView {
    let container = event.container.clone();
    view! {
        <Modal title=format!("Recolección #{}", event.id) on_close=on_close>
            <dl class="details">
                <dt>"Fecha"</dt>
                <dd>{format_optional_timestamp(event.collected_at.as_ref(), &Local)}</dd>
                <dt>"Método"</dt>
                <dd><MethodBadge method=event.method /></dd>
                <dt>"Recolector"</dt>
                <dd>{event.collector_name().to_string()}</dd>
                <dt>"Ruta"</dt>
                <dd>{event.route().map(|r| r.name.clone()).unwrap_or_else(|| "Sin ruta".to_string())}</dd>
            </dl>
            {container.map(|c| view! {
                <h4>{format!("Contenedor #{}", c.id)}</h4>
                <dl class="details">
                    <dt>"Ubicación"</dt>
                    <dd>{c.location.clone()}</dd>
                    <dt>"Lugar"</dt>
                    <dd>{c.place.clone().unwrap_or_else(|| "-".to_string())}</dd>
                    <dt>"Códigos"</dt>
                    <dd>{format!("QR {} · NFC {}", c.qr_code, c.nfc_code)}</dd>
                    <dt>"Estado"</dt>
                    <dd><StatusBadge collected=c.collected /></dd>
                </dl>
            })}
        </Modal>
    }
}
