//! Collection Points Screen
//!
//! Points filtered by route, with create/edit (route, available container,
//! order) and delete.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{self, PointDraft, PointPatch};
use crate::components::modal::{Modal, PageHeader};
use crate::components::notify::{self, use_mutations, Feedback};
use crate::components::DeleteConfirmButton;
use crate::context::{use_api, use_auth, Entity};
use crate::models::{CollectionPoint, Container};
use crate::reconcile::points_in_route;
use crate::store::{track_collection_points, track_routes, use_app_store, AppStateStoreFields};

const CREATED: Feedback = Feedback {
    touched: &[Entity::CollectionPoints, Entity::Routes, Entity::Containers],
    done: "Punto de recolección creado exitosamente",
    failed: "Error al crear el punto de recolección",
};
const UPDATED: Feedback = Feedback {
    touched: &[Entity::CollectionPoints, Entity::Routes, Entity::Containers],
    done: "Punto de recolección actualizado exitosamente",
    failed: "Error al actualizar el punto de recolección",
};
const DELETED: Feedback = Feedback {
    touched: &[Entity::CollectionPoints, Entity::Routes, Entity::Containers],
    done: "Punto de recolección eliminado exitosamente",
    failed: "Error al eliminar el punto de recolección",
};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Editor {
    Create,
    Edit(u32),
}

#[component]
pub fn CollectionPointsPage() -> impl IntoView {
    let store = use_app_store();
    let api = use_api();
    let mutations = use_mutations();
    track_collection_points(store);
    track_routes(store);

    let route_filter = RwSignal::new(None::<u32>);
    let editor = RwSignal::new(None::<Editor>);
    let editing = RwSignal::new(None::<CollectionPoint>);

    let visible = Memo::new(move |_| points_in_route(&store.collection_points().read(), route_filter.get()));

    view! {
        <div class="collection-points-page">
            <PageHeader
                title="Puntos de Recolección"
                action_label="Nuevo Punto"
                on_action=move |_| {
                    editing.set(None);
                    editor.set(Some(Editor::Create));
                }
            />
            <label class="form-field inline">
                <span>"Filtrar por ruta"</span>
                <select on:change=move |ev| route_filter.set(event_target_value(&ev).parse::<u32>().ok())>
                    <option value="">"Todas las rutas"</option>
                    <For
                        each=move || store.routes().read().to_vec()
                        key=|route| route.id
                        children=move |route| view! {
                            <option value=route.id.to_string()>{route.name.clone()}</option>
                        }
                    />
                </select>
            </label>

            <table class="data-table">
                <thead>
                    <tr>
                        <th>"ID"</th>
                        <th>"Ruta"</th>
                        <th>"Contenedor"</th>
                        <th>"Ubicación"</th>
                        <th>"Orden"</th>
                        <th>"Acciones"</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || visible.get()
                        key=|p| (p.id, p.order, p.route_id(), p.container_id())
                        children=move |point| {
                            let id = point.id;
                            let snapshot = point.clone();
                            view! {
                                <tr>
                                    <td>{id}</td>
                                    <td>{point.route.as_ref().map(|r| r.name.clone()).unwrap_or_else(|| "Sin ruta".to_string())}</td>
                                    <td>{point.container_id().map(|c| c.to_string()).unwrap_or_default()}</td>
                                    <td>{point.container.as_ref().map(|c| c.location.clone()).unwrap_or_default()}</td>
                                    <td>{point.order}</td>
                                    <td class="actions">
                                        <button class="btn-secondary" on:click=move |_| {
                                            editing.set(Some(snapshot.clone()));
                                            editor.set(Some(Editor::Edit(id)));
                                        }>"Editar"</button>
                                        <DeleteConfirmButton
                                            button_class="btn-delete"
                                            on_confirm=move |_| {
                                                let api = api.get_value();
                                                mutations.run(async move { api::delete_point(&api, id).await }, &DELETED);
                                            }
                                        />
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>

            {move || editor.get().map(|mode| view! {
                <PointEditor
                    mode=mode
                    current=editing.get_untracked()
                    on_close=Callback::new(move |_| editor.set(None))
                />
            })}
        </div>
    }
}

/// Create/edit modal. Offers the containers not yet on any route, plus the
/// point's own container when editing.
#[component]
fn PointEditor(mode: Editor, current: Option<CollectionPoint>, on_close: Callback<()>) -> impl IntoView {
    let store = use_app_store();
    let api = use_api();
    let auth = use_auth();
    let mutations = use_mutations();

    let route = RwSignal::new(current.as_ref().and_then(|p| p.route_id()).map(|id| id.to_string()).unwrap_or_default());
    let container = RwSignal::new(current.as_ref().and_then(|p| p.container_id()).map(|id| id.to_string()).unwrap_or_default());
    let order = RwSignal::new(current.as_ref().map(|p| p.order.to_string()).unwrap_or_else(|| "0".to_string()));

    let own_container: Option<Container> = current.as_ref().and_then(|p| p.container.clone());
    let (choices, set_choices) = signal(own_container.clone().into_iter().collect::<Vec<_>>());

    let client = api.get_value();
    spawn_local(async move {
        match api::list_available_containers(&client).await {
            Ok(available) => set_choices.set(own_container.into_iter().chain(available).collect()),
            Err(err) => notify::report_failure(auth, "Error al cargar los contenedores disponibles", &err),
        }
    });

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let (Ok(route_id), Ok(container_id)) = (route.get().parse::<u32>(), container.get().parse::<u32>()) else {
            notify::alert("Selecciona una ruta y un contenedor.");
            return;
        };
        let Ok(order) = order.get().trim().parse::<i32>() else {
            notify::alert("El orden debe ser un número entero.");
            return;
        };
        let api = api.get_value();
        match mode {
            Editor::Create => {
                let draft = PointDraft { route_id, container_id, order };
                mutations.run_then(
                    async move { api::create_point(&api, &draft).await },
                    &CREATED,
                    move |_| on_close.run(()),
                );
            }
            Editor::Edit(id) => {
                let patch = PointPatch {
                    route_id: Some(route_id),
                    container_id: Some(container_id),
                    order: Some(order),
                };
                mutations.run_then(
                    async move { api::update_point(&api, id, &patch).await },
                    &UPDATED,
                    move |_| on_close.run(()),
                );
            }
        }
    };

    let title = match mode {
        Editor::Create => "Nuevo Punto de Recolección",
        Editor::Edit(_) => "Editar Punto de Recolección",
    };

    view! {
        <Modal title=title on_close=on_close>
            <form class="modal-form" on:submit=save>
                <label class="form-field">
                    <span>"Ruta"</span>
                    <select prop:value=move || route.get() on:change=move |ev| route.set(event_target_value(&ev))>
                        <option value="">"Selecciona una ruta"</option>
                        {move || store.routes().read().iter().map(|r| {
                            let value = r.id.to_string();
                            let is_current = value == route.get_untracked();
                            view! { <option value=value selected=is_current>{r.name.clone()}</option> }
                        }).collect_view()}
                    </select>
                </label>
                <label class="form-field">
                    <span>"Contenedor"</span>
                    <select prop:value=move || container.get() on:change=move |ev| container.set(event_target_value(&ev))>
                        <option value="">"Selecciona un contenedor"</option>
                        {move || choices.get().into_iter().map(|c| {
                            let value = c.id.to_string();
                            let is_current = value == container.get_untracked();
                            view! { <option value=value selected=is_current>{format!("#{} · {}", c.id, c.location)}</option> }
                        }).collect_view()}
                    </select>
                </label>
                <label class="form-field">
                    <span>"Orden"</span>
                    <input
                        type="number"
                        prop:value=move || order.get()
                        on:input=move |ev| order.set(event_target_value(&ev))
                    />
                </label>
                <div class="modal-actions">
                    <button type="button" class="btn-secondary" on:click=move |_| on_close.run(())>"Cancelar"</button>
                    <button type="submit" class="btn-primary">"Guardar"</button>
                </div>
            </form>
        </Modal>
    }
}
