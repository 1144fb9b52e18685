//! Routes Screen
//!
//! Route table with create/edit, delete, a points viewer with drag-to-reorder,
//! and a modal to put an unassigned container on a route.

use chrono::Local;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::{
    bind_global_listeners, create_dnd_signals, make_on_mousedown, make_on_mouseleave, make_on_row_mouseenter,
};

use crate::api::{self, PointDraft, RouteDraft};
use crate::components::modal::{Modal, PageHeader, TextField};
use crate::components::notify::{self, use_mutations, Feedback};
use crate::components::DeleteConfirmButton;
use crate::context::{use_api, use_auth, Entity};
use crate::format::format_optional_date;
use crate::models::{CollectionPoint, Container};
use crate::reconcile::{ordered_points, reorder_points};
use crate::store::{track_routes, use_app_store, AppStateStoreFields};

const CREATED: Feedback = Feedback {
    touched: &[Entity::Routes],
    done: "Ruta creada exitosamente",
    failed: "Error al crear la ruta",
};
const UPDATED: Feedback = Feedback {
    touched: &[Entity::Routes],
    done: "Ruta actualizada exitosamente",
    failed: "Error al actualizar la ruta",
};
const DELETED: Feedback = Feedback {
    touched: &[Entity::Routes, Entity::CollectionPoints, Entity::Containers],
    done: "Ruta eliminada exitosamente",
    failed: "Error al eliminar la ruta",
};
const POINT_ADDED: Feedback = Feedback {
    touched: &[Entity::Routes, Entity::CollectionPoints, Entity::Containers],
    done: "Contenedor agregado a la ruta exitosamente",
    failed: "Error al agregar el contenedor a la ruta",
};
const POINT_REMOVED: Feedback = Feedback {
    touched: &[Entity::Routes, Entity::CollectionPoints, Entity::Containers],
    done: "Punto de recolección eliminado exitosamente",
    failed: "Error al eliminar el punto de recolección",
};
const REORDERED: Feedback = Feedback {
    touched: &[Entity::Routes, Entity::CollectionPoints],
    done: "",
    failed: "Error al reordenar los puntos",
};

/// Which modal is open
#[derive(Clone, Copy, Debug, PartialEq)]
enum Dialog {
    Create,
    Edit(u32),
    Points(u32),
    AddContainer(u32),
}

#[component]
pub fn RoutesPage() -> impl IntoView {
    let store = use_app_store();
    let api = use_api();
    let mutations = use_mutations();
    track_routes(store);

    let dialog = RwSignal::new(None::<Dialog>);
    let name = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());

    let open_editor = move |target: Dialog, current: Option<(String, String)>| {
        let (n, d) = current.unwrap_or_default();
        name.set(n);
        description.set(d);
        dialog.set(Some(target));
    };

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let route_name = name.get().trim().to_string();
        let route_description = description.get().trim().to_string();
        if route_name.is_empty() {
            notify::alert("El nombre de la ruta es obligatorio.");
            return;
        }
        let api = api.get_value();
        match dialog.get_untracked() {
            Some(Dialog::Create) => mutations.run_then(
                async move {
                    let draft = RouteDraft { name: &route_name, description: &route_description };
                    api::create_route(&api, &draft).await
                },
                &CREATED,
                move |_| dialog.set(None),
            ),
            Some(Dialog::Edit(id)) => mutations.run_then(
                async move {
                    let draft = RouteDraft { name: &route_name, description: &route_description };
                    api::update_route(&api, id, &draft).await
                },
                &UPDATED,
                move |_| dialog.set(None),
            ),
            _ => {}
        }
    };

    let close = Callback::new(move |_| dialog.set(None));

    view! {
        <div class="routes-page">
            <PageHeader title="Rutas" action_label="Nueva Ruta" on_action=move |_| open_editor(Dialog::Create, None) />
            <table class="data-table">
                <thead>
                    <tr>
                        <th>"ID"</th>
                        <th>"Nombre"</th>
                        <th>"Descripción"</th>
                        <th>"Fecha de creación"</th>
                        <th>"Puntos"</th>
                        <th>"Acciones"</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || store.routes().read().to_vec()
                        key=|r| (r.id, r.name.clone(), r.description.clone(), r.points.len())
                        children=move |route| {
                            let id = route.id;
                            let current = (route.name.clone(), route.description.clone().unwrap_or_default());
                            view! {
                                <tr>
                                    <td>{id}</td>
                                    <td>{route.name.clone()}</td>
                                    <td>{route.description.clone().unwrap_or_default()}</td>
                                    <td>{format_optional_date(route.created_at.as_ref(), &Local)}</td>
                                    <td>{route.points.len()}</td>
                                    <td class="actions">
                                        <button class="btn-secondary" on:click=move |_| dialog.set(Some(Dialog::Points(id)))>
                                            "Ver puntos"
                                        </button>
                                        <button class="btn-secondary" on:click=move |_| dialog.set(Some(Dialog::AddContainer(id)))>
                                            "Agregar contenedor"
                                        </button>
                                        <button class="btn-secondary" on:click=move |_| open_editor(Dialog::Edit(id), Some(current.clone()))>
                                            "Editar"
                                        </button>
                                        <DeleteConfirmButton
                                            button_class="btn-delete"
                                            on_confirm=move |_| {
                                                let api = api.get_value();
                                                mutations.run(async move { api::delete_route(&api, id).await }, &DELETED);
                                            }
                                        />
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>

            {move || match dialog.get() {
                Some(Dialog::Create) | Some(Dialog::Edit(_)) => {
                    let title = if dialog.get_untracked() == Some(Dialog::Create) { "Nueva Ruta" } else { "Editar Ruta" };
                    view! {
                        <Modal title=title on_close=close>
                            <form class="modal-form" on:submit=save>
                                <TextField label="Nombre" value=name />
                                <TextField label="Descripción" value=description />
                                <div class="modal-actions">
                                    <button type="button" class="btn-secondary" on:click=move |_| close.run(())>"Cancelar"</button>
                                    <button type="submit" class="btn-primary">"Guardar"</button>
                                </div>
                            </form>
                        </Modal>
                    }.into_any()
                }
                Some(Dialog::Points(route_id)) => view! { <RoutePointsModal route_id=route_id on_close=close /> }.into_any(),
                Some(Dialog::AddContainer(route_id)) => view! { <AddContainerModal route_id=route_id on_close=close /> }.into_any(),
                None => ().into_any(),
            }}
        </div>
    }
}

/// Points of one route in order; rows can be dragged to a new position
#[component]
fn RoutePointsModal(route_id: u32, on_close: Callback<()>) -> impl IntoView {
    let store = use_app_store();
    let api = use_api();
    let mutations = use_mutations();

    let points = Memo::new(move |_| {
        store
            .routes()
            .read()
            .iter()
            .find(|r| r.id == route_id)
            .map(|r| ordered_points(&r.points))
            .unwrap_or_default()
    });

    let dnd = create_dnd_signals();
    let listeners = bind_global_listeners(dnd, move |from, to| {
        let changes = reorder_points(&points.get_untracked(), from, to);
        if changes.is_empty() {
            return;
        }
        let api = api.get_value();
        mutations.run(async move { api::apply_point_orders(&api, &changes).await }, &REORDERED);
    });
    // Listeners stay bound while the modal is open
    StoredValue::new_local(listeners);

    let remove_point = move |point: &CollectionPoint| {
        let id = point.id;
        let container = point.container_id().map(|c| c.to_string()).unwrap_or_default();
        if !notify::confirm(&format!("¿Quitar el contenedor {} de la ruta?", container)) {
            return;
        }
        let api = api.get_value();
        mutations.run(async move { api::delete_point(&api, id).await }, &POINT_REMOVED);
    };

    view! {
        <Modal title=format!("Puntos de la ruta {}", route_id) on_close=on_close>
            <Show
                when=move || !points.get().is_empty()
                fallback=|| view! { <p class="empty">"Esta ruta no tiene puntos de recolección."</p> }
            >
                <p class="hint">"Arrastra una fila para cambiar el orden."</p>
                <table class="data-table points-table" on:mouseleave=make_on_mouseleave(dnd)>
                    <thead>
                        <tr>
                            <th>"Orden"</th>
                            <th>"Punto"</th>
                            <th>"Contenedor"</th>
                            <th>"Ubicación"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || points.get().into_iter().enumerate()
                            key=|(index, point)| (*index, point.id, point.order)
                            children=move |(index, point)| {
                                let row_class = move || {
                                    if dnd.is_dragging(index) {
                                        "draggable-row dragging"
                                    } else if dnd.is_over(index) {
                                        "draggable-row drop-target"
                                    } else {
                                        "draggable-row"
                                    }
                                };
                                let location = point.container.as_ref().map(|c| c.location.clone()).unwrap_or_default();
                                let snapshot = point.clone();
                                view! {
                                    <tr
                                        class=row_class
                                        on:mousedown=make_on_mousedown(dnd, index)
                                        on:mouseenter=make_on_row_mouseenter(dnd, index)
                                    >
                                        <td>{point.order}</td>
                                        <td>{point.id}</td>
                                        <td>{point.container_id().map(|id| id.to_string()).unwrap_or_default()}</td>
                                        <td>{location}</td>
                                        <td>
                                            <button class="btn-delete" on:click=move |_| remove_point(&snapshot)>"Quitar"</button>
                                        </td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
            </Show>
        </Modal>
    }
}

/// Pick an unassigned container and append it to the route with order 0
#[component]
fn AddContainerModal(route_id: u32, on_close: Callback<()>) -> impl IntoView {
    let api = use_api();
    let auth = use_auth();
    let mutations = use_mutations();

    let (available, set_available) = signal(Vec::<Container>::new());
    let (loading, set_loading) = signal(true);
    let selected = RwSignal::new(String::new());

    let client = api.get_value();
    spawn_local(async move {
        match api::list_available_containers(&client).await {
            Ok(containers) => set_available.set(containers),
            Err(err) => notify::report_failure(auth, "Error al cargar los contenedores disponibles", &err),
        }
        set_loading.set(false);
    });

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Ok(container_id) = selected.get().parse::<u32>() else {
            notify::alert("Selecciona un contenedor.");
            return;
        };
        let api = api.get_value();
        let draft = PointDraft { route_id, container_id, order: 0 };
        mutations.run_then(
            async move { api::create_point(&api, &draft).await },
            &POINT_ADDED,
            move |_| on_close.run(()),
        );
    };

    view! {
        <Modal title="Agregar contenedor a la ruta" on_close=on_close>
            <form class="modal-form" on:submit=save>
                {move || if loading.get() {
                    view! { <p>"Cargando..."</p> }.into_any()
                } else if available.get().is_empty() {
                    view! { <p class="empty">"No hay contenedores disponibles."</p> }.into_any()
                } else {
                    view! {
                        <label class="form-field">
                            <span>"Contenedor"</span>
                            <select on:change=move |ev| selected.set(event_target_value(&ev))>
                                <option value="">"Selecciona un contenedor"</option>
                                {available.get().into_iter().map(|c| {
                                    let label = match &c.place {
                                        Some(place) => format!("#{} · {} ({})", c.id, place, c.location),
                                        None => format!("#{} · {}", c.id, c.location),
                                    };
                                    view! { <option value=c.id.to_string()>{label}</option> }
                                }).collect_view()}
                            </select>
                        </label>
                    }.into_any()
                }}
                <div class="modal-actions">
                    <button type="button" class="btn-secondary" on:click=move |_| on_close.run(())>"Cancelar"</button>
                    <button type="submit" class="btn-primary">"Agregar"</button>
                </div>
            </form>
        </Modal>
    }
}
