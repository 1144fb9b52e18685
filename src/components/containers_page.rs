//! Containers Screen
//!
//! Container table with create/edit modal, collection-state toggle and delete.

use chrono::Local;
use leptos::prelude::*;

use crate::api::{self, ContainerDraft, ContainerPatch};
use crate::components::badges::StatusBadge;
use crate::components::modal::{Modal, PageHeader, TextField};
use crate::components::notify::{self, use_mutations, Feedback};
use crate::components::DeleteConfirmButton;
use crate::context::{use_api, Entity};
use crate::format::format_timestamp;
use crate::geo::LatLng;
use crate::models::Container;
use crate::store::{track_containers, use_app_store, AppStateStoreFields};

const CREATED: Feedback = Feedback {
    touched: &[Entity::Containers],
    done: "Contenedor creado exitosamente",
    failed: "Error al crear el contenedor",
};
const UPDATED: Feedback = Feedback {
    touched: &[Entity::Containers],
    done: "Contenedor actualizado exitosamente",
    failed: "Error al actualizar el contenedor",
};
const STATE_CHANGED: Feedback = Feedback {
    touched: &[Entity::Containers],
    done: "",
    failed: "Error al cambiar el estado de recolección",
};
const DELETED: Feedback = Feedback {
    touched: &[Entity::Containers, Entity::CollectionPoints],
    done: "Contenedor eliminado exitosamente",
    failed: "Error al eliminar el contenedor",
};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Editor {
    Create,
    Edit(u32),
}

/// Input fields of the container modal
#[derive(Clone, Copy)]
struct ContainerForm {
    location: RwSignal<String>,
    place: RwSignal<String>,
    qr_code: RwSignal<String>,
    nfc_code: RwSignal<String>,
}

impl ContainerForm {
    fn new() -> Self {
        Self {
            location: RwSignal::new(String::new()),
            place: RwSignal::new(String::new()),
            qr_code: RwSignal::new(String::new()),
            nfc_code: RwSignal::new(String::new()),
        }
    }

    fn fill(&self, container: Option<&Container>) {
        self.location.set(container.map(|c| c.location.clone()).unwrap_or_default());
        self.place.set(container.and_then(|c| c.place.clone()).unwrap_or_default());
        self.qr_code.set(container.map(|c| c.qr_code.clone()).unwrap_or_default());
        self.nfc_code.set(container.map(|c| c.nfc_code.clone()).unwrap_or_default());
    }

    /// Trimmed values, or the message to show when one is unusable
    fn values(&self) -> Result<(String, String, String, String), &'static str> {
        let location = self.location.get().trim().to_string();
        let qr_code = self.qr_code.get().trim().to_string();
        let nfc_code = self.nfc_code.get().trim().to_string();
        if LatLng::parse(&location).is_err() {
            return Err("La ubicación debe tener el formato \"latitud longitud\".");
        }
        if qr_code.is_empty() || nfc_code.is_empty() {
            return Err("Los códigos QR y NFC son obligatorios.");
        }
        Ok((location, self.place.get().trim().to_string(), qr_code, nfc_code))
    }
}

#[component]
pub fn ContainersPage() -> impl IntoView {
    let store = use_app_store();
    let api = use_api();
    let mutations = use_mutations();
    track_containers(store);

    let editor = RwSignal::new(None::<Editor>);
    let form = ContainerForm::new();

    let open_create = move || {
        form.fill(None);
        editor.set(Some(Editor::Create));
    };

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(mode) = editor.get_untracked() else { return };
        let (location, place, qr_code, nfc_code) = match form.values() {
            Ok(values) => values,
            Err(message) => {
                notify::alert(message);
                return;
            }
        };
        let api = api.get_value();
        match mode {
            Editor::Create => mutations.run_then(
                async move {
                    let draft = ContainerDraft {
                        location: &location,
                        place: (!place.is_empty()).then_some(place.as_str()),
                        qr_code: &qr_code,
                        nfc_code: &nfc_code,
                    };
                    api::create_container(&api, &draft).await
                },
                &CREATED,
                move |_| editor.set(None),
            ),
            Editor::Edit(id) => mutations.run_then(
                async move {
                    let patch = ContainerPatch {
                        location: Some(&location),
                        place: Some(&place),
                        qr_code: Some(&qr_code),
                        nfc_code: Some(&nfc_code),
                    };
                    api::update_container(&api, id, &patch).await
                },
                &UPDATED,
                move |_| editor.set(None),
            ),
        }
    };

    view! {
        <div class="containers-page">
            <PageHeader title="Contenedores" action_label="Nuevo Contenedor" on_action=move |_| open_create() />
            <table class="data-table">
                <thead>
                    <tr>
                        <th>"ID"</th>
                        <th>"Ubicación"</th>
                        <th>"Lugar"</th>
                        <th>"Código QR"</th>
                        <th>"Código NFC"</th>
                        <th>"Estado"</th>
                        <th>"Ruta"</th>
                        <th>"Última actualización"</th>
                        <th>"Acciones"</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || store.containers().read().to_vec()
                        key=|c| (c.id, c.collected, c.updated_at, c.location.clone(), c.place.clone(), c.qr_code.clone(), c.nfc_code.clone(), c.route_id())
                        children=move |container| {
                            let id = container.id;
                            let collected = container.collected;
                            let snapshot = container.clone();
                            view! {
                                <tr>
                                    <td>{id}</td>
                                    <td>{container.location.clone()}</td>
                                    <td>{container.place.clone().unwrap_or_default()}</td>
                                    <td>{container.qr_code.clone()}</td>
                                    <td>{container.nfc_code.clone()}</td>
                                    <td><StatusBadge collected=collected /></td>
                                    <td>{container.route().map(|r| r.name.clone()).unwrap_or_else(|| "Sin asignar".to_string())}</td>
                                    <td>
                                        {container.updated_at
                                            .map(|at| format_timestamp(&at, &Local))
                                            .unwrap_or_else(|| "-".to_string())}
                                    </td>
                                    <td class="actions">
                                        <button class="btn-secondary" on:click=move |_| {
                                            form.fill(Some(&snapshot));
                                            editor.set(Some(Editor::Edit(id)));
                                        }>"Editar"</button>
                                        <button class="btn-secondary" on:click=move |_| {
                                            let api = api.get_value();
                                            mutations.run(
                                                async move { api::set_collection_state(&api, id, !collected).await },
                                                &STATE_CHANGED,
                                            );
                                        }>
                                            {if collected { "Marcar pendiente" } else { "Marcar recolectado" }}
                                        </button>
                                        <DeleteConfirmButton
                                            button_class="btn-delete"
                                            on_confirm=move |_| {
                                                let api = api.get_value();
                                                mutations.run(async move { api::delete_container(&api, id).await }, &DELETED);
                                            }
                                        />
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>

            {move || editor.get().map(|mode| {
                let title = match mode {
                    Editor::Create => "Nuevo Contenedor",
                    Editor::Edit(_) => "Editar Contenedor",
                };
                view! {
                    <Modal title=title on_close=move |_| editor.set(None)>
                        <form class="modal-form" on:submit=save>
                            <TextField label="Ubicación (latitud longitud)" value=form.location placeholder="19.7661 -97.2455" />
                            <TextField label="Lugar" value=form.place />
                            <TextField label="Código QR" value=form.qr_code />
                            <TextField label="Código NFC" value=form.nfc_code />
                            <div class="modal-actions">
                                <button type="button" class="btn-secondary" on:click=move |_| editor.set(None)>"Cancelar"</button>
                                <button type="submit" class="btn-primary">"Guardar"</button>
                            </div>
                        </form>
                    </Modal>
                }
            })}
        </div>
    }
}
