//! Users Screen
//!
//! User table with role badges and assigned routes. Create, edit, delete,
//! password restore/change and route assignment.

use leptos::prelude::*;

use crate::api::{self, NewUser, PasswordChange, UserPatch};
use crate::components::badges::RoleBadge;
use crate::components::modal::{Modal, PageHeader, TextField};
use crate::components::notify::{self, use_mutations, Feedback};
use crate::components::DeleteConfirmButton;
use crate::context::{use_api, Entity};
use crate::models::{Role, User};
use crate::store::{track_routes, track_users, use_app_store, AppStateStoreFields};

const CREATED: Feedback = Feedback {
    touched: &[Entity::Users],
    done: "Usuario creado exitosamente",
    failed: "Error al crear el usuario",
};
const UPDATED: Feedback = Feedback {
    touched: &[Entity::Users],
    done: "Usuario actualizado exitosamente",
    failed: "Error al actualizar el usuario",
};
const DELETED: Feedback = Feedback {
    touched: &[Entity::Users],
    done: "Usuario eliminado exitosamente",
    failed: "Error al eliminar el usuario",
};
const PASSWORD_RESTORED: Feedback = Feedback {
    touched: &[],
    done: "Contraseña restablecida exitosamente",
    failed: "Error al restablecer la contraseña",
};
const PASSWORD_CHANGED: Feedback = Feedback {
    touched: &[],
    done: "Contraseña actualizada exitosamente",
    failed: "Error al cambiar la contraseña",
};
const ROUTE_ASSIGNED: Feedback = Feedback {
    touched: &[Entity::Users],
    done: "Ruta asignada exitosamente",
    failed: "Error al asignar la ruta",
};
const ROUTE_UNASSIGNED: Feedback = Feedback {
    touched: &[Entity::Users],
    done: "Ruta desasignada exitosamente",
    failed: "Error al desasignar la ruta",
};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Dialog {
    Create,
    Edit(u32),
    Routes(u32),
    Password(u32),
}

/// Fields shared by the create and edit modals
#[derive(Clone, Copy)]
struct UserForm {
    name: RwSignal<String>,
    phone: RwSignal<String>,
    password: RwSignal<String>,
    role: RwSignal<Role>,
}

impl UserForm {
    fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            phone: RwSignal::new(String::new()),
            password: RwSignal::new(String::new()),
            role: RwSignal::new(Role::Collector),
        }
    }

    fn fill(&self, user: Option<&User>) {
        self.name.set(user.map(|u| u.name.clone()).unwrap_or_default());
        self.phone.set(user.map(|u| u.phone.clone()).unwrap_or_default());
        self.password.set(String::new());
        self.role.set(user.map(|u| u.role).unwrap_or_default());
    }
}

#[component]
pub fn UsersPage() -> impl IntoView {
    let store = use_app_store();
    let api = use_api();
    let mutations = use_mutations();
    track_users(store, true);
    track_routes(store);

    let dialog = RwSignal::new(None::<Dialog>);
    let form = UserForm::new();
    let close = Callback::new(move |_| dialog.set(None));

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let name = form.name.get().trim().to_string();
        let phone = form.phone.get().trim().to_string();
        let password = form.password.get();
        let role = form.role.get();
        if name.is_empty() || phone.is_empty() {
            notify::alert("El nombre y el teléfono son obligatorios.");
            return;
        }
        let api = api.get_value();
        match dialog.get_untracked() {
            Some(Dialog::Create) => {
                if password.is_empty() {
                    notify::alert("La contraseña es obligatoria.");
                    return;
                }
                mutations.run_then(
                    async move {
                        let user = NewUser { name: &name, phone: &phone, password: &password, role };
                        api::create_user(&api, &user).await
                    },
                    &CREATED,
                    move |_| dialog.set(None),
                );
            }
            Some(Dialog::Edit(id)) => mutations.run_then(
                async move {
                    let patch = UserPatch { name: Some(&name), phone: Some(&phone), role: Some(role) };
                    api::update_user(&api, id, &patch).await
                },
                &UPDATED,
                move |_| dialog.set(None),
            ),
            _ => {}
        }
    };

    let restore_password = move |user: &User| {
        if !notify::confirm(&format!("¿Restablecer la contraseña de {}?", user.name)) {
            return;
        }
        let api = api.get_value();
        let phone = user.phone.clone();
        mutations.run(async move { api::restore_password(&api, &phone).await }, &PASSWORD_RESTORED);
    };

    view! {
        <div class="users-page">
            <PageHeader
                title="Usuarios"
                action_label="Nuevo Usuario"
                on_action=move |_| {
                    form.fill(None);
                    dialog.set(Some(Dialog::Create));
                }
            />
            <table class="data-table">
                <thead>
                    <tr>
                        <th>"ID"</th>
                        <th>"Nombre"</th>
                        <th>"Teléfono"</th>
                        <th>"Rol"</th>
                        <th>"Rutas"</th>
                        <th>"Acciones"</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || store.users().read().to_vec()
                        key=|u| (u.id, u.name.clone(), u.phone.clone(), u.role.as_str(), u.routes.iter().map(|r| r.id).collect::<Vec<_>>())
                        children=move |user| {
                            let id = user.id;
                            let snapshot = user.clone();
                            let for_restore = user.clone();
                            let routes = if user.routes.is_empty() {
                                "Sin rutas".to_string()
                            } else {
                                user.routes.iter().map(|r| r.name.as_str()).collect::<Vec<_>>().join(", ")
                            };
                            view! {
                                <tr>
                                    <td>{id}</td>
                                    <td>{user.name.clone()}</td>
                                    <td>{user.phone.clone()}</td>
                                    <td><RoleBadge role=user.role /></td>
                                    <td>{routes}</td>
                                    <td class="actions">
                                        <button class="btn-secondary" on:click=move |_| {
                                            form.fill(Some(&snapshot));
                                            dialog.set(Some(Dialog::Edit(id)));
                                        }>"Editar"</button>
                                        <button class="btn-secondary" on:click=move |_| dialog.set(Some(Dialog::Routes(id)))>
                                            "Rutas"
                                        </button>
                                        <button class="btn-secondary" on:click=move |_| restore_password(&for_restore)>
                                            "Restablecer contraseña"
                                        </button>
                                        <button class="btn-secondary" on:click=move |_| dialog.set(Some(Dialog::Password(id)))>
                                            "Cambiar contraseña"
                                        </button>
                                        <DeleteConfirmButton
                                            button_class="btn-delete"
                                            on_confirm=move |_| {
                                                let api = api.get_value();
                                                mutations.run(async move { api::delete_user(&api, id).await }, &DELETED);
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
                Some(mode @ (Dialog::Create | Dialog::Edit(_))) => {
                    let creating = mode == Dialog::Create;
                    view! {
                        <Modal title=if creating { "Nuevo Usuario" } else { "Editar Usuario" } on_close=close>
                            <form class="modal-form" on:submit=save>
                                <TextField label="Nombre" value=form.name />
                                <TextField label="Teléfono" value=form.phone input_type="tel" />
                                <Show when=move || creating>
                                    <TextField label="Contraseña" value=form.password input_type="password" />
                                </Show>
                                <label class="form-field">
                                    <span>"Rol"</span>
                                    <select
                                        prop:value=move || form.role.get().as_str()
                                        on:change=move |ev| form.role.set(event_target_value(&ev).parse().unwrap_or(Role::Unknown))
                                    >
                                        {Role::ASSIGNABLE.into_iter().map(|role| view! {
                                            <option value=role.as_str()>{role.label()}</option>
                                        }).collect_view()}
                                    </select>
                                </label>
                                <div class="modal-actions">
                                    <button type="button" class="btn-secondary" on:click=move |_| close.run(())>"Cancelar"</button>
                                    <button type="submit" class="btn-primary">"Guardar"</button>
                                </div>
                            </form>
                        </Modal>
                    }.into_any()
                }
                Some(Dialog::Routes(user_id)) => view! { <UserRoutesModal user_id=user_id on_close=close /> }.into_any(),
                Some(Dialog::Password(user_id)) => view! { <PasswordModal user_id=user_id on_close=close /> }.into_any(),
                None => ().into_any(),
            }}
        </div>
    }
}

/// Assigned routes of one user, with assign/unassign
#[component]
fn UserRoutesModal(user_id: u32, on_close: Callback<()>) -> impl IntoView {
    let store = use_app_store();
    let api = use_api();
    let mutations = use_mutations();
    let selected = RwSignal::new(String::new());

    let user = Memo::new(move |_| store.users().read().iter().find(|u| u.id == user_id).cloned());
    let unassigned = Memo::new(move |_| {
        let assigned: Vec<u32> = user
            .get()
            .map(|u| u.routes.iter().map(|r| r.id).collect())
            .unwrap_or_default();
        store
            .routes()
            .read()
            .iter()
            .filter(|r| !assigned.contains(&r.id))
            .map(|r| r.summary())
            .collect::<Vec<_>>()
    });

    let assign = move |_| {
        let Ok(route_id) = selected.get().parse::<u32>() else {
            notify::alert("Selecciona una ruta.");
            return;
        };
        if !notify::confirm("¿Asignar esta ruta al usuario?") {
            return;
        }
        let api = api.get_value();
        mutations.run_then(
            async move { api::assign_route(&api, user_id, route_id).await },
            &ROUTE_ASSIGNED,
            move |_| selected.set(String::new()),
        );
    };

    let unassign = move |route_id: u32| {
        if !notify::confirm("¿Desasignar esta ruta del usuario?") {
            return;
        }
        let api = api.get_value();
        mutations.run(async move { api::unassign_route(&api, user_id, route_id).await }, &ROUTE_UNASSIGNED);
    };

    let title = move || {
        user.get()
            .map(|u| format!("Rutas de {}", u.name))
            .unwrap_or_else(|| "Rutas del usuario".to_string())
    };

    view! {
        <Modal title=title() on_close=on_close>
            <ul class="chip-list">
                <For
                    each=move || user.get().map(|u| u.routes).unwrap_or_default()
                    key=|route| route.id
                    children=move |route| {
                        let route_id = route.id;
                        view! {
                            <li class="chip">
                                <span>{route.name.clone()}</span>
                                <button class="chip-remove" on:click=move |_| unassign(route_id)>"×"</button>
                            </li>
                        }
                    }
                />
            </ul>
            <div class="inline-form">
                <select prop:value=move || selected.get() on:change=move |ev| selected.set(event_target_value(&ev))>
                    <option value="">"Selecciona una ruta"</option>
                    {move || unassigned.get().into_iter().map(|r| view! {
                        <option value=r.id.to_string()>{r.name}</option>
                    }).collect_view()}
                </select>
                <button class="btn-primary" on:click=assign>"Asignar"</button>
            </div>
        </Modal>
    }
}

#[component]
fn PasswordModal(user_id: u32, on_close: Callback<()>) -> impl IntoView {
    let api = use_api();
    let mutations = use_mutations();
    let current = RwSignal::new(String::new());
    let new_password = RwSignal::new(String::new());
    let repeated = RwSignal::new(String::new());

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let (current, new_password) = (current.get(), new_password.get());
        if new_password.is_empty() {
            notify::alert("La nueva contraseña es obligatoria.");
            return;
        }
        if new_password != repeated.get() {
            notify::alert("Las contraseñas no coinciden.");
            return;
        }
        let api = api.get_value();
        mutations.run_then(
            async move {
                let change = PasswordChange {
                    current: (!current.is_empty()).then_some(current.as_str()),
                    new_password: &new_password,
                };
                api::change_password(&api, user_id, &change).await
            },
            &PASSWORD_CHANGED,
            move |_| on_close.run(()),
        );
    };

    view! {
        <Modal title="Cambiar contraseña" on_close=on_close>
            <form class="modal-form" on:submit=save>
                <TextField label="Contraseña actual" value=current input_type="password" />
                <TextField label="Nueva contraseña" value=new_password input_type="password" />
                <TextField label="Repetir contraseña" value=repeated input_type="password" />
                <div class="modal-actions">
                    <button type="button" class="btn-secondary" on:click=move |_| on_close.run(())>"Cancelar"</button>
                    <button type="submit" class="btn-primary">"Guardar"</button>
                </div>
            </form>
        </Modal>
    }
}
