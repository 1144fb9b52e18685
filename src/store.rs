//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. Each entity list
//! is re-fetched whenever its version in `AppContext` changes.

use std::future::Future;

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::api::{self, ApiClient};
use crate::components::notify;
use crate::context::{use_api, use_auth, AppContext, Entity};
use crate::error::ApiError;
use crate::models::{CollectionEvent, CollectionPoint, Container, Route, User};
use crate::reconcile::{sort_by_id, sort_newest_first};

/// Last fetched copy of every backend list
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Users with their assigned routes, by id
    pub users: Vec<User>,
    /// Containers by id
    pub containers: Vec<Container>,
    /// Routes (with nested points) by id
    pub routes: Vec<Route>,
    /// Collection points by id
    pub collection_points: Vec<CollectionPoint>,
    /// Collection events, newest first
    pub collections: Vec<CollectionEvent>,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Entity Sync
// ========================

/// Fetch with `load` now and again on every invalidation of `entity`
fn track<T, F, Fut, W>(entity: Entity, label: &'static str, load: F, write: W)
where
    T: 'static,
    F: Fn(ApiClient) -> Fut + Copy + 'static,
    Fut: Future<Output = Result<Vec<T>, ApiError>> + 'static,
    W: Fn(Vec<T>) + Copy + 'static,
{
    let ctx = expect_context::<AppContext>();
    let auth = use_auth();
    let api = use_api();

    Effect::new(move |_| {
        let _ = ctx.version(entity);
        let api = api.get_value();
        spawn_local(async move {
            match load(api).await {
                Ok(items) => write(items),
                Err(err) => notify::log_failure(auth, label, &err),
            }
        });
    });
}

/// `with_routes` also fetches every user's assigned routes
pub fn track_users(store: AppStore, with_routes: bool) {
    track(
        Entity::Users,
        "Error al cargar los usuarios",
        move |api| async move {
            if with_routes {
                api::list_users_with_routes(&api).await
            } else {
                api::list_users(&api).await
            }
        },
        move |mut users: Vec<User>| {
            sort_by_id(&mut users);
            *store.users().write() = users;
        },
    );
}

pub fn track_containers(store: AppStore) {
    track(
        Entity::Containers,
        "Error al cargar los contenedores",
        |api| async move { api::list_containers(&api).await },
        move |mut containers: Vec<Container>| {
            sort_by_id(&mut containers);
            *store.containers().write() = containers;
        },
    );
}

pub fn track_routes(store: AppStore) {
    track(
        Entity::Routes,
        "Error al cargar las rutas",
        |api| async move { api::list_routes(&api).await },
        move |mut routes: Vec<Route>| {
            sort_by_id(&mut routes);
            *store.routes().write() = routes;
        },
    );
}

pub fn track_collection_points(store: AppStore) {
    track(
        Entity::CollectionPoints,
        "Error al cargar los puntos de recolección",
        |api| async move { api::list_points(&api).await },
        move |mut points: Vec<CollectionPoint>| {
            sort_by_id(&mut points);
            *store.collection_points().write() = points;
        },
    );
}

pub fn track_collections(store: AppStore) {
    track(
        Entity::Collections,
        "Error al cargar las recolecciones",
        |api| async move { api::list_collections(&api).await },
        move |mut events: Vec<CollectionEvent>| {
            sort_newest_first(&mut events);
            *store.collections().write() = events;
        },
    );
}
