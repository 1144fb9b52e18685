//! Application Context
//!
//! Shared state provided via Leptos Context API: data versions for
//! re-fetching, the authenticated identity, the API client and the config.

use leptos::prelude::*;
use tracing::info;

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::models::Identity;
use crate::session::Session;

/// Backend entity groups a screen can depend on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    Users,
    Containers,
    Routes,
    CollectionPoints,
    Collections,
}

/// Per-entity version counters. Fetch effects read the versions they depend
/// on; a mutation bumps the versions of what it touched.
#[derive(Clone, Copy)]
pub struct AppContext {
    users: RwSignal<u32>,
    containers: RwSignal<u32>,
    routes: RwSignal<u32>,
    collection_points: RwSignal<u32>,
    collections: RwSignal<u32>,
}

impl AppContext {
    pub fn new() -> Self {
        Self {
            users: RwSignal::new(0),
            containers: RwSignal::new(0),
            routes: RwSignal::new(0),
            collection_points: RwSignal::new(0),
            collections: RwSignal::new(0),
        }
    }

    fn signal(&self, entity: Entity) -> RwSignal<u32> {
        match entity {
            Entity::Users => self.users,
            Entity::Containers => self.containers,
            Entity::Routes => self.routes,
            Entity::CollectionPoints => self.collection_points,
            Entity::Collections => self.collections,
        }
    }

    /// Tracked read; call inside the effect that fetches `entity`
    pub fn version(&self, entity: Entity) -> u32 {
        self.signal(entity).get()
    }

    pub fn invalidate(&self, entity: Entity) {
        self.signal(entity).update(|v| *v += 1);
    }

    pub fn invalidate_all(&self, entities: &[Entity]) {
        for entity in entities {
            self.invalidate(*entity);
        }
    }
}

/// Signed-in identity plus the session that persists it
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub identity: RwSignal<Option<Identity>>,
    session: StoredValue<Session>,
}

impl AuthContext {
    pub fn new(session: Session) -> Self {
        Self {
            identity: RwSignal::new(session.restore()),
            session: StoredValue::new(session),
        }
    }

    pub fn sign_in(&self, identity: Identity) {
        self.identity.set(Some(identity));
    }

    /// Clear the stored credential and return to the login form
    pub fn logout(&self) {
        self.session.with_value(Session::logout);
        if self.identity.get_untracked().is_some() {
            info!("signed out");
        }
        self.identity.set(None);
    }
}

pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}

/// Copyable handle; call `get_value()` where a request is made
pub fn use_api() -> StoredValue<ApiClient> {
    expect_context::<StoredValue<ApiClient>>()
}

pub fn use_config() -> StoredValue<AppConfig> {
    expect_context::<StoredValue<AppConfig>>()
}
